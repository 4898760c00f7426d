use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    let args = cli::parse_args();

    // Initialize logger with appropriate level based on verbose flag
    if std::env::var("RUST_LOG").is_err() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let config = args.to_config();
    log::debug!("Using {:?}", config);

    let summary = stopgeo_core::geocode_file(&args.input, &args.output, config)?;

    if summary.failed > 0 {
        log::warn!("{} lookups failed and were left empty", summary.failed);
    }

    println!("Done! Results saved to {}", args.output.display());

    Ok(())
}

use clap::Parser;
use std::time;
use vcfcombine::{
    cli::{init_verbose, Cli, Command, FULL_VERSION},
    commands::{bam_stats, combine},
    utils::util::{handle_error_and_exit, Result},
};

fn runner() -> Result<()> {
    let cli = Cli::parse();
    init_verbose(&cli);
    log::trace!("CLI options set: {:?}", cli);

    log::info!(
        "Running {}-{} [{}]",
        env!("CARGO_PKG_NAME"),
        &**FULL_VERSION,
        cli.command.name()
    );

    let start_timer = time::Instant::now();
    match cli.command {
        Command::Combine(args) => {
            log::trace!("Combine arguments: {:#?}", args);
            combine(args)?
        }
        Command::BamStats(args) => {
            log::trace!("Bam-stats arguments: {:#?}", args);
            bam_stats(args)?
        }
    }
    log::info!("Total execution time: {:.2?}", start_timer.elapsed());
    log::info!("{} end", env!("CARGO_PKG_NAME"));
    Ok(())
}

fn main() {
    if let Err(e) = runner() {
        handle_error_and_exit(e);
    }
}

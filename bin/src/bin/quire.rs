use clap::Parser;
use quire_bin::{
    cli::{Cli, Command},
    commands,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Stats {
            file,
            config,
            log_file,
        } => {
            let _log_guard = quire_log::init(quire_log::LogConfig {
                log_file_path: log_file,
            })
            .map_err(|e| anyhow::anyhow!(e))?;
            commands::stats::run(&file, config.as_deref())
        }
    }
}

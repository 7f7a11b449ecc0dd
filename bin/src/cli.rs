use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quire", version, about = "Inspect text through the quire buffer engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print length, line count, tree depth and widest line of a file
    Stats {
        /// File to load
        file: PathBuf,

        /// Config file to use instead of the discovered one
        #[arg(short, long, env = "QUIRE_CONFIG")]
        config: Option<PathBuf>,

        /// Log file path, or a directory for the default log file name
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stats() {
        let cli =
            Cli::try_parse_from(["quire", "stats", "notes.txt", "--config", "q.toml"]).unwrap();
        let Command::Stats {
            file,
            config,
            log_file,
        } = cli.command;
        assert_eq!(file, PathBuf::from("notes.txt"));
        assert_eq!(config, Some(PathBuf::from("q.toml")));
        assert_eq!(log_file, None);
    }

    #[test]
    fn stats_requires_a_file() {
        assert!(Cli::try_parse_from(["quire", "stats"]).is_err());
    }
}

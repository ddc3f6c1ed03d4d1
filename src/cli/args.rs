use crate::processors::Strategy;
use crate::utils::constants::DEFAULT_CHUNK_SIZE;
use crate::writers::ReportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brc-processor")]
#[command(about = "High-performance min/mean/max aggregator for station measurement files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate a measurements file and emit the report
    Process {
        #[arg(help = "Input file of `<station>;<value>` lines")]
        input_file: PathBuf,

        #[arg(
            short,
            long,
            help = "Append the report to this file [default: write to stdout]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Strategy::Pipeline)]
        strategy: Strategy,

        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, help = "Read buffer size in bytes")]
        chunk_size: usize,

        #[arg(long, help = "Chunks queued ahead of the workers [default: 2 x max-workers]")]
        queue_depth: Option<usize>,

        #[arg(short, long, help = "Hide the progress bar")]
        quiet: bool,
    },

    /// Check the parallel pipeline against the sequential baseline
    Verify {
        #[arg(help = "Input file of `<station>;<value>` lines")]
        input_file: PathBuf,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process_defaults() {
        let cli = Cli::parse_from(["brc-processor", "process", "measurements.txt"]);
        match cli.command {
            Commands::Process {
                input_file,
                output_file,
                strategy,
                format,
                max_workers,
                chunk_size,
                queue_depth,
                quiet,
            } => {
                assert_eq!(input_file, PathBuf::from("measurements.txt"));
                assert!(output_file.is_none());
                assert_eq!(strategy, Strategy::Pipeline);
                assert_eq!(format, ReportFormat::Text);
                assert_eq!(max_workers, num_cpus::get());
                assert_eq!(chunk_size, DEFAULT_CHUNK_SIZE);
                assert!(queue_depth.is_none());
                assert!(!quiet);
            }
            _ => panic!("expected process command"),
        }
    }

    #[test]
    fn test_parse_process_overrides() {
        let cli = Cli::parse_from([
            "brc-processor",
            "--verbose",
            "process",
            "in.txt",
            "-o",
            "out.txt",
            "--strategy",
            "mapped",
            "--format",
            "json",
            "--max-workers",
            "3",
            "--queue-depth",
            "5",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Process {
                output_file,
                strategy,
                format,
                max_workers,
                queue_depth,
                ..
            } => {
                assert_eq!(output_file, Some(PathBuf::from("out.txt")));
                assert_eq!(strategy, Strategy::Mapped);
                assert_eq!(format, ReportFormat::Json);
                assert_eq!(max_workers, 3);
                assert_eq!(queue_depth, Some(5));
            }
            _ => panic!("expected process command"),
        }
    }
}

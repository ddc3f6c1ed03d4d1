use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::processors::{self, PipelineConfig, Strategy};
use crate::utils::progress::ProgressReporter;
use crate::writers::{format_report, ReportWriter};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{info, warn, Level};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

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
            let mut config = PipelineConfig::new(max_workers).with_chunk_size(chunk_size);
            if let Some(depth) = queue_depth {
                config = config.with_queue_depth(depth);
            }
            config.validate()?;

            info!(
                input = %input_file.display(),
                %strategy,
                workers = config.max_workers,
                chunk_size = config.chunk_size,
                "processing measurements"
            );

            let started = Instant::now();
            let total_bytes = std::fs::metadata(&input_file)
                .map(|m| m.len())
                .unwrap_or(0);
            let progress = ProgressReporter::new(total_bytes, "Aggregating measurements...", quiet);

            let outcome =
                processors::process_file(strategy, &input_file, &config, Some(&progress)).await;
            progress.finish_and_clear();
            let outcome = outcome?;

            let writer = ReportWriter::new(format);
            let report = writer.render(&outcome.table)?;
            match output_file {
                Some(path) => writer.append_to_path(&report, &path)?,
                None => writer.write_to(&report, std::io::stdout().lock())?,
            }

            info!("{}", outcome.summary.summary());
            eprintln!("Processed in {:?}", started.elapsed());
        }

        Commands::Verify {
            input_file,
            max_workers,
            chunk_size,
        } => {
            let config = PipelineConfig::new(max_workers).with_chunk_size(chunk_size);
            config.validate()?;

            let progress = ProgressReporter::new_spinner("Running pipeline...", false);
            let verified = verify(&input_file, &config, Some(&progress)).await;
            progress.finish_and_clear();
            let stations = verified?;

            println!("✅ Pipeline and baseline reports match ({} stations)", stations);
        }
    }

    Ok(())
}

/// Run the parallel pipeline and the sequential baseline over the same input
/// and require byte-identical text reports. Returns the station count.
pub async fn verify(
    input_file: &Path,
    config: &PipelineConfig,
    progress: Option<&ProgressReporter>,
) -> Result<usize> {
    let pipeline =
        processors::process_file(Strategy::Pipeline, input_file, config, None).await?;
    if let Some(p) = progress {
        p.set_message("Running sequential baseline...");
    }
    let baseline =
        processors::process_file(Strategy::Sequential, input_file, config, None).await?;

    let pipeline_report = format_report(&pipeline.table);
    let baseline_report = format_report(&baseline.table);

    if pipeline_report != baseline_report {
        return Err(ProcessingError::ReportMismatch(format!(
            "pipeline produced {} stations, baseline {} stations",
            pipeline.table.len(),
            baseline.table.len()
        )));
    }

    info!(
        stations = pipeline.table.len(),
        pipeline = ?pipeline.summary.elapsed,
        baseline = ?baseline.summary.elapsed,
        "reports match"
    );
    Ok(pipeline.table.len())
}

/// Install the fmt subscriber: warnings by default, debug with `--verbose`,
/// written to stderr or to `log_file`.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    // A subscriber may already be installed (tests run several commands per process).
    match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| ProcessingError::OutputWrite {
                path: path.to_path_buf(),
                source,
            })?;
            if let Err(e) = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
            {
                warn!(
                    log_file = %path.display(),
                    error = %e,
                    "logger already installed, log file will stay empty"
                );
            }
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }

    Ok(())
}

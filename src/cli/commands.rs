use crate::cli::args::{Cli, Commands, OutputFormat};
use crate::error::{ProcessingError, Result};
use crate::processors::GroupProcessor;
use crate::readers::{write_reference_csv, GazetteerReader, LocationReference};
use crate::utils::progress::ProgressReporter;
use crate::utils::settings::Settings;
use crate::writers::{CsvTableWriter, ParquetWriter, TableSink};
use std::sync::atomic::Ordering;
use tracing::warn;

pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            input_dir,
            output_dir,
            compression,
            format,
            max_workers,
            mmap,
        } => {
            println!("Processing observation artifacts...");
            println!("Input directory: {}", input_dir.display());
            println!("Output directory: {}", output_dir.display());
            println!("Workers: {}", max_workers);

            let sink: Box<dyn TableSink> = match format {
                OutputFormat::Parquet => {
                    let compression = compression.unwrap_or_else(|| settings.compression.clone());
                    Box::new(
                        ParquetWriter::new()
                            .with_compression(&compression)?
                            .with_row_group_size(settings.row_group_size),
                    )
                }
                OutputFormat::Csv => Box::new(CsvTableWriter::new()),
            };

            let processor = GroupProcessor::new(&settings)
                .with_max_workers(max_workers)
                .with_mmap(mmap);

            let cancel = processor.cancel_flag();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, stopping after the current files");
                    cancel.store(true, Ordering::Relaxed);
                }
            });

            let report = tokio::task::spawn_blocking(move || {
                let groups = processor.discover_groups(&input_dir)?;
                if groups.is_empty() {
                    warn!("No artifacts found in {}", input_dir.display());
                }

                let progress =
                    ProgressReporter::new(groups.len() as u64, "Processing groups...", false);
                let report =
                    processor.process_groups(groups, &output_dir, sink.as_ref(), Some(&progress))?;
                progress.finish_with_message(&format!("Processed {} groups", report.groups.len()));

                Ok::<_, ProcessingError>(report)
            })
            .await??;

            println!("\n{}", report.summary());

            if report.was_cancelled() {
                return Err(ProcessingError::Cancelled);
            }

            println!("Processing complete!");
        }

        Commands::Geocode { gazetteer, output } => {
            println!("Reading gazetteer: {}", gazetteer.display());

            let progress = ProgressReporter::new_spinner("Reading locations...", false);
            let records = GazetteerReader::new().read_locations(&gazetteer)?;
            progress.finish_with_message(&format!("Read {} locations", records.len()));

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            write_reference_csv(&records, &output)?;

            println!("Reference table written to {}", output.display());
        }

        Commands::Locate {
            reference,
            name,
            admin_code,
        } => {
            let reference = LocationReference::from_csv(&reference)?;
            let coordinates = reference.lookup(&name, &admin_code)?;

            println!(
                "{} ({}): latitude {}, longitude {}",
                name, admin_code, coordinates.latitude, coordinates.longitude
            );
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;

            println!("\nFile Details:");
            println!("{}", file_info.summary());

            if sample > 0 {
                match writer.read_table(&file) {
                    Ok(table) => {
                        println!("\nTable: {}", table);
                        println!("Columns: {}", table.column_names().join(", "));
                        println!("\nSample Rows (showing {} rows):", sample.min(table.num_rows()));
                        for row in 0..sample.min(table.num_rows()) {
                            println!("{}. {}", row + 1, table.format_row(row));
                        }
                    }
                    Err(e) => println!("Error reading sample data: {}", e),
                }
            }
        }
    }

    Ok(())
}

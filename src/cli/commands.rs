use crate::analyzers::NdviAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::{load_env_file, ImporterConfig};
use crate::error::Result;
use crate::processors::{CoordinatePolicy, ImportPipeline, IntegrityChecker};
use crate::utils::progress::ProgressReporter;
use crate::writers::{batch_count, SupabaseClient};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use validator::Validate;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);

    if let Some(path) = load_env_file(cli.env_file.as_deref())? {
        info!("Loaded environment from {}", path.display());
    }
    let mut config = ImporterConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Import {
            input,
            table,
            chunk_size,
            skip_invalid_coordinates,
            dry_run,
            mmap,
            max_workers,
        } => {
            if let Some(table) = table {
                config.table = table;
            }
            if let Some(chunk_size) = chunk_size {
                config.chunk_size = chunk_size;
            }
            config.validate()?;

            debug!(
                "Table: {}, chunk size: {}, workers: {}",
                config.table, config.chunk_size, max_workers
            );

            let pipeline = ImportPipeline::new(max_workers)
                .with_table(config.table.clone())
                .with_chunk_size(config.chunk_size)
                .with_coordinate_policy(coordinate_policy(skip_invalid_coordinates))
                .with_mmap(mmap);

            if dry_run {
                let progress = ProgressReporter::new_spinner("Preparing NDVI data...", false);
                let outcome = pipeline.prepare_async(&input).await?;
                progress.finish_with_message(&format!(
                    "Prepared {} records",
                    outcome.records.len()
                ));

                let checker = IntegrityChecker::new();
                println!("\n{}", checker.generate_summary(&outcome.report));
                println!(
                    "Dry run: {} records in {} batches would be inserted into '{}'",
                    outcome.records.len(),
                    batch_count(outcome.records.len(), pipeline.chunk_size()),
                    pipeline.table()
                );
                return Ok(());
            }

            let supabase = config.supabase()?;
            let client = SupabaseClient::from_config(&supabase, config.request_timeout())?;

            let summary = pipeline.run(&input, &client).await?;
            println!("\n{}", summary.summary());

            if !summary.failed_batches.is_empty() {
                warn!("Failed batches: {:?}", summary.failed_batches);
            }
        }

        Commands::Validate {
            input,
            skip_invalid_coordinates,
            max_workers,
        } => {
            println!("Validating NDVI data...");
            println!("Input file: {}", input.display());

            let progress = ProgressReporter::new_spinner("Validating data...", false);

            let pipeline = ImportPipeline::new(max_workers)
                .with_coordinate_policy(coordinate_policy(skip_invalid_coordinates));
            let outcome = pipeline.prepare_async(&input).await?;

            progress.finish_with_message("Validation complete");

            let checker = IntegrityChecker::new();
            println!("\n{}", checker.generate_summary(&outcome.report));

            let issues =
                outcome.report.invalid_coordinates + outcome.report.out_of_range_coordinates;
            if issues == 0 {
                println!("✅ All accepted rows passed validation checks");
            } else {
                println!("⚠️  Found {} coordinate issues", issues);
            }
        }

        Commands::Info {
            input,
            sample,
            max_workers,
        } => {
            println!("Analyzing NDVI file: {}", input.display());

            let pipeline = ImportPipeline::new(max_workers);
            let outcome = pipeline.prepare_async(&input).await?;

            if outcome.records.is_empty() {
                println!("No records would be imported");
                return Ok(());
            }

            let analyzer = NdviAnalyzer::new();
            let stats = analyzer.calculate_statistics(&outcome.records)?;
            println!("\n{}", stats.detailed_summary());

            if sample > 0 {
                println!("\nSample Records (showing {} records):", sample);
                for (i, record) in outcome.records.iter().take(sample).enumerate() {
                    println!("{}. {}", i + 1, serde_json::to_string(record)?);
                }
            }
        }
    }

    Ok(())
}

fn coordinate_policy(skip_invalid_coordinates: bool) -> CoordinatePolicy {
    if skip_invalid_coordinates {
        CoordinatePolicy::Skip
    } else {
        CoordinatePolicy::Strict
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "ndvi_importer=debug,info"
    } else {
        "ndvi_importer=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

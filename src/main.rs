use author_notes::results::RunSummary;
use author_notes::{Collector, CollectorConfig, store};
use clap::Parser;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match CollectorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => CollectorConfig::default(),
    };
    let config = args.apply(config);
    let format = args.store_format();

    ::log::info!(
        "Writing {:?} records for {} chapters to {}",
        format,
        config.chapter_count,
        args.output.display()
    );

    if let Err(e) = config.validate() {
        ::log::error!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let mut collection = match Collector::new(config).generate() {
        Ok(collection) => collection,
        Err(e) => {
            ::log::error!("Failed to start collector: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Only truncate an existing store once the collector is up
    let mut writer = match store::create(&args.output, format) {
        Ok(writer) => writer,
        Err(e) => {
            ::log::error!("Failed to create record store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();

    while let Some(record) = collection.records.recv().await {
        if let Err(e) = writer.write(&record) {
            ::log::error!(
                "Failed to append {} to {}: {}",
                record.identifier,
                args.output.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    }

    let written = writer.written();
    if let Err(e) = writer.finish() {
        ::log::error!("Failed to finish {}: {}", args.output.display(), e);
        return ExitCode::FAILURE;
    }

    let summary = collection.summary.await.unwrap_or_else(|e| {
        ::log::error!("Collector task ended abnormally: {}", e);
        RunSummary::default()
    });

    ::log::info!(
        "Collection finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    println!("{}", summary);
    println!("{} records written to {}", written, args.output.display());

    ExitCode::SUCCESS
}

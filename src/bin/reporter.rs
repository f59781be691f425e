use author_notes::report::{self, DEFAULT_OUTPUT};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "reporter")]
#[command(about = "Renders a collector record store into a standalone HTML page")]
#[command(version)]
struct Args {
    /// Record store produced by the collector (.json or .jsonl)
    record_store_path: Option<PathBuf>,

    /// HTML file to write
    #[arg(default_value = DEFAULT_OUTPUT)]
    output_path: PathBuf,
}

/// Exits 1 on a missing argument and also on store or write failures,
/// deliberately not 0, so scripts can tell an unreadable store from an
/// empty report.
fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let Some(store_path) = args.record_store_path else {
        eprintln!("Usage: reporter <record_store_path> [output_path]");
        eprintln!("Example: reporter results.json kanzenshuu_page.html");
        return ExitCode::from(1);
    };

    match report::create_report(&store_path, &args.output_path) {
        Ok(outcome) => {
            println!(
                "Found {} entries with commentary out of {} total entries",
                outcome.included, outcome.total
            );
            println!("Successfully created HTML file: {}", outcome.output.display());
            println!("Included {} chapters with commentary", outcome.included);
            println!(
                "\nOpen {} in your browser to view the results!",
                outcome.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

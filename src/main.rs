//! CLI front-end: gate both files, run the analysis, export the matrix.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cramplan::pipeline::gate::{self, GateOutcome};
use cramplan::pipeline::progress::Progress;
use cramplan::{export, Analyzer, AnalysisRequest, AppConfig, DocumentSlot, UploadedDocument};

#[derive(Parser)]
#[command(name = cramplan::config::APP_NAME, version, about)]
struct Cli {
    /// Course syllabus PDF
    syllabus: PathBuf,

    /// Past exam papers PDF
    past_papers: PathBuf,

    /// Write the exported matrix here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Accept files that fail the quick academic check without asking
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cramplan::config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    // Fail fast on missing credentials, before touching any file.
    let config = AppConfig::from_env().map_err(|e| e.to_string())?;

    tracing::info!(
        "{} v{} starting",
        cramplan::config::APP_NAME,
        cramplan::config::APP_VERSION
    );

    let decoder = cramplan::pipeline::extraction::PdfTextDecoder;
    let syllabus = load_gated(&decoder, &cli.syllabus, cli.yes)?;
    let past_papers = load_gated(&decoder, &cli.past_papers, cli.yes)?;

    let request = AnalysisRequest::new(syllabus, past_papers)
        .map_err(|e| e.user_message())?;

    let progress = Progress::new(|stage| {
        eprintln!("▸ {stage}");
    });

    let analyzer = Analyzer::with_default_backends(config);
    let result = analyzer
        .run(&request, progress)
        .await
        .map_err(|e| e.user_message())?;

    let markdown = export::render_markdown(&result, chrono::Utc::now());
    match &cli.output {
        Some(path) => {
            std::fs::write(path, &markdown)
                .map_err(|e| format!("could not write {}: {e}", path.display()))?;
            eprintln!(
                "Wrote {} topics to {}",
                result.summary.total_topics,
                path.display()
            );
        }
        None => {
            print!("{markdown}");
        }
    }

    Ok(())
}

/// Run the soft gate over one file, prompting on a suspect result.
fn load_gated(
    decoder: &cramplan::pipeline::extraction::PdfTextDecoder,
    path: &Path,
    auto_confirm: bool,
) -> Result<Option<UploadedDocument>, String> {
    let doc = UploadedDocument::from_path(path)
        .map_err(|e| format!("could not read {}: {e}", path.display()))?;
    let name = doc.file_name.clone();

    let mut slot = DocumentSlot::Empty;
    match gate::offer(&mut slot, decoder, doc) {
        GateOutcome::Ignored => {
            return Err(format!("{name} is not a PDF file"));
        }
        GateOutcome::Accepted => {}
        GateOutcome::Suspect => {
            if auto_confirm || confirm_suspect(&name)? {
                slot.confirm();
            } else {
                slot.clear();
                return Err(format!("{name} was discarded"));
            }
        }
    }

    Ok(slot.into_accepted())
}

fn confirm_suspect(name: &str) -> Result<bool, String> {
    eprint!(
        "{name} doesn't look like academic material. Use it anyway? [y/N] "
    );
    std::io::stderr().flush().ok();

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| e.to_string())?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

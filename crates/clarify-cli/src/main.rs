//! Interactive clarify session.
//!
//! Reads a summary and a question list, asks the user each question,
//! validates every answer against the oracle, and writes the enhanced
//! summary to the output file.

mod report;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use clarify_core::NextQuestion;
use clarify_runtime::{
    Gateway, GeminiProvider, RuntimeConfig, SessionOrchestrator, SubmitOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "clarify", version, about = "Enhanced summary generation through validated Q&A")]
struct Cli {
    /// Summary file to enrich
    #[arg(short, long, default_value = "summary.txt")]
    summary: PathBuf,

    /// Newline-delimited question list
    #[arg(short, long, default_value = "question.txt")]
    questions: PathBuf,

    /// Destination for the enhanced summary
    #[arg(short, long, default_value = "enhanced_summary.txt")]
    output: PathBuf,

    /// Optional YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    let mut provider = GeminiProvider::from_config_or_env(config.provider.api_key.as_deref())
        .context("configuring the Gemini provider")?;
    if let Some(model) = &config.provider.model {
        provider = provider.with_model(model);
    }
    if let Some(base_url) = &config.provider.base_url {
        provider = provider.with_base_url(base_url);
    }

    let gateway = Arc::new(Gateway::new(Arc::new(provider), config.retry));
    let mut orchestrator = SessionOrchestrator::new(gateway.clone(), config.cache);

    println!("=== Clarify ===");
    println!("Enhanced Summary Generation System\n");

    let summary = std::fs::read_to_string(&cli.summary)
        .with_context(|| format!("reading summary from {}", cli.summary.display()))?;
    let questions = std::fs::read_to_string(&cli.questions)
        .with_context(|| format!("reading questions from {}", cli.questions.display()))?;

    println!("Analyzing files...");
    let start = orchestrator.start(&summary, &questions).await;

    if let Some(analysis) = &start.analysis {
        println!("\nAnalysis:");
        println!("{}", "-".repeat(50));
        println!("{analysis}");
        println!("{}\n", "-".repeat(50));
    } else {
        println!("Could not get an analysis, continuing with the questionnaire.\n");
    }

    println!("Found {} questions to ask\n", start.total_questions);
    println!("Instructions:");
    println!("  - Answer each question to the best of your knowledge");
    println!("  - Answers are validated before being accepted");
    println!("  - Type 'quit', 'exit', or 'stop' to end early");
    println!("  - Rejected answers will be asked again\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let (answered, total) = orchestrator.progress()?;
        let (index, text, is_retry) = match orchestrator.next_question()? {
            NextQuestion::Ask {
                index,
                text,
                is_retry,
            } => (index, text, is_retry),
            NextQuestion::Complete => {
                println!("\nAll questions answered correctly!");
                println!("Progress: {}", report::progress_bar(total, total));
                break;
            }
        };

        println!("\nProgress: {}", report::progress_bar(answered, total));
        if is_retry {
            println!("\nRe-asking question {} (previous answer was incorrect):", index + 1);
        } else {
            println!("\nQuestion {} of {}:", index + 1, total);
        }
        println!("Q: {text}");
        print!("\nYour answer: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!("\nInput closed, ending session.");
            break;
        };
        let answer = line.context("reading answer")?;

        match orchestrator.submit_answer(&answer).await? {
            SubmitOutcome::Accepted {
                reason,
                side_answers,
            } => {
                println!("ACCEPTED: {reason}");
                report_side_answers(&side_answers);
            }
            SubmitOutcome::Rejected {
                reason,
                side_answers,
            } => {
                println!("REJECTED: {reason}");
                println!("This question will be asked again. Please try again later.");
                report_side_answers(&side_answers);
            }
            SubmitOutcome::RePrompt { reason } => {
                println!("{reason}. Please provide a more specific answer.");
            }
            SubmitOutcome::Quit => {
                println!("\nQuestionnaire stopped.");
                break;
            }
            SubmitOutcome::Complete => break,
        }
    }

    let report = orchestrator.finalize().await?;
    debug!(
        requests = gateway.stats().requests,
        retries = gateway.stats().retries,
        "session finished"
    );

    println!(
        "\nValid answers: {}/{}",
        report.answered, report.total
    );

    if report.accepted.is_empty() {
        println!("No valid answers collected. The original summary remains unchanged.");
    } else {
        println!("Generating enhanced summary...");
    }

    std::fs::write(&cli.output, report::render(&report))
        .with_context(|| format!("writing output to {}", cli.output.display()))?;
    println!("Results saved to: {}", cli.output.display());

    Ok(())
}

fn report_side_answers(side_answers: &[clarify_runtime::SideAnswer]) {
    for side in side_answers {
        if side.accepted {
            println!(
                "AUTO-ANSWERED: question {} from your answer: '{}'",
                side.index + 1,
                side.answer_text
            );
        } else {
            println!(
                "NOTE: your answer mentioned question {} but the extracted detail was rejected",
                side.index + 1
            );
        }
    }
}

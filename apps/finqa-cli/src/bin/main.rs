use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand};

use finqa_cli::display::render_outcome;
use finqa_cli::runtime::{build_pipeline, load_settings};
use finqa_cli::init_tracing;
use finqa_hybrid::FinqaPipeline;

#[derive(Parser)]
#[command(name = "finqa")]
#[command(about = "Answer questions about financial statements")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer one question and exit
    Ask {
        /// The question, e.g. "What is the total revenue for 2023?"
        question: String,
    },
    /// Read questions from stdin until EOF or `exit`
    Shell,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = load_settings()?;
    let base = std::env::current_dir()?;
    let pipeline = build_pipeline(&settings, &base)?;

    match cli.command {
        Command::Ask { question } => {
            print!("{}", render_outcome(&pipeline.ask(&question)?));
        }
        Command::Shell => shell(&pipeline)?,
    }
    Ok(())
}

fn shell(pipeline: &FinqaPipeline) -> anyhow::Result<()> {
    println!("finqa: ask a question about the financial statements (`exit` to quit)");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        match pipeline.ask(&line) {
            Ok(outcome) => print!("{}", render_outcome(&outcome)),
            Err(e) => {
                tracing::error!(error = %e, "question failed");
                eprintln!("Error: {e:#}");
            }
        }
    }
    Ok(())
}

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

use finqa_cli::init_tracing;
use finqa_cli::runtime::{build_index, load_settings};

#[derive(Parser)]
#[command(name = "finqa-indexer")]
#[command(about = "Embed the corpus and write the vector index")]
struct Args {
    /// Corpus JSON file (defaults to data.corpus_path)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Output artifact (defaults to data.vector_index_path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let mut settings = load_settings()?;
    if let Some(corpus) = args.corpus {
        settings.data.corpus_path = corpus.to_string_lossy().into_owned();
    }
    if let Some(output) = args.output {
        settings.data.vector_index_path = output.to_string_lossy().into_owned();
    }
    let base = std::env::current_dir()?;

    println!("finqa indexer\n=============");
    println!("Corpus: {}", settings.data.corpus_path);
    println!("Index:  {}", settings.data.vector_index_path);
    let show_progress = !args.no_progress && std::io::stderr().is_terminal();
    let manifest = build_index(&settings, &base, show_progress)?;

    println!("\n✅ Indexed {} chunks (dim {}) with {}", manifest.count, manifest.dim, manifest.embedder);
    println!("💡 Ask a question with: finqa ask '<question>'");
    Ok(())
}

use clap::Parser;

use finqa_cli::display::{render_fused, render_ranked};
use finqa_cli::init_tracing;
use finqa_cli::runtime::{build_retrieval, load_settings, Retrieval};

#[derive(Parser)]
#[command(name = "finqa-search")]
#[command(about = "Show fused and re-ranked candidates for a query without generating an answer")]
struct Args {
    /// Search query
    query: String,

    /// Maximum results (defaults to retrieval.top_k)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print the re-ranked candidates as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let settings = load_settings()?;
    let base = std::env::current_dir()?;
    let Retrieval { retriever, reranker } = build_retrieval(&settings, &base)?;

    let limit = args.limit.unwrap_or(settings.retrieval.top_k);
    let fused = retriever.search(&args.query, limit)?;
    if !args.json {
        println!("Query: {}\n\nFused ({} results):", args.query, fused.len());
        print!("{}", render_fused(&fused));
    }
    let ranked = reranker.rerank(&args.query, fused)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        println!("\nRe-ranked:");
        print!("{}", render_ranked(&ranked));
    }
    Ok(())
}

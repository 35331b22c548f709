use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rhymegraph_core::{Config, Pipeline};

#[derive(Parser)]
#[command(name = "rhymegraph")]
#[command(about = "Phonetic rhyme knowledge-base builder", long_about = None)]
struct Cli {
    /// Config file to use instead of rhymegraph.toml / the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the graph database
    Init,
    /// Crawl the alphabetical word index
    Crawl {
        /// Restrict the crawl to a single index letter
        #[arg(long)]
        letter: Option<char>,
    },
    /// Fetch word detail pages and record rhyme edges
    Enrich,
    /// Cluster words into families, filter and export
    Analyze,
    /// Run crawl, enrich and analyze in sequence
    Run,
    /// Show store counters
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Init => {
            let pipeline = Pipeline::open(config).await?;
            pipeline.initialize().await?;
            println!(
                "Initialized rhyme graph in {}",
                pipeline.config().storage.db_path().display()
            );
            println!("\nDefault configuration (save as rhymegraph.toml to customize):\n");
            println!("{}", Config::default_config_string());
        }
        Commands::Crawl { letter } => {
            let pipeline = Pipeline::open(config).await?;
            match letter {
                Some(letter) => {
                    let stats = pipeline.crawl_letter(letter.to_ascii_uppercase()).await?;
                    println!(
                        "Discovered {} new words from {} pages",
                        stats.words_discovered, stats.pages_fetched
                    );
                }
                None => {
                    let alphabet: Vec<char> =
                        pipeline.config().crawl.alphabet.chars().collect();
                    let bar = ProgressBar::new(alphabet.len() as u64);
                    bar.set_style(
                        ProgressStyle::with_template(
                            "[{bar:30.cyan/blue}] {pos}/{len} {msg}",
                        )?
                        .progress_chars("#>-"),
                    );
                    let mut discovered = 0usize;
                    for letter in alphabet {
                        bar.set_message(format!("letter {}", letter));
                        let stats = pipeline.crawl_letter(letter).await?;
                        discovered += stats.words_discovered;
                        bar.inc(1);
                    }
                    bar.finish_with_message(format!("{} new words", discovered));
                }
            }
        }
        Commands::Enrich => {
            let pipeline = Pipeline::open(config).await?;
            let stats = pipeline.enrich_details().await?;
            println!(
                "Attempted {} words ({} pages fetched, {} edges added)",
                stats.words_attempted, stats.pages_fetched, stats.edges_added
            );
        }
        Commands::Analyze => {
            let pipeline = Pipeline::open(config).await?;
            let report = pipeline.analyze_and_export().await?;
            println!(
                "Exported {} families ({} words filtered out)",
                report.families, report.removed
            );
        }
        Commands::Run => {
            let pipeline = Pipeline::open(config).await?;
            let report = pipeline.run_all().await?;
            println!(
                "Done: {} families exported, {} words filtered out",
                report.families, report.removed
            );
        }
        Commands::Stats => {
            let pipeline = Pipeline::open(config).await?;
            let stats = pipeline.stats().await?;
            println!("Words:    {}", stats.words);
            println!("Enriched: {}", stats.enriched);
            println!("Edges:    {}", stats.edges);
            println!("Families: {}", stats.families);

            let summaries = pipeline.family_summaries().await?;
            if !summaries.is_empty() {
                println!("\nLargest families:");
                for summary in summaries.iter().take(5) {
                    println!(
                        "  {} ({} words): {}",
                        summary.family_key, summary.count, summary.example_words
                    );
                }
            }
        }
    }

    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dailynews::models::{parse_language_list, RunDate};
use dailynews::{
    Config, ContentFetcher, DigestPipeline, FeedCollector, GeminiProvider, JournalWriter,
    PipelineConfig, RetryPolicy, Retrying, RunOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "dailynews")]
#[command(version = "0.1.0")]
#[command(about = "Generate a daily game programming & AI news post from RSS feeds")]
struct Args {
    /// Root of the site repository (posts go to <root>/content/journal)
    #[arg(long)]
    output_root: Option<PathBuf>,

    /// Maximum number of articles to select
    #[arg(long)]
    max_articles: Option<usize>,

    /// Comma separated output languages (en, ko)
    #[arg(long)]
    languages: Option<String>,

    /// Only write the English post
    #[arg(long)]
    no_translate: bool,

    /// Gemini model id
    #[arg(long)]
    model: Option<String>,

    /// Print the generated posts instead of writing them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("dailynews=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration; a missing key stops us before any network call
    let mut config = Config::from_env()?;
    apply_overrides(&mut config, &args)?;

    let pipeline_config = PipelineConfig::from(&config);

    // Initialize clients
    let llm = Retrying::new(
        GeminiProvider::new(config.gemini_api_key.clone(), Some(config.model.clone()))?,
        RetryPolicy::new(config.llm_max_attempts, config.llm_retry_delay),
    );
    let feeds = FeedCollector::with_default_sources()?;
    let content = ContentFetcher::new()?;
    let writer = JournalWriter::new(&config.target_repo_path);

    let pipeline = DigestPipeline::new(feeds, content, llm, writer, pipeline_config)?;
    let run = RunDate::now(config.utc_offset);

    tracing::info!("Generating news post for {}", run.date_key());
    let outcome = if args.dry_run {
        pipeline.build_digest(&run).await?
    } else {
        pipeline.run(&run).await?
    };

    match outcome {
        RunOutcome::NoRecentItems => {
            tracing::info!("No recent articles in the last 24 hours, nothing to publish");
        }
        RunOutcome::NoRelevantArticles => {
            tracing::info!("No relevant articles today, nothing to publish");
        }
        RunOutcome::Drafted(digest) => {
            for variant in &digest.variants {
                println!("<!-- {} -->", digest.file_name(variant));
                println!("{}", variant.post.render());
            }
        }
        RunOutcome::Published { digest, files } => {
            tracing::info!(
                "Published {} article(s) in {} file(s)",
                digest.article_count,
                files.len()
            );
            for file in files {
                tracing::info!("  {}", file.display());
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, args: &Args) -> anyhow::Result<()> {
    if let Some(ref root) = args.output_root {
        config.target_repo_path = root.clone();
    }
    if let Some(max) = args.max_articles {
        config.selection_cap = max;
    }
    if let Some(ref languages) = args.languages {
        config.languages = parse_language_list(languages)?;
    }
    if args.no_translate {
        config.enable_translation = false;
    }
    if let Some(ref model) = args.model {
        config.model = model.clone();
    }
    Ok(())
}

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::Instrument;

mod run;

#[derive(Debug, Parser)]
#[command(name = "budfeed")]
#[command(about = "Dispensary menu crawler feeding the budrecommender backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Crawl one storefront and submit its products to the backend.
    Crawl {
        /// Site key; `budfeed sites` lists the supported ones.
        #[arg(long)]
        site: String,
        /// Maximum number of products to crawl; 0 means all.
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// List the supported site keys.
    Sites,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Sites => {
            for key in budfeed_crawler::adapter::known_keys() {
                println!("{key}");
            }
            Ok(())
        }
        Commands::Crawl { site, limit } => crawl(&site, limit).await,
    }
}

async fn crawl(site_key: &str, limit: usize) -> anyhow::Result<()> {
    // Configuration problems are fatal before any navigation happens.
    let config = budfeed_core::load_app_config()?;
    init_tracing(&config.log_level)?;

    let site = budfeed_crawler::adapter::by_key(site_key)?;
    let client = budfeed_crawler::SubmitClient::from_config(&config)?;
    let waits = budfeed_crawler::Waits::from_config(&config);
    let mut pacer =
        budfeed_crawler::Pacer::new(Duration::from_millis(config.inter_item_delay_ms));

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("crawl_run", run_id = %run_id, site = site.key, limit);

    let session = budfeed_crawler::ChromeSession::launch(&config).await?;
    let summary = match session.new_page(&config).await {
        Ok(mut page) => {
            let summary =
                run::run_crawl(&mut page, site, &client, &waits, &mut pacer, limit)
                    .instrument(span)
                    .await;
            session.close().await;
            summary
        }
        Err(err) => {
            session.close().await;
            return Err(err.into());
        }
    };

    tracing::info!(
        run_id = %run_id,
        site = site.key,
        links_found = summary.links_found,
        attempted = summary.attempted,
        extracted = summary.extracted,
        submitted = summary.submitted,
        failed = summary.failed,
        "crawl run complete"
    );
    Ok(())
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level)
        .map_err(|e| anyhow::anyhow!("invalid BUDFEED_LOG_LEVEL \"{log_level}\": {e}"))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

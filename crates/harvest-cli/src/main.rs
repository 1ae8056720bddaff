mod export;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use harvest_browser::{BrowserSession, DeviceProfile, LaunchOptions};
use harvest_core::{AppConfig, MerchantId, PriceField};
use harvest_scraper::{crawl_listing, CrawlConfig, CrawlOutcome};

#[derive(Debug, Parser)]
#[command(name = "kaspi-harvest")]
#[command(about = "Harvest the full product catalog of a Kaspi merchant's infinite-scroll listing")]
struct Cli {
    /// Numerical merchant id, e.g. 30108317.
    merchant_id: MerchantId,

    /// Milliseconds to pause between scroll cycles.
    #[arg(long)]
    scroll_pause_ms: Option<u64>,

    /// Seconds to wait for the first product card before giving up.
    #[arg(long)]
    initial_load_timeout_secs: Option<u64>,

    /// Consecutive no-new-item cycles that end the crawl.
    #[arg(long)]
    max_empty_scrolls: Option<u32>,

    /// Hard cap on total scroll cycles (0 = unlimited).
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Which card price node to record: origin or current.
    #[arg(long)]
    price_field: Option<PriceField>,

    /// Directory the CSV lands in.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Exact output file; overrides the kaspi_merchant_<id>.csv default.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run the browser with a visible window.
    #[arg(long)]
    headful: bool,

    /// Explicit Chrome/Chromium binary.
    #[arg(long)]
    chrome_executable: Option<PathBuf>,
}

/// Flags win over environment-derived configuration.
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(v) = cli.scroll_pause_ms {
        config.scroll_pause_ms = v;
    }
    if let Some(v) = cli.initial_load_timeout_secs {
        config.initial_load_timeout_secs = v;
    }
    if let Some(v) = cli.max_empty_scrolls {
        config.max_empty_scrolls = v;
    }
    if let Some(v) = cli.max_cycles {
        config.max_cycles = v;
    }
    if let Some(v) = cli.price_field {
        config.price_field = v;
    }
    if let Some(dir) = &cli.output_dir {
        config.output_dir = dir.clone();
    }
    if cli.headful {
        config.headless = false;
    }
    if let Some(path) = &cli.chrome_executable {
        config.chrome_executable = Some(path.clone());
    }
}

fn default_output_path(config: &AppConfig, merchant_id: &MerchantId) -> PathBuf {
    config
        .output_dir
        .join(format!("kaspi_merchant_{merchant_id}.csv"))
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = harvest_core::load_app_config_from_env().context("invalid configuration")?;
    apply_overrides(&mut config, &cli);
    init_tracing(&config.log_level);

    let options = LaunchOptions {
        headful: !config.headless,
        chrome_executable: config.chrome_executable.clone(),
        profile: DeviceProfile {
            user_agent: config.user_agent.clone(),
            width: config.viewport_width,
            height: config.viewport_height,
            ..DeviceProfile::default()
        },
    };
    let session = BrowserSession::launch(&options)
        .await
        .context("failed to launch the browser session")?;

    let url = cli.merchant_id.listing_url();
    let crawl_config = CrawlConfig::from(&config);
    let report = crawl_listing(session, &url, &crawl_config).await;

    // The session is already released; export and summarize whatever was
    // accumulated, even on the failure paths.
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&config, &cli.merchant_id));
    let export_result = export::write_csv(&output_path, &report.records);

    println!(
        "Done! Total unique products found: {}.",
        report.records.len()
    );

    match report.outcome {
        CrawlOutcome::FeedExhausted | CrawlOutcome::CycleLimit => {}
        CrawlOutcome::InitialLoadTimeout => {
            anyhow::bail!("the listing page never loaded its first product card");
        }
        CrawlOutcome::SessionFailed(e) => {
            return Err(
                anyhow::Error::new(e).context("the crawl was aborted by a session failure")
            );
        }
    }
    export_result.context("failed to export the collected records")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli(merchant: &str) -> Cli {
        Cli::parse_from(["kaspi-harvest", merchant])
    }

    #[test]
    fn merchant_id_is_required_and_validated() {
        assert!(Cli::try_parse_from(["kaspi-harvest"]).is_err());
        assert!(Cli::try_parse_from(["kaspi-harvest", "not-numeric"]).is_err());
        let cli = Cli::try_parse_from(["kaspi-harvest", "30108317"]).unwrap();
        assert_eq!(cli.merchant_id.as_str(), "30108317");
    }

    #[test]
    fn flags_override_config() {
        let mut config = harvest_core::load_app_config_from_env().unwrap();
        let cli = Cli::parse_from([
            "kaspi-harvest",
            "42",
            "--scroll-pause-ms",
            "200",
            "--max-empty-scrolls",
            "7",
            "--price-field",
            "current",
            "--headful",
        ]);
        apply_overrides(&mut config, &cli);
        assert_eq!(config.scroll_pause_ms, 200);
        assert_eq!(config.max_empty_scrolls, 7);
        assert_eq!(config.price_field, PriceField::Current);
        assert!(!config.headless);
    }

    #[test]
    fn defaults_left_alone_without_flags() {
        let mut config = harvest_core::load_app_config_from_env().unwrap();
        let expected = config.clone();
        let cli = base_cli("42");
        apply_overrides(&mut config, &cli);
        assert_eq!(config.scroll_pause_ms, expected.scroll_pause_ms);
        assert_eq!(config.max_empty_scrolls, expected.max_empty_scrolls);
        assert_eq!(config.headless, expected.headless);
    }

    #[test]
    fn output_path_includes_merchant_id() {
        let mut config = harvest_core::load_app_config_from_env().unwrap();
        config.output_dir = PathBuf::from("/tmp/exports");
        let merchant: MerchantId = "30108317".parse().unwrap();
        assert_eq!(
            default_output_path(&config, &merchant),
            PathBuf::from("/tmp/exports/kaspi_merchant_30108317.csv")
        );
    }
}

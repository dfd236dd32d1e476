use anyhow::Context;
use clap::Parser;
use quantfolio_core::analytics::http::HttpAnalyticsService;
use quantfolio_core::domain::asset::AssetCatalog;
use quantfolio_core::error::ErrorKind;
use quantfolio_core::orchestrator::{AnalysisOrchestrator, DashboardState};
use quantfolio_core::view::DashboardView;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod selection;

#[derive(Debug, Parser)]
#[command(name = "quantfolio")]
struct Args {
    /// Comma-separated ticker symbols (e.g. AAPL,MSFT,GOOGL). Defaults to AAPL,MSFT,GOOGL.
    #[arg(long)]
    assets: Option<String>,

    /// Comma-separated weights in the same order as --assets (e.g. "0.4, 0.3, 0.3").
    #[arg(long)]
    weights: Option<String>,

    /// Print the asset catalog and exit.
    #[arg(long)]
    list_assets: bool,

    /// Probe the analytics service and exit.
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = quantfolio_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    if args.list_assets {
        for asset in AssetCatalog.all() {
            println!("{:<6} {}", asset.symbol, asset.label);
        }
        return Ok(());
    }

    let service = HttpAnalyticsService::from_settings(&settings)?;

    if args.health {
        let banner = service.health().await.with_context(|| {
            format!("analytics service at {} is not healthy", service.base_url())
        })?;
        println!("{banner}");
        return Ok(());
    }

    let opts = selection::SelectionOptions::from_settings(&settings)
        .with_overrides(args.assets, args.weights);
    let assets = selection::resolve_selection(&AssetCatalog, opts.assets.as_deref())?;

    let mut orchestrator =
        AnalysisOrchestrator::new(Arc::new(service)).with_inputs(assets, opts.weights_text);
    tracing::info!(
        base_url = %settings.analytics_base_url,
        hint = %orchestrator.weight_count_hint(),
        "running portfolio analysis"
    );

    match orchestrator.analyze().await {
        DashboardState::Populated {
            analysis,
            completed_at,
        } => {
            let view = DashboardView::build(analysis);
            println!("{}", serde_json::to_string_pretty(&view)?);
            tracing::info!(%completed_at, "dashboard view rendered");
            Ok(())
        }
        DashboardState::Idle { error: Some(err) } => {
            let kind = err.kind;
            let err = anyhow::Error::new(err.clone());
            if kind == ErrorKind::Service {
                sentry_anyhow::capture_anyhow(&err);
            }
            tracing::error!(?kind, error = %err, "analysis failed");
            Err(err)
        }
        other => anyhow::bail!("analysis ended in unexpected state: {}", other.name()),
    }
}

fn init_sentry(settings: &quantfolio_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

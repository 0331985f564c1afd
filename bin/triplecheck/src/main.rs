use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::{AlertSink, CandleSource, Config};
use engine::{BinanceClient, MarketAnalyzer, Scanner};
use strategy::{SignalEngine, StrategyParams};
use telegram_alert::{start_bot, BotDeps, TelegramNotifier};

#[tokio::main]
async fn main() {
    let started_at = Instant::now();

    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().unwrap_or_else(|e| panic!("{e}"));
    let params = match &cfg.strategy_config_path {
        Some(path) => StrategyParams::load(path).unwrap_or_else(|e| panic!("{e}")),
        None => StrategyParams::default(),
    };
    params
        .validate()
        .and_then(|()| params.check_window(cfg.market.limit))
        .unwrap_or_else(|e| panic!("{e}"));

    info!(
        symbol = %cfg.market.symbol,
        interval = %cfg.market.interval,
        limit = cfg.market.limit,
        "TripleCheck starting"
    );
    if cfg.telegram_allowed_user_ids.is_empty() {
        warn!("TELEGRAM_ALLOWED_USER_IDS not set; commands are open to any user");
    }

    // ── Market data + signal engine ───────────────────────────────────────────
    let source: Arc<dyn CandleSource> = Arc::new(
        BinanceClient::new(&cfg.binance_base_url, cfg.http_timeout)
            .unwrap_or_else(|e| panic!("{e}")),
    );
    let analyzer = Arc::new(MarketAnalyzer::new(
        source,
        SignalEngine::new(params),
        cfg.market.clone(),
    ));

    // ── Telegram ──────────────────────────────────────────────────────────────
    let bot = teloxide::Bot::new(cfg.telegram_token.clone());
    let notifier: Arc<dyn AlertSink> = Arc::new(TelegramNotifier::new(bot.clone(), cfg.chat_id));
    let bot_deps = BotDeps {
        analyzer: analyzer.clone(),
        started_at,
        allowed_user_ids: Arc::new(cfg.telegram_allowed_user_ids.clone()),
    };

    // ── Scanner ───────────────────────────────────────────────────────────────
    let scanner = Scanner::new(
        analyzer,
        notifier,
        cfg.alert_policy,
        cfg.scan_interval,
        cfg.scan_first_delay,
    );

    // ── Spawn all tasks ───────────────────────────────────────────────────────
    tokio::spawn(scanner.run());
    tokio::spawn(start_bot(bot, bot_deps));

    // Keep main alive
    info!("All subsystems started. Waiting for shutdown signal.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received. Exiting.");
}

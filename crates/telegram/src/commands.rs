use std::sync::Arc;
use std::time::Instant;

use teloxide::{
    dispatching::UpdateHandler, prelude::*, update_listeners::Polling,
    utils::command::BotCommands,
};
use tracing::{info, warn};

use engine::{MarketAnalyzer, StatusReport};

use crate::format::status_text;

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Dependencies injected into every handler via `dptree`.
#[derive(Clone)]
pub struct BotDeps {
    pub analyzer: Arc<MarketAnalyzer>,
    pub started_at: Instant,
    /// Empty means every user may issue commands.
    pub allowed_user_ids: Arc<Vec<i64>>,
}

/// Telegram bot commands exposed to the operator.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "TripleCheck commands:")]
pub enum Command {
    #[command(description = "Live price, trend, RSI, health and uptime")]
    Status,
    #[command(description = "Show this help")]
    Help,
}

/// Start the Telegram bot in long-polling mode, skipping updates that queued
/// up while the bot was offline.
pub async fn start_bot(bot: Bot, deps: BotDeps) {
    let deps = Arc::new(deps);
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    info!("Telegram bot starting (long-polling)");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![deps])
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Telegram update listener error"),
        )
        .await;
}

fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Status].endpoint(handle_status))
        .branch(case![Command::Help].endpoint(handle_help));

    Update::filter_message()
        .filter_map(|msg: Message| msg.from().map(|u| u.id))
        .filter_async(auth_filter)
        .branch(command_handler)
}

/// Silently drop messages from users not in the allowed list.
async fn auth_filter(user_id: UserId, deps: Arc<BotDeps>) -> bool {
    let uid = user_id.0 as i64;
    let allowed = is_allowed(&deps.allowed_user_ids, uid);
    if !allowed {
        warn!(user_id = uid, "Unauthorized Telegram access attempt");
    }
    allowed
}

fn is_allowed(allowed_user_ids: &[i64], uid: i64) -> bool {
    allowed_user_ids.is_empty() || allowed_user_ids.contains(&uid)
}

async fn handle_status(bot: Bot, msg: Message, deps: Arc<BotDeps>) -> HandlerResult {
    let report = StatusReport::collect(&deps.analyzer, deps.started_at).await;
    bot.send_message(msg.chat.id, status_text(&report)).await?;
    Ok(())
}

async fn handle_help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

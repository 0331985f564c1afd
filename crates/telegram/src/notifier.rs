use async_trait::async_trait;
use teloxide::prelude::*;

use common::{Alert, AlertSink, Error, Result};

use crate::format::alert_text;

/// Pushes scanner alerts to a single chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat_id: i64) -> Self {
        Self {
            bot,
            chat_id: ChatId(chat_id),
        }
    }
}

#[async_trait]
impl AlertSink for TelegramNotifier {
    async fn deliver(&self, alert: &Alert) -> Result<()> {
        self.bot
            .send_message(self.chat_id, alert_text(alert))
            .await
            .map_err(|e| Error::Telegram(e.to_string()))?;
        Ok(())
    }
}

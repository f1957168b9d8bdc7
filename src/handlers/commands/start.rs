//! Start command handler

use teloxide::prelude::*;

use super::send_html;
use crate::utils::errors::Result;

/// Handle /start command
pub async fn handle_start(bot: Bot, chat_id: ChatId) -> Result<()> {
    let text = "👋 <b>Welcome to Smart Util!</b>\n\n\
        Generate and check test card numbers straight from the chat.\n\
        Send /help to see every command.";

    send_html(&bot, chat_id, text).await
}

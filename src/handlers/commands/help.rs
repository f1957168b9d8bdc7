//! Help command handler

use teloxide::prelude::*;

use super::{extp, gen, luhn, mgen, send_html, stats};
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(bot: Bot, chat_id: ChatId) -> Result<()> {
    let help_text = format!(
        "🤖 <b>Smart Util Help</b>\n\n\
        /start - Start the bot\n\
        /help - Show this help message\n\n\
        {}\n\n{}\n\n{}\n\n{}\n\n{}",
        gen::USAGE,
        mgen::USAGE,
        extp::USAGE,
        luhn::USAGE,
        stats::USAGE
    );

    send_html(&bot, chat_id, help_text).await
}

//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks

pub mod regenerate;

use teloxide::{prelude::*, types::ChatId};
use tracing::{debug, warn};

use crate::handlers::commands::gen::REGENERATE_CALLBACK;
use crate::middleware::spawn_guarded;
use crate::state::AppContext;
use crate::utils::errors::Result;

/// Main callback query dispatcher
pub async fn handle_callback_query(bot: Bot, query: CallbackQuery, ctx: AppContext) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let chat_id = query
        .message
        .as_ref()
        .map(|m| m.chat().id)
        .unwrap_or(ChatId(user_id));

    let Some(data) = query.data.clone() else {
        debug!(user_id = user_id, "Callback query without data");
        bot.answer_callback_query(query.id.clone()).await?;
        return Ok(());
    };

    ctx.logging.log_callback(user_id, &data);

    match data.as_str() {
        REGENERATE_CALLBACK => {
            let task = regenerate::handle_regenerate(bot.clone(), query, ctx.clone());
            spawn_guarded(bot, chat_id, user_id, ctx.guard.clone(), ctx.logging.clone(), "regen", task);
        }
        _ => {
            warn!(user_id = user_id, callback_data = %data, "Unknown callback data");
            bot.answer_callback_query(query.id.clone()).await?;
        }
    }

    Ok(())
}

//! "Regenerate" button handler

use teloxide::{prelude::*, types::ParseMode};

use crate::handlers::commands::gen;
use crate::state::{AppContext, SessionKey};
use crate::utils::errors::{Result, SmartUtilError};
use crate::utils::logging::log_user_action;

/// Plain-text alert shown on the button for errors the user can act on
fn alert_text(error: &SmartUtilError) -> Option<String> {
    match error {
        SmartUtilError::SessionExpired => Some("This session has expired. Send /gen again.".to_string()),
        SmartUtilError::Card(e) => Some(e.to_string()),
        _ => None,
    }
}

/// Replace the message with a fresh batch from the stored request
pub async fn handle_regenerate(bot: Bot, query: CallbackQuery, ctx: AppContext) -> Result<()> {
    let user_id = query.from.id.0 as i64;
    let Some(message) = query.message.as_ref() else {
        bot.answer_callback_query(query.id.clone()).await?;
        return Ok(());
    };

    let chat_id = message.chat().id;
    let message_id = message.id();

    match gen::regenerate(&ctx, SessionKey::new(chat_id.0, user_id)).await {
        Ok(text) => {
            bot.answer_callback_query(query.id.clone()).await?;
            bot.edit_message_text(chat_id, message_id, text)
                .parse_mode(ParseMode::Html)
                .reply_markup(gen::regenerate_keyboard())
                .await?;
            Ok(())
        }
        Err(e) => match alert_text(&e) {
            Some(alert) => {
                log_user_action(user_id, "regenerate_refused", Some(&alert));
                bot.answer_callback_query(query.id.clone())
                    .text(alert)
                    .show_alert(true)
                    .await?;
                Ok(())
            }
            None => {
                bot.answer_callback_query(query.id.clone()).await?;
                Err(e)
            }
        },
    }
}

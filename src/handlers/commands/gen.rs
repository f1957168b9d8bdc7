//! /gen command handler
//!
//! Small batches are listed in the chat with a "Regenerate" button; the
//! request is kept in the user's session so the button can replay it. Larger
//! batches are sent as a text file.

use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode},
};
use tracing::debug;

use super::{send_cards_document, send_html};
use crate::card::GenRequest;
use crate::state::{AppContext, SessionKey};
use crate::utils::errors::{Result, SmartUtilError};
use crate::utils::helpers::{cards_file_name, format_file_caption, format_generation_message, render_cards_file};
use crate::utils::logging::log_generation;

/// Session entry holding the last inline `/gen` request
pub const SESSION_LAST_GEN: &str = "last_gen";

/// Callback data of the "Regenerate" button
pub const REGENERATE_CALLBACK: &str = "regen";

pub const USAGE: &str = "<b>Usage:</b> <code>/gen BIN|MM|YY|CVV AMOUNT</code>\n\
    Use <code>x</code> in the BIN for random digits and <code>xx</code>/<code>rnd</code> for a random field.\n\
    <b>Example:</b> <code>/gen 515462xxxx|12|xx|xxx 10</code>";

pub fn regenerate_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🔄 Regenerate",
        REGENERATE_CALLBACK,
    )]])
}

/// Handle /gen command
pub async fn handle_gen(bot: Bot, chat_id: ChatId, user_id: i64, args: String, ctx: AppContext) -> Result<()> {
    if args.trim().is_empty() {
        return send_html(&bot, chat_id, USAGE).await;
    }

    let request = GenRequest::parse(&args, ctx.settings.generator.default_amount)?;
    let spec = request.to_spec()?;
    let cards = ctx.generator.generate(&spec, request.amount)?;
    let as_file = cards.len() > ctx.settings.generator.inline_limit;

    debug!(user_id = user_id, bin = %spec.pattern, count = cards.len(), as_file = as_file, "Sending generated cards");

    if as_file {
        send_cards_document(
            &bot,
            chat_id,
            cards_file_name(spec.pattern.as_str(), cards.len()),
            render_cards_file(&cards),
            format_file_caption(spec.pattern.as_str(), Some(spec.network()), cards.len()),
        )
        .await?;
    } else {
        let text = format_generation_message(spec.pattern.as_str(), spec.network(), &cards);
        bot.send_message(chat_id, text)
            .parse_mode(ParseMode::Html)
            .reply_markup(regenerate_keyboard())
            .await?;
        remember_request(&ctx, SessionKey::new(chat_id.0, user_id), &request).await?;
    }

    log_generation(user_id, "gen", spec.pattern.as_str(), cards.len(), as_file);
    Ok(())
}

async fn remember_request(ctx: &AppContext, key: SessionKey, request: &GenRequest) -> Result<()> {
    let mut session = ctx.storage.load_or_new(key).await?;
    session.set(SESSION_LAST_GEN, request, ctx.storage.ttl())?;
    ctx.storage.save(&session).await
}

/// Replay the last inline `/gen` request of a session, returning the new message text
pub async fn regenerate(ctx: &AppContext, key: SessionKey) -> Result<String> {
    let mut session = ctx
        .storage
        .load(key)
        .await?
        .ok_or(SmartUtilError::SessionExpired)?;
    let request: GenRequest = session
        .get(SESSION_LAST_GEN)?
        .ok_or(SmartUtilError::SessionExpired)?;

    let spec = request.to_spec()?;
    let cards = ctx.generator.generate(&spec, request.amount)?;

    session.touch(ctx.storage.ttl());
    ctx.storage.save(&session).await?;

    log_generation(key.user_id, "regen", spec.pattern.as_str(), cards.len(), false);
    Ok(format_generation_message(spec.pattern.as_str(), spec.network(), &cards))
}

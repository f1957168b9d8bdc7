//! /extp command handler

use teloxide::prelude::*;

use super::{send_cards_document, send_html};
use crate::card::{ExtrapolateRequest, Extrapolation};
use crate::state::AppContext;
use crate::utils::errors::Result;
use crate::utils::helpers::{cards_file_name, format_file_caption, format_generation_message, render_cards_file};
use crate::utils::logging::log_generation;

pub const USAGE: &str = "<b>Usage:</b> <code>/extp CARD1 [CARD2 ...] AMOUNT</code>\n\
    With one sample the first digits are kept; with several, differing digits become random.\n\
    <b>Example:</b> <code>/extp 4539148803436467 4539148812436467 20</code>";

/// Handle /extp command
pub async fn handle_extp(bot: Bot, chat_id: ChatId, user_id: i64, args: String, ctx: AppContext) -> Result<()> {
    if args.trim().is_empty() {
        return send_html(&bot, chat_id, USAGE).await;
    }

    let request = ExtrapolateRequest::parse(&args, ctx.settings.generator.default_amount)?;
    let samples = request.sample_refs();
    let Extrapolation { pattern, cards } = ctx.extrapolator.extrapolate(&samples, request.amount)?;
    let as_file = cards.len() > ctx.settings.generator.inline_limit;

    if as_file {
        send_cards_document(
            &bot,
            chat_id,
            cards_file_name(pattern.as_str(), cards.len()),
            render_cards_file(&cards),
            format_file_caption(pattern.as_str(), Some(pattern.network()), cards.len()),
        )
        .await?;
    } else {
        send_html(&bot, chat_id, format_generation_message(pattern.as_str(), pattern.network(), &cards)).await?;
    }

    log_generation(user_id, "extp", pattern.as_str(), cards.len(), as_file);
    Ok(())
}

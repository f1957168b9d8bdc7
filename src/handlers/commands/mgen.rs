//! /mgen command handler

use teloxide::prelude::*;

use super::{send_cards_document, send_html};
use crate::card::{GeneratedCard, MultiGenRequest};
use crate::state::AppContext;
use crate::utils::errors::{Result, SmartUtilError};
use crate::utils::helpers::{format_file_caption, format_multi_generation_message, render_multi_cards_file};
use crate::utils::logging::log_generation;

pub const USAGE: &str = "<b>Usage:</b> <code>/mgen BIN1 BIN2 ... AMOUNT</code>\n\
    BINs may be separated by spaces or commas; AMOUNT cards are generated for each.\n\
    <b>Example:</b> <code>/mgen 400000 515462|12 5</code>";

/// Handle /mgen command
pub async fn handle_mgen(bot: Bot, chat_id: ChatId, user_id: i64, args: String, ctx: AppContext) -> Result<()> {
    if args.trim().is_empty() {
        return send_html(&bot, chat_id, USAGE).await;
    }

    let config = &ctx.settings.generator;
    let request = MultiGenRequest::parse(&args, config.default_amount)?;

    if request.requests.len() > config.max_bins {
        return Err(SmartUtilError::InvalidInput(format!(
            "At most {} BINs per request, got {}",
            config.max_bins,
            request.requests.len()
        )));
    }
    ctx.generator.check_count(request.total())?;

    let mut groups: Vec<(String, Vec<GeneratedCard>)> = Vec::with_capacity(request.requests.len());
    for single in &request.requests {
        let spec = single.to_spec()?;
        let cards = ctx.generator.generate(&spec, single.amount)?;
        groups.push((spec.pattern.as_str().to_string(), cards));
    }

    let total = request.total();
    let as_file = total > config.inline_limit;
    let bins = groups
        .iter()
        .map(|(bin, _)| bin.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    if as_file {
        send_cards_document(
            &bot,
            chat_id,
            format!("mgen_x{}.txt", total),
            render_multi_cards_file(&groups),
            format_file_caption(&bins, None, total),
        )
        .await?;
    } else {
        send_html(&bot, chat_id, format_multi_generation_message(&groups)).await?;
    }

    log_generation(user_id, "mgen", &bins, total, as_file);
    Ok(())
}

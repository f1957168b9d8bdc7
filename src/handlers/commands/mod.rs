//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /gen, etc.
//! Commands are parsed by teloxide, logged, and then run through the guarded
//! pipeline in [`crate::middleware::spawn_guarded`].

pub mod extp;
pub mod gen;
pub mod help;
pub mod luhn;
pub mod mgen;
pub mod start;
pub mod stats;

use teloxide::{
    prelude::*,
    types::{InputFile, ParseMode},
    utils::command::BotCommands,
};
use tracing::debug;

use crate::middleware::spawn_guarded;
use crate::state::AppContext;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Smart Util commands:")]
pub enum Command {
    #[command(description = "Start the bot and show welcome message")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Generate cards: /gen BIN|MM|YY|CVV AMOUNT")]
    Gen(String),
    #[command(description = "Generate cards for several BINs: /mgen BIN1 BIN2 AMOUNT")]
    Mgen(String),
    #[command(description = "Extrapolate cards from samples: /extp CARD1 CARD2 AMOUNT")]
    Extp(String),
    #[command(description = "Check a card number with the Luhn algorithm")]
    Luhn(String),
    #[command(description = "Show session and rate limit statistics (admin only)")]
    Stats(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Gen(_) => "gen",
            Command::Mgen(_) => "mgen",
            Command::Extp(_) => "extp",
            Command::Luhn(_) => "luhn",
            Command::Stats(_) => "stats",
        }
    }

    pub fn args(&self) -> &str {
        match self {
            Command::Start | Command::Help => "",
            Command::Gen(args)
            | Command::Mgen(args)
            | Command::Extp(args)
            | Command::Luhn(args)
            | Command::Stats(args) => args,
        }
    }
}

/// Entry point for command messages
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command, ctx: AppContext) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = msg.chat.id.0, "Ignoring command without sender");
        return Ok(());
    };

    let user_id = user.id.0 as i64;
    let chat_id = msg.chat.id;
    ctx.logging.log_command(user_id, chat_id.0, cmd.name(), cmd.args());

    let operation = cmd.name();
    let task = dispatch_command(bot.clone(), chat_id, user_id, cmd, ctx.clone());
    spawn_guarded(bot, chat_id, user_id, ctx.guard.clone(), ctx.logging.clone(), operation, task);

    Ok(())
}

/// Run the handler for a command that already passed the guard
pub async fn dispatch_command(
    bot: Bot,
    chat_id: ChatId,
    user_id: i64,
    cmd: Command,
    ctx: AppContext,
) -> Result<()> {
    match cmd {
        Command::Start => start::handle_start(bot, chat_id).await,
        Command::Help => help::handle_help(bot, chat_id).await,
        Command::Gen(args) => gen::handle_gen(bot, chat_id, user_id, args, ctx).await,
        Command::Mgen(args) => mgen::handle_mgen(bot, chat_id, user_id, args, ctx).await,
        Command::Extp(args) => extp::handle_extp(bot, chat_id, user_id, args, ctx).await,
        Command::Luhn(args) => luhn::handle_luhn(bot, chat_id, args).await,
        Command::Stats(args) => stats::handle_stats(bot, chat_id, user_id, args, ctx).await,
    }
}

/// Send an HTML message
pub(crate) async fn send_html(bot: &Bot, chat_id: ChatId, text: impl Into<String>) -> Result<()> {
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

/// Deliver results as a text document with an HTML caption
pub(crate) async fn send_cards_document(
    bot: &Bot,
    chat_id: ChatId,
    file_name: String,
    contents: Vec<u8>,
    caption: String,
) -> Result<()> {
    let file = InputFile::memory(contents).file_name(file_name);
    bot.send_document(chat_id, file)
        .caption(caption)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}

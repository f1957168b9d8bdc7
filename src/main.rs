//! Smart Util Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use teloxide::dispatching::UpdateHandler;
use teloxide::{prelude::*, types::Update, utils::command::BotCommands};
use tracing::{debug, error, info, warn};

use smart_util::{
    config::Settings,
    handlers::{handle_callback_query, handle_command, Command},
    state::{AppContext, StateStorage},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on drop
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", smart_util::info());

    // Initialize session storage
    info!(backend = ?settings.session.backend, "Connecting session storage...");
    let storage = Arc::new(StateStorage::from_config(&settings.session).await?);

    let cleanup_interval = Duration::from_secs(settings.session.cleanup_interval_seconds);
    let bot = Bot::new(&settings.bot.token);
    let ctx = AppContext::new(settings, storage);

    spawn_cleanup_task(ctx.clone(), cleanup_interval);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register bot commands");
    }

    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .default_handler(|upd| async move {
            debug!("Unhandled update: {:?}", upd.kind);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("Smart Util bot has been shut down.");

    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_commands),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Handle bot commands
async fn handle_commands(bot: Bot, msg: Message, cmd: Command, ctx: AppContext) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, ctx).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(bot: Bot, query: CallbackQuery, ctx: AppContext) -> HandlerResult {
    let user_id = query.from.id.0 as i64;

    if let Err(e) = handle_callback_query(bot, query, ctx).await {
        error!(user_id = user_id, error = %e, "Error handling callback query");
        return Err(e.into());
    }

    Ok(())
}

/// Periodically drop expired sessions and stale rate limit windows
fn spawn_cleanup_task(ctx: AppContext, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;

            match ctx.storage.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => debug!(removed = removed, "Expired sessions removed"),
                Err(e) => warn!(error = %e, "Session cleanup failed"),
            }

            let stale = ctx.guard.rate_limit().cleanup_old_entries();
            if stale > 0 {
                debug!(removed = stale, "Stale rate limit entries removed");
            }
        }
    });
}

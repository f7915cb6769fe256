use std::sync::Arc;

use tracing::{error, info, warn};

use crate::db::Snowflake;
use crate::error::AppError;
use crate::tracker::Tracker;

use super::commands;

/// Shared data accessible in all commands
pub struct Data {
    pub tracker: Arc<Tracker>,
}

impl std::fmt::Debug for Data {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Data")
            .field("tracker", &"<Tracker>")
            .finish()
    }
}

pub type Context<'a> = poise::Context<'a, Data, AppError>;

/// Guild the command runs in, recorded on the current span.
pub fn guild_of(ctx: &Context<'_>) -> Result<Snowflake, AppError> {
    let guild_id = ctx
        .guild_id()
        .ok_or_else(|| AppError::InvalidInput("This command must be used in a server.".into()))?;
    tracing::Span::current().record("guild_id", guild_id.get());
    Ok(Snowflake(guild_id.get()))
}

pub fn create_framework(data: Data) -> poise::Framework<Data, AppError> {
    poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::track(),
                commands::untrack(),
                commands::update(),
                commands::leaderboard(),
                commands::list(),
                commands::config(),
            ],
            on_error: |error| {
                Box::pin(async move {
                    handle_error(error).await;
                })
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!(
                    bot_name = %ready.user.name,
                    guild_count = ready.guilds.len(),
                    "🎮 Bot is ready"
                );
                Ok(data)
            })
        })
        .build()
}

/// Ephemeral reply to the user who ran the command; a failure to reply is only logged.
async fn reply_privately(ctx: Context<'_>, text: impl Into<String>) {
    let reply = poise::CreateReply::default()
        .content(text)
        .ephemeral(true);
    if let Err(e) = ctx.send(reply).await {
        warn!(error = %e, command = %ctx.command().name, "🎮 ⚠️ Could not send error reply");
    }
}

async fn handle_error(error: poise::FrameworkError<'_, Data, AppError>) {
    use poise::FrameworkError as Fe;

    match error {
        Fe::Command { error, ctx, .. } => {
            let command = ctx.command().name.as_str();
            let user_id = ctx.author().id.get();
            if error.is_rejection() {
                warn!(error = %error, command, user_id, "🎮 ⚠️ Command rejected");
            } else {
                error!(error = ?error, command, user_id, "🎮 ❌ Command failed");
            }
            reply_privately(ctx, error.user_message()).await;
        }
        Fe::CommandPanic { payload, ctx, .. } => {
            error!(
                panic = payload.as_deref().unwrap_or("<non-string payload>"),
                command = %ctx.command().name,
                "🎮 ❌ Command panicked"
            );
            reply_privately(ctx, "Something went wrong on our side.").await;
        }
        Fe::ArgumentParse {
            error, input, ctx, ..
        } => {
            warn!(
                error = %error,
                input = input.as_deref().unwrap_or(""),
                command = %ctx.command().name,
                "🎮 ⚠️ Invalid command argument"
            );
            let usage = match ctx.command().name.as_str() {
                "track" | "untrack" => " Expected a Riot ID like `Name#TAG`.",
                _ => "",
            };
            reply_privately(ctx, format!("Invalid argument: {error}.{usage}")).await;
        }
        Fe::GuildOnly { ctx, .. } => {
            reply_privately(ctx, "This command must be used in a server.").await;
        }
        Fe::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            warn!(
                permissions = %missing_permissions,
                command = %ctx.command().name,
                "🎮 ⚠️ Bot missing permissions"
            );
            reply_privately(ctx, format!("I am missing these permissions: {missing_permissions}"))
                .await;
        }
        Fe::MissingUserPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            let needed = missing_permissions
                .map(|perms| perms.to_string())
                .unwrap_or_else(|| "Manage Server".to_string());
            warn!(
                permissions = %needed,
                user_id = ctx.author().id.get(),
                command = %ctx.command().name,
                "🎮 ⚠️ User missing permissions"
            );
            reply_privately(ctx, format!("You need these permissions: {needed}")).await;
        }
        other => {
            error!(error = ?other, "🎮 ❌ Unhandled framework error");
        }
    }
}

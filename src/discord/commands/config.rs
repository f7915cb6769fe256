use poise::serenity_prelude::{self as serenity, Mentionable};
use tracing::{info, instrument};

use crate::db::Snowflake;
use crate::discord::bot::{Context, guild_of};
use crate::error::AppError;

/// Configure the bot for this server
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    subcommands("channel")
)]
pub async fn config(_ctx: Context<'_>) -> Result<(), AppError> {
    Ok(())
}

/// Set the channel for rank announcements
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
#[instrument(
    skip(ctx),
    fields(
        guild_id,
        user_id = %ctx.author().id,
        channel_id = %channel.id
    )
)]
pub async fn channel(
    ctx: Context<'_>,
    #[description = "Channel for rank announcements"]
    #[channel_types("Text")]
    channel: serenity::GuildChannel,
) -> Result<(), AppError> {
    let guild_id = guild_of(&ctx)?;
    let tracker = &ctx.data().tracker;

    tracker
        .set_notification_channel(guild_id, Snowflake(channel.id.get()))
        .await?;
    let tracked = tracker.list(guild_id).await?.len();
    info!(tracked, "📣 Announcement channel updated");

    let embed = serenity::CreateEmbed::new()
        .title("📣 Announcement channel set")
        .description(format!(
            "Rank changes of the {tracked} tracked player(s) will be posted in {}.",
            channel.mention()
        ))
        .color(0x3498db);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

use poise::serenity_prelude as serenity;
use tracing::instrument;

use crate::db::Snowflake;
use crate::discord::bot::{Context, guild_of};
use crate::error::AppError;
use crate::tracker::TrackOutcome;

/// Track a League of Legends player's solo queue rank
#[poise::command(slash_command, guild_only)]
#[instrument(
    skip(ctx),
    fields(guild_id, user_id = %ctx.author().id)
)]
pub async fn track(
    ctx: Context<'_>,
    #[description = "Riot ID, e.g. Name#TAG"] riot_id: String,
) -> Result<(), AppError> {
    let guild_id = guild_of(&ctx)?;
    let user_id = Snowflake(ctx.author().id.get());

    // Defer response since API calls might take a moment
    ctx.defer().await?;

    let (riot_id, outcome) = ctx
        .data()
        .tracker
        .track(guild_id, &riot_id, user_id)
        .await?;

    let (title, description, colour) = match outcome {
        TrackOutcome::Created | TrackOutcome::Subscribed => (
            "Player Tracked",
            format!("Now tracking **{riot_id}**"),
            0x00ff00,
        ),
        TrackOutcome::AlreadyTracked => (
            "Already Tracked",
            format!("**{riot_id}** is already being tracked in this server."),
            0x0099ff,
        ),
    };

    let embed = serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .color(colour);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

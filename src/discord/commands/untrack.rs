use poise::serenity_prelude as serenity;
use tracing::instrument;

use crate::discord::bot::{Context, guild_of};
use crate::error::AppError;

/// Stop tracking a League of Legends player
#[poise::command(slash_command, guild_only)]
#[instrument(
    skip(ctx),
    fields(guild_id, user_id = %ctx.author().id)
)]
pub async fn untrack(
    ctx: Context<'_>,
    #[description = "Riot ID, e.g. Name#TAG"] riot_id: String,
) -> Result<(), AppError> {
    let guild_id = guild_of(&ctx)?;

    let (riot_id, _) = ctx.data().tracker.untrack(guild_id, &riot_id).await?;

    let embed = serenity::CreateEmbed::new()
        .title("Player Untracked")
        .description(format!("Stopped tracking **{riot_id}**"))
        .color(0xff6600);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

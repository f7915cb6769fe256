use poise::serenity_prelude as serenity;

use crate::discord::bot::{Context, guild_of};
use crate::error::AppError;

use super::embed_description;

/// List all tracked players in this server
#[poise::command(slash_command, guild_only)]
pub async fn list(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_of(&ctx)?;

    let players = ctx.data().tracker.list(guild_id).await?;

    if players.is_empty() {
        ctx.say("No players are being tracked in this server.\nUse `/track` to add players.")
            .await?;
        return Ok(());
    }

    let lines = players
        .iter()
        .map(|player| {
            let added_by = player
                .communities
                .get(&guild_id)
                .map(|sub| format!(" (added by <@{}>)", sub.added_by))
                .unwrap_or_default();
            format!("- **{}**{}", player.key(), added_by)
        })
        .collect();

    let embed = serenity::CreateEmbed::new()
        .title(format!("Tracked Players ({})", players.len()))
        .description(embed_description(lines))
        .color(0x0099ff);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

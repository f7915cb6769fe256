use poise::serenity_prelude as serenity;

use crate::discord::bot::{Context, guild_of};
use crate::error::AppError;

use super::embed_description;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Show this server's solo queue leaderboard
#[poise::command(slash_command, guild_only)]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_of(&ctx)?;

    let entries = ctx.data().tracker.leaderboard(guild_id).await?;

    if entries.is_empty() {
        ctx.say("No players are being tracked in this server.\nUse `/track` to add players.")
            .await?;
        return Ok(());
    }

    let lines = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let place = MEDALS
                .get(i)
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{}.", i + 1));
            format!("{place} **{}** {}", entry.display_name, entry.snapshot())
        })
        .collect();

    let embed = serenity::CreateEmbed::new()
        .title("🏆 Solo Queue Leaderboard")
        .description(embed_description(lines))
        .color(0xf1c40f);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

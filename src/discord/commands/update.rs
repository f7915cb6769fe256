use poise::serenity_prelude as serenity;
use tracing::instrument;

use crate::discord::bot::{Context, guild_of};
use crate::error::AppError;
use crate::rank::ChangeKind;
use crate::tracker::UpdateOutcome;

use super::embed_description;

/// Refresh the ranks of every player tracked in this server
#[poise::command(slash_command, guild_only)]
#[instrument(skip(ctx), fields(guild_id, user_id = %ctx.author().id))]
pub async fn update(ctx: Context<'_>) -> Result<(), AppError> {
    let guild_id = guild_of(&ctx)?;

    ctx.defer().await?;

    let updates = match ctx.data().tracker.trigger_update(guild_id).await? {
        UpdateOutcome::NoneTracked => {
            ctx.say("No players are being tracked in this server.\nUse `/track` to add players.")
                .await?;
            return Ok(());
        }
        UpdateOutcome::Updated(updates) => updates,
    };

    let mut lines = Vec::with_capacity(updates.len());
    for update in &updates {
        let line = match &update.result {
            Ok(change) => match change.kind {
                ChangeKind::Promoted => format!("⬆️ {} (was {})", change.current, change.previous),
                ChangeKind::Demoted => format!("⬇️ {} (was {})", change.current, change.previous),
                ChangeKind::LpChanged { delta } => format!("{} ({delta:+} LP)", change.current),
                ChangeKind::Unchanged => change.current.to_string(),
            },
            Err(_) => "could not refresh, try again later".to_string(),
        };
        lines.push(format!("- **{}**: {}", update.riot_id, line));
    }

    let failed = updates.iter().filter(|u| u.result.is_err()).count();
    let embed = serenity::CreateEmbed::new()
        .title(format!("Ranks Updated ({})", updates.len() - failed))
        .description(embed_description(lines))
        .color(if failed == 0 { 0x00ff00 } else { 0xff6600 });

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

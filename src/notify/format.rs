use super::Announcement;
use crate::rank::{ChangeKind, RankChange};
use crate::riot::MatchSummary;

const GREEN: u32 = 0x2ECC71;
const RED: u32 = 0xE74C3C;
const BLUE: u32 = 0x3498DB;
const GREY: u32 = 0x95A5A6;

/// Announcement for a detected rank change, with the latest game when known.
pub fn rank_change_announcement(
    display_name: &str,
    change: &RankChange,
    last_match: Option<&MatchSummary>,
) -> Announcement {
    let (title, colour) = match change.kind {
        ChangeKind::Promoted => (format!("⬆️ {display_name} promoted!"), GREEN),
        ChangeKind::Demoted => (format!("⬇️ {display_name} demoted"), RED),
        ChangeKind::LpChanged { delta } if delta >= 0 => {
            (format!("📈 {display_name} gained {delta} LP"), BLUE)
        }
        ChangeKind::LpChanged { delta } => {
            (format!("📉 {display_name} lost {} LP", delta.unsigned_abs()), RED)
        }
        ChangeKind::Unchanged => (format!("{display_name} is unchanged"), GREY),
    };

    let mut fields = vec![
        ("Before".to_string(), change.previous.to_string(), true),
        ("Now".to_string(), change.current.to_string(), true),
    ];

    if let Some(game) = last_match {
        fields.push((
            "Last game".to_string(),
            format!(
                "{} on {} ({}/{}/{})",
                if game.win { "Win" } else { "Loss" },
                game.champion,
                game.kills,
                game.deaths,
                game.assists
            ),
            false,
        ));
    }

    Announcement {
        title,
        description: format!("**{display_name}** is now **{}**.", change.current),
        colour,
        fields,
    }
}

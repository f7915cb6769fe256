use std::cmp::Ordering;

use super::RankSnapshot;

/// What happened between two snapshots of the same player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Promoted,
    Demoted,
    LpChanged { delta: i64 },
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankChange {
    pub kind: ChangeKind,
    pub previous: RankSnapshot,
    pub current: RankSnapshot,
}

impl RankChange {
    pub fn is_changed(&self) -> bool {
        self.kind != ChangeKind::Unchanged
    }
}

/// Classify the move from `previous` to `current`.
///
/// Tier is checked first, then division, then LP: the first signal that moved decides the
/// kind, even when a lower signal moved the other way.
pub fn classify(previous: RankSnapshot, current: RankSnapshot) -> RankChange {
    let kind = match current.tier.rank().cmp(&previous.tier.rank()) {
        Ordering::Greater => ChangeKind::Promoted,
        Ordering::Less => ChangeKind::Demoted,
        Ordering::Equal => match current.division.rank().cmp(&previous.division.rank()) {
            Ordering::Greater => ChangeKind::Promoted,
            Ordering::Less => ChangeKind::Demoted,
            Ordering::Equal if current.league_points != previous.league_points => {
                ChangeKind::LpChanged {
                    delta: i64::from(current.league_points) - i64::from(previous.league_points),
                }
            }
            Ordering::Equal => ChangeKind::Unchanged,
        },
    };

    RankChange {
        kind,
        previous,
        current,
    }
}

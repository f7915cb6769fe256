use std::cmp::Reverse;

use super::{Division, RankSnapshot, Tier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub display_name: String,
    pub tier: Tier,
    pub division: Division,
    pub league_points: u32,
}

impl LeaderboardEntry {
    pub fn new(display_name: impl Into<String>, rank: RankSnapshot) -> Self {
        Self {
            display_name: display_name.into(),
            tier: rank.tier,
            division: rank.division,
            league_points: rank.league_points,
        }
    }

    pub fn snapshot(&self) -> RankSnapshot {
        RankSnapshot::new(self.tier, self.division, self.league_points)
    }
}

/// Sort highest rank first. Equal ranks keep their input order.
pub fn rank_entries(mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
    entries.sort_by_key(|entry| Reverse(entry.snapshot()));
    entries
}

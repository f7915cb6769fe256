//! Ranked ladder primitives shared by the poller, the store and the commands.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

mod classifier;
pub mod leaderboard;

pub use classifier::{ChangeKind, RankChange, classify};

/// Ranked tier, lowest to highest, plus the placeholder for players without a solo entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    #[default]
    Unranked,
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    /// Position on the ladder. `Unranked` sits below `Iron`.
    pub fn rank(self) -> i8 {
        match self {
            Self::Unranked => -1,
            Self::Iron => 0,
            Self::Bronze => 1,
            Self::Silver => 2,
            Self::Gold => 3,
            Self::Platinum => 4,
            Self::Emerald => 5,
            Self::Diamond => 6,
            Self::Master => 7,
            Self::Grandmaster => 8,
            Self::Challenger => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unranked => "UNRANKED",
            Self::Iron => "IRON",
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
            Self::Emerald => "EMERALD",
            Self::Diamond => "DIAMOND",
            Self::Master => "MASTER",
            Self::Grandmaster => "GRANDMASTER",
            Self::Challenger => "CHALLENGER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unranked => "Unranked",
            Self::Iron => "Iron",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Emerald => "Emerald",
            Self::Diamond => "Diamond",
            Self::Master => "Master",
            Self::Grandmaster => "Grandmaster",
            Self::Challenger => "Challenger",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UNRANKED" | "" => Ok(Self::Unranked),
            "IRON" => Ok(Self::Iron),
            "BRONZE" => Ok(Self::Bronze),
            "SILVER" => Ok(Self::Silver),
            "GOLD" => Ok(Self::Gold),
            "PLATINUM" => Ok(Self::Platinum),
            "EMERALD" => Ok(Self::Emerald),
            "DIAMOND" => Ok(Self::Diamond),
            "MASTER" => Ok(Self::Master),
            "GRANDMASTER" => Ok(Self::Grandmaster),
            "CHALLENGER" => Ok(Self::Challenger),
            _ => Err(format!("unknown tier: {s}")),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Division inside a tier. `None` is used by unranked players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Division {
    #[default]
    #[serde(rename = "")]
    None,
    IV,
    III,
    II,
    I,
}

impl Division {
    /// IV is the bottom of a tier and I the top, so the mapping runs against numeral order.
    pub fn rank(self) -> u8 {
        match self {
            Self::None => 0,
            Self::IV => 1,
            Self::III => 2,
            Self::II => 3,
            Self::I => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::IV => "IV",
            Self::III => "III",
            Self::II => "II",
            Self::I => "I",
        }
    }
}

impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::None),
            "IV" => Ok(Self::IV),
            "III" => Ok(Self::III),
            "II" => Ok(Self::II),
            "I" => Ok(Self::I),
            other => Err(format!("unknown division: {other}")),
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solo queue standing of a player at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RankSnapshot {
    pub tier: Tier,
    pub division: Division,
    pub league_points: u32,
}

impl RankSnapshot {
    pub fn new(tier: Tier, division: Division, league_points: u32) -> Self {
        Self {
            tier,
            division,
            league_points,
        }
    }

    pub fn is_unranked(&self) -> bool {
        self.tier == Tier::Unranked
    }

    fn sort_key(&self) -> (i8, u8, u32) {
        (self.tier.rank(), self.division.rank(), self.league_points)
    }
}

impl Ord for RankSnapshot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for RankSnapshot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RankSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unranked() {
            return f.write_str("Unranked");
        }
        match self.division {
            Division::None => write!(f, "{} ({} LP)", self.tier, self.league_points),
            division => write!(f, "{} {} ({} LP)", self.tier, division, self.league_points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_snapshot_is_unranked() {
        let snapshot = RankSnapshot::default();
        assert_eq!(snapshot.tier, Tier::Unranked);
        assert_eq!(snapshot.division, Division::None);
        assert_eq!(snapshot.league_points, 0);
        assert_eq!(snapshot.to_string(), "Unranked");
    }

    #[test]
    fn tier_and_division_parse_upstream_strings() {
        assert_eq!("GOLD".parse::<Tier>().unwrap(), Tier::Gold);
        assert_eq!("grandmaster".parse::<Tier>().unwrap(), Tier::Grandmaster);
        assert!("WOOD".parse::<Tier>().is_err());
        assert_eq!("III".parse::<Division>().unwrap(), Division::III);
        assert_eq!("".parse::<Division>().unwrap(), Division::None);
        assert!("V".parse::<Division>().is_err());
    }

    #[test]
    fn snapshot_serializes_with_fixed_names() {
        let snapshot = RankSnapshot::new(Tier::Gold, Division::II, 40);
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"tier": "GOLD", "division": "II", "league_points": 40})
        );

        let unranked = serde_json::to_value(RankSnapshot::default()).unwrap();
        assert_eq!(unranked["tier"], "UNRANKED");
        assert_eq!(unranked["division"], "");
    }

    #[test]
    fn ordering_uses_tier_then_division_then_lp() {
        let gold_iv = RankSnapshot::new(Tier::Gold, Division::IV, 99);
        let gold_iii = RankSnapshot::new(Tier::Gold, Division::III, 0);
        let plat_iv = RankSnapshot::new(Tier::Platinum, Division::IV, 0);

        assert!(gold_iii > gold_iv);
        assert!(plat_iv > gold_iii);
        assert!(RankSnapshot::default() < RankSnapshot::new(Tier::Iron, Division::IV, 0));
    }

    #[test]
    fn display_formats_apex_tiers_without_division() {
        let master = RankSnapshot::new(Tier::Master, Division::None, 120);
        assert_eq!(master.to_string(), "Master (120 LP)");
        let silver = RankSnapshot::new(Tier::Silver, Division::I, 5);
        assert_eq!(silver.to_string(), "Silver I (5 LP)");
    }
}

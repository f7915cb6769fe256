use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::identity::RiotId;
use crate::rank::RankSnapshot;

/// A Discord id (guild, channel or user), stored as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Snowflake(pub u64);

impl Snowflake {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for Snowflake {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = Snowflake;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal id string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Snowflake, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Snowflake, E> {
                Ok(Snowflake(v))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

/// Who added a player to a community, and when (unix seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub added_by: Snowflake,
    pub added_at: i64,
}

/// A `tracked_users` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedIdentity {
    pub game_name: String,
    pub tag_line: String,
    pub puuid: String,
    #[serde(default)]
    pub rank: RankSnapshot,
    #[serde(default)]
    pub subscribers: Vec<Snowflake>,
    #[serde(default)]
    pub communities: BTreeMap<Snowflake, Subscription>,
}

impl TrackedIdentity {
    pub fn new(riot_id: &RiotId, puuid: String, rank: RankSnapshot) -> Self {
        Self {
            game_name: riot_id.game_name.clone(),
            tag_line: riot_id.tag_line.clone(),
            puuid,
            rank,
            subscribers: Vec::new(),
            communities: BTreeMap::new(),
        }
    }

    pub fn riot_id(&self) -> RiotId {
        RiotId {
            game_name: self.game_name.clone(),
            tag_line: self.tag_line.clone(),
        }
    }

    pub fn key(&self) -> String {
        format!("{}#{}", self.game_name, self.tag_line)
    }

    pub fn is_subscribed(&self, community: Snowflake) -> bool {
        self.subscribers.contains(&community)
    }
}

/// A `guild_config` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityConfig {
    #[serde(default)]
    pub channel_id: Option<Snowflake>,
}

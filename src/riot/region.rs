use std::str::FromStr;

use crate::error::AppError;

/// Riot platform a bot instance polls. League-V4 is served by the platform host, Account-V1
/// and Match-V5 by the regional cluster the platform belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    BR1,
    LA1,
    LA2,
    NA1,
    JP1,
    KR,
    EUN1,
    EUW1,
    ME1,
    RU,
    TR1,
    OC1,
    PH2,
    SG2,
    TH2,
    TW2,
    VN2,
}

impl Platform {
    const ALL: [Platform; 17] = [
        Self::BR1,
        Self::LA1,
        Self::LA2,
        Self::NA1,
        Self::JP1,
        Self::KR,
        Self::EUN1,
        Self::EUW1,
        Self::ME1,
        Self::RU,
        Self::TR1,
        Self::OC1,
        Self::PH2,
        Self::SG2,
        Self::TH2,
        Self::TW2,
        Self::VN2,
    ];

    fn host(self) -> &'static str {
        match self {
            Self::BR1 => "br1",
            Self::LA1 => "la1",
            Self::LA2 => "la2",
            Self::NA1 => "na1",
            Self::JP1 => "jp1",
            Self::KR => "kr",
            Self::EUN1 => "eun1",
            Self::EUW1 => "euw1",
            Self::ME1 => "me1",
            Self::RU => "ru",
            Self::TR1 => "tr1",
            Self::OC1 => "oc1",
            Self::PH2 => "ph2",
            Self::SG2 => "sg2",
            Self::TH2 => "th2",
            Self::TW2 => "tw2",
            Self::VN2 => "vn2",
        }
    }

    fn cluster(self) -> &'static str {
        match self {
            Self::BR1 | Self::LA1 | Self::LA2 | Self::NA1 => "americas",
            Self::JP1 | Self::KR => "asia",
            Self::EUN1 | Self::EUW1 | Self::ME1 | Self::RU | Self::TR1 => "europe",
            Self::OC1 | Self::PH2 | Self::SG2 | Self::TH2 | Self::TW2 | Self::VN2 => "sea",
        }
    }

    /// Short names players use for their server.
    fn alias(self) -> Option<&'static str> {
        match self {
            Self::BR1 => Some("br"),
            Self::LA1 => Some("lan"),
            Self::LA2 => Some("las"),
            Self::NA1 => Some("na"),
            Self::JP1 => Some("jp"),
            Self::EUN1 => Some("eune"),
            Self::EUW1 => Some("euw"),
            Self::ME1 => Some("me"),
            Self::TR1 => Some("tr"),
            Self::OC1 => Some("oce"),
            Self::PH2 => Some("ph"),
            Self::SG2 => Some("sg"),
            Self::TH2 => Some("th"),
            Self::TW2 => Some("tw"),
            Self::VN2 => Some("vn"),
            Self::KR | Self::RU => None,
        }
    }

    pub fn platform_url(self) -> String {
        format!("https://{}.api.riotgames.com", self.host())
    }

    pub fn regional_url(self) -> String {
        format!("https://{}.api.riotgames.com", self.cluster())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.host() == wanted || p.alias() == Some(wanted.as_str()))
            .ok_or_else(|| AppError::Config(format!("invalid Riot platform: {s}")))
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display asset for a group of OpenWeather condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionIcon {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    Clear,
    Clouds,
}

/// Exclusive upper bounds, ascending; first match wins.
const THRESHOLDS: [(u32, ConditionIcon); 7] = [
    (233, ConditionIcon::Thunderstorm),
    (322, ConditionIcon::Drizzle),
    (531, ConditionIcon::Rain),
    (623, ConditionIcon::Snow),
    (782, ConditionIcon::Atmosphere),
    (801, ConditionIcon::Clear),
    (805, ConditionIcon::Clouds),
];

/// Map a provider condition code to its icon.
///
/// Codes past the documented range fall back to [`ConditionIcon::Clear`].
pub fn map_icon(condition_code: u32) -> ConditionIcon {
    THRESHOLDS
        .iter()
        .find(|(bound, _)| condition_code < *bound)
        .map_or(ConditionIcon::Clear, |(_, icon)| *icon)
}

impl ConditionIcon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "thunderstorm",
            Self::Drizzle => "drizzle",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Atmosphere => "atmosphere",
            Self::Clear => "clear",
            Self::Clouds => "clouds",
        }
    }
}

impl fmt::Display for ConditionIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

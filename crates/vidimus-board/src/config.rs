//! Board configuration.
//!
//! Deserializable from TOML. Every field has a default so an empty config
//! section is valid.

use serde::{Deserialize, Serialize};

/// Configuration for the board aggregator.
///
/// # Example
///
/// ```rust
/// use vidimus_board::BoardConfig;
///
/// let config: BoardConfig = toml::from_str("time_zone = \"Asia/Tokyo\"").unwrap();
/// assert_eq!(config.time_zone, "Asia/Tokyo");
/// assert_eq!(config.default_lang, "en");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// IANA time-zone id used when rendering creation times.
    ///
    /// Unrecognized ids fall back to `Asia/Seoul`, then a fixed `+09:00`.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// UI language used when a request does not carry one.
    #[serde(default = "default_lang")]
    pub default_lang: String,
}

fn default_time_zone() -> String {
    vidimus_core::time::DEFAULT_ZONE_ID.to_string()
}

fn default_lang() -> String {
    "en".to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            default_lang: default_lang(),
        }
    }
}

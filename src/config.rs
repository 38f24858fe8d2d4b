use crate::error::{AnalyticsError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALL_SENTINELS: [&str; 2] = ["Todos", "All"];

pub const DEFAULT_DATE_FORMATS: [&str; 6] = [
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyticsConfig {
    #[schemars(
        description = "Exact, case-sensitive values meaning 'no filter' for the vendor and product parameters."
    )]
    #[serde(default = "default_all_sentinels")]
    pub all_sentinels: Vec<String>,

    #[schemars(
        description = "chrono format strings tried in order when parsing 'Order Date'. The first one that parses wins."
    )]
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,
}

fn default_all_sentinels() -> Vec<String> {
    DEFAULT_ALL_SENTINELS.iter().map(|s| s.to_string()).collect()
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect()
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            all_sentinels: default_all_sentinels(),
            date_formats: default_date_formats(),
        }
    }
}

impl AnalyticsConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AnalyticsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.date_formats.is_empty() {
            return Err(AnalyticsError::InvalidConfig(
                "date_formats must contain at least one format".to_string(),
            ));
        }

        if self.all_sentinels.iter().any(|s| s.is_empty()) {
            return Err(AnalyticsError::InvalidConfig(
                "all_sentinels must not contain an empty string".to_string(),
            ));
        }

        Ok(())
    }

    /// Maps a vendor/product parameter to an optional exact-match filter.
    /// Sentinels never reach the data as literal values.
    pub fn selection<'a>(&self, value: &'a str) -> Option<&'a str> {
        if self.all_sentinels.iter().any(|s| s == value) {
            None
        } else {
            Some(value)
        }
    }
}

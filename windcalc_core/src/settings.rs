//! # Engine Settings
//!
//! Configuration that changes engine behavior without changing inputs.
//!
//! ## Structure
//!
//! ```text
//! Settings
//! ├── strict_footing: bool        (missing footing data is a hard error)
//! ├── default_soil_class: String  (used when an input has no soil_type)
//! └── spacing_table_dir: Option   (directory of <ws>mph.csv tables)
//! ```
//!
//! Sources are layered by the caller: `Settings::default()`, then an optional
//! JSON file, then `WINDCALC_*` environment variables.
//!
//! ## Example
//!
//! ```rust
//! use windcalc_core::settings::Settings;
//!
//! let settings = Settings::default();
//! assert!(!settings.strict_footing);
//! assert_eq!(settings.default_soil_class, "default");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Environment variable toggling strict footing mode
pub const ENV_STRICT_FOOTING: &str = "WINDCALC_STRICT_FOOTING";
/// Environment variable naming the default soil class key
pub const ENV_DEFAULT_SOIL: &str = "WINDCALC_DEFAULT_SOIL";
/// Environment variable pointing at the manufacturer spacing tables
pub const ENV_TABLE_DIR: &str = "WINDCALC_TABLE_DIR";

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Raise `MissingFootingData` instead of substituting a default footing
    pub strict_footing: bool,

    /// Soil class key used when an estimate does not name one
    pub default_soil_class: String,

    /// Directory holding `<ws>mph.csv` spacing tables (None = formula only)
    pub spacing_table_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            strict_footing: false,
            default_soil_class: "default".to_string(),
            spacing_table_dir: None,
        }
    }
}

impl Settings {
    /// Defaults overlaid with any `WINDCALC_*` environment variables.
    pub fn from_env() -> Self {
        Settings::default().with_env_overrides()
    }

    /// Overlay `WINDCALC_*` environment variables onto these settings.
    ///
    /// Unparseable boolean values leave the current value in place.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = std::env::var(ENV_STRICT_FOOTING) {
            if let Some(flag) = parse_bool(&raw) {
                self.strict_footing = flag;
            }
        }
        if let Ok(soil) = std::env::var(ENV_DEFAULT_SOIL) {
            let soil = soil.trim();
            if !soil.is_empty() {
                self.default_soil_class = soil.to_string();
            }
        }
        if let Ok(dir) = std::env::var(ENV_TABLE_DIR) {
            if !dir.trim().is_empty() {
                self.spacing_table_dir = Some(PathBuf::from(dir.trim()));
            }
        }
        self
    }

    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> CalcResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read settings", path.display().to_string(), e.to_string()))?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Risk category per ASCE 7 Table 1.5-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskCategory {
    I,
    #[default]
    II,
    III,
    IV,
}

impl RiskCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskCategory::I => "I",
            RiskCategory::II => "II",
            RiskCategory::III => "III",
            RiskCategory::IV => "IV",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "I" | "1" => Ok(RiskCategory::I),
            "II" | "2" => Ok(RiskCategory::II),
            "III" | "3" => Ok(RiskCategory::III),
            "IV" | "4" => Ok(RiskCategory::IV),
            _ => Err(CalcError::invalid_risk_category(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert!(!settings.strict_footing);
        assert_eq!(settings.default_soil_class, "default");
        assert!(settings.spacing_table_dir.is_none());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"strict_footing": true}"#).unwrap();
        assert!(settings.strict_footing);
        assert_eq!(settings.default_soil_class, "default");
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Settings::from_json_file(Path::new("/nonexistent/windcalc.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_risk_category_parse() {
        assert_eq!("iii".parse::<RiskCategory>().unwrap(), RiskCategory::III);
        assert_eq!("4".parse::<RiskCategory>().unwrap(), RiskCategory::IV);
        let err = "V".parse::<RiskCategory>().unwrap_err();
        assert_eq!(err, CalcError::invalid_risk_category("V"));
    }

    #[test]
    fn test_risk_category_serialization() {
        let cat = RiskCategory::III;
        let json = serde_json::to_string(&cat).unwrap();
        assert_eq!(json, "\"III\"");

        let roundtrip: RiskCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, RiskCategory::III);
    }
}

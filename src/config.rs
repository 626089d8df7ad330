use crate::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_EMAIL_COLUMN, DEFAULT_NAME_COLUMN, DEFAULT_NAME_PREFIX,
    DEFAULT_PHONE_COLUMN, DEFAULT_REGION, DEFAULT_TRIPS_COLUMN, DEFAULT_TRIP_DELIMITER,
    ENV_DELIMITER, ENV_PREFIX, ENV_REGION,
};
use crate::error::{Result, RosterError};
use phonenumber::country;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Settings for one conversion run.
///
/// Loaded from TOML, then overridden by environment variables and finally by
/// command line flags. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ISO 3166 region assumed for phone numbers without a country code
    pub region: String,
    /// Prepended to every exported contact name
    pub name_prefix: String,
    /// Separator between trip names inside the trips cell
    pub trip_delimiter: char,
    pub columns: ColumnMap,
}

/// 1-indexed spreadsheet columns holding each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: usize,
    pub phone: usize,
    pub email: usize,
    pub trips: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME_COLUMN,
            phone: DEFAULT_PHONE_COLUMN,
            email: DEFAULT_EMAIL_COLUMN,
            trips: DEFAULT_TRIPS_COLUMN,
        }
    }
}

impl ColumnMap {
    /// Minimum row width needed to read every mapped field
    pub fn required_width(&self) -> usize {
        self.name.max(self.phone).max(self.email).max(self.trips)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            trip_delimiter: DEFAULT_TRIP_DELIMITER,
            columns: ColumnMap::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `trip_contacts.toml` in the
    /// working directory when it exists, or fall back to defaults. Environment
    /// overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RosterError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(region) = std::env::var(ENV_REGION) {
            self.region = region;
        }
        if let Ok(prefix) = std::env::var(ENV_PREFIX) {
            self.name_prefix = prefix;
        }
        if let Ok(delimiter) = std::env::var(ENV_DELIMITER) {
            self.trip_delimiter = parse_delimiter(&delimiter)?;
        }
        Ok(())
    }

    /// Reject settings that would make the run meaningless before any input
    /// is touched.
    pub fn validate(&self) -> Result<()> {
        self.region_id()?;

        let columns = [
            ("name", self.columns.name),
            ("phone", self.columns.phone),
            ("email", self.columns.email),
            ("trips", self.columns.trips),
        ];
        for (field, column) in columns {
            if column == 0 {
                return Err(RosterError::Config(format!(
                    "Column for '{}' must be 1 or greater",
                    field
                )));
            }
        }

        if self.trip_delimiter.is_whitespace() {
            return Err(RosterError::Config(
                "Trip delimiter cannot be whitespace".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured region as a phone-number country id
    pub fn region_id(&self) -> Result<country::Id> {
        self.region
            .trim()
            .to_uppercase()
            .parse::<country::Id>()
            .map_err(|_| RosterError::Config(format!("Unknown region code: {}", self.region)))
    }
}

/// Parse a delimiter given as text; exactly one character is accepted.
pub fn parse_delimiter(value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(RosterError::Config(format!(
            "Trip delimiter must be a single character, got '{}'",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_roster_layout() {
        let config = Config::default();
        assert_eq!(config.region, "IL");
        assert_eq!(config.name_prefix, "000 haifa-vaddis");
        assert_eq!(config.trip_delimiter, ',');
        assert_eq!(config.columns.required_width(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            trip_delimiter = ";"

            [columns]
            trips = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.trip_delimiter, ';');
        assert_eq!(config.columns.trips, 7);
        assert_eq!(config.columns.name, 2);
        assert_eq!(config.region, "IL");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_validate_rejects_unknown_region() {
        let config = Config {
            region: "XX".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(RosterError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_column() {
        let mut config = Config::default();
        config.columns.email = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_whitespace_delimiter() {
        let config = Config {
            trip_delimiter: ' ',
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_region_is_case_insensitive() {
        let config = Config {
            region: "us".to_string(),
            ..Config::default()
        };
        assert_eq!(config.region_id().unwrap(), country::Id::US);
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";").unwrap(), ';');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(",;").is_err());
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(RosterError::Config(_))));
    }
}

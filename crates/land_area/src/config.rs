use std::{env, error, fmt, path::PathBuf};

use model::{AreaUnit, ParseAreaUnitError};

use crate::{
    area::{AreaMethod, ParseAreaMethodError},
    export::DEFAULT_FILE_NAME,
};

pub const METHOD_VAR: &str = "LAND_AREA_METHOD";
pub const UNITS_VAR: &str = "LAND_AREA_UNITS";
pub const EXPORT_PATH_VAR: &str = "LAND_AREA_EXPORT_PATH";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub method: AreaMethod,
    /// Units shown to the user, in display order.
    pub units: Vec<AreaUnit>,
    pub export_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: AreaMethod::default(),
            units: AreaUnit::ALL.to_vec(),
            export_path: PathBuf::from(DEFAULT_FILE_NAME),
        }
    }
}

impl Config {
    /// Reads the configuration from the environment. Unset variables fall
    /// back to the defaults, malformed ones are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(method) = lookup(METHOD_VAR) {
            config.method = method.parse()?;
        }
        if let Some(units) = lookup(UNITS_VAR) {
            config.units = parse_units(&units)?;
        }
        if let Some(export_path) = lookup(EXPORT_PATH_VAR) {
            config.export_path = PathBuf::from(export_path);
        }
        log::debug!("configuration: {:?}", config);
        Ok(config)
    }
}

/// Parses a comma separated unit list, e.g. `sqm,acres,kanal`. Duplicates
/// are dropped, the first occurrence decides the position.
pub fn parse_units(list: &str) -> Result<Vec<AreaUnit>, ConfigError> {
    let mut units: Vec<AreaUnit> = Vec::new();
    for unit in list.split(',').filter(|unit| !unit.trim().is_empty()) {
        let unit: AreaUnit = unit.parse()?;
        if !units.contains(&unit) {
            units.push(unit);
        }
    }
    if units.is_empty() {
        return Err(ConfigError::NoUnits);
    }
    Ok(units)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidMethod(ParseAreaMethodError),
    InvalidUnit(ParseAreaUnitError),
    NoUnits,
}

impl error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidMethod(why) => write!(f, "{}: {}", METHOD_VAR, why),
            ConfigError::InvalidUnit(why) => write!(f, "{}: {}", UNITS_VAR, why),
            ConfigError::NoUnits => write!(f, "{}: no units given", UNITS_VAR),
        }
    }
}

impl From<ParseAreaMethodError> for ConfigError {
    fn from(why: ParseAreaMethodError) -> Self {
        ConfigError::InvalidMethod(why)
    }
}

impl From<ParseAreaUnitError> for ConfigError {
    fn from(why: ParseAreaUnitError) -> Self {
        ConfigError::InvalidUnit(why)
    }
}

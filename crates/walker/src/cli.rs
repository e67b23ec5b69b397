use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use land_area::{
    config::{self, Config, ConfigError},
    AreaMethod,
};

/// Area of a plot of land from the points recorded while walking around it.
#[derive(Debug, Parser)]
#[command(name = "walker", version)]
pub struct Cli {
    /// Area method, overrides LAND_AREA_METHOD
    #[arg(long, global = true)]
    pub method: Option<AreaMethod>,

    /// Comma separated list of units, e.g. `sqm,acres,kanal`. Overrides
    /// LAND_AREA_UNITS
    #[arg(long, global = true)]
    pub units: Option<String>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Area of a path read from a `Latitude,Longitude` CSV file
    Area {
        /// CSV file, `-` reads from stdin
        file: PathBuf,
    },
    /// Replays a recorded path as a live walk and exports it when done.
    /// Ctrl-C stops the walk early
    Replay {
        file: PathBuf,

        /// Pause between two fixes in milliseconds
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,

        /// Where the walked path is written, overrides LAND_AREA_EXPORT_PATH
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Lists every supported unit with its factor per square meter
    Units,
}

impl Cli {
    /// The environment configuration with the command line flags applied on
    /// top.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::from_env()?;
        if let Some(method) = self.method {
            config.method = method;
        }
        if let Some(units) = &self.units {
            config.units = config::parse_units(units)?;
        }
        if let Command::Replay {
            export: Some(export),
            ..
        } = &self.command
        {
            config.export_path = export.clone();
        }
        Ok(config)
    }
}

impl Command {
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Command::Replay { interval_ms, .. } if *interval_ms > 0 => {
                Some(Duration::from_millis(*interval_ms))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use land_area::AreaUnit;

    use super::*;

    #[test]
    fn command_line_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_the_defaults() {
        let cli = Cli::parse_from([
            "walker",
            "replay",
            "walk.csv",
            "--method",
            "spherical-excess",
            "--units",
            "ha,acres",
            "--interval-ms",
            "250",
            "--export",
            "out.csv",
        ]);
        assert_eq!(cli.command.interval(), Some(Duration::from_millis(250)));

        let config = cli.config().unwrap();
        assert_eq!(config.method, AreaMethod::SphericalExcess);
        assert_eq!(config.units, vec![AreaUnit::Hectares, AreaUnit::Acres]);
        assert_eq!(config.export_path, PathBuf::from("out.csv"));
    }

    #[test]
    fn rejects_unknown_method() {
        assert!(Cli::try_parse_from(["walker", "units", "--method", "flat"]).is_err());
    }

    #[test]
    fn unknown_unit_is_a_config_error() {
        let cli = Cli::parse_from(["walker", "area", "-", "--units", "bigha"]);
        assert!(matches!(cli.config(), Err(ConfigError::InvalidUnit(_))));
    }
}

use std::{error::Error, io, path::Path as FsPath, process::ExitCode};

use clap::Parser;
use land_area::{
    export, track_until, AreaError, AreaReport, Config, Path, RecordedWalk, ReplayProvider,
};
use serde::Serialize;

mod cli;

use cli::{Cli, Command};

/// Exit code when the walk has too few points for an area.
const INSUFFICIENT_POINTS: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(why) => match why.downcast_ref::<AreaError>() {
            Some(area_error) if matches!(area_error, AreaError::InsufficientPoints { .. }) => {
                eprintln!("{}", area_error);
                ExitCode::from(INSUFFICIENT_POINTS)
            }
            _ => {
                log::error!("{}", why);
                eprintln!("error: {}", why);
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = cli.config()?;
    match &cli.command {
        Command::Area { file } => {
            let path = read_path(file)?;
            let report = AreaReport::new(&path, config.method, &config.units)?;
            print(&report, cli.json)?;
        }
        Command::Replay { file, .. } => {
            let path = read_path(file)?;
            let recorded = replay(&path, &cli, &config).await?;
            export::export_to_file(&recorded.path, &config.export_path)?;
            let report = recorded.report(config.method, &config.units)?;
            if cli.json {
                let output = ReplayOutput {
                    walk: &recorded,
                    report: &report,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "walked {} points ({:.1} m) in {} s, exported to {}",
                    recorded.path.len(),
                    recorded.path.walked_distance_m(),
                    recorded.duration().num_seconds(),
                    config.export_path.display()
                );
                print!("{}", report);
            }
        }
        Command::Units => {
            for &unit in config.units.iter() {
                println!(
                    "{:<8} {:<18} {}",
                    unit.symbol(),
                    unit.label(),
                    unit.factor()
                );
            }
        }
    }
    Ok(())
}

fn read_path(file: &FsPath) -> Result<Path, export::ExportError> {
    if file == FsPath::new("-") {
        export::read_csv(io::stdin().lock())
    } else {
        export::import_from_file(file)
    }
}

async fn replay(path: &Path, cli: &Cli, config: &Config) -> Result<RecordedWalk, Box<dyn Error>> {
    let mut provider = ReplayProvider::from_path(path);
    if let Some(interval) = cli.command.interval() {
        provider = provider.with_interval(interval);
    }
    log::info!(
        "replaying {} points, area method {}",
        provider.remaining(),
        config.method
    );
    let stop = async {
        if let Err(why) = tokio::signal::ctrl_c().await {
            log::warn!("cannot listen for ctrl-c: {}", why);
            std::future::pending::<()>().await;
        }
    };
    Ok(track_until(&mut provider, stop).await?)
}

fn print(report: &AreaReport, json: bool) -> serde_json::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

#[derive(Serialize)]
struct ReplayOutput<'a> {
    walk: &'a RecordedWalk,
    report: &'a AreaReport,
}

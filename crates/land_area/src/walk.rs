use std::{error, fmt, mem, result};

use chrono::{DateTime, Duration, Utc};
use model::{AreaUnit, Fix, Path};
use serde::Serialize;

use crate::{
    area::{self, compute_area_with, AreaMethod},
    report::AreaReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkStatus {
    Idle,
    Tracking,
    Stopped,
}

#[derive(Debug, Default)]
enum WalkState {
    #[default]
    Idle,
    Tracking {
        started_at: DateTime<Utc>,
        fixes: Vec<Fix>,
    },
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WalkError {
    NotTracking(WalkStatus),
    InvalidFix(Fix),
}

impl error::Error for WalkError {}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WalkError::NotTracking(status) => {
                write!(f, "walk is not being tracked (status: {:?})", status)
            }
            WalkError::InvalidFix(fix) => {
                write!(f, "fix has an invalid position: {}", fix.point)
            }
        }
    }
}

pub type Result<T> = result::Result<T, WalkError>;

/// A tracking session.
///
/// While tracking, the walk is the only writer of its fixes. [`Walk::stop`]
/// moves them out as a [`RecordedWalk`], which can only be read.
#[derive(Debug, Default)]
pub struct Walk {
    state: WalkState,
}

impl Walk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> WalkStatus {
        match self.state {
            WalkState::Idle => WalkStatus::Idle,
            WalkState::Tracking { .. } => WalkStatus::Tracking,
            WalkState::Stopped => WalkStatus::Stopped,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, WalkState::Tracking { .. })
    }

    /// Starts a new walk. Anything recorded by an unfinished walk is dropped.
    pub fn start(&mut self) {
        if let WalkState::Tracking { fixes, .. } = &self.state {
            log::warn!("restarting walk, discarding {} fixes", fixes.len());
        }
        log::info!("walk started");
        self.state = WalkState::Tracking {
            started_at: Utc::now(),
            fixes: Vec::new(),
        };
    }

    /// Appends a fix and returns how many have been recorded so far.
    pub fn record(&mut self, fix: Fix) -> Result<usize> {
        let status = self.status();
        let WalkState::Tracking { fixes, .. } = &mut self.state else {
            return Err(WalkError::NotTracking(status));
        };
        if !fix.point.is_valid() {
            return Err(WalkError::InvalidFix(fix));
        }
        fixes.push(fix);
        log::debug!(
            "fix #{} at {} (accuracy {:?} m)",
            fixes.len(),
            fix.point,
            fix.accuracy_m
        );
        Ok(fixes.len())
    }

    /// Fixes recorded so far by the running walk.
    pub fn fixes(&self) -> &[Fix] {
        match &self.state {
            WalkState::Tracking { fixes, .. } => fixes.as_slice(),
            _ => &[],
        }
    }

    pub fn stop(&mut self) -> Result<RecordedWalk> {
        match mem::replace(&mut self.state, WalkState::Stopped) {
            WalkState::Tracking { started_at, fixes } => {
                log::info!("walk stopped after {} fixes", fixes.len());
                Ok(RecordedWalk {
                    path: fixes.iter().map(|fix| fix.point).collect(),
                    fixes,
                    started_at,
                    stopped_at: Utc::now(),
                })
            }
            previous => {
                let status = match previous {
                    WalkState::Idle => WalkStatus::Idle,
                    _ => WalkStatus::Stopped,
                };
                self.state = previous;
                Err(WalkError::NotTracking(status))
            }
        }
    }

    /// Stops the walk and calculates its area. The recorded walk is returned
    /// even when it has too few points for an area.
    pub fn finish(&mut self, method: AreaMethod) -> Result<(RecordedWalk, area::Result<f64>)> {
        let recorded = self.stop()?;
        let area = recorded.area(method);
        Ok((recorded, area))
    }
}

/// The immutable result of one walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedWalk {
    pub path: Path,
    pub fixes: Vec<Fix>,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

impl RecordedWalk {
    pub fn duration(&self) -> Duration {
        self.stopped_at - self.started_at
    }

    pub fn area(&self, method: AreaMethod) -> area::Result<f64> {
        compute_area_with(&self.path, method)
    }

    pub fn report(&self, method: AreaMethod, units: &[AreaUnit]) -> area::Result<AreaReport> {
        AreaReport::new(&self.path, method, units)
    }
}

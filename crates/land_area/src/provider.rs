use std::{collections::VecDeque, future::Future, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use futures::{Stream, StreamExt};
use model::{Fix, Path};
use tokio::sync::mpsc;

use crate::walk::{RecordedWalk, Walk, WalkError};

/// Source of position fixes, e.g. the device GPS.
///
/// Fixes are delivered one at a time in the order they were taken. `None`
/// means the provider has nothing more to deliver. Implementations must be
/// cancel safe: dropping a pending `next_fix` must not lose a fix.
#[async_trait]
pub trait LocationProvider: Send {
    async fn next_fix(&mut self) -> Option<Fix>;
}

#[async_trait]
impl LocationProvider for mpsc::Receiver<Fix> {
    async fn next_fix(&mut self) -> Option<Fix> {
        self.recv().await
    }
}

/// Replays previously recorded fixes, optionally pausing before each one.
#[derive(Debug, Clone)]
pub struct ReplayProvider {
    fixes: VecDeque<Fix>,
    interval: Option<Duration>,
}

impl ReplayProvider {
    pub fn new(fixes: impl IntoIterator<Item = Fix>) -> Self {
        Self {
            fixes: fixes.into_iter().collect(),
            interval: None,
        }
    }

    /// Replays the points of a path, timestamped when they are delivered.
    pub fn from_path(path: &Path) -> Self {
        Self::new(path.iter().map(|point| Fix::new(*point, None)))
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn remaining(&self) -> usize {
        self.fixes.len()
    }
}

#[async_trait]
impl LocationProvider for ReplayProvider {
    async fn next_fix(&mut self) -> Option<Fix> {
        if self.fixes.is_empty() {
            return None;
        }
        if let Some(interval) = self.interval {
            tokio::time::sleep(interval).await;
        }
        self.fixes.pop_front().map(|fix| Fix {
            recorded_at: Utc::now(),
            ..fix
        })
    }
}

fn record_or_skip(walk: &mut Walk, fix: Fix) -> Result<(), WalkError> {
    match walk.record(fix) {
        Ok(_) => Ok(()),
        Err(WalkError::InvalidFix(fix)) => {
            log::warn!("skipping fix with invalid position {}", fix.point);
            Ok(())
        }
        Err(why) => Err(why),
    }
}

/// Records every fix the provider delivers until it runs dry.
pub async fn track<P>(provider: &mut P) -> Result<RecordedWalk, WalkError>
where
    P: LocationProvider + ?Sized,
{
    let mut walk = Walk::new();
    walk.start();
    while let Some(fix) = provider.next_fix().await {
        record_or_skip(&mut walk, fix)?;
    }
    walk.stop()
}

/// Records fixes until `stop` completes or the provider runs dry, whichever
/// comes first.
pub async fn track_until<P, F>(
    provider: &mut P,
    stop: F,
) -> Result<RecordedWalk, WalkError>
where
    P: LocationProvider + ?Sized,
    F: Future<Output = ()>,
{
    let mut walk = Walk::new();
    walk.start();
    tokio::pin!(stop);
    loop {
        tokio::select! {
            biased;
            _ = &mut stop => {
                log::info!("tracking stopped by request");
                break;
            }
            fix = provider.next_fix() => match fix {
                Some(fix) => record_or_skip(&mut walk, fix)?,
                None => break,
            },
        }
    }
    walk.stop()
}

/// Records every fix of a stream, for providers that are easier to express
/// as a `Stream`.
pub async fn track_stream<S>(stream: S) -> Result<RecordedWalk, WalkError>
where
    S: Stream<Item = Fix>,
{
    let mut walk = Walk::new();
    walk.start();
    futures::pin_mut!(stream);
    while let Some(fix) = stream.next().await {
        record_or_skip(&mut walk, fix)?;
    }
    walk.stop()
}

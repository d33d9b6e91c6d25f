//! Tokio driver for the animation.
//!
//! [`TokioTimer`] turns `Timer::arm` into a spawned `sleep` that posts the
//! tick on a channel; [`run_animation`] pulls ticks off that channel and
//! feeds them to [`GeoMoves::on_tick`] one at a time. The state machine
//! itself never runs concurrently with anything.

use std::time::Duration;

use anyhow::{bail, Result};
use geomoves_core::animation::{GeoMoves, RunSummary, Tick, TickOutcome, TickReport, Timer};
use geomoves_core::models::Handle;
use geomoves_core::surface::MapSurface;
use geomoves_core::tree::FamilyTree;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Timer backed by `tokio::time::sleep`. Must be used inside a runtime.
pub struct TokioTimer {
    sender: mpsc::UnboundedSender<Tick>,
    pending: Option<JoinHandle<()>>,
}

impl TokioTimer {
    /// A timer and the receiving end of its tick channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender,
                pending: None,
            },
            receiver,
        )
    }
}

impl Timer for TokioTimer {
    fn arm(&mut self, delay: Duration, tick: Tick) {
        self.disarm();
        let sender = self.sender.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(tick);
        }));
    }

    fn disarm(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Animate every generation of `root` to completion.
///
/// `on_level` sees the report of each drawn level. Returns `None` when the
/// root does not resolve to a person.
pub async fn run_animation<T, S, F>(
    geomoves: &mut GeoMoves<T, S>,
    root: &Handle,
    mut on_level: F,
) -> Result<Option<RunSummary>>
where
    T: FamilyTree,
    S: MapSurface,
    F: FnMut(&TickReport),
{
    let (mut timer, mut ticks) = TokioTimer::new();
    if !geomoves.build_map(root, &mut timer) {
        return Ok(None);
    }

    while let Some(tick) = ticks.recv().await {
        match geomoves.on_tick(tick, &mut timer) {
            TickOutcome::Stale => continue,
            TickOutcome::Continued(report) => on_level(&report),
            TickOutcome::Finished { last, summary } => {
                on_level(&last);
                return Ok(Some(summary));
            }
        }
    }
    bail!("tick channel closed before the animation finished")
}

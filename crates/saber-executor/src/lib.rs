use anyhow::Result;
use saber_core::{FrameOutput, MatchInstant, MatchSettings};
use saber_world::MatchEngine;
use tokio::{
    sync::{broadcast, mpsc},
    time::{Duration, Instant, MissedTickBehavior},
};

mod gate;
mod handle;
mod sensor;

pub use gate::FrameGate;
pub use handle::{ControlMsg, ExecutorHandle};
pub use sensor::LandmarkSource;

/// What a single tick request turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Too soon after the last tick; nothing was detected or simulated
    Throttled,
    Ran(FrameOutput),
    /// The source has no more frames
    Exhausted,
}

/// Drives a [`MatchEngine`] from a [`LandmarkSource`], one tick at a time.
///
/// The host interval wakes the loop; the frame gate decides whether the wakeup becomes
/// a tick. A tick awaits detection, runs the engine and broadcasts the output before
/// the loop looks at anything else, so ticks never overlap and control messages only
/// land between them.
pub struct Executor<S> {
    engine: MatchEngine,
    source: S,
    gate: FrameGate,
    host_interval: Duration,
    clock_start: Instant,
    update_tx: broadcast::Sender<FrameOutput>,
    command_tx: mpsc::UnboundedSender<ControlMsg>,
    command_rx: mpsc::UnboundedReceiver<ControlMsg>,
}

impl<S: LandmarkSource> Executor<S> {
    pub fn new(settings: &MatchSettings, source: S) -> Result<Self> {
        let engine = MatchEngine::new(settings)?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, _) = broadcast::channel(16);

        Ok(Self {
            engine,
            source,
            gate: FrameGate::new(settings.executor.frame_budget()),
            host_interval: settings.executor.host_interval(),
            clock_start: Instant::now(),
            update_tx,
            command_tx,
            command_rx,
        })
    }

    pub fn handle(&self) -> ExecutorHandle {
        ExecutorHandle {
            control_tx: self.command_tx.clone(),
            update_rx: self.update_tx.subscribe(),
        }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    /// Match time on the executor's clock.
    pub fn now(&self) -> MatchInstant {
        MatchInstant::from_elapsed(self.clock_start.elapsed())
    }

    /// Request a tick at `now`.
    ///
    /// Errors from the source are returned as-is; the engine is left untouched and
    /// the next tick proceeds normally.
    pub async fn step(&mut self, now: MatchInstant) -> Result<TickOutcome> {
        if !self.gate.admit(now) {
            return Ok(TickOutcome::Throttled);
        }

        let Some(frame) = self.source.detect(now).await? else {
            return Ok(TickOutcome::Exhausted);
        };

        let output = self.engine.tick(&frame, now);
        if output.finished_this_tick {
            if let Some(winner) = output.winner {
                log::info!(
                    "{} wins ({} - {})",
                    winner,
                    output.hp_left,
                    output.hp_right
                );
            }
        }
        if let Err(err) = self.update_tx.send(output.clone()) {
            log::trace!("No subscribers for frame output: {}", err);
        }

        Ok(TickOutcome::Ran(output))
    }

    fn handle_control_msg(&mut self, msg: ControlMsg) {
        match msg {
            ControlMsg::Reset => self.engine.reset(),
            ControlMsg::Stop => {}
        }
    }

    /// Run until the stop signal fires, a [`ControlMsg::Stop`] arrives, or the source
    /// is exhausted.
    ///
    /// A stop requested while detection is in flight takes effect once that tick has
    /// finished. Dropping the stop sender also stops the loop.
    pub async fn run(&mut self, mut stop_rx: broadcast::Receiver<()>) -> Result<()> {
        let mut host_interval = tokio::time::interval(self.host_interval);
        host_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        log::info!(
            "Executor running, host interval {:?}, frame budget {:?}",
            self.host_interval,
            self.gate.budget()
        );

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.recv() => {
                    log::info!("Stop signal received");
                    break;
                }
                Some(msg) = self.command_rx.recv() => {
                    match msg {
                        ControlMsg::Stop => break,
                        msg => self.handle_control_msg(msg),
                    }
                }
                _ = host_interval.tick() => {
                    let now = self.now();
                    match self.step(now).await {
                        Ok(TickOutcome::Exhausted) => {
                            log::info!("Landmark source exhausted");
                            break;
                        }
                        Ok(_) => {}
                        Err(err) => log::error!("Sensor failed, skipping tick: {:#}", err),
                    }
                }
            }
        }

        log::info!("Executor stopped");
        Ok(())
    }
}

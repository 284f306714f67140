use saber_core::FrameOutput;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMsg {
    /// Start a new match: full hp, calibration cleared
    Reset,
    Stop,
}

#[derive(Debug)]
pub struct ExecutorHandle {
    pub control_tx: mpsc::UnboundedSender<ControlMsg>,
    pub update_rx: broadcast::Receiver<FrameOutput>,
}

impl ExecutorHandle {
    /// Wait for the next frame output. Returns `None` once the executor is gone.
    ///
    /// A receiver that falls behind skips the outputs it missed.
    pub async fn recv(&mut self) -> Option<FrameOutput> {
        loop {
            match self.update_rx.recv().await {
                Ok(output) => return Some(output),
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!("Frame output receiver lagged, skipped {} frames", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    // Control messages are applied by the executor between ticks
    pub fn send(&self, msg: ControlMsg) {
        self.control_tx
            .send(msg)
            .map_err(|err| {
                log::error!("Error sending control message: {:?}", err);
            })
            .ok();
    }
}

impl Clone for ExecutorHandle {
    fn clone(&self) -> Self {
        Self {
            control_tx: self.control_tx.clone(),
            update_rx: self.update_rx.resubscribe(),
        }
    }
}

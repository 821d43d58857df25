//! The tune protocol: the single entry point that mutates tuner state.

use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use tuner_proto::channels::{ChannelEntry, ChannelId};
use tuner_proto::state::TunerState;

use crate::effector::ActionEffector;

#[derive(Debug, PartialEq, Eq)]
pub enum TuneOutcome {
    /// Tune accepted; redirect the client to the stream path.
    Redirect(String),
    /// Tuner occupied by a different channel; nothing changed.
    Busy { current: ChannelId },
}

/// Owns the process-wide [`TunerState`] behind a mutex. The whole
/// check-then-mutate of a tune runs inside one lock so two concurrent
/// requests can never both observe an idle tuner and both win.
pub struct Tuner {
    state: Mutex<TunerState>,
    effector: Arc<dyn ActionEffector>,
}

impl Tuner {
    pub fn new(effector: Arc<dyn ActionEffector>) -> Self {
        Self {
            state: Mutex::new(TunerState::new()),
            effector,
        }
    }

    /// Switch to `entry`'s channel on behalf of `requester`.
    ///
    /// Re-affirming the already-tuned channel succeeds again (and re-fires
    /// the effectors). A tuned channel stays busy until explicitly changed;
    /// there is no timeout-driven release.
    pub async fn tune(&self, entry: &ChannelEntry, requester: IpAddr) -> TuneOutcome {
        let mut state = self.state.lock().await;

        if let Some(current) = state.tuned_channel {
            if state.busy && current != entry.channel {
                info!(
                    channel = %entry.channel,
                    %current,
                    "tune rejected, tuner busy"
                );
                return TuneOutcome::Busy { current };
            }
        }

        // Fire-and-forget: a failed launch is logged, not rolled back, and
        // not surfaced to the client.
        if !self.effector.invoke(&entry.tuner_command, &[]) {
            warn!(channel = %entry.channel, "tuner effector did not start");
        }
        if !self.effector.invoke(&entry.player_command, &entry.player_args) {
            warn!(channel = %entry.channel, "player effector did not start");
        }

        state.record_tune(entry.channel, requester);
        info!(channel = %entry.channel, client = %requester, "tuned");

        TuneOutcome::Redirect(entry.stream_path.clone())
    }

    pub async fn snapshot(&self) -> TunerState {
        self.state.lock().await.clone()
    }
}

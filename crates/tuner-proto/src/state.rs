use crate::channels::ChannelId;
use std::collections::HashSet;
use std::net::IpAddr;

/// Process-wide tuner record: what is tuned, whether the tuner is occupied,
/// and which client addresses have requested a stream.
///
/// Invariant: `busy` implies `tuned_channel.is_some()`. The only mutation
/// path is `record_tune`, which applies the whole transition as one step, so
/// the record is never observed half-updated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunerState {
    pub tuned_channel: Option<ChannelId>,
    pub busy: bool,
    pub clients: HashSet<IpAddr>,
}

impl TunerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a tune to `target` must be rejected: the tuner is occupied by
    /// a different channel. Re-affirming the already-tuned channel is never
    /// blocked.
    pub fn blocks(&self, target: ChannelId) -> bool {
        self.busy && self.tuned_channel != Some(target)
    }

    /// Apply a successful tune. All three fields change together.
    pub fn record_tune(&mut self, channel: ChannelId, requester: IpAddr) {
        self.tuned_channel = Some(channel);
        self.busy = true;
        self.clients.insert(requester);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> IpAddr {
        IpAddr::from([192, 168, 1, last])
    }

    #[test]
    fn fresh_state_is_idle() {
        let state = TunerState::new();
        assert_eq!(state.tuned_channel, None);
        assert!(!state.busy);
        assert!(state.clients.is_empty());
        assert!(!state.blocks(ChannelId::new(2, 1)));
    }

    #[test]
    fn busy_blocks_other_channels_only() {
        let mut state = TunerState::new();
        state.record_tune(ChannelId::new(2, 1), addr(10));
        assert!(state.busy);
        assert_eq!(state.tuned_channel, Some(ChannelId::new(2, 1)));
        assert!(state.blocks(ChannelId::new(5, 1)));
        assert!(!state.blocks(ChannelId::new(2, 1)));
    }

    #[test]
    fn repeat_tune_keeps_client_set_deduplicated() {
        let mut state = TunerState::new();
        state.record_tune(ChannelId::new(2, 1), addr(10));
        state.record_tune(ChannelId::new(2, 1), addr(10));
        state.record_tune(ChannelId::new(2, 1), addr(11));
        assert_eq!(state.clients.len(), 2);
    }

    #[test]
    fn busy_implies_tuned() {
        let mut state = TunerState::new();
        state.record_tune(ChannelId::new(3, 4), addr(1));
        assert!(!state.busy || state.tuned_channel.is_some());
    }
}

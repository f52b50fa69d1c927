use crate::framework::error::RemoteError;

/// Progress of the collection load, as the presentation layer needs it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    /// No load has been requested yet.
    #[default]
    Idle,
    /// The first load is in flight and there is no data yet.
    Loading,
    /// At least one load succeeded. Refetches do not leave this state.
    Ready,
    /// Every load so far failed; holds the latest error.
    Failed(RemoteError),
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }

    pub(crate) fn on_load_started(&mut self) {
        if !self.is_ready() {
            *self = LoadState::Loading;
        }
    }

    pub(crate) fn on_load_finished(&mut self, outcome: Result<(), &RemoteError>) {
        match outcome {
            Ok(()) => *self = LoadState::Ready,
            Err(e) if !self.is_ready() => *self = LoadState::Failed(e.clone()),
            Err(_) => {}
        }
    }
}

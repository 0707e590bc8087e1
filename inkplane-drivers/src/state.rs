//! Panel lifecycle state machine
//!
//! The panel's externally visible state is a function of the previous
//! state and the last completed driver operation. `Busy` is not a state
//! here: it is read from the transport and cleared by waiting.

/// Panel lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelState {
    /// Powered but not yet initialized
    #[default]
    Uninitialized,
    /// Initialized and accepting RAM writes and refreshes
    Ready,
    /// In deep sleep; must be woken before anything but initialize
    AsleepDeep,
}

/// Completed driver operations that can move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelEvent {
    /// Initialization sequence completed
    Initialized,
    /// Initialization sequence failed part-way
    InitFailed,
    /// RAM bank written
    PixelsWritten,
    /// Refresh completed
    Refreshed,
    /// Deep sleep command sent
    EnteredDeepSleep,
    /// Wake command sent
    ExitedDeepSleep,
}

impl PanelState {
    /// Check if the panel can take RAM writes and refreshes
    pub fn is_ready(&self) -> bool {
        matches!(self, PanelState::Ready)
    }

    /// Check if initialization has completed at some point
    pub fn is_initialized(&self) -> bool {
        !matches!(self, PanelState::Uninitialized)
    }

    /// Process an event and return the next state
    ///
    /// Events that do not apply to the current state leave it unchanged:
    /// sequencing is a caller obligation, not something the panel enforces.
    pub fn transition(self, event: PanelEvent) -> Self {
        use PanelEvent::*;
        use PanelState::*;

        match (self, event) {
            // initialize() resets the controller, so it is valid from anywhere
            (_, Initialized) => Ready,
            (_, InitFailed) => Uninitialized,

            (Ready, PixelsWritten) => Ready,
            (Ready, Refreshed) => Ready,
            (Ready, EnteredDeepSleep) => AsleepDeep,

            (AsleepDeep, ExitedDeepSleep) => Ready,

            (state, _) => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = PanelState::default();
        assert_eq!(state, PanelState::Uninitialized);
        assert!(!state.is_ready());
        assert!(!state.is_initialized());
    }

    #[test]
    fn test_lifecycle() {
        let state = PanelState::Uninitialized.transition(PanelEvent::Initialized);
        assert_eq!(state, PanelState::Ready);

        let state = state
            .transition(PanelEvent::PixelsWritten)
            .transition(PanelEvent::Refreshed);
        assert_eq!(state, PanelState::Ready);

        let state = state.transition(PanelEvent::EnteredDeepSleep);
        assert_eq!(state, PanelState::AsleepDeep);
        assert!(state.is_initialized());
        assert!(!state.is_ready());

        let state = state.transition(PanelEvent::ExitedDeepSleep);
        assert_eq!(state, PanelState::Ready);
    }

    #[test]
    fn test_failed_init_rolls_back() {
        let state = PanelState::Ready.transition(PanelEvent::InitFailed);
        assert_eq!(state, PanelState::Uninitialized);
    }

    #[test]
    fn test_only_initialize_leaves_uninitialized() {
        for event in [
            PanelEvent::PixelsWritten,
            PanelEvent::Refreshed,
            PanelEvent::EnteredDeepSleep,
            PanelEvent::ExitedDeepSleep,
        ] {
            assert_eq!(
                PanelState::Uninitialized.transition(event),
                PanelState::Uninitialized
            );
        }
    }

    #[test]
    fn test_initialize_from_deep_sleep() {
        let state = PanelState::AsleepDeep.transition(PanelEvent::Initialized);
        assert_eq!(state, PanelState::Ready);
    }
}

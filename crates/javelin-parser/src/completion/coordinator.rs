//! Recovery coordinator.
//!
//! A small state machine owning the interaction between the completion
//! layer and recovery: whether statement bodies still need full detail,
//! and where the effective end of input lies once the region of interest
//! has been passed.

use tracing::debug;

/// Phases of a completion parse. Transitions are one-way; no state is
/// ever revisited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoordinatorState {
    /// Still scanning toward the cursor.
    #[default]
    Scanning,
    /// The completion node has been synthesized.
    CursorFound,
    /// An unrecoverable syntax state was hit after the cursor; the
    /// effective end of input may be clamped.
    Recovering,
    /// Resynchronized or input exhausted.
    Done,
}

#[derive(Debug, Default)]
pub struct RecoveryCoordinator {
    state: CoordinatorState,
    /// Clamped end of input, if any. Tokens at or past this offset are
    /// treated as end of file.
    effective_eof: Option<u32>,
}

impl RecoveryCoordinator {
    pub fn new() -> RecoveryCoordinator {
        RecoveryCoordinator::default()
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// Whether the cursor region has been passed. Past it, statement
    /// bodies may be parsed in diet mode (skipped to the matching brace).
    pub fn past_cursor(&self) -> bool {
        !matches!(self.state, CoordinatorState::Scanning)
    }

    pub fn effective_eof(&self) -> Option<u32> {
        self.effective_eof
    }

    /// Whether a token starting at `offset` lies past the clamped end of
    /// input.
    pub fn is_past_eof(&self, offset: u32) -> bool {
        self.effective_eof.is_some_and(|eof| offset >= eof)
    }

    /// Scanning → CursorFound, on synthesizer success.
    pub fn cursor_found(&mut self) {
        if self.state == CoordinatorState::Scanning {
            debug!("coordinator: cursor found");
            self.state = CoordinatorState::CursorFound;
        }
    }

    /// CursorFound → Recovering, on an unrecoverable syntax state after
    /// the cursor. `declaration_end` is the end of the enclosing
    /// recovered declaration; clamping there keeps later sibling
    /// declarations discoverable while cutting off the broken region.
    pub fn begin_recovery(&mut self, declaration_end: Option<u32>) {
        if self.state == CoordinatorState::CursorFound {
            debug!(?declaration_end, "coordinator: recovering");
            self.state = CoordinatorState::Recovering;
            self.effective_eof = declaration_end;
        }
    }

    /// Recovering/CursorFound → Done, on resynchronization or input
    /// exhaustion.
    pub fn finish(&mut self) {
        if !matches!(self.state, CoordinatorState::Scanning) {
            self.state = CoordinatorState::Done;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_advance_one_way() {
        let mut coordinator = RecoveryCoordinator::new();
        assert_eq!(coordinator.state(), CoordinatorState::Scanning);
        assert!(!coordinator.past_cursor());

        // Recovery before the cursor is ignored.
        coordinator.begin_recovery(Some(10));
        assert_eq!(coordinator.state(), CoordinatorState::Scanning);

        coordinator.cursor_found();
        assert_eq!(coordinator.state(), CoordinatorState::CursorFound);
        assert!(coordinator.past_cursor());

        coordinator.begin_recovery(Some(42));
        assert_eq!(coordinator.state(), CoordinatorState::Recovering);
        assert!(coordinator.is_past_eof(42));
        assert!(!coordinator.is_past_eof(41));

        coordinator.finish();
        assert_eq!(coordinator.state(), CoordinatorState::Done);

        // No state is revisited.
        coordinator.cursor_found();
        assert_eq!(coordinator.state(), CoordinatorState::Done);
    }

    #[test]
    fn finish_requires_cursor() {
        let mut coordinator = RecoveryCoordinator::new();
        coordinator.finish();
        assert_eq!(coordinator.state(), CoordinatorState::Scanning);
    }
}

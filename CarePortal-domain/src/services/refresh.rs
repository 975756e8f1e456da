//! Latest-result slots that ignore results from superseded refreshes.

use std::sync::{Mutex, MutexGuard};

/// Proof that a refresh was started at a given generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RefreshTicket {
    generation: u64,
}

#[derive(Debug)]
struct SlotState<T> {
    generation: u64,
    value: Option<T>,
}

/// Holds the most recent value produced by a refresh.
///
/// Each refresh takes a ticket with [`RefreshSlot::begin`]. Starting another
/// refresh or calling [`RefreshSlot::invalidate`] bumps the generation, and
/// completing with an older ticket leaves the slot untouched.
#[derive(Debug)]
pub struct RefreshSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> Default for RefreshSlot<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(SlotState { generation: 0, value: None }),
        }
    }
}

impl<T: Clone> RefreshSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock still holds a consistent generation and value
    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn begin(&self) -> RefreshTicket {
        let mut state = self.lock();
        state.generation += 1;
        RefreshTicket { generation: state.generation }
    }

    /// Store `value` if no newer refresh started. Returns whether it was stored.
    pub fn complete(&self, ticket: RefreshTicket, value: T) -> bool {
        let mut state = self.lock();
        if ticket.generation != state.generation {
            return false;
        }
        state.value = Some(value);
        true
    }

    /// Discard the results of any refresh still in flight
    pub fn invalidate(&self) {
        self.lock().generation += 1;
    }

    pub fn latest(&self) -> Option<T> {
        self.lock().value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_stores_value() {
        let slot = RefreshSlot::new();
        let ticket = slot.begin();
        assert!(slot.complete(ticket, 1));
        assert_eq!(slot.latest(), Some(1));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let slot = RefreshSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert!(slot.complete(second, "fresh"));
        assert!(!slot.complete(first, "stale"));
        assert_eq!(slot.latest(), Some("fresh"));
    }

    #[test]
    fn test_invalidate_drops_in_flight_result() {
        let slot = RefreshSlot::new();
        let ticket = slot.begin();
        slot.invalidate();
        assert!(!slot.complete(ticket, 7));
        assert_eq!(slot.latest(), None);
    }
}

//! Execution context supplied by the layer that sequences and authenticates
//! registry messages.

use crate::events::IdentityEvent;
use parking_lot::Mutex;

/// Capability consumed by every mutating registry operation.
///
/// The caller address is taken as already authenticated; the registry only
/// checks that it is well formed.
pub trait ExecutionContext {
    /// Address of the authenticated caller.
    fn caller(&self) -> &str;

    /// Current time in seconds since UNIX_EPOCH.
    fn now(&self) -> u64;

    /// Record an event produced by a successful operation.
    fn emit(&self, event: IdentityEvent);
}

/// Context for a single message: fixed caller, fixed block time, and an
/// event buffer.
#[derive(Debug)]
pub struct TxContext {
    caller: String,
    block_time: u64,
    events: Mutex<Vec<IdentityEvent>>,
}

impl TxContext {
    pub fn new(caller: impl Into<String>, block_time: u64) -> Self {
        Self {
            caller: caller.into(),
            block_time,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the events emitted so far.
    pub fn events(&self) -> Vec<IdentityEvent> {
        self.events.lock().clone()
    }

    pub fn take_events(&self) -> Vec<IdentityEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl ExecutionContext for TxContext {
    fn caller(&self) -> &str {
        &self.caller
    }

    fn now(&self) -> u64 {
        self.block_time
    }

    fn emit(&self, event: IdentityEvent) {
        self.events.lock().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonn_types::ProfileId;

    #[test]
    fn events_are_buffered_in_order() {
        let ctx = TxContext::new("caller", 5);
        ctx.emit(IdentityEvent::ProfileUpdated {
            profile_id: ProfileId::new("a"),
        });
        ctx.emit(IdentityEvent::ProfileUpdated {
            profile_id: ProfileId::new("b"),
        });

        let taken = ctx.take_events();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].profile_id().as_str(), "a");
        assert!(ctx.events().is_empty());
    }
}

//! Events emitted by the splitter

use crate::clock::Tick;

/// Something observable happened to the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitEvent {
    /// A wipe reset started a new run
    RunStarted,
    /// A split completed
    Split {
        index: usize,
        name: Option<String>,
        tick: Tick,
    },
    /// The latest manual split was undone
    Unsplit { index: usize, name: Option<String> },
    /// Every non-fail split is complete
    RunComplete { tick: Tick },
    /// A fail split triggered
    RunFailed { index: usize, tick: Tick },
    /// The user stopped the timer
    RunStopped { tick: Tick },
}

impl SplitEvent {
    /// Whether this event ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SplitEvent::RunComplete { .. } | SplitEvent::RunFailed { .. } | SplitEvent::RunStopped { .. }
        )
    }
}

/// Callback type for split events
pub type SplitCallback = Box<dyn Fn(&SplitEvent) + Send + Sync>;

/// Event handler that can have multiple listeners
pub struct EventHandler {
    callbacks: Vec<SplitCallback>,
}

impl EventHandler {
    /// Create a new event handler
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    /// Add a listener
    pub fn on_event(&mut self, callback: SplitCallback) {
        self.callbacks.push(callback);
    }

    /// Emit an event to all listeners
    pub fn emit(&self, event: SplitEvent) {
        for callback in &self.callbacks {
            callback(&event);
        }
    }

    /// Check if there are any listeners
    pub fn has_listeners(&self) -> bool {
        !self.callbacks.is_empty()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_emit_to_all_listeners() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut handler = EventHandler::new();
        assert!(!handler.has_listeners());

        for _ in 0..2 {
            let seen = seen.clone();
            handler.on_event(Box::new(move |event: &SplitEvent| seen.lock().push(event.clone())));
        }
        handler.emit(SplitEvent::RunComplete { tick: 9 });

        assert!(handler.has_listeners());
        assert_eq!(seen.lock().len(), 2);
        assert!(seen.lock()[0].is_terminal());
    }

    #[test]
    fn test_terminal_events() {
        assert!(!SplitEvent::RunStarted.is_terminal());
        assert!(!SplitEvent::Split { index: 0, name: None, tick: 1 }.is_terminal());
        assert!(SplitEvent::RunFailed { index: 1, tick: 2 }.is_terminal());
        assert!(SplitEvent::RunStopped { tick: 3 }.is_terminal());
    }
}

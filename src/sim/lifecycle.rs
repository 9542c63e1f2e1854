//! Object lifecycle state machine
//!
//! Uninitialized -> Initialized -> Released. Every transition is checked and
//! misuse panics immediately: it means the orchestrator sequenced something
//! wrong, which is a bug, not a runtime condition.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Uninitialized,
    Initialized,
    Released,
}

impl Lifecycle {
    /// Uninitialized -> Initialized
    #[track_caller]
    pub fn initialize(&mut self, what: &str) {
        assert!(
            *self == Lifecycle::Uninitialized,
            "already initialized {what} object... (state: {self:?})"
        );
        *self = Lifecycle::Initialized;
    }

    /// Panic unless Initialized (guards tick/render)
    #[track_caller]
    pub fn expect_live(&self, what: &str) {
        if !self.is_live() {
            self.not_live(what);
        }
    }

    /// The panic raised when a non-live object is used
    #[track_caller]
    pub fn not_live(&self, what: &str) -> ! {
        panic!("{what} object is not initialized or has already been released... (state: {self:?})")
    }

    /// Initialized -> Released
    #[track_caller]
    pub fn release(&mut self, what: &str) {
        self.expect_live(what);
        *self = Lifecycle::Released;
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        *self == Lifecycle::Initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = Lifecycle::default();
        assert_eq!(state, Lifecycle::Uninitialized);
        state.initialize("test");
        assert!(state.is_live());
        state.release("test");
        assert_eq!(state, Lifecycle::Released);
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_double_initialize_panics() {
        let mut state = Lifecycle::default();
        state.initialize("test");
        state.initialize("test");
    }

    #[test]
    #[should_panic(expected = "already initialized")]
    fn test_reinitialize_after_release_panics() {
        let mut state = Lifecycle::default();
        state.initialize("test");
        state.release("test");
        state.initialize("test");
    }

    #[test]
    #[should_panic(expected = "not initialized")]
    fn test_release_uninitialized_panics() {
        let mut state = Lifecycle::default();
        state.release("test");
    }

    #[test]
    #[should_panic(expected = "has already been released")]
    fn test_double_release_panics() {
        let mut state = Lifecycle::default();
        state.initialize("test");
        state.release("test");
        state.release("test");
    }
}

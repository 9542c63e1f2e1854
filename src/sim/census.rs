//! Live object counting for lifetime auditing
//!
//! The scene owns a `LiveCount`; each live object holds a `LiveToken` and the
//! count drops when the token does, whether through `release()` or drop.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct LiveCount(Rc<Cell<usize>>);

impl LiveCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    pub fn acquire(&self) -> LiveToken {
        self.0.set(self.0.get() + 1);
        LiveToken(Rc::clone(&self.0))
    }
}

#[derive(Debug)]
pub struct LiveToken(Rc<Cell<usize>>);

impl Drop for LiveToken {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_track_count() {
        let count = LiveCount::new();
        let a = count.acquire();
        let b = count.acquire();
        assert_eq!(count.get(), 2);
        drop(a);
        assert_eq!(count.get(), 1);
        drop(b);
        assert_eq!(count.get(), 0);
    }
}

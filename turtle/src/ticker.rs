// turtlestage/turtle/src/ticker.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The shared per-frame ticker that drives every board's animations.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use tracing::trace;

/// Anything advanced by frame time.
pub trait Animate {
    fn advance(&mut self, elapsed_ms: f32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickerToken(u64);

struct Entry {
    token: TickerToken,
    target: Weak<RefCell<dyn Animate>>,
}

#[derive(Default)]
struct TickerInner {
    next_token: u64,
    entries: Vec<Entry>,
    frames: u64,
}

/// Cloneable handle; clones share one registration list.
#[derive(Clone, Default)]
pub struct Ticker {
    inner: Rc<RefCell<TickerInner>>,
}

impl Ticker {
    pub fn new() -> Ticker {
        Ticker::default()
    }

    pub fn register(&self, target: Weak<RefCell<dyn Animate>>) -> TickerToken {
        let mut inner = self.inner.borrow_mut();
        let token = TickerToken(inner.next_token);
        inner.next_token += 1;
        inner.entries.push(Entry { token, target });
        token
    }

    /// Returns `false` if the token was not (or no longer) registered.
    pub fn unregister(&self, token: TickerToken) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.entries.len();
        inner.entries.retain(|entry| entry.token != token);
        inner.entries.len() != before
    }

    /// Advances every live registration, in registration order.
    pub fn tick(&self, elapsed: Duration) {
        let elapsed_ms = elapsed.as_micros() as f32 / 1000.0;
        let targets: Vec<Rc<RefCell<dyn Animate>>> = {
            let mut inner = self.inner.borrow_mut();
            inner.frames += 1;
            inner.entries.retain(|entry| entry.target.strong_count() > 0);
            inner
                .entries
                .iter()
                .filter_map(|entry| entry.target.upgrade())
                .collect()
        };

        for target in targets {
            match target.try_borrow_mut() {
                Ok(mut target) => target.advance(elapsed_ms),
                Err(_) => trace!("skipping animator that is borrowed during tick"),
            }
        }
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.target.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn frames(&self) -> u64 {
        self.inner.borrow().frames
    }
}

#[cfg(test)]
mod tests {
    use super::{Animate, Ticker};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Default)]
    struct Clock {
        total: f32,
    }

    impl Animate for Clock {
        fn advance(&mut self, elapsed_ms: f32) {
            self.total += elapsed_ms;
        }
    }

    fn register(ticker: &Ticker, clock: &Rc<RefCell<Clock>>) -> super::TickerToken {
        let target: Rc<RefCell<dyn Animate>> = clock.clone();
        ticker.register(Rc::downgrade(&target))
    }

    #[test]
    fn tick_advances_registered_targets() {
        let ticker = Ticker::new();
        let clock = Rc::new(RefCell::new(Clock::default()));
        register(&ticker, &clock);

        ticker.tick(Duration::from_millis(16));
        ticker.tick(Duration::from_millis(4));
        assert_eq!(clock.borrow().total, 20.0);
        assert_eq!(ticker.frames(), 2);
    }

    #[test]
    fn unregister_is_idempotent() {
        let ticker = Ticker::new();
        let clock = Rc::new(RefCell::new(Clock::default()));
        let token = register(&ticker, &clock);

        assert!(ticker.unregister(token));
        assert!(!ticker.unregister(token));
        ticker.tick(Duration::from_millis(16));
        assert_eq!(clock.borrow().total, 0.0);
    }

    #[test]
    fn dropped_targets_are_pruned() {
        let ticker = Ticker::new();
        let clock = Rc::new(RefCell::new(Clock::default()));
        register(&ticker, &clock);
        assert_eq!(ticker.len(), 1);

        drop(clock);
        ticker.tick(Duration::from_millis(16));
        assert!(ticker.is_empty());
    }
}

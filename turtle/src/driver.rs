// turtlestage/turtle/src/driver.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Headless frame loop: polls a board future and ticks between polls.

use crate::error::DriverError;
use crate::ticker::Ticker;
use futures_util::pin_mut;
use futures_util::task::noop_waker;
use std::future::Future;
use std::task::{Context, Poll};
use std::time::Duration;
use tracing::trace;

/// Roughly 60 frames per second.
pub const DEFAULT_FRAME: Duration = Duration::from_millis(16);

/// Drives `future` to completion, advancing `ticker` by `frame` every time
/// it is still pending. Gives up after `max_frames` ticks.
pub fn block_on<F>(
    ticker: &Ticker,
    frame: Duration,
    max_frames: u64,
    future: F,
) -> Result<F::Output, DriverError>
where
    F: Future,
{
    pin_mut!(future);
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);

    let mut frames = 0;
    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            trace!(frames, "future completed");
            return Ok(output);
        }
        if frames == max_frames {
            return Err(DriverError::Stalled { frames });
        }
        ticker.tick(frame);
        frames += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::{block_on, DEFAULT_FRAME};
    use crate::completion::Completion;
    use crate::error::DriverError;
    use crate::ticker::Ticker;

    #[test]
    fn ready_future_needs_no_frames() {
        let ticker = Ticker::new();
        assert_eq!(block_on(&ticker, DEFAULT_FRAME, 0, async { 7 }).unwrap(), 7);
        assert_eq!(ticker.frames(), 0);
    }

    #[test]
    fn never_resolved_future_stalls() {
        let ticker = Ticker::new();
        let (completion, _resolver) = Completion::pending();
        match block_on(&ticker, DEFAULT_FRAME, 5, completion) {
            Err(DriverError::Stalled { frames }) => assert_eq!(frames, 5),
            other => panic!("unexpected: {:?}", other),
        }
    }
}

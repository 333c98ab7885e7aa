// turtlestage/turtle/src/completion.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! One-shot completion signals for board commands.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Debug, Default)]
struct Shared {
    resolved: bool,
    waker: Option<Waker>,
}

/// Resolves once, when the command that produced it has finished.
#[derive(Clone, Debug)]
pub struct Completion {
    shared: Rc<RefCell<Shared>>,
}

/// The write half of a pending [`Completion`]. Consumed by `resolve`.
#[derive(Debug)]
pub struct Resolver {
    shared: Rc<RefCell<Shared>>,
}

impl Completion {
    /// An already resolved signal, for commands that finish synchronously.
    pub fn ready() -> Completion {
        Completion {
            shared: Rc::new(RefCell::new(Shared {
                resolved: true,
                waker: None,
            })),
        }
    }

    pub fn pending() -> (Completion, Resolver) {
        let shared = Rc::new(RefCell::new(Shared::default()));
        (
            Completion {
                shared: shared.clone(),
            },
            Resolver { shared },
        )
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.shared.borrow().resolved
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut shared = self.shared.borrow_mut();
        if shared.resolved {
            return Poll::Ready(());
        }
        shared.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

impl Resolver {
    pub fn resolve(self) {
        let waker = {
            let mut shared = self.shared.borrow_mut();
            shared.resolved = true;
            shared.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

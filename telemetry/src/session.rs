// turtlestage/telemetry/src/session.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::buffer::RingBuffer;
use crate::event::{Measurements, Properties, TelemetryEvent};
use crate::sink::Sink;
use serde_derive::Deserialize;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::rc::{Rc, Weak};
use tracing::{debug, info};

pub const EVENTS_STREAM: &str = "events";
pub const EXCEPTIONS_STREAM: &str = "exceptions";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Events kept per queue before the sink is attached. Zero is treated
    /// as one.
    pub capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> TelemetryConfig {
        TelemetryConfig { capacity: 20 }
    }
}

struct Shared {
    // Set once by `attach_sink`, never cleared.
    ready: Cell<bool>,
    sink: RefCell<Option<Rc<dyn Sink>>>,
    queues: RefCell<Vec<Weak<QueueInner>>>,
    capacity: usize,
}

impl Shared {
    fn sink(&self) -> Option<Rc<dyn Sink>> {
        self.sink.borrow().clone()
    }
}

struct QueueInner {
    name: String,
    buffer: RefCell<RingBuffer<TelemetryEvent>>,
    evicted: Cell<u64>,
}

/// One telemetry stream. Clones share the same buffer.
#[derive(Clone)]
pub struct TelemetryQueue {
    inner: Rc<QueueInner>,
    shared: Rc<Shared>,
}

impl TelemetryQueue {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Forwards to the sink once the session is ready, buffers otherwise.
    pub fn track(&self, id: &str, data: Properties, measurements: Measurements) {
        let event = TelemetryEvent {
            stream: self.inner.name.clone(),
            id: id.to_string(),
            data,
            measurements,
        };

        if self.shared.ready.get() {
            if let Some(sink) = self.shared.sink() {
                sink.log(&event);
            }
            return;
        }

        let evicted = self.inner.buffer.borrow_mut().push(event);
        if let Some(evicted) = evicted {
            self.inner.evicted.set(self.inner.evicted.get() + 1);
            debug!(stream = %self.inner.name, id = %evicted.id, "telemetry buffer full, dropped oldest");
        }
    }

    /// Drains the buffer into the sink, oldest first. Returns how many
    /// events were forwarded; zero while no sink is attached.
    pub fn flush(&self) -> usize {
        let sink = match self.shared.sink() {
            Some(sink) => sink,
            None => return 0,
        };

        let pending: Vec<TelemetryEvent> = self.inner.buffer.borrow_mut().drain().collect();
        for event in &pending {
            sink.log(event);
        }
        pending.len()
    }

    /// Events currently waiting for a sink.
    pub fn pending(&self) -> usize {
        self.inner.buffer.borrow().len()
    }

    /// Events dropped because the buffer was full.
    pub fn evicted(&self) -> u64 {
        self.inner.evicted.get()
    }
}

/// Owns the sink-ready flag and the queues that share it.
pub struct TelemetrySession {
    shared: Rc<Shared>,
    events: TelemetryQueue,
    exceptions: TelemetryQueue,
}

impl TelemetrySession {
    pub fn new(config: TelemetryConfig) -> TelemetrySession {
        let shared = Rc::new(Shared {
            ready: Cell::new(false),
            sink: RefCell::new(None),
            queues: RefCell::new(vec![]),
            capacity: config.capacity.max(1),
        });
        let events = TelemetrySession::register(&shared, EVENTS_STREAM);
        let exceptions = TelemetrySession::register(&shared, EXCEPTIONS_STREAM);
        TelemetrySession {
            shared,
            events,
            exceptions,
        }
    }

    fn register(shared: &Rc<Shared>, name: &str) -> TelemetryQueue {
        let inner = Rc::new(QueueInner {
            name: name.to_string(),
            buffer: RefCell::new(RingBuffer::new(shared.capacity)),
            evicted: Cell::new(0),
        });
        shared.queues.borrow_mut().push(Rc::downgrade(&inner));
        TelemetryQueue {
            inner,
            shared: shared.clone(),
        }
    }

    /// Registers an extra stream; it is flushed after the ones before it.
    pub fn queue(&self, name: &str) -> TelemetryQueue {
        TelemetrySession::register(&self.shared, name)
    }

    pub fn events(&self) -> &TelemetryQueue {
        &self.events
    }

    pub fn exceptions(&self) -> &TelemetryQueue {
        &self.exceptions
    }

    pub fn is_ready(&self) -> bool {
        self.shared.ready.get()
    }

    pub fn track(&self, id: &str, data: Properties, measurements: Measurements) {
        self.events.track(id, data, measurements)
    }

    /// Records `error` and its source chain on the exceptions stream.
    pub fn track_exception(&self, id: &str, error: &dyn Error, mut data: Properties) {
        data.insert("message".to_string(), error.to_string());
        let mut causes = vec![];
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        if !causes.is_empty() {
            data.insert("causes".to_string(), causes.join(" <- "));
        }
        self.exceptions.track(id, data, Measurements::new())
    }

    /// Installs `sink`, marks the session ready and flushes every queue in
    /// registration order. Returns the number of flushed events.
    pub fn attach_sink<S>(&self, sink: S) -> usize
    where
        S: Sink + 'static,
    {
        let sink: Rc<dyn Sink> = Rc::new(sink);
        *self.shared.sink.borrow_mut() = Some(sink);
        self.shared.ready.set(true);

        let queues: Vec<Rc<QueueInner>> = {
            let mut queues = self.shared.queues.borrow_mut();
            queues.retain(|queue| queue.strong_count() > 0);
            queues.iter().filter_map(Weak::upgrade).collect()
        };
        let flushed: usize = queues
            .into_iter()
            .map(|inner| {
                TelemetryQueue {
                    inner,
                    shared: self.shared.clone(),
                }
                .flush()
            })
            .sum();
        info!(flushed, "telemetry sink attached");
        flushed
    }
}

impl Default for TelemetrySession {
    fn default() -> TelemetrySession {
        TelemetrySession::new(TelemetryConfig::default())
    }
}

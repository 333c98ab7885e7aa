// turtlestage/telemetry/src/sink.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Where events end up once a sink is attached.

use crate::event::TelemetryEvent;
use std::cell::RefCell;
use std::io::Write;
use tracing::{info, warn};

/// Receives every event. Sinks cannot fail from the caller's point of view.
pub trait Sink {
    fn log(&self, event: &TelemetryEvent);
}

impl<F> Sink for F
where
    F: Fn(&TelemetryEvent),
{
    fn log(&self, event: &TelemetryEvent) {
        self(event)
    }
}

/// Emits each event as a `tracing` record.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn log(&self, event: &TelemetryEvent) {
        info!(
            target: "telemetry",
            stream = %event.stream,
            id = %event.id,
            data = ?event.data,
            measurements = ?event.measurements,
            "event"
        );
    }
}

/// Writes one JSON object per line, flushing after each. Write errors are
/// logged and dropped.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    out: RefCell<W>,
}

impl<W> JsonLinesSink<W>
where
    W: Write,
{
    pub fn new(out: W) -> JsonLinesSink<W> {
        JsonLinesSink {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W> Sink for JsonLinesSink<W>
where
    W: Write,
{
    fn log(&self, event: &TelemetryEvent) {
        let mut out = self.out.borrow_mut();
        let written = serde_json::to_writer(&mut *out, event)
            .map_err(|err| err.to_string())
            .and_then(|()| out.write_all(b"\n").map_err(|err| err.to_string()))
            .and_then(|()| out.flush().map_err(|err| err.to_string()));
        if let Err(err) = written {
            warn!(id = %event.id, "dropping telemetry event: {}", err);
        }
    }
}

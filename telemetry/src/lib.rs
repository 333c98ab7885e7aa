// turtlestage/telemetry/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Telemetry buffering in front of a sink that shows up late.
//!
//! Each [`TelemetryQueue`] keeps the most recent events of one stream until
//! the owning [`TelemetrySession`] gets a sink. Attaching the sink flushes
//! every queue in registration order; from then on `track` forwards
//! directly.

pub mod buffer;
pub mod event;
pub mod session;
pub mod sink;

pub use crate::buffer::RingBuffer;
pub use crate::event::{Measurements, Properties, TelemetryEvent};
pub use crate::session::{TelemetryConfig, TelemetryQueue, TelemetrySession};
pub use crate::sink::{JsonLinesSink, Sink, TracingSink};

// turtlestage/turtle/src/animation.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-board animation state.

use crate::completion::Resolver;
use crate::stage::{NodeId, StrokeNode};
use serde_derive::{Deserialize, Serialize};
use turtlestage_geometry::basic::point::Point2DF32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    QuadInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.max(0.0).min(1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) * 0.5
                }
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Easing {
        Easing::Linear
    }
}

pub(crate) enum Phase {
    Idle,
    Animating(Animation),
}

impl Phase {
    pub(crate) fn is_animating(&self) -> bool {
        match *self {
            Phase::Idle => false,
            Phase::Animating(_) => true,
        }
    }
}

pub(crate) struct Animation {
    pub(crate) kind: AnimationKind,
    pub(crate) elapsed: f32,
    pub(crate) duration: f32,
    pub(crate) resolver: Resolver,
}

pub(crate) enum AnimationKind {
    /// World-space move. `stroke` is the segment whose endpoint follows the
    /// avatar.
    Translate {
        from: Point2DF32,
        to: Point2DF32,
        stroke: Option<(NodeId, StrokeNode)>,
    },
    /// `to` is unnormalized so the tween sweeps the requested direction.
    Rotate { from: f32, to: f32 },
    /// Startup delay.
    Wait,
}

impl Animation {
    pub(crate) fn new(kind: AnimationKind, duration: f32, resolver: Resolver) -> Animation {
        Animation {
            kind,
            elapsed: 0.0,
            duration,
            resolver,
        }
    }

    #[inline]
    pub(crate) fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    #[inline]
    pub(crate) fn progress(&self, easing: Easing) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        easing.apply(self.elapsed / self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    #[test]
    fn easings_hit_their_endpoints() {
        for easing in &[Easing::Linear, Easing::QuadInOut] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(2.0), 1.0);
        }
        assert_eq!(Easing::QuadInOut.apply(0.5), 0.5);
        assert!(Easing::QuadInOut.apply(0.25) < 0.25);
    }
}

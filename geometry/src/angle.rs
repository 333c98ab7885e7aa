// turtlestage/geometry/src/angle.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Compass-style angles: degrees, 0 points up, positive turns clockwise.

use crate::basic::point::Point2DF32;

/// Wraps an angle in degrees into the half-open range (-180, 180].
///
/// NaN and infinities are passed through the arithmetic unchanged.
#[inline]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Unit displacement for a heading: `(sin h, cos h)` in y-up coordinates.
#[inline]
pub fn heading_vector(heading: f32) -> Point2DF32 {
    let (s, c) = heading.to_radians().sin_cos();
    Point2DF32::new(s, c)
}

/// The heading that points along `delta` (y-up), normalized.
#[inline]
pub fn heading_towards(delta: Point2DF32) -> f32 {
    normalize_degrees(delta.x().atan2(delta.y()).to_degrees())
}

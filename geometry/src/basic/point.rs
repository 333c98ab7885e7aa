// turtlestage/geometry/src/basic/point.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A 2D point with 32-bit float coordinates.

use serde_derive::{Deserialize, Serialize};
use std::ops::{Add, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2DF32 {
    x: f32,
    y: f32,
}

impl Point2DF32 {
    #[inline]
    pub fn new(x: f32, y: f32) -> Point2DF32 {
        Point2DF32 { x, y }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn scale(&self, factor: f32) -> Point2DF32 {
        Point2DF32::new(self.x * factor, self.y * factor)
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance_to(&self, other: Point2DF32) -> f32 {
        (other - *self).length()
    }

    /// Linear interpolation; `t = 0` yields `self`, `t = 1` yields `other`.
    #[inline]
    pub fn lerp(&self, other: Point2DF32, t: f32) -> Point2DF32 {
        *self + (other - *self).scale(t)
    }

    /// Flips the y axis, turning y-up world coordinates into y-down screen
    /// offsets (and back).
    #[inline]
    pub fn flip_y(&self) -> Point2DF32 {
        Point2DF32::new(self.x, -self.y)
    }
}

impl Add<Point2DF32> for Point2DF32 {
    type Output = Point2DF32;
    #[inline]
    fn add(self, other: Point2DF32) -> Point2DF32 {
        Point2DF32::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub<Point2DF32> for Point2DF32 {
    type Output = Point2DF32;
    #[inline]
    fn sub(self, other: Point2DF32) -> Point2DF32 {
        Point2DF32::new(self.x - other.x, self.y - other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Point2DF32;

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Point2DF32::new(-3.0, 4.5);
        let b = Point2DF32::new(10.0, -2.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 0.5), Point2DF32::new(3.5, 1.25));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point2DF32::new(1.0, 1.0);
        assert_eq!(a.distance_to(Point2DF32::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn flip_y_negates_only_y() {
        assert_eq!(Point2DF32::new(2.0, 3.0).flip_y(), Point2DF32::new(2.0, -3.0));
    }
}

// turtlestage/geometry/src/color.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use serde_derive::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorU {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl ColorU {
    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> ColorU {
        ColorU { r, g, b, a: 255 }
    }

    #[inline]
    pub fn black() -> ColorU {
        ColorU::from_rgb(0, 0, 0)
    }

    #[inline]
    pub fn white() -> ColorU {
        ColorU::from_rgb(255, 255, 255)
    }

    #[inline]
    pub fn alpha_f32(&self) -> f32 {
        self.a as f32 / 255.0
    }
}

impl Default for ColorU {
    #[inline]
    fn default() -> ColorU {
        ColorU::black()
    }
}

/// Formats as a CSS hex color, `#rrggbb`. Alpha is not included.
impl Display for ColorU {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::ColorU;

    #[test]
    fn display_is_css_hex() {
        assert_eq!(ColorU::from_rgb(255, 128, 0).to_string(), "#ff8000");
        assert_eq!(ColorU::black().to_string(), "#000000");
    }

    #[test]
    fn alpha_is_normalized() {
        assert_eq!(ColorU::white().alpha_f32(), 1.0);
        assert_eq!(ColorU { r: 0, g: 0, b: 0, a: 0 }.alpha_f32(), 0.0);
    }
}

// turtlestage/uturtle/src/ast.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Inspiration for the commands are from https://docs.kde.org/trunk5/en/kdeedu/kturtle/commands.html

use serde_derive::{Deserialize, Serialize};

/// One turtle command. Angles are in degrees; positive turns are clockwise.
///
/// Serialized externally tagged in snake case, so a host can send
/// `{"move": 50}`, `"pen_up"` or `{"print": ["hello", true]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Reset,
    Clear,
    PenUp,
    PenDown,
    Turn(f32),
    Move(f32),
    Direction(f32),
    PushLoc,
    PopLoc,
    PushRot,
    PopRot,
    Go(f32, f32),
    GoX(f32),
    GoY(f32),
    MoveTo(f32, f32, f32), // x, y, heading.
    PenWidth(f32),
    PenColor(u8, u8, u8), // RGB color.
    Print(String, bool),  // Text, advance past it.
    Speed(Speed),
    ShowTurtle,
    HideTurtle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    Slowest,
    Slow,
    Normal,
    Fast,
    Fastest,
}

impl Speed {
    /// Animation delay in milliseconds per unit of distance. Turns use half
    /// of this per degree. Zero means commands complete without animating.
    #[inline]
    pub fn delay_ms(self) -> f32 {
        match self {
            Speed::Slowest => 20.0,
            Speed::Slow => 10.0,
            Speed::Normal => 5.0,
            Speed::Fast => 1.0,
            Speed::Fastest => 0.0,
        }
    }
}

pub type Turtle = Vec<Command>;

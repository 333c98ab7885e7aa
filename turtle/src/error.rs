// turtlestage/turtle/src/error.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::sprite::SpriteError;

/// Errors returned by board commands.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("an animation is still running")]
    Busy,

    #[error("board is not initialized")]
    NotReady,

    #[error("board was killed")]
    Killed,

    #[error("failed to load avatar sprite: {0}")]
    Sprite(#[from] SpriteError),
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("future still pending after {frames} frames")]
    Stalled { frames: u64 },
}

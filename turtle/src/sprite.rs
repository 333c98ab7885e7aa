// turtlestage/turtle/src/sprite.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Avatar sprite loading.

use futures_util::future::{self, FutureExt, LocalBoxFuture};
use serde_derive::{Deserialize, Serialize};

/// An animation strip: `frames` cells of `frame_width` x `frame_height`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    pub key: String,
    pub frames: u32,
    pub frame_width: f32,
    pub frame_height: f32,
}

impl SpriteSheet {
    /// Rejects sheets that cannot be cut into frames.
    pub fn validate(&self) -> Result<(), SpriteError> {
        let reason = if self.frames == 0 {
            "sheet has no frames"
        } else if !(self.frame_width > 0.0 && self.frame_height > 0.0) {
            "frame size must be positive"
        } else {
            return Ok(());
        };
        Err(SpriteError::Decode {
            key: self.key.clone(),
            reason: reason.to_string(),
        })
    }

    pub fn turtle() -> SpriteSheet {
        SpriteSheet {
            key: "turtle".to_string(),
            frames: 4,
            frame_width: 32.0,
            frame_height: 32.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("no sprite named `{0}`")]
    NotFound(String),

    #[error("sprite `{key}` could not be decoded: {reason}")]
    Decode { key: String, reason: String },
}

/// Asynchronous sprite factory supplied by the host.
pub trait SpriteLoader {
    fn load(&self, key: &str) -> LocalBoxFuture<'static, Result<SpriteSheet, SpriteError>>;
}

/// Serves one sheet that is already in memory.
#[derive(Clone, Debug)]
pub struct StaticSprite(pub SpriteSheet);

impl SpriteLoader for StaticSprite {
    fn load(&self, key: &str) -> LocalBoxFuture<'static, Result<SpriteSheet, SpriteError>> {
        let result = if key == self.0.key {
            self.0.validate().map(|()| self.0.clone())
        } else {
            Err(SpriteError::NotFound(key.to_string()))
        };
        future::ready(result).boxed_local()
    }
}

impl Default for StaticSprite {
    fn default() -> StaticSprite {
        StaticSprite(SpriteSheet::turtle())
    }
}

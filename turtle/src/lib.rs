// turtlestage/turtle/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An animated turtle board: turtle commands become incremental mutations of
//! a retained 2D stage, with moves and turns tweened over ticker frames.
//!
//! Every pose-changing command hands back a [`Completion`]. With a zero delay
//! speed it is already resolved; otherwise the board stays `Animating` until
//! enough [`Ticker::tick`] time has passed, and rejects overlapping commands
//! with [`BoardError::Busy`] meanwhile.

#[macro_use]
extern crate bitflags;

pub mod animation;
pub mod board;
pub mod completion;
pub mod driver;
pub mod error;
pub mod interp;
pub mod scene;
pub mod sprite;
pub mod stage;
pub mod ticker;

pub use crate::board::{Board, BoardConfig};
pub use crate::completion::{Completion, Resolver};
pub use crate::driver::block_on;
pub use crate::error::{BoardError, DriverError};
pub use crate::interp::{Interpreter, RunFlags};
pub use crate::scene::Scene;
pub use crate::sprite::{SpriteError, SpriteLoader, SpriteSheet, StaticSprite};
pub use crate::stage::{Node, NodeId, Stage};
pub use crate::ticker::Ticker;
pub use uturtle::ast::Speed;

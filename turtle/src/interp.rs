// turtlestage/turtle/src/interp.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Dispatches turtle commands to a board, one after another.

use crate::board::Board;
use crate::error::BoardError;
use crate::stage::Stage;
use std::fmt::{Display, Formatter, Result as FormatResult};
use tracing::{debug, warn};
use turtlestage_geometry::angle::normalize_degrees;
use turtlestage_geometry::basic::point::Point2DF32;
use turtlestage_geometry::color::ColorU;
use uturtle::ast::Command;

bitflags! {
    // NB: If you change this, make sure to update the `Display`
    // implementation as well.
    pub struct RunFlags: u16 {
        const ERR_POPLOC_EMPTY_STACK       = 0x0001;
        const ERR_POPROT_EMPTY_STACK       = 0x0002;
    }
}

impl Display for RunFlags {
    fn fmt(&self, formatter: &mut Formatter) -> FormatResult {
        if self.is_empty() {
            return Ok(());
        }

        let mut first = true;
        for (bit, name) in NAMES.iter().enumerate() {
            if (self.bits() >> bit) & 1 == 0 {
                continue;
            }
            if !first {
                formatter.write_str(", ")?;
            } else {
                first = false;
            }
            formatter.write_str(name)?;
        }

        return Ok(());

        // Must match the order in `RunFlags`.
        static NAMES: &'static [&'static str] =
            &["poploc on empty stack", "poprot on empty stack"];
    }
}

/// Interpreter state that outlives single commands: the location and
/// rotation stacks, and the flags raised so far.
#[derive(Debug, Default)]
pub struct Interpreter {
    positions: Vec<Point2DF32>,
    directions: Vec<f32>,
    flags: RunFlags,
}

impl Default for RunFlags {
    fn default() -> RunFlags {
        RunFlags::empty()
    }
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::default()
    }

    pub fn flags(&self) -> RunFlags {
        self.flags
    }

    /// Runs every command, waiting for each to complete before the next.
    pub async fn run<S>(&mut self, board: &Board<S>, turtle: &[Command]) -> Result<RunFlags, BoardError>
    where
        S: Stage + 'static,
    {
        for command in turtle {
            self.execute(board, command).await?;
        }
        Ok(self.flags)
    }

    pub async fn execute<S>(&mut self, board: &Board<S>, command: &Command) -> Result<(), BoardError>
    where
        S: Stage + 'static,
    {
        debug!(?command, "execute");
        match *command {
            Command::Reset => {
                board.reset().await?;
                self.positions.clear();
                self.directions.clear();
                self.flags = RunFlags::empty();
            }
            Command::Clear => board.clear()?,
            Command::PenUp => board.set_pen(false),
            Command::PenDown => board.set_pen(true),
            Command::Turn(deg) => board.turn(deg)?.await,
            Command::Direction(deg) => board.turn(normalize_degrees(deg - board.heading()))?.await,
            Command::Move(unit) => board.move_by(unit)?.await,
            Command::PushLoc => self.positions.push(board.position()),
            Command::PopLoc => match self.positions.pop() {
                Some(position) => {
                    board
                        .move_to(position.x(), position.y(), board.heading())
                        .await?
                }
                None => {
                    // NOOP.
                    warn!("poploc on empty stack");
                    self.flags |= RunFlags::ERR_POPLOC_EMPTY_STACK;
                }
            },
            Command::PushRot => self.directions.push(board.heading()),
            Command::PopRot => match self.directions.pop() {
                Some(deg) => board.turn(normalize_degrees(deg - board.heading()))?.await,
                None => {
                    // NOOP.
                    warn!("poprot on empty stack");
                    self.flags |= RunFlags::ERR_POPROT_EMPTY_STACK;
                }
            },
            Command::Go(x, y) => board.move_to(x, y, board.heading()).await?,
            Command::GoX(x) => {
                let y = board.position().y();
                board.move_to(x, y, board.heading()).await?
            }
            Command::GoY(y) => {
                let x = board.position().x();
                board.move_to(x, y, board.heading()).await?
            }
            Command::MoveTo(x, y, heading) => board.move_to(x, y, heading).await?,
            Command::PenWidth(w) => board.set_pen_size(w),
            Command::PenColor(r, g, b) => board.set_pen_color(ColorU::from_rgb(r, g, b)),
            Command::Print(ref text, advance) => board.print(text, advance).await?,
            Command::Speed(speed) => board.set_speed(speed),
            Command::ShowTurtle => board.set_visible(true),
            Command::HideTurtle => board.set_visible(false),
        }
        Ok(())
    }
}

// turtlestage/turtle/src/stage.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The rendering surface a board draws onto.
//!
//! A stage is an ordered list of children; later children paint over earlier
//! ones. Positions stored in nodes are screen coordinates (y down).

use crate::sprite::SpriteSheet;
use serde_derive::Serialize;
use turtlestage_geometry::basic::line_segment::LineSegmentF32;
use turtlestage_geometry::basic::point::Point2DF32;
use turtlestage_geometry::color::ColorU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Node {
    Background(BackgroundNode),
    Avatar(AvatarNode),
    Stroke(StrokeNode),
    Text(TextNode),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BackgroundNode {
    pub size: Point2DF32,
    pub color: ColorU,
}

/// The turtle marker. `sprite` stays `None` until the board is initialized.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AvatarNode {
    pub sprite: Option<SpriteSheet>,
    pub frame: u32,
    pub position: Point2DF32,
    pub rotation: f32,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StrokeNode {
    pub segment: LineSegmentF32,
    pub color: ColorU,
    pub width: f32,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextNode {
    pub text: String,
    pub position: Point2DF32,
    pub rotation: f32,
    pub color: ColorU,
    pub font_size: f32,
}

pub trait Stage {
    /// Appends `node` on top of the stack.
    fn add_child(&mut self, node: Node) -> NodeId;

    /// Swaps the content of an existing child in place. Returns `false` for
    /// unknown ids.
    fn replace_child(&mut self, id: NodeId, node: Node) -> bool;

    fn remove_child(&mut self, id: NodeId) -> Option<Node>;

    /// Moves a child to the top of the stack.
    fn raise_to_top(&mut self, id: NodeId) -> bool;

    /// Child ids, bottom to top.
    fn child_ids(&self) -> Vec<NodeId>;

    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Rendered width of `text` in pixels.
    fn measure_text(&self, text: &str, font_size: f32) -> f32;

    fn child_count(&self) -> usize {
        self.child_ids().len()
    }
}

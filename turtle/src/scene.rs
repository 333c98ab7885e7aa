// turtlestage/turtle/src/scene.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An in-memory stage that can be written out as SVG.

use crate::stage::{Node, NodeId, Stage};
use serde_derive::Serialize;
use std::fmt::{self, Write};

// Average advance of a glyph relative to the font size.
const GLYPH_ADVANCE: f32 = 0.6;

#[derive(Clone, Debug, Serialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    objects: Vec<(NodeId, Node)>,
    id_counter: u32,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Scene {
        Scene {
            width,
            height,
            objects: vec![],
            id_counter: 0,
        }
    }

    fn id(&mut self) -> NodeId {
        self.id_counter += 1;
        NodeId(self.id_counter)
    }

    fn index_of(&self, id: NodeId) -> Option<usize> {
        self.objects.iter().position(|(object_id, _)| *object_id == id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.objects.iter().map(|(_, node)| node)
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // Writing into a `String` cannot fail.
        let _ = self.write_svg(&mut svg);
        svg
    }

    pub fn write_svg<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        for node in self.nodes() {
            match node {
                Node::Background(background) => writeln!(
                    out,
                    r#"  <rect width="{}" height="{}" fill="{}"/>"#,
                    background.size.x(),
                    background.size.y(),
                    background.color
                )?,
                Node::Stroke(stroke) if stroke.visible => {
                    let (from, to) = (stroke.segment.from(), stroke.segment.to());
                    writeln!(
                        out,
                        r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-opacity="{}" stroke-width="{}" stroke-linecap="round"/>"#,
                        from.x(),
                        from.y(),
                        to.x(),
                        to.y(),
                        stroke.color,
                        stroke.color.alpha_f32(),
                        stroke.width
                    )?
                }
                Node::Stroke(_) => {}
                Node::Text(text) => writeln!(
                    out,
                    r#"  <text x="{x}" y="{y}" font-size="{}" fill="{}" transform="rotate({} {x} {y})">{}</text>"#,
                    text.font_size,
                    text.color,
                    text.rotation,
                    escape(&text.text),
                    x = text.position.x(),
                    y = text.position.y()
                )?,
                Node::Avatar(avatar) => {
                    if let (true, Some(sprite)) = (avatar.visible, &avatar.sprite) {
                        let (half_w, half_h) = (sprite.frame_width * 0.5, sprite.frame_height * 0.5);
                        writeln!(
                            out,
                            r##"  <g transform="translate({} {}) rotate({})"><polygon points="0,{} {},{} {},{}" fill="#2e8b57" data-frame="{}"/></g>"##,
                            avatar.position.x(),
                            avatar.position.y(),
                            avatar.rotation,
                            -half_h,
                            half_w,
                            half_h,
                            -half_w,
                            half_h,
                            avatar.frame
                        )?
                    }
                }
            }
        }
        writeln!(out, "</svg>")
    }
}

impl Stage for Scene {
    fn add_child(&mut self, node: Node) -> NodeId {
        let id = self.id();
        self.objects.push((id, node));
        id
    }

    fn replace_child(&mut self, id: NodeId, node: Node) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.objects[index].1 = node;
                true
            }
            None => false,
        }
    }

    fn remove_child(&mut self, id: NodeId) -> Option<Node> {
        let index = self.index_of(id)?;
        Some(self.objects.remove(index).1)
    }

    fn raise_to_top(&mut self, id: NodeId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                let object = self.objects.remove(index);
                self.objects.push(object);
                true
            }
            None => false,
        }
    }

    fn child_ids(&self) -> Vec<NodeId> {
        self.objects.iter().map(|(id, _)| *id).collect()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|index| &self.objects[index].1)
    }

    fn measure_text(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * GLYPH_ADVANCE
    }

    fn child_count(&self) -> usize {
        self.objects.len()
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

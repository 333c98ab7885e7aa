// turtlestage/turtle/src/board.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The turtle board: pose state plus its rendering on a stage.
//!
//! World coordinates are origin-relative with y up; the origin sits at the
//! centre of the stage. Headings are compass degrees in (-180, 180], 0 up,
//! positive clockwise.

use crate::animation::{Animation, AnimationKind, Easing, Phase};
use crate::completion::Completion;
use crate::error::BoardError;
use crate::sprite::{SpriteLoader, SpriteSheet};
use crate::stage::{AvatarNode, BackgroundNode, Node, NodeId, Stage, StrokeNode, TextNode};
use crate::ticker::{Animate, Ticker, TickerToken};
use serde_derive::Deserialize;
use std::cell::RefCell;
use std::mem;
use std::rc::Rc;
use tracing::{debug, warn};
use turtlestage_geometry::angle::{heading_towards, heading_vector, normalize_degrees};
use turtlestage_geometry::basic::line_segment::LineSegmentF32;
use turtlestage_geometry::basic::point::Point2DF32;
use turtlestage_geometry::color::ColorU;
use uturtle::ast::Speed;

// How long each walking frame of the avatar is shown.
const AVATAR_FRAME_MS: f32 = 100.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: f32,
    pub height: f32,
    pub background: ColorU,
    pub pen_color: ColorU,
    pub pen_size: f32,
    pub speed: Speed,
    /// Pause after the avatar sprite is installed, hiding the load flicker.
    pub startup_delay_ms: f32,
    pub easing: Easing,
    pub font_size: f32,
    /// Sprite key handed to the `SpriteLoader`.
    pub avatar: String,
}

impl Default for BoardConfig {
    fn default() -> BoardConfig {
        BoardConfig {
            width: 480.0,
            height: 360.0,
            background: ColorU::white(),
            pen_color: ColorU::black(),
            pen_size: 1.0,
            speed: Speed::Normal,
            startup_delay_ms: 1000.0,
            easing: Easing::Linear,
            font_size: 16.0,
            avatar: "turtle".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Readiness {
    Created,
    Loading,
    Ready,
}

struct BoardState<S> {
    stage: S,
    config: BoardConfig,
    position: Point2DF32,
    heading: f32,
    pen: bool,
    pen_size: f32,
    pen_color: ColorU,
    speed: Speed,
    visible: bool,
    background: NodeId,
    avatar: NodeId,
    avatar_frame: u32,
    sprite: Option<SpriteSheet>,
    readiness: Readiness,
    phase: Phase,
    token: Option<TickerToken>,
    killed: bool,
}

/// A turtle drawing onto a stage `S`.
///
/// Commands must be issued one at a time: a command that changes the pose
/// while a previous animation is still running fails with
/// [`BoardError::Busy`].
pub struct Board<S> {
    state: Rc<RefCell<BoardState<S>>>,
    ticker: Ticker,
}

impl<S> Board<S>
where
    S: Stage + 'static,
{
    /// Creates the background and an empty avatar root right away and
    /// registers with `ticker`. Call [`Board::init`] before moving.
    pub fn new(mut stage: S, ticker: &Ticker, config: BoardConfig) -> Board<S> {
        let size = Point2DF32::new(config.width, config.height);
        let background = stage.add_child(Node::Background(BackgroundNode {
            size,
            color: config.background,
        }));
        let avatar = stage.add_child(Node::Avatar(AvatarNode {
            sprite: None,
            frame: 0,
            position: size.scale(0.5),
            rotation: 0.0,
            visible: true,
        }));

        let state = Rc::new(RefCell::new(BoardState {
            stage,
            position: Point2DF32::default(),
            heading: 0.0,
            pen: true,
            pen_size: config.pen_size,
            pen_color: config.pen_color,
            speed: config.speed,
            visible: true,
            background,
            avatar,
            avatar_frame: 0,
            sprite: None,
            readiness: Readiness::Created,
            phase: Phase::Idle,
            token: None,
            killed: false,
            config,
        }));

        let animator: Rc<RefCell<dyn Animate>> = state.clone();
        let token = ticker.register(Rc::downgrade(&animator));
        state.borrow_mut().token = Some(token);

        Board {
            state,
            ticker: ticker.clone(),
        }
    }

    /// Loads the avatar sprite, then waits out the startup delay on the
    /// ticker. Calling it again once ready is a no-op.
    pub async fn init(&self, loader: &dyn SpriteLoader) -> Result<(), BoardError> {
        let key = {
            let mut state = self.state.borrow_mut();
            if state.killed {
                return Err(BoardError::Killed);
            }
            match state.readiness {
                Readiness::Ready => return Ok(()),
                Readiness::Loading => return Err(BoardError::Busy),
                Readiness::Created => {}
            }
            state.readiness = Readiness::Loading;
            state.config.avatar.clone()
        };

        let sprite = match loader.load(&key).await {
            Ok(sprite) => sprite,
            Err(err) => {
                warn!(key = %key, "avatar sprite failed to load: {}", err);
                self.state.borrow_mut().readiness = Readiness::Created;
                return Err(err.into());
            }
        };

        let startup = {
            let mut state = self.state.borrow_mut();
            if state.killed {
                return Err(BoardError::Killed);
            }
            state.sprite = Some(sprite);
            state.sync_avatar();
            state.begin_wait()
        };
        startup.await;

        if self.state.borrow().killed {
            return Err(BoardError::Killed);
        }
        debug!("board ready");
        Ok(())
    }

    /// Moves `distance` along the current heading, drawing a segment when the
    /// pen is down.
    pub fn move_by(&self, distance: f32) -> Result<Completion, BoardError> {
        let mut state = self.state.borrow_mut();
        state.check_command()?;
        Ok(state.begin_move(distance))
    }

    /// Turns clockwise by `angle` degrees.
    pub fn turn(&self, angle: f32) -> Result<Completion, BoardError> {
        let mut state = self.state.borrow_mut();
        state.check_command()?;
        Ok(state.begin_turn(angle))
    }

    /// Walks to `(x, y)` without drawing, then turns to `heading`. The pose
    /// ends exactly on the target whatever rounding the tweens introduced.
    pub async fn move_to(&self, x: f32, y: f32, heading: f32) -> Result<(), BoardError> {
        let target = Point2DF32::new(x, y);
        let (position, pen) = {
            let state = self.state.borrow();
            state.check_command()?;
            (state.position, state.pen)
        };

        if position != target {
            self.set_pen(false);
            let walked = self.face_and_walk(target - position).await;
            self.set_pen(pen);
            walked?;
        }

        let turn = normalize_degrees(heading - self.heading());
        self.turn(turn)?.await;

        self.state
            .borrow_mut()
            .snap(target, normalize_degrees(heading));
        Ok(())
    }

    async fn face_and_walk(&self, delta: Point2DF32) -> Result<(), BoardError> {
        let turn = normalize_degrees(heading_towards(delta) - self.heading());
        self.turn(turn)?.await;
        self.move_by(delta.length())?.await;
        Ok(())
    }

    /// Writes `text` at the turtle, running along the heading. With
    /// `advance`, the turtle then moves past it with the pen lifted.
    pub async fn print(&self, text: &str, advance: bool) -> Result<(), BoardError> {
        let width = self.state.borrow_mut().add_text(text)?;
        if !advance {
            return Ok(());
        }

        let pen = self.pen();
        self.set_pen(false);
        let moved = match self.move_by(width) {
            Ok(completion) => {
                completion.await;
                Ok(())
            }
            Err(err) => Err(err),
        };
        self.set_pen(pen);
        moved
    }

    /// Removes every stroke and text node, keeping background and avatar.
    pub fn clear(&self) -> Result<(), BoardError> {
        let mut state = self.state.borrow_mut();
        if state.killed {
            return Err(BoardError::Killed);
        }
        if state.phase.is_animating() {
            return Err(BoardError::Busy);
        }

        let keep = [state.background, state.avatar];
        let doomed: Vec<NodeId> = state
            .stage
            .child_ids()
            .into_iter()
            .filter(|id| !keep.contains(id))
            .collect();
        for id in &doomed {
            state.stage.remove_child(*id);
        }
        debug!(removed = doomed.len(), "cleared board");
        Ok(())
    }

    /// Walks home facing up, clears and restores the configured pen.
    pub async fn reset(&self) -> Result<(), BoardError> {
        self.move_to(0.0, 0.0, 0.0).await?;
        self.clear()?;

        let mut state = self.state.borrow_mut();
        state.pen = true;
        state.pen_color = state.config.pen_color;
        state.pen_size = state.config.pen_size;
        Ok(())
    }

    /// Detaches from the ticker. A running animation jumps to its end so
    /// nobody waits on it forever. Safe to call more than once.
    pub fn kill(&self) {
        let token = {
            let mut state = self.state.borrow_mut();
            if state.killed {
                return;
            }
            state.killed = true;
            state.finish_animation();
            state.token.take()
        };
        if let Some(token) = token {
            self.ticker.unregister(token);
        }
        debug!("board killed");
    }

    pub fn set_speed(&self, speed: Speed) {
        self.state.borrow_mut().speed = speed;
    }

    pub fn set_pen_color(&self, color: ColorU) {
        self.state.borrow_mut().pen_color = color;
    }

    pub fn set_pen_size(&self, size: f32) {
        self.state.borrow_mut().pen_size = size;
    }

    pub fn set_pen(&self, down: bool) {
        self.state.borrow_mut().pen = down;
    }

    /// Shows or hides the avatar.
    pub fn set_visible(&self, visible: bool) {
        let mut state = self.state.borrow_mut();
        state.visible = visible;
        state.sync_avatar();
    }

    #[inline]
    pub fn position(&self) -> Point2DF32 {
        self.state.borrow().position
    }

    #[inline]
    pub fn heading(&self) -> f32 {
        self.state.borrow().heading
    }

    #[inline]
    pub fn pen(&self) -> bool {
        self.state.borrow().pen
    }

    #[inline]
    pub fn pen_size(&self) -> f32 {
        self.state.borrow().pen_size
    }

    #[inline]
    pub fn pen_color(&self) -> ColorU {
        self.state.borrow().pen_color
    }

    #[inline]
    pub fn speed(&self) -> Speed {
        self.state.borrow().speed
    }

    #[inline]
    pub fn visible(&self) -> bool {
        self.state.borrow().visible
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().readiness == Readiness::Ready
    }

    pub fn is_animating(&self) -> bool {
        self.state.borrow().phase.is_animating()
    }

    pub fn is_killed(&self) -> bool {
        self.state.borrow().killed
    }

    pub fn avatar_frame(&self) -> u32 {
        self.state.borrow().avatar_frame
    }

    pub fn avatar_id(&self) -> NodeId {
        self.state.borrow().avatar
    }

    pub fn background_id(&self) -> NodeId {
        self.state.borrow().background
    }

    /// Runs `f` against the stage, e.g. to export it.
    pub fn with_stage<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow().stage)
    }
}

impl<S> BoardState<S>
where
    S: Stage,
{
    fn check_command(&self) -> Result<(), BoardError> {
        if self.killed {
            return Err(BoardError::Killed);
        }
        if self.readiness != Readiness::Ready {
            return Err(BoardError::NotReady);
        }
        if self.phase.is_animating() {
            return Err(BoardError::Busy);
        }
        Ok(())
    }

    #[inline]
    fn screen(&self, point: Point2DF32) -> Point2DF32 {
        Point2DF32::new(self.config.width, self.config.height).scale(0.5) + point.flip_y()
    }

    fn sync_avatar(&mut self) {
        let node = Node::Avatar(AvatarNode {
            sprite: self.sprite.clone(),
            frame: self.avatar_frame,
            position: self.screen(self.position),
            rotation: self.heading,
            visible: self.visible,
        });
        self.stage.replace_child(self.avatar, node);
    }

    fn raise_avatar(&mut self) {
        self.stage.raise_to_top(self.avatar);
    }

    fn begin_move(&mut self, distance: f32) -> Completion {
        let from = self.position;
        let to = from + heading_vector(self.heading).scale(distance);
        let duration = self.speed.delay_ms() * distance.abs();
        let animate = duration > 0.0;
        debug!(distance, duration_ms = duration, "move");

        let stroke = if self.pen || self.visible {
            let end = if animate { from } else { to };
            let node = StrokeNode {
                segment: LineSegmentF32::new(&self.screen(from), &self.screen(end)),
                color: self.pen_color,
                width: self.pen_size,
                visible: self.pen,
            };
            let id = self.stage.add_child(Node::Stroke(node.clone()));
            Some((id, node))
        } else {
            None
        };
        self.raise_avatar();

        if !animate {
            self.position = to;
            self.sync_avatar();
            return Completion::ready();
        }

        let (completion, resolver) = Completion::pending();
        let kind = AnimationKind::Translate { from, to, stroke };
        self.phase = Phase::Animating(Animation::new(kind, duration, resolver));
        completion
    }

    fn begin_turn(&mut self, angle: f32) -> Completion {
        let from = self.heading;
        let duration = self.speed.delay_ms() * 0.5 * angle.abs();
        debug!(angle, duration_ms = duration, "turn");

        if !self.visible || !(duration > 0.0) {
            self.heading = normalize_degrees(from + angle);
            self.sync_avatar();
            return Completion::ready();
        }

        let (completion, resolver) = Completion::pending();
        let kind = AnimationKind::Rotate {
            from,
            to: from + angle,
        };
        self.phase = Phase::Animating(Animation::new(kind, duration, resolver));
        completion
    }

    fn begin_wait(&mut self) -> Completion {
        let duration = self.config.startup_delay_ms;
        if !(duration > 0.0) {
            self.readiness = Readiness::Ready;
            return Completion::ready();
        }

        let (completion, resolver) = Completion::pending();
        self.phase = Phase::Animating(Animation::new(AnimationKind::Wait, duration, resolver));
        completion
    }

    /// Adds a text node at the turtle and returns its rendered width.
    fn add_text(&mut self, text: &str) -> Result<f32, BoardError> {
        self.check_command()?;

        let font_size = self.config.font_size;
        let width = self.stage.measure_text(text, font_size);
        let node = Node::Text(TextNode {
            text: text.to_string(),
            position: self.screen(self.position),
            rotation: self.heading - 90.0,
            color: self.pen_color,
            font_size,
        });
        self.stage.add_child(node);
        self.raise_avatar();
        debug!(width, "print");
        Ok(width)
    }

    fn snap(&mut self, position: Point2DF32, heading: f32) {
        self.position = position;
        self.heading = heading;
        self.sync_avatar();
    }

    fn walk_frame(&self, elapsed: f32) -> u32 {
        match self.sprite {
            Some(ref sprite) if sprite.frames > 0 => (elapsed / AVATAR_FRAME_MS) as u32 % sprite.frames,
            _ => 0,
        }
    }

    fn step(&mut self, animation: &Animation) {
        let t = animation.progress(self.config.easing);
        match animation.kind {
            AnimationKind::Translate {
                from,
                to,
                ref stroke,
            } => {
                self.position = from.lerp(to, t);
                if let Some((id, ref node)) = *stroke {
                    let mut node = node.clone();
                    node.segment.set_to(&self.screen(self.position));
                    self.stage.replace_child(id, Node::Stroke(node));
                }
                self.avatar_frame = self.walk_frame(animation.elapsed);
                self.sync_avatar();
            }
            AnimationKind::Rotate { from, to } => {
                self.heading = normalize_degrees(from + (to - from) * t);
                self.sync_avatar();
            }
            AnimationKind::Wait => {}
        }
    }

    fn finish(&mut self, animation: Animation) {
        let Animation { kind, resolver, .. } = animation;
        match kind {
            AnimationKind::Translate { to, stroke, .. } => {
                self.position = to;
                if let Some((id, mut node)) = stroke {
                    node.segment.set_to(&self.screen(to));
                    self.stage.replace_child(id, Node::Stroke(node));
                }
                self.avatar_frame = 0;
                self.sync_avatar();
            }
            AnimationKind::Rotate { to, .. } => {
                self.heading = normalize_degrees(to);
                self.sync_avatar();
            }
            AnimationKind::Wait => self.readiness = Readiness::Ready,
        }
        resolver.resolve();
    }

    fn finish_animation(&mut self) {
        if let Phase::Animating(animation) = mem::replace(&mut self.phase, Phase::Idle) {
            self.finish(animation);
        }
    }
}

impl<S> Animate for BoardState<S>
where
    S: Stage,
{
    fn advance(&mut self, elapsed_ms: f32) {
        let mut animation = match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => return,
            Phase::Animating(animation) => animation,
        };

        animation.elapsed += elapsed_ms;
        if animation.is_finished() {
            self.finish(animation);
        } else {
            self.step(&animation);
            self.phase = Phase::Animating(animation);
        }
    }
}

use proptest::prelude::*;
use std::time::Duration;
use turtlestage::driver::DEFAULT_FRAME;
use turtlestage::sprite::SpriteError;
use turtlestage::stage::Node;
use turtlestage::{
    block_on, Board, BoardConfig, BoardError, Scene, Speed, SpriteLoader, SpriteSheet, Stage,
    StaticSprite, Ticker,
};
use turtlestage_geometry::basic::point::Point2DF32;

const MAX_FRAMES: u64 = 10_000;

fn board_with(config: BoardConfig) -> (Ticker, Board<Scene>) {
    let ticker = Ticker::new();
    let board = Board::new(Scene::new(config.width, config.height), &ticker, config);
    (ticker, board)
}

fn ready_board(speed: Speed) -> (Ticker, Board<Scene>) {
    let (ticker, board) = board_with(BoardConfig {
        speed,
        ..BoardConfig::default()
    });
    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.init(&StaticSprite::default()))
        .unwrap()
        .unwrap();
    (ticker, board)
}

fn assert_close(actual: Point2DF32, expected: Point2DF32) {
    assert!(
        actual.distance_to(expected) < 1e-3,
        "{:?} is not close to {:?}",
        actual,
        expected
    );
}

fn visible_strokes(board: &Board<Scene>) -> usize {
    board.with_stage(|scene| {
        scene
            .nodes()
            .filter(|node| match node {
                Node::Stroke(stroke) => stroke.visible,
                _ => false,
            })
            .count()
    })
}

#[test]
fn construction_creates_background_and_avatar() {
    let (_ticker, board) = board_with(BoardConfig::default());
    board.with_stage(|scene| {
        assert_eq!(
            scene.child_ids(),
            vec![board.background_id(), board.avatar_id()]
        );
    });
    assert!(!board.is_ready());
}

#[test]
fn commands_before_init_are_rejected() {
    let (_ticker, board) = board_with(BoardConfig::default());
    assert!(matches!(board.move_by(10.0), Err(BoardError::NotReady)));
    assert!(matches!(board.turn(10.0), Err(BoardError::NotReady)));
}

#[test]
fn init_waits_for_startup_delay() {
    let (ticker, board) = board_with(BoardConfig::default());
    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.init(&StaticSprite::default()))
        .unwrap()
        .unwrap();

    assert!(board.is_ready());
    // 1000 ms at 16 ms per frame.
    assert_eq!(ticker.frames(), 63);
    board.with_stage(|scene| match scene.node(board.avatar_id()) {
        Some(Node::Avatar(avatar)) => assert_eq!(avatar.sprite, Some(SpriteSheet::turtle())),
        other => panic!("unexpected avatar node: {:?}", other),
    });
}

struct MissingSprite;

impl SpriteLoader for MissingSprite {
    fn load(
        &self,
        key: &str,
    ) -> futures_util::future::LocalBoxFuture<'static, Result<SpriteSheet, SpriteError>> {
        let key = key.to_string();
        Box::pin(async move { Err(SpriteError::NotFound(key)) })
    }
}

#[test]
fn failed_sprite_load_leaves_board_retryable() {
    let (ticker, board) = board_with(BoardConfig::default());
    let result = block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.init(&MissingSprite)).unwrap();
    assert!(matches!(result, Err(BoardError::Sprite(SpriteError::NotFound(_)))));
    assert!(!board.is_ready());

    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.init(&StaticSprite::default()))
        .unwrap()
        .unwrap();
    assert!(board.is_ready());
}

#[test]
fn undecodable_sprite_keeps_board_not_ready() {
    let (ticker, board) = board_with(BoardConfig::default());
    let empty = StaticSprite(SpriteSheet {
        frames: 0,
        ..SpriteSheet::turtle()
    });
    let result = block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.init(&empty)).unwrap();
    assert!(matches!(result, Err(BoardError::Sprite(SpriteError::Decode { .. }))));
    assert!(!board.is_ready());
    assert!(matches!(board.move_by(10.0), Err(BoardError::NotReady)));
}

#[test]
fn zero_delay_commands_complete_synchronously() {
    let (_ticker, board) = ready_board(Speed::Fastest);

    let moved = board.move_by(100.0).unwrap();
    assert!(moved.is_resolved());
    assert!(!board.is_animating());
    assert_eq!(board.position(), Point2DF32::new(0.0, 100.0));

    let turned = board.turn(90.0).unwrap();
    assert!(turned.is_resolved());
    assert_eq!(board.heading(), 90.0);
}

#[test]
fn animated_move_takes_delay_times_distance() {
    let (ticker, board) = ready_board(Speed::Normal);

    // 5 ms per unit over 10 units.
    let moved = board.move_by(10.0).unwrap();
    ticker.tick(Duration::from_millis(20));
    ticker.tick(Duration::from_millis(20));
    assert!(!moved.is_resolved());
    assert!(board.is_animating());
    assert_close(board.position(), Point2DF32::new(0.0, 8.0));

    ticker.tick(Duration::from_millis(20));
    assert!(moved.is_resolved());
    assert!(!board.is_animating());
    assert_eq!(board.position(), Point2DF32::new(0.0, 10.0));
    assert_eq!(board.avatar_frame(), 0);
}

#[test]
fn avatar_walks_through_frames_while_moving() {
    let (ticker, board) = ready_board(Speed::Slowest);

    // 20 ms per unit over 50 units: one second of walking.
    let moved = board.move_by(50.0).unwrap();
    ticker.tick(Duration::from_millis(250));
    assert_eq!(board.avatar_frame(), 2);

    ticker.tick(Duration::from_millis(800));
    assert!(moved.is_resolved());
    assert_eq!(board.avatar_frame(), 0);
}

#[test]
fn stroke_endpoint_follows_the_avatar() {
    let (ticker, board) = ready_board(Speed::Normal);
    board.move_by(10.0).unwrap();
    ticker.tick(Duration::from_millis(25));

    board.with_stage(|scene| {
        let stroke = scene
            .nodes()
            .find_map(|node| match node {
                Node::Stroke(stroke) => Some(stroke.clone()),
                _ => None,
            })
            .unwrap();
        // Centre of a 480x360 stage, half way up 10 units.
        assert_close(stroke.segment.from(), Point2DF32::new(240.0, 180.0));
        assert_close(stroke.segment.to(), Point2DF32::new(240.0, 175.0));
    });
}

#[test]
fn overlapping_commands_are_rejected_while_animating() {
    let (ticker, board) = ready_board(Speed::Normal);
    let moved = board.move_by(100.0).unwrap();

    assert!(matches!(board.move_by(1.0), Err(BoardError::Busy)));
    assert!(matches!(board.turn(1.0), Err(BoardError::Busy)));
    assert!(matches!(board.clear(), Err(BoardError::Busy)));

    // Setters never animate and stay available.
    board.set_pen(false);
    board.set_speed(Speed::Fast);
    assert!(!board.pen());

    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, moved).unwrap();
    assert!(board.move_by(1.0).is_ok());
}

#[test]
fn hidden_turtle_turns_instantly() {
    let (_ticker, board) = ready_board(Speed::Slowest);
    board.set_visible(false);

    let turned = board.turn(-45.0).unwrap();
    assert!(turned.is_resolved());
    assert_eq!(board.heading(), -45.0);
}

#[test]
fn animated_turn_sweeps_requested_direction() {
    let (ticker, board) = ready_board(Speed::Fastest);
    board.turn(170.0).unwrap();

    // 2.5 ms per degree over 20 degrees, crossing the seam at 180.
    board.set_speed(Speed::Normal);
    let turned = board.turn(20.0).unwrap();
    ticker.tick(Duration::from_millis(20));
    assert!(board.heading() > 170.0 && board.heading() < 180.0);

    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, turned).unwrap();
    assert_eq!(board.heading(), -170.0);
}

#[test]
fn move_to_lands_exactly_on_target() {
    let (ticker, board) = ready_board(Speed::Normal);
    block_on(
        &ticker,
        DEFAULT_FRAME,
        MAX_FRAMES,
        board.move_to(37.5, -12.25, 33.0),
    )
    .unwrap()
    .unwrap();

    assert_eq!(board.position(), Point2DF32::new(37.5, -12.25));
    assert_eq!(board.heading(), 33.0);
    assert!(board.pen());
    assert_eq!(visible_strokes(&board), 0);
}

#[test]
fn move_to_same_position_only_turns() {
    let (ticker, board) = ready_board(Speed::Fastest);
    let before = board.with_stage(|scene| scene.child_count());
    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.move_to(0.0, 0.0, -90.0))
        .unwrap()
        .unwrap();

    assert_eq!(board.heading(), -90.0);
    assert_eq!(board.with_stage(|scene| scene.child_count()), before);
}

#[test]
fn clear_keeps_background_and_avatar() {
    let (ticker, board) = ready_board(Speed::Fastest);
    for _ in 0..4 {
        board.move_by(20.0).unwrap();
        board.turn(90.0).unwrap();
    }
    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.print("hi", false))
        .unwrap()
        .unwrap();
    assert!(board.with_stage(|scene| scene.child_count()) > 2);

    board.clear().unwrap();
    assert_eq!(board.with_stage(|scene| scene.child_count()), 2);
    board.clear().unwrap();
    board.with_stage(|scene| {
        assert_eq!(scene.child_count(), 2);
        assert!(scene.node(board.background_id()).is_some());
        assert!(scene.node(board.avatar_id()).is_some());
    });
}

#[test]
fn avatar_stays_on_top() {
    let (ticker, board) = ready_board(Speed::Fastest);
    let top = |board: &Board<Scene>| board.with_stage(|scene| *scene.child_ids().last().unwrap());

    board.move_by(10.0).unwrap();
    assert_eq!(top(&board), board.avatar_id());

    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.print("label", false))
        .unwrap()
        .unwrap();
    assert_eq!(top(&board), board.avatar_id());
}

#[test]
fn print_with_advance_moves_past_the_text() {
    let (ticker, board) = ready_board(Speed::Normal);
    board.set_visible(false);
    board.turn(90.0).unwrap();

    block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.print("abcd", true))
        .unwrap()
        .unwrap();

    // Four glyphs at 16 px * 0.6.
    assert_close(board.position(), Point2DF32::new(38.4, 0.0));
    assert!(board.pen());
    assert_eq!(visible_strokes(&board), 0);
    board.with_stage(|scene| {
        let text = scene
            .nodes()
            .find_map(|node| match node {
                Node::Text(text) => Some(text.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(text.rotation, 0.0);
        assert_eq!(text.text, "abcd");
    });
}

#[test]
fn pen_up_and_hidden_draws_nothing() {
    let (_ticker, board) = ready_board(Speed::Fastest);
    board.set_pen(false);
    board.set_visible(false);
    board.move_by(50.0).unwrap();
    assert_eq!(board.with_stage(|scene| scene.child_count()), 2);

    board.set_visible(true);
    board.move_by(50.0).unwrap();
    assert_eq!(board.with_stage(|scene| scene.child_count()), 3);
    assert_eq!(visible_strokes(&board), 0);
}

#[test]
fn kill_is_idempotent_and_settles_animation() {
    let (ticker, board) = ready_board(Speed::Normal);
    let moved = board.move_by(40.0).unwrap();
    assert_eq!(ticker.len(), 1);

    board.kill();
    assert!(moved.is_resolved());
    assert_eq!(board.position(), Point2DF32::new(0.0, 40.0));
    assert!(ticker.is_empty());

    board.kill();
    assert!(board.is_killed());
    assert!(matches!(board.move_by(1.0), Err(BoardError::Killed)));
    assert!(matches!(board.clear(), Err(BoardError::Killed)));
}

#[test]
fn scene_exports_visible_strokes_as_svg() {
    let (_ticker, board) = ready_board(Speed::Fastest);
    board.move_by(10.0).unwrap();
    let svg = board.with_stage(|scene| scene.to_svg());
    assert!(svg.contains(r#"<line x1="240" y1="180" x2="240" y2="170""#));
    assert!(svg.contains("<polygon"));
}

proptest! {
    #[test]
    fn heading_is_normalized_cumulative_sum(angles in prop::collection::vec(-720i32..720, 1..24)) {
        let (ticker, board) = board_with(BoardConfig {
            speed: Speed::Fastest,
            startup_delay_ms: 0.0,
            ..BoardConfig::default()
        });
        block_on(&ticker, DEFAULT_FRAME, 0, board.init(&StaticSprite::default()))
            .unwrap()
            .unwrap();

        let mut sum = 0i32;
        for angle in angles {
            prop_assert!(board.turn(angle as f32).unwrap().is_resolved());
            sum += angle;

            let heading = board.heading();
            prop_assert!(heading > -180.0 && heading <= 180.0);
            let mut expected = sum.rem_euclid(360);
            if expected > 180 {
                expected -= 360;
            }
            prop_assert_eq!(heading, expected as f32);
        }
    }

    #[test]
    fn move_to_always_snaps(x in -500i32..500, y in -500i32..500, heading in -179i32..=180) {
        let (ticker, board) = ready_board(Speed::Fast);
        let (x, y, heading) = (x as f32 * 0.5, y as f32 * 0.25, heading as f32);
        block_on(&ticker, DEFAULT_FRAME, MAX_FRAMES, board.move_to(x, y, heading))
            .unwrap()
            .unwrap();
        prop_assert_eq!(board.position(), Point2DF32::new(x, y));
        prop_assert_eq!(board.heading(), heading);
    }
}

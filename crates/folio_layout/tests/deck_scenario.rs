//! Four-card deck driven through raw pointer sequences

use folio_core::{Point, Viewport};
use folio_layout::{CardState, DeckConfig, DeckEngine, DeckMode, FixedRotations, GestureOutcome};

const VIEWPORT: Viewport = Viewport::new(1280.0, 720.0);

fn four_card_deck(mode: DeckMode) -> DeckEngine {
    DeckEngine::with_rotation_source(
        4,
        DeckConfig {
            mode,
            ..Default::default()
        },
        VIEWPORT,
        Box::new(FixedRotations::new(vec![-6.0, 2.5, 7.0, -1.0])),
    )
}

fn run(deck: &mut DeckEngine, ms: u64) {
    let mut elapsed = 0;
    while elapsed < ms {
        let step = 16.min(ms - elapsed);
        deck.tick(step);
        elapsed += step;
    }
}

/// Rightward flick at 0.5 px/ms
fn flick_right(deck: &mut DeckEngine, index: usize, start_ms: u64) -> GestureOutcome {
    let y = 300.0;
    deck.pointer_down(index, Point::new(400.0, y), start_ms);
    deck.pointer_move(Point::new(408.0, y), start_ms + 16);
    deck.pointer_move(Point::new(416.0, y), start_ms + 32);
    deck.pointer_up(Point::new(416.0, y), start_ms + 40)
}

#[test]
fn test_dismiss_all_four_then_reset() {
    let mut deck = four_card_deck(DeckMode::EntranceAnimated);
    run(&mut deck, 2500);
    let rest: Vec<_> = (0..4).map(|i| deck.rest_pose(i).unwrap()).collect();

    let mut clock = 2500;
    for index in 0..4 {
        let untouched: Vec<_> = (index + 1..4).map(|i| deck.pose(i).unwrap()).collect();

        let outcome = flick_right(&mut deck, index, clock);
        assert_eq!(
            outcome,
            GestureOutcome::Dismissed {
                remaining: 3 - index
            }
        );
        run(&mut deck, 500);
        clock += 500;

        assert_eq!(deck.state(index), Some(CardState::FlyingOut));
        assert!(deck.pose(index).unwrap().x > VIEWPORT.width * 0.75);
        let after: Vec<_> = (index + 1..4).map(|i| deck.pose(i).unwrap()).collect();
        assert_eq!(untouched, after, "flick of {index} moved other cards");
        assert!(deck.dismissed_count() <= deck.len());
        assert_eq!(deck.reset_pending(), index == 3);
    }

    // 500ms into the 600ms reset delay
    assert_eq!(deck.dismissed_count(), 4);
    run(&mut deck, 100);
    assert_eq!(deck.dismissed_count(), 0);
    assert_eq!(deck.reset_count(), 1);

    run(&mut deck, 3000);
    assert_eq!(deck.reset_count(), 1);
    for (i, rest_before) in rest.iter().enumerate() {
        assert_eq!(deck.state(i), Some(CardState::Resting));
        let rest_now = deck.rest_pose(i).unwrap();
        assert_eq!(rest_now.y, rest_before.y);
        assert!(deck.pose(i).unwrap().is_near(&rest_now, 0.01));
    }
}

#[test]
fn test_reset_fires_600ms_after_last_dismissal() {
    let mut deck = four_card_deck(DeckMode::ScrollLinked);
    for index in 0..3 {
        flick_right(&mut deck, index, 0);
    }
    run(&mut deck, 5000);
    assert_eq!(deck.dismissed(), vec![0, 1, 2]);
    assert!(!deck.reset_pending());

    flick_right(&mut deck, 3, 5000);
    assert!(deck.reset_pending());
    run(&mut deck, 592);
    assert_eq!(deck.dismissed_count(), 4);
    run(&mut deck, 16);
    assert_eq!(deck.dismissed_count(), 0);

    run(&mut deck, 5000);
    assert_eq!(deck.reset_count(), 1);
}

#[test]
fn test_slow_drag_returns_home() {
    let mut deck = four_card_deck(DeckMode::ScrollLinked);
    deck.pointer_down(2, Point::new(400.0, 300.0), 0);
    deck.pointer_move(Point::new(500.0, 300.0), 400);
    deck.pointer_move(Point::new(520.0, 300.0), 600);
    let outcome = deck.pointer_up(Point::new(520.0, 300.0), 900);
    assert_eq!(outcome, GestureOutcome::Restored);

    run(&mut deck, 2000);
    let pose = deck.pose(2).unwrap();
    assert!(pose.x.abs() < 0.01);
    assert!(!deck.is_dismissed(2));
    assert_eq!(
        deck.history(2),
        &[
            (CardState::Resting, CardState::Dragging),
            (CardState::Dragging, CardState::Resting)
        ]
    );
}

#[test]
fn test_leftward_flick_exits_left() {
    let mut deck = four_card_deck(DeckMode::ScrollLinked);
    deck.pointer_down(0, Point::new(400.0, 300.0), 0);
    deck.pointer_move(Point::new(380.0, 300.0), 16);
    deck.pointer_up(Point::new(360.0, 300.0), 32);
    run(&mut deck, 3000);
    assert!(deck.pose(0).unwrap().x <= -(VIEWPORT.width + 199.0));
}

#[test]
fn test_card_caught_before_entrance_settles_visible() {
    let mut deck = four_card_deck(DeckMode::EntranceAnimated);
    run(&mut deck, 50);
    assert_eq!(deck.pose(3).unwrap().opacity, 0.0);

    deck.pointer_down(3, Point::new(400.0, 300.0), 50);
    deck.pointer_move(Point::new(404.0, 300.0), 66);
    let outcome = deck.pointer_up(Point::new(404.0, 300.0), 400);
    assert_eq!(outcome, GestureOutcome::Restored);

    run(&mut deck, 3000);
    let rest = deck.rest_pose(3).unwrap();
    let pose = deck.pose(3).unwrap();
    assert!(pose.is_near(&rest, 0.01), "{pose:?}");
    assert_eq!(rest.y, -12.0);
    assert!((pose.opacity - 1.0).abs() < 0.001);
    assert_eq!(deck.state(3), Some(CardState::Resting));
}

#[test]
fn test_card_caught_mid_deal_after_reset() {
    let mut deck = four_card_deck(DeckMode::EntranceAnimated);
    run(&mut deck, 2500);
    for index in 0..4 {
        flick_right(&mut deck, index, 2500);
    }
    run(&mut deck, 608);
    assert_eq!(deck.reset_count(), 1);
    // card 3 deals 300ms after the reset
    assert_eq!(deck.state(3), Some(CardState::Resetting));

    assert_eq!(
        deck.pointer_down(3, Point::new(400.0, 300.0), 3200),
        GestureOutcome::Dragging
    );
    let outcome = deck.pointer_up(Point::new(400.0, 300.0), 3210);
    assert_eq!(outcome, GestureOutcome::Restored);

    run(&mut deck, 3000);
    let rest = deck.rest_pose(3).unwrap();
    let pose = deck.pose(3).unwrap();
    assert!(pose.is_near(&rest, 0.01), "{pose:?}");
    assert_eq!(deck.state(3), Some(CardState::Resting));
    assert!(!deck.is_dismissed(3));
    assert_eq!(deck.reset_count(), 1);

    let history = deck.history(3);
    assert_eq!(
        &history[history.len() - 2..],
        &[
            (CardState::Resetting, CardState::Dragging),
            (CardState::Dragging, CardState::Resting)
        ]
    );
}

use hotdog_hunt::config::{GameConfig, SessionConfig, WorldBounds};
use hotdog_hunt::session::{GameSession, SessionState};
use hotdog_hunt::win_screen::WinScreen;
use rand::rngs::StdRng;
use rand::SeedableRng;

const STEP_MS: f64 = 1000.0 / 60.0;

fn new_session(seed: u64) -> GameSession {
    let config = GameConfig::default();
    GameSession::with_rng(config.session, config.world, StdRng::seed_from_u64(seed))
}

#[test]
fn ten_collections_reach_the_win_screen() {
    let mut session = new_session(11);
    for _ in 0..9 {
        assert!(session.collect_item().is_none());
    }
    assert_eq!(session.score(), 9);
    assert_eq!(session.state(), SessionState::Running);

    let snapshot = session.collect_item().expect("should win on the tenth");
    assert_eq!(session.score(), 10);
    assert_eq!(session.state(), SessionState::Won);
    assert_eq!(session.item_history().len(), 10);

    let screen = WinScreen::enter(snapshot);
    assert_eq!(screen.score(), 10);
    assert_eq!(screen.item_history(), session.item_history());
}

#[test]
fn three_expiries_without_collecting() {
    let mut session = new_session(12);
    for _ in 0..3 {
        session.timer_elapsed();
    }
    assert_eq!(session.score(), 0);
    assert_eq!(session.item_history().len(), 3);
}

#[test]
fn restart_from_the_win_screen() {
    let mut session = new_session(13);
    let mut won = None;
    while won.is_none() {
        won = session.collect_item();
    }
    let screen = WinScreen::enter(won.unwrap());
    screen.on_restart_requested(&mut session);

    assert_eq!(session.score(), 0);
    assert!(session.item_history().is_empty());
    assert_eq!(session.state(), SessionState::Running);

    // and the new session plays out like a fresh one
    assert_eq!(session.collect_item(), None);
    assert_eq!(session.score(), 1);
}

#[test]
fn history_order_mixes_expiries_and_collections() {
    let mut session = new_session(14);
    let first = session.active_item();
    session.timer_elapsed();
    let second = session.active_item();
    session.collect_item();
    let third = session.active_item();
    session.timer_elapsed();

    assert_eq!(session.item_history(), &[first, second, third]);
    assert_eq!(session.score(), 1);
}

#[test]
fn frame_driven_play_through() {
    // collect a hotdog every two seconds of frames; nothing expires in between
    let mut session = new_session(15);
    let mut frames = 0;
    let mut moved = 0;
    let snapshot = loop {
        moved += session.advance(STEP_MS);
        frames += 1;
        if frames % 120 == 0 {
            if let Some(snapshot) = session.collect_item() {
                break snapshot;
            }
        }
    };
    assert_eq!(moved, 0);
    assert_eq!(snapshot.score, 10);
    assert_eq!(snapshot.item_history.len(), 10);
    assert_eq!(session.advance(10_000.0), 0);
}

#[test]
fn idle_player_sees_the_hotdog_move_every_five_seconds() {
    let mut session = new_session(16);
    let mut moved = 0;
    // 21 seconds : expiries at 5, 10, 15, 20
    for _ in 0..(21 * 60) {
        moved += session.advance(STEP_MS);
    }
    assert_eq!(moved, 4);
    assert_eq!(session.score(), 0);
}

#[test]
fn placements_always_inside_the_world() {
    let bounds = WorldBounds {
        width: 320.0,
        height: 240.0,
    };
    let mut session =
        GameSession::with_rng(SessionConfig::default(), bounds, StdRng::seed_from_u64(17));
    for _ in 0..200 {
        session.timer_elapsed();
        let item = session.active_item();
        assert!(bounds.contains(item.x, item.y), "{:?} out of bounds", item);
    }
    assert!(session
        .item_history()
        .iter()
        .all(|item| bounds.contains(item.x, item.y)));
}

#[test]
fn config_from_json_drives_the_session() {
    let config = GameConfig::from_json(
        r#"{ "session": { "win_threshold": 3, "reposition_delay_ms": 1000 } }"#,
    )
    .unwrap();
    let mut session =
        GameSession::with_rng(config.session, config.world, StdRng::seed_from_u64(18));
    assert_eq!(session.advance(1000.0), 1);
    session.collect_item();
    session.collect_item();
    assert!(session.collect_item().is_some());
}

// Screen flow tests: navigation between home, game, results and training,
// the saved difficulty, and snapshot export. Filesystem work happens in
// tempfile directories.

use chrono::{TimeZone, Utc};
use guardrail_ops::data::{default_fixtures, Difficulty};
use guardrail_ops::game::evaluator::Action;
use guardrail_ops::game::schedule::SETTLE_DELAY;
use guardrail_ops::game::{Game, Screen, AI_FEEDBACK_MESSAGE};
use guardrail_ops::preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
use std::time::{Duration, Instant};

fn memory_game() -> (Game, MemoryPreferenceStore) {
    let store = MemoryPreferenceStore::new();
    let game = Game::new(default_fixtures(), Box::new(store.clone()));
    (game, store)
}

/// Let every round time out until the mission ends.
fn run_out_the_clock(game: &mut Game, t0: Instant) {
    game.tick(t0 + Duration::from_secs(60)).unwrap();
}

// ============================================================
// Difficulty preference
// ============================================================

#[test]
fn saved_difficulty_is_loaded_at_startup() {
    let store = MemoryPreferenceStore::with_difficulty(Difficulty::Pro);
    let game = Game::new(default_fixtures(), Box::new(store));
    assert_eq!(game.difficulty(), Difficulty::Pro);
}

#[test]
fn unreadable_preference_falls_back_to_casual() {
    let dir = tempfile::tempdir().unwrap();
    let store = FilePreferenceStore::in_dir(dir.path());
    std::fs::write(store.path(), "{ broken").unwrap();

    let game = Game::new(default_fixtures(), Box::new(store));
    assert_eq!(game.difficulty(), Difficulty::Casual);
}

#[test]
fn selecting_difficulty_on_home_is_saved() {
    let (mut game, store) = memory_game();
    game.select_difficulty(Difficulty::Pro);
    assert_eq!(store.load_difficulty().unwrap(), Some(Difficulty::Pro));
    assert_eq!(game.screen(), Screen::Home);
}

#[test]
fn difficulty_survives_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let now = Instant::now();

    let mut game = Game::new(
        default_fixtures(),
        Box::new(FilePreferenceStore::in_dir(dir.path())),
    );
    game.navigate(Screen::Game, Some(Difficulty::Pro), now).unwrap();
    drop(game);

    let game = Game::new(
        default_fixtures(),
        Box::new(FilePreferenceStore::in_dir(dir.path())),
    );
    assert_eq!(game.difficulty(), Difficulty::Pro);
}

#[test]
fn navigating_without_difficulty_saves_nothing() {
    let (mut game, store) = memory_game();
    game.navigate(Screen::Game, None, Instant::now()).unwrap();
    assert_eq!(store.load_difficulty().unwrap(), None);
}

// ============================================================
// Session ownership
// ============================================================

#[test]
fn entering_game_always_starts_fresh() {
    let (mut game, _) = memory_game();
    let t0 = Instant::now();

    game.navigate(Screen::Game, None, t0).unwrap();
    game.submit(Action::Allow, t0 + Duration::from_secs(1));
    assert_eq!(game.session().unwrap().state().score, 100);

    game.navigate(Screen::Game, None, t0 + Duration::from_secs(2)).unwrap();
    let session = game.session().unwrap();
    assert_eq!(session.state().score, 0);
    assert_eq!(session.state().wave, 1);
    assert_eq!(session.current_request().id, "1");
}

#[test]
fn leaving_mid_mission_drops_the_session() {
    let (mut game, _) = memory_game();
    let t0 = Instant::now();

    game.navigate(Screen::Game, None, t0).unwrap();
    game.navigate(Screen::Home, None, t0).unwrap();
    assert!(game.session().is_none());

    // No timers left to fire.
    assert!(game.tick(t0 + Duration::from_secs(60)).unwrap().is_empty());
    assert_eq!(game.screen(), Screen::Home);
}

#[test]
fn abandoned_mission_leaves_no_results() {
    let (mut game, _) = memory_game();
    let t0 = Instant::now();

    game.navigate(Screen::Game, None, t0).unwrap();
    game.submit(Action::Allow, t0 + Duration::from_secs(1));
    game.navigate(Screen::Home, None, t0 + Duration::from_secs(2)).unwrap();
    assert!(game.results().is_none());

    game.navigate(Screen::Game, None, t0 + Duration::from_secs(3)).unwrap();
    game.navigate(Screen::Training, None, t0 + Duration::from_secs(4)).unwrap();
    assert!(game.results().is_none());
}

#[test]
fn mission_end_moves_to_results() {
    let (mut game, _) = memory_game();
    let t0 = Instant::now();

    game.navigate(Screen::Game, None, t0).unwrap();
    run_out_the_clock(&mut game, t0);

    assert_eq!(game.screen(), Screen::Complete);
    assert!(game.session().is_none());
    let results = game.results().unwrap();
    assert_eq!(results.lives, 0);
    assert_eq!(results.incorrect, 3);
}

#[test]
fn replay_starts_a_new_mission_with_the_same_difficulty() {
    let (mut game, store) = memory_game();
    let t0 = Instant::now();

    game.navigate(Screen::Game, Some(Difficulty::Pro), t0).unwrap();
    run_out_the_clock(&mut game, t0);

    let t1 = t0 + Duration::from_secs(61);
    game.replay(t1).unwrap();
    assert_eq!(game.screen(), Screen::Game);
    assert!(game.results().is_none());
    assert_eq!(game.session().unwrap().max_time(), 6);
    assert_eq!(store.load_difficulty().unwrap(), Some(Difficulty::Pro));
}

#[test]
fn training_is_reachable_from_anywhere() {
    let (mut game, _) = memory_game();
    let t0 = Instant::now();

    game.navigate(Screen::Game, None, t0).unwrap();
    game.navigate(Screen::Training, None, t0).unwrap();
    assert_eq!(game.screen(), Screen::Training);
    assert!(game.session().is_none());

    game.navigate(Screen::Complete, None, t0).unwrap();
    assert_eq!(game.screen(), Screen::Complete);
}

#[test]
fn actions_outside_a_session_are_ignored() {
    let (mut game, _) = memory_game();
    assert!(game.submit(Action::Block, Instant::now()).is_empty());
    assert!(game.dismiss_redaction().is_empty());
}

#[test]
fn decisions_flow_through_to_the_session() {
    let (mut game, _) = memory_game();
    let t0 = Instant::now();

    game.navigate(Screen::Game, None, t0).unwrap();
    let decided = t0 + Duration::from_secs(1);
    game.submit(Action::Allow, decided);
    game.tick(decided + SETTLE_DELAY).unwrap();

    let session = game.session().unwrap();
    assert_eq!(session.state().wave, 2);
    assert_eq!(session.current_request().id, "2");
}

// ============================================================
// Results: export and feedback
// ============================================================

#[test]
fn export_writes_a_named_snapshot() {
    let (mut game, _) = memory_game();
    let t0 = Instant::now();
    game.navigate(Screen::Game, None, t0).unwrap();
    run_out_the_clock(&mut game, t0);

    let dir = tempfile::tempdir().unwrap();
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
    let path = game.export_results(dir.path(), at).unwrap().unwrap();

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "GuardrailOps_Result_0_20240309-1405.txt"
    );
    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.starts_with("GUARDRAIL OPS - MISSION COMPLETE"));
    assert!(body.contains("NEED IMPROVEMENT"));
    assert!(body.contains("Waves: 2/5"));
    assert!(body.contains("✗ Incorrect: 3"));
    assert!(game.last_message().unwrap().message.contains("Snapshot saved"));
}

#[test]
fn export_without_results_writes_nothing() {
    let (mut game, _) = memory_game();
    let dir = tempfile::tempdir().unwrap();
    let written = game.export_results(dir.path(), Utc::now()).unwrap();
    assert!(written.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn export_into_a_file_path_fails() {
    let (mut game, _) = memory_game();
    let t0 = Instant::now();
    game.navigate(Screen::Game, None, t0).unwrap();
    run_out_the_clock(&mut game, t0);

    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "x").unwrap();
    assert!(game.export_results(&blocker, Utc::now()).is_err());
}

#[test]
fn ai_feedback_is_only_a_message() {
    let (mut game, _) = memory_game();
    game.request_ai_feedback();
    assert_eq!(game.last_message().unwrap().message, AI_FEEDBACK_MESSAGE);
    assert_eq!(game.screen(), Screen::Home);
}

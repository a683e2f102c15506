//! Full playthroughs against the built-in catalog.

use chrono::{Duration, TimeZone, Utc};
use dge_common::achievements::AchievementBook;
use dge_common::demo::{DemoConfig, DEMO_STARTING_BALANCE};
use dge_common::events::{MissionLog, MissionRecord};
use dge_common::ledger::SimulatedLedger;
use dge_common::progression::{complete_current, initialize_game_state, select_chain};
use dge_common::store::ProgressStore;
use dge_common::{Catalog, GameError, GameState};
use tempfile::TempDir;

fn play_to_end(state: &mut GameState, ledger: &mut SimulatedLedger) -> Vec<String> {
    let start = Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap();
    let mut order = Vec::new();
    let mut step = 0;
    while !state.is_complete() {
        let outcome = complete_current(state, ledger, start + Duration::minutes(step)).unwrap();
        order.push(outcome.milestone_id);
        step += 1;
        assert!(step <= 23, "playthrough did not terminate");
    }
    order
}

#[test]
fn full_playthrough_follows_the_main_line_then_the_summit() {
    let catalog = Catalog::builtin().unwrap();
    let mut state = initialize_game_state(&catalog, "demo_agent", None, 0, None);
    let mut ledger = SimulatedLedger::default();

    let order = play_to_end(&mut state, &mut ledger);
    assert_eq!(order.len(), 23);
    assert_eq!(order[0], "dge-training-1");
    assert_eq!(order[3], "usps-reform-1");
    assert_eq!(order[6], "treasury-audit-1");
    assert_eq!(order[10], "fort-knox-1");
    assert_eq!(order[14], "dhs-reform-1");
    assert_eq!(order[18], "nbs-petition");
    assert_eq!(order[22], "nbs-summit-badge");

    assert_eq!(state.balance, 99_000);
    assert_eq!(state.rewards_earned(), 99_000);
    assert_eq!(state.badges.len(), 6);
    assert_eq!(state.transactions.len(), 23 * 2 + 6);
    assert_eq!(ledger.journal().len(), state.transactions.len());
    assert!(state.chains.iter().all(|c| c.completed && c.unlocked));
    assert_eq!(state.level, 4);
    assert_eq!(state.xp, 170);
    assert!(state.current_chain_id.is_none());
    assert!(state.current_milestone_id.is_none());

    let profile = state.profile();
    assert_eq!(profile.milestone_hashes.len(), 23);
    assert!(!profile.is_registered);
}

#[test]
fn main_line_chains_unlock_one_at_a_time() {
    let catalog = Catalog::builtin().unwrap();
    let mut state = initialize_game_state(&catalog, "demo_agent", None, 0, None);
    let mut ledger = SimulatedLedger::default();
    let now = Utc::now();

    for _ in 0..3 {
        complete_current(&mut state, &mut ledger, now).unwrap();
    }
    assert!(state.chain("usps-reform").unwrap().unlocked);
    assert!(!state.chain("treasury-audit").unwrap().unlocked);
    assert!(matches!(
        select_chain(&mut state, "treasury-audit"),
        Err(GameError::ChainLocked(_))
    ));

    for _ in 0..3 {
        complete_current(&mut state, &mut ledger, now).unwrap();
    }
    assert!(state.chain("treasury-audit").unwrap().unlocked);
    assert!(!state.chain("fort-knox").unwrap().unlocked);
}

#[test]
fn summit_can_be_played_first_and_unlocks_nothing() {
    let catalog = Catalog::builtin().unwrap();
    let mut state = initialize_game_state(&catalog, "demo_agent", None, 0, None);
    let mut ledger = SimulatedLedger::default();
    let now = Utc::now();

    select_chain(&mut state, "national-blockchain-summit").unwrap();
    for _ in 0..5 {
        let outcome = complete_current(&mut state, &mut ledger, now).unwrap();
        assert!(outcome.unlocked_chain.is_none());
    }
    let unlocked: Vec<_> = state
        .chains
        .iter()
        .filter(|c| c.unlocked)
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(unlocked, vec!["dge-training", "national-blockchain-summit"]);
    assert_eq!(state.current_milestone_id.as_deref(), Some("dge-training-1"));
}

#[test]
fn store_and_log_survive_a_session() {
    let dir = TempDir::new().unwrap();
    let store = ProgressStore::new(dir.path());
    let log = MissionLog::in_dir(dir.path());
    let catalog = Catalog::builtin().unwrap();
    let mut ledger = SimulatedLedger::default();

    let mut state = initialize_game_state(&catalog, "demo_agent", Some("Bond".into()), 0, None);
    for _ in 0..4 {
        let outcome = complete_current(&mut state, &mut ledger, Utc::now()).unwrap();
        log.append(&MissionRecord::from_outcome(&state.player_address, &outcome))
            .unwrap();
    }
    store.save(&state).unwrap();

    let loaded = store.load("demo_agent").unwrap().unwrap();
    assert_eq!(loaded, state);
    assert_eq!(loaded.current_milestone_id.as_deref(), Some("usps-reform-2"));

    let summary = log.summary("demo_agent").unwrap();
    assert_eq!(summary.completions, 4);
    assert_eq!(summary.total_reward, 8_000);
    assert_eq!(summary.chains_completed, 1);
    assert_eq!(log.read_recent("demo_agent", 1).unwrap()[0].milestone_id, "usps-reform-1");

    let mut book = AchievementBook::default();
    let earned = book.sync(&loaded);
    assert!(earned.contains(&"first-mission"));
    assert!(earned.contains(&"blockchain-pioneer"));
    assert!(!earned.contains(&"efficiency-expert"));
    store.save_achievements("demo_agent", &book).unwrap();
    assert_eq!(store.load_achievements("demo_agent").unwrap(), book);
}

#[test]
fn demo_session_rebuilds_the_same_progress() {
    let dir = TempDir::new().unwrap();
    let store = ProgressStore::new(dir.path());
    let catalog = Catalog::builtin().unwrap();
    let mut ledger = SimulatedLedger::default();

    let mut demo = DemoConfig::enable();
    let mut state = initialize_game_state(&catalog, &demo.address, None, 0, Some(&demo));
    assert_eq!(state.balance, DEMO_STARTING_BALANCE);

    for _ in 0..4 {
        let outcome = complete_current(&mut state, &mut ledger, Utc::now()).unwrap();
        demo.record_completion(&outcome).unwrap();
    }
    store.save_demo(&demo).unwrap();

    let demo = store.load_demo().unwrap();
    let rebuilt = initialize_game_state(&catalog, &demo.address, None, 0, Some(&demo));
    assert_eq!(rebuilt.balance, state.balance);
    assert_eq!(rebuilt.transactions, state.transactions);
    assert_eq!(rebuilt.current_chain_id, state.current_chain_id);
    assert_eq!(rebuilt.current_milestone_id, state.current_milestone_id);
    for (a, b) in rebuilt.chains.iter().zip(&state.chains) {
        assert_eq!(a.unlocked, b.unlocked, "{}", a.id);
        assert_eq!(a.completed, b.completed, "{}", a.id);
        for (ma, mb) in a.milestones.iter().zip(&b.milestones) {
            assert_eq!(ma.completed, mb.completed);
            assert_eq!(ma.hash, mb.hash);
            assert_eq!(ma.previous_hash, mb.previous_hash);
        }
    }
}

//! Drives dgectl commands against a temporary data directory.

use dge_common::config::DgeConfig;
use dgectl::cli::{Commands, DemoCommands, TutorialCommands};
use dgectl::commands::run;
use dgectl::errors::{exit_code_for, EXIT_INVALID_STATE, EXIT_NOT_AVAILABLE};
use dgectl::session::Session;
use dgectl::ui::Style;
use tempfile::TempDir;

fn session(dir: &TempDir) -> Session {
    Session::new(
        DgeConfig::default(),
        None,
        Some(dir.path().to_path_buf()),
        Style::plain(),
    )
    .unwrap()
}

fn start(session: &Session, key: &str) {
    run(
        session,
        Commands::Start {
            name: Some("Tester".into()),
            key: Some(key.into()),
        },
    )
    .unwrap();
}

#[test]
fn start_then_complete_the_orientation_quiz() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);
    start(&session, "demo_tester");

    let state = session.load_state().unwrap();
    assert_eq!(state.player_address, "demo_tester");
    assert_eq!(state.balance, 10_000);
    assert_eq!(
        session.store.active_player().unwrap().as_deref(),
        Some("demo_tester")
    );

    let err = run(&session, Commands::Complete { answer: None }).unwrap_err();
    assert!(err.to_string().contains("--answer"));
    let err = run(&session, Commands::Complete { answer: Some(1) }).unwrap_err();
    assert!(err.to_string().contains("Incorrect answer"));
    assert_eq!(session.load_state().unwrap().xp, 0);

    run(&session, Commands::Complete { answer: Some(2) }).unwrap();
    let state = session.load_state().unwrap();
    assert_eq!(state.xp, 10);
    assert_eq!(state.balance, 11_000);
    assert_eq!(state.current_milestone_id.as_deref(), Some("dge-training-2"));
    assert_eq!(session.log.read_player("demo_tester").unwrap().len(), 1);
    let book = session.store.load_achievements("demo_tester").unwrap();
    assert!(book.is_unlocked("first-mission"));

    run(&session, Commands::History { limit: 5 }).unwrap();
    run(&session, Commands::Achievements).unwrap();
    let book = session.store.load_achievements("demo_tester").unwrap();
    assert!(book.recent.is_empty());
}

#[test]
fn starting_twice_keeps_progress() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);
    start(&session, "demo_tester");
    run(&session, Commands::Complete { answer: Some(2) }).unwrap();

    start(&session, "demo_tester");
    assert_eq!(session.load_state().unwrap().xp, 10);
}

#[test]
fn start_rejects_live_keys() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);
    let result = run(
        &session,
        Commands::Start {
            name: None,
            key: Some("L1aW4aubDFB7yfras2S1mN3bqg9nwySY8nkoLmJebSLD5BWv3ENZ".into()),
        },
    );
    assert!(result.is_err());
    assert!(session.store.players().unwrap().is_empty());
}

#[test]
fn select_respects_locks() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);
    start(&session, "demo_tester");

    let err = run(
        &session,
        Commands::Select {
            chain: "usps-reform".into(),
        },
    )
    .unwrap_err();
    assert_eq!(exit_code_for(&err), EXIT_INVALID_STATE);

    run(
        &session,
        Commands::Select {
            chain: "national-blockchain-summit".into(),
        },
    )
    .unwrap();
    let state = session.load_state().unwrap();
    assert_eq!(state.current_milestone_id.as_deref(), Some("nbs-petition"));
}

#[test]
fn tutorial_steps_advance() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);
    start(&session, "demo_tester");

    run(
        &session,
        Commands::Tutorial {
            action: Some(TutorialCommands::Complete),
        },
    )
    .unwrap();
    let progress = session.store.load_tutorial("demo_tester").unwrap();
    assert_eq!(progress.current.as_deref(), Some("blockchain-basics"));

    run(
        &session,
        Commands::Tutorial {
            action: Some(TutorialCommands::Skip),
        },
    )
    .unwrap();
    assert!(!session.store.load_tutorial("demo_tester").unwrap().enabled);
}

#[test]
fn reset_needs_confirmation() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);
    start(&session, "demo_tester");
    run(&session, Commands::Complete { answer: Some(2) }).unwrap();

    run(&session, Commands::Reset { yes: false }).unwrap();
    assert!(session.store.load("demo_tester").unwrap().is_some());

    run(&session, Commands::Reset { yes: true }).unwrap();
    assert!(session.store.load("demo_tester").unwrap().is_none());
    assert!(session.log.read_player("demo_tester").unwrap().is_empty());
    assert!(session.store.active_player().unwrap().is_none());
}

#[test]
fn demo_session_tracks_completions() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);

    run(
        &session,
        Commands::Demo {
            action: Some(DemoCommands::Enable),
        },
    )
    .unwrap();
    let demo = session.store.load_demo().unwrap();
    assert!(demo.enabled);
    assert_eq!(
        session.store.active_player().unwrap().as_deref(),
        Some(demo.address.as_str())
    );

    run(&session, Commands::Complete { answer: Some(2) }).unwrap();
    run(&session, Commands::Complete { answer: None }).unwrap();

    let demo = session.store.load_demo().unwrap();
    assert_eq!(demo.completed_milestones.len(), 2);
    assert_eq!(demo.pending_transactions.len(), 4);
    assert_eq!(demo.balance, 102_000);
    assert_eq!(session.load_state().unwrap().balance, 102_000);

    for _ in 0..2 {
        run(
            &session,
            Commands::Demo {
                action: Some(DemoCommands::Confirm),
            },
        )
        .unwrap();
    }
    assert!(session.store.load_demo().unwrap().pending_transactions.is_empty());

    run(
        &session,
        Commands::Demo {
            action: Some(DemoCommands::Disable),
        },
    )
    .unwrap();
    assert!(!session.store.load_demo().unwrap().enabled);

    let err = run(
        &session,
        Commands::Demo {
            action: Some(DemoCommands::Confirm),
        },
    )
    .unwrap_err();
    assert_eq!(exit_code_for(&err), EXIT_NOT_AVAILABLE);
}

#[test]
fn failed_save_leaves_demo_session_retryable() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);
    run(
        &session,
        Commands::Demo {
            action: Some(DemoCommands::Enable),
        },
    )
    .unwrap();
    let address = session.store.load_demo().unwrap().address;

    // A directory in place of the temp file makes the state write fail
    let blocker = session
        .store
        .state_path(&address)
        .unwrap()
        .with_extension("json.tmp");
    std::fs::create_dir(&blocker).unwrap();
    let err = run(&session, Commands::Complete { answer: Some(2) }).unwrap_err();
    assert!(err.to_string().contains("Failed to save game"));
    assert!(session.store.load_demo().unwrap().completed_milestones.is_empty());
    assert_eq!(session.load_state().unwrap().xp, 0);

    std::fs::remove_dir(&blocker).unwrap();
    run(&session, Commands::Complete { answer: Some(2) }).unwrap();
    let demo = session.store.load_demo().unwrap();
    assert_eq!(demo.completed_milestones, vec!["dge-training-1".to_string()]);
    assert_eq!(session.load_state().unwrap().xp, 10);
}

#[test]
fn commands_without_a_player_fail_cleanly() {
    let dir = TempDir::new().unwrap();
    let session = session(&dir);
    let err = run(&session, Commands::Status { json: false }).unwrap_err();
    assert!(err.to_string().contains("dgectl start"));
}

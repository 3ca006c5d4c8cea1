//! Contract test: the poll loop
//!
//! Constraints verified:
//! - The loop keeps cycling through failures
//! - Repeated identical values are announced exactly once
//! - Shutdown stops the loop between cycles
//! - Persisted state prevents re-announcing after a restart

mod common;

use backdrop_core::{FileStateStore, FixedInterval, Immediate, WatchEngine};
use common::*;
use std::time::Duration;

#[tokio::test]
async fn repeated_value_is_announced_once() {
    let source = ScriptedSource::always("https://a/x.png");
    let notifier = RecordingNotifier::new();
    let store = CountingStateStore::new();
    let engine = engine_with(&source, &notifier, &store);

    engine
        .run_until(tokio::time::sleep(Duration::from_millis(50)))
        .await;

    assert!(source.call_count() > 1, "loop should run several cycles");
    assert_eq!(notifier.sent(), vec!["https://a/x.png".to_string()]);
    assert_eq!(store.save_count(), 1);
}

#[tokio::test]
async fn loop_survives_failures_and_picks_up_changes() {
    let source = ScriptedSource::new([
        Fetch::NetworkDown,
        Fetch::Url("https://a/one.png"),
        Fetch::Nothing,
        Fetch::Url("https://a/one.png"),
        Fetch::NetworkDown,
        Fetch::Url("https://a/two.png"),
    ]);
    let notifier = RecordingNotifier::new();
    let store = CountingStateStore::new();
    let engine = engine_with(&source, &notifier, &store);

    engine
        .run_until(tokio::time::sleep(Duration::from_millis(50)))
        .await;

    assert_eq!(
        notifier.sent(),
        vec!["https://a/one.png".to_string(), "https://a/two.png".to_string()]
    );
    assert_eq!(store.stored().as_deref(), Some("https://a/two.png"));
}

#[tokio::test]
async fn shutdown_interrupts_the_wait() {
    let source = ScriptedSource::always("https://a/x.png");
    let notifier = RecordingNotifier::new();
    let store = CountingStateStore::new();
    let engine = WatchEngine::new(
        Box::new(source.clone()),
        Box::new(notifier.clone()),
        Box::new(store.clone()),
        Box::new(FixedInterval::new(Duration::from_secs(3600))),
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown = async {
        let _ = shutdown_rx.await;
    };

    let run = async {
        engine.run_until(shutdown).await;
    };
    let trigger = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown_tx.send(()).unwrap();
    };

    tokio::time::timeout(Duration::from_secs(5), async { tokio::join!(run, trigger) })
        .await
        .expect("engine should stop well before the hour-long interval");

    assert_eq!(source.call_count(), 1);
    assert_eq!(notifier.call_count(), 1);
}

#[tokio::test]
async fn restart_does_not_repeat_notification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image_data.json");
    let notifier = RecordingNotifier::new();

    for _ in 0..2 {
        let engine = WatchEngine::new(
            Box::new(ScriptedSource::always("https://a/x.png")),
            Box::new(notifier.clone()),
            Box::new(FileStateStore::new(&path).await.unwrap()),
            Box::new(Immediate),
        );
        engine.run_cycle().await;
    }

    assert_eq!(notifier.call_count(), 1);
}

#[tokio::test]
async fn corrupted_state_file_triggers_notification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image_data.json");
    std::fs::write(&path, "{ not json").unwrap();
    let notifier = RecordingNotifier::new();

    let engine = WatchEngine::new(
        Box::new(ScriptedSource::always("https://a/x.png")),
        Box::new(notifier.clone()),
        Box::new(FileStateStore::new(&path).await.unwrap()),
        Box::new(Immediate),
    );
    engine.run_cycle().await;

    assert_eq!(notifier.sent(), vec!["https://a/x.png".to_string()]);
    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, serde_json::json!({ "image_url": "https://a/x.png" }));
}

#[tokio::test]
async fn non_utf8_state_file_triggers_notification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("image_data.json");
    std::fs::write(&path, [0xff, 0xfe, 0x00, 0x9c]).unwrap();
    let notifier = RecordingNotifier::new();

    let engine = WatchEngine::new(
        Box::new(ScriptedSource::always("https://a/x.png")),
        Box::new(notifier.clone()),
        Box::new(FileStateStore::new(&path).await.unwrap()),
        Box::new(Immediate),
    );

    for _ in 0..3 {
        engine.run_cycle().await;
    }

    assert_eq!(notifier.sent(), vec!["https://a/x.png".to_string()]);
}

#[tokio::test]
async fn shutdown_before_first_cycle_lets_it_finish() {
    let source = ScriptedSource::always("https://a/x.png");
    let notifier = RecordingNotifier::new();
    let store = CountingStateStore::new();
    let engine = WatchEngine::new(
        Box::new(source.clone()),
        Box::new(notifier.clone()),
        Box::new(store.clone()),
        Box::new(FixedInterval::new(Duration::from_secs(3600))),
    );

    tokio::time::timeout(Duration::from_secs(5), engine.run_until(std::future::ready(())))
        .await
        .expect("a resolved shutdown should stop the loop after one cycle");

    assert_eq!(source.call_count(), 1);
    assert_eq!(notifier.call_count(), 1);
    assert_eq!(store.stored().as_deref(), Some("https://a/x.png"));
}

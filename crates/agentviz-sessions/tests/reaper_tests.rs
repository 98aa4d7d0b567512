use std::time::Duration;

use agentviz_events::{EventChannel, SessionAction};
use agentviz_sessions::{lock_registry, RegistryConfig, SessionRegistry, TtlReaper};

fn config(ttl_ms: u64, sweep_ms: u64) -> RegistryConfig {
    RegistryConfig::default()
        .with_ttl(Duration::from_millis(ttl_ms))
        .with_sweep_interval(Duration::from_millis(sweep_ms))
}

// ============================================================
// Background sweep
// ============================================================

#[tokio::test]
async fn test_reaper_removes_idle_session_with_single_ended() {
    let channel = EventChannel::new(64);
    let mut rx = channel.subscribe();
    let registry = SessionRegistry::new(channel).into_shared();
    lock_registry(&registry).register_session("s1", "proj", None, None);

    let reaper = TtlReaper::start(registry.clone(), config(50, 10));
    tokio::time::sleep(Duration::from_millis(300)).await;
    reaper.stop().await;

    assert!(lock_registry(&registry).is_empty());

    let mut actions = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Some(session) = event.as_session() {
            actions.push(session.action);
        }
    }
    assert_eq!(actions, vec![SessionAction::Started, SessionAction::Ended]);
}

#[tokio::test]
async fn test_active_session_survives_sweeps() {
    let registry = SessionRegistry::default().into_shared();
    lock_registry(&registry).register_session("s1", "proj", None, None);

    let reaper = TtlReaper::start(registry.clone(), config(400, 10));
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        lock_registry(&registry).record_activity("s1");
    }
    reaper.stop().await;

    assert!(lock_registry(&registry).contains("s1"));
}

#[tokio::test]
async fn test_stop_ends_the_task() {
    let registry = SessionRegistry::default().into_shared();
    let reaper = TtlReaper::start(registry.clone(), config(10, 5));
    assert!(reaper.is_running());
    reaper.stop().await;

    lock_registry(&registry).register_session("late", "proj", None, None);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(lock_registry(&registry).contains("late"));
}

use agentviz_adapters::{adapt, parse_record, RawLine};
use agentviz_events::{
    ActivityAction, AgentAction, EventPayload, NormalizedEvent, Severity, ToolCategory, ToolStatus,
};
use serde_json::{json, Value};

/// Helper: run one Claude Code record through parse + adapt.
fn run(record: Value) -> Vec<NormalizedEvent> {
    let line = record.to_string();
    let parsed = parse_record(RawLine {
        line: &line,
        session_id: "sess-claude",
        agent_id: None,
        source: "claude",
    })
    .unwrap();
    adapt(&parsed)
}

fn activity_actions(events: &[NormalizedEvent]) -> Vec<ActivityAction> {
    events
        .iter()
        .filter_map(|e| e.as_activity().map(|a| a.action))
        .collect()
}

// ============================================================
// Assistant messages
// ============================================================

#[test]
fn test_read_tool_keeps_only_basename() {
    let events = run(json!({
        "type": "assistant",
        "timestamp": "2026-03-01T10:00:00Z",
        "message": {
            "content": [{
                "type": "tool_use",
                "id": "toolu_read",
                "name": "Read",
                "input": {"file_path": "/Users/x/proj/auth.ts"}
            }]
        }
    }));

    assert_eq!(events.len(), 1);
    let tool = events[0].as_tool().unwrap();
    assert_eq!(tool.tool, ToolCategory::FileRead);
    assert_eq!(tool.status, ToolStatus::Started);
    assert_eq!(tool.tool_use_id, "toolu_read");
    assert_eq!(tool.context.as_deref(), Some("auth.ts"));

    let serialized = serde_json::to_string(&events).unwrap();
    assert!(!serialized.contains("/Users/x/proj"));
    assert_eq!(events[0].timestamp.to_rfc3339(), "2026-03-01T10:00:00+00:00");
}

#[test]
fn test_text_blocks_become_presence_signals() {
    let events = run(json!({
        "type": "assistant",
        "message": {
            "content": [
                {"type": "thinking", "thinking": "let me consider the private key", "signature": "sig"},
                {"type": "text", "text": "Here is the password: hunter2"}
            ]
        }
    }));

    assert_eq!(
        activity_actions(&events),
        vec![ActivityAction::Thinking, ActivityAction::Responding]
    );
    let serialized = serde_json::to_string(&events).unwrap();
    assert!(!serialized.contains("hunter2"));
    assert!(!serialized.contains("private key"));
}

#[test]
fn test_no_content_sentinel_is_thinking() {
    let events = run(json!({
        "type": "assistant",
        "message": {"content": [{"type": "text", "text": "(no content)"}]}
    }));
    assert_eq!(activity_actions(&events), vec![ActivityAction::Thinking]);
}

#[test]
fn test_usage_rides_on_first_activity_and_end_turn_waits() {
    let events = run(json!({
        "type": "assistant",
        "message": {
            "content": [
                {"type": "text", "text": "done"},
                {"type": "text", "text": "also done"}
            ],
            "stop_reason": "end_turn",
            "usage": {
                "input_tokens": 120,
                "output_tokens": 45,
                "cache_read_input_tokens": 1000,
                "cache_creation_input_tokens": 10
            }
        }
    }));

    assert_eq!(
        activity_actions(&events),
        vec![
            ActivityAction::Responding,
            ActivityAction::Responding,
            ActivityAction::Waiting
        ]
    );
    let tokens = events[0].as_activity().unwrap().tokens.unwrap();
    assert_eq!(tokens.input, 120);
    assert_eq!(tokens.output, 45);
    assert_eq!(tokens.cache_read, Some(1000));
    assert_eq!(tokens.cache_write, Some(10));
    assert!(events[1].as_activity().unwrap().tokens.is_none());
    assert!(events[2].as_activity().unwrap().tokens.is_none());
}

#[test]
fn test_task_spawn_yields_tool_then_agent() {
    let events = run(json!({
        "type": "assistant",
        "message": {
            "content": [{
                "type": "tool_use",
                "id": "toolu_task",
                "name": "Task",
                "input": {
                    "description": "Find callers",
                    "prompt": "Search the repo for every caller of secret_fn",
                    "subagent_type": "Explore"
                }
            }]
        }
    }));

    assert_eq!(events.len(), 2);
    let tool = events[0].as_tool().unwrap();
    assert_eq!(tool.tool, ToolCategory::SpawnAgent);
    assert_eq!(tool.context.as_deref(), Some("Find callers"));

    let agent = events[1].as_agent().unwrap();
    assert_eq!(agent.action, AgentAction::Spawned);
    assert_eq!(agent.agent_role.as_deref(), Some("Explore"));
    assert_eq!(events[1].agent_id.as_deref(), Some("toolu_task"));

    assert!(!serde_json::to_string(&events).unwrap().contains("secret_fn"));
}

#[test]
fn test_tool_use_without_id_is_skipped() {
    let events = run(json!({
        "type": "assistant",
        "message": {"content": [{"type": "tool_use", "name": "Bash", "input": {"command": "ls"}}]}
    }));
    assert!(events.is_empty());
}

// ============================================================
// User messages
// ============================================================

#[test]
fn test_user_prompt_string_and_blocks() {
    let events = run(json!({
        "type": "user",
        "message": {"role": "user", "content": "please rotate the AWS keys"}
    }));
    assert_eq!(activity_actions(&events), vec![ActivityAction::UserPrompt]);
    assert!(!serde_json::to_string(&events).unwrap().contains("AWS"));

    let blocks = run(json!({
        "type": "user",
        "message": {"content": [{"type": "text", "text": "one"}, {"type": "text", "text": "two"}]}
    }));
    assert_eq!(activity_actions(&blocks), vec![ActivityAction::UserPrompt]);
}

#[test]
fn test_meta_user_messages_are_inert() {
    let events = run(json!({
        "type": "user",
        "isMeta": true,
        "message": {"content": "<local-command-stdout>secret</local-command-stdout>"}
    }));
    assert!(events.is_empty());
}

#[test]
fn test_tool_results_classify_status() {
    let events = run(json!({
        "type": "user",
        "message": {
            "content": [
                {"type": "tool_result", "tool_use_id": "toolu_ok", "content": "file contents"},
                {"type": "tool_result", "tool_use_id": "toolu_flag", "content": "fine", "is_error": true},
                {"type": "tool_result", "tool_use_id": "toolu_text", "content": [{"type": "text", "text": "Error: ENOENT /etc/shadow"}]}
            ]
        }
    }));

    let statuses: Vec<(String, ToolStatus)> = events
        .iter()
        .filter_map(|e| e.as_tool())
        .map(|t| (t.tool_use_id.clone(), t.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("toolu_ok".to_string(), ToolStatus::Completed),
            ("toolu_flag".to_string(), ToolStatus::Error),
            ("toolu_text".to_string(), ToolStatus::Error),
        ]
    );
    for event in &events {
        assert_eq!(event.as_tool().unwrap().tool, ToolCategory::Other);
    }
    assert!(!serde_json::to_string(&events).unwrap().contains("/etc/shadow"));
}

// ============================================================
// Other record kinds
// ============================================================

#[test]
fn test_summary_and_system_records() {
    let summary = run(json!({"type": "summary", "summary": "Refactored the login flow", "leafUuid": "u"}));
    assert_eq!(summary.len(), 1);
    assert!(matches!(summary[0].payload, EventPayload::Summary));

    let error = run(json!({"type": "system", "level": "error", "content": "API Error: 500"}));
    assert!(matches!(
        error[0].payload,
        EventPayload::Error(ref e) if e.severity == Severity::Error
    ));

    let warning = run(json!({"type": "system", "level": "warning", "content": "x"}));
    assert!(matches!(
        warning[0].payload,
        EventPayload::Error(ref e) if e.severity == Severity::Warning
    ));

    assert!(run(json!({"type": "system", "level": "info", "content": "x"})).is_empty());
}

#[test]
fn test_inert_and_unknown_kinds_return_nothing() {
    for record in [
        json!({"type": "progress", "data": {"message": "x"}}),
        json!({"type": "file-history-snapshot", "snapshot": {}}),
        json!({"type": "queue-operation", "operation": "enqueue"}),
        json!({"type": "brand-new-kind", "anything": 1}),
        json!({"type": "assistant"}),
        json!({"type": "assistant", "message": {}}),
        json!({"type": "assistant", "message": {"content": []}}),
        json!({"type": "assistant", "message": {"content": [{"type": "text"}]}}),
        json!({"type": "assistant", "message": {"content": [{"type": "text", "text": "  "}]}}),
        json!({"type": "assistant", "message": {"content": ""}}),
        json!({"type": "user", "message": {"content": "   "}}),
        json!({"type": "user"}),
    ] {
        assert!(run(record.clone()).is_empty(), "expected no events for {}", record);
    }
}

#[test]
fn test_agent_id_from_envelope_is_stamped() {
    let line = json!({"type": "assistant", "message": {"content": [{"type": "text", "text": "hi"}]}})
        .to_string();
    let parsed = parse_record(RawLine {
        line: &line,
        session_id: "sess-claude",
        agent_id: Some("agent-a1b2"),
        source: "claude-code",
    })
    .unwrap();
    let events = adapt(&parsed);
    assert_eq!(events[0].agent_id.as_deref(), Some("agent-a1b2"));
    assert_eq!(events[0].session_id, "sess-claude");
}

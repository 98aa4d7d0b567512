use agentviz_adapters::{adapt, parse_record, RawLine};
use agentviz_events::{
    ActivityAction, AgentAction, EventPayload, NormalizedEvent, Severity, ToolCategory, ToolStatus,
};
use serde_json::{json, Value};

/// Helper: run one Codex rollout record through parse + adapt.
fn run(record: Value) -> Vec<NormalizedEvent> {
    let line = record.to_string();
    let parsed = parse_record(RawLine {
        line: &line,
        session_id: "sess-codex",
        agent_id: None,
        source: "codex",
    })
    .unwrap();
    adapt(&parsed)
}

fn response_item(payload: Value) -> Value {
    json!({"timestamp": "2026-02-15T03:50:50.838Z", "type": "response_item", "payload": payload})
}

fn event_msg(payload: Value) -> Value {
    json!({"timestamp": "2026-02-15T03:50:51.000Z", "type": "event_msg", "payload": payload})
}

// ============================================================
// Response items
// ============================================================

#[test]
fn test_assistant_message_is_responding() {
    let events = run(response_item(json!({
        "type": "message",
        "role": "assistant",
        "content": [{"type": "output_text", "text": "The token is abc123"}]
    })));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].as_activity().unwrap().action, ActivityAction::Responding);
    assert!(!serde_json::to_string(&events).unwrap().contains("abc123"));
}

#[test]
fn test_user_and_developer_messages_are_inert() {
    for role in ["user", "developer", "system"] {
        let events = run(response_item(json!({
            "type": "message",
            "role": role,
            "content": [{"type": "input_text", "text": "<environment_context>..."}]
        })));
        assert!(events.is_empty(), "role {} should be inert", role);
    }
}

#[test]
fn test_no_content_sentinel_message_is_thinking() {
    let events = run(response_item(json!({
        "type": "message",
        "role": "assistant",
        "content": [{"type": "output_text", "text": "(no content)"}]
    })));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].as_activity().unwrap().action, ActivityAction::Thinking);
}

#[test]
fn test_reasoning_is_thinking() {
    let events = run(response_item(json!({
        "type": "reasoning",
        "summary": [{"type": "summary_text", "text": "thinking about secrets"}],
        "encrypted_content": "gAAAA"
    })));
    assert_eq!(events[0].as_activity().unwrap().action, ActivityAction::Thinking);
}

#[test]
fn test_shell_call_and_output() {
    let call = run(response_item(json!({
        "type": "function_call",
        "name": "shell",
        "arguments": "{\"command\":[\"bash\",\"-lc\",\"export TOKEN=sk-123\"]}",
        "call_id": "call_1"
    })));
    assert_eq!(call.len(), 1);
    let tool = call[0].as_tool().unwrap();
    assert_eq!(tool.tool, ToolCategory::Terminal);
    assert_eq!(tool.status, ToolStatus::Started);
    assert_eq!(tool.tool_use_id, "call_1");
    assert!(!serde_json::to_string(&call).unwrap().contains("sk-123"));

    let ok = run(response_item(json!({
        "type": "function_call_output",
        "call_id": "call_1",
        "output": "{\"output\":\"done\",\"metadata\":{\"exit_code\":0}}"
    })));
    assert_eq!(ok[0].as_tool().unwrap().status, ToolStatus::Completed);

    let failed = run(response_item(json!({
        "type": "function_call_output",
        "call_id": "call_1",
        "output": {"content": "permission denied", "success": false}
    })));
    assert_eq!(failed[0].as_tool().unwrap().status, ToolStatus::Error);
}

#[test]
fn test_apply_patch_custom_tool_call() {
    let events = run(response_item(json!({
        "type": "custom_tool_call",
        "call_id": "call_patch",
        "name": "apply_patch",
        "status": "completed",
        "input": "*** Begin Patch\n*** Update File: /home/dev/secret-project/src/auth.rs\n@@\n-let key = \"old\";\n+let key = \"new\";\n*** End Patch\n"
    })));
    let tool = events[0].as_tool().unwrap();
    assert_eq!(tool.tool, ToolCategory::FileWrite);
    assert_eq!(tool.context.as_deref(), Some("auth.rs"));
    let serialized = serde_json::to_string(&events).unwrap();
    assert!(!serialized.contains("secret-project"));
    assert!(!serialized.contains("let key"));

    let output = run(response_item(json!({
        "type": "custom_tool_call_output",
        "call_id": "call_patch",
        "status": "failed",
        "output": "patch rejected"
    })));
    assert_eq!(output[0].as_tool().unwrap().status, ToolStatus::Error);
}

#[test]
fn test_spawn_agent_call_yields_agent_spawned() {
    let events = run(response_item(json!({
        "type": "function_call",
        "name": "spawn_agent",
        "arguments": "{\"agent_type\":\"explorer\",\"message\":\"look at billing\"}",
        "call_id": "call_spawn"
    })));
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].as_tool().unwrap().tool, ToolCategory::SpawnAgent);
    let agent = events[1].as_agent().unwrap();
    assert_eq!(agent.action, AgentAction::Spawned);
    assert_eq!(agent.agent_role.as_deref(), Some("explorer"));
    assert_eq!(events[1].agent_id.as_deref(), Some("call_spawn"));
}

#[test]
fn test_local_shell_and_web_search() {
    let shell = run(response_item(json!({
        "type": "local_shell_call",
        "call_id": "ls_1",
        "status": "completed",
        "action": {"type": "exec", "command": ["cat", "/etc/passwd"]}
    })));
    assert_eq!(shell[0].as_tool().unwrap().tool, ToolCategory::Terminal);
    assert!(!serde_json::to_string(&shell).unwrap().contains("passwd"));

    let search = run(response_item(json!({
        "type": "web_search_call",
        "id": "ws_1",
        "status": "completed",
        "action": {"type": "search", "query": "how to leak secrets"}
    })));
    let statuses: Vec<ToolStatus> = search.iter().map(|e| e.as_tool().unwrap().status).collect();
    assert_eq!(statuses, vec![ToolStatus::Started, ToolStatus::Completed]);
    assert!(search.iter().all(|e| e.as_tool().unwrap().tool == ToolCategory::Search));
    assert!(!serde_json::to_string(&search).unwrap().contains("leak"));
}

#[test]
fn test_web_search_without_id_is_stable_across_runs() {
    let record = response_item(json!({"type": "web_search_call", "status": "completed"}));
    let first = run(record.clone());
    let second = run(record);

    let id = &first[0].as_tool().unwrap().tool_use_id;
    assert_eq!(id, &second[0].as_tool().unwrap().tool_use_id);
    assert_eq!(id, &first[1].as_tool().unwrap().tool_use_id);
}

// ============================================================
// Event messages
// ============================================================

#[test]
fn test_token_count_carries_usage() {
    let events = run(event_msg(json!({
        "type": "token_count",
        "info": {
            "total_token_usage": {"input_tokens": 1, "output_tokens": 1},
            "last_token_usage": {"input_tokens": 65323, "output_tokens": 445, "cached_input_tokens": 58624}
        }
    })));
    let activity = events[0].as_activity().unwrap();
    assert_eq!(activity.action, ActivityAction::Responding);
    let tokens = activity.tokens.unwrap();
    assert_eq!(tokens.input, 65323);
    assert_eq!(tokens.output, 445);
    assert_eq!(tokens.cache_read, Some(58624));
    assert_eq!(tokens.cache_write, None);

    assert!(run(event_msg(json!({"type": "token_count", "info": null}))).is_empty());
}

#[test]
fn test_task_complete_and_errors() {
    let complete = run(event_msg(json!({"type": "task_complete", "last_agent_message": "bye"})));
    assert_eq!(complete.len(), 2);
    assert_eq!(complete[0].as_activity().unwrap().action, ActivityAction::Waiting);
    assert!(matches!(complete[1].payload, EventPayload::Summary));

    let error = run(event_msg(json!({"type": "error", "message": "quota exceeded for key sk-1"})));
    assert!(matches!(error[0].payload, EventPayload::Error(ref e) if e.severity == Severity::Error));
    assert!(!serde_json::to_string(&error).unwrap().contains("sk-1"));

    let aborted = run(event_msg(json!({"type": "turn_aborted", "reason": "interrupted"})));
    assert!(matches!(aborted[0].payload, EventPayload::Error(ref e) if e.severity == Severity::Warning));
}

#[test]
fn test_user_message_event_is_prompt() {
    let events = run(event_msg(json!({"type": "user_message", "message": "deploy to prod"})));
    assert_eq!(events[0].as_activity().unwrap().action, ActivityAction::UserPrompt);
}

#[test]
fn test_lifecycle_and_duplicate_kinds_are_inert() {
    for record in [
        json!({"type": "session_meta", "payload": {"id": "x", "cwd": "/home/dev/repo"}}),
        json!({"type": "turn_context", "payload": {"cwd": "/home/dev/repo", "model": "gpt"}}),
        event_msg(json!({"type": "agent_message", "message": "hello"})),
        event_msg(json!({"type": "agent_reasoning", "text": "hmm"})),
        response_item(json!({"type": "something_new"})),
        response_item(json!({"type": "function_call", "name": "shell"})),
        response_item(json!({"type": "message", "role": "assistant"})),
        response_item(json!({"type": "message", "role": "assistant", "content": []})),
        response_item(json!({"type": "message", "role": "assistant", "content": [{"type": "output_text"}]})),
        json!({"type": "response_item"}),
        json!({"type": "future_record"}),
    ] {
        assert!(run(record.clone()).is_empty(), "expected no events for {}", record);
    }
}

#[test]
fn test_compacted_is_summary() {
    let events = run(json!({"timestamp": "2026-02-15T04:00:00Z", "type": "compacted", "payload": {"message": "summary text"}}));
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0].payload, EventPayload::Summary));
}

//! Claude Code tool category table.
//!
//! | tool | category | context |
//! |---|---|---|
//! | Read, LS | file_read | basename of `file_path` / `path` |
//! | Write, Edit, MultiEdit | file_write | basename of `file_path` |
//! | NotebookEdit, NotebookRead | notebook | basename of `notebook_path` |
//! | Bash | terminal | first line of `description` |
//! | BashOutput, KillShell, KillBash | terminal | none |
//! | Glob | search | basename of `pattern` |
//! | Grep | search | first line of `pattern` |
//! | WebSearch, WebFetch | search | none |
//! | TodoWrite | plan | number of `todos` |
//! | ExitPlanMode, EnterPlanMode | plan | none |
//! | Task, Agent | spawn_agent | first line of `description` |
//! | AskUserQuestion | communicate | none |
//!
//! Anything else maps to `other` with the raw tool name as detail.

use agentviz_events::ToolCategory;
use serde_json::Value;

use crate::privacy::{basename, bounded_line, item_count, str_field};
use crate::tools::{ToolInvocation, ToolMapping};

pub(crate) fn lookup(name: &str) -> Option<ToolMapping> {
    let mapping = match name {
        "Read" => ToolMapping::new(ToolCategory::FileRead, "read"),
        "LS" => ToolMapping::new(ToolCategory::FileRead, "list"),
        "Write" => ToolMapping::new(ToolCategory::FileWrite, "write"),
        "Edit" => ToolMapping::new(ToolCategory::FileWrite, "edit"),
        "MultiEdit" => ToolMapping::new(ToolCategory::FileWrite, "multi_edit"),
        "NotebookEdit" => ToolMapping::new(ToolCategory::Notebook, "notebook_edit"),
        "NotebookRead" => ToolMapping::new(ToolCategory::Notebook, "notebook_read"),
        "Bash" => ToolMapping::new(ToolCategory::Terminal, "bash"),
        "BashOutput" => ToolMapping::new(ToolCategory::Terminal, "bash_output"),
        "KillShell" | "KillBash" => ToolMapping::new(ToolCategory::Terminal, "kill_shell"),
        "Glob" => ToolMapping::new(ToolCategory::Search, "glob"),
        "Grep" => ToolMapping::new(ToolCategory::Search, "grep"),
        "WebSearch" => ToolMapping::new(ToolCategory::Search, "web_search"),
        "WebFetch" => ToolMapping::new(ToolCategory::Search, "web_fetch"),
        "TodoWrite" => ToolMapping::new(ToolCategory::Plan, "todo_write"),
        "ExitPlanMode" | "EnterPlanMode" => ToolMapping::new(ToolCategory::Plan, "plan_mode"),
        "Task" | "Agent" => ToolMapping::new(ToolCategory::SpawnAgent, "task"),
        "AskUserQuestion" => ToolMapping::new(ToolCategory::Communicate, "ask_user"),
        _ => return None,
    };
    Some(mapping)
}

/// Reduce a `tool_use` block to its allowlisted form.
pub(crate) fn invocation(name: &str, input: &Value) -> ToolInvocation {
    let Some(mapping) = lookup(name) else {
        return ToolInvocation::unmapped(name);
    };

    let context = match name {
        "Read" | "Write" | "Edit" | "MultiEdit" => str_field(input, "file_path").and_then(basename),
        "LS" => str_field(input, "path").and_then(basename),
        "NotebookEdit" | "NotebookRead" => str_field(input, "notebook_path").and_then(basename),
        "Glob" => str_field(input, "pattern").and_then(basename),
        "Grep" => str_field(input, "pattern").and_then(bounded_line),
        "Bash" | "Task" | "Agent" => str_field(input, "description").and_then(bounded_line),
        "TodoWrite" => input
            .get("todos")
            .and_then(Value::as_array)
            .map(|todos| item_count(todos.len())),
        _ => None,
    };

    let invocation = ToolInvocation::mapped(mapping, context);
    if mapping.category == ToolCategory::SpawnAgent {
        invocation.spawning(str_field(input, "subagent_type"))
    } else {
        invocation
    }
}

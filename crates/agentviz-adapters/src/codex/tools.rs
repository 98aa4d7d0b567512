//! Codex tool category table.
//!
//! | tool | category | context |
//! |---|---|---|
//! | shell, exec_command, local_shell_call | terminal | none |
//! | write_stdin | terminal | none |
//! | apply_patch | file_write | basename of the first file header in the patch |
//! | view_image | file_read | basename of `path` |
//! | update_plan | plan | number of `plan` steps |
//! | web_search_call | search | none |
//! | spawn_agent | spawn_agent | none |
//! | send_input | communicate | none |
//!
//! Anything else maps to `other` with the raw tool name as detail.

use agentviz_events::ToolCategory;
use serde_json::Value;

use crate::privacy::{basename, item_count, str_field};
use crate::tools::{ToolInvocation, ToolMapping};

pub(crate) const LOCAL_SHELL: &str = "local_shell_call";
pub(crate) const WEB_SEARCH: &str = "web_search_call";

const PATCH_HEADERS: [&str; 3] = ["*** Add File:", "*** Update File:", "*** Delete File:"];

pub(crate) fn lookup(name: &str) -> Option<ToolMapping> {
    let mapping = match name {
        "shell" | "exec_command" | LOCAL_SHELL => ToolMapping::new(ToolCategory::Terminal, "shell"),
        "write_stdin" => ToolMapping::new(ToolCategory::Terminal, "write_stdin"),
        "apply_patch" => ToolMapping::new(ToolCategory::FileWrite, "apply_patch"),
        "view_image" => ToolMapping::new(ToolCategory::FileRead, "view_image"),
        "update_plan" => ToolMapping::new(ToolCategory::Plan, "update_plan"),
        WEB_SEARCH => ToolMapping::new(ToolCategory::Search, "web_search"),
        "spawn_agent" => ToolMapping::new(ToolCategory::SpawnAgent, "spawn_agent"),
        "send_input" => ToolMapping::new(ToolCategory::Communicate, "send_input"),
        _ => return None,
    };
    Some(mapping)
}

/// Reduce a call to its allowlisted form.
///
/// `arguments` is the decoded argument object of a `function_call`;
/// `raw_input` is the free-form input of a `custom_tool_call`.
pub(crate) fn invocation(name: &str, arguments: &Value, raw_input: Option<&str>) -> ToolInvocation {
    let Some(mapping) = lookup(name) else {
        return ToolInvocation::unmapped(name);
    };

    let context = match name {
        "apply_patch" => raw_input
            .or_else(|| str_field(arguments, "input"))
            .and_then(patched_file),
        "view_image" => str_field(arguments, "path").and_then(basename),
        "update_plan" => arguments
            .get("plan")
            .and_then(Value::as_array)
            .map(|steps| item_count(steps.len())),
        _ => None,
    };

    let invocation = ToolInvocation::mapped(mapping, context);
    if mapping.category == ToolCategory::SpawnAgent {
        invocation.spawning(str_field(arguments, "agent_type"))
    } else {
        invocation
    }
}

/// Decode `function_call.arguments`; anything unreadable is treated as empty.
pub(crate) fn decode_arguments(arguments: Option<&str>) -> Value {
    arguments
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or(Value::Null)
}

/// Basename of the first file touched by an apply_patch body.
fn patched_file(patch: &str) -> Option<String> {
    patch.lines().find_map(|line| {
        let line = line.trim();
        PATCH_HEADERS
            .iter()
            .find_map(|header| line.strip_prefix(header))
            .and_then(|path| basename(path.trim()))
    })
}

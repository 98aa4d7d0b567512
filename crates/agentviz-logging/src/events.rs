use colored::Colorize;
use std::io::Write;

use agentviz_events::{
    ActivityAction, AgentAction, EventPayload, NormalizedEvent, SessionAction, Severity,
    ToolStatus,
};

/// Output format for diagnostics and printed events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Writes normalized events to stdout, one line each.
pub struct EventPrinter {
    format: LogFormat,
}

impl EventPrinter {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn print(&self, event: &NormalizedEvent) {
        if let Some(line) = self.render(event) {
            let _ = writeln!(std::io::stdout(), "{}", line);
        }
    }

    /// The line `print` would write.
    pub fn render(&self, event: &NormalizedEvent) -> Option<String> {
        match self.format {
            LogFormat::Json => serde_json::to_string(event).ok(),
            LogFormat::Pretty => Some(Self::render_pretty(event)),
            LogFormat::Compact => Some(Self::render_compact(event)),
        }
    }

    fn render_pretty(event: &NormalizedEvent) -> String {
        let time = event.timestamp.format("%H:%M:%S").to_string().dimmed();
        let sid = short_id(&event.session_id).bright_blue();
        let agent = match &event.agent_id {
            Some(id) => format!(" {}", format!("[{}]", short_id(id)).magenta()),
            None => String::new(),
        };

        let body = match &event.payload {
            EventPayload::Session(session) => {
                let project = session.project.as_deref().unwrap_or("-");
                let source = session.source.map(|s| s.as_str()).unwrap_or("-");
                match session.action {
                    SessionAction::Started => format!(
                        "{} {} {}",
                        "● session started".bright_green().bold(),
                        project.bold(),
                        format!("({})", source).dimmed()
                    ),
                    SessionAction::Ended => format!(
                        "{} {}",
                        "○ session ended".bright_black().bold(),
                        project.bold()
                    ),
                }
            }
            EventPayload::Activity(activity) => {
                let label = match activity.action {
                    ActivityAction::Thinking => "… thinking".yellow(),
                    ActivityAction::Responding => "✎ responding".normal(),
                    ActivityAction::Waiting => "⏸ waiting".dimmed(),
                    ActivityAction::UserPrompt => "▶ user prompt".bright_cyan(),
                };
                match &activity.tokens {
                    Some(tokens) => format!(
                        "{} {}",
                        label,
                        format!("{} in / {} out", tokens.input, tokens.output).dimmed()
                    ),
                    None => label.to_string(),
                }
            }
            EventPayload::Tool(tool) => {
                let marker = match tool.status {
                    ToolStatus::Started => "→".bright_cyan(),
                    ToolStatus::Completed => "✓".bright_green(),
                    ToolStatus::Error => "✗".bright_red(),
                };
                let mut line = format!("{} {}", marker, tool.tool.as_str().bold());
                if let Some(detail) = &tool.detail {
                    line.push_str(&format!(" {}", detail));
                }
                if let Some(context) = &tool.context {
                    line.push_str(&format!(" {}", context.bright_white()));
                }
                line.push_str(&format!(" {}", short_id(&tool.tool_use_id).dimmed()));
                line
            }
            EventPayload::Agent(agent) => {
                let label = match agent.action {
                    AgentAction::Spawned => "⇢ agent spawned".bright_magenta().bold(),
                    AgentAction::Completed => "⇠ agent completed".magenta(),
                    AgentAction::Error => "⇠ agent failed".bright_red(),
                };
                match &agent.agent_role {
                    Some(role) => format!("{} {}", label, role),
                    None => label.to_string(),
                }
            }
            EventPayload::Error(error) => match error.severity {
                Severity::Warning => "⚠ warning".bright_yellow().to_string(),
                Severity::Error => "✗ error".bright_red().bold().to_string(),
            },
            EventPayload::Summary => "── turn ──".dimmed().to_string(),
        };

        format!("{} {}{}  {}", time, sid, agent, body)
    }

    fn render_compact(event: &NormalizedEvent) -> String {
        let time = event.timestamp.format("%H:%M:%S");
        let kind = match &event.payload {
            EventPayload::Session(s) => format!("session:{}", snake(&s.action)),
            EventPayload::Activity(a) => format!("activity:{}", snake(&a.action)),
            EventPayload::Tool(t) => format!("tool:{}:{}", t.tool.as_str(), snake(&t.status)),
            EventPayload::Agent(a) => format!("agent:{}", snake(&a.action)),
            EventPayload::Error(e) => format!("error:{}", snake(&e.severity)),
            EventPayload::Summary => "summary".to_string(),
        };

        let mut line = format!("[{}] {} {}", time, kind, event.session_id);
        if let Some(agent_id) = &event.agent_id {
            line.push_str(&format!(" agent={}", agent_id));
        }
        if let Some(context) = event.as_tool().and_then(|t| t.context.as_deref()) {
            line.push_str(&format!(" {}", context));
        }
        line
    }
}

/// The serde name of a unit enum value.
fn snake<T: serde::Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::from("?"),
    }
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

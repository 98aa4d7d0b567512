//! `agentviz replay`: feed existing log files through the pipeline.
//!
//! A minimal stand-in for the live file tailer. Each file is one log:
//!
//! - `<project>/<session>.jsonl` is a main session log
//! - `<project>/<session>/subagents/agent-<id>.jsonl` is a sub-agent log of
//!   `<session>`

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{info, warn};

use agentviz_core::{Discovery, LineSignal, Pipeline, ReaderSignal, UNKNOWN_PROJECT};
use agentviz_events::{NormalizedEvent, Source};
use agentviz_logging::EventPrinter;
use agentviz_sessions::RegistryState;

const SUBAGENTS_DIR: &str = "subagents";
const AGENT_FILE_PREFIX: &str = "agent-";

/// Where a log file sits in the session layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub session_id: String,
    pub agent_id: Option<String>,
    pub project: String,
}

impl LogFile {
    pub fn from_path(path: &Path) -> Self {
        let stem = file_name(path.file_stem()).unwrap_or_else(|| UNKNOWN_PROJECT.to_string());
        let parent = path.parent();

        let in_subagents = parent
            .and_then(|p| p.file_name())
            .is_some_and(|name| name == SUBAGENTS_DIR);

        if in_subagents {
            let session_dir = parent.and_then(Path::parent);
            let session_id = session_dir
                .and_then(|p| file_name(p.file_name()))
                .unwrap_or_else(|| stem.clone());
            let project = session_dir
                .and_then(Path::parent)
                .and_then(|p| file_name(p.file_name()))
                .unwrap_or_else(|| UNKNOWN_PROJECT.to_string());
            let agent_id = stem
                .strip_prefix(AGENT_FILE_PREFIX)
                .unwrap_or(&stem)
                .to_string();

            return Self {
                path: path.to_path_buf(),
                session_id,
                agent_id: Some(agent_id),
                project,
            };
        }

        Self {
            path: path.to_path_buf(),
            session_id: stem,
            agent_id: None,
            project: parent
                .and_then(|p| file_name(p.file_name()))
                .unwrap_or_else(|| UNKNOWN_PROJECT.to_string()),
        }
    }
}

/// Options for one replay run.
pub struct ReplayOptions {
    pub source: Option<Source>,
    pub project: Option<String>,
    pub snapshot: bool,
}

pub fn run(files: &[PathBuf], options: &ReplayOptions, printer: &EventPrinter) -> Result<()> {
    let state = replay(files, options, |event| printer.print(&event))?;
    if options.snapshot {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }
    Ok(())
}

/// Feed `files` through a fresh pipeline, handing every emitted event to
/// `on_event` in order. Returns the final registry state.
pub fn replay<F>(files: &[PathBuf], options: &ReplayOptions, mut on_event: F) -> Result<RegistryState>
where
    F: FnMut(NormalizedEvent),
{
    let pipeline = Pipeline::default();
    let mut rx = pipeline.subscribe();

    for path in files {
        let mut log = LogFile::from_path(path);
        if let Some(project) = &options.project {
            log.project = project.clone();
        }
        let source = options.source.unwrap_or_else(|| guess_source(path));
        replay_file(&pipeline, &log, source, &mut rx, &mut on_event)?;
    }
    Ok(pipeline.snapshot())
}

fn replay_file<F>(
    pipeline: &Pipeline,
    log: &LogFile,
    source: Source,
    rx: &mut broadcast::Receiver<NormalizedEvent>,
    on_event: &mut F,
) -> Result<()>
where
    F: FnMut(NormalizedEvent),
{
    let file = std::fs::File::open(&log.path)
        .with_context(|| format!("Failed to open {}", log.path.display()))?;
    info!(
        session_id = %log.session_id,
        agent_id = ?log.agent_id,
        source = %source,
        "Replaying log"
    );

    pipeline.handle(&ReaderSignal::Discovery(Discovery {
        session_id: log.session_id.clone(),
        agent_id: log.agent_id.clone(),
        project: log.project.clone(),
        source: source.as_str().to_string(),
    }));
    drain(rx, on_event);

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read {}", log.path.display()))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let Ok(mut line) = String::from_utf8(std::mem::take(&mut buf)) else {
            warn!(session_id = %log.session_id, line = line_no, "Skipping line: not UTF-8");
            continue;
        };
        line.truncate(line.trim_end_matches(['\r', '\n']).len());
        pipeline.handle(&ReaderSignal::Line(LineSignal {
            line,
            session_id: log.session_id.clone(),
            agent_id: log.agent_id.clone(),
            source: source.as_str().to_string(),
        }));
        drain(rx, on_event);
    }
    Ok(())
}

fn drain<F>(rx: &mut broadcast::Receiver<NormalizedEvent>, on_event: &mut F)
where
    F: FnMut(NormalizedEvent),
{
    loop {
        match rx.try_recv() {
            Ok(event) => on_event(event),
            Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "Printer fell behind"),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

/// Codex rollouts live under `~/.codex`; everything else is read as Claude Code.
fn guess_source(path: &Path) -> Source {
    let is_codex = path.components().any(|c| c.as_os_str() == ".codex")
        || path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("rollout-"));
    if is_codex {
        Source::Codex
    } else {
        Source::ClaudeCode
    }
}

fn file_name(name: Option<&std::ffi::OsStr>) -> Option<String> {
    name.and_then(|n| n.to_str()).map(String::from)
}

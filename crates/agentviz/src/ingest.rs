//! `agentviz ingest`: reader signals as JSON lines on stdin, events on stdout.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use agentviz_core::{Pipeline, ReaderSignal};
use agentviz_logging::EventPrinter;
use agentviz_sessions::{RegistryConfig, TtlReaper};

pub async fn run(config: RegistryConfig, printer: EventPrinter) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let pipeline = Pipeline::default();
    let printer_task = spawn_printer(&pipeline, printer);

    let reaper = TtlReaper::start(pipeline.registry(), config);
    let result = tokio::select! {
        result = pump(stdin, &pipeline) => result.map(|_| ()),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    };
    reaper.stop().await;

    // Last sender goes with the pipeline, which ends the printer.
    drop(pipeline);
    let _ = printer_task.await;
    result
}

/// Feed every decodable line to the pipeline until EOF. Lines that are
/// not UTF-8 or not a signal are skipped.
pub async fn pump<R>(mut reader: R, pipeline: &Pipeline) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    let mut handled = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .context("Failed to read stdin")?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let Ok(text) = std::str::from_utf8(&buf) else {
            warn!(line = line_no, bytes = buf.len(), "Skipping signal: not UTF-8");
            continue;
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        match ReaderSignal::from_json(text) {
            Ok(signal) => {
                pipeline.handle(&signal);
                handled += 1;
            }
            Err(e) => warn!(line = line_no, "Skipping signal: {}", e),
        }
    }

    debug!(handled, "Input closed");
    Ok(handled)
}

fn spawn_printer(pipeline: &Pipeline, printer: EventPrinter) -> JoinHandle<()> {
    let mut rx = pipeline.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => printer.print(&event),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Printer fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

// Output merge: every zone's fetch tasks feed two process-wide channels; one
// serializer task drains both and writes JSON lines in arrival order.

use crate::models::{EventRecord, MetricRecord};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Write half of the output channels, cloned into every fan-out task.
#[derive(Clone)]
pub struct OutputSenders {
    pub metrics: mpsc::UnboundedSender<MetricRecord>,
    pub events: mpsc::UnboundedSender<EventRecord>,
}

/// Creates the two shared output channels. Unbounded: a stalled consumer
/// grows the backlog rather than dropping records.
pub fn channels() -> (
    OutputSenders,
    mpsc::UnboundedReceiver<MetricRecord>,
    mpsc::UnboundedReceiver<EventRecord>,
) {
    let (metrics_tx, metrics_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    (
        OutputSenders {
            metrics: metrics_tx,
            events: events_tx,
        },
        metrics_rx,
        events_rx,
    )
}

/// Drains both channels concurrently (a backlog on one never blocks the
/// other) and writes one JSON object per line to `out`. Returns only when
/// every sender has been dropped, or with an error on the first
/// serialization/write failure — a broken output stream halts the process.
pub async fn run<W: AsyncWrite + Unpin>(
    mut metrics_rx: mpsc::UnboundedReceiver<MetricRecord>,
    mut events_rx: mpsc::UnboundedReceiver<EventRecord>,
    mut out: W,
) -> anyhow::Result<()> {
    let mut metrics_open = true;
    let mut events_open = true;

    while metrics_open || events_open {
        tokio::select! {
            record = metrics_rx.recv(), if metrics_open => match record {
                Some(record) => write_record(&mut out, &record).await?,
                None => metrics_open = false,
            },
            record = events_rx.recv(), if events_open => match record {
                Some(record) => write_record(&mut out, &record).await?,
                None => events_open = false,
            },
        }
    }
    out.flush().await?;
    Ok(())
}

async fn write_record<W: AsyncWrite + Unpin, T: Serialize>(
    out: &mut W,
    record: &T,
) -> anyhow::Result<()> {
    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    out.flush().await?;
    Ok(())
}

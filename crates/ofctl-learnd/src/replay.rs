//! Replay transport for the daemon binary.
//!
//! Switch events are read as JSON lines, one envelope per line:
//!
//! ```text
//! {"datapath_id":1,"event":{"type":"features","n_buffers":256,"n_tables":254}}
//! {"datapath_id":1,"event":{"type":"packet_in","in_port":1,"buffer_id":7,"data":[...]}}
//! ```
//!
//! Requests the controller sends back are written to a sink as JSON lines
//! of the same shape, with `message` in place of `event`. Blank lines and
//! lines starting with `#` are skipped.

use crate::controller::Controller;
use crate::error::{ControllerError, Result};
use async_trait::async_trait;
use ofctl_switch::{SwitchConnection, SwitchError, SwitchEvent, SwitchMessage, SwitchResult};
use ofctl_types::DatapathId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// One inbound line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub datapath_id: DatapathId,
    pub event: SwitchEvent,
}

/// One outbound line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub datapath_id: DatapathId,
    pub message: SwitchMessage,
}

impl EventEnvelope {
    /// Parses line `line` (1-based, for error reporting).
    pub fn parse(line: usize, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ControllerError::Replay {
            line,
            message: e.to_string(),
        })
    }
}

/// A switch connection that writes every request as a JSON line.
///
/// Several connections may share one sink; each line is written under the
/// sink's lock.
pub struct JsonLinesSwitch<W> {
    datapath_id: DatapathId,
    sink: Arc<Mutex<W>>,
}

impl<W> JsonLinesSwitch<W> {
    pub fn new(datapath_id: DatapathId, sink: Arc<Mutex<W>>) -> Self {
        Self { datapath_id, sink }
    }
}

#[async_trait]
impl<W: Write + Send + 'static> SwitchConnection for JsonLinesSwitch<W> {
    fn datapath_id(&self) -> DatapathId {
        self.datapath_id
    }

    async fn send(&self, message: SwitchMessage) -> SwitchResult<()> {
        let kind = message.kind();
        let envelope = MessageEnvelope {
            datapath_id: self.datapath_id,
            message,
        };
        let line = serde_json::to_string(&envelope)
            .map_err(|e| SwitchError::encode(kind, e.to_string()))?;

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| SwitchError::send(self.datapath_id, kind, "sink lock poisoned"))?;
        writeln!(sink, "{}", line)
            .and_then(|()| sink.flush())
            .map_err(|e| SwitchError::send(self.datapath_id, kind, e.to_string()))
    }
}

/// Counters for one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Events dispatched successfully
    pub dispatched: u64,
    /// Lines that did not parse as an event envelope
    pub invalid: u64,
    /// Events whose handler returned an error
    pub failed: u64,
}

/// Feeds events from `reader` to the controller until end of input or
/// cancellation.
///
/// One connection per datapath id is created on first use through
/// `connect`. Bad lines and handler errors are logged and skipped.
pub async fn replay<R, F>(
    controller: &mut Controller,
    reader: R,
    mut connect: F,
    cancel: CancellationToken,
) -> Result<ReplayStats>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(DatapathId) -> Arc<dyn SwitchConnection>,
{
    let mut switches: HashMap<DatapathId, Arc<dyn SwitchConnection>> = HashMap::new();
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("replay cancelled");
                break;
            }
            next = lines.next_line() => next?,
        };
        let Some(text) = next else {
            break;
        };
        line_no += 1;

        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let envelope = match EventEnvelope::parse(line_no, text) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "skipping event");
                stats.invalid += 1;
                continue;
            }
        };

        let switch = switches
            .entry(envelope.datapath_id)
            .or_insert_with(|| connect(envelope.datapath_id))
            .clone();

        match controller.dispatch(switch, envelope.event).await {
            Ok(()) => stats.dispatched += 1,
            Err(e) => {
                error!(line = line_no, error = %e, "event handling failed");
                stats.failed += 1;
            }
        }
    }

    info!(
        dispatched = stats.dispatched,
        invalid = stats.invalid,
        failed = stats.failed,
        "replay finished"
    );
    Ok(stats)
}

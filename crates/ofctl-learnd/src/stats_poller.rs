//! Port counter polling for host1's port.
//!
//! Polling starts once host1's port is known. Every counters reply replaces
//! the stored snapshot and schedules the next request after the poll
//! interval. The wait runs on a detached timer task so the event loop keeps
//! dispatching while it is pending; the next request is never sent before
//! the previous reply was handled.
//!
//! Requests are not retried. If a re-armed request cannot be sent, the error
//! is logged and polling ends for the rest of the session: no reply arrives
//! to re-arm it, and `start` is a no-op once polling has started.

use chrono::{DateTime, Utc};
use ofctl_switch::api::{PortStats, PortStatsRequest};
use ofctl_switch::{PortStatsReply, SwitchConnection};
use ofctl_types::{DatapathId, PortNo};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// Polling lifecycle. Moves from `Idle` to `Started` once and stays there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Started { port: PortNo },
}

/// Counters of one port from the most recent reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortCounters {
    pub port_no: PortNo,
    pub rx_packets: u64,
    pub tx_packets: u64,
}

impl From<&PortStats> for PortCounters {
    fn from(stats: &PortStats) -> Self {
        Self {
            port_no: stats.port_no,
            rx_packets: stats.rx_packets,
            tx_packets: stats.tx_packets,
        }
    }
}

impl fmt::Display for PortCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.port_no, self.rx_packets, self.tx_packets)
    }
}

/// The records of the last counters reply, in reply order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub datapath_id: Option<DatapathId>,
    pub captured_at: Option<DateTime<Utc>>,
    pub records: Vec<PortCounters>,
}

impl StatsSnapshot {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records formatted as `(port, rx, tx)` tuples.
    pub fn summary(&self) -> String {
        let records: Vec<String> = self.records.iter().map(ToString::to_string).collect();
        format!("[{}]", records.join(", "))
    }
}

/// Drives the request/reply polling loop.
#[derive(Debug)]
pub struct StatsPoller {
    interval: Duration,
    state: PollState,
    snapshot: StatsSnapshot,
    timers: TaskTracker,
    shutdown: CancellationToken,
}

impl StatsPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: PollState::Idle,
            snapshot: StatsSnapshot::default(),
            timers: TaskTracker::new(),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        matches!(self.state, PollState::Started { .. })
    }

    pub fn snapshot(&self) -> &StatsSnapshot {
        &self.snapshot
    }

    /// Sends the first counters request for `port` and starts polling.
    ///
    /// Does nothing once polling has started. The state only changes after
    /// the request was sent, so a failed send is retried by the next call.
    pub async fn start(&mut self, switch: &dyn SwitchConnection, port: PortNo) -> Result<bool> {
        if self.is_started() {
            return Ok(false);
        }

        switch.send(PortStatsRequest::new(port).into()).await?;
        self.state = PollState::Started { port };
        info!(dpid = %switch.datapath_id(), port = %port, "port stats polling started");
        Ok(true)
    }

    /// Records a reply and schedules the next request to the same switch.
    ///
    /// Returns true if a follow-up request was scheduled. Must be called
    /// from within a tokio runtime.
    pub fn on_reply(&mut self, switch: Arc<dyn SwitchConnection>, reply: &PortStatsReply) -> bool {
        let datapath_id = switch.datapath_id();
        self.snapshot = StatsSnapshot {
            datapath_id: Some(datapath_id),
            captured_at: Some(Utc::now()),
            records: reply.stats.iter().map(PortCounters::from).collect(),
        };
        debug!(dpid = %datapath_id, records = %self.snapshot.summary(), "port stats updated");

        let PollState::Started { port } = self.state else {
            warn!(dpid = %datapath_id, "port stats reply received before polling started");
            return false;
        };

        if self.timers.is_closed() {
            debug!(dpid = %datapath_id, "poller shut down, not re-arming");
            return false;
        }

        let interval = self.interval;
        let cancelled = self.shutdown.clone();
        self.timers.spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => {
                    debug!(dpid = %datapath_id, "poll timer cancelled");
                }
                _ = tokio::time::sleep(interval) => {
                    if let Err(e) = switch.send(PortStatsRequest::new(port).into()).await {
                        error!(
                            dpid = %datapath_id,
                            port = %port,
                            error = %e,
                            "failed to send port stats request"
                        );
                    }
                }
            }
        });
        true
    }

    /// Number of poll timers still pending.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Cancels pending timers and waits for them to finish.
    pub async fn shutdown(&self) {
        self.timers.close();
        self.shutdown.cancel();
        self.timers.wait().await;
    }
}

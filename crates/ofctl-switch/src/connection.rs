//! The send side of one switch connection.

use async_trait::async_trait;
use ofctl_types::DatapathId;
use serde::{Deserialize, Serialize};

use crate::api::{FlowMod, PacketOut, PortStatsRequest};
use crate::error::SwitchResult;

/// Any request the controller can send to a switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwitchMessage {
    FlowMod(FlowMod),
    PacketOut(PacketOut),
    PortStatsRequest(PortStatsRequest),
}

impl SwitchMessage {
    /// Short request name used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            SwitchMessage::FlowMod(_) => "flow_mod",
            SwitchMessage::PacketOut(_) => "packet_out",
            SwitchMessage::PortStatsRequest(_) => "port_stats_request",
        }
    }
}

impl From<FlowMod> for SwitchMessage {
    fn from(rule: FlowMod) -> Self {
        SwitchMessage::FlowMod(rule)
    }
}

impl From<PacketOut> for SwitchMessage {
    fn from(packet: PacketOut) -> Self {
        SwitchMessage::PacketOut(packet)
    }
}

impl From<PortStatsRequest> for SwitchMessage {
    fn from(request: PortStatsRequest) -> Self {
        SwitchMessage::PortStatsRequest(request)
    }
}

/// A live connection to one switch, owned by the transport.
///
/// The controller only reads the datapath id and sends requests through it.
/// Implementations must be shareable across tasks: the stats poller keeps a
/// handle to re-arm polling after its delay.
#[async_trait]
pub trait SwitchConnection: Send + Sync {
    /// Identifier of the switch at the other end.
    fn datapath_id(&self) -> DatapathId;

    /// Sends one request. Failures are returned, never retried.
    async fn send(&self, message: SwitchMessage) -> SwitchResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Action, Match};
    use crate::error::SwitchError;
    use crate::types::BufferId;
    use ofctl_types::PortNo;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct Recorder {
        sent: Mutex<Vec<SwitchMessage>>,
        connected: bool,
    }

    #[async_trait]
    impl SwitchConnection for Recorder {
        fn datapath_id(&self) -> DatapathId {
            DatapathId::new(1)
        }

        async fn send(&self, message: SwitchMessage) -> SwitchResult<()> {
            if !self.connected {
                return Err(SwitchError::Disconnected {
                    datapath_id: self.datapath_id(),
                });
            }
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    #[test]
    fn test_message_kind() {
        let rule: SwitchMessage = FlowMod::add(Match::all()).into();
        assert_eq!(rule.kind(), "flow_mod");

        let request: SwitchMessage = PortStatsRequest::new(PortNo::new(1)).into();
        assert_eq!(request.kind(), "port_stats_request");
    }

    #[test]
    fn test_message_is_tagged() {
        let out: SwitchMessage = PacketOut::new(
            BufferId::new(1),
            PortNo::new(2),
            vec![Action::output(PortNo::FLOOD)],
            &[],
        )
        .into();
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["type"], "packet_out");
        assert_eq!(value["in_port"], 2);
    }

    #[tokio::test]
    async fn test_trait_object_send() {
        let conn: Box<dyn SwitchConnection> = Box::new(Recorder {
            sent: Mutex::new(Vec::new()),
            connected: true,
        });
        conn.send(PortStatsRequest::new(PortNo::new(3)).into())
            .await
            .unwrap();

        let closed = Recorder {
            sent: Mutex::new(Vec::new()),
            connected: false,
        };
        let err = closed
            .send(PortStatsRequest::new(PortNo::new(3)).into())
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchError::Disconnected { .. }));
    }
}

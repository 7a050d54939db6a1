//! Switch connection error types.

use ofctl_types::DatapathId;
use thiserror::Error;

/// Error returned when a request cannot be delivered to a switch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwitchError {
    /// The connection to the switch is gone.
    #[error("switch {datapath_id} is disconnected")]
    Disconnected { datapath_id: DatapathId },

    /// The transport failed while writing the request.
    #[error("failed to send {request} to switch {datapath_id}: {message}")]
    Send {
        datapath_id: DatapathId,
        request: &'static str,
        message: String,
    },

    /// The request could not be encoded for the wire.
    #[error("failed to encode {request}: {message}")]
    Encode {
        request: &'static str,
        message: String,
    },
}

impl SwitchError {
    /// Creates a send error for the given request kind.
    pub fn send(
        datapath_id: DatapathId,
        request: &'static str,
        message: impl Into<String>,
    ) -> Self {
        SwitchError::Send {
            datapath_id,
            request,
            message: message.into(),
        }
    }

    /// Creates an encode error for the given request kind.
    pub fn encode(request: &'static str, message: impl Into<String>) -> Self {
        SwitchError::Encode {
            request,
            message: message.into(),
        }
    }

    /// Returns the switch the failure refers to, when known.
    pub fn datapath_id(&self) -> Option<DatapathId> {
        match self {
            SwitchError::Disconnected { datapath_id } | SwitchError::Send { datapath_id, .. } => {
                Some(*datapath_id)
            }
            SwitchError::Encode { .. } => None,
        }
    }
}

/// Result type for switch operations.
pub type SwitchResult<T> = Result<T, SwitchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let err = SwitchError::Disconnected {
            datapath_id: DatapathId::new(1),
        };
        assert_eq!(err.to_string(), "switch 0000000000000001 is disconnected");

        let err = SwitchError::send(DatapathId::new(2), "flow_mod", "broken pipe");
        assert_eq!(
            err.to_string(),
            "failed to send flow_mod to switch 0000000000000002: broken pipe"
        );
    }

    #[test]
    fn test_datapath_id_accessor() {
        let err = SwitchError::send(DatapathId::new(9), "packet_out", "reset");
        assert_eq!(err.datapath_id(), Some(DatapathId::new(9)));
        assert_eq!(SwitchError::encode("packet_out", "too long").datapath_id(), None);
    }
}

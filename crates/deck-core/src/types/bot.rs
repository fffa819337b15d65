//! Bot run state and control acknowledgements.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BotState
// ---------------------------------------------------------------------------

/// Run state reported by the backend.
///
/// The backend reports its run state in German (`"aktiv"` / `"inaktiv"`).
/// The serde renames keep that quirk at the wire boundary; nothing above the
/// decoder sees the raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotState {
    #[serde(rename = "aktiv")]
    Active,
    #[serde(rename = "inaktiv")]
    Inactive,
}

impl BotState {
    /// Whether a start command is meaningful in this state.
    #[inline]
    pub fn can_start(self) -> bool {
        self == BotState::Inactive
    }

    /// Whether a stop command is meaningful in this state.
    #[inline]
    pub fn can_stop(self) -> bool {
        self == BotState::Active
    }
}

impl std::fmt::Display for BotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

// ---------------------------------------------------------------------------
// BotStatus
// ---------------------------------------------------------------------------

/// Payload of the bot-status source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotStatus {
    /// Current run state (wire field `status`).
    #[serde(rename = "status")]
    pub state: BotState,
    /// Status line from the backend, including what is being monitored.
    pub message: String,
}

// ---------------------------------------------------------------------------
// ActionReceipt
// ---------------------------------------------------------------------------

/// Acknowledgement body of the bot start/stop endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReceipt {
    /// Confirmation text, surfaced verbatim to the operator.
    pub message: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::identity::Identity;

/// State-change notification emitted by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    Registered {
        name: String,
        owner: Identity,
        record: String,
        avatar: String,
    },
    Updated {
        name: String,
        record: String,
        avatar: String,
    },
    Withdrawn {
        amount: Amount,
        to: Identity,
    },
}

impl RegistryEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::Registered { .. } => "registered",
            RegistryEvent::Updated { .. } => "updated",
            RegistryEvent::Withdrawn { .. } => "withdrawn",
        }
    }

    /// Name the event concerns, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            RegistryEvent::Registered { name, .. } | RegistryEvent::Updated { name, .. } => {
                Some(name.as_str())
            }
            RegistryEvent::Withdrawn { .. } => None,
        }
    }
}

/// An event with its position in the registry's event sequence.
///
/// Sequence numbers start at 1 and have no gaps, so a consumer that saw
/// sequence `n` can ask for everything after `n` to catch up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub sequence: u64,
    pub emitted_at: DateTime<Utc>,
    pub event: RegistryEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = RegistryEvent::Withdrawn {
            amount: Amount::parse("0.01").unwrap(),
            to: Identity::new("admin").unwrap(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "withdrawn");
        assert_eq!(json["amount"], "0.01");
        assert_eq!(json["to"], "admin");
    }

    #[test]
    fn event_name_accessor() {
        let event = RegistryEvent::Updated {
            name: "dance".into(),
            record: "r".into(),
            avatar: "a".into(),
        };
        assert_eq!(event.name(), Some("dance"));
        assert_eq!(event.kind(), "updated");
    }
}

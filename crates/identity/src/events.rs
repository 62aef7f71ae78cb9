//! Domain events emitted by successful registry mutations.

use serde::{Deserialize, Serialize};
use zonn_types::{ProfileId, WalletAddress};

/// Module name attached to every event.
pub const MODULE_NAME: &str = "identity";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IdentityEvent {
    ProfileCreated {
        profile_id: ProfileId,
        creator: WalletAddress,
    },
    WalletLinked {
        profile_id: ProfileId,
        wallet_address: WalletAddress,
    },
    ProfileUpdated {
        profile_id: ProfileId,
    },
}

impl IdentityEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            IdentityEvent::ProfileCreated { .. } => "ProfileCreated",
            IdentityEvent::WalletLinked { .. } => "WalletLinked",
            IdentityEvent::ProfileUpdated { .. } => "ProfileUpdated",
        }
    }

    pub fn profile_id(&self) -> &ProfileId {
        match self {
            IdentityEvent::ProfileCreated { profile_id, .. }
            | IdentityEvent::WalletLinked { profile_id, .. }
            | IdentityEvent::ProfileUpdated { profile_id } => profile_id,
        }
    }

    /// Flat key/value attributes, ending with the `module` attribute.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("profile_id", self.profile_id().to_string())];
        match self {
            IdentityEvent::ProfileCreated { creator, .. } => {
                attrs.push(("creator", creator.to_string()));
            }
            IdentityEvent::WalletLinked { wallet_address, .. } => {
                attrs.push(("wallet_address", wallet_address.to_string()));
            }
            IdentityEvent::ProfileUpdated { .. } => {}
        }
        attrs.push(("module", MODULE_NAME.to_string()));
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonn_types::ADDRESS_BYTES;

    #[test]
    fn wallet_linked_attributes() {
        let wallet = WalletAddress::from_bytes(&[2u8; ADDRESS_BYTES]);
        let event = IdentityEvent::WalletLinked {
            profile_id: ProfileId::new("p1"),
            wallet_address: wallet.clone(),
        };
        assert_eq!(event.kind(), "WalletLinked");
        assert_eq!(
            event.attributes(),
            vec![
                ("profile_id", "p1".to_string()),
                ("wallet_address", wallet.to_string()),
                ("module", "identity".to_string()),
            ]
        );
    }

    #[test]
    fn updated_event_carries_only_id() {
        let event = IdentityEvent::ProfileUpdated {
            profile_id: ProfileId::new("p2"),
        };
        assert_eq!(event.attributes().len(), 2);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ProfileUpdated");
        assert_eq!(json["profile_id"], "p2");
    }
}

use crate::address::WalletAddress;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque profile identifier.
///
/// Freshly created profiles receive a random UUID v4; identifiers loaded from a
/// genesis snapshot are taken verbatim.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ProfileId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Insertion-ordered, append-only list of addresses linked to a profile.
///
/// Entries are never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkedAddresses(Vec<WalletAddress>);

impl LinkedAddresses {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn push(&mut self, address: WalletAddress) {
        self.0.push(address);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WalletAddress> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[WalletAddress] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a LinkedAddresses {
    type Item = &'a WalletAddress;
    type IntoIter = std::slice::Iter<'a, WalletAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Durable identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: ProfileId,
    /// Address that created the profile; the only address allowed to mutate it.
    pub primary_address: WalletAddress,
    /// Only grows, through [`Profile::link`].
    #[serde(default)]
    linked_addresses: LinkedAddresses,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub metadata_uri: Option<String>,
    /// Seconds since UNIX_EPOCH.
    pub created_at: u64,
    /// Seconds since UNIX_EPOCH, never below `created_at`.
    pub updated_at: u64,
}

impl Profile {
    /// Build a freshly created profile owned by `primary_address`.
    pub fn new(
        profile_id: ProfileId,
        primary_address: WalletAddress,
        username: Option<String>,
        metadata_uri: Option<String>,
        created_at: u64,
    ) -> Self {
        Self {
            profile_id,
            primary_address,
            linked_addresses: LinkedAddresses::new(),
            username,
            metadata_uri,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn linked_addresses(&self) -> &LinkedAddresses {
        &self.linked_addresses
    }

    /// Append `address` to the linked wallets.
    pub fn link(&mut self, address: WalletAddress) {
        self.linked_addresses.push(address);
    }

    pub fn is_owned_by(&self, caller: &WalletAddress) -> bool {
        &self.primary_address == caller
    }

    /// Primary address followed by every linked address, in insertion order.
    pub fn addresses(&self) -> impl Iterator<Item = &WalletAddress> {
        std::iter::once(&self.primary_address).chain(self.linked_addresses.iter())
    }

    /// Record a mutation at `now` without ever moving `updated_at` backwards.
    pub fn touch(&mut self, now: u64) {
        self.updated_at = self.updated_at.max(now);
    }
}

//! Key layout of the identity keyspace.
//!
//! Profiles, the wallet index and the params record share one ordered
//! keyspace and are told apart by prefix.

use zonn_types::{ProfileId, WalletAddress};

pub const PROFILE_KEY_PREFIX: &[u8] = b"Profile/value/";
pub const WALLET_TO_PROFILE_KEY_PREFIX: &[u8] = b"WalletToProfile/value/";
pub const PARAMS_KEY: &[u8] = b"params";

/// Store key holding the profile record for `profile_id`.
pub fn profile_key(profile_id: &ProfileId) -> Vec<u8> {
    prefixed(PROFILE_KEY_PREFIX, profile_id.as_str())
}

/// Store key holding the owning profile id for `address`.
pub fn wallet_to_profile_key(address: &WalletAddress) -> Vec<u8> {
    prefixed(WALLET_TO_PROFILE_KEY_PREFIX, address.as_str())
}

fn prefixed(prefix: &[u8], suffix: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + suffix.len());
    key.extend_from_slice(prefix);
    key.extend_from_slice(suffix.as_bytes());
    key
}

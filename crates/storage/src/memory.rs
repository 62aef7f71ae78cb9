use crate::codec::{decode, decode_profile_id, encode_write};
use crate::keys::{profile_key, wallet_to_profile_key, PARAMS_KEY, PROFILE_KEY_PREFIX};
use crate::{Result, Storage, StoreWrite};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use zonn_types::{Params, Profile, ProfileId, WalletAddress};

/// In-memory backend with the same key order as [`crate::SledStorage`].
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of raw entries across all keyspaces.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_profile(&self, profile_id: &ProfileId) -> Result<Option<Profile>> {
        self.entries
            .read()
            .get(&profile_key(profile_id))
            .map(|v| decode(v))
            .transpose()
    }

    fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.entries
            .read()
            .range(PROFILE_KEY_PREFIX.to_vec()..)
            .take_while(|(k, _)| k.starts_with(PROFILE_KEY_PREFIX))
            .map(|(_, v)| decode::<Profile>(v))
            .collect()
    }

    fn has_profiles(&self) -> Result<bool> {
        Ok(self
            .entries
            .read()
            .range(PROFILE_KEY_PREFIX.to_vec()..)
            .next()
            .is_some_and(|(k, _)| k.starts_with(PROFILE_KEY_PREFIX)))
    }

    fn get_wallet_owner(&self, address: &WalletAddress) -> Result<Option<ProfileId>> {
        let key = wallet_to_profile_key(address);
        self.entries
            .read()
            .get(&key)
            .map(|v| decode_profile_id(&key, v))
            .transpose()
    }

    fn get_params(&self) -> Result<Params> {
        Ok(self
            .entries
            .read()
            .get(PARAMS_KEY)
            .map(|v| decode(v))
            .transpose()?
            .unwrap_or_default())
    }

    fn commit(&self, writes: Vec<StoreWrite>) -> Result<()> {
        // Encode up front so a serialization failure leaves the map untouched.
        let encoded = writes
            .iter()
            .map(encode_write)
            .collect::<Result<Vec<_>>>()?;

        let mut entries = self.entries.write();
        for (key, value) in encoded {
            entries.insert(key, value);
        }
        Ok(())
    }
}

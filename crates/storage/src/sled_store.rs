use crate::codec::{decode, decode_profile_id, encode_write};
use crate::keys::{profile_key, wallet_to_profile_key, PARAMS_KEY, PROFILE_KEY_PREFIX};
use crate::{Result, Storage, StoreWrite};
use sled::{Batch, Db, Tree};
use std::path::Path;
use zonn_types::{Params, Profile, ProfileId, WalletAddress};

const IDENTITY_TREE: &str = "identity";

/// Sled-backed implementation
///
/// Everything lives in a single tree so that one `sled::Batch` covers a
/// profile record and its wallet index entries.
pub struct SledStorage {
    db: Db,
    identity: Tree,
}

impl SledStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path.as_ref())?;
        let storage = Self::from_db(db)?;
        tracing::info!(path = %path.as_ref().display(), "Opened identity store");
        Ok(storage)
    }

    /// Open a throwaway database that is removed when dropped.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self> {
        let identity = db.open_tree(IDENTITY_TREE)?;
        Ok(Self { db, identity })
    }
}

impl Storage for SledStorage {
    fn get_profile(&self, profile_id: &ProfileId) -> Result<Option<Profile>> {
        self.identity
            .get(profile_key(profile_id))?
            .map(|v| decode(&v))
            .transpose()
    }

    fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.identity
            .scan_prefix(PROFILE_KEY_PREFIX)
            .map(|entry| {
                let (_, v) = entry?;
                decode::<Profile>(&v)
            })
            .collect()
    }

    fn has_profiles(&self) -> Result<bool> {
        Ok(self
            .identity
            .scan_prefix(PROFILE_KEY_PREFIX)
            .next()
            .transpose()?
            .is_some())
    }

    fn get_wallet_owner(&self, address: &WalletAddress) -> Result<Option<ProfileId>> {
        let key = wallet_to_profile_key(address);
        self.identity
            .get(&key)?
            .map(|v| decode_profile_id(&key, &v))
            .transpose()
    }

    fn get_params(&self) -> Result<Params> {
        Ok(self
            .identity
            .get(PARAMS_KEY)?
            .map(|v| decode(&v))
            .transpose()?
            .unwrap_or_default())
    }

    fn commit(&self, writes: Vec<StoreWrite>) -> Result<()> {
        let mut batch = Batch::default();
        for write in &writes {
            let (key, value) = encode_write(write)?;
            batch.insert(key, value);
        }
        self.identity.apply_batch(batch)?;
        tracing::debug!(writes = writes.len(), "Committed identity batch");
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

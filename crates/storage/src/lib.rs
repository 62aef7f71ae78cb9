//! Persistence for the Zonn identity registry.
//!
//! A [`Storage`] backend keeps profile records and the wallet index in one
//! ordered keyspace (see [`keys`]). Writes are submitted as batches of
//! [`StoreWrite`] that land atomically, so a profile record and its index
//! entries are never observed half-written.

pub mod keys;

mod codec;
mod memory;
mod sled_store;

pub use memory::MemoryStorage;
pub use sled_store::SledStorage;

use zonn_types::{Params, Profile, ProfileId, WalletAddress};

/// Storage errors
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Wallet index entry {key} does not hold a valid profile id")]
    CorruptIndex { key: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A single write in an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    /// Insert or overwrite a profile record under its id.
    Profile(Profile),
    /// Point `address` at `profile_id` in the wallet index.
    WalletIndex {
        address: WalletAddress,
        profile_id: ProfileId,
    },
    /// Replace the persisted registry parameters.
    Params(Params),
}

/// Abstract storage trait
///
/// Backends perform no validation; the registry engine is responsible for
/// every invariant.
pub trait Storage: Send + Sync {
    fn get_profile(&self, profile_id: &ProfileId) -> Result<Option<Profile>>;

    /// All profiles in key order.
    fn list_profiles(&self) -> Result<Vec<Profile>>;

    /// Whether any profile record exists, without decoding one.
    fn has_profiles(&self) -> Result<bool>;

    /// Resolve an address through the wallet index.
    fn get_wallet_owner(&self, address: &WalletAddress) -> Result<Option<ProfileId>>;

    /// Persisted params, or the compiled-in defaults if none were stored.
    fn get_params(&self) -> Result<Params>;

    /// Apply every write or none of them.
    fn commit(&self, writes: Vec<StoreWrite>) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn put_profile(&self, profile: Profile) -> Result<()> {
        self.commit(vec![StoreWrite::Profile(profile)])
    }

    fn put_wallet_index(&self, address: WalletAddress, profile_id: ProfileId) -> Result<()> {
        self.commit(vec![StoreWrite::WalletIndex {
            address,
            profile_id,
        }])
    }

    fn set_params(&self, params: Params) -> Result<()> {
        self.commit(vec![StoreWrite::Params(params)])
    }
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get_profile(&self, profile_id: &ProfileId) -> Result<Option<Profile>> {
        (**self).get_profile(profile_id)
    }

    fn list_profiles(&self) -> Result<Vec<Profile>> {
        (**self).list_profiles()
    }

    fn has_profiles(&self) -> Result<bool> {
        (**self).has_profiles()
    }

    fn get_wallet_owner(&self, address: &WalletAddress) -> Result<Option<ProfileId>> {
        (**self).get_wallet_owner(address)
    }

    fn get_params(&self) -> Result<Params> {
        (**self).get_params()
    }

    fn commit(&self, writes: Vec<StoreWrite>) -> Result<()> {
        (**self).commit(writes)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }
}

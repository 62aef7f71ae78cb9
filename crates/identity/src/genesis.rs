//! Genesis import/export for the identity registry.

use crate::errors::*;
use crate::registry::IdentityRegistry;
use tracing::info;
use zonn_storage::{Storage, StoreWrite};
use zonn_types::GenesisState;

impl<S: Storage> IdentityRegistry<S> {
    /// Load a snapshot: every profile, its wallet index entries, then params.
    ///
    /// The snapshot is trusted: ownership and uniqueness are not rechecked, so
    /// untrusted input should go through [`GenesisState::validate`] first.
    /// All writes land in one atomic batch.
    pub fn init_genesis(&self, genesis: GenesisState) -> Result<()> {
        let GenesisState { profiles, params } = genesis;
        params
            .validate()
            .map_err(|e| IdentityError::InvalidArgument(e.to_string()))?;

        let profile_count = profiles.len();
        let mut writes = Vec::new();
        for profile in profiles {
            for address in profile.addresses() {
                writes.push(StoreWrite::WalletIndex {
                    address: address.clone(),
                    profile_id: profile.profile_id.clone(),
                });
            }
            writes.push(StoreWrite::Profile(profile));
        }
        writes.push(StoreWrite::Params(params));

        let _guard = self.write_lock.lock();
        self.storage.commit(writes)?;
        info!(profiles = profile_count, "Identity genesis imported");
        Ok(())
    }

    /// Snapshot every profile (store key order) together with the params.
    pub fn export_genesis(&self) -> Result<GenesisState> {
        let _guard = self.write_lock.lock();
        let profiles = self.storage.list_profiles()?;
        let params = self.storage.get_params()?;
        info!(profiles = profiles.len(), "Identity genesis exported");
        Ok(GenesisState { profiles, params })
    }
}

use crate::address::WalletAddress;
use crate::params::{Params, ParamsError};
use crate::profile::{Profile, ProfileId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Full registry snapshot consumed at start-up and produced at shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub params: Params,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenesisError {
    #[error("invalid params: {0}")]
    Params(#[from] ParamsError),
    #[error("duplicate profile id {0}")]
    DuplicateProfileId(ProfileId),
    #[error("address {address} is claimed by more than one profile entry")]
    DuplicateAddress { address: WalletAddress },
    #[error("profile {0} was updated before it was created")]
    TimestampOrder(ProfileId),
}

impl GenesisState {
    pub fn new(profiles: Vec<Profile>, params: Params) -> Self {
        Self { profiles, params }
    }

    /// Check that the snapshot satisfies the registry invariants.
    ///
    /// Importing does not call this; hosts run it on untrusted files first.
    pub fn validate(&self) -> Result<(), GenesisError> {
        self.params.validate()?;

        let mut ids = HashSet::with_capacity(self.profiles.len());
        let mut addresses = HashSet::new();
        for profile in &self.profiles {
            if !ids.insert(&profile.profile_id) {
                return Err(GenesisError::DuplicateProfileId(profile.profile_id.clone()));
            }
            if profile.updated_at < profile.created_at {
                return Err(GenesisError::TimestampOrder(profile.profile_id.clone()));
            }
            for address in profile.addresses() {
                if !addresses.insert(address) {
                    return Err(GenesisError::DuplicateAddress {
                        address: address.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

//! Identity registry engine
//!
//! Maps wallet addresses to profiles and enforces the registry invariants:
//! one profile per address, owner-only mutation, append-only linked wallets
//! and non-decreasing `updated_at`.

use crate::context::ExecutionContext;
use crate::errors::*;
use crate::events::IdentityEvent;
use parking_lot::Mutex;
use tracing::info;
use zonn_storage::{Storage, StoreWrite};
use zonn_types::{Params, Profile, ProfileId, WalletAddress};

/// Identity registry over a [`Storage`] backend.
///
/// Mutations are serialized through a single writer lock that is held from
/// the first existence check until the batch is committed. Reads go straight
/// to storage and never take the lock.
pub struct IdentityRegistry<S: Storage> {
    pub(crate) storage: S,
    pub(crate) write_lock: Mutex<()>,
}

impl<S: Storage> IdentityRegistry<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Create a profile owned by the caller and return its new id.
    ///
    /// Empty `username`/`metadata_uri` mean "not set"; a missing metadata URI
    /// falls back to `Params::default_metadata_uri`.
    pub fn create_profile(
        &self,
        ctx: &dyn ExecutionContext,
        username: &str,
        metadata_uri: &str,
    ) -> Result<ProfileId> {
        let creator = parse_address(ctx.caller())?;

        let _guard = self.write_lock.lock();

        if self.storage.get_wallet_owner(&creator)?.is_some() {
            return Err(IdentityError::ProfileExists { address: creator });
        }

        let params = self.storage.get_params()?;
        let username = non_empty(username);
        if let Some(name) = &username {
            check_username(&params, name)?;
        }
        let metadata_uri =
            non_empty(metadata_uri).or_else(|| non_empty(&params.default_metadata_uri));

        let profile_id = self.fresh_profile_id()?;
        let profile = Profile::new(
            profile_id.clone(),
            creator.clone(),
            username,
            metadata_uri,
            ctx.now(),
        );

        self.storage.commit(vec![
            StoreWrite::Profile(profile),
            StoreWrite::WalletIndex {
                address: creator.clone(),
                profile_id: profile_id.clone(),
            },
        ])?;

        info!(profile_id = %profile_id, creator = %creator, "Profile created");
        ctx.emit(IdentityEvent::ProfileCreated {
            profile_id: profile_id.clone(),
            creator,
        });
        Ok(profile_id)
    }

    /// Link `wallet_address` to a profile owned by the caller.
    pub fn link_wallet(
        &self,
        ctx: &dyn ExecutionContext,
        profile_id: &ProfileId,
        wallet_address: &str,
    ) -> Result<()> {
        let caller = parse_address(ctx.caller())?;
        let wallet = parse_address(wallet_address)?;

        let _guard = self.write_lock.lock();

        let mut profile = self.owned_profile(&caller, profile_id)?;

        if self.storage.get_wallet_owner(&wallet)?.is_some() {
            return Err(IdentityError::WalletAlreadyLinked { address: wallet });
        }

        profile.link(wallet.clone());
        profile.touch(ctx.now());

        self.storage.commit(vec![
            StoreWrite::Profile(profile),
            StoreWrite::WalletIndex {
                address: wallet.clone(),
                profile_id: profile_id.clone(),
            },
        ])?;

        info!(profile_id = %profile_id, wallet = %wallet, "Wallet linked");
        ctx.emit(IdentityEvent::WalletLinked {
            profile_id: profile_id.clone(),
            wallet_address: wallet,
        });
        Ok(())
    }

    /// Partially update a profile owned by the caller.
    ///
    /// Fields that are `None` or empty are left unchanged.
    pub fn update_profile(
        &self,
        ctx: &dyn ExecutionContext,
        profile_id: &ProfileId,
        username: Option<&str>,
        metadata_uri: Option<&str>,
    ) -> Result<()> {
        let caller = parse_address(ctx.caller())?;

        let _guard = self.write_lock.lock();

        let mut profile = self.owned_profile(&caller, profile_id)?;

        if let Some(name) = username.and_then(non_empty) {
            check_username(&self.storage.get_params()?, &name)?;
            profile.username = Some(name);
        }
        if let Some(uri) = metadata_uri.and_then(non_empty) {
            profile.metadata_uri = Some(uri);
        }
        profile.touch(ctx.now());

        self.storage.put_profile(profile)?;

        info!(profile_id = %profile_id, "Profile updated");
        ctx.emit(IdentityEvent::ProfileUpdated {
            profile_id: profile_id.clone(),
        });
        Ok(())
    }

    /// Fetch a profile by id.
    pub fn get_profile(&self, profile_id: &ProfileId) -> Result<Profile> {
        self.storage
            .get_profile(profile_id)?
            .ok_or_else(|| IdentityError::ProfileNotFound {
                profile_id: profile_id.clone(),
            })
    }

    /// Fetch the profile that owns `address`, as primary or linked wallet.
    pub fn get_profile_by_wallet(&self, address: &str) -> Result<Profile> {
        let address = parse_address(address)?;
        let profile_id = self
            .storage
            .get_wallet_owner(&address)?
            .ok_or(IdentityError::WalletNotFound { address })?;
        self.get_profile(&profile_id)
    }

    /// Every profile, in store key order.
    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.storage.list_profiles()?)
    }

    /// Whether the registry holds any profile.
    pub fn has_profiles(&self) -> Result<bool> {
        Ok(self.storage.has_profiles()?)
    }

    pub fn get_params(&self) -> Result<Params> {
        Ok(self.storage.get_params()?)
    }

    pub fn set_params(&self, params: Params) -> Result<()> {
        params
            .validate()
            .map_err(|e| IdentityError::InvalidArgument(e.to_string()))?;

        let _guard = self.write_lock.lock();
        self.storage.set_params(params.clone())?;
        info!(
            max_username_length = params.max_username_length,
            default_metadata_uri = %params.default_metadata_uri,
            "Identity params set"
        );
        Ok(())
    }

    /// Load `profile_id` and check that `caller` is its primary address.
    fn owned_profile(&self, caller: &WalletAddress, profile_id: &ProfileId) -> Result<Profile> {
        let profile = self.get_profile(profile_id)?;
        if !profile.is_owned_by(caller) {
            return Err(IdentityError::Unauthorized {
                caller: caller.clone(),
                profile_id: profile_id.clone(),
            });
        }
        Ok(profile)
    }

    fn fresh_profile_id(&self) -> Result<ProfileId> {
        loop {
            let candidate = ProfileId::generate();
            if self.storage.get_profile(&candidate)?.is_none() {
                return Ok(candidate);
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn check_username(params: &Params, username: &str) -> Result<()> {
    if params.allows_username(username) {
        Ok(())
    } else {
        Err(IdentityError::InvalidArgument(format!(
            "username exceeds max length of {} characters",
            params.max_username_length
        )))
    }
}

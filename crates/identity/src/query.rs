//! Read-only query surface with request/response wrappers.
//!
//! A `None` request is rejected with `InvalidArgument`, so transports that
//! decode an absent body can hand it straight through.

use crate::errors::*;
use crate::registry::IdentityRegistry;
use serde::{Deserialize, Serialize};
use zonn_storage::Storage;
use zonn_types::{Profile, ProfileId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProfileRequest {
    pub profile_id: ProfileId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProfileResponse {
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProfileByWalletRequest {
    pub wallet_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProfileByWalletResponse {
    pub profile: Profile,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProfilesRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryProfilesResponse {
    pub profiles: Vec<Profile>,
}

fn require<T>(req: Option<T>) -> Result<T> {
    req.ok_or_else(|| IdentityError::InvalidArgument("invalid request".to_string()))
}

impl<S: Storage> IdentityRegistry<S> {
    pub fn query_profile(
        &self,
        req: Option<&QueryProfileRequest>,
    ) -> Result<QueryProfileResponse> {
        let req = require(req)?;
        let profile = self.get_profile(&req.profile_id)?;
        Ok(QueryProfileResponse { profile })
    }

    pub fn query_profile_by_wallet(
        &self,
        req: Option<&QueryProfileByWalletRequest>,
    ) -> Result<QueryProfileByWalletResponse> {
        let req = require(req)?;
        let profile = self.get_profile_by_wallet(&req.wallet_address)?;
        Ok(QueryProfileByWalletResponse { profile })
    }

    pub fn query_profiles(
        &self,
        req: Option<&QueryProfilesRequest>,
    ) -> Result<QueryProfilesResponse> {
        require(req)?;
        let profiles = self.list_profiles()?;
        Ok(QueryProfilesResponse { profiles })
    }
}

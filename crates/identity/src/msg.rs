//! Message layer: the mutating operations as serializable payloads.

use crate::context::ExecutionContext;
use crate::errors::*;
use crate::registry::IdentityRegistry;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zonn_storage::Storage;
use zonn_types::ProfileId;

/// A mutating registry operation. The signer is supplied by the
/// [`ExecutionContext`], not by the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityMsg {
    CreateProfile {
        #[serde(default)]
        username: String,
        #[serde(default)]
        metadata_uri: String,
    },
    LinkWallet {
        profile_id: ProfileId,
        wallet_address: String,
    },
    UpdateProfile {
        profile_id: ProfileId,
        #[serde(default)]
        username: Option<String>,
        #[serde(default)]
        metadata_uri: Option<String>,
    },
}

impl IdentityMsg {
    pub fn name(&self) -> &'static str {
        match self {
            IdentityMsg::CreateProfile { .. } => "create_profile",
            IdentityMsg::LinkWallet { .. } => "link_wallet",
            IdentityMsg::UpdateProfile { .. } => "update_profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MsgResponse {
    CreateProfile { profile_id: ProfileId },
    LinkWallet,
    UpdateProfile,
}

impl<S: Storage> IdentityRegistry<S> {
    /// Dispatch a message to the matching registry operation.
    pub fn apply(&self, ctx: &dyn ExecutionContext, msg: &IdentityMsg) -> Result<MsgResponse> {
        let result = match msg {
            IdentityMsg::CreateProfile {
                username,
                metadata_uri,
            } => self
                .create_profile(ctx, username, metadata_uri)
                .map(|profile_id| MsgResponse::CreateProfile { profile_id }),
            IdentityMsg::LinkWallet {
                profile_id,
                wallet_address,
            } => self
                .link_wallet(ctx, profile_id, wallet_address)
                .map(|_| MsgResponse::LinkWallet),
            IdentityMsg::UpdateProfile {
                profile_id,
                username,
                metadata_uri,
            } => self
                .update_profile(
                    ctx,
                    profile_id,
                    username.as_deref(),
                    metadata_uri.as_deref(),
                )
                .map(|_| MsgResponse::UpdateProfile),
        };

        if let Err(err) = &result {
            debug!(
                msg = msg.name(),
                caller = ctx.caller(),
                kind = ?err.kind(),
                error = %err,
                "Identity message rejected"
            );
        }
        result
    }
}

//! Error types for the identity registry

use thiserror::Error;
use zonn_storage::StorageError;
use zonn_types::{AddressError, ProfileId, WalletAddress};

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Invalid address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Profile already exists for address {address}")]
    ProfileExists { address: WalletAddress },

    #[error("Wallet {address} is already linked to a profile")]
    WalletAlreadyLinked { address: WalletAddress },

    #[error("Profile not found: {profile_id}")]
    ProfileNotFound { profile_id: ProfileId },

    #[error("No profile resolves from wallet {address}")]
    WalletNotFound { address: WalletAddress },

    #[error("Unauthorized: {caller} is not the owner of profile {profile_id}")]
    Unauthorized {
        caller: WalletAddress,
        profile_id: ProfileId,
    },

    #[error("Registry storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Coarse classification of [`IdentityError`] for callers deciding how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidAddress,
    InvalidArgument,
    AlreadyExists,
    NotFound,
    Unauthorized,
    Internal,
}

impl IdentityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidAddress { .. } => ErrorKind::InvalidAddress,
            IdentityError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            IdentityError::ProfileExists { .. } | IdentityError::WalletAlreadyLinked { .. } => {
                ErrorKind::AlreadyExists
            }
            IdentityError::ProfileNotFound { .. } | IdentityError::WalletNotFound { .. } => {
                ErrorKind::NotFound
            }
            IdentityError::Unauthorized { .. } => ErrorKind::Unauthorized,
            IdentityError::Storage(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid_address(address: &str, source: AddressError) -> Self {
        IdentityError::InvalidAddress {
            address: address.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;

/// Parse a caller-supplied address, mapping failures to [`IdentityError::InvalidAddress`].
pub fn parse_address(address: &str) -> Result<WalletAddress> {
    WalletAddress::parse(address).map_err(|e| IdentityError::invalid_address(address, e))
}

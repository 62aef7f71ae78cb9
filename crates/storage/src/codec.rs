//! Record encoding shared by every backend.

use crate::keys::{profile_key, wallet_to_profile_key, PARAMS_KEY};
use crate::{Result, StorageError, StoreWrite};
use serde::de::DeserializeOwned;
use serde::Serialize;
use zonn_types::ProfileId;

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Wallet index values are the raw profile id bytes.
pub(crate) fn decode_profile_id(key: &[u8], bytes: &[u8]) -> Result<ProfileId> {
    std::str::from_utf8(bytes)
        .map(ProfileId::from)
        .map_err(|_| StorageError::CorruptIndex {
            key: String::from_utf8_lossy(key).into_owned(),
        })
}

/// Resolve a write into its raw `(key, value)` pair.
pub(crate) fn encode_write(write: &StoreWrite) -> Result<(Vec<u8>, Vec<u8>)> {
    match write {
        StoreWrite::Profile(profile) => Ok((profile_key(&profile.profile_id), encode(profile)?)),
        StoreWrite::WalletIndex {
            address,
            profile_id,
        } => Ok((
            wallet_to_profile_key(address),
            profile_id.as_str().as_bytes().to_vec(),
        )),
        StoreWrite::Params(params) => Ok((PARAMS_KEY.to_vec(), encode(params)?)),
    }
}

//! Zonn identity data model.
//!
//! Shared by the storage backends and the registry engine: wallet addresses,
//! profile records, registry parameters and the genesis snapshot shape.

pub mod address;
pub mod genesis;
pub mod params;
pub mod profile;

pub use address::*;
pub use genesis::*;
pub use params::*;
pub use profile::*;

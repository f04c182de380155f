//! # Data Model
//!
//! Byte-level building blocks shared by transactions and blocks: entity
//! headers, derived identifiers, addresses and mosaic properties.

pub mod address;
pub mod block;
pub mod entity;
pub mod ids;
pub mod mosaic;

pub use address::{Address, AddressError};
pub use block::{Block, BlockError, PreviousBlockContext, TransactionRecord, TransactionRecords};
pub use entity::{EntityError, EntityView};
pub use ids::{
    generate_mosaic_id, generate_namespace_id, generate_namespace_path, IdError, MosaicId,
    MosaicNonce, NamespaceId, UnresolvedMosaicId,
};
pub use mosaic::{MosaicFlags, MosaicProperties};

//! Errors raised while building, extending or finalizing a nemesis block.
//!
//! Every variant is fatal: nemesis generation either produces a complete
//! block or nothing.

use thiserror::Error;

use crate::crypto::keys::{KeyError, NovaPublicKey};
use crate::model::address::AddressError;
use crate::model::block::BlockError;
use crate::model::entity::EntityError;
use crate::model::ids::IdError;
use crate::transaction::builder::BuilderError;

/// The nemesis block's lifecycle stages, see [`super::NemesisBlock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockStage {
    Assembled,
    ProvisionallySigned,
    Finalized,
}

impl std::fmt::Display for BlockStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Assembled => "assembled",
            Self::ProvisionallySigned => "provisionally signed",
            Self::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum NemesisError {
    #[error("invalid payload hex: {0}")]
    InvalidPayloadHex(String),

    #[error("unknown namespace '{0}'")]
    UnknownNamespace(String),

    #[error("unknown mosaic '{0}'")]
    UnknownMosaic(String),

    #[error("a nemesis block needs at least one transaction")]
    EmptyTransactions,

    #[error("block size overflow while {0}")]
    SizeOverflow(&'static str),

    #[error(transparent)]
    MalformedBlock(#[from] BlockError),

    #[error("cannot {action} a block that is {stage}")]
    InvalidStage {
        action: &'static str,
        stage: BlockStage,
    },

    #[error("block signature does not verify against its signer")]
    InvalidSignature,

    #[error("block is signed by {actual}, expected {expected}")]
    UnexpectedSigner {
        expected: NovaPublicKey,
        actual: NovaPublicKey,
    },

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Builder(#[from] BuilderError),
}

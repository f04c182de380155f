//! Mosaic definition properties.

use serde::{Deserialize, Serialize};

use crate::config::ETERNAL_ARTIFACT_DURATION;

/// Behaviour switches of a mosaic, packed into one byte on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MosaicFlags {
    /// Owner may change supply after creation.
    pub supply_mutable: bool,
    /// Holders may transfer to accounts other than the owner.
    pub transferable: bool,
    /// Owner may attach account restrictions.
    pub restrictable: bool,
}

impl MosaicFlags {
    const SUPPLY_MUTABLE: u8 = 0x01;
    const TRANSFERABLE: u8 = 0x02;
    const RESTRICTABLE: u8 = 0x04;

    /// Wire representation.
    pub fn to_byte(self) -> u8 {
        let mut byte = 0;
        if self.supply_mutable {
            byte |= Self::SUPPLY_MUTABLE;
        }
        if self.transferable {
            byte |= Self::TRANSFERABLE;
        }
        if self.restrictable {
            byte |= Self::RESTRICTABLE;
        }
        byte
    }

    pub fn from_byte(byte: u8) -> Self {
        Self {
            supply_mutable: byte & Self::SUPPLY_MUTABLE != 0,
            transferable: byte & Self::TRANSFERABLE != 0,
            restrictable: byte & Self::RESTRICTABLE != 0,
        }
    }
}

/// Everything a mosaic definition transaction carries besides its id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicProperties {
    pub flags: MosaicFlags,
    /// Number of decimal places (0-6).
    pub divisibility: u8,
    /// Lifetime in blocks; [`ETERNAL_ARTIFACT_DURATION`] never expires.
    pub duration: u64,
}

impl Default for MosaicProperties {
    fn default() -> Self {
        Self {
            flags: MosaicFlags::default(),
            divisibility: 0,
            duration: ETERNAL_ARTIFACT_DURATION,
        }
    }
}

//! Configuration layer selector.

use std::ops::BitOr;

/// Bitmask over the receiver's persistence layers.
///
/// Writes need at least one concrete layer bit. [`Layer::DEFAULT`] shares
/// its bits with [`Layer::ALL`]; it selects receiver defaults only when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layer(u8);

impl Layer {
    /// Volatile working memory.
    pub const RAM: Layer = Layer(1 << 0);
    /// Battery-backed RAM.
    pub const BBR: Layer = Layer(1 << 1);
    /// Non-volatile flash.
    pub const FLASH: Layer = Layer(1 << 2);
    /// Working memory and battery-backed RAM.
    pub const RAM_BBR: Layer = Layer(Self::RAM.0 | Self::BBR.0);
    /// Every layer.
    pub const ALL: Layer = Layer(Self::RAM.0 | Self::BBR.0 | Self::FLASH.0);
    /// Receiver defaults (read only).
    pub const DEFAULT: Layer = Layer(0x07);

    const CONCRETE_MASK: u8 = 0x07;

    /// Wrap a raw bitmask.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bitmask.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Check if every bit of `other` is set.
    #[inline]
    pub fn contains(self, other: Layer) -> bool {
        self.0 & other.0 == other.0
    }

    /// Check if this selector may be used for a write.
    ///
    /// Needs at least one concrete layer bit and no bits outside them.
    #[inline]
    pub fn is_writable(self) -> bool {
        self.0 & Self::CONCRETE_MASK != 0 && self.0 & !Self::CONCRETE_MASK == 0
    }

    /// Single-layer index used by CFG-VALGET (RAM 0, BBR 1, Flash 2, Default 7).
    ///
    /// Only `RAM`, `BBR`, `FLASH` and `DEFAULT` can be read; combinations
    /// of layers return `None`.
    pub fn read_index(self) -> Option<u8> {
        match self {
            Layer::RAM => Some(0),
            Layer::BBR => Some(1),
            Layer::FLASH => Some(2),
            Layer::DEFAULT => Some(7),
            _ => None,
        }
    }
}

impl Default for Layer {
    fn default() -> Self {
        Layer::RAM_BBR
    }
}

impl BitOr for Layer {
    type Output = Layer;

    fn bitor(self, rhs: Layer) -> Layer {
        Layer(self.0 | rhs.0)
    }
}

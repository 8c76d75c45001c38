//! Configuration keys.
//!
//! A key is a 32-bit item id. Bits the receiver reserves (mask
//! `0x0F00F000`) may carry a width marker so the value width can be checked
//! locally; the marker is masked off before the key goes on the wire.

/// Bits reserved by the receiver, used here for the width marker.
pub const UBX_CFG_SIZE_MASK: u32 = 0x0F00_F000;

/// Width marker: unsigned 8-bit value.
pub const UBX_CFG_U1: u32 = 0x0100_2000;

/// Width marker: unsigned 16-bit value.
pub const UBX_CFG_U2: u32 = 0x0100_3000;

/// Width marker: 8-bit enumeration.
pub const UBX_CFG_E1: u32 = 0x0100_C000;

/// CFG-RATE-MEAS: nominal time between GNSS measurements (ms).
pub const CFG_RATE_MEAS: ConfigKey = ConfigKey(UBX_CFG_U2 | 0x3021_0001);
/// CFG-RATE-NAV: measurements per navigation solution.
pub const CFG_RATE_NAV: ConfigKey = ConfigKey(UBX_CFG_U2 | 0x3021_0002);
/// CFG-RATE-TIMEREF: time system measurements are aligned to.
pub const CFG_RATE_TIMEREF: ConfigKey = ConfigKey(UBX_CFG_E1 | 0x2021_0003);
/// CFG-RATE-NAV_PRIO: output rate of priority navigation messages.
pub const CFG_RATE_NAV_PRIO: ConfigKey = ConfigKey(UBX_CFG_U1 | 0x2021_0004);

/// CFG-MSGOUT-UBX_NAV_PVT_I2C: NAV-PVT output rate on I2C.
pub const CFG_MSGOUT_UBX_NAV_PVT_I2C: ConfigKey = ConfigKey(UBX_CFG_U1 | 0x2091_0006);
/// CFG-MSGOUT-UBX_NAV_PVT_UART1: NAV-PVT output rate on UART1.
pub const CFG_MSGOUT_UBX_NAV_PVT_UART1: ConfigKey = ConfigKey(UBX_CFG_U1 | 0x2091_0007);
/// CFG-MSGOUT-UBX_NAV_PVT_SPI: NAV-PVT output rate on SPI.
pub const CFG_MSGOUT_UBX_NAV_PVT_SPI: ConfigKey = ConfigKey(UBX_CFG_U1 | 0x2091_000A);

/// Width class carried by a key's marker bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    /// 1-byte unsigned.
    U1,
    /// 2-byte unsigned.
    U2,
    /// 1-byte enumeration.
    E1,
}

impl WidthClass {
    /// Storage width in bytes.
    #[inline]
    pub fn width(self) -> usize {
        match self {
            WidthClass::U1 | WidthClass::E1 => 1,
            WidthClass::U2 => 2,
        }
    }

    fn from_marker(marker: u32) -> Option<Self> {
        match marker {
            UBX_CFG_U1 => Some(WidthClass::U1),
            UBX_CFG_U2 => Some(WidthClass::U2),
            UBX_CFG_E1 => Some(WidthClass::E1),
            _ => None,
        }
    }
}

/// A 32-bit configuration key.
///
/// # Example
///
/// ```
/// use ubxwire::config::{ConfigKey, WidthClass, CFG_RATE_MEAS};
///
/// assert_eq!(CFG_RATE_MEAS.width_class(), Some(WidthClass::U2));
/// assert_eq!(CFG_RATE_MEAS.value_width(), Some(2));
/// assert_eq!(CFG_RATE_MEAS.wire_id(), 0x3021_0001);
///
/// // Unmarked keys fall back to the receiver's size field.
/// assert_eq!(ConfigKey::new(0x4005_0001).value_width(), Some(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigKey(pub u32);

impl ConfigKey {
    /// Wrap a raw key value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value including any width marker.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Item id as sent to the receiver (marker bits cleared).
    #[inline]
    pub fn wire_id(self) -> u32 {
        self.0 & !UBX_CFG_SIZE_MASK
    }

    /// Width class from the marker bits, if a known marker is present.
    pub fn width_class(self) -> Option<WidthClass> {
        WidthClass::from_marker(self.0 & UBX_CFG_SIZE_MASK)
    }

    /// Value width from the receiver's size field (bits 28..=30), if set.
    pub fn size_field_width(self) -> Option<usize> {
        match (self.0 >> 28) & 0x07 {
            1 | 2 => Some(1),
            3 => Some(2),
            4 => Some(4),
            5 => Some(8),
            _ => None,
        }
    }

    /// Storage width of this key's value, or `None` if it cannot be derived.
    ///
    /// A marker that disagrees with the size field makes the key invalid.
    pub fn value_width(self) -> Option<usize> {
        let marker = self.0 & UBX_CFG_SIZE_MASK;
        let size = self.size_field_width();
        if marker == 0 {
            return size;
        }
        let class = self.width_class()?;
        match size {
            Some(width) if width != class.width() => None,
            _ => Some(class.width()),
        }
    }

    /// Check if a value of `width` bytes may be written to this key.
    #[inline]
    pub fn accepts_width(self, width: usize) -> bool {
        self.value_width() == Some(width)
    }
}

impl From<u32> for ConfigKey {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

//! UBX-NAV-PVT accessor.
//!
//! Decodes the fixed-offset fields of a navigation solution. Callers must
//! only hand in payloads from a [`Packet`](crate::protocol::Packet) whose
//! checksum and class/id match are both positive.

use bytes::Buf;
use serde::Serialize;

/// NAV-PVT payload length.
pub const NAV_PVT_LEN: usize = 92;

/// GNSS fix type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixType {
    /// No position fix.
    NoFix,
    /// Dead reckoning only.
    DeadReckoning,
    /// 2D fix.
    Fix2d,
    /// 3D fix.
    Fix3d,
    /// GNSS combined with dead reckoning.
    GnssDeadReckoning,
    /// Time-only fix.
    TimeOnly,
    /// Value not defined by the receiver interface.
    Unknown(u8),
}

impl From<u8> for FixType {
    fn from(value: u8) -> Self {
        match value {
            0 => FixType::NoFix,
            1 => FixType::DeadReckoning,
            2 => FixType::Fix2d,
            3 => FixType::Fix3d,
            4 => FixType::GnssDeadReckoning,
            5 => FixType::TimeOnly,
            other => FixType::Unknown(other),
        }
    }
}

/// Decoded navigation solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavPvt {
    /// GPS time of week (ms).
    pub itow_ms: u32,
    /// Year (UTC).
    pub year: u16,
    /// Month, 1..=12 (UTC).
    pub month: u8,
    /// Day of month, 1..=31 (UTC).
    pub day: u8,
    /// Hour of day, 0..=23 (UTC).
    pub hour: u8,
    /// Minute of hour, 0..=59 (UTC).
    pub minute: u8,
    /// Seconds of minute, 0..=60 (UTC).
    pub second: u8,
    /// Date/time validity flags.
    pub valid: u8,
    /// Time accuracy estimate (ns).
    pub time_acc_ns: u32,
    /// Fraction of second (ns), may be negative.
    pub nano: i32,
    /// GNSS fix type.
    pub fix_type: FixType,
    /// Fix status flags; bit 0 is gnssFixOK.
    pub flags: u8,
    /// Additional flags (confirmed date/time).
    pub flags2: u8,
    /// Satellites used in the solution.
    pub num_sv: u8,
    /// Longitude (deg * 1e-7).
    pub lon: i32,
    /// Latitude (deg * 1e-7).
    pub lat: i32,
    /// Height above ellipsoid (mm).
    pub height_mm: i32,
    /// Height above mean sea level (mm).
    pub h_msl_mm: i32,
    /// Horizontal accuracy estimate (mm).
    pub h_acc_mm: u32,
    /// Vertical accuracy estimate (mm).
    pub v_acc_mm: u32,
    /// North velocity (mm/s).
    pub vel_n: i32,
    /// East velocity (mm/s).
    pub vel_e: i32,
    /// Down velocity (mm/s).
    pub vel_d: i32,
    /// Ground speed (mm/s).
    pub ground_speed: i32,
    /// Heading of motion (deg * 1e-5).
    pub head_mot: i32,
    /// Speed accuracy estimate (mm/s).
    pub speed_acc: u32,
    /// Heading accuracy estimate (deg * 1e-5).
    pub head_acc: u32,
    /// Position DOP (* 0.01).
    pub pdop: u16,
}

impl NavPvt {
    /// Decode a NAV-PVT payload. Returns `None` if it is shorter than 92 bytes.
    pub fn from_payload(payload: &[u8]) -> Option<Self> {
        if payload.len() < NAV_PVT_LEN {
            return None;
        }
        let mut buf = &payload[..NAV_PVT_LEN];
        Some(Self {
            itow_ms: buf.get_u32_le(),
            year: buf.get_u16_le(),
            month: buf.get_u8(),
            day: buf.get_u8(),
            hour: buf.get_u8(),
            minute: buf.get_u8(),
            second: buf.get_u8(),
            valid: buf.get_u8(),
            time_acc_ns: buf.get_u32_le(),
            nano: buf.get_i32_le(),
            fix_type: FixType::from(buf.get_u8()),
            flags: buf.get_u8(),
            flags2: buf.get_u8(),
            num_sv: buf.get_u8(),
            lon: buf.get_i32_le(),
            lat: buf.get_i32_le(),
            height_mm: buf.get_i32_le(),
            h_msl_mm: buf.get_i32_le(),
            h_acc_mm: buf.get_u32_le(),
            v_acc_mm: buf.get_u32_le(),
            vel_n: buf.get_i32_le(),
            vel_e: buf.get_i32_le(),
            vel_d: buf.get_i32_le(),
            ground_speed: buf.get_i32_le(),
            head_mot: buf.get_i32_le(),
            speed_acc: buf.get_u32_le(),
            head_acc: buf.get_u32_le(),
            pdop: buf.get_u16_le(),
        })
    }

    /// Check the gnssFixOK flag.
    #[inline]
    pub fn gnss_fix_ok(&self) -> bool {
        self.flags & 0x01 != 0
    }
}

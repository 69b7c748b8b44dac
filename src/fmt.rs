//! # fmt
//!
//! Pure rendering helpers shared by every protocol decoder.
//!
//! Log-file column alignment depends on all decoders producing identical
//! widths for the same field kind, so these helpers are the only place
//! where numeric rendering widths are defined. All functions here are
//! total: any input value produces a string, there is no failure mode.

use crate::types::config::DisplayConfig;
use crate::types::frame::CanFrame;
use chrono::{Duration, NaiveDateTime};

/// Renders one payload byte right-justified to its fixed column width.
///
/// Decimal mode: 3 characters (`" 18"`, `"202"`). Hex mode: a leading
/// separator space plus 2 hex digits (`" 12"`). Both come out 3 wide for
/// values a byte can hold, so dumps align in either mode.
#[inline]
pub fn byte_string(value: u8, cfg: &DisplayConfig) -> String {
    if cfg.use_decimal {
        format!("{:3}", value)
    } else {
        format!(" {:02X}", value)
    }
}

/// Renders a 16-bit word right-justified to its fixed column width.
///
/// Decimal mode: 5 characters. Hex mode: a leading separator space plus
/// 4 hex digits.
#[inline]
pub fn word_string(value: u16, cfg: &DisplayConfig) -> String {
    if cfg.use_decimal {
        format!("{:5}", value)
    } else {
        format!(" {:04X}", value)
    }
}

/// Renders an arbitrary value without padding (`"1234"` / `"4D2"`).
#[inline]
pub fn value_string(value: u32, cfg: &DisplayConfig) -> String {
    if cfg.use_decimal {
        value.to_string()
    } else {
        format!("{:X}", value)
    }
}

/// Assembles a 16-bit word from up to 2 bytes, little-endian.
///
/// Missing bytes (short slice) contribute zero, so partial payloads never
/// require a length check at the call site.
#[inline]
pub fn word_from_le(bytes: &[u8]) -> u16 {
    let b0: u16 = bytes.first().copied().unwrap_or(0) as u16;
    let b1: u16 = bytes.get(1).copied().unwrap_or(0) as u16;
    (b1 << 8) | b0
}

/// Assembles a 16-bit word from up to 2 bytes, big-endian.
#[inline]
pub fn word_from_be(bytes: &[u8]) -> u16 {
    let b0: u16 = bytes.first().copied().unwrap_or(0) as u16;
    let b1: u16 = bytes.get(1).copied().unwrap_or(0) as u16;
    (b0 << 8) | b1
}

/// Assembles a 32-bit value from up to 4 bytes, little-endian.
#[inline]
pub fn dword_from_le(bytes: &[u8]) -> u32 {
    let mut value: u32 = 0;
    for i in 0..4 {
        value |= (bytes.get(i).copied().unwrap_or(0) as u32) << (8 * i);
    }
    value
}

/// Assembles a 32-bit value from up to 4 bytes, big-endian.
#[inline]
pub fn dword_from_be(bytes: &[u8]) -> u32 {
    let mut value: u32 = 0;
    for b in bytes.iter().take(4) {
        value = (value << 8) | (*b as u32);
    }
    value
}

/// Renders a byte slice as space-joined byte columns.
///
/// Used by the raw passthrough and by every "trailing bytes" dump, so an
/// operator always sees unconsumed data in the same shape.
pub fn bytes_string(bytes: &[u8], cfg: &DisplayConfig) -> String {
    bytes
        .iter()
        .map(|b| byte_string(*b, cfg))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Renders the valid payload of a frame as space-joined byte columns.
pub fn data_string(frame: &CanFrame, cfg: &DisplayConfig) -> String {
    bytes_string(frame.payload(), cfg)
}

/// Formats a monotonic microsecond timestamp as `seconds.microseconds`.
///
/// The seconds field is at least 7 characters, left-padded with blanks or
/// zeros; the microsecond field is always 6 digits.
///
/// # Examples
///
/// ```rust
/// # use canmon::fmt::timestamp_string;
/// assert_eq!(timestamp_string(1_500_000, false), "      1.500000");
/// assert_eq!(timestamp_string(1_500_000, true), "0000001.500000");
/// ```
pub fn timestamp_string(timestamp_us: u64, zero_padded: bool) -> String {
    let seconds: u64 = timestamp_us / 1_000_000;
    let micros: u64 = timestamp_us % 1_000_000;
    if zero_padded {
        format!("{:07}.{:06}", seconds, micros)
    } else {
        format!("{:>7}.{:06}", seconds, micros)
    }
}

/// Anchors a monotonic timestamp to a wall-clock start time.
///
/// Returns `start + timestamp` formatted as `%Y-%m-%d %H:%M:%S%.3f`, the
/// same shape trace logs use for their absolute-time column.
pub fn absolute_time_string(start: NaiveDateTime, timestamp_us: u64) -> String {
    let offset: Duration = Duration::microseconds(timestamp_us as i64);
    let abs_time: NaiveDateTime = start + offset;
    abs_time.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex() -> DisplayConfig {
        DisplayConfig {
            use_decimal: false,
            ..DisplayConfig::default()
        }
    }

    fn dec() -> DisplayConfig {
        DisplayConfig {
            use_decimal: true,
            ..DisplayConfig::default()
        }
    }

    #[test]
    fn byte_width_is_stable() {
        assert_eq!(byte_string(0x12, &hex()), " 12");
        assert_eq!(byte_string(0x00, &hex()), " 00");
        assert_eq!(byte_string(0xFF, &hex()), " FF");
        assert_eq!(byte_string(18, &dec()), " 18");
        assert_eq!(byte_string(202, &dec()), "202");
        assert_eq!(byte_string(7, &dec()), "  7");
    }

    #[test]
    fn word_width_is_stable() {
        assert_eq!(word_string(0x1234, &hex()), " 1234");
        assert_eq!(word_string(0x0001, &hex()), " 0001");
        assert_eq!(word_string(1, &dec()), "    1");
        assert_eq!(word_string(65535, &dec()), "65535");
    }

    #[test]
    fn value_is_unpadded() {
        assert_eq!(value_string(0x4D2, &hex()), "4D2");
        assert_eq!(value_string(1234, &dec()), "1234");
        assert_eq!(value_string(0, &hex()), "0");
    }

    #[test]
    fn word_assembly_both_orders() {
        assert_eq!(word_from_le(&[0x34, 0x12]), 0x1234);
        assert_eq!(word_from_be(&[0x12, 0x34]), 0x1234);
    }

    #[test]
    fn word_assembly_short_slice() {
        assert_eq!(word_from_le(&[0x34]), 0x0034);
        assert_eq!(word_from_be(&[0x12]), 0x1200);
        assert_eq!(word_from_le(&[]), 0);
        assert_eq!(word_from_be(&[]), 0);
    }

    #[test]
    fn dword_assembly_both_orders() {
        assert_eq!(dword_from_le(&[0x78, 0x56, 0x34, 0x12]), 0x12345678);
        assert_eq!(dword_from_be(&[0x12, 0x34, 0x56, 0x78]), 0x12345678);
    }

    #[test]
    fn dword_assembly_short_slice() {
        assert_eq!(dword_from_le(&[0x78, 0x56]), 0x5678);
        assert_eq!(dword_from_be(&[0x12, 0x34]), 0x1234);
    }

    #[test]
    fn dword_assembly_ignores_extra_bytes() {
        assert_eq!(dword_from_le(&[0x78, 0x56, 0x34, 0x12, 0xAA]), 0x12345678);
        assert_eq!(dword_from_be(&[0x12, 0x34, 0x56, 0x78, 0xAA]), 0x12345678);
    }

    #[test]
    fn data_string_joins_columns() {
        let frame = CanFrame::new(0x100, false, &[0x01, 0xAB, 0x00]);
        assert_eq!(data_string(&frame, &hex()), " 01  AB  00");
        assert_eq!(data_string(&frame, &dec()), "  1 171   0");
    }

    #[test]
    fn bytes_string_subslice() {
        assert_eq!(bytes_string(&[0x01, 0xAB][1..], &hex()), " AB");
        assert_eq!(bytes_string(&[], &hex()), "");
    }

    #[test]
    fn data_string_empty_payload() {
        let frame = CanFrame::new(0x100, false, &[]);
        assert_eq!(data_string(&frame, &hex()), "");
    }

    #[test]
    fn timestamp_blank_and_zero_padding() {
        assert_eq!(timestamp_string(0, false), "      0.000000");
        assert_eq!(timestamp_string(0, true), "0000000.000000");
        assert_eq!(timestamp_string(12_345_678, false), "     12.345678");
        assert_eq!(timestamp_string(12_345_678, true), "0000012.345678");
    }

    #[test]
    fn timestamp_wide_seconds_keep_all_digits() {
        // 1e8 seconds exceeds the 7-digit column; the field widens.
        assert_eq!(timestamp_string(100_000_000_000_000, false), "100000000.000000");
    }

    #[test]
    fn absolute_time_anchoring() {
        let start: NaiveDateTime =
            NaiveDateTime::parse_from_str("2025-03-10 12:00:00.000", "%Y-%m-%d %H:%M:%S%.3f")
                .unwrap();
        assert_eq!(
            absolute_time_string(start, 1_500_000),
            "2025-03-10 12:00:01.500"
        );
    }
}

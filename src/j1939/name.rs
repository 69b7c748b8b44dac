//! # name
//!
//! SAE J1939 NAME field (64 bits), broadcast in Address Claimed frames to
//! identify a controller application on the network.
//!
//! # Field semantics
//!
//! ```text
//! Bits  0-20  (21 bits) : Identity number
//! Bits 21-31  (11 bits) : Manufacturer code
//! Bits 32-34  ( 3 bits) : ECU instance
//! Bits 35-39  ( 5 bits) : Function instance
//! Bits 40-47  ( 8 bits) : Function
//! Bit  48     ( 1 bit ) : Reserved
//! Bits 49-55  ( 7 bits) : Vehicle system
//! Bits 56-59  ( 4 bits) : Vehicle system instance
//! Bits 60-62  ( 3 bits) : Industry group
//! Bit  63     ( 1 bit ) : Arbitrary Address Capable
//! ```

use core::fmt;

/// Typed wrapper around the 64-bit NAME value with shift+mask accessors.
///
/// # Examples
///
/// ```rust
/// use canmon::j1939::name::J1939Name;
///
/// let name = J1939Name::builder()
///     .identity_number(123456)
///     .manufacturer_code(275)
///     .function(130)
///     .arbitrary_address_capable(true)
///     .build();
///
/// assert_eq!(name.identity_number(), 123456);
/// assert_eq!(name.manufacturer_code(), 275);
/// assert!(name.is_arbitrary_address_capable());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct J1939Name(u64);

impl J1939Name {
    /// Wraps a raw 64-bit value.
    #[inline]
    pub const fn from_raw(raw: u64) -> J1939Name {
        J1939Name(raw)
    }

    /// Assembles a NAME from up to 8 payload bytes, little-endian.
    ///
    /// Missing bytes leave the corresponding high bits zero, so a short
    /// Address Claimed payload still decodes.
    pub fn from_payload(bytes: &[u8]) -> J1939Name {
        let mut raw: u64 = 0;
        for (i, b) in bytes.iter().take(8).enumerate() {
            raw |= (*b as u64) << (8 * i);
        }
        J1939Name(raw)
    }

    /// Returns the underlying `u64`.
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Creates a builder with all fields cleared.
    #[inline]
    pub const fn builder() -> J1939NameBuilder {
        J1939NameBuilder { raw: 0 }
    }

    /// Identity number (bits 0-20, 21 bits).
    #[inline]
    pub const fn identity_number(&self) -> u32 {
        (self.0 & 0x1F_FFFF) as u32
    }

    /// Manufacturer code (bits 21-31, 11 bits).
    #[inline]
    pub const fn manufacturer_code(&self) -> u16 {
        ((self.0 >> 21) & 0x7FF) as u16
    }

    /// ECU instance (bits 32-34, 3 bits).
    #[inline]
    pub const fn ecu_instance(&self) -> u8 {
        ((self.0 >> 32) & 0x07) as u8
    }

    /// Function instance (bits 35-39, 5 bits).
    #[inline]
    pub const fn function_instance(&self) -> u8 {
        ((self.0 >> 35) & 0x1F) as u8
    }

    /// Function (bits 40-47, 8 bits).
    #[inline]
    pub const fn function(&self) -> u8 {
        ((self.0 >> 40) & 0xFF) as u8
    }

    /// Reserved bit (bit 48).
    #[inline]
    pub const fn reserved(&self) -> bool {
        ((self.0 >> 48) & 0x01) != 0
    }

    /// Vehicle system (bits 49-55, 7 bits).
    #[inline]
    pub const fn vehicle_system(&self) -> u8 {
        ((self.0 >> 49) & 0x7F) as u8
    }

    /// Vehicle system instance (bits 56-59, 4 bits).
    #[inline]
    pub const fn vehicle_system_instance(&self) -> u8 {
        ((self.0 >> 56) & 0x0F) as u8
    }

    /// Industry group (bits 60-62, 3 bits).
    #[inline]
    pub const fn industry_group(&self) -> u8 {
        ((self.0 >> 60) & 0x07) as u8
    }

    /// Arbitrary Address Capable bit (bit 63).
    #[inline]
    pub const fn is_arbitrary_address_capable(&self) -> bool {
        ((self.0 >> 63) & 0x01) != 0
    }
}

impl From<u64> for J1939Name {
    #[inline]
    fn from(raw: u64) -> J1939Name {
        J1939Name::from_raw(raw)
    }
}

impl From<J1939Name> for u64 {
    #[inline]
    fn from(name: J1939Name) -> u64 {
        name.raw()
    }
}

impl fmt::Display for J1939Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "J1939Name {{ id: {}, mfg: {}, func: {}, system: {}, ecu: {}, aac: {} }}",
            self.identity_number(),
            self.manufacturer_code(),
            self.function(),
            self.vehicle_system(),
            self.ecu_instance(),
            self.is_arbitrary_address_capable()
        )
    }
}

/// Fluent builder packing NAME subfields into the raw `u64`.
///
/// Out-of-range values are masked to their field width.
#[derive(Debug, Clone, Copy)]
pub struct J1939NameBuilder {
    raw: u64,
}

impl J1939NameBuilder {
    /// Set the identity number (bits 0-20, 21 bits).
    #[inline]
    pub const fn identity_number(mut self, value: u32) -> J1939NameBuilder {
        self.raw = (self.raw & !0x1F_FFFF) | (value as u64 & 0x1F_FFFF);
        self
    }

    /// Set the manufacturer code (bits 21-31, 11 bits).
    #[inline]
    pub const fn manufacturer_code(mut self, value: u16) -> J1939NameBuilder {
        self.raw = (self.raw & !(0x7FF << 21)) | ((value as u64 & 0x7FF) << 21);
        self
    }

    /// Set the ECU instance (bits 32-34, 3 bits).
    #[inline]
    pub const fn ecu_instance(mut self, value: u8) -> J1939NameBuilder {
        self.raw = (self.raw & !(0x07 << 32)) | ((value as u64 & 0x07) << 32);
        self
    }

    /// Set the function instance (bits 35-39, 5 bits).
    #[inline]
    pub const fn function_instance(mut self, value: u8) -> J1939NameBuilder {
        self.raw = (self.raw & !(0x1F << 35)) | ((value as u64 & 0x1F) << 35);
        self
    }

    /// Set the function (bits 40-47, 8 bits).
    #[inline]
    pub const fn function(mut self, value: u8) -> J1939NameBuilder {
        self.raw = (self.raw & !(0xFF << 40)) | ((value as u64) << 40);
        self
    }

    /// Set the reserved bit (bit 48).
    #[inline]
    pub const fn reserved(mut self, value: bool) -> J1939NameBuilder {
        self.raw = (self.raw & !(0x01 << 48)) | ((value as u64) << 48);
        self
    }

    /// Set the vehicle system (bits 49-55, 7 bits).
    #[inline]
    pub const fn vehicle_system(mut self, value: u8) -> J1939NameBuilder {
        self.raw = (self.raw & !(0x7F << 49)) | ((value as u64 & 0x7F) << 49);
        self
    }

    /// Set the vehicle system instance (bits 56-59, 4 bits).
    #[inline]
    pub const fn vehicle_system_instance(mut self, value: u8) -> J1939NameBuilder {
        self.raw = (self.raw & !(0x0F << 56)) | ((value as u64 & 0x0F) << 56);
        self
    }

    /// Set the industry group (bits 60-62, 3 bits).
    #[inline]
    pub const fn industry_group(mut self, value: u8) -> J1939NameBuilder {
        self.raw = (self.raw & !(0x07 << 60)) | ((value as u64 & 0x07) << 60);
        self
    }

    /// Set the Arbitrary Address Capable bit (bit 63).
    #[inline]
    pub const fn arbitrary_address_capable(mut self, value: bool) -> J1939NameBuilder {
        self.raw = (self.raw & !(0x01 << 63)) | ((value as u64) << 63);
        self
    }

    /// Build the final `J1939Name`.
    #[inline]
    pub const fn build(self) -> J1939Name {
        J1939Name(self.raw)
    }
}

impl Default for J1939NameBuilder {
    fn default() -> J1939NameBuilder {
        J1939Name::builder()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_fields() {
        let original = J1939Name::builder()
            .identity_number(0x12345)
            .manufacturer_code(0x2AB)
            .ecu_instance(0x05)
            .function_instance(0x15)
            .function(0xAA)
            .reserved(true)
            .vehicle_system(0x33)
            .vehicle_system_instance(0x0C)
            .industry_group(0x04)
            .arbitrary_address_capable(true)
            .build();

        let restored = J1939Name::from_raw(original.raw());
        assert_eq!(original, restored);
        assert_eq!(restored.identity_number(), 0x12345);
        assert_eq!(restored.manufacturer_code(), 0x2AB);
        assert_eq!(restored.ecu_instance(), 0x05);
        assert_eq!(restored.function_instance(), 0x15);
        assert_eq!(restored.function(), 0xAA);
        assert!(restored.reserved());
        assert_eq!(restored.vehicle_system(), 0x33);
        assert_eq!(restored.vehicle_system_instance(), 0x0C);
        assert_eq!(restored.industry_group(), 0x04);
        assert!(restored.is_arbitrary_address_capable());
    }

    #[test]
    fn payload_assembly_is_little_endian() {
        let raw: u64 = 0x8123456789ABCDEF;
        let name = J1939Name::from_payload(&raw.to_le_bytes());
        assert_eq!(name.raw(), raw);
    }

    #[test]
    fn short_payload_leaves_high_bits_zero() {
        let name = J1939Name::from_payload(&[0xEF, 0xCD, 0xAB]);
        assert_eq!(name.raw(), 0x00AB_CDEF);
        assert!(!name.is_arbitrary_address_capable());
        assert_eq!(name.function(), 0);
    }

    #[test]
    fn aac_bit_position() {
        let name = J1939Name::builder().arbitrary_address_capable(true).build();
        assert_eq!(name.raw(), 1u64 << 63);
    }

    #[test]
    fn builder_masks_oversized_values() {
        let name = J1939Name::builder().industry_group(0xFF).build();
        assert_eq!(name.industry_group(), 0x07);
        assert_eq!(name.raw() >> 63, 0);
    }
}

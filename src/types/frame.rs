/// Represents a single classic CAN frame as delivered by a bus driver.
///
/// This is the input value type of the whole interpretation engine: every
/// decoder consumes exactly one `CanFrame` and renders it (or declines to).
/// The engine never mutates a frame and never constructs one itself.
///
/// # Field semantics
///
/// - `id`:
///   Message identifier. Up to 29 bits are meaningful when `is_extended` is
///   set, up to 11 bits otherwise. Higher bits are ignored by all decoders.
///
/// - `is_extended`:
///   `true` for a 29-bit identifier, `false` for an 11-bit identifier.
///
/// - `is_rtr`:
///   `true` for a remote transmission request. RTR frames carry no payload
///   data of interest; most decoders render them raw or decline them.
///
/// - `dlc`:
///   Data length code, `0..=8`. Only the first `dlc` bytes of `data` are
///   meaningful; [`CanFrame::payload`] is the safe way to read them.
///
/// - `data`:
///   Fixed 8-byte payload buffer. Bytes beyond `dlc` are undefined filler
///   and must not influence any decode.
///
/// - `timestamp_us`:
///   Reception time in microseconds on a monotonic axis. Opaque to the
///   decoders; only the display/log layer formats it.
///
/// # Invariants
///
/// * Decoders read at most `data[..dlc.min(8)]`; a `dlc` larger than 8 is
///   treated as 8, never as an out-of-bounds access.
/// * Two frames that compare equal always produce identical decoder output
///   under the same display configuration.
///
/// # Examples
///
/// ```rust
/// # use canmon::CanFrame;
/// let f = CanFrame::new(0x18FEF100, true, &[0x32, 0x00, 0x40, 0x60, 0xFF, 0xFF, 0xFF, 0xFF]);
/// assert_eq!(f.dlc, 8);
/// assert_eq!(f.payload()[2], 0x40);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanFrame {
    /// Message identifier (11 or 29 meaningful bits).
    pub id: u32,

    /// `true` = 29-bit identifier, `false` = 11-bit identifier.
    pub is_extended: bool,

    /// `true` = remote transmission request.
    pub is_rtr: bool,

    /// Data length code (0..=8).
    pub dlc: u8,

    /// Payload buffer; only `data[..dlc]` is meaningful.
    pub data: [u8; 8],

    /// Reception time in monotonic microseconds.
    pub timestamp_us: u64,
}

impl CanFrame {
    /// Builds a data frame from an identifier and a payload slice.
    ///
    /// The payload is truncated to 8 bytes; `dlc` is set to the stored
    /// length. Mostly a convenience for tests and examples, since frames
    /// normally arrive fully populated from the bus driver.
    pub fn new(id: u32, is_extended: bool, payload: &[u8]) -> Self {
        let len: usize = payload.len().min(8);
        let mut data: [u8; 8] = [0u8; 8];
        data[..len].copy_from_slice(&payload[..len]);
        CanFrame {
            id,
            is_extended,
            is_rtr: false,
            dlc: len as u8,
            data,
            timestamp_us: 0,
        }
    }

    /// Returns the meaningful payload bytes, `data[..dlc]`.
    ///
    /// A `dlc` above 8 is clamped, so the returned slice is always valid.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data[..usize::from(self.dlc.min(8))]
    }

    /// Resets all fields to their default values.
    pub fn clear(&mut self) {
        *self = CanFrame::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_frame() -> CanFrame {
        CanFrame {
            id: 0x18FEF100,
            is_extended: true,
            is_rtr: false,
            dlc: 8,
            data: [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88],
            timestamp_us: 1_500_000,
        }
    }

    #[test]
    fn test_clear() {
        let mut frame: CanFrame = build_test_frame();

        // Check that everything is back to default value
        frame.clear();
        assert_eq!(frame, CanFrame::default());
    }

    #[test]
    fn payload_respects_dlc() {
        let mut frame: CanFrame = build_test_frame();
        frame.dlc = 3;
        assert_eq!(frame.payload(), &[0x11, 0x22, 0x33]);
    }

    #[test]
    fn payload_clamps_oversized_dlc() {
        let mut frame: CanFrame = build_test_frame();
        frame.dlc = 15;
        assert_eq!(frame.payload().len(), 8);
    }

    #[test]
    fn new_truncates_long_payload() {
        let frame = CanFrame::new(0x123, false, &[0u8; 12]);
        assert_eq!(frame.dlc, 8);
    }

    #[test]
    fn new_keeps_short_payload() {
        let frame = CanFrame::new(0x7C1, false, &[0xAA, 0xBB]);
        assert_eq!(frame.dlc, 2);
        assert_eq!(frame.payload(), &[0xAA, 0xBB]);
        assert!(!frame.is_extended);
        assert!(!frame.is_rtr);
    }
}

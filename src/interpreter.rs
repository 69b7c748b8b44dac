//! # interpreter
//!
//! Aggregation layer over all protocol decoders.
//!
//! A [`FrameInterpreter`] owns one instance of every decoder, the shared
//! [`DisplayConfig`] and the active [`Protocol`] selection. Display
//! rendering always produces text: when the active protocol cannot
//! interpret a frame the raw byte rendering takes its place, so a monitor
//! window never shows blank rows. Log rendering instead keeps the fixed
//! raw columns and pads the interpreted column, so a log file stays
//! machine-splittable at the same offsets for every line.

use tracing::{debug, trace};

use crate::canopen::CanOpenDecoder;
use crate::decoder::ProtocolDecoder;
use crate::flashloader::FlashloaderDecoder;
use crate::fmt;
use crate::j1939::J1939Decoder;
use crate::layer2::Layer2Decoder;
use crate::opensyde::OpenSydeDecoder;
use crate::params::ParamStore;
use crate::types::config::{DisplayConfig, Protocol};
use crate::types::errors::StoreError;
use crate::types::frame::CanFrame;
use crate::varaccess::VarAccessDecoder;

const SECTION_DISPLAY: &str = "DISPLAY";
const KEY_DECIMAL: &str = "DECIMAL";
const KEY_PROTOCOL: &str = "PROTOCOL";

const SECTION_LAYER2: &str = "LAYER2";
const SECTION_CANOPEN: &str = "CANOPEN";
const SECTION_J1939: &str = "J1939";
const SECTION_OPENSYDE: &str = "OPENSYDE";
const SECTION_FLASHLOADER: &str = "FLASHLOADER";
const SECTION_VARACCESS: &str = "VARACCESS";

/// Minimum width of the interpreted column in log lines.
const LOG_TEXT_WIDTH: usize = 73;

/// Frame-to-text engine holding every protocol decoder.
#[derive(Debug, Default)]
pub struct FrameInterpreter {
    config: DisplayConfig,
    protocol: Protocol,
    layer2: Layer2Decoder,
    canopen: CanOpenDecoder,
    j1939: J1939Decoder,
    opensyde: OpenSydeDecoder,
    flashloader: FlashloaderDecoder,
    varaccess: VarAccessDecoder,
}

impl FrameInterpreter {
    /// Creates an interpreter with default configuration, raw rendering
    /// active.
    pub fn new() -> Self {
        FrameInterpreter::default()
    }

    fn active(&self) -> &dyn ProtocolDecoder {
        match self.protocol {
            Protocol::Layer2 => &self.layer2,
            Protocol::CanOpen => &self.canopen,
            Protocol::J1939 => &self.j1939,
            Protocol::OpenSyde => &self.opensyde,
            Protocol::Flashloader => &self.flashloader,
            Protocol::VarAccess => &self.varaccess,
        }
    }

    fn variants(&self) -> [(&dyn ProtocolDecoder, &'static str); 6] {
        [
            (&self.layer2 as &dyn ProtocolDecoder, SECTION_LAYER2),
            (&self.canopen, SECTION_CANOPEN),
            (&self.j1939, SECTION_J1939),
            (&self.opensyde, SECTION_OPENSYDE),
            (&self.flashloader, SECTION_FLASHLOADER),
            (&self.varaccess, SECTION_VARACCESS),
        ]
    }

    /// Interprets a frame with the active protocol.
    ///
    /// Falls back to the raw byte rendering when the active protocol
    /// cannot interpret the frame, so the result is always displayable.
    pub fn interpret(&self, frame: &CanFrame) -> String {
        match self.active().interpret(frame, &self.config) {
            Some(text) => text,
            None => {
                trace!(
                    id = frame.id,
                    protocol = self.protocol.name(),
                    "frame not interpretable, using raw rendering"
                );
                self.layer2
                    .interpret(frame, &self.config)
                    .unwrap_or_default()
            }
        }
    }

    /// [`interpret`](FrameInterpreter::interpret) with a right-justified
    /// sequence counter prefix, for numbered monitor rows.
    pub fn interpret_numbered(&self, frame: &CanFrame, seq: u64) -> String {
        format!("{:>6}  {}", seq, self.interpret(frame))
    }

    /// Renders one log file line.
    ///
    /// The raw fields (identifier, frame type, RTR label, length, all 8
    /// byte columns) are fixed width and semicolon separated. When an
    /// interpreting protocol is active its text, or an empty string if it
    /// yielded nothing, is appended left-padded to at least
    /// [`LOG_TEXT_WIDTH`] characters.
    pub fn log_line(&self, frame: &CanFrame) -> String {
        let mut line: String = if self.config.use_decimal {
            format!("{:9}; ", frame.id)
        } else {
            format!("{:8X}; ", frame.id)
        };
        line.push_str(if frame.is_extended { "29B; " } else { "11B; " });
        line.push_str(if frame.is_rtr { "RTR; " } else { "STD; " });
        // byte columns carry their own leading pad, so no space after the dlc
        line.push_str(&format!("{};", frame.dlc.min(8)));

        let payload: &[u8] = frame.payload();
        for slot in 0..8 {
            match payload.get(slot) {
                Some(b) => line.push_str(&fmt::byte_string(*b, &self.config)),
                None => line.push_str("   "),
            }
            line.push(';');
        }

        if self.protocol != Protocol::Layer2 {
            let text: String = self
                .active()
                .interpret(frame, &self.config)
                .unwrap_or_default();
            line.push_str(&format!("{:>width$}", text, width = LOG_TEXT_WIDTH));
        }
        line
    }

    /// Switches between decimal and hexadecimal rendering for every
    /// decoder at once.
    pub fn set_display_mode(&mut self, decimal: bool) {
        self.config.use_decimal = decimal;
    }

    /// Selects the protocol applied to subsequent frames.
    pub fn set_protocol(&mut self, protocol: Protocol) {
        self.protocol = protocol;
    }

    /// Currently selected protocol.
    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Display name of the active protocol.
    pub fn protocol_name(&self) -> &'static str {
        self.active().name()
    }

    /// Shared display configuration.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Mutable access to the shared display configuration.
    pub fn config_mut(&mut self) -> &mut DisplayConfig {
        &mut self.config
    }

    /// Loads display mode, protocol selection and every decoder's
    /// parameters from `store`. Missing keys keep their current values.
    pub fn load_parameters(&mut self, store: &dyn ParamStore) {
        match store.get_u32(SECTION_DISPLAY, KEY_DECIMAL) {
            Some(value) => self.config.use_decimal = value != 0,
            None => debug!(key = KEY_DECIMAL, "key absent, keeping default"),
        }
        match store.get_u32(SECTION_DISPLAY, KEY_PROTOCOL) {
            Some(index) => {
                if let Some(protocol) = Protocol::from_index(index) {
                    self.protocol = protocol;
                } else {
                    debug!(index, "stored protocol index unknown, keeping selection");
                }
            }
            None => debug!(key = KEY_PROTOCOL, "key absent, keeping default"),
        }
        let mut config: DisplayConfig = self.config;
        for (decoder, section) in self.variants() {
            decoder.load_parameters(&mut config, store, section);
        }
        self.config = config;
    }

    /// Writes display mode, protocol selection and every decoder's
    /// parameters into `store`, stopping at the first failure.
    pub fn save_parameters(&self, store: &mut dyn ParamStore) -> Result<(), StoreError> {
        store.set_u32(SECTION_DISPLAY, KEY_DECIMAL, self.config.use_decimal as u32)?;
        store.set_u32(SECTION_DISPLAY, KEY_PROTOCOL, self.protocol.index())?;
        for (decoder, section) in self.variants() {
            decoder.save_parameters(&self.config, store, section)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MemoryStore;

    fn build_test_frame(id: u32, extended: bool, bytes: &[u8]) -> CanFrame {
        let mut data: [u8; 8] = [0; 8];
        data[..bytes.len()].copy_from_slice(bytes);
        CanFrame {
            id,
            is_extended: extended,
            is_rtr: false,
            dlc: bytes.len() as u8,
            data,
            timestamp_us: 0,
        }
    }

    #[test]
    fn interpreter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrameInterpreter>();
    }

    #[test]
    fn display_falls_back_to_raw_rendering() {
        let mut interp = FrameInterpreter::new();
        interp.set_protocol(Protocol::OpenSyde);

        // diagnostic protocol needs extended identifiers
        let frame = build_test_frame(0x123, false, &[0x01, 0xAB]);
        assert_eq!(interp.interpret(&frame), " 01  AB");
    }

    #[test]
    fn active_protocol_text_wins_over_raw() {
        let mut interp = FrameInterpreter::new();
        interp.set_protocol(Protocol::CanOpen);

        let frame = build_test_frame(0x705, false, &[0x05]);
        assert_eq!(interp.interpret(&frame), "Heartbeat  Node:5  State:OPERATIONAL");
    }

    #[test]
    fn numbered_rows_share_a_counter_column() {
        let interp = FrameInterpreter::new();
        let frame = build_test_frame(0x123, false, &[0xAB]);

        assert_eq!(interp.interpret_numbered(&frame, 42), "    42   AB");
        assert!(interp.interpret_numbered(&frame, 1_000_000).starts_with("1000000  "));
    }

    #[test]
    fn display_mode_changes_rendering_not_byte_selection() {
        let mut interp = FrameInterpreter::new();
        let frame = build_test_frame(0x123, false, &[0xAB, 0x05]);

        assert_eq!(interp.interpret(&frame), " AB  05");
        interp.set_display_mode(true);
        assert_eq!(interp.interpret(&frame), "171   5");
    }

    #[test]
    fn log_line_raw_fields() {
        let interp = FrameInterpreter::new();
        let frame = build_test_frame(
            0x18FEF100,
            true,
            &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08],
        );
        let line = interp.log_line(&frame);
        assert!(line.starts_with("18FEF100; 29B; STD; 8; 01; 02; 03; 04; 05; 06; 07; 08;"), "{}", line);
    }

    #[test]
    fn log_line_pads_short_frames_to_fixed_columns() {
        let interp = FrameInterpreter::new();
        let long = interp.log_line(&build_test_frame(0x1, false, &[0; 8]));
        let short = interp.log_line(&build_test_frame(0x1, false, &[0; 2]));
        assert_eq!(long.len(), short.len());
    }

    #[test]
    fn log_line_interpreted_column_is_padded() {
        let mut interp = FrameInterpreter::new();
        let frame = build_test_frame(0x705, false, &[0x05]);

        let raw_only = interp.log_line(&frame);
        interp.set_protocol(Protocol::CanOpen);
        let line = interp.log_line(&frame);

        assert_eq!(line.len(), raw_only.len() + 73);
        assert!(line.ends_with("State:OPERATIONAL"), "{}", line);
    }

    #[test]
    fn log_line_keeps_columns_when_variant_yields_nothing() {
        let mut interp = FrameInterpreter::new();
        interp.set_protocol(Protocol::OpenSyde);

        let frame = build_test_frame(0x123, false, &[0x01]);
        let line = interp.log_line(&frame);
        assert!(line.ends_with(&" ".repeat(73)), "{}", line);
    }

    #[test]
    fn rtr_frames_are_labeled() {
        let interp = FrameInterpreter::new();
        let mut frame = build_test_frame(0x100, false, &[]);
        frame.is_rtr = true;
        let line = interp.log_line(&frame);
        assert!(line.contains("; RTR; "), "{}", line);
    }

    #[test]
    fn protocol_name_follows_selection() {
        let mut interp = FrameInterpreter::new();
        assert_eq!(interp.protocol_name(), "CAN Layer 2");

        interp.set_protocol(Protocol::J1939);
        assert_eq!(interp.protocol_name(), "J1939");
    }

    #[test]
    fn parameters_round_trip() {
        let mut interp = FrameInterpreter::new();
        interp.set_protocol(Protocol::Flashloader);
        interp.set_display_mode(true);
        interp.config_mut().flash_send_id = 0x7A;
        interp.config_mut().var_base_id = 0x240;

        let mut store = MemoryStore::new();
        interp.save_parameters(&mut store).unwrap();
        assert_eq!(store.get_u32("DISPLAY", "DECIMAL"), Some(1));
        assert_eq!(store.get_u32("DISPLAY", "PROTOCOL"), Some(4));
        assert_eq!(store.get_u32("FLASHLOADER", "SEND_ID"), Some(0x7A));
        assert_eq!(store.get_u32("VARACCESS", "BASE_ID"), Some(0x240));

        let mut restored = FrameInterpreter::new();
        restored.load_parameters(&store);
        assert_eq!(restored.protocol(), Protocol::Flashloader);
        assert!(restored.config().use_decimal);
        assert_eq!(restored.config().flash_send_id, 0x7A);
        assert_eq!(restored.config().var_base_id, 0x240);
    }

    #[test]
    fn load_keeps_defaults_for_missing_keys() {
        let mut interp = FrameInterpreter::new();
        interp.load_parameters(&MemoryStore::new());
        assert_eq!(interp.protocol(), Protocol::Layer2);
        assert_eq!(interp.config().flash_send_id, 0x51);
        assert_eq!(interp.config().var_base_id, 0x100);
    }

    #[test]
    fn stored_unknown_protocol_keeps_selection() {
        let mut store = MemoryStore::new();
        store.set_u32("DISPLAY", "PROTOCOL", 99).unwrap();

        let mut interp = FrameInterpreter::new();
        interp.set_protocol(Protocol::J1939);
        interp.load_parameters(&store);
        assert_eq!(interp.protocol(), Protocol::J1939);
    }
}

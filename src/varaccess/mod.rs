//! # varaccess
//!
//! Index-based variable access protocol variant.
//!
//! Requests go out on the configured base identifier, responses come back
//! on base + 1, both as standard frames. The low 7 bits of the first byte
//! select the service; bit 7 on a response marks an error answer carrying
//! a single error code byte. Every service has an exact length per
//! direction.

use tracing::debug;

use crate::decoder::ProtocolDecoder;
use crate::fmt;
use crate::params::ParamStore;
use crate::types::config::DisplayConfig;
use crate::types::errors::StoreError;
use crate::types::frame::CanFrame;

const KEY_BASE_ID: &str = "BASE_ID";

const SERVICE_LOGON: u8 = 0x00;
const SERVICE_LOGOFF: u8 = 0x01;
const SERVICE_READ_INDEX: u8 = 0x02;
const SERVICE_WRITE_INDEX: u8 = 0x03;
const SERVICE_READ_SERVICE: u8 = 0x04;
const SERVICE_WRITE_SERVICE: u8 = 0x05;
const SERVICE_UPDATE_TASK: u8 = 0x06;

const ERROR_FLAG: u8 = 0x80;

fn service_name(service: u8) -> Option<&'static str> {
    match service {
        SERVICE_LOGON => Some("Logon"),
        SERVICE_LOGOFF => Some("Logoff"),
        SERVICE_READ_INDEX => Some("ReadIndex"),
        SERVICE_WRITE_INDEX => Some("WriteIndex"),
        SERVICE_READ_SERVICE => Some("ReadService"),
        SERVICE_WRITE_SERVICE => Some("WriteService"),
        SERVICE_UPDATE_TASK => Some("UpdateTask"),
        _ => None,
    }
}

/// Decoder for the variable access protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct VarAccessDecoder;

impl ProtocolDecoder for VarAccessDecoder {
    fn name(&self) -> &'static str {
        "Variable Access"
    }

    fn interpret(&self, frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
        if frame.is_extended {
            return None;
        }
        let response: bool = if frame.id == cfg.var_base_id as u32 {
            false
        } else if frame.id == (cfg.var_base_id as u32).wrapping_add(1) {
            true
        } else {
            return None;
        };

        let data: &[u8] = frame.payload();
        let first: u8 = *data.first()?;
        let service: u8 = first & !ERROR_FLAG;
        let name: &str = service_name(service)?;

        if first & ERROR_FLAG != 0 {
            // error answers replace the normal layout with one code byte
            if !response || data.len() != 2 {
                return None;
            }
            return Some(format!(
                "{} Error:{}",
                name,
                fmt::value_string(data[1] as u32, cfg)
            ));
        }

        match (service, response) {
            (SERVICE_LOGON, false) => (data.len() == 5).then(|| {
                format!(
                    "Logon Req  Chk:{}  Ver:{}",
                    fmt::value_string(fmt::word_from_le(&data[1..3]) as u32, cfg),
                    fmt::value_string(fmt::word_from_le(&data[3..5]) as u32, cfg)
                )
            }),
            (SERVICE_LOGON, true) => (data.len() == 1).then(|| "Logon Res".to_string()),
            (SERVICE_LOGOFF, _) => {
                (data.len() == 1).then(|| format!("Logoff {}", dir(response)))
            }
            (SERVICE_READ_INDEX, false) | (SERVICE_READ_SERVICE, false) => {
                indexed(name, response, data, 3, false, cfg)
            }
            (SERVICE_READ_INDEX, true) | (SERVICE_READ_SERVICE, true) => {
                indexed(name, response, data, 7, true, cfg)
            }
            (SERVICE_WRITE_INDEX, false) | (SERVICE_WRITE_SERVICE, false) => {
                indexed(name, response, data, 7, true, cfg)
            }
            (SERVICE_WRITE_INDEX, true) | (SERVICE_WRITE_SERVICE, true) => {
                indexed(name, response, data, 3, false, cfg)
            }
            (SERVICE_UPDATE_TASK, _) => (data.len() == 3).then(|| {
                format!(
                    "UpdateTask {}  Task:{}",
                    dir(response),
                    fmt::value_string(fmt::word_from_le(&data[1..3]) as u32, cfg)
                )
            }),
            _ => None,
        }
    }

    fn load_parameters(&self, cfg: &mut DisplayConfig, store: &dyn ParamStore, section: &str) {
        match store.get_u16(section, KEY_BASE_ID) {
            Some(id) => cfg.var_base_id = id,
            None => debug!(section, key = KEY_BASE_ID, "key absent, keeping default"),
        }
    }

    fn save_parameters(
        &self,
        cfg: &DisplayConfig,
        store: &mut dyn ParamStore,
        section: &str,
    ) -> Result<(), StoreError> {
        store.set_u16(section, KEY_BASE_ID, cfg.var_base_id)
    }
}

fn dir(response: bool) -> &'static str {
    if response { "Res" } else { "Req" }
}

/// Index-addressed read/write body: `Idx` always, `Val` on the
/// value-bearing direction.
fn indexed(
    name: &str,
    response: bool,
    data: &[u8],
    exact_len: usize,
    with_value: bool,
    cfg: &DisplayConfig,
) -> Option<String> {
    if data.len() != exact_len {
        return None;
    }
    let mut text: String = format!(
        "{} {}  Idx:{}",
        name,
        dir(response),
        fmt::value_string(fmt::word_from_le(&data[1..3]) as u32, cfg)
    );
    if with_value {
        text.push_str(&format!(
            "  Val:{}",
            fmt::value_string(fmt::dword_from_le(&data[3..7]), cfg)
        ));
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_frame(id: u32, bytes: &[u8]) -> CanFrame {
        let mut data: [u8; 8] = [0; 8];
        data[..bytes.len()].copy_from_slice(bytes);
        CanFrame {
            id,
            is_extended: false,
            is_rtr: false,
            dlc: bytes.len() as u8,
            data,
            timestamp_us: 0,
        }
    }

    fn hex() -> DisplayConfig {
        DisplayConfig::default()
    }

    #[test]
    fn logon_round() {
        let frame = build_test_frame(0x100, &[0x00, 0x34, 0x12, 0x02, 0x00]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "Logon Req  Chk:1234  Ver:2");

        let frame = build_test_frame(0x101, &[0x00]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "Logon Res");
    }

    #[test]
    fn read_index_round() {
        let frame = build_test_frame(0x100, &[0x02, 0x10, 0x00]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "ReadIndex Req  Idx:10");

        let frame = build_test_frame(0x101, &[0x02, 0x10, 0x00, 0x78, 0x56, 0x34, 0x12]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "ReadIndex Res  Idx:10  Val:12345678");
    }

    #[test]
    fn write_index_carries_value_in_request() {
        let frame = build_test_frame(0x100, &[0x03, 0x05, 0x00, 0x2A, 0x00, 0x00, 0x00]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "WriteIndex Req  Idx:5  Val:2A");

        let frame = build_test_frame(0x101, &[0x03, 0x05, 0x00]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "WriteIndex Res  Idx:5");
    }

    #[test]
    fn update_task_both_directions() {
        let frame = build_test_frame(0x100, &[0x06, 0x01, 0x00]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "UpdateTask Req  Task:1");

        let frame = build_test_frame(0x101, &[0x06, 0x01, 0x00]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "UpdateTask Res  Task:1");
    }

    #[test]
    fn error_response_renders_code() {
        let frame = build_test_frame(0x101, &[0x82, 0x21]);
        let text = VarAccessDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "ReadIndex Error:21");
    }

    #[test]
    fn error_flag_on_request_is_not_interpretable() {
        let frame = build_test_frame(0x100, &[0x82, 0x21]);
        assert!(VarAccessDecoder.interpret(&frame, &hex()).is_none());
    }

    #[test]
    fn exact_lengths_are_enforced() {
        // read index request one byte long
        let frame = build_test_frame(0x100, &[0x02, 0x10, 0x00, 0x00]);
        assert!(VarAccessDecoder.interpret(&frame, &hex()).is_none());

        // logon request one byte short
        let frame = build_test_frame(0x100, &[0x00, 0x34, 0x12, 0x02]);
        assert!(VarAccessDecoder.interpret(&frame, &hex()).is_none());

        // error answer with trailing byte
        let frame = build_test_frame(0x101, &[0x82, 0x21, 0x00]);
        assert!(VarAccessDecoder.interpret(&frame, &hex()).is_none());
    }

    #[test]
    fn unknown_service_is_not_interpretable() {
        let frame = build_test_frame(0x100, &[0x07, 0x00, 0x00]);
        assert!(VarAccessDecoder.interpret(&frame, &hex()).is_none());
    }

    #[test]
    fn identifier_pair_follows_configuration() {
        let mut cfg = hex();
        cfg.var_base_id = 0x240;

        let frame = build_test_frame(0x240, &[0x02, 0x10, 0x00]);
        assert!(VarAccessDecoder.interpret(&frame, &cfg).is_some());

        let frame = build_test_frame(0x100, &[0x02, 0x10, 0x00]);
        assert!(VarAccessDecoder.interpret(&frame, &cfg).is_none());
    }

    #[test]
    fn extended_frames_are_not_interpretable() {
        let mut frame = build_test_frame(0x100, &[0x02, 0x10, 0x00]);
        frame.is_extended = true;
        assert!(VarAccessDecoder.interpret(&frame, &hex()).is_none());
    }

    #[test]
    fn base_id_round_trips_through_store() {
        use crate::params::MemoryStore;

        let mut cfg = hex();
        cfg.var_base_id = 0x240;
        let mut store = MemoryStore::new();
        VarAccessDecoder
            .save_parameters(&cfg, &mut store, "VARACCESS")
            .unwrap();

        let mut loaded = hex();
        VarAccessDecoder.load_parameters(&mut loaded, &store, "VARACCESS");
        assert_eq!(loaded.var_base_id, 0x240);
    }
}

//! # canopen
//!
//! CANopen protocol variant.
//!
//! Dispatch is purely by identifier range over the standard 11-bit
//! connection set: management and sync broadcasts, per-node emergency,
//! four transmit/receive PDO windows, the two SDO ranges and the
//! heartbeat/guard range. Extended identifiers and the unassigned gaps
//! between ranges are not interpretable.

mod sdo;

use crate::decoder::ProtocolDecoder;
use crate::fmt;
use crate::types::config::DisplayConfig;
use crate::types::frame::CanFrame;

use sdo::SdoDirection;

const ID_NMT: u32 = 0x000;
const ID_SYNC: u32 = 0x080;
const ID_TIME: u32 = 0x100;
const EMCY_BASE: u32 = 0x080;
const SDO_TX_BASE: u32 = 0x580;
const SDO_RX_BASE: u32 = 0x600;
const HEARTBEAT_BASE: u32 = 0x700;

/// Decoder for the CANopen protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanOpenDecoder;

impl ProtocolDecoder for CanOpenDecoder {
    fn name(&self) -> &'static str {
        "CANopen"
    }

    fn interpret(&self, frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
        if frame.is_extended {
            return None;
        }
        let data: &[u8] = frame.payload();
        match frame.id {
            ID_NMT => nmt_string(data, cfg),
            ID_SYNC => Some(labeled_dump("SYNC", data, cfg)),
            0x081..=0x0FF => emergency_string(frame.id - EMCY_BASE, data, cfg),
            ID_TIME => Some(labeled_dump("TIME", data, cfg)),
            0x181..=0x1FF => Some(pdo_string("TPDO1", frame.id - 0x180, data, cfg)),
            0x201..=0x27F => Some(pdo_string("RPDO1", frame.id - 0x200, data, cfg)),
            0x281..=0x2FF => Some(pdo_string("TPDO2", frame.id - 0x280, data, cfg)),
            0x301..=0x37F => Some(pdo_string("RPDO2", frame.id - 0x300, data, cfg)),
            0x381..=0x3FF => Some(pdo_string("TPDO3", frame.id - 0x380, data, cfg)),
            0x401..=0x47F => Some(pdo_string("RPDO3", frame.id - 0x400, data, cfg)),
            0x481..=0x4FF => Some(pdo_string("TPDO4", frame.id - 0x480, data, cfg)),
            0x501..=0x57F => Some(pdo_string("RPDO4", frame.id - 0x500, data, cfg)),
            0x581..=0x5FF => {
                sdo_node_string(SdoDirection::Tx, frame.id - SDO_TX_BASE, data, cfg)
            }
            0x601..=0x67F => {
                sdo_node_string(SdoDirection::Rx, frame.id - SDO_RX_BASE, data, cfg)
            }
            0x701..=0x77F => heartbeat_string(frame.id - HEARTBEAT_BASE, frame, cfg),
            _ => None,
        }
    }
}

fn labeled_dump(label: &str, data: &[u8], cfg: &DisplayConfig) -> String {
    let mut text: String = label.to_string();
    if !data.is_empty() {
        text.push_str("  Data:");
        text.push_str(&fmt::bytes_string(data, cfg));
    }
    text
}

fn nmt_string(data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let command: String = match data[0] {
        0x01 => "Start".to_string(),
        0x02 => "Stop".to_string(),
        0x80 => "PreOperational".to_string(),
        0x81 => "ResetNode".to_string(),
        0x82 => "ResetComm".to_string(),
        other => format!("Cmd:{}", fmt::value_string(other as u32, cfg)),
    };
    let node: String = if data[1] == 0 {
        "All".to_string()
    } else {
        fmt::value_string(data[1] as u32, cfg)
    };
    Some(format!("NMT {}  Node:{}", command, node))
}

fn emergency_string(node: u32, data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 3 {
        return None;
    }
    let code: u16 = fmt::word_from_le(&data[0..2]);
    let mut text: String = format!(
        "EMCY  Node:{}  Code:{}  Reg:{}",
        fmt::value_string(node, cfg),
        fmt::value_string(code as u32, cfg),
        fmt::value_string(data[2] as u32, cfg)
    );
    if data.len() > 3 {
        text.push_str("  Data:");
        text.push_str(&fmt::bytes_string(&data[3..], cfg));
    }
    Some(text)
}

fn pdo_string(window: &str, node: u32, data: &[u8], cfg: &DisplayConfig) -> String {
    let mut text: String = format!("{}  Node:{}", window, fmt::value_string(node, cfg));
    if !data.is_empty() {
        text.push_str("  Data:");
        text.push_str(&fmt::bytes_string(data, cfg));
    }
    text
}

fn sdo_node_string(
    direction: SdoDirection,
    node: u32,
    data: &[u8],
    cfg: &DisplayConfig,
) -> Option<String> {
    let body: String = sdo::sdo_string(direction, data, cfg)?;
    let tag: &str = match direction {
        SdoDirection::Tx => "Tx",
        SdoDirection::Rx => "Rx",
    };
    Some(format!(
        "SDO {}  Node:{}  {}",
        tag,
        fmt::value_string(node, cfg),
        body
    ))
}

/// Heartbeat state byte with the guard toggle bit masked out. A remote
/// request on this range is a node guard poll.
fn heartbeat_string(node: u32, frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
    if frame.is_rtr {
        return Some(format!("NodeGuard Req  Node:{}", fmt::value_string(node, cfg)));
    }
    let state_byte: u8 = *frame.payload().first()?;
    let state: String = match state_byte & 0x7F {
        0x00 => "BootUp".to_string(),
        0x04 => "Stopped".to_string(),
        0x05 => "OPERATIONAL".to_string(),
        0x7F => "PreOperational".to_string(),
        other => fmt::value_string(other as u32, cfg),
    };
    Some(format!(
        "Heartbeat  Node:{}  State:{}",
        fmt::value_string(node, cfg),
        state
    ))
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
    fn extended_frames_are_not_interpretable() {
        let mut frame = build_test_frame(0x705, &[0x05]);
        frame.is_extended = true;
        assert!(CanOpenDecoder.interpret(&frame, &hex()).is_none());
    }

    #[test]
    fn heartbeat_operational() {
        let frame = build_test_frame(0x705, &[0x05]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "Heartbeat  Node:5  State:OPERATIONAL");
    }

    #[test]
    fn heartbeat_masks_guard_toggle() {
        let frame = build_test_frame(0x712, &[0x85]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert!(text.ends_with("State:OPERATIONAL"), "{}", text);

        let frame = build_test_frame(0x712, &[0xFF]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert!(text.ends_with("State:PreOperational"), "{}", text);
    }

    #[test]
    fn heartbeat_boot_up() {
        let frame = build_test_frame(0x701, &[0x00]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "Heartbeat  Node:1  State:BootUp");
    }

    #[test]
    fn guard_request_is_remote_frame() {
        let mut frame = build_test_frame(0x77F, &[]);
        frame.is_rtr = true;
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "NodeGuard Req  Node:7F");
    }

    #[test]
    fn nmt_broadcast_and_single_node() {
        let frame = build_test_frame(0x000, &[0x01, 0x00]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "NMT Start  Node:All");

        let frame = build_test_frame(0x000, &[0x81, 0x20]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "NMT ResetNode  Node:20");
    }

    #[test]
    fn nmt_needs_command_and_node() {
        let frame = build_test_frame(0x000, &[0x01]);
        assert!(CanOpenDecoder.interpret(&frame, &hex()).is_none());
    }

    #[test]
    fn sync_with_and_without_counter() {
        let frame = build_test_frame(0x080, &[]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "SYNC");

        let frame = build_test_frame(0x080, &[0x07]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "SYNC  Data: 07");
    }

    #[test]
    fn emergency_code_is_little_endian() {
        let frame = build_test_frame(0x085, &[0x00, 0x10, 0x01, 0xAA, 0xBB]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "EMCY  Node:5  Code:1000  Reg:1  Data: AA  BB");
    }

    #[test]
    fn pdo_windows_resolve_to_node() {
        let frame = build_test_frame(0x182, &[0x11, 0x22]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "TPDO1  Node:2  Data: 11  22");

        let frame = build_test_frame(0x57F, &[]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "RPDO4  Node:7F");
    }

    #[test]
    fn sdo_ranges_carry_direction() {
        let frame =
            build_test_frame(0x585, &[0x43, 0x18, 0x10, 0x01, 0x78, 0x56, 0x34, 0x12]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "SDO Tx  Node:5  InitUpload Res Idx:1018.1  Val:12345678");

        let frame = build_test_frame(0x605, &[0x40, 0x18, 0x10, 0x01]);
        let text = CanOpenDecoder.interpret(&frame, &hex()).unwrap();
        assert_eq!(text, "SDO Rx  Node:5  InitUpload Req Idx:1018.1");
    }

    #[test]
    fn unassigned_ranges_are_not_interpretable() {
        let cfg = hex();
        for id in [0x101_u32, 0x180, 0x200, 0x280, 0x300, 0x580, 0x600, 0x680, 0x700, 0x780] {
            let frame = build_test_frame(id, &[0x05, 0x05]);
            assert!(
                CanOpenDecoder.interpret(&frame, &cfg).is_none(),
                "id {:X} interpreted",
                id
            );
        }
    }

    #[test]
    fn never_panics_across_identifier_space() {
        let cfg = hex();
        for id in 0..0x800_u32 {
            for bytes in [&[][..], &[0x05][..], &[0x2F, 0x17, 0x10, 0x02, 0x7F, 0, 0, 0][..]] {
                let frame = build_test_frame(id, bytes);
                let _ = CanOpenDecoder.interpret(&frame, &cfg);
            }
        }
    }
}

//! # transport
//!
//! J1939 transport protocol control decoding (TP.CM / TP.DT).
//!
//! Only the per-frame control fields are rendered here; no multi-packet
//! reassembly happens across calls. A connection-management frame carries
//! its control byte at offset 0 and the PGN of the transported message as
//! a 3-byte little-endian value at offsets 5..8.

use crate::fmt;
use crate::types::config::DisplayConfig;
use crate::types::frame::CanFrame;

const CONTROL_RTS: u8 = 0x10;
const CONTROL_CTS: u8 = 0x11;
const CONTROL_END_OF_MSG_ACK: u8 = 0x13;
const CONTROL_BAM: u8 = 0x20;
const CONTROL_ABORT: u8 = 0xFF;

/// Decodes a TP.CM (connection management) frame.
///
/// TP.CM frames are always 8 bytes on the wire; anything shorter is not
/// interpretable. Reserved control bytes are not interpretable either.
pub(crate) fn connection_management(frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
    let data: &[u8] = frame.payload();
    if data.len() < 8 {
        return None;
    }

    let message_pgn: u32 = fmt::dword_from_le(&data[5..8]);
    let pgn_text: String = fmt::value_string(message_pgn, cfg);

    match data[0] {
        CONTROL_RTS => {
            let size: u16 = fmt::word_from_le(&data[1..3]);
            Some(format!(
                "TP.CM_RTS  Size:{}  Packets:{}  MaxBurst:{}  PGN:{}",
                fmt::value_string(size as u32, cfg),
                fmt::value_string(data[3] as u32, cfg),
                burst_limit_string(data[4], cfg),
                pgn_text
            ))
        }
        CONTROL_CTS => Some(format!(
            "TP.CM_CTS  Packets:{}  Next:{}  PGN:{}",
            fmt::value_string(data[1] as u32, cfg),
            fmt::value_string(data[2] as u32, cfg),
            pgn_text
        )),
        CONTROL_END_OF_MSG_ACK => {
            let size: u16 = fmt::word_from_le(&data[1..3]);
            Some(format!(
                "TP.CM_EndOfMsgAck  Size:{}  Packets:{}  PGN:{}",
                fmt::value_string(size as u32, cfg),
                fmt::value_string(data[3] as u32, cfg),
                pgn_text
            ))
        }
        CONTROL_BAM => {
            let size: u16 = fmt::word_from_le(&data[1..3]);
            Some(format!(
                "TP.CM_BAM  Size:{}  Packets:{}  PGN:{}",
                fmt::value_string(size as u32, cfg),
                fmt::value_string(data[3] as u32, cfg),
                pgn_text
            ))
        }
        CONTROL_ABORT => Some(format!(
            "TP.Conn_Abort  Reason:{}  PGN:{}",
            abort_reason_string(data[1], cfg),
            pgn_text
        )),
        _ => None, // reserved control byte
    }
}

/// Decodes a TP.DT (data transfer) frame: sequence number plus up to 7
/// payload bytes.
pub(crate) fn data_transfer(frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
    let data: &[u8] = frame.payload();
    let (seq, rest) = data.split_first()?;
    let seq_text: String = fmt::value_string(*seq as u32, cfg);
    if rest.is_empty() {
        Some(format!("TP.DT  Seq:{}", seq_text))
    } else {
        Some(format!(
            "TP.DT  Seq:{}  Data:{}",
            seq_text,
            fmt::bytes_string(rest, cfg)
        ))
    }
}

fn burst_limit_string(value: u8, cfg: &DisplayConfig) -> String {
    // 0xFF: the sender does not limit packets per burst
    if value == 0xFF {
        "NoLimit".to_string()
    } else {
        fmt::value_string(value as u32, cfg)
    }
}

fn abort_reason_string(reason: u8, cfg: &DisplayConfig) -> String {
    match reason {
        1 => "Busy".to_string(),
        2 => "Resources".to_string(),
        3 => "Timeout".to_string(),
        other => format!("Reserved({})", fmt::value_string(other as u32, cfg)),
    }
}

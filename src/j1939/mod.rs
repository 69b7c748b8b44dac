//! # j1939
//!
//! SAE J1939 frame interpretation.
//!
//! The 29-bit identifier is decomposed into priority, PDU format, PDU
//! specific and source address. Five well-known peer-to-peer groups
//! (Request, Address Claimed, Acknowledgement, TP.CM, TP.DT) get bespoke
//! payload decoding; every other group goes through the static
//! [`pgn::PGN_TABLE`] lookup, falling back to a plain "PDU1"/"PDU2" label
//! so every extended frame produces a line.

pub mod name;
pub mod pgn;
mod transport;

use crate::decoder::ProtocolDecoder;
use crate::fmt;
use crate::types::config::DisplayConfig;
use crate::types::frame::CanFrame;
use name::J1939Name;

/// Acknowledgement (ACKM).
pub const PGN_ACKNOWLEDGEMENT: u16 = 0xE800;
/// Request (RQST).
pub const PGN_REQUEST: u16 = 0xEA00;
/// Transport protocol data transfer (TP.DT).
pub const PGN_TP_DT: u16 = 0xEB00;
/// Transport protocol connection management (TP.CM).
pub const PGN_TP_CM: u16 = 0xEC00;
/// Address Claimed / Cannot Claim (AC).
pub const PGN_ADDRESS_CLAIMED: u16 = 0xEE00;

/// Source address a node that failed to claim an address sends from.
const NULL_ADDRESS: u8 = 0xFE;

/// Decomposed view of a 29-bit J1939 identifier.
///
/// # Field semantics
///
/// ```text
/// | 3 bits   | 1 bit | 1 bit | 8 bits     | 8 bits       | 8 bits |
/// | priority | EDP   | DP    | PDU format | PDU specific | source |
/// ```
///
/// PDU format ≤ 0xEF is PDU1 (peer-to-peer): the PDU specific byte is a
/// destination address and is not part of the group number. PDU format ≥
/// 0xF0 is PDU2 (broadcast): the PDU specific byte is a group extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct J1939Id(pub u32);

impl J1939Id {
    /// Priority (3 bits, 0 highest).
    #[inline]
    pub const fn priority(&self) -> u8 {
        ((self.0 >> 26) & 0x07) as u8
    }

    /// PDU format byte.
    #[inline]
    pub const fn pdu_format(&self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// PDU specific byte (destination for PDU1, group extension for PDU2).
    #[inline]
    pub const fn pdu_specific(&self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Source address of the sending node.
    #[inline]
    pub const fn source_address(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// `true` for peer-to-peer (PDU1) identifiers.
    #[inline]
    pub const fn is_pdu1(&self) -> bool {
        self.pdu_format() <= 0xEF
    }

    /// 16-bit parameter group number as used by the reference table.
    ///
    /// For PDU1 the destination byte is masked out of the group number.
    pub const fn pgn(&self) -> u16 {
        let raw: u16 = ((self.0 >> 8) & 0xFFFF) as u16;
        if self.is_pdu1() { raw & 0xFF00 } else { raw }
    }

    /// Destination address, present only for PDU1 identifiers.
    pub const fn destination(&self) -> Option<u8> {
        if self.is_pdu1() {
            Some(self.pdu_specific())
        } else {
            None
        }
    }
}

/// SAE J1939 decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct J1939Decoder;

impl ProtocolDecoder for J1939Decoder {
    fn name(&self) -> &'static str {
        "J1939"
    }

    fn interpret(&self, frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
        if !frame.is_extended {
            return None;
        }
        let id = J1939Id(frame.id);

        let body: String = match id.pgn() {
            PGN_REQUEST => request_string(frame, cfg)?,
            PGN_ACKNOWLEDGEMENT => acknowledgement_string(frame, cfg)?,
            PGN_TP_CM => transport::connection_management(frame, cfg)?,
            PGN_TP_DT => transport::data_transfer(frame, cfg)?,
            PGN_ADDRESS_CLAIMED => address_claimed_string(&id, frame, cfg),
            _ => group_string(&id, frame, cfg),
        };

        Some(format!("{}{}", body, id_suffix(&id, cfg)))
    }
}

/// Address fields every J1939 line ends with.
fn id_suffix(id: &J1939Id, cfg: &DisplayConfig) -> String {
    let mut out: String = format!("  SA:{}", fmt::value_string(id.source_address() as u32, cfg));
    if let Some(da) = id.destination() {
        out.push_str(&format!("  DA:{}", fmt::value_string(da as u32, cfg)));
    }
    out.push_str(&format!("  P:{}", id.priority()));
    out
}

/// Generic group rendering: table mnemonic or PDU1/PDU2 label plus data.
fn group_string(id: &J1939Id, frame: &CanFrame, cfg: &DisplayConfig) -> String {
    let label: &str = match pgn::lookup(id.pgn()) {
        Some(entry) => entry.mnemonic,
        None if id.is_pdu1() => "PDU1",
        None => "PDU2",
    };
    if frame.dlc == 0 {
        label.to_string()
    } else {
        format!("{}  Data:{}", label, fmt::data_string(frame, cfg))
    }
}

/// Request (PGN 0xEA00): 3-byte little-endian requested group number.
fn request_string(frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
    let data: &[u8] = frame.payload();
    if data.len() < 3 {
        return None;
    }
    let requested: u32 = fmt::dword_from_le(&data[0..3]);
    let mut out: String = format!("Request  PGN:{}", fmt::value_string(requested, cfg));
    if requested <= 0xFFFF {
        if let Some(entry) = pgn::lookup(requested as u16) {
            out.push_str(&format!(" ({})", entry.mnemonic));
        }
    }
    Some(out)
}

/// Acknowledgement (PGN 0xE800): control byte, group function, and the
/// acknowledged group number at offsets 5..8.
fn acknowledgement_string(frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
    let data: &[u8] = frame.payload();
    if data.len() < 8 {
        return None;
    }
    let control: String = match data[0] {
        0 => "ACK".to_string(),
        1 => "NACK".to_string(),
        2 => "Access Denied".to_string(),
        3 => "Cannot Respond".to_string(),
        other => format!("Control:{}", fmt::value_string(other as u32, cfg)),
    };
    let acknowledged: u32 = fmt::dword_from_le(&data[5..8]);
    Some(format!(
        "Ack  {}  GF:{}  PGN:{}",
        control,
        fmt::value_string(data[1] as u32, cfg),
        fmt::value_string(acknowledged, cfg)
    ))
}

/// Address Claimed (PGN 0xEE00): 64-bit NAME field decomposition. A claim
/// sent from the null address is a Cannot Claim.
fn address_claimed_string(id: &J1939Id, frame: &CanFrame, cfg: &DisplayConfig) -> String {
    let label: &str = if id.source_address() == NULL_ADDRESS {
        "Cannot Claim"
    } else {
        "Address Claimed"
    };
    let name: J1939Name = J1939Name::from_payload(frame.payload());
    format!(
        "{}  NAME[AAC:{} IG:{} VSI:{} VS:{} FUNC:{} FI:{} ECU:{} MC:{} ID:{}]",
        label,
        u8::from(name.is_arbitrary_address_capable()),
        fmt::value_string(name.industry_group() as u32, cfg),
        fmt::value_string(name.vehicle_system_instance() as u32, cfg),
        fmt::value_string(name.vehicle_system() as u32, cfg),
        fmt::value_string(name.function() as u32, cfg),
        fmt::value_string(name.function_instance() as u32, cfg),
        fmt::value_string(name.ecu_instance() as u32, cfg),
        fmt::value_string(name.manufacturer_code() as u32, cfg),
        fmt::value_string(name.identity_number(), cfg)
    )
}

//! # opensyde
//!
//! Diagnostic protocol variant in the openSYDE style.
//!
//! Interpretation happens in three layers. The CAN identifier is first
//! disassembled into source/target addressing ([`addressing`]), then the
//! top nibble of the first payload byte selects the transport frame kind
//! (single, first, consecutive, flow control, and two vendor kinds), and
//! finally single and first frames hand their payload to the service
//! decoder ([`services`]).
//!
//! A nibble value no frame kind claims still produces an interpreted
//! string naming the unknown type; only frames that fail addressing or a
//! length contract are reported as not interpretable.

pub mod addressing;
pub mod data_ids;
pub mod routines;
mod services;

use crate::decoder::ProtocolDecoder;
use crate::fmt;
use crate::types::config::DisplayConfig;
use crate::types::frame::CanFrame;

const PCI_SINGLE: u8 = 0x0;
const PCI_FIRST: u8 = 0x1;
const PCI_CONSECUTIVE: u8 = 0x2;
const PCI_FLOW_CONTROL: u8 = 0x3;
const PCI_VENDOR_SINGLE: u8 = 0xE;
const PCI_VENDOR_MULTI: u8 = 0xF;

const VENDOR_SUB_EVENT_DATA: u8 = 0x00;
const VENDOR_SUB_EVENT_ERROR: u8 = 0x01;

/// Decoder for the openSYDE diagnostic protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenSydeDecoder;

impl ProtocolDecoder for OpenSydeDecoder {
    fn name(&self) -> &'static str {
        "openSYDE"
    }

    fn interpret(&self, frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
        if !frame.is_extended {
            return None;
        }
        let info: addressing::AddressInfo = addressing::disassemble(frame.id)?;
        let data: &[u8] = frame.payload();
        let first: u8 = *data.first()?;

        let body: String = match first >> 4 {
            PCI_SINGLE => single_frame(data, cfg)?,
            PCI_FIRST => first_frame(data, cfg)?,
            PCI_CONSECUTIVE => consecutive_frame(data, cfg),
            PCI_FLOW_CONTROL => flow_control(data, cfg)?,
            PCI_VENDOR_SINGLE => vendor_single(data, cfg)?,
            PCI_VENDOR_MULTI => vendor_multi(data, cfg),
            nibble => format!(
                "Unknown frame type  PCI:{}",
                fmt::value_string(nibble as u32, cfg)
            ),
        };
        Some(format!(
            "{} {}",
            addressing::address_string(&info, cfg),
            body
        ))
    }
}

fn single_frame(data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    let len: usize = (data[0] & 0x0F) as usize;
    if len == 0 || data.len() < 1 + len {
        return None;
    }
    let service: String = services::service_string(&data[1..1 + len], cfg)?;
    Some(format!("SF {}", service))
}

fn first_frame(data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let total: u16 = u16::from(data[0] & 0x0F) << 8 | u16::from(data[1]);
    let service: String = services::service_string(&data[2..], cfg)?;
    Some(format!(
        "FF Size:{} {}",
        fmt::value_string(total as u32, cfg),
        service
    ))
}

fn consecutive_frame(data: &[u8], cfg: &DisplayConfig) -> String {
    let mut text: String = format!(
        "CF Seq:{}",
        fmt::value_string((data[0] & 0x0F) as u32, cfg)
    );
    if data.len() > 1 {
        text.push_str("  Data:");
        text.push_str(&fmt::bytes_string(&data[1..], cfg));
    }
    text
}

fn flow_control(data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 3 {
        return None;
    }
    let status: String = match data[0] & 0x0F {
        0x0 => "CTS".to_string(),
        0x1 => "WAIT".to_string(),
        0x2 => "OVFLW".to_string(),
        other => fmt::value_string(other as u32, cfg),
    };
    Some(format!(
        "FC {}  BS:{}  STmin:{}",
        status,
        fmt::value_string(data[1] as u32, cfg),
        fmt::value_string(data[2] as u32, cfg)
    ))
}

/// Vendor single frame: sub-dispatch on the second byte. Event-driven
/// responses carry a big-endian data identifier.
fn vendor_single(data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    match data[1] {
        VENDOR_SUB_EVENT_DATA => {
            if data.len() < 4 {
                return None;
            }
            let id: u16 = fmt::word_from_be(&data[2..4]);
            let mut text: String =
                format!("EventData Id:{}", fmt::value_string(id as u32, cfg));
            if data.len() > 4 {
                text.push_str("  Data:");
                text.push_str(&fmt::bytes_string(&data[4..], cfg));
            }
            Some(text)
        }
        VENDOR_SUB_EVENT_ERROR => {
            if data.len() < 5 {
                return None;
            }
            let id: u16 = fmt::word_from_be(&data[2..4]);
            Some(format!(
                "EventError Id:{}  NRC:{}",
                fmt::value_string(id as u32, cfg),
                services::nrc_string(data[4], cfg)
            ))
        }
        sub => {
            let mut text: String =
                format!("VendorSF Sub:{}", fmt::value_string(sub as u32, cfg));
            if data.len() > 2 {
                text.push_str("  Data:");
                text.push_str(&fmt::bytes_string(&data[2..], cfg));
            }
            Some(text)
        }
    }
}

fn vendor_multi(data: &[u8], cfg: &DisplayConfig) -> String {
    let mut text: String = format!(
        "VendorMF Cnt:{}",
        fmt::value_string((data[0] & 0x0F) as u32, cfg)
    );
    if data.len() > 1 {
        text.push_str("  Data:");
        text.push_str(&fmt::bytes_string(&data[1..], cfg));
    }
    text
}

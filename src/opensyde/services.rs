//! # services
//!
//! Diagnostic service payload decoding.
//!
//! The first service byte is the service identifier; bit 6 marks a
//! response. Every service checks its own minimum length once, before any
//! field is read; a violation makes the whole frame not interpretable.
//! Bytes after the fields a service defines are never dropped, they are
//! appended as a raw dump.

use crate::fmt;
use crate::opensyde::{data_ids, routines};
use crate::types::config::DisplayConfig;

const SID_NEGATIVE_RESPONSE: u8 = 0x7F;
const RESPONSE_BIT: u8 = 0x40;

/// Decodes one service payload (the bytes after the PCI prefix).
///
/// `None` means the service identifier is unknown or the payload violates
/// the service's minimum length.
pub(crate) fn service_string(data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    let sid: u8 = *data.first()?;
    if sid == SID_NEGATIVE_RESPONSE {
        return negative_response(data, cfg);
    }

    let response: bool = sid & RESPONSE_BIT != 0;
    match sid & !RESPONSE_BIT {
        0x10 => session_control(data, response, cfg),
        0x11 => ecu_reset(data, response, cfg),
        0x22 => data_by_id("ReadDataById", data, response, response, cfg),
        0x23 => memory_by_address("ReadMemByAddr", data, response, cfg),
        0x27 => security_access(data, response, cfg),
        0x2E => data_by_id("WriteDataById", data, response, !response, cfg),
        0x31 => routine_control(data, response, cfg),
        0x34 => plain_service("RequestDownload", 1, data, response, cfg),
        0x35 => plain_service("RequestUpload", 1, data, response, cfg),
        0x36 => transfer_data(data, response, cfg),
        0x37 => plain_service("TransferExit", 1, data, response, cfg),
        0x3D => memory_by_address("WriteMemByAddr", data, response, cfg),
        0x3E => tester_present(data, response, cfg),
        0xBA => data_pool("ReadDataPool", data, response, cfg),
        0xBB => data_pool("WriteDataPool", data, response, cfg),
        0xBC => plain_service("ReadSerialNumber", 1, data, response, cfg),
        _ => None,
    }
}

/// Name a request service identifier resolves to, for negative responses.
fn service_name(sid: u8) -> Option<&'static str> {
    match sid & !RESPONSE_BIT {
        0x10 => Some("DiagSessionControl"),
        0x11 => Some("EcuReset"),
        0x22 => Some("ReadDataById"),
        0x23 => Some("ReadMemByAddr"),
        0x27 => Some("SecurityAccess"),
        0x2E => Some("WriteDataById"),
        0x31 => Some("RoutineControl"),
        0x34 => Some("RequestDownload"),
        0x35 => Some("RequestUpload"),
        0x36 => Some("TransferData"),
        0x37 => Some("TransferExit"),
        0x3D => Some("WriteMemByAddr"),
        0x3E => Some("TesterPresent"),
        0xBA => Some("ReadDataPool"),
        0xBB => Some("WriteDataPool"),
        0xBC => Some("ReadSerialNumber"),
        _ => None,
    }
}

/// Negative response code text, also used by the event-driven error frame.
pub(crate) fn nrc_string(nrc: u8, cfg: &DisplayConfig) -> String {
    let name: &str = match nrc {
        0x10 => "GeneralReject",
        0x11 => "ServiceNotSupported",
        0x12 => "SubFunctionNotSupported",
        0x13 => "IncorrectLengthOrFormat",
        0x14 => "ResponseTooLong",
        0x21 => "BusyRepeatRequest",
        0x22 => "ConditionsNotCorrect",
        0x24 => "RequestSequenceError",
        0x25 => "NoResponseFromSubnet",
        0x26 => "FailurePreventsExecution",
        0x31 => "RequestOutOfRange",
        0x33 => "SecurityAccessDenied",
        0x35 => "InvalidKey",
        0x36 => "ExceededNumberOfAttempts",
        0x37 => "RequiredTimeDelayNotExpired",
        0x70 => "UploadDownloadNotAccepted",
        0x71 => "TransferDataSuspended",
        0x72 => "GeneralProgrammingFailure",
        0x73 => "WrongBlockSequenceCounter",
        0x78 => "ResponsePending",
        0x7E => "SubFunctionNotSupportedInSession",
        0x7F => "ServiceNotSupportedInSession",
        _ => return fmt::value_string(nrc as u32, cfg),
    };
    name.to_string()
}

fn dir(response: bool) -> &'static str {
    if response { "Res" } else { "Req" }
}

/// Appends unconsumed bytes as a raw dump.
fn with_trailing(mut text: String, rest: &[u8], cfg: &DisplayConfig) -> String {
    if !rest.is_empty() {
        text.push_str("  Data:");
        text.push_str(&fmt::bytes_string(rest, cfg));
    }
    text
}

fn negative_response(data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 3 {
        return None;
    }
    let failed: String = match service_name(data[1]) {
        Some(name) => name.to_string(),
        None => format!("SID:{}", fmt::value_string(data[1] as u32, cfg)),
    };
    let text: String = format!("NegResponse {}  NRC:{}", failed, nrc_string(data[2], cfg));
    Some(with_trailing(text, &data[3..], cfg))
}

fn session_control(data: &[u8], response: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let session: u8 = data[1] & 0x7F;
    let session_text: String = match session {
        0x01 => "Default".to_string(),
        0x02 => "Programming".to_string(),
        0x03 => "Extended".to_string(),
        0x60 => "Preprogramming".to_string(),
        other => fmt::value_string(other as u32, cfg),
    };
    let mut text: String = format!("DiagSessionControl {} Session:{}", dir(response), session_text);
    if data[1] & 0x80 != 0 {
        text.push_str("  SuppressResponse");
    }
    Some(with_trailing(text, &data[2..], cfg))
}

fn ecu_reset(data: &[u8], response: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let reset: u8 = data[1] & 0x7F;
    let reset_text: String = match reset {
        0x01 => "Hard".to_string(),
        0x02 => "KeyOffOn".to_string(),
        0x03 => "Soft".to_string(),
        other => fmt::value_string(other as u32, cfg),
    };
    let mut text: String = format!("EcuReset {} Type:{}", dir(response), reset_text);
    if data[1] & 0x80 != 0 {
        text.push_str("  SuppressResponse");
    }
    Some(with_trailing(text, &data[2..], cfg))
}

/// Shared by read (value in the response) and write (value in the request).
fn data_by_id(
    name: &str,
    data: &[u8],
    response: bool,
    value_present: bool,
    cfg: &DisplayConfig,
) -> Option<String> {
    if data.len() < 3 {
        return None;
    }
    let did: u16 = fmt::word_from_be(&data[1..3]);
    let did_label: String = data_ids::label(did, cfg);
    let mut text: String = format!("{} {} {}", name, dir(response), did_label);
    let rest: &[u8] = &data[3..];
    if value_present && !rest.is_empty() {
        let render = data_ids::lookup(did)
            .map(|entry| entry.render)
            .unwrap_or(data_ids::DidRender::Raw);
        text.push_str(" = ");
        text.push_str(&data_ids::render_value(render, rest, cfg));
        Some(text)
    } else {
        Some(with_trailing(text, rest, cfg))
    }
}

fn security_access(data: &[u8], response: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let access: u8 = data[1];
    let (kind, level): (&str, u8) = if access % 2 == 1 {
        ("Seed", access)
    } else {
        ("Key", access.wrapping_sub(1))
    };
    let mut text: String = format!(
        "SecurityAccess {} {} Level:{}",
        dir(response),
        kind,
        fmt::value_string(level as u32, cfg)
    );
    let rest: &[u8] = &data[2..];
    if rest.len() == 4 {
        text.push_str(&format!("  Val:{}", fmt::value_string(fmt::dword_from_be(rest), cfg)));
        Some(text)
    } else {
        Some(with_trailing(text, rest, cfg))
    }
}

fn routine_control(data: &[u8], response: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let sub_text: String = match data[1] {
        0x01 => "Start".to_string(),
        0x02 => "Stop".to_string(),
        0x03 => "Results".to_string(),
        other => fmt::value_string(other as u32, cfg),
    };
    let routine: u16 = fmt::word_from_be(&data[2..4]);
    let text: String = format!(
        "RoutineControl {} {} {}",
        dir(response),
        sub_text,
        routines::label(routine, cfg)
    );
    Some(with_trailing(text, &data[4..], cfg))
}

fn transfer_data(data: &[u8], response: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let text: String = format!(
        "TransferData {} Block:{}",
        dir(response),
        fmt::value_string(data[1] as u32, cfg)
    );
    Some(with_trailing(text, &data[2..], cfg))
}

fn tester_present(data: &[u8], response: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 2 {
        return None;
    }
    let mut text: String = format!("TesterPresent {}", dir(response));
    if data[1] & 0x80 != 0 {
        text.push_str("  SuppressResponse");
    }
    Some(with_trailing(text, &data[2..], cfg))
}

/// Memory read/write: the request carries a format byte (address length in
/// the low nibble, size length in the high nibble) followed by big-endian
/// address and size. Responses carry unstructured data.
fn memory_by_address(name: &str, data: &[u8], response: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.is_empty() {
        return None;
    }
    if response {
        let text: String = format!("{} Res", name);
        return Some(with_trailing(text, &data[1..], cfg));
    }

    if data.len() < 2 {
        return None;
    }
    let addr_len: usize = (data[1] & 0x0F) as usize;
    let size_len: usize = (data[1] >> 4) as usize;
    if addr_len == 0 || addr_len > 4 || size_len == 0 || size_len > 4 {
        // unusual format byte, keep the fields visible as a dump
        let text: String = format!(
            "{} Req Format:{}",
            name,
            fmt::value_string(data[1] as u32, cfg)
        );
        return Some(with_trailing(text, &data[2..], cfg));
    }
    if data.len() < 2 + addr_len + size_len {
        return None;
    }
    let address: u32 = fmt::dword_from_be(&data[2..2 + addr_len]);
    let size: u32 = fmt::dword_from_be(&data[2 + addr_len..2 + addr_len + size_len]);
    let text: String = format!(
        "{} Req Addr:{} Size:{}",
        name,
        fmt::value_string(address, cfg),
        fmt::value_string(size, cfg)
    );
    Some(with_trailing(text, &data[2 + addr_len + size_len..], cfg))
}

/// Data pool element access: pool, list and element index bytes.
fn data_pool(name: &str, data: &[u8], response: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let text: String = format!(
        "{} {} Pool:{} List:{} Elem:{}",
        name,
        dir(response),
        fmt::value_string(data[1] as u32, cfg),
        fmt::value_string(data[2] as u32, cfg),
        fmt::value_string(data[3] as u32, cfg)
    );
    Some(with_trailing(text, &data[4..], cfg))
}

/// Services rendered as name plus raw dump of everything after the
/// identifier.
fn plain_service(
    name: &str,
    min_len: usize,
    data: &[u8],
    response: bool,
    cfg: &DisplayConfig,
) -> Option<String> {
    if data.len() < min_len {
        return None;
    }
    let text: String = format!("{} {}", name, dir(response));
    Some(with_trailing(text, &data[1..], cfg))
}

//! Service data object decode.
//!
//! The command specifier sits in the top 3 bits of the first byte and its
//! meaning depends on the transfer direction, so the caller tells us
//! whether the frame came from the server (Tx) or the client (Rx) range.

use crate::fmt;
use crate::types::config::DisplayConfig;

/// Which SDO identifier range the frame was seen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SdoDirection {
    /// Server to client, 0x580 + node.
    Tx,
    /// Client to server, 0x600 + node.
    Rx,
}

const CS_ABORT: u8 = 4;

/// One abort code with its short name.
struct AbortEntry {
    code: u32,
    name: &'static str,
}

const fn abort(code: u32, name: &'static str) -> AbortEntry {
    AbortEntry { code, name }
}

/// Abort codes, sorted ascending by code.
static ABORT_TABLE: &[AbortEntry] = &[
    abort(0x0503_0000, "ToggleNotAlternated"),
    abort(0x0504_0000, "SdoTimeout"),
    abort(0x0504_0001, "InvalidCommand"),
    abort(0x0504_0002, "InvalidBlockSize"),
    abort(0x0504_0003, "InvalidSequence"),
    abort(0x0504_0004, "CrcError"),
    abort(0x0504_0005, "OutOfMemory"),
    abort(0x0601_0000, "UnsupportedAccess"),
    abort(0x0601_0001, "WriteOnlyObject"),
    abort(0x0601_0002, "ReadOnlyObject"),
    abort(0x0602_0000, "NoSuchObject"),
    abort(0x0604_0041, "NotMappable"),
    abort(0x0604_0042, "PdoLengthExceeded"),
    abort(0x0604_0043, "ParameterIncompatibility"),
    abort(0x0604_0047, "InternalIncompatibility"),
    abort(0x0606_0000, "HardwareError"),
    abort(0x0607_0010, "LengthMismatch"),
    abort(0x0607_0012, "LengthTooHigh"),
    abort(0x0607_0013, "LengthTooLow"),
    abort(0x0609_0011, "NoSuchSubIndex"),
    abort(0x0609_0030, "ValueRangeExceeded"),
    abort(0x0609_0031, "ValueTooHigh"),
    abort(0x0609_0032, "ValueTooLow"),
    abort(0x0609_0036, "MaxLessThanMin"),
    abort(0x060A_0023, "ResourceNotAvailable"),
    abort(0x0800_0000, "GeneralError"),
    abort(0x0800_0020, "TransferAborted"),
    abort(0x0800_0021, "LocalControl"),
    abort(0x0800_0022, "DeviceState"),
    abort(0x0800_0023, "NoObjectDictionary"),
    abort(0x0800_0024, "NoDataAvailable"),
];

fn abort_string(code: u32, cfg: &DisplayConfig) -> String {
    match ABORT_TABLE.binary_search_by_key(&code, |entry| entry.code) {
        Ok(index) => ABORT_TABLE[index].name.to_string(),
        Err(_) => fmt::value_string(code, cfg),
    }
}

/// Decodes one SDO payload seen on the given identifier range.
pub(crate) fn sdo_string(
    direction: SdoDirection,
    data: &[u8],
    cfg: &DisplayConfig,
) -> Option<String> {
    let command: u8 = *data.first()?;
    let cs: u8 = command >> 5;
    if cs == CS_ABORT {
        return abort_transfer(data, cfg);
    }
    match (direction, cs) {
        (SdoDirection::Rx, 1) => initiate("InitDownload Req", data, true, cfg),
        (SdoDirection::Tx, 3) => initiate("InitDownload Res", data, false, cfg),
        (SdoDirection::Rx, 2) => initiate("InitUpload Req", data, false, cfg),
        (SdoDirection::Tx, 2) => initiate("InitUpload Res", data, true, cfg),
        (SdoDirection::Rx, 0) => segment("DownloadSeg Req", data, true, cfg),
        (SdoDirection::Tx, 1) => segment("DownloadSeg Res", data, false, cfg),
        (SdoDirection::Rx, 3) => segment("UploadSeg Req", data, false, cfg),
        (SdoDirection::Tx, 0) => segment("UploadSeg Res", data, true, cfg),
        _ => None,
    }
}

fn multiplexer_string(data: &[u8], cfg: &DisplayConfig) -> String {
    let index: u16 = fmt::word_from_le(&data[1..3]);
    format!(
        "Idx:{}.{}",
        fmt::value_string(index as u32, cfg),
        fmt::value_string(data[3] as u32, cfg)
    )
}

/// Initiate frames carry the multiplexer; when `carries_value` the command
/// byte's e/s flags may add an expedited value or a byte count.
fn initiate(name: &str, data: &[u8], carries_value: bool, cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 4 {
        return None;
    }
    let mut text: String = format!("{} {}", name, multiplexer_string(data, cfg));
    if !carries_value {
        return Some(text);
    }

    let command: u8 = data[0];
    let expedited: bool = command & 0x02 != 0;
    let size_indicated: bool = command & 0x01 != 0;
    if !expedited && !size_indicated {
        return Some(text);
    }
    // e or s set means the 4-byte data area must be present
    if data.len() < 8 {
        return None;
    }
    if expedited {
        let unused: usize = if size_indicated {
            ((command >> 2) & 0x03) as usize
        } else {
            0
        };
        let value: u32 = fmt::dword_from_le(&data[4..8 - unused]);
        text.push_str(&format!("  Val:{}", fmt::value_string(value, cfg)));
    } else {
        let size: u32 = fmt::dword_from_le(&data[4..8]);
        text.push_str(&format!("  Size:{}", fmt::value_string(size, cfg)));
    }
    Some(text)
}

/// Segment frames carry the toggle bit; data-bearing directions append the
/// segment bytes and flag the final segment.
fn segment(name: &str, data: &[u8], carries_value: bool, cfg: &DisplayConfig) -> Option<String> {
    let command: u8 = data[0];
    let toggle: u8 = (command >> 4) & 0x01;
    let mut text: String = format!("{} Tgl:{}", name, toggle);
    if carries_value {
        if command & 0x01 != 0 {
            text.push_str("  Last");
        }
        if data.len() > 1 {
            text.push_str("  Data:");
            text.push_str(&fmt::bytes_string(&data[1..], cfg));
        }
    }
    Some(text)
}

fn abort_transfer(data: &[u8], cfg: &DisplayConfig) -> Option<String> {
    if data.len() < 8 {
        return None;
    }
    let code: u32 = fmt::dword_from_le(&data[4..8]);
    Some(format!(
        "Abort {}  {}",
        multiplexer_string(data, cfg),
        abort_string(code, cfg)
    ))
}

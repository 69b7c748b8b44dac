//! # data_ids
//!
//! Data identifier reference table for the read/write-by-identifier
//! services. Each identifier names a value and the shape its payload is
//! rendered in. Identifiers not listed here still decode: the caller
//! shows the numeric identifier and a raw byte dump.

use crate::fmt;
use crate::types::config::DisplayConfig;

/// Payload rendering shape of a data identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DidRender {
    /// Printable text, quoted; non-printable bytes become `.`.
    Ascii,
    /// 3-byte major/minor/release version.
    Version,
    /// Single byte, numeric.
    Byte,
    /// 16-bit big-endian, numeric.
    Word,
    /// 32-bit big-endian, numeric.
    Dword,
    /// Single byte, `ON`/`OFF`.
    Flag,
    /// 6-byte packed serial number.
    Serial,
    /// Plain byte dump.
    Raw,
}

/// One row of the data identifier table.
#[derive(Debug, Clone, Copy)]
pub struct DidEntry {
    pub did: u16,
    pub name: &'static str,
    pub render: DidRender,
}

const fn row(did: u16, name: &'static str, render: DidRender) -> DidEntry {
    DidEntry { did, name, render }
}

/// Known data identifiers, sorted ascending, no duplicates.
pub static DID_TABLE: &[DidEntry] = &[
    row(0xA800, "DeviceName", DidRender::Ascii),
    row(0xA801, "ApplicationName", DidRender::Ascii),
    row(0xA802, "ApplicationVersion", DidRender::Version),
    row(0xA805, "ProtocolVersion", DidRender::Version),
    row(0xA806, "FlashloaderVersion", DidRender::Version),
    row(0xA807, "FlashCount", DidRender::Dword),
    row(0xA808, "SerialNumberExt", DidRender::Serial),
    row(0xA80A, "EcuArticleNumber", DidRender::Ascii),
    row(0xA80B, "EcuArticleVersion", DidRender::Ascii),
    row(0xA80C, "CertificateSerialNumber", DidRender::Raw),
    row(0xA80D, "SecurityActivation", DidRender::Flag),
    row(0xA80E, "DebuggerActivation", DidRender::Flag),
    row(0xA80F, "SecurityKey", DidRender::Raw),
    row(0xA810, "MaxBlockLength", DidRender::Word),
    row(0xA811, "SessionTimeout", DidRender::Word),
    row(0xF180, "BootSoftwareId", DidRender::Ascii),
    row(0xF181, "ApplicationSoftwareId", DidRender::Ascii),
    row(0xF182, "ApplicationDataId", DidRender::Ascii),
    row(0xF186, "ActiveDiagSession", DidRender::Byte),
    row(0xF187, "SparePartNumber", DidRender::Ascii),
    row(0xF188, "EcuSoftwareNumber", DidRender::Ascii),
    row(0xF189, "EcuSoftwareVersion", DidRender::Version),
    row(0xF18A, "SystemSupplierId", DidRender::Ascii),
    row(0xF18B, "ManufacturingDate", DidRender::Raw),
    row(0xF18C, "EcuSerialNumber", DidRender::Serial),
    row(0xF190, "Vin", DidRender::Ascii),
    row(0xF192, "HardwareNumber", DidRender::Ascii),
    row(0xF193, "HardwareVersion", DidRender::Version),
    row(0xF197, "SystemName", DidRender::Ascii),
    row(0xF199, "ProgrammingDate", DidRender::Raw),
];

/// Finds the table entry for an exact data identifier.
pub fn lookup(did: u16) -> Option<&'static DidEntry> {
    DID_TABLE
        .binary_search_by_key(&did, |entry| entry.did)
        .ok()
        .map(|index| &DID_TABLE[index])
}

/// Display label for a data identifier: table name or the numeric value.
pub fn label(did: u16, cfg: &DisplayConfig) -> String {
    match lookup(did) {
        Some(entry) => entry.name.to_string(),
        None => format!("DID:{}", fmt::value_string(did as u32, cfg)),
    }
}

/// Renders a data identifier's value bytes in its table shape.
///
/// A payload that does not fit the declared shape (wrong length) falls
/// back to the raw dump; no value bytes are ever dropped.
pub fn render_value(render: DidRender, bytes: &[u8], cfg: &DisplayConfig) -> String {
    match render {
        DidRender::Ascii => ascii_string(bytes),
        DidRender::Version if bytes.len() == 3 => {
            format!("V{}.{}r{}", bytes[0], bytes[1], bytes[2])
        }
        DidRender::Byte if bytes.len() == 1 => fmt::value_string(bytes[0] as u32, cfg),
        DidRender::Word if bytes.len() == 2 => {
            fmt::value_string(fmt::word_from_be(bytes) as u32, cfg)
        }
        DidRender::Dword if bytes.len() == 4 => fmt::value_string(fmt::dword_from_be(bytes), cfg),
        DidRender::Flag if bytes.len() == 1 => {
            if bytes[0] == 0 { "OFF" } else { "ON" }.to_string()
        }
        DidRender::Serial if bytes.len() == 6 => serial_string(bytes),
        _ => fmt::bytes_string(bytes, cfg),
    }
}

fn ascii_string(bytes: &[u8]) -> String {
    let text: String = bytes
        .iter()
        .map(|b| {
            if b.is_ascii_graphic() || *b == b' ' {
                *b as char
            } else {
                '.'
            }
        })
        .collect();
    format!("\"{}\"", text)
}

/// Packed serial numbers print as one hex run, e.g. `SN:05123456789A`.
fn serial_string(bytes: &[u8]) -> String {
    let mut out: String = String::from("SN:");
    for b in bytes {
        out.push_str(&format!("{:02X}", b));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex() -> DisplayConfig {
        DisplayConfig::default()
    }

    #[test]
    fn table_is_strictly_ascending() {
        for pair in DID_TABLE.windows(2) {
            assert!(pair[0].did < pair[1].did, "order broken at {:#06X}", pair[1].did);
        }
    }

    #[test]
    fn every_entry_is_found() {
        for entry in DID_TABLE {
            assert_eq!(lookup(entry.did).map(|e| e.name), Some(entry.name));
        }
    }

    #[test]
    fn unknown_did_labels_numerically() {
        assert!(lookup(0x1234).is_none());
        assert_eq!(label(0x1234, &hex()), "DID:1234");
    }

    #[test]
    fn version_render() {
        assert_eq!(
            render_value(DidRender::Version, &[1, 12, 3], &hex()),
            "V1.12r3"
        );
        // wrong length falls back to the dump
        assert_eq!(render_value(DidRender::Version, &[1, 12], &hex()), " 01  0C");
    }

    #[test]
    fn ascii_render_replaces_unprintable() {
        assert_eq!(
            render_value(DidRender::Ascii, b"ESX-3\x00", &hex()),
            "\"ESX-3.\""
        );
    }

    #[test]
    fn flag_and_serial_render() {
        assert_eq!(render_value(DidRender::Flag, &[0], &hex()), "OFF");
        assert_eq!(render_value(DidRender::Flag, &[2], &hex()), "ON");
        assert_eq!(
            render_value(DidRender::Serial, &[0x05, 0x12, 0x34, 0x56, 0x78, 0x9A], &hex()),
            "SN:05123456789A"
        );
    }

    #[test]
    fn numeric_renders() {
        assert_eq!(render_value(DidRender::Byte, &[0x03], &hex()), "3");
        assert_eq!(render_value(DidRender::Word, &[0x01, 0x00], &hex()), "100");
        assert_eq!(
            render_value(DidRender::Dword, &[0x00, 0x01, 0x00, 0x00], &hex()),
            "10000"
        );
    }
}

//! # flashloader
//!
//! Flashloader command/response protocol variant.
//!
//! The master transmits on the configured send identifier and the node
//! answers on send identifier + 1. Apart from the ASCII `FLASH` wake-up,
//! every frame is `[node, group, sub, args...]` and is matched against a
//! declarative command table keyed by (group, sub, direction). Each row
//! fixes the exact frame length; a known command at any other length is
//! not interpretable, there are no partial decodes.

use tracing::debug;

use crate::decoder::ProtocolDecoder;
use crate::fmt;
use crate::params::ParamStore;
use crate::types::config::DisplayConfig;
use crate::types::errors::StoreError;
use crate::types::frame::CanFrame;

const KEY_SEND_ID: &str = "SEND_ID";

const GROUP_GET: u8 = 0x20;
const GROUP_SET: u8 = 0x21;
const GROUP_FLASH: u8 = 0x22;
const GROUP_EEPROM: u8 = 0x23;

const WAKEUP: &[u8] = b"FLASH";

/// Frame direction, derived from which identifier of the pair it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Request,
    Response,
}

impl Direction {
    fn tag(&self) -> &'static str {
        match self {
            Direction::Request => "Req",
            Direction::Response => "Res",
        }
    }
}

/// Renders the argument bytes after the 3-byte command header.
type RenderFn = fn(&[u8], &DisplayConfig) -> String;

/// One command table row: exact length and argument shape for one
/// (group, sub, direction).
struct CommandEntry {
    group: u8,
    sub: u8,
    direction: Direction,
    dlc: u8,
    label: &'static str,
    render: RenderFn,
}

const fn req(group: u8, sub: u8, dlc: u8, label: &'static str, render: RenderFn) -> CommandEntry {
    CommandEntry { group, sub, direction: Direction::Request, dlc, label, render }
}

const fn res(group: u8, sub: u8, dlc: u8, label: &'static str, render: RenderFn) -> CommandEntry {
    CommandEntry { group, sub, direction: Direction::Response, dlc, label, render }
}

fn byte_at(tail: &[u8], at: usize) -> u8 {
    tail.get(at).copied().unwrap_or(0)
}

fn tail_from(tail: &[u8], at: usize) -> &[u8] {
    tail.get(at..).unwrap_or(&[])
}

fn render_none(_tail: &[u8], _cfg: &DisplayConfig) -> String {
    String::new()
}

fn render_val_byte(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!("  Val:{}", fmt::value_string(byte_at(tail, 0) as u32, cfg))
}

fn render_val_word(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!("  Val:{}", fmt::value_string(fmt::word_from_le(tail) as u32, cfg))
}

fn render_val_dword(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!("  Val:{}", fmt::value_string(fmt::dword_from_le(tail), cfg))
}

fn render_index_byte(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!("  Idx:{}", fmt::value_string(byte_at(tail, 0) as u32, cfg))
}

fn render_sector_word(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!("  Sector:{}", fmt::value_string(fmt::word_from_le(tail) as u32, cfg))
}

fn render_sector_checksum(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!(
        "  Sector:{}  Chk:{}",
        fmt::value_string(fmt::word_from_le(tail) as u32, cfg),
        fmt::value_string(fmt::word_from_le(tail_from(tail, 2)) as u32, cfg)
    )
}

fn render_sector_mode(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!(
        "  Sector:{}  Mode:{}",
        fmt::value_string(fmt::word_from_le(tail) as u32, cfg),
        fmt::value_string(byte_at(tail, 2) as u32, cfg)
    )
}

fn render_index_val_byte(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!(
        "  Idx:{}  Val:{}",
        fmt::value_string(byte_at(tail, 0) as u32, cfg),
        fmt::value_string(byte_at(tail, 1) as u32, cfg)
    )
}

fn render_index_address(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!(
        "  Idx:{}  Addr:{}",
        fmt::value_string(byte_at(tail, 0) as u32, cfg),
        fmt::value_string(fmt::dword_from_le(tail_from(tail, 1)), cfg)
    )
}

fn render_index_checksum(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!(
        "  Idx:{}  Chk:{}",
        fmt::value_string(byte_at(tail, 0) as u32, cfg),
        fmt::value_string(fmt::dword_from_le(tail_from(tail, 1)), cfg)
    )
}

fn render_address_count(tail: &[u8], cfg: &DisplayConfig) -> String {
    format!(
        "  Addr:{}  Cnt:{}",
        fmt::value_string(fmt::dword_from_le(tail), cfg),
        fmt::value_string(byte_at(tail, 4) as u32, cfg)
    )
}

fn render_ascii(tail: &[u8], _cfg: &DisplayConfig) -> String {
    let text: String = tail
        .iter()
        .map(|b| {
            if b.is_ascii_graphic() || *b == b' ' {
                *b as char
            } else {
                '.'
            }
        })
        .collect();
    format!("  \"{}\"", text)
}

fn render_dump(tail: &[u8], cfg: &DisplayConfig) -> String {
    if tail.is_empty() {
        return String::new();
    }
    format!("  Data:{}", fmt::bytes_string(tail, cfg))
}

/// Command table. Lengths include the 3 header bytes.
static COMMAND_TABLE: &[CommandEntry] = &[
    // get services
    req(GROUP_GET, 0x00, 3, "get_local_id", render_none),
    res(GROUP_GET, 0x00, 4, "get_local_id", render_val_byte),
    req(GROUP_GET, 0x01, 3, "get_sector_count", render_none),
    res(GROUP_GET, 0x01, 5, "get_sector_count", render_val_word),
    req(GROUP_GET, 0x02, 3, "get_version_number", render_none),
    res(GROUP_GET, 0x02, 8, "get_version_number", render_ascii),
    req(GROUP_GET, 0x03, 3, "get_download_count", render_none),
    res(GROUP_GET, 0x03, 7, "get_download_count", render_val_dword),
    req(GROUP_GET, 0x04, 4, "get_device_id", render_index_byte),
    res(GROUP_GET, 0x04, 8, "get_device_id", render_ascii),
    req(GROUP_GET, 0x05, 3, "get_control_id", render_none),
    res(GROUP_GET, 0x05, 7, "get_control_id", render_val_dword),
    req(GROUP_GET, 0x06, 5, "get_sector_checksum", render_sector_word),
    res(GROUP_GET, 0x06, 7, "get_sector_checksum", render_sector_checksum),
    req(GROUP_GET, 0x07, 5, "get_sector_mode_compare", render_sector_word),
    res(GROUP_GET, 0x07, 6, "get_sector_mode_compare", render_sector_mode),
    req(GROUP_GET, 0x08, 4, "get_timeout_factor", render_index_byte),
    res(GROUP_GET, 0x08, 5, "get_timeout_factor", render_index_val_byte),
    req(GROUP_GET, 0x09, 3, "get_last_user", render_none),
    res(GROUP_GET, 0x09, 8, "get_last_user", render_ascii),
    req(GROUP_GET, 0x0A, 5, "get_flash_information", render_dump),
    res(GROUP_GET, 0x0A, 8, "get_flash_information", render_dump),
    req(GROUP_GET, 0x0B, 4, "get_implementation_information", render_index_byte),
    res(GROUP_GET, 0x0B, 8, "get_implementation_information", render_dump),
    req(GROUP_GET, 0x0C, 4, "get_finger_print", render_index_byte),
    res(GROUP_GET, 0x0C, 8, "get_finger_print", render_dump),
    req(GROUP_GET, 0x0D, 4, "get_device_info_address", render_index_byte),
    res(GROUP_GET, 0x0D, 8, "get_device_info_address", render_index_address),
    req(GROUP_GET, 0x0E, 4, "get_block_start_address", render_index_byte),
    res(GROUP_GET, 0x0E, 8, "get_block_start_address", render_index_address),
    req(GROUP_GET, 0x0F, 4, "get_block_end_address", render_index_byte),
    res(GROUP_GET, 0x0F, 8, "get_block_end_address", render_index_address),
    req(GROUP_GET, 0x10, 4, "get_block_checksum", render_index_byte),
    res(GROUP_GET, 0x10, 8, "get_block_checksum", render_index_checksum),
    req(GROUP_GET, 0x11, 4, "get_block_compare_mode", render_index_byte),
    res(GROUP_GET, 0x11, 5, "get_block_compare_mode", render_index_val_byte),
    // set services
    req(GROUP_SET, 0x00, 4, "set_local_id", render_val_byte),
    res(GROUP_SET, 0x00, 4, "set_local_id", render_val_byte),
    req(GROUP_SET, 0x01, 7, "set_bitrate_can", render_val_dword),
    res(GROUP_SET, 0x01, 7, "set_bitrate_can", render_val_dword),
    req(GROUP_SET, 0x02, 7, "set_can_id", render_val_dword),
    res(GROUP_SET, 0x02, 7, "set_can_id", render_val_dword),
    req(GROUP_SET, 0x03, 4, "set_can_type", render_val_byte),
    res(GROUP_SET, 0x03, 4, "set_can_type", render_val_byte),
    req(GROUP_SET, 0x04, 7, "set_control_id", render_val_dword),
    res(GROUP_SET, 0x04, 7, "set_control_id", render_val_dword),
    req(GROUP_SET, 0x05, 7, "set_sector_checksum", render_sector_checksum),
    res(GROUP_SET, 0x05, 7, "set_sector_checksum", render_sector_checksum),
    req(GROUP_SET, 0x06, 5, "set_timeout_factor", render_index_val_byte),
    res(GROUP_SET, 0x06, 5, "set_timeout_factor", render_index_val_byte),
    req(GROUP_SET, 0x07, 6, "set_gateway_parameter", render_dump),
    res(GROUP_SET, 0x07, 6, "set_gateway_parameter", render_dump),
    req(GROUP_SET, 0x08, 4, "set_xflash_exchange", render_val_byte),
    res(GROUP_SET, 0x08, 4, "set_xflash_exchange", render_val_byte),
    req(GROUP_SET, 0x09, 6, "set_finger_print", render_dump),
    res(GROUP_SET, 0x09, 6, "set_finger_print", render_dump),
    req(GROUP_SET, 0x0A, 7, "set_temp_bitrate", render_val_dword),
    res(GROUP_SET, 0x0A, 7, "set_temp_bitrate", render_val_dword),
    req(GROUP_SET, 0x0B, 8, "set_block_start_address", render_index_address),
    res(GROUP_SET, 0x0B, 8, "set_block_start_address", render_index_address),
    req(GROUP_SET, 0x0C, 8, "set_block_end_address", render_index_address),
    res(GROUP_SET, 0x0C, 8, "set_block_end_address", render_index_address),
    // flash services
    req(GROUP_FLASH, 0x00, 5, "erase_sector", render_sector_word),
    res(GROUP_FLASH, 0x00, 3, "erase_sector", render_none),
    req(GROUP_FLASH, 0x01, 3, "program_flash", render_none),
    res(GROUP_FLASH, 0x01, 3, "program_flash", render_none),
    req(GROUP_FLASH, 0x02, 3, "node_sleep", render_none),
    res(GROUP_FLASH, 0x02, 3, "node_sleep", render_none),
    req(GROUP_FLASH, 0x03, 3, "node_reset", render_none),
    res(GROUP_FLASH, 0x03, 3, "node_reset", render_none),
    req(GROUP_FLASH, 0x04, 3, "node_return", render_none),
    res(GROUP_FLASH, 0x04, 3, "node_return", render_none),
    req(GROUP_FLASH, 0x05, 8, "read_flash", render_address_count),
    res(GROUP_FLASH, 0x05, 8, "read_flash", render_dump),
    req(GROUP_FLASH, 0x06, 3, "node_compid", render_none),
    res(GROUP_FLASH, 0x06, 8, "node_compid", render_ascii),
    req(GROUP_FLASH, 0x07, 5, "divert_stream", render_dump),
    res(GROUP_FLASH, 0x07, 4, "divert_stream", render_val_byte),
    req(GROUP_FLASH, 0x08, 4, "wakeup_local_id", render_val_byte),
    res(GROUP_FLASH, 0x08, 4, "wakeup_local_id", render_val_byte),
    req(GROUP_FLASH, 0x09, 8, "wakeup_serial_number", render_dump),
    res(GROUP_FLASH, 0x09, 4, "wakeup_serial_number", render_val_byte),
    // eeprom services
    req(GROUP_EEPROM, 0x00, 8, "ee_read", render_address_count),
    res(GROUP_EEPROM, 0x00, 8, "ee_read", render_dump),
    req(GROUP_EEPROM, 0x01, 8, "ee_write", render_address_count),
    res(GROUP_EEPROM, 0x01, 4, "ee_write", render_val_byte),
];

fn find_command(group: u8, sub: u8, direction: Direction) -> Option<&'static CommandEntry> {
    COMMAND_TABLE
        .iter()
        .find(|entry| entry.group == group && entry.sub == sub && entry.direction == direction)
}

/// Decoder for the flashloader protocol.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlashloaderDecoder;

impl ProtocolDecoder for FlashloaderDecoder {
    fn name(&self) -> &'static str {
        "Flashloader"
    }

    fn interpret(&self, frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
        let direction: Direction = if frame.id == cfg.flash_send_id {
            Direction::Request
        } else if frame.id == cfg.flash_send_id.wrapping_add(1) {
            Direction::Response
        } else {
            return None;
        };

        let data: &[u8] = frame.payload();
        if direction == Direction::Request && data == WAKEUP {
            return Some("FLASH Wakeup".to_string());
        }
        if data.len() < 3 {
            return None;
        }

        let entry: &CommandEntry = find_command(data[1], data[2], direction)?;
        if data.len() != entry.dlc as usize {
            return None;
        }
        Some(format!(
            "{} {}  Node:{}{}",
            entry.label,
            direction.tag(),
            fmt::value_string(data[0] as u32, cfg),
            (entry.render)(&data[3..], cfg)
        ))
    }

    fn load_parameters(&self, cfg: &mut DisplayConfig, store: &dyn ParamStore, section: &str) {
        match store.get_u32(section, KEY_SEND_ID) {
            Some(id) => cfg.flash_send_id = id,
            None => debug!(section, key = KEY_SEND_ID, "key absent, keeping default"),
        }
    }

    fn save_parameters(
        &self,
        cfg: &DisplayConfig,
        store: &mut dyn ParamStore,
        section: &str,
    ) -> Result<(), StoreError> {
        store.set_u32(section, KEY_SEND_ID, cfg.flash_send_id)
    }
}

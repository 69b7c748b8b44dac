use crate::params::ParamStore;
use crate::types::errors::StoreError;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File-backed [`ParamStore`] using a minimal INI layout.
///
/// The file consists of `[section]` headers followed by `key=value` lines.
/// Values are written in decimal; on load both decimal and `0x`-prefixed
/// hexadecimal are accepted. Blank lines and lines starting with `;` or
/// `#` are skipped, as are malformed lines: a damaged file loads as far
/// as possible instead of failing the whole store.
///
/// Writes go through to disk immediately: [`ParamStore::set_u32`] updates
/// the in-memory map and rewrites the file, returning
/// [`StoreError::Write`] if the file cannot be written. Sections and keys
/// are emitted in sorted order so saved files diff cleanly.
///
/// # Example
/// ```no_run
/// use canmon::params::{IniStore, ParamStore};
///
/// let mut store = IniStore::load("monitor.ini").expect("Failed to load settings");
/// let send_id = store.get_u32("FLASHLOADER", "SEND_ID").unwrap_or(0x51);
/// store.set_u32("FLASHLOADER", "SEND_ID", send_id).expect("Failed to save settings");
/// ```
#[derive(Debug, Clone)]
pub struct IniStore {
    path: PathBuf,
    sections: BTreeMap<String, BTreeMap<String, u32>>,
}

impl IniStore {
    /// Opens a store at `path`, reading existing content if the file exists.
    ///
    /// A missing file yields an empty store (it is created on the first
    /// write); an unreadable file yields [`StoreError::Read`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<IniStore, StoreError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let mut store = IniStore {
            path,
            sections: BTreeMap::new(),
        };

        if !store.path.exists() {
            return Ok(store);
        }

        let text: String = fs::read_to_string(&store.path).map_err(|e| StoreError::Read {
            path: store.path.display().to_string(),
            source: e,
        })?;

        let mut current: String = String::new();
        for line in text.lines() {
            let line: &str = line.trim();

            // skip comments and empty lines
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                current = line[1..line.len() - 1].trim().to_string();
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue; // malformed line
            };
            let Some(value) = parse_value(value.trim()) else {
                continue; // not a number
            };
            store
                .sections
                .entry(current.clone())
                .or_default()
                .insert(key.trim().to_string(), value);
        }

        Ok(store)
    }

    /// Rewrites the backing file from the in-memory map.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut out: String = String::new();
        for (section, entries) in &self.sections {
            out.push('[');
            out.push_str(section);
            out.push_str("]\n");
            for (key, value) in entries {
                out.push_str(&format!("{}={}\n", key, value));
            }
            out.push('\n');
        }

        fs::write(&self.path, out).map_err(|e| StoreError::Write {
            path: self.path.display().to_string(),
            source: e,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ParamStore for IniStore {
    fn get_u32(&self, section: &str, key: &str) -> Option<u32> {
        self.sections.get(section)?.get(key).copied()
    }

    fn set_u32(&mut self, section: &str, key: &str, value: u32) -> Result<(), StoreError> {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
        self.save()
    }
}

fn parse_value(text: &str) -> Option<u32> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        text.parse::<u32>().ok()
    }
}

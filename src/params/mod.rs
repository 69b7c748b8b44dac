//! # params
//!
//! `params` is the module for persisting decoder parameters in a key/value
//! store grouped by named sections.
//!
//! Decoders only ever exchange `u32` values with a store; the store itself
//! decides how they are kept. Two implementations ship with the crate:
//! [`MemoryStore`] (plain map, never fails) and [`IniStore`] (INI-style
//! file with write-through saves).

pub mod ini;

pub use ini::IniStore;

use crate::types::errors::StoreError;
use std::collections::HashMap;

/// A key/value store for persisted decoder parameters.
///
/// Reads are infallible: a missing key returns `None` and the caller keeps
/// its current in-memory default. Writes return a distinct status so a
/// failed save is never silent.
pub trait ParamStore {
    /// Reads a value, `None` if the key is not present.
    fn get_u32(&self, section: &str, key: &str) -> Option<u32>;

    /// Writes a value, creating section and key as needed.
    fn set_u32(&mut self, section: &str, key: &str, value: u32) -> Result<(), StoreError>;

    /// Reads a 16-bit value; out-of-range stored values are treated as absent.
    fn get_u16(&self, section: &str, key: &str) -> Option<u16> {
        self.get_u32(section, key).and_then(|v| u16::try_from(v).ok())
    }

    /// Writes a 16-bit value.
    fn set_u16(&mut self, section: &str, key: &str, value: u16) -> Result<(), StoreError> {
        self.set_u32(section, key, u32::from(value))
    }
}

/// In-memory [`ParamStore`] backed by a map.
///
/// Useful for tests and for embedding applications that persist the map
/// through their own configuration mechanism. Writes cannot fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<(String, String), u32>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of stored keys across all sections.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if no key is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParamStore for MemoryStore {
    fn get_u32(&self, section: &str, key: &str) -> Option<u32> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .copied()
    }

    fn set_u32(&mut self, section: &str, key: &str, value: u32) -> Result<(), StoreError> {
        self.values
            .insert((section.to_string(), key.to_string()), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());

        store.set_u32("FLASHLOADER", "SEND_ID", 0x51).unwrap();
        assert_eq!(store.get_u32("FLASHLOADER", "SEND_ID"), Some(0x51));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get_u32("FLASHLOADER", "SEND_ID"), None);
    }

    #[test]
    fn memory_store_sections_are_independent() {
        let mut store = MemoryStore::new();
        store.set_u32("A", "ID", 1).unwrap();
        store.set_u32("B", "ID", 2).unwrap();
        assert_eq!(store.get_u32("A", "ID"), Some(1));
        assert_eq!(store.get_u32("B", "ID"), Some(2));
    }

    #[test]
    fn u16_helpers_reject_out_of_range() {
        let mut store = MemoryStore::new();
        store.set_u32("VARACCESS", "BASE_ID", 0x1_0000).unwrap();
        assert_eq!(store.get_u16("VARACCESS", "BASE_ID"), None);

        store.set_u16("VARACCESS", "BASE_ID", 0x100).unwrap();
        assert_eq!(store.get_u16("VARACCESS", "BASE_ID"), Some(0x100));
    }
}

//! # routines
//!
//! Routine identifier reference table for the routine-control service.

use crate::fmt;
use crate::types::config::DisplayConfig;

/// One row of the routine identifier table.
#[derive(Debug, Clone, Copy)]
pub struct RoutineEntry {
    pub routine: u16,
    pub name: &'static str,
}

const fn row(routine: u16, name: &'static str) -> RoutineEntry {
    RoutineEntry { routine, name }
}

/// Known routine identifiers, sorted ascending, no duplicates.
pub static ROUTINE_TABLE: &[RoutineEntry] = &[
    row(0x0201, "RequestProgramming"),
    row(0x0202, "SetBitrate"),
    row(0x0203, "SetNodeId"),
    row(0x0204, "SetIpAddress"),
    row(0x0205, "CheckFlashMemoryAvailable"),
    row(0x0206, "ReadFlashBlockData"),
    row(0x0207, "CheckApplication"),
    row(0x0208, "WriteApplicationInfo"),
    row(0x0209, "ReadApplicationInfo"),
    row(0x020A, "FactoryMode"),
    row(0x020B, "ClearNvm"),
    row(0x020C, "SetDisplayName"),
    row(0x0301, "RequestRouting"),
    row(0x0302, "ActivateRouting"),
    row(0x0303, "DeactivateRouting"),
    row(0x0304, "SendCanMessage"),
    row(0x0305, "TunnelCanMessages"),
    row(0x0306, "StopTunneling"),
    row(0x0401, "ReadDataPoolMetaData"),
    row(0x0402, "VerifyDataPool"),
    row(0x0403, "NotifyNvmChanged"),
    row(0xFF00, "EraseMemory"),
    row(0xFF01, "CheckProgrammingDependencies"),
    row(0xFF02, "CheckMemory"),
    row(0xFFFF, "EraseAllMemory"),
];

/// Finds the table entry for an exact routine identifier.
pub fn lookup(routine: u16) -> Option<&'static RoutineEntry> {
    ROUTINE_TABLE
        .binary_search_by_key(&routine, |entry| entry.routine)
        .ok()
        .map(|index| &ROUTINE_TABLE[index])
}

/// Display label for a routine: table name or the numeric value.
pub fn label(routine: u16, cfg: &DisplayConfig) -> String {
    match lookup(routine) {
        Some(entry) => entry.name.to_string(),
        None => format!("Routine:{}", fmt::value_string(routine as u32, cfg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_strictly_ascending() {
        for pair in ROUTINE_TABLE.windows(2) {
            assert!(
                pair[0].routine < pair[1].routine,
                "order broken at {:#06X}",
                pair[1].routine
            );
        }
    }

    #[test]
    fn every_entry_is_found() {
        for entry in ROUTINE_TABLE {
            assert_eq!(lookup(entry.routine).map(|e| e.name), Some(entry.name));
        }
    }

    #[test]
    fn unknown_routine_labels_numerically() {
        let cfg = DisplayConfig::default();
        assert_eq!(label(0x0210, &cfg), "Routine:210");
        assert_eq!(label(0xFF00, &cfg), "EraseMemory");
    }
}

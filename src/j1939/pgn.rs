//! # pgn
//!
//! Static Parameter Group Number reference table.
//!
//! The table keys on the 16-bit PGN embedded in the 29-bit identifier
//! (destination byte already masked out for PDU1 groups) and holds the SAE
//! acronym plus a long name for each well-known group. Lookup is an exact
//! binary search; sorted ascending order is a precondition maintained by
//! hand and verified by the table tests.

/// One row of the PGN reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PgnEntry {
    /// 16-bit parameter group number.
    pub pgn: u16,
    /// SAE acronym shown on the monitor line.
    pub mnemonic: &'static str,
    /// Long name of the parameter group.
    pub description: &'static str,
}

const fn row(pgn: u16, mnemonic: &'static str, description: &'static str) -> PgnEntry {
    PgnEntry {
        pgn,
        mnemonic,
        description,
    }
}

/// Well-known parameter groups, sorted ascending by PGN, no duplicates.
pub static PGN_TABLE: &[PgnEntry] = &[
    row(0x0000, "TSC1", "Torque/Speed Control 1"),
    row(0x0100, "TC1", "Transmission Control 1"),
    row(0x0400, "XBR", "External Brake Request"),
    row(0xD700, "DM16", "Binary Data Transfer"),
    row(0xD800, "DM15", "Memory Access Response"),
    row(0xD900, "DM14", "Memory Access Request"),
    row(0xDF00, "DM13", "Stop Start Broadcast"),
    row(0xE000, "CM1", "Cab Message 1"),
    row(0xE300, "DM7", "Command Non-Continuously Monitored Test"),
    row(0xE800, "ACKM", "Acknowledgement"),
    row(0xEA00, "RQST", "Request"),
    row(0xEB00, "TP.DT", "Transport Protocol Data Transfer"),
    row(0xEC00, "TP.CM", "Transport Protocol Connection Management"),
    row(0xEE00, "AC", "Address Claimed"),
    row(0xEF00, "PropA", "Proprietary A"),
    row(0xF000, "ERC1", "Electronic Retarder Controller 1"),
    row(0xF001, "EBC1", "Electronic Brake Controller 1"),
    row(0xF002, "ETC1", "Electronic Transmission Controller 1"),
    row(0xF003, "EEC2", "Electronic Engine Controller 2"),
    row(0xF004, "EEC1", "Electronic Engine Controller 1"),
    row(0xF005, "ETC2", "Electronic Transmission Controller 2"),
    row(0xF006, "EAC1", "Electronic Axle Controller 1"),
    row(0xF009, "VDC2", "Vehicle Dynamic Stability Control 2"),
    row(0xFE6C, "TCO1", "Tachograph"),
    row(0xFE70, "CVW", "Combination Vehicle Weight"),
    row(0xFEBD, "FD", "Fan Drive"),
    row(0xFEBE, "EEC4", "Electronic Engine Controller 4"),
    row(0xFEBF, "EBC2", "Wheel Speed Information"),
    row(0xFEC0, "SERV", "Service Information"),
    row(0xFEC1, "VDHR", "High Resolution Vehicle Distance"),
    row(0xFECA, "DM1", "Active Diagnostic Trouble Codes"),
    row(0xFECB, "DM2", "Previously Active Diagnostic Trouble Codes"),
    row(0xFECC, "DM3", "Diagnostic Data Clear of Previously Active DTCs"),
    row(0xFECD, "DM4", "Freeze Frame Parameters"),
    row(0xFECE, "DM5", "Diagnostic Readiness"),
    row(0xFECF, "DM6", "Emission Related Pending DTCs"),
    row(0xFED0, "DM8", "Test Results"),
    row(0xFED1, "DM9", "Oxygen Sensor Test Results"),
    row(0xFED2, "DM10", "Non-Continuously Monitored Systems Test"),
    row(0xFED3, "DM11", "Diagnostic Data Clear of Active DTCs"),
    row(0xFED4, "DM12", "Emission Related Active DTCs"),
    row(0xFED8, "CA", "Commanded Address"),
    row(0xFED9, "AUXIO1", "Auxiliary Input/Output Status 1"),
    row(0xFEDA, "SOFT", "Software Identification"),
    row(0xFEDB, "EFL/P2", "Engine Fluid Level/Pressure 2"),
    row(0xFEDC, "IO", "Idle Operation"),
    row(0xFEDD, "TC", "Turbocharger"),
    row(0xFEDF, "EEC3", "Electronic Engine Controller 3"),
    row(0xFEE0, "VD", "Vehicle Distance"),
    row(0xFEE1, "RC", "Retarder Configuration"),
    row(0xFEE2, "TCFG", "Transmission Configuration"),
    row(0xFEE3, "EC1", "Engine Configuration 1"),
    row(0xFEE4, "SHUTDN", "Shutdown"),
    row(0xFEE5, "HOURS", "Engine Hours, Revolutions"),
    row(0xFEE6, "TD", "Time/Date"),
    row(0xFEE7, "VH", "Vehicle Hours"),
    row(0xFEE8, "VDS", "Vehicle Direction/Speed"),
    row(0xFEE9, "LFC", "Fuel Consumption (Liquid)"),
    row(0xFEEA, "VW", "Vehicle Weight"),
    row(0xFEEB, "CI", "Component Identification"),
    row(0xFEEC, "VI", "Vehicle Identification"),
    row(0xFEED, "CCSS", "Cruise Control/Vehicle Speed Setup"),
    row(0xFEEE, "ET1", "Engine Temperature 1"),
    row(0xFEEF, "EFL/P1", "Engine Fluid Level/Pressure 1"),
    row(0xFEF0, "PTO", "Power Takeoff Information"),
    row(0xFEF1, "CCVS", "Cruise Control/Vehicle Speed"),
    row(0xFEF2, "LFE", "Fuel Economy (Liquid)"),
    row(0xFEF3, "VP", "Vehicle Position"),
    row(0xFEF4, "TIRE", "Tire Condition"),
    row(0xFEF5, "AMB", "Ambient Conditions"),
    row(0xFEF6, "IC1", "Inlet/Exhaust Conditions 1"),
    row(0xFEF7, "VEP1", "Vehicle Electrical Power 1"),
    row(0xFEF8, "TRF1", "Transmission Fluids 1"),
    row(0xFEFA, "AIR1", "Air Supply Pressure"),
    row(0xFEFC, "DD", "Dash Display"),
    row(0xFEFF, "WFI", "Water in Fuel Indicator"),
    row(0xFF00, "PropB", "Proprietary B"),
];

/// Finds the table entry for an exact 16-bit PGN.
///
/// Exact match only; callers fall back to the "PDU1"/"PDU2" label when the
/// group is not listed.
pub fn lookup(pgn: u16) -> Option<&'static PgnEntry> {
    PGN_TABLE
        .binary_search_by_key(&pgn, |entry| entry.pgn)
        .ok()
        .map(|index| &PGN_TABLE[index])
}

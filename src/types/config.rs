use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Selects the higher-layer protocol interpretation applied to incoming
/// frames.
///
/// The numeric discriminants are stable and are what
/// [`FrameInterpreter::save_parameters`](crate::FrameInterpreter::save_parameters)
/// persists, so reordering variants would silently change stored
/// configurations. Append only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// No interpretation; every frame is rendered as raw bytes.
    #[default]
    Layer2 = 0,
    /// CANopen (NMT, SYNC, EMCY, PDO, SDO, heartbeat).
    CanOpen = 1,
    /// SAE J1939 (PGN lookup, transport protocol, address claim).
    J1939 = 2,
    /// openSYDE diagnostic protocol (ISO-TP framing + UDS-style services).
    OpenSyde = 3,
    /// Flashloader command/response protocol on a configured identifier pair.
    Flashloader = 4,
    /// Index-based variable access protocol on a configured base identifier.
    VarAccess = 5,
}

impl Protocol {
    /// All selectable protocols, in discriminant order.
    pub const ALL: [Protocol; 6] = [
        Protocol::Layer2,
        Protocol::CanOpen,
        Protocol::J1939,
        Protocol::OpenSyde,
        Protocol::Flashloader,
        Protocol::VarAccess,
    ];

    /// Human-readable protocol name, as shown in selector widgets and log
    /// file headers.
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Layer2 => "CAN Layer 2",
            Protocol::CanOpen => "CANopen",
            Protocol::J1939 => "J1939",
            Protocol::OpenSyde => "openSYDE",
            Protocol::Flashloader => "Flashloader",
            Protocol::VarAccess => "Variable Access",
        }
    }

    /// Maps a stored discriminant back to a protocol.
    ///
    /// Unknown values return `None`; callers keep their current selection.
    pub fn from_index(index: u32) -> Option<Protocol> {
        Protocol::ALL.get(index as usize).copied()
    }

    /// The stored discriminant of this protocol.
    pub fn index(&self) -> u32 {
        *self as u32
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Display configuration read by every decode call.
///
/// One instance lives in the [`FrameInterpreter`](crate::FrameInterpreter)
/// and is passed by reference into each decode, so all variants always
/// observe the same values; there are no per-variant copies to keep in
/// sync. The two identifier fields are the per-variant persisted
/// parameters: only their owning variant reads them.
///
/// # Field semantics
///
/// - `use_decimal`:
///   `true` renders numeric fields in decimal, `false` in hexadecimal.
///   Toggling this never changes which payload bytes a decoder reads,
///   only how the values are printed.
///
/// - `flash_send_id`:
///   CAN identifier the flashloader master transmits on; the node answers
///   on `flash_send_id + 1`. Read only by the flashloader variant.
///
/// - `var_base_id`:
///   Base CAN identifier of the variable-access request channel; the
///   response channel is `var_base_id + 1`. Read only by the
///   variable-access variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// `true` = decimal rendering, `false` = hexadecimal rendering.
    pub use_decimal: bool,

    /// Flashloader request identifier (response arrives on `+ 1`).
    pub flash_send_id: u32,

    /// Variable-access base identifier (response arrives on `+ 1`).
    pub var_base_id: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            use_decimal: false,
            flash_send_id: 0x51,
            var_base_id: 0x100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_index_round_trip() {
        for p in Protocol::ALL {
            assert_eq!(Protocol::from_index(p.index()), Some(p));
        }
    }

    #[test]
    fn protocol_unknown_index_is_none() {
        assert_eq!(Protocol::from_index(6), None);
        assert_eq!(Protocol::from_index(u32::MAX), None);
    }

    #[test]
    fn protocol_names_are_unique() {
        for a in Protocol::ALL {
            for b in Protocol::ALL {
                if a != b {
                    assert_ne!(a.name(), b.name());
                }
            }
        }
    }

    #[test]
    fn default_config() {
        let cfg = DisplayConfig::default();
        assert!(!cfg.use_decimal);
        assert_eq!(cfg.flash_send_id, 0x51);
        assert_eq!(cfg.var_base_id, 0x100);
    }
}

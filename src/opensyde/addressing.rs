//! # addressing
//!
//! Diagnostic CAN identifier assembly and disassembly.
//!
//! Two identifier layouts share the 29-bit space, distinguished by bits
//! 25 and 24:
//!
//! ```text
//! local  (bits 25,24 = 00): 0x18DA_TT_SS physical / 0x18DB_TT_SS functional
//!        target byte at 15..8, source byte at 7..0
//!
//! routed (bits 25,24 = 11):
//!        | 4 bits        | 7 bits      | 4 bits        | 7 bits      |
//!        | source subnet | source node | target subnet | target node |
//!        |     21..18    |    17..11   |     10..7     |     6..0    |
//! ```
//!
//! On the wire a routed node value of 0x7F means "all nodes"; it maps to
//! the broadcast sentinel [`BROADCAST_NODE`] on disassembly and back on
//! assembly. A routed message to the broadcast node is functional
//! addressing by definition. Any other combination of bits 25,24 is an
//! unsupported configuration.

use crate::fmt;
use crate::types::config::DisplayConfig;

/// Node value meaning "all nodes" after broadcast mapping.
pub const BROADCAST_NODE: u8 = 0xFF;

/// 7-bit wire encoding of [`BROADCAST_NODE`] in routed identifiers.
const BROADCAST_WIRE: u8 = 0x7F;

const LOCAL_PHYSICAL_BASE: u32 = 0x18DA_0000;
const LOCAL_FUNCTIONAL_BASE: u32 = 0x18DB_0000;
const ROUTED_BASE: u32 = 0x1B00_0000;

/// Physical (one node) vs functional (all nodes) addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Physical,
    Functional,
}

/// Whether the frame stays on this bus segment or crosses a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    Local,
    Routed,
}

/// One endpoint of a diagnostic connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeAddress {
    pub node: u8,
    /// Present only for routed addressing.
    pub subnet: Option<u8>,
}

impl NodeAddress {
    /// Local endpoint (no subnet).
    pub const fn local(node: u8) -> NodeAddress {
        NodeAddress { node, subnet: None }
    }

    /// Routed endpoint on `subnet`.
    pub const fn routed(subnet: u8, node: u8) -> NodeAddress {
        NodeAddress {
            node,
            subnet: Some(subnet),
        }
    }
}

/// Everything a diagnostic identifier says about who talks to whom.
///
/// Derived fresh from each frame's identifier, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressInfo {
    pub source: NodeAddress,
    pub target: NodeAddress,
    pub mode: AddressingMode,
    pub routing: Routing,
}

/// Splits a 29-bit diagnostic identifier into its address fields.
///
/// Returns `None` for the two unsupported selector-bit combinations
/// (`01` and `10`) and for local identifiers whose PDU format byte is
/// neither 0xDA nor 0xDB.
pub fn disassemble(id: u32) -> Option<AddressInfo> {
    match (id >> 24) & 0x03 {
        0b00 => {
            let mode: AddressingMode = match (id >> 16) & 0xFF {
                0xDA => AddressingMode::Physical,
                0xDB => AddressingMode::Functional,
                _ => return None,
            };
            Some(AddressInfo {
                source: NodeAddress::local((id & 0xFF) as u8),
                target: NodeAddress::local(((id >> 8) & 0xFF) as u8),
                mode,
                routing: Routing::Local,
            })
        }
        0b11 => {
            let source_node: u8 = map_from_wire(((id >> 11) & 0x7F) as u8);
            let target_node: u8 = map_from_wire((id & 0x7F) as u8);
            let mode: AddressingMode = if target_node == BROADCAST_NODE {
                AddressingMode::Functional
            } else {
                AddressingMode::Physical
            };
            Some(AddressInfo {
                source: NodeAddress::routed(((id >> 18) & 0x0F) as u8, source_node),
                target: NodeAddress::routed(((id >> 7) & 0x0F) as u8, target_node),
                mode,
                routing: Routing::Routed,
            })
        }
        _ => None, // unsupported selector configuration
    }
}

/// Builds the 29-bit identifier for an address combination.
///
/// The inverse of [`disassemble`], including the broadcast node mapping.
/// For local addressing the subnets are ignored and the mode selects the
/// 0xDA/0xDB PDU format byte.
pub fn assemble(info: &AddressInfo) -> u32 {
    match info.routing {
        Routing::Local => {
            let base: u32 = match info.mode {
                AddressingMode::Physical => LOCAL_PHYSICAL_BASE,
                AddressingMode::Functional => LOCAL_FUNCTIONAL_BASE,
            };
            base | ((info.target.node as u32) << 8) | (info.source.node as u32)
        }
        Routing::Routed => {
            ROUTED_BASE
                | ((info.source.subnet.unwrap_or(0) as u32 & 0x0F) << 18)
                | ((map_to_wire(info.source.node) as u32) << 11)
                | ((info.target.subnet.unwrap_or(0) as u32 & 0x0F) << 7)
                | (map_to_wire(info.target.node) as u32)
        }
    }
}

fn map_from_wire(node: u8) -> u8 {
    if node == BROADCAST_WIRE {
        BROADCAST_NODE
    } else {
        node
    }
}

fn map_to_wire(node: u8) -> u8 {
    if node == BROADCAST_NODE {
        BROADCAST_WIRE
    } else {
        node & 0x7F
    }
}

/// Short `source->target` prefix every diagnostic line starts with.
///
/// Routed endpoints are qualified with their subnet; functional
/// addressing carries a marker since the target alone does not show it
/// for local frames.
pub fn address_string(info: &AddressInfo, cfg: &DisplayConfig) -> String {
    let endpoint = |addr: &NodeAddress| -> String {
        match addr.subnet {
            Some(subnet) => format!(
                "{}.{}",
                fmt::value_string(subnet as u32, cfg),
                fmt::value_string(addr.node as u32, cfg)
            ),
            None => fmt::value_string(addr.node as u32, cfg),
        }
    };
    let marker: &str = match info.mode {
        AddressingMode::Physical => "",
        AddressingMode::Functional => " (func)",
    };
    format!("{}->{}{}", endpoint(&info.source), endpoint(&info.target), marker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_physical_disassembly() {
        let info = disassemble(0x18DA_1242).unwrap();
        assert_eq!(info.routing, Routing::Local);
        assert_eq!(info.mode, AddressingMode::Physical);
        assert_eq!(info.target, NodeAddress::local(0x12));
        assert_eq!(info.source, NodeAddress::local(0x42));
    }

    #[test]
    fn local_functional_disassembly() {
        let info = disassemble(0x18DB_FF42).unwrap();
        assert_eq!(info.mode, AddressingMode::Functional);
        assert_eq!(info.target.node, 0xFF);
    }

    #[test]
    fn local_unknown_pdu_format_is_unsupported() {
        assert!(disassemble(0x18DC_1242).is_none());
        assert!(disassemble(0x1800_1242).is_none());
    }

    #[test]
    fn selector_bits_01_and_10_are_unsupported() {
        assert!(disassemble(0x19DA_1242).is_none());
        assert!(disassemble(0x1ADA_1242).is_none());
    }

    #[test]
    fn routed_disassembly() {
        // source subnet 3 node 0x15, target subnet 1 node 0x27
        let id: u32 = ROUTED_BASE | (3 << 18) | (0x15 << 11) | (1 << 7) | 0x27;
        let info = disassemble(id).unwrap();
        assert_eq!(info.routing, Routing::Routed);
        assert_eq!(info.mode, AddressingMode::Physical);
        assert_eq!(info.source, NodeAddress::routed(3, 0x15));
        assert_eq!(info.target, NodeAddress::routed(1, 0x27));
    }

    #[test]
    fn routed_broadcast_node_maps_to_sentinel() {
        let id: u32 = ROUTED_BASE | (3 << 18) | (0x15 << 11) | (1 << 7) | 0x7F;
        let info = disassemble(id).unwrap();
        assert_eq!(info.target.node, BROADCAST_NODE);
        assert_eq!(info.mode, AddressingMode::Functional);
    }

    #[test]
    fn local_round_trip() {
        let original = AddressInfo {
            source: NodeAddress::local(0x42),
            target: NodeAddress::local(0x12),
            mode: AddressingMode::Physical,
            routing: Routing::Local,
        };
        let id: u32 = assemble(&original);
        assert_eq!(id, 0x18DA_1242);
        assert_eq!(disassemble(id), Some(original));
    }

    #[test]
    fn routed_round_trip_with_broadcast() {
        let original = AddressInfo {
            source: NodeAddress::routed(0x0A, 0x33),
            target: NodeAddress::routed(0x02, BROADCAST_NODE),
            mode: AddressingMode::Functional,
            routing: Routing::Routed,
        };
        let id: u32 = assemble(&original);
        assert_eq!(id & 0x7F, 0x7F);
        assert_eq!(disassemble(id), Some(original));
    }

    #[test]
    fn routed_round_trip_all_field_values() {
        for subnet in [0u8, 1, 7, 15] {
            for node in [0u8, 1, 0x3C, 0x7E, BROADCAST_NODE] {
                let original = AddressInfo {
                    source: NodeAddress::routed(subnet, node),
                    target: NodeAddress::routed(15 - subnet, 0x10),
                    mode: AddressingMode::Physical,
                    routing: Routing::Routed,
                };
                assert_eq!(disassemble(assemble(&original)), Some(original));
            }
        }
    }

    #[test]
    fn address_prefix_shapes() {
        let cfg = DisplayConfig::default();
        let local = disassemble(0x18DA_1242).unwrap();
        assert_eq!(address_string(&local, &cfg), "42->12");

        let func = disassemble(0x18DB_3342).unwrap();
        assert_eq!(address_string(&func, &cfg), "42->33 (func)");

        let id: u32 = ROUTED_BASE | (3 << 18) | (0x15 << 11) | (1 << 7) | 0x7F;
        let routed = disassemble(id).unwrap();
        assert_eq!(address_string(&routed, &cfg), "3.15->1.FF (func)");
    }
}

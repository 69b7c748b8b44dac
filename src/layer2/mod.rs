//! # layer2
//!
//! Raw CAN Layer 2 passthrough.
//!
//! This is the interpretation of last resort: every frame "decodes" to a
//! plain dump of its payload bytes. The aggregation layer also uses it as
//! the fallback when the active protocol cannot interpret a frame.

use crate::decoder::ProtocolDecoder;
use crate::fmt;
use crate::types::config::DisplayConfig;
use crate::types::frame::CanFrame;

/// Passthrough decoder showing payload bytes and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct Layer2Decoder;

impl ProtocolDecoder for Layer2Decoder {
    fn name(&self) -> &'static str {
        "CAN Layer 2"
    }

    /// Always succeeds. Remote frames have no payload to show and yield
    /// an empty string.
    fn interpret(&self, frame: &CanFrame, cfg: &DisplayConfig) -> Option<String> {
        if frame.is_rtr {
            return Some(String::new());
        }
        Some(fmt::data_string(frame, cfg))
    }
}

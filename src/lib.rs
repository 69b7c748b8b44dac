//! # canmon
//!
//! Protocol interpretation engine for **CAN bus monitor** applications.
//!
//! ## Highlights
//! - **Six protocols**: raw layer 2, CANopen, SAE J1939, openSYDE diagnostics, flashloader and variable access, all behind one [`ProtocolDecoder`] trait.
//! - **Always displayable**: [`FrameInterpreter::interpret`] falls back to the raw byte rendering when the active protocol cannot read a frame.
//! - **Aligned logs**: [`FrameInterpreter::log_line`] emits fixed-width semicolon-separated records with a padded interpreted column.
//! - **Decimal/hex switch**: one [`DisplayConfig`] flag re-renders every numeric field without changing what is decoded.
//! - **Persisted settings**: display mode, protocol selection and variant identifiers round-trip through [`ParamStore`] implementations ([`MemoryStore`], [`IniStore`]).
//!
//! _Crate docs refreshed: 2026-08-19_.
//!

pub mod canopen;
pub mod decoder;
pub mod flashloader;
pub mod fmt;
pub mod interpreter;
pub mod j1939;
pub mod layer2;
pub mod opensyde;
pub mod params;
#[doc(hidden)]
pub mod types;
pub mod varaccess;

// Top-level re-exports (appear under Crate Items → Structs)
#[doc(inline)]
pub use crate::{
    canopen::CanOpenDecoder,
    decoder::ProtocolDecoder,
    flashloader::FlashloaderDecoder,
    interpreter::FrameInterpreter,
    j1939::J1939Decoder,
    layer2::Layer2Decoder,
    opensyde::OpenSydeDecoder,
    params::{IniStore, MemoryStore, ParamStore},
    varaccess::VarAccessDecoder,
};

#[doc(inline)]
pub use crate::types::{
    config::{DisplayConfig, Protocol},
    errors::StoreError,
    frame::CanFrame,
};

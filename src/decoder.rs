//! # decoder
//!
//! Contract shared by every protocol interpretation in this crate.
//!
//! Each supported protocol (J1939, CANopen, openSYDE diagnostics,
//! Flashloader, variable access) provides one stateless type that turns a
//! [`CanFrame`] into human-readable text. The aggregation layer in
//! [`crate::interpreter`] holds one instance per protocol and dispatches to
//! the active one.

use crate::params::ParamStore;
use crate::types::config::DisplayConfig;
use crate::types::errors::StoreError;
use crate::types::frame::CanFrame;

/// One protocol's frame-to-text interpretation.
///
/// Implementations are stateless: all per-call variation comes from the
/// frame itself and the [`DisplayConfig`] passed in. This keeps decoders
/// trivially shareable across threads.
///
/// # Returns
///
/// [`interpret`](ProtocolDecoder::interpret) returns `Some(text)` when the
/// frame belongs to the protocol and could be decoded, `None` otherwise.
/// A frame that structurally cannot belong to the protocol (wrong id
/// format, wrong length) and a frame that matches the protocol's id space
/// but carries malformed content are treated the same way: the caller
/// falls back to a raw data dump. Decoders never panic on any input.
pub trait ProtocolDecoder {
    /// Short display name of the protocol, e.g. `"J1939"`.
    fn name(&self) -> &'static str;

    /// Interprets `frame`, or returns `None` when it cannot.
    fn interpret(&self, frame: &CanFrame, cfg: &DisplayConfig) -> Option<String>;

    /// Reads this protocol's settings from `section` of `store` into `cfg`.
    ///
    /// The default implementation does nothing; only protocols with
    /// configurable parameters override it. Missing keys leave `cfg`
    /// untouched.
    fn load_parameters(&self, cfg: &mut DisplayConfig, store: &dyn ParamStore, section: &str) {
        let _ = (cfg, store, section);
    }

    /// Writes this protocol's settings from `cfg` into `section` of `store`.
    ///
    /// The default implementation writes nothing and succeeds.
    fn save_parameters(
        &self,
        cfg: &DisplayConfig,
        store: &mut dyn ParamStore,
        section: &str,
    ) -> Result<(), StoreError> {
        let _ = (cfg, store, section);
        Ok(())
    }
}

//! # types
//!
//! `types` is the module containing all the useful public structs of the crate

pub mod config;
pub mod errors;
pub mod frame;

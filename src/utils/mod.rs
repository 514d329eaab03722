//! Utility helpers
//!
//! JSON load/save for the fitted-model input contract and the prepared
//! viewer payload.

pub mod io;

//! Frame analysis that sits beside the enhancement stages
//!
//! - Barcode region location (column edge-energy window)
//! - Laser-style scan line extraction

/// Column edge-energy scan for the most bar-code-like band
pub mod region;
/// Thin horizontal strips around the frame center
pub mod scan_lines;

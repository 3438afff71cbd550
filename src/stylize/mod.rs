//! # Stylization Engine
//!
//! Orchestrates decode, fit, color filters, edge darkening, blur and encoding.

pub mod engine;

pub use engine::{stylize_image, StylizationEngine};

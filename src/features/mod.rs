//! Feature extraction modules
//!
//! This module turns standardized audio into model-ready features:
//! - Mel filterbank construction
//! - MFCC extraction (framing, power spectrum, log-mel, DCT)
//! - Per-file coefficient normalization
//! - The time-major feature matrix type

pub mod matrix;
pub mod mel;
pub mod mfcc;
pub mod normalization;

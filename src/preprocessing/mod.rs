//! Audio preprocessing modules
//!
//! This module contains utilities for preparing captures before augmentation
//! and feature extraction:
//! - Length standardization (zero-pad or truncate to a fixed sample count)
//! - Level metering (power, RMS, peak, dB conversion, peak rescaling)

pub mod length;
pub mod level;

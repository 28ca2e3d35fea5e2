//! Audio and feature I/O
//!
//! Raw PCM 16-bit containers in and out, normalized sample buffers, and the
//! headerless feature matrix container.

pub mod feature_file;
pub mod pcm;
pub mod sample_buffer;

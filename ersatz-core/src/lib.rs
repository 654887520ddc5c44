//! Core synthesis logic for JJY and WWVB longwave time-code simulation over
//! an audio carrier. This crate is pure computation: no audio device, no
//! CLI, no process exit codes. It is deliberately callable from a test
//! harness with no sound card attached.

pub mod callback;
pub mod error;
pub mod jjy;
pub mod time;
pub mod wavetable;
pub mod wwvb;

pub use callback::SAMPLE_RATE;
pub use error::{Error, Result};

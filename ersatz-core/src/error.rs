use thiserror::Error;

/// Errors produced while setting up the synthesis core.
///
/// The realtime callback itself cannot fail (spec.md §7): every error here
/// is raised at startup, before the audio stream is opened.
#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "wavetable invariant violated: {freq_num}/{freq_den} Hz carrier * {wt_size} samples \
         is not an integer multiple of {sample_rate} Hz"
    )]
    WavetableInvariant {
        freq_num: u64,
        freq_den: u64,
        wt_size: usize,
        sample_rate: u32,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

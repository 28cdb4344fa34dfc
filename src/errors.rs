//! Error Types
//!
//! The only structural failure in this crate is a fatal resolution error: an
//! authored pass references a program the library does not know, so no
//! `Effect` can be produced at all. Recoverable authoring problems (an
//! override that matches no uniform) and runtime usage problems (writing an
//! unknown property, a length-mismatched buffer write) are deliberately *not*
//! errors — they are logged through the `log` crate and skipped, keeping the
//! authoring contract lenient.
//!
//! All public APIs that can fail return [`Result<T>`], an alias for
//! `std::result::Result<T, EffectError>`.

use thiserror::Error;

/// The error type for effect resolution.
#[derive(Error, Debug)]
pub enum EffectError {
    /// An authored pass names a program that is absent from the program
    /// library. Resolution aborts; no partial effect is produced.
    #[error("effect '{effect}': unknown program '{program}'")]
    ProgramNotFound {
        /// Name of the effect being resolved
        effect: String,
        /// The unresolved program name
        program: String,
    },

    /// JSON parsing error while deserializing an effect asset or a program
    /// reflection record.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, EffectError>`.
pub type Result<T> = std::result::Result<T, EffectError>;

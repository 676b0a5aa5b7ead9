//! Error taxonomy.
//!
//! Three classes, matching how the original engine actually recovers (or
//! doesn't) from a fault:
//!
//! - `Fatal` — the engine cannot continue; the caller is expected to hand
//!   this to `platform::Platform::i_error` and halt.
//! - `Local` — absorbed at the call site; logged via `log::warn!` and the
//!   operation degrades gracefully (e.g. a missing sound lump plays
//!   silence instead of crashing).
//! - `UserVisible` — surfaced to the player as in-universe feedback
//!   (e.g. "you don't have the blue key").

use alloc::string::String;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A required lump is missing from the loaded WAD.
    LumpNotFound(String),
    /// A lump exists but its size/shape doesn't match what the reader expects.
    MalformedLump { name: String, reason: String },
    /// The map data references an out-of-range index (vertex/sector/side/etc).
    BadReference { what: String, index: u32 },
    /// A short-reference arena is full (vanilla's "out of static zone").
    ArenaExhausted(&'static str),
    /// The WAD/IWAD signature or directory is corrupt.
    BadWad(String),
    /// A locally-absorbed condition worth logging but not fatal.
    Local(String),
}

impl CoreError {
    /// True for errors that leave the engine unable to keep running this level.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CoreError::LumpNotFound(_)
                | CoreError::MalformedLump { .. }
                | CoreError::BadReference { .. }
                | CoreError::ArenaExhausted(_)
                | CoreError::BadWad(_)
        )
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::LumpNotFound(name) => write!(f, "lump not found: {name}"),
            CoreError::MalformedLump { name, reason } => {
                write!(f, "malformed lump {name}: {reason}")
            }
            CoreError::BadReference { what, index } => {
                write!(f, "bad {what} reference: {index}")
            }
            CoreError::ArenaExhausted(which) => write!(f, "arena exhausted: {which}"),
            CoreError::BadWad(reason) => write!(f, "bad wad: {reason}"),
            CoreError::Local(reason) => write!(f, "{reason}"),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

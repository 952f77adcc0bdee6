//! ID3 specific items
//!
//! ID3v2 tags live at the start of a file (or at its end, for ID3v2.4 tags with a footer), and are
//! made up of frames. The legacy ID3v1 trailer occupies the last 128 bytes of a file, and is only
//! used as a fallback for the simple accessors.

pub mod v1;
pub mod v2;

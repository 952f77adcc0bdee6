//! Read, convert, and rewrite ID3v2 tags.
//!
//! Tagwright works on the ID3v2 tag of a single file (or any stream). The tag is found lazily, frame
//! headers are scanned on first use, and frame payloads stay on disk until they are needed.
//!
//! # Examples
//!
//! ## Reading and editing a tag
//!
//! ```rust,no_run
//! # fn main() -> tagwright::error::Result<()> {
//! use tagwright::config::{OpenMode, WriteOptions};
//! use tagwright::id3::v2::{Id3Tag, Id3v2Version};
//! use tagwright::TextEncoding;
//!
//! let mut tag = Id3Tag::open("test.mp3", OpenMode::ReadWrite)?;
//!
//! if let Some(title) = tag.title()? {
//! 	println!("Title: {title}");
//! }
//!
//! // Change the version, frames are renamed and converted as needed
//! tag.set_version(Id3v2Version::V4)?;
//! tag.set_artist("Foo artist", TextEncoding::UTF8)?;
//!
//! // Nothing changes on disk until the tag is written
//! tag.write(WriteOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using an existing reader
//!
//! ```rust
//! # fn main() -> tagwright::error::Result<()> {
//! use tagwright::config::{ParseOptions, ParsingMode};
//! use tagwright::id3::v2::Id3Tag;
//! use std::io::Cursor;
//!
//! let bytes = Cursor::new(b"ID3\x03\x00\x00\x00\x00\x00\x10TIT2\x00\x00\x00\x06\x00\x00\x00Title".to_vec());
//!
//! let mut tag = Id3Tag::read_from(bytes, ParseOptions::new().parsing_mode(ParsingMode::Strict));
//! assert_eq!(tag.title()?.as_deref(), Some("Title"));
//! # Ok(())
//! # }
//! ```
//!
//! # Important notes
//!
//! The payload of a frame is kept as raw bytes. Only a handful of frames have typed accessors
//! (text, comments, pictures, and volume adjustments), everything else is available through
//! [`Id3Tag::frame_raw`](id3::v2::Id3Tag::frame_raw) and
//! [`Id3Tag::frame_content`](id3::v2::Id3Tag::frame_content).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod id3;
pub(crate) mod macros;
mod util;

pub use util::text::TextEncoding;

pub use util::io;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use tagwright::prelude::*;
	//! ```

	pub use crate::TextEncoding;
	pub use crate::config::{OpenMode, ParseOptions, WriteOptions};
	pub use crate::id3::v2::{Id3Tag, Id3v2Version};
}

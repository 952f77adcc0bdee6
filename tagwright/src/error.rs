//! Contains the errors that can arise within Tagwright
//!
//! The primary error is [`TagwrightError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

pub use crate::util::text::TextEncodingError;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, TagwrightError>`
pub type Result<T> = std::result::Result<T, TagwrightError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Tag discovery
	/// The tag declares a major version this crate cannot read
	///
	/// Every query of the tag reports this, until the tag is treated as absent with
	/// [`Id3Tag::discard_unsupported_tag`](crate::id3::v2::Id3Tag::discard_unsupported_tag).
	UnsupportedVersion {
		/// The major version byte
		major: u8,
		/// The revision byte
		revision: u8,
	},
	/// Errors that arise while reading/writing ID3v2 tags
	Id3v2(Id3v2Error),

	// Data related errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Errors that arise while encoding text
	TextEncode(TextEncodingError),

	// Contract errors
	/// An argument was outside of its accepted range
	InvalidArgument(&'static str),
	/// Attempted to write through a tag opened with [`OpenMode::ReadOnly`](crate::config::OpenMode::ReadOnly)
	ReadOnly,
	/// Attempted to write a tag bound to a stream that does not support seeking
	NotSeekable,
	/// Attempted to convert a tag to a version that cannot be targeted
	UnsupportedTargetVersion,
	/// The tag needs a file rewrite, but it was not opened from a path
	NoPath,

	// Conversions for external errors
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// The types of errors that can occur while interacting with ID3v2 tags
#[derive(Debug)]
#[non_exhaustive]
pub enum Id3v2ErrorKind {
	// Header
	/// Arises when an extended header declares a size too small to be valid
	BadExtendedHeaderSize,

	// Frame
	/// Arises when a frame ID contains invalid characters (must be within `'A'..'Z'` or `'0'..'9'`)
	/// or has an invalid length for the tag version
	BadFrameId(Vec<u8>),
	/// Arises when a frame doesn't have enough data
	BadFrameLength,
	/// Arises when a frame index is out of bounds
	NoSuchFrame(usize),
	/// Arises when a picture frame has an unusable image format or MIME type
	BadPictureFormat(String),
	/// Arises when a volume adjustment is requested for a channel that cannot be stored
	BadRvaChannel(u8),
	/// Arises when decompressing a frame fails
	#[cfg(feature = "id3v2_compression_support")]
	Decompression(std::io::Error),
	/// Arises when a compressed frame is encountered, but support is disabled
	#[cfg(not(feature = "id3v2_compression_support"))]
	CompressedFrameEncountered,
	/// Arises when the contents of an encrypted frame are requested
	EncryptedFrameEncountered,
}

impl Display for Id3v2ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			// Header
			Self::BadExtendedHeaderSize => {
				write!(f, "Found an extended header with an invalid size")
			},

			// Frame
			Self::BadFrameId(frame_id) => write!(f, "Failed to parse a frame ID: 0x{frame_id:x?}"),
			Self::BadFrameLength => write!(
				f,
				"Frame isn't long enough to extract the necessary information"
			),
			Self::NoSuchFrame(index) => write!(f, "No frame exists at index {index}"),
			Self::BadPictureFormat(format) => {
				write!(f, "Picture: Found unexpected format \"{format}\"")
			},
			Self::BadRvaChannel(channel) => {
				write!(f, "Cannot store a volume adjustment for channel {channel}")
			},
			#[cfg(feature = "id3v2_compression_support")]
			Self::Decompression(err) => write!(f, "Failed to decompress frame: {err}"),
			#[cfg(not(feature = "id3v2_compression_support"))]
			Self::CompressedFrameEncountered => write!(
				f,
				"Encountered a compressed ID3v2 frame, support is disabled"
			),
			Self::EncryptedFrameEncountered => {
				write!(f, "Encrypted frames cannot be interpreted")
			},
		}
	}
}

/// An error that arises while interacting with an ID3v2 tag
pub struct Id3v2Error {
	kind: Id3v2ErrorKind,
}

impl Id3v2Error {
	/// Create a new `Id3v2Error` from an [`Id3v2ErrorKind`]
	#[must_use]
	pub const fn new(kind: Id3v2ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`Id3v2ErrorKind`]
	pub fn kind(&self) -> &Id3v2ErrorKind {
		&self.kind
	}
}

impl Debug for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {:?}", self.kind)
	}
}

impl Display for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {}", self.kind)
	}
}

/// Errors that could occur within Tagwright
pub struct TagwrightError {
	pub(crate) kind: ErrorKind,
}

impl TagwrightError {
	/// Create a `TagwrightError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::error::{ErrorKind, TagwrightError};
	///
	/// let read_only = TagwrightError::new(ErrorKind::ReadOnly);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::error::{ErrorKind, TagwrightError};
	///
	/// let read_only = TagwrightError::new(ErrorKind::ReadOnly);
	/// if let ErrorKind::ReadOnly = read_only.kind() {
	/// 	println!("Reopen the file for writing");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for TagwrightError {}

impl Debug for TagwrightError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<Id3v2Error> for TagwrightError {
	fn from(input: Id3v2Error) -> Self {
		Self {
			kind: ErrorKind::Id3v2(input),
		}
	}
}

impl From<TextEncodingError> for TagwrightError {
	fn from(input: TextEncodingError) -> Self {
		Self {
			kind: ErrorKind::TextEncode(input),
		}
	}
}

impl From<std::io::Error> for TagwrightError {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<tempfile::PersistError> for TagwrightError {
	fn from(input: tempfile::PersistError) -> Self {
		Self {
			kind: ErrorKind::Io(input.error),
		}
	}
}

impl From<std::collections::TryReserveError> for TagwrightError {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for TagwrightError {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for TagwrightError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::UnsupportedVersion { major, revision } => write!(
				f,
				"Found an unsupported ID3v2 version (major: {major}, revision: {revision})"
			),
			ErrorKind::Id3v2(ref id3v2_err) => write!(f, "{id3v2_err}"),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(message) => write!(f, "Text encoding: {message}"),
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),

			ErrorKind::InvalidArgument(message) => write!(f, "Invalid argument: {message}"),
			ErrorKind::ReadOnly => write!(f, "Attempted to write a tag opened read-only"),
			ErrorKind::NotSeekable => {
				write!(f, "Attempted to write a tag bound to an unseekable stream")
			},
			ErrorKind::UnsupportedTargetVersion => {
				write!(f, "Tags cannot be converted to the requested version")
			},
			ErrorKind::NoPath => write!(
				f,
				"The tag must be rewritten through a temporary file, but has no path"
			),

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}

use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};

use std::fmt::{Debug, Display, Formatter};

/// An ID3v2 frame ID
///
/// IDs are 3 characters in ID3v2.2 and 4 characters in ID3v2.3/4. Every character must be within
/// `'A'..='Z'` or `'0'..='9'`.
///
/// The length is **not** checked against a tag version here, a tag will happily hold a 4 character
/// ID in an ID3v2.2 tag (and vice versa) until the tag is converted or written.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FrameId {
	bytes: [u8; 4],
	len: u8,
}

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9')
	/// * `id` is empty, or longer than 4 characters
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::FrameId;
	///
	/// # fn main() -> tagwright::error::Result<()> {
	/// let title = FrameId::new("TIT2")?;
	/// assert_eq!(title.as_str(), "TIT2");
	///
	/// assert!(FrameId::new("tit2").is_err());
	/// assert!(FrameId::new("TITLE").is_err());
	/// # Ok(()) }
	/// ```
	pub fn new(id: &str) -> Result<Self> {
		if id.is_empty() || id.len() > 4 || !Self::is_valid_id(id.as_bytes()) {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.as_bytes().to_vec())).into());
		}

		Ok(Self::from_raw(id.as_bytes()))
	}

	// Callers are expected to have checked the bytes with `is_valid_id` already
	pub(crate) fn from_raw(id: &[u8]) -> Self {
		let len = id.len().min(4);

		let mut bytes = [0; 4];
		bytes[..len].copy_from_slice(&id[..len]);

		Self {
			bytes,
			len: len as u8,
		}
	}

	pub(crate) fn is_valid_id(id: &[u8]) -> bool {
		id.iter().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		std::str::from_utf8(self.as_bytes()).unwrap_or_default()
	}

	/// The raw ID bytes
	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes[..usize::from(self.len)]
	}

	/// The number of characters in the ID
	pub fn len(&self) -> usize {
		usize::from(self.len)
	}

	/// Whether this is a text information frame
	///
	/// NOTE: User defined text frames (`TXX`/`TXXX`) are included.
	pub fn is_text(&self) -> bool {
		self.bytes[0] == b'T'
	}

	pub(crate) fn matches(&self, id: &str) -> bool {
		self.as_bytes() == id.as_bytes()
	}
}

impl Debug for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "FrameId({})", self.as_str())
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl TryFrom<&str> for FrameId {
	type Error = crate::error::TagwrightError;

	fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl PartialEq<&str> for FrameId {
	fn eq(&self, other: &&str) -> bool {
		self.matches(other)
	}
}

use super::text::verify_encoding;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::util::text::{TextEncoding, decode_text, split_terminated};

/// The language used for new comments when none is given
pub const UNKNOWN_LANGUAGE: [u8; 3] = *b"XXX";

/// An ID3v2 comment frame (`COM`/`COMM`)
///
/// Comments are told apart by their description and language.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Comment {
	/// The encoding of the description and comment text
	pub encoding: TextEncoding,
	/// ISO-639-2 language code (3 bytes)
	pub language: [u8; 3],
	/// Content description
	pub description: String,
	/// The actual comment
	pub text: String,
}

impl Comment {
	/// Read a [`Comment`] from a frame payload
	///
	/// # Errors
	///
	/// * The payload is too short to hold the encoding and language
	/// * The encoding byte is invalid
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::Comment;
	///
	/// # fn main() -> tagwright::error::Result<()> {
	/// let comment = Comment::parse(b"\x00engDescription\x00Comment text")?;
	///
	/// assert_eq!(&comment.language, b"eng");
	/// assert_eq!(comment.description, "Description");
	/// assert_eq!(comment.text, "Comment text");
	/// # Ok(()) }
	/// ```
	pub fn parse(payload: &[u8]) -> Result<Self> {
		if payload.len() < 4 {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
		}

		let encoding = verify_encoding(payload)?;

		let mut language = [0; 3];
		language.copy_from_slice(&payload[1..4]);

		let (description, text) = split_terminated(&payload[4..], encoding);

		Ok(Self {
			encoding,
			language,
			description: decode_text(description, encoding),
			text: decode_text(text, encoding),
		})
	}

	/// Whether this comment matches a description and language
	///
	/// `None` matches anything.
	pub fn matches(&self, description: Option<&str>, language: Option<&[u8; 3]>) -> bool {
		description.is_none_or(|description| self.description == description)
			&& language.is_none_or(|language| &self.language == language)
	}

	/// Convert a [`Comment`] to a frame payload
	///
	/// The comment text is not terminated.
	///
	/// # Errors
	///
	/// The description or text can't be represented in [`Comment::encoding`]
	pub fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut bytes = vec![self.encoding as u8];
		bytes.extend(self.language);
		bytes.extend(self.encoding.encode(&self.description, true, false)?);
		bytes.extend(self.encoding.encode(&self.text, false, false)?);

		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::{Comment, UNKNOWN_LANGUAGE};
	use crate::util::text::TextEncoding;

	#[test_log::test]
	fn comment_bytes() {
		let comment = Comment {
			encoding: TextEncoding::UTF16,
			language: UNKNOWN_LANGUAGE,
			description: String::new(),
			text: String::from("Hello"),
		};

		let bytes = comment.as_bytes().unwrap();
		assert_eq!(&bytes[..6], b"\x01XXX\xFF\xFE");
		assert_eq!(&bytes[6..8], &[0, 0]);

		assert_eq!(Comment::parse(&bytes).unwrap(), comment);
	}

	#[test_log::test]
	fn matching() {
		let comment = Comment::parse(b"\x00engnotes\x00text").unwrap();

		assert!(comment.matches(None, None));
		assert!(comment.matches(Some("notes"), Some(b"eng")));
		assert!(!comment.matches(Some(""), None));
		assert!(!comment.matches(None, Some(b"deu")));
	}

	#[test_log::test]
	fn too_short() {
		assert!(Comment::parse(b"\x00en").is_err());
		assert!(Comment::parse(b"\x09eng").is_err());
	}
}

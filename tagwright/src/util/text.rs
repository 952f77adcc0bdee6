/// Errors that can occur while encoding text
#[derive(Copy, Clone, Debug)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The target text encoding
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// The character index in the provided string up to which the encoding was valid
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let encoding = match self.encoding {
			TextEncoding::Latin1 => "Latin-1",
			TextEncoding::UTF16 => "UTF-16",
			TextEncoding::UTF8 => "UTF-8",
			TextEncoding::UTF16BE => "UTF-16 BE",
		};

		write!(
			f,
			"invalid {encoding} sequence from index {}",
			self.valid_up_to
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The text encoding for use in ID3v2 frames
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash, Default)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	#[default]
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	/// The width of a string terminator in this encoding
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::TextEncoding;
	///
	/// assert_eq!(TextEncoding::Latin1.terminator_len(), 1);
	/// assert_eq!(TextEncoding::UTF16BE.terminator_len(), 2);
	/// ```
	pub fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE => 2,
		}
	}

	/// ID3v2.4 introduced two new text encodings.
	///
	/// When writing ID3v2.3 (or ID3v2.2), we just substitute with UTF-16.
	pub(crate) fn to_id3v23(self) -> Self {
		match self {
			Self::UTF8 | Self::UTF16BE => {
				log::warn!(
					"Text encoding {:?} is not supported in ID3v2.3, substituting with UTF-16",
					self
				);
				Self::UTF16
			},
			_ => self,
		}
	}

	pub(crate) fn encode(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		match self {
			TextEncoding::Latin1 => {
				let mut out =
					latin1_encode(text, lossy).collect::<std::result::Result<Vec<u8>, _>>()?;
				if terminated {
					out.push(0)
				}

				Ok(out)
			},
			TextEncoding::UTF16 => Ok(utf16_encode(text, u16::to_le_bytes, true, terminated)),
			TextEncoding::UTF16BE => Ok(utf16_encode(text, u16::to_be_bytes, false, terminated)),
			TextEncoding::UTF8 => {
				let mut out = text.as_bytes().to_vec();

				if terminated {
					out.push(0);
				}

				Ok(out)
			},
		}
	}
}

/// Split `bytes` at the first terminator for `encoding`
///
/// Returns the content before the terminator, and everything after it. If no terminator exists,
/// the entire input is content and the remainder is empty.
pub(crate) fn split_terminated(bytes: &[u8], encoding: TextEncoding) -> (&[u8], &[u8]) {
	match encoding {
		TextEncoding::Latin1 | TextEncoding::UTF8 => match bytes.iter().position(|b| *b == 0) {
			Some(pos) => (&bytes[..pos], &bytes[pos + 1..]),
			None => (bytes, &[]),
		},
		TextEncoding::UTF16 | TextEncoding::UTF16BE => {
			let terminator = bytes
				.chunks_exact(2)
				.position(|c| c == [0, 0])
				.map(|unit| unit * 2);

			match terminator {
				Some(pos) => (&bytes[..pos], &bytes[pos + 2..]),
				None => (bytes, &[]),
			}
		},
	}
}

/// Decode a single string, ignoring anything past the first terminator
pub(crate) fn decode_text(bytes: &[u8], encoding: TextEncoding) -> String {
	let (content, _) = split_terminated(bytes, encoding);
	decode_field(content, encoding, u16::from_be_bytes).0
}

/// Decode every terminator-separated string in `bytes`
///
/// A trailing terminator does not produce an empty field.
pub(crate) fn decode_fields(mut bytes: &[u8], encoding: TextEncoding) -> Vec<String> {
	let mut fields = Vec::new();
	let mut endianness: fn([u8; 2]) -> u16 = u16::from_be_bytes;

	while !bytes.is_empty() {
		let (content, rest) = split_terminated(bytes, encoding);

		let (field, used) = decode_field(content, encoding, endianness);
		endianness = used;
		fields.push(field);

		bytes = rest;
	}

	fields
}

// Strings without a BOM in a UTF-16 frame reuse the byte order of the previous string
fn decode_field(
	content: &[u8],
	encoding: TextEncoding,
	endianness: fn([u8; 2]) -> u16,
) -> (String, fn([u8; 2]) -> u16) {
	let little_endian: fn([u8; 2]) -> u16 = u16::from_le_bytes;
	let big_endian: fn([u8; 2]) -> u16 = u16::from_be_bytes;

	match encoding {
		TextEncoding::Latin1 => (latin1_decode(content), endianness),
		TextEncoding::UTF8 => {
			let mut text = String::from_utf8_lossy(content).into_owned();
			trim_end_nulls(&mut text);
			(text, endianness)
		},
		TextEncoding::UTF16BE => (utf16_decode_bytes(content, big_endian), endianness),
		TextEncoding::UTF16 => match content {
			[0xFF, 0xFE, rest @ ..] => (utf16_decode_bytes(rest, little_endian), little_endian),
			[0xFE, 0xFF, rest @ ..] => (utf16_decode_bytes(rest, big_endian), big_endian),
			_ => (utf16_decode_bytes(content, endianness), endianness),
		},
	}
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let mut text = bytes.iter().map(|c| *c as char).collect::<String>();
	trim_end_nulls(&mut text);
	text
}

pub(crate) fn latin1_encode(
	s: &str,
	lossy: bool,
) -> impl Iterator<Item = std::result::Result<u8, TextEncodingError>> {
	s.chars().enumerate().map(move |(index, c)| {
		if (c as u32) <= 255 {
			Ok(c as u8)
		} else if lossy {
			Ok(b'?')
		} else {
			Err(TextEncodingError {
				encoding: TextEncoding::Latin1,
				valid_up_to: index,
			})
		}
	})
}

// A dangling odd byte is ignored
pub(crate) fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> String {
	let units: Vec<u16> = bytes
		.chunks_exact(2)
		.map(|c| endianness([c[0], c[1]]))
		.collect();

	let mut text = String::from_utf16_lossy(&units);
	trim_end_nulls(&mut text);
	text
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	if text.ends_with('\0') {
		let new_len = text.trim_end_matches('\0').len();
		text.truncate(new_len);
	}
}

fn utf16_encode(
	text: &str,
	endianness: fn(u16) -> [u8; 2],
	bom: bool,
	terminated: bool,
) -> Vec<u8> {
	let mut encoded = Vec::<u8>::new();

	if bom {
		encoded.extend_from_slice(&endianness(0xFEFF_u16));
	}

	for ch in text.encode_utf16() {
		encoded.extend_from_slice(&endianness(ch));
	}

	if terminated {
		encoded.extend_from_slice(&[0, 0]);
	}

	encoded
}

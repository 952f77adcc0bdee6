use crate::error::Result;
use crate::id3::v2::Id3v2Version;
use crate::macros::err;
use crate::util::text::{TextEncoding, decode_fields};

/// Get the encoding of a text frame payload
pub(crate) fn verify_encoding(payload: &[u8]) -> Result<TextEncoding> {
	let Some(&encoding_byte) = payload.first() else {
		err!(TextDecode("Text frame has no encoding byte"));
	};

	match TextEncoding::from_u8(encoding_byte) {
		Some(encoding) => Ok(encoding),
		None => err!(TextDecode("Found invalid encoding")),
	}
}

/// Decode every string in a text frame payload
///
/// An empty payload has no strings.
pub(crate) fn parse_text_frame(payload: &[u8]) -> Result<Vec<String>> {
	if payload.is_empty() {
		return Ok(Vec::new());
	}

	let encoding = verify_encoding(payload)?;
	Ok(decode_fields(&payload[1..], encoding))
}

/// The encoding to use for text written into a tag of `version`
pub(crate) fn encoding_for_version(encoding: TextEncoding, version: Id3v2Version) -> TextEncoding {
	if version == Id3v2Version::V4 {
		return encoding;
	}

	encoding.to_id3v23()
}

/// Build a text frame payload with a single string
///
/// The encoding is substituted when `version` does not support it. The string is not terminated.
pub(crate) fn text_frame_bytes(text: &str, encoding: TextEncoding, version: Id3v2Version) -> Result<Vec<u8>> {
	let encoding = encoding_for_version(encoding, version);

	let mut bytes = vec![encoding as u8];
	bytes.extend(encoding.encode(text, false, false)?);

	Ok(bytes)
}

/// Build a text frame payload holding multiple strings, separated by terminators
pub(crate) fn text_fields_bytes<S>(fields: &[S], encoding: TextEncoding) -> Result<Vec<u8>>
where
	S: AsRef<str>,
{
	let mut bytes = vec![encoding as u8];
	for (i, field) in fields.iter().enumerate() {
		let terminated = i + 1 < fields.len();
		bytes.extend(encoding.encode(field.as_ref(), terminated, false)?);
	}

	Ok(bytes)
}

/// Re-encode a text frame for `version`, if it uses an encoding the version doesn't support
///
/// Returns `None` if the payload can stay as it is.
pub(crate) fn transcode_for_version(payload: &[u8], version: Id3v2Version) -> Result<Option<Vec<u8>>> {
	if payload.is_empty() {
		return Ok(None);
	}

	let encoding = verify_encoding(payload)?;
	let target = encoding_for_version(encoding, version);
	if target == encoding {
		return Ok(None);
	}

	let fields = decode_fields(&payload[1..], encoding);
	text_fields_bytes(&fields, target).map(Some)
}

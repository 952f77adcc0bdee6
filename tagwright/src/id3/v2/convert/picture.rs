//! ID3v2.2 describes pictures with a 3 character image format, later versions use a MIME type

use super::Outcome;
use super::rules::Direction;
use crate::error::Result;
use crate::id3::v2::Frame;
use crate::id3::v2::util::mime::{format_for_mime_type, mime_type_for_format};
use crate::util::text::{latin1_decode, latin1_encode};

pub(super) fn convert(frame: &mut Frame, direction: Direction) -> Result<Outcome> {
	let content = frame.content().unwrap_or_default();

	let converted = match direction {
		Direction::Forward => with_mime_type(content),
		Direction::Backward => with_image_format(content),
	};

	match converted {
		Some(converted) => {
			frame.set_content(converted)?;
			Ok(Outcome::Rewrite)
		},
		None => {
			log::warn!("Dropping picture frame {}, its format can't be converted", frame.id);
			Ok(Outcome::Remove)
		},
	}
}

// encoding, format[3], rest -> encoding, MIME type, 0, rest
fn with_mime_type(content: &[u8]) -> Option<Vec<u8>> {
	if content.len() < 4 {
		return None;
	}

	let format = &content[1..4];
	let format_len = format.iter().position(|b| *b == 0).unwrap_or(format.len());
	let mime_type = mime_type_for_format(&latin1_decode(&format[..format_len]));

	let mut converted = Vec::with_capacity(content.len() + mime_type.len());
	converted.push(content[0]);
	converted.extend(mime_type.as_bytes());
	converted.push(0);
	converted.extend(&content[4..]);

	Some(converted)
}

// encoding, MIME type, 0, rest -> encoding, format[3], rest
fn with_image_format(content: &[u8]) -> Option<Vec<u8>> {
	let (&encoding, rest) = content.split_first()?;
	let end = rest.iter().position(|b| *b == 0)?;

	let mime_type = latin1_decode(&rest[..end]);
	let format = format_for_mime_type(&mime_type)?;

	let mut format = latin1_encode(&format, true).collect::<std::result::Result<Vec<u8>, _>>().ok()?;
	if format.len() < 3 {
		log::warn!("Padding the short image format of \"{mime_type}\" with zeros");
	}

	format.resize(3, 0);

	let mut converted = Vec::with_capacity(content.len());
	converted.push(encoding);
	converted.extend(format);
	converted.extend(&rest[end + 1..]);

	Some(converted)
}

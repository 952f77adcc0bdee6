use super::constants::{GENRE_UNKNOWN, ID3V1_TAG_MARKER, TRAILER_SIZE};
use super::tag::LegacyTrailer;
use crate::util::text::latin1_decode;

impl LegacyTrailer {
	/// Parse a trailer, returning `None` if the marker is missing
	pub(crate) fn parse(reader: &[u8; TRAILER_SIZE]) -> Option<Self> {
		if reader[..3] != ID3V1_TAG_MARKER {
			return None;
		}

		let mut tag = Self::new();
		tag.exists = true;

		let reader = &reader[3..];

		tag.title = decode_text(&reader[..30]);
		tag.artist = decode_text(&reader[30..60]);
		tag.album = decode_text(&reader[60..90]);
		tag.year = decode_text(&reader[90..94]);

		// A zero at byte 125 terminates a 28 byte comment and marks byte 126 as the track number
		let range = if reader[122] == 0 {
			if reader[123] != 0 {
				tag.track_number = Some(reader[123]);
			}

			94_usize..122
		} else {
			94..124
		};

		tag.comment = decode_text(&reader[range]);

		if reader[124] != GENRE_UNKNOWN {
			tag.genre = Some(reader[124]);
		}

		Some(tag)
	}
}

fn decode_text(data: &[u8]) -> Option<String> {
	let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
	if end == 0 {
		return None;
	}

	Some(latin1_decode(&data[..end]))
}

use super::constants::{GENRE_UNKNOWN, ID3V1_TAG_MARKER, TRAILER_SIZE};
use super::tag::LegacyTrailer;
use crate::util::text::latin1_encode;

impl LegacyTrailer {
	/// Encode the trailer into its 128 byte form
	///
	/// Characters outside of Latin-1 are replaced with `?`.
	pub fn encode(&self) -> [u8; TRAILER_SIZE] {
		let mut out = [0; TRAILER_SIZE];
		out[..3].copy_from_slice(&ID3V1_TAG_MARKER);

		write_field(&mut out[3..33], self.title.as_deref());
		write_field(&mut out[33..63], self.artist.as_deref());
		write_field(&mut out[63..93], self.album.as_deref());
		write_field(&mut out[93..97], self.year.as_deref());
		write_field(&mut out[97..127], self.comment.as_deref());

		// Only a comment of 28 bytes or less leaves room for the track number
		if let Some(track_number) = self.track_number {
			if out[125] == 0 && track_number != 0 {
				out[126] = track_number;
			}
		}

		out[127] = self.genre.unwrap_or(GENRE_UNKNOWN);
		out
	}
}

fn write_field(field: &mut [u8], value: Option<&str>) {
	let Some(value) = value else {
		return;
	};

	for (dest, byte) in field.iter_mut().zip(latin1_encode(value, true)) {
		*dest = byte.unwrap_or(b'?');
	}
}

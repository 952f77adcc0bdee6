use super::FrameFlags;
use crate::error::Result;
use crate::macros::id3v2_err;

/// Get the interpretable content of a payload
///
/// Compressed payloads are inflated, encrypted payloads can never be interpreted.
pub(crate) fn decoded_content(payload: &[u8], flags: &FrameFlags, allocation_limit: usize) -> Result<Vec<u8>> {
	if flags.encryption.is_some() {
		id3v2_err!(@BAIL EncryptedFrameEncountered);
	}

	if flags.compression {
		return decompress(payload, flags, allocation_limit);
	}

	Ok(payload.to_vec())
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress(payload: &[u8], flags: &FrameFlags, allocation_limit: usize) -> Result<Vec<u8>> {
	use crate::util::alloc::VecFallibleCapacity;

	use std::io::Read;

	use flate2::read::ZlibDecoder;

	let expected_len = flags.data_length_indicator.unwrap_or(0) as usize;
	let mut content = Vec::try_with_capacity_stable(expected_len, allocation_limit)?;

	// One byte past the limit, to tell a payload that is exactly at the limit apart from an oversized one
	let mut decoder = ZlibDecoder::new(payload).take(allocation_limit as u64 + 1);
	if let Err(e) = decoder.read_to_end(&mut content) {
		id3v2_err!(@BAIL Decompression(e));
	}

	if content.len() > allocation_limit {
		crate::macros::err!(TooMuchData);
	}

	if expected_len != 0 && content.len() != expected_len {
		log::warn!(
			"Decompressed frame is {} bytes, the data length indicator says {expected_len}",
			content.len()
		);
	}

	Ok(content)
}

#[cfg(not(feature = "id3v2_compression_support"))]
fn decompress(_: &[u8], _: &FrameFlags, _: usize) -> Result<Vec<u8>> {
	id3v2_err!(@BAIL CompressedFrameEncountered)
}

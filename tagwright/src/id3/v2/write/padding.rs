use crate::id3::v2::header::HEADER_SIZE;

/// How much padding is left after the frames of a written tag
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PaddingPolicy {
	/// Reuse the existing tag size when the frames still fit, otherwise pad by at least 32 bytes
	///
	/// New sizes are rounded up to 256 bytes, then the next power of two up to 32 KiB, then the
	/// next multiple of 16 KiB.
	#[default]
	Default,
	/// No padding, the tag is exactly as large as its frames
	None,
	/// The tag is at least this many bytes, header included
	Minimum(u32),
}

const MIN_PADDING: u32 = 32;
const SMALL_TAG: u32 = 256;
const POWER_OF_TWO_LIMIT: u32 = 32 * 1024;
const LARGE_TAG_MULTIPLE: u32 = 16 * 1024;

/// The total size of a tag, header and footer included
///
/// * `frames_len` - The size of every frame, headers included
/// * `old_size` - The total size of the tag on disk, `0` if there is none
/// * `footer` - Whether the tag is appended with a footer, which rules out padding
///
/// A tag without frames has a size of `0`, it is removed when written.
pub(crate) fn tag_size(frames_len: u32, old_size: u32, policy: PaddingPolicy, footer: bool) -> u32 {
	if frames_len == 0 {
		return 0;
	}

	let unpadded = frames_len.saturating_add(HEADER_SIZE);
	if footer {
		return unpadded.saturating_add(HEADER_SIZE);
	}

	match policy {
		PaddingPolicy::Default if old_size >= unpadded => old_size,
		PaddingPolicy::Default => default_size(unpadded),
		PaddingPolicy::None => unpadded,
		PaddingPolicy::Minimum(minimum) => unpadded.max(minimum),
	}
}

fn default_size(unpadded: u32) -> u32 {
	let padded = unpadded.saturating_add(MIN_PADDING);
	if padded <= SMALL_TAG {
		return SMALL_TAG;
	}

	if padded <= POWER_OF_TWO_LIMIT {
		return padded.next_power_of_two();
	}

	padded.div_ceil(LARGE_TAG_MULTIPLE).saturating_mul(LARGE_TAG_MULTIPLE)
}

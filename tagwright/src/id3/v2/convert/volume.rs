//! `XRV`, `XRVA` and `RVA2` share a layout, the content is only checked

use super::Outcome;
use crate::id3::v2::Frame;
use crate::id3::v2::items::VolumeAdjustment;

pub(super) fn convert(frame: &Frame) -> Outcome {
	if VolumeAdjustment::is_valid(frame.content().unwrap_or_default()) {
		return Outcome::Rewrite;
	}

	log::warn!(
		"Dropping volume adjustment frame {}, its content is malformed",
		frame.id
	);
	Outcome::Remove
}

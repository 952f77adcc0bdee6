use crate::error::Result;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, encode_unsync};
use crate::id3::v2::{Frame, Id3v2Version};
use crate::macros::err;

use std::borrow::Cow;
use std::ops::Range;

use byteorder::{BigEndian, WriteBytesExt};

/// Where a frame's payload ended up in the serialized body
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct WrittenFrame {
	pub payload: Range<usize>,
	/// Whether the payload was unsynchronised on its own (ID3v2.4)
	pub unsynchronised: bool,
}

/// Append a frame to `body`
///
/// Returns `None` if the frame can't be represented in `version`.
///
/// `content` is the decoded payload of `frame`. For ID3v2.4, the payload is unsynchronised when
/// either `tag_unsync` or the frame's own flag asks for it, and the flag is only written when
/// unsynchronisation changed something.
pub(super) fn write_frame(
	body: &mut Vec<u8>,
	frame: &Frame,
	content: &[u8],
	version: Id3v2Version,
	tag_unsync: bool,
) -> Result<Option<WrittenFrame>> {
	if frame.id.len() != version.frame_id_len() {
		log::warn!("Discarding frame {}, its ID is not valid in {version:?}", frame.id);
		return Ok(None);
	}

	let mut flags = frame.flags;

	let mut payload = Cow::Borrowed(content);
	if version == Id3v2Version::V4 && (tag_unsync || flags.unsynchronisation) {
		let encoded = encode_unsync(content);
		flags.unsynchronisation = encoded.len() != content.len();
		if flags.unsynchronisation {
			payload = Cow::Owned(encoded);
		}
	} else {
		flags.unsynchronisation = false;
	}

	// Only compressed frames have a length that differs from the payload we hold
	if !flags.compression && flags.data_length_indicator.is_some() {
		flags.data_length_indicator = Some(content.len() as u32);
	}

	let additions_len = flags.additions_len(version);
	let Some(size) = u32::try_from(payload.len())
		.ok()
		.and_then(|len| len.checked_add(additions_len))
	else {
		err!(TooMuchData);
	};

	log::trace!("Writing frame {} ({size} bytes, {flags:?})", frame.id);

	body.extend(frame.id.as_bytes());
	match version {
		Id3v2Version::V2 => {
			if size > 0x00FF_FFFF {
				err!(TooMuchData);
			}

			body.write_u24::<BigEndian>(size)?;
		},
		Id3v2Version::V3 => {
			body.write_u32::<BigEndian>(size)?;
			body.write_u16::<BigEndian>(flags.as_bits(version))?;
		},
		Id3v2Version::V4 => {
			body.write_u32::<BigEndian>(size.synch()?)?;
			body.write_u16::<BigEndian>(flags.as_bits(version))?;
		},
	}

	match version {
		Id3v2Version::V2 => {},
		Id3v2Version::V3 => {
			if flags.compression {
				body.write_u32::<BigEndian>(flags.data_length_indicator.unwrap_or(0))?;
			}
			if let Some(method) = flags.encryption {
				body.push(method);
			}
			if let Some(group) = flags.grouping_identity {
				body.push(group);
			}
		},
		Id3v2Version::V4 => {
			if let Some(group) = flags.grouping_identity {
				body.push(group);
			}
			if let Some(method) = flags.encryption {
				body.push(method);
			}
			if let Some(len) = flags.data_length_indicator {
				body.write_u32::<BigEndian>(len.synch()?)?;
			}
		},
	}

	let start = body.len();
	body.extend_from_slice(&payload);

	Ok(Some(WrittenFrame {
		payload: start..body.len(),
		unsynchronised: flags.unsynchronisation,
	}))
}

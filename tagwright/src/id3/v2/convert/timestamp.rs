//! ID3v2.3 splits recording times into `TYER` (`YYYY`), `TDAT` (`DDMM`) and `TIME` (`HHmm`).
//! ID3v2.4 has a single `TDRC` frame holding a timestamp (`YYYY-MM-DDTHH:mm`).

use super::Outcome;
use super::rules::Direction;
use crate::error::Result;
use crate::id3::v2::items::text::{parse_text_frame, text_frame_bytes, verify_encoding};
use crate::id3::v2::{Frame, FrameFlags, FrameId, Id3v2Version};
use crate::util::text::TextEncoding;

// Unknown components of a timestamp built from separate frames
const TEMPLATE: &str = "????-??-??T??:??";

const YEAR_POSITION: usize = 0;
const DATE_POSITION: usize = 4;
const TIME_POSITION: usize = 10;

pub(super) fn convert(frames: &mut Vec<Frame>, index: usize, direction: Direction) -> Result<Outcome> {
	match direction {
		Direction::Forward => merge(frames, index),
		Direction::Backward => split(frames, index),
	}
}

fn first_string(frame: &Frame) -> Option<String> {
	let content = frame.content().unwrap_or_default();
	parse_text_frame(content).ok()?.into_iter().next()
}

fn is_digits(text: &str) -> bool {
	text.bytes().all(|b| b.is_ascii_digit())
}

/// Write `piece` into `timestamp` at `position`, filling any gap from [`TEMPLATE`]
pub(crate) fn splice(timestamp: &str, position: usize, piece: &str) -> String {
	let mut chars = timestamp.chars().collect::<Vec<_>>();

	let end = position + piece.chars().count();
	if chars.len() < end {
		chars.extend(TEMPLATE.chars().skip(chars.len()).take(end - chars.len()));
	}

	for (slot, c) in chars[position..end].iter_mut().zip(piece.chars()) {
		*slot = c;
	}

	chars.into_iter().collect()
}

fn merge(frames: &mut [Frame], index: usize) -> Result<Outcome> {
	let frame = &frames[index];
	let id = frame.id;

	let value = first_string(frame).unwrap_or_default();
	if value.len() != 4 || !is_digits(&value) {
		log::warn!("Dropping non-standard {id} frame \"{value}\"");
		return Ok(Outcome::Remove);
	}

	let (position, piece) = match id.as_str() {
		"TYER" => (YEAR_POSITION, value),
		"TDAT" => (DATE_POSITION, format!("-{}-{}", &value[2..], &value[..2])),
		"TIME" => (TIME_POSITION, format!("T{}:{}", &value[..2], &value[2..])),
		_ => {
			log::warn!("Dropping frame {id}, it is not part of a timestamp");
			return Ok(Outcome::Remove);
		},
	};

	let source_encoding = verify_encoding(frame.content().unwrap_or_default())?;

	let existing = frames
		.iter()
		.position(|frame| frame.id == "TDRC" && !frame.flags.is_opaque() && frame.is_loaded());

	match existing {
		// Merge into the timestamp, the source frame is no longer needed
		Some(timestamp_index) => {
			let timestamp = &mut frames[timestamp_index];
			let content = timestamp.content().unwrap_or_default();

			let encoding = verify_encoding(content).unwrap_or(source_encoding);
			let current = first_string(timestamp).unwrap_or_default();

			let merged = splice(&current, position, &piece);
			log::trace!("Merging {id} into TDRC: \"{current}\" -> \"{merged}\"");

			timestamp.set_content(text_frame_bytes(&merged, encoding, Id3v2Version::V4)?)?;
			Ok(Outcome::Remove)
		},
		// The source frame becomes the timestamp
		None => {
			let timestamp = splice("", position, &piece);
			frames[index].set_content(text_frame_bytes(
				&timestamp,
				source_encoding,
				Id3v2Version::V4,
			)?)?;

			Ok(Outcome::Rewrite)
		},
	}
}

fn split(frames: &mut Vec<Frame>, index: usize) -> Result<Outcome> {
	let timestamp = first_string(&frames[index]).unwrap_or_default();
	let chars = timestamp.chars().collect::<Vec<_>>();

	let component = |ranges: &[(usize, usize)]| -> Option<String> {
		let text = ranges
			.iter()
			.filter_map(|(start, end)| chars.get(*start..*end))
			.flatten()
			.collect::<String>();

		(text.len() == 4 && is_digits(&text)).then_some(text)
	};

	let mut components = Vec::new();
	if chars.len() >= 4 {
		components.push(("TYER", component(&[(0, 4)])));
	}

	if chars.len() >= 10 {
		components.push(("TDAT", component(&[(8, 10), (5, 7)])));
	}

	if chars.len() >= 16 {
		components.push(("TIME", component(&[(11, 13), (14, 16)])));
	}

	for (id, value) in components {
		let Some(value) = value else {
			log::warn!("Not creating {id}, the timestamp \"{timestamp}\" has no digits for it");
			continue;
		};

		let content = text_frame_bytes(&value, TextEncoding::Latin1, Id3v2Version::V3)?;
		match frames.iter_mut().find(|frame| frame.id == id) {
			Some(existing) => {
				existing.flags = FrameFlags::default();
				existing.set_content(content)?;
			},
			None => frames.push(Frame::new(FrameId::from_raw(id.as_bytes()), content)?),
		}
	}

	Ok(Outcome::Remove)
}

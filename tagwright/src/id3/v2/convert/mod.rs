//! Frame conversion between ID3v2 versions
//!
//! Conversions always move a single version at a time, so ID3v2.2 to ID3v2.4 passes through
//! ID3v2.3. Every step looks each frame up in the table for that step (see [`rules`]):
//!
//! * No rule, the frame is carried over as is
//! * A rule without a target, the frame has no equivalent and is dropped
//! * A rule without a converter, the frame is renamed
//! * A rule with a converter, the converter decides whether the frame is rewritten and renamed,
//!   or removed (possibly after merging its content into other frames)

mod genre;
mod link;
mod picture;
pub(crate) mod rules;
mod timestamp;
mod volume;

use rules::{ConversionRule, Converter, Direction, V2_V3, V3_V4, find_rule};

use super::frame::{Frame, FrameFlags, FrameId};
use super::items::text::transcode_for_version;
use super::Id3v2Version;
use crate::error::Result;
use crate::macros::err;

/// What to do with a frame after its converter ran
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
	/// The payload is ready for the target version, rename the frame
	Rewrite,
	/// Remove the frame
	Remove,
}

/// Convert `frames` from one version to another
///
/// The frames are only replaced once every step succeeded, an error leaves them untouched.
/// Frames that go through a converter must already be loaded.
pub(crate) fn convert(frames: &mut Vec<Frame>, from: Id3v2Version, to: Id3v2Version) -> Result<()> {
	let mut converted = frames.clone();

	let mut current = from;
	while current != to {
		let next = if to > current {
			current.next()
		} else {
			current.previous()
		};

		let Some(next) = next else {
			err!(UnsupportedTargetVersion);
		};

		step(&mut converted, current, next)?;
		current = next;
	}

	*frames = converted;
	Ok(())
}

fn step(frames: &mut Vec<Frame>, from: Id3v2Version, to: Id3v2Version) -> Result<()> {
	let (rules, direction) = match (from, to) {
		(Id3v2Version::V2, Id3v2Version::V3) => (V2_V3, Direction::Forward),
		(Id3v2Version::V3, Id3v2Version::V2) => (V2_V3, Direction::Backward),
		(Id3v2Version::V3, Id3v2Version::V4) => (V3_V4, Direction::Forward),
		(Id3v2Version::V4, Id3v2Version::V3) => (V3_V4, Direction::Backward),
		_ => err!(UnsupportedTargetVersion),
	};

	log::debug!(
		"Converting {} frames from {from:?} to {to:?}",
		frames.len()
	);

	// Converters may append frames, which are visited as well
	let mut index = 0;
	while index < frames.len() {
		let id = frames[index].id;
		let Some(rule) = find_rule(rules, direction, id.as_str()) else {
			index += 1;
			continue;
		};

		let outcome = match rule.converter {
			Some(converter) => run_converter(converter, frames, index, rules, direction)?,
			None => Outcome::Rewrite,
		};

		match (outcome, rule.target(direction)) {
			(Outcome::Rewrite, Some(target)) => {
				log::trace!("Renaming frame {id} to {target}");
				frames[index].id = FrameId::from_raw(target.as_bytes());
				index += 1;
			},
			(Outcome::Rewrite, None) => {
				log::warn!("Dropping frame {id}, it has no {to:?} equivalent");
				frames.remove(index);
			},
			(Outcome::Remove, _) => {
				frames.remove(index);
			},
		}
	}

	finish_step(frames, to)
}

fn run_converter(
	converter: Converter,
	frames: &mut Vec<Frame>,
	index: usize,
	rules: &'static [ConversionRule],
	direction: Direction,
) -> Result<Outcome> {
	let frame = &mut frames[index];
	if frame.flags.is_opaque() {
		log::warn!(
			"Dropping frame {}, its content can't be converted while compressed or encrypted",
			frame.id
		);
		return Ok(Outcome::Remove);
	}

	if !frame.is_loaded() {
		log::warn!("Dropping frame {}, its content was never loaded", frame.id);
		return Ok(Outcome::Remove);
	}

	match converter {
		Converter::Link => link::convert(frame, rules, direction),
		Converter::Picture => picture::convert(frame, direction),
		Converter::Timestamp => timestamp::convert(frames, index, direction),
		Converter::Genre => genre::convert(frame, direction),
		Converter::VolumeAdjustment => Ok(volume::convert(frame)),
	}
}

// Clean up what the rules can't express on their own
fn finish_step(frames: &mut Vec<Frame>, to: Id3v2Version) -> Result<()> {
	frames.retain(|frame| {
		if frame.id.len() == to.frame_id_len() {
			return true;
		}

		log::warn!(
			"Dropping frame {}, its ID can't be represented in {to:?}",
			frame.id
		);
		false
	});

	if to == Id3v2Version::V2 {
		// ID3v2.2 has no frame flags at all
		frames.retain(|frame| {
			if frame.flags.is_opaque() {
				log::warn!(
					"Dropping frame {}, ID3v2.2 can't store compressed or encrypted frames",
					frame.id
				);
				return false;
			}

			true
		});

		for frame in frames.iter_mut() {
			frame.flags = FrameFlags::default();
		}
	}

	if to == Id3v2Version::V4 {
		return Ok(());
	}

	for frame in frames.iter_mut() {
		if !frame.id.is_text() || frame.flags.is_opaque() {
			continue;
		}

		let Some(content) = frame.content() else {
			continue;
		};

		match transcode_for_version(content, to) {
			Ok(Some(transcoded)) => frame.set_content(transcoded)?,
			Ok(None) => {},
			Err(e) => log::warn!("Leaving frame {} as is, failed to transcode: {e}", frame.id),
		}
	}

	Ok(())
}

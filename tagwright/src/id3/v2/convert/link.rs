//! Linked information frames (`LNK`/`LINK`) start with the ID of the frame they link to

use super::Outcome;
use super::rules::{ConversionRule, Direction, find_rule};
use crate::error::Result;
use crate::id3::v2::Frame;

pub(super) fn convert(
	frame: &mut Frame,
	rules: &'static [ConversionRule],
	direction: Direction,
) -> Result<Outcome> {
	let id_len = frame.id.len();

	// Between ID3v2.3 and ID3v2.4, IDs without a rule are carried over as is
	let keeps_unknown = find_rule(rules, direction, frame.id.as_str())
		.and_then(|rule| rule.target(direction))
		.is_some_and(|target| target.len() == id_len);

	let content = frame.content().unwrap_or_default();
	let Some(linked) = content
		.get(..id_len)
		.and_then(|linked| std::str::from_utf8(linked).ok())
	else {
		log::warn!("Dropping frame {}, it doesn't start with a frame ID", frame.id);
		return Ok(Outcome::Remove);
	};

	let target = match find_rule(rules, direction, linked) {
		Some(rule) => rule.target(direction),
		None if keeps_unknown => Some(linked),
		None => None,
	};

	let Some(target) = target else {
		log::warn!(
			"Dropping frame {}, the linked frame {linked} has no equivalent",
			frame.id
		);
		return Ok(Outcome::Remove);
	};

	let mut converted = target.as_bytes().to_vec();
	converted.extend(&content[id_len..]);

	frame.set_content(converted)?;
	Ok(Outcome::Rewrite)
}

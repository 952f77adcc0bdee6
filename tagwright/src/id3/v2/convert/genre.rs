//! `TCON` changed its layout in ID3v2.4
//!
//! ID3v2.3 stores references to the legacy genre list in parentheses, followed by optional
//! refinements (`"(13)(Lo-Fi)"`, `"(4)Eurodisco"`), with `((` escaping a literal parenthesis.
//! ID3v2.4 stores every genre as its own string, numbers being references.

use super::Outcome;
use super::rules::Direction;
use crate::id3::v2::Frame;
use crate::id3::v2::items::text::{text_fields_bytes, verify_encoding};
use crate::error::Result;
use crate::util::text::decode_fields;

pub(super) fn convert(frame: &mut Frame, direction: Direction) -> Result<Outcome> {
	let content = frame.content().unwrap_or_default();
	if content.is_empty() {
		return Ok(Outcome::Rewrite);
	}

	let Ok(encoding) = verify_encoding(content) else {
		log::warn!("Dropping TCON frame with an invalid encoding");
		return Ok(Outcome::Remove);
	};

	let fields = decode_fields(&content[1..], encoding);
	let converted = match direction {
		Direction::Forward => fields.iter().flat_map(|field| split_references(field)).collect(),
		Direction::Backward => vec![join_references(&fields)],
	};

	log::trace!("Converted genres {fields:?} to {converted:?}");

	frame.set_content(text_fields_bytes(&converted, encoding)?)?;
	Ok(Outcome::Rewrite)
}

/// `"(13)(Lo-Fi)"` -> `["13", "Lo-Fi"]`
pub(crate) fn split_references(text: &str) -> Vec<String> {
	let chars = text.chars().collect::<Vec<_>>();

	let mut genres = Vec::new();
	let mut current = String::new();

	let mut i = 0;
	while i < chars.len() {
		if chars[i] != '(' {
			current.push(chars[i]);
			i += 1;
			continue;
		}

		let closing = chars[i + 1..]
			.iter()
			.position(|c| *c == ')')
			.map(|pos| pos + i + 1);

		// Escaped, keep a single parenthesis and everything up to the closing one
		if chars.get(i + 1) == Some(&'(') {
			let end = closing.map_or(chars.len(), |closing| closing + 1);
			current.extend(&chars[i + 1..end]);
			i = end;
			continue;
		}

		// Nothing sensible can follow an unterminated reference
		let Some(closing) = closing else {
			log::warn!("Unterminated genre reference in \"{text}\"");
			break;
		};

		if !current.is_empty() {
			genres.push(std::mem::take(&mut current));
		}

		let reference = chars[i + 1..closing].iter().collect::<String>();
		if !reference.is_empty() {
			genres.push(reference);
		}

		i = closing + 1;
	}

	if !current.is_empty() {
		genres.push(current);
	}

	genres
}

fn is_reference(genre: &str) -> Option<String> {
	if genre == "RX" || genre == "CR" {
		return Some(genre.to_string());
	}

	if genre.is_empty() || !genre.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}

	// Leading zeros are dropped, anything above 255 can't be a reference
	genre.parse::<u8>().ok().map(|index| index.to_string())
}

/// `["13", "Lo-Fi"]` -> `"(13)(Lo-Fi)"`
pub(crate) fn join_references<S>(genres: &[S]) -> String
where
	S: AsRef<str>,
{
	let mut joined = String::new();
	let mut after_reference = false;
	let mut after_text = false;

	for genre in genres.iter().map(AsRef::as_ref).filter(|genre| !genre.is_empty()) {
		if let Some(reference) = is_reference(genre) {
			joined.push('(');
			joined.push_str(&reference);
			joined.push(')');
			after_reference = true;
			after_text = false;
			continue;
		}

		// A refinement of the previous reference
		if after_reference && !genre.contains(['(', ')']) {
			joined.push('(');
			joined.push_str(genre);
			joined.push(')');
			continue;
		}

		if after_text {
			joined.push('/');
		}

		joined.push_str(&genre.replace('(', "(("));
		after_reference = false;
		after_text = true;
	}

	joined
}

#[cfg(test)]
mod tests {
	use super::{join_references, split_references};

	#[test_log::test]
	fn split() {
		assert_eq!(split_references("(13)(Lo-Fi)"), ["13", "Lo-Fi"]);
		assert_eq!(split_references("(4)Eurodisco"), ["4", "Eurodisco"]);
		assert_eq!(split_references("Rock"), ["Rock"]);
		assert_eq!(split_references("(129)((I think)"), ["129", "(I think)"]);
		assert_eq!(split_references("((unterminated"), ["(unterminated"]);

		// Parsing stops at an unterminated reference
		assert_eq!(split_references("(17)(Roc"), ["17"]);
		assert!(split_references("()").is_empty());
	}

	#[test_log::test]
	fn join() {
		assert_eq!(join_references(&["13", "Lo-Fi"]), "(13)(Lo-Fi)");
		assert_eq!(join_references(&["129", "9"]), "(129)(9)");
		assert_eq!(join_references(&["RX", "CR"]), "(RX)(CR)");
		assert_eq!(join_references(&["007"]), "(7)");
		assert_eq!(join_references(&["000"]), "(0)");
		assert_eq!(join_references(&["256"]), "256");

		assert_eq!(join_references(&["Rock", "Pop"]), "Rock/Pop");
		assert_eq!(join_references(&["129", "(I think)"]), "(129)((I think)");
		assert_eq!(join_references(&["Rock (live)"]), "Rock ((live)");
	}

	#[test_log::test]
	fn escaped_text_survives() {
		for genres in [&["129", "(I think)"][..], &["Rock (live)"][..], &["13", "Lo-Fi"][..]] {
			assert_eq!(split_references(&join_references(genres)), genres);
		}
	}
}

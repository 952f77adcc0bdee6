#![allow(missing_docs)]

use tagwright::config::{ParseOptions, ParsingMode};
use tagwright::id3::v2::{ChannelType, Id3Tag};

use std::io::Cursor;
use std::thread;
use std::time::Instant;

mod mutations;

/// Read every frame of `data` through every accessor, ignoring errors
pub fn exercise(data: Vec<u8>, parsing_mode: ParsingMode) {
	let mut tag = Id3Tag::read_from(
		Cursor::new(data),
		ParseOptions::new().parsing_mode(parsing_mode),
	);

	let Ok(count) = tag.frame_count() else {
		tag.discard_unsupported_tag();
		return;
	};

	for index in 0..count {
		let _ = tag.frame_raw(index);
		let _ = tag.frame_content(index);
		let _ = tag.frame_text_fields(index);
		let _ = tag.picture(index);
	}

	let _ = tag.title();
	let _ = tag.genre();
	let _ = tag.track();
	let _ = tag.comment(None, None);
	let _ = tag.rva("track", ChannelType::Any);
}

/// Run `exercise` on another thread, failing if it takes too long
#[allow(clippy::missing_panics_doc)]
pub fn timeout_test(data: Vec<u8>) {
	let instant = Instant::now();
	let thread = thread::spawn(move || {
		for mode in [
			ParsingMode::Strict,
			ParsingMode::BestAttempt,
			ParsingMode::Relaxed,
		] {
			exercise(data.clone(), mode);
		}
	});

	while instant.elapsed().as_secs() < 3 {
		if thread.is_finished() {
			thread.join().unwrap();
			return;
		}
	}

	panic!("Failed to run test");
}

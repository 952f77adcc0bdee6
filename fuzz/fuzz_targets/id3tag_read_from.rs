#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use tagwright::config::ParseOptions;
use tagwright::id3::v2::{Id3Tag, Id3v2Version};

fuzz_target!(|data: Vec<u8>| {
	let mut tag = Id3Tag::read_from(Cursor::new(data), ParseOptions::new());
	let Ok(count) = tag.frame_count() else {
		return;
	};

	for index in 0..count {
		let _ = tag.frame_content(index);
	}

	let _ = tag.title();
	let _ = tag.comment(None, None);
	let _ = tag.set_version(Id3v2Version::V2);
});

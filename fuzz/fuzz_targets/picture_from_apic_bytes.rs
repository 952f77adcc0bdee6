#![no_main]

use libfuzzer_sys::fuzz_target;
use tagwright::id3::v2::{AttachedPicture, Id3v2Version};

fuzz_target!(|data: &[u8]| {
	let _ = AttachedPicture::parse(data, Id3v2Version::V4);
});

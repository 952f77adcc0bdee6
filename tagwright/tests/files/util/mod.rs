use tagwright::config::OpenMode;
use tagwright::id3::v2::Id3Tag;

use std::fs::File;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Fake audio, starting with an MPEG frame sync
///
/// The content never contains anything resembling a tag.
pub fn audio() -> Vec<u8> {
	let mut audio = vec![0xFF, 0xFB, 0x90, 0x64];
	audio.extend((0..4092_u32).map(|i| (i % 200) as u8 + 1));
	audio
}

/// Build a tag of `major` with the given frames, and `padding` zeroes
pub fn tag(major: u8, frames: &[(&str, &[u8])], padding: usize) -> Vec<u8> {
	let mut body = Vec::new();
	for (id, content) in frames {
		body.extend(id.as_bytes());

		let len = content.len() as u32;
		match major {
			2 => body.extend(&len.to_be_bytes()[1..]),
			3 => body.extend(len.to_be_bytes()),
			_ => body.extend(synchsafe(len)),
		}

		if major > 2 {
			body.extend([0, 0]);
		}

		body.extend(*content);
	}

	body.resize(body.len() + padding, 0);

	let mut tag = b"ID3".to_vec();
	tag.extend([major, 0, 0]);
	tag.extend(synchsafe(body.len() as u32));
	tag.extend(body);
	tag
}

pub fn synchsafe(n: u32) -> [u8; 4] {
	[
		((n >> 21) & 0x7F) as u8,
		((n >> 14) & 0x7F) as u8,
		((n >> 7) & 0x7F) as u8,
		(n & 0x7F) as u8,
	]
}

/// Write `content` to a new file in a temporary directory
///
/// The directory is removed once the [`TempDir`] is dropped.
pub fn temp_file(content: &[u8]) -> (TempDir, PathBuf) {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("test.mp3");
	std::fs::write(&path, content).unwrap();

	(dir, path)
}

pub fn open(path: impl AsRef<Path>) -> Id3Tag<File> {
	Id3Tag::open(path, OpenMode::ReadWrite).unwrap()
}

pub fn read(path: impl AsRef<Path>) -> Vec<u8> {
	std::fs::read(path).unwrap()
}

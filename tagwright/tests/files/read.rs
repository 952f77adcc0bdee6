use crate::util::{audio, open, synchsafe, tag, temp_file};

use tagwright::TextEncoding;
use tagwright::config::{OpenMode, ParseOptions, ParsingMode, WriteOptions};
use tagwright::error::ErrorKind;
use tagwright::id3::v2::{Id3Tag, Id3v2Version};

use std::io::Cursor;

fn extended_header_tag() -> Vec<u8> {
	let mut body = Vec::new();

	// Extended header with a CRC
	body.extend([0, 0, 0, 12, 0x01, 0x20, 0x05, 1, 2, 3, 4, 5]);

	body.extend(b"TIT2");
	body.extend(synchsafe(9));
	body.extend([0, 0]);
	body.extend(b"\x03Extended");

	let mut tag = b"ID3\x04\x00\x40".to_vec();
	tag.extend(synchsafe(body.len() as u32));
	tag.extend(body);
	tag.extend(audio());
	tag
}

#[test_log::test]
fn extended_header() {
	let (_dir, path) = temp_file(&extended_header_tag());

	let mut tag = open(&path);
	let flags = tag.flags().unwrap();
	assert!(flags.extended_header);
	assert!(flags.crc);
	assert!(!flags.update);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Extended"));

	// Extended headers are never written
	tag.write(WriteOptions::default()).unwrap();

	let mut tag = open(&path);
	let flags = tag.flags().unwrap();
	assert!(!flags.extended_header);
	assert!(!flags.crc);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Extended"));
}

#[test_log::test]
fn multiple_values() {
	let mut content = tag(4, &[("TPE1", b"\x03Foo\x00Bar\x00Baz")], 0);
	content.extend(audio());
	let (_dir, path) = temp_file(&content);

	let mut tag = Id3Tag::open(&path, OpenMode::ReadOnly).unwrap();
	assert_eq!(tag.frame_text_fields(0).unwrap(), ["Foo", "Bar", "Baz"]);
	assert_eq!(tag.frame_encoding(0).unwrap(), TextEncoding::UTF8);
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Foo"));
}

#[test_log::test]
fn frame_past_tag_end() {
	// The second frame claims more than the tag holds
	let mut body = b"TIT2\x00\x00\x00\x06\x00\x00\x00Title".to_vec();
	body.extend(b"TPE1\x00\x00\x10\x00\x00\x00\x00Artist");

	let mut content = b"ID3\x03\x00\x00".to_vec();
	content.extend(synchsafe(body.len() as u32));
	content.extend(body);
	content.extend(audio());

	for mode in [ParsingMode::Relaxed, ParsingMode::BestAttempt] {
		let mut tag = Id3Tag::read_from(
			Cursor::new(content.clone()),
			ParseOptions::new().parsing_mode(mode),
		);

		assert_eq!(tag.frame_count().unwrap(), 1);
		assert_eq!(tag.title().unwrap().as_deref(), Some("Title"));
	}
}

#[test_log::test]
fn tag_past_file_end() {
	let mut content = b"ID3\x03\x00\x00".to_vec();
	content.extend(synchsafe(5000));
	content.extend(b"TIT2\x00\x00\x00\x06\x00\x00\x00Title");

	let mut tag = Id3Tag::read_from(Cursor::new(content), ParseOptions::new());

	// Whatever is read, the tag never claims more than the stream holds
	if let Ok(frames) = tag.frames() {
		assert!(frames.len() <= 1);
	}
}

#[test_log::test]
fn allocation_limit() {
	let big = vec![0x42_u8; 64 * 1024];
	let mut content = tag(3, &[("PRIV", &big)], 0);
	content.extend(audio());

	let mut tag = Id3Tag::read_from(
		Cursor::new(content),
		ParseOptions::new().allocation_limit(1024),
	);

	// The frame headers are fine, the payload is not
	assert_eq!(tag.frame_count().unwrap(), 1);

	let err = tag.frame_raw(0).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::TooMuchData));
}

#[test_log::test]
fn v22_tag() {
	let mut content = tag(
		2,
		&[
			("TT2", b"\x00Title"),
			("TP1", b"\x01\xFF\xFEA\x00r\x00t\x00"),
			("COM", b"\x00engdesc\x00A comment"),
		],
		10,
	);
	content.extend(audio());

	let mut tag = Id3Tag::read_from(Cursor::new(content), ParseOptions::new());
	assert_eq!(tag.version().unwrap(), (Id3v2Version::V2, 0));
	assert_eq!(tag.frame_count().unwrap(), 3);

	assert_eq!(tag.title().unwrap().as_deref(), Some("Title"));
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Art"));
	assert_eq!(
		tag.comment(Some("desc"), Some(b"eng")).unwrap().as_deref(),
		Some("A comment")
	);
}

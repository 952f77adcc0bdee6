use crate::util::{audio, open, read, tag, temp_file};

use tagwright::TextEncoding;
use tagwright::config::{OpenMode, WriteOptions};
use tagwright::error::ErrorKind;
use tagwright::id3::v1::{LegacyTrailer, TRAILER_SIZE};
use tagwright::id3::v2::{Id3Tag, Id3v2Version, PaddingPolicy};

fn tagged_file(padding: usize) -> Vec<u8> {
	let mut content = tag(
		3,
		&[
			("TIT2", b"\x00Foo title"),
			("TPE1", b"\x00Foo artist"),
			("ZZZZ", b"\x01\x02\x03\x04"),
		],
		padding,
	);
	content.extend(audio());
	content
}

#[test_log::test]
fn new_tag() {
	let (_dir, path) = temp_file(&audio());

	let mut tag = open(&path);
	assert_eq!(tag.frame_count().unwrap(), 0);

	tag.set_title("Foo title", TextEncoding::Latin1).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	let bytes = read(&path);
	assert_eq!(&bytes[..4], b"ID3\x03");
	assert_eq!(bytes.len(), 256 + audio().len() + TRAILER_SIZE);
	assert_eq!(&bytes[256..256 + audio().len()], &audio()[..]);
	assert_eq!(&bytes[bytes.len() - TRAILER_SIZE..][..3], b"TAG");

	let mut tag = open(&path);
	assert_eq!(tag.size().unwrap(), 246);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Foo title"));
	assert_eq!(
		tag.legacy_trailer().unwrap().title.as_deref(),
		Some("Foo title")
	);
}

#[test_log::test]
fn in_place() {
	let content = tagged_file(512);
	let (_dir, path) = temp_file(&content);

	let mut tag = open(&path);
	tag.legacy_trailer_mut().unwrap().set_requested(false);
	tag.set_title("Bar", TextEncoding::Latin1).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	// The tag kept its size, so the audio didn't move
	let bytes = read(&path);
	assert_eq!(bytes.len(), content.len());
	assert_eq!(&bytes[content.len() - audio().len()..], &audio()[..]);

	let mut tag = open(&path);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Bar"));
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Foo artist"));
	assert_eq!(tag.frame_raw(2).unwrap(), b"\x01\x02\x03\x04");
}

#[test_log::test]
fn in_place_matches_rewrite() {
	let content = tagged_file(512);

	let mut written = Vec::new();
	for allow_in_place in [true, false] {
		let (_dir, path) = temp_file(&content);

		let mut tag = open(&path);
		tag.set_artist("Bar artist", TextEncoding::UTF16).unwrap();
		tag.write(WriteOptions::new().allow_in_place(allow_in_place))
			.unwrap();

		written.push(read(&path));
	}

	assert_eq!(written[0], written[1]);
}

#[test_log::test]
fn growing_tag() {
	let content = tagged_file(0);
	let (_dir, path) = temp_file(&content);

	let long_comment = "Comment ".repeat(500);

	let mut tag = open(&path);
	tag.set_comment(&long_comment, None, None, TextEncoding::Latin1)
		.unwrap();
	tag.write(WriteOptions::default()).unwrap();

	// The frames are still usable, reloaded from the new file
	assert_eq!(tag.title().unwrap().as_deref(), Some("Foo title"));

	let bytes = read(&path);
	let tag_len = tag.size().unwrap() as usize + 10;
	assert_eq!(bytes.len(), tag_len + audio().len() + TRAILER_SIZE);
	assert_eq!(&bytes[tag_len..tag_len + audio().len()], &audio()[..]);

	let mut tag = open(&path);
	assert_eq!(
		tag.comment(None, None).unwrap().as_deref(),
		Some(long_comment.as_str())
	);
	assert_eq!(tag.frame_by_id("ZZZZ").unwrap().unwrap().size(), 4);
}

#[test_log::test]
fn writes_are_idempotent() {
	let (_dir, path) = temp_file(&tagged_file(0));

	let mut tag = open(&path);
	tag.set_album("Baz album", TextEncoding::Latin1).unwrap();
	tag.write(WriteOptions::default()).unwrap();
	let first = read(&path);

	tag.write(WriteOptions::default()).unwrap();
	assert_eq!(read(&path), first);

	let mut tag = open(&path);
	tag.write(WriteOptions::default()).unwrap();
	assert_eq!(read(&path), first);
}

#[test_log::test]
fn padding_policies() {
	let (_dir, path) = temp_file(&tagged_file(0));

	let mut tag = open(&path);
	tag.set_padding(PaddingPolicy::None);
	tag.write(WriteOptions::default()).unwrap();

	// 3 frames, 55 bytes
	assert_eq!(tag.size().unwrap(), 55);

	tag.set_size(1000);
	tag.write(WriteOptions::default()).unwrap();
	assert_eq!(tag.size().unwrap(), 990);

	let mut tag = open(&path);
	assert_eq!(tag.size().unwrap(), 990);
	assert_eq!(tag.frame_count().unwrap(), 3);
}

#[test_log::test]
fn strip() {
	let mut content = tagged_file(100);
	content.extend(LegacyTrailer::new().encode());
	let (_dir, path) = temp_file(&content);

	let mut tag = open(&path);
	assert!(tag.legacy_trailer().unwrap().exists());

	tag.strip().unwrap();
	tag.write(WriteOptions::default()).unwrap();

	assert_eq!(read(&path), audio());
	assert_eq!(tag.size().unwrap(), 0);

	let mut tag = open(&path);
	assert_eq!(tag.frame_count().unwrap(), 0);
	assert!(!tag.legacy_trailer().unwrap().exists());
}

#[test_log::test]
fn trailer_removal() {
	let mut content = tagged_file(100);
	content.extend(LegacyTrailer::new().encode());
	let (_dir, path) = temp_file(&content);

	let mut tag = open(&path);
	tag.legacy_trailer_mut().unwrap().set_requested(false);
	tag.write(WriteOptions::default()).unwrap();

	let bytes = read(&path);
	assert_eq!(bytes.len(), content.len() - TRAILER_SIZE);
	assert!(bytes.ends_with(&audio()));
}

#[test_log::test]
fn append() {
	let (_dir, path) = temp_file(&audio());

	let mut tag = open(&path);
	tag.set_append(true).unwrap();
	tag.set_title("Appended", TextEncoding::UTF8).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	let bytes = read(&path);
	assert!(bytes.starts_with(&audio()));
	assert_eq!(&bytes[audio().len()..][..4], b"ID3\x04");

	let footer = &bytes[bytes.len() - TRAILER_SIZE - 10..][..10];
	assert_eq!(&footer[..4], b"3DI\x04");

	let mut tag = open(&path);
	assert!(tag.is_appended().unwrap());
	assert!(tag.has_footer().unwrap());
	assert_eq!(tag.version().unwrap().0, Id3v2Version::V4);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Appended"));

	// Appended tags never carry padding, they are always written in place
	tag.set_artist("Artist", TextEncoding::UTF8).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	let bytes = read(&path);
	assert!(bytes.starts_with(&audio()));
	assert_eq!(&bytes[bytes.len() - TRAILER_SIZE..][..3], b"TAG");

	let mut tag = open(&path);
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Artist"));
}

#[test_log::test]
fn appended_to_prepended() {
	let (_dir, path) = temp_file(&audio());

	let mut tag = open(&path);
	tag.set_append(true).unwrap();
	tag.set_title("Moving", TextEncoding::Latin1).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	tag.set_append(false).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	let bytes = read(&path);
	assert_eq!(&bytes[..4], b"ID3\x04");

	let tag_len = tag.size().unwrap() as usize + 10;
	assert_eq!(bytes.len(), tag_len + audio().len() + TRAILER_SIZE);
	assert_eq!(&bytes[tag_len..tag_len + audio().len()], &audio()[..]);

	let mut tag = open(&path);
	assert!(!tag.is_appended().unwrap());
	assert!(!tag.has_footer().unwrap());
	assert_eq!(tag.title().unwrap().as_deref(), Some("Moving"));
}

#[test_log::test]
fn read_only() {
	let (_dir, path) = temp_file(&tagged_file(0));

	let mut tag = Id3Tag::open(&path, OpenMode::ReadOnly).unwrap();
	tag.set_title("Changed", TextEncoding::Latin1).unwrap();

	let err = tag.write(WriteOptions::default()).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::ReadOnly));
	assert_eq!(read(&path), tagged_file(0));
}

#[test_log::test]
fn unsynchronisation() {
	let private = b"owner\x00\xFF\xE0\xFF\x00\xFF";

	for version in [Id3v2Version::V3, Id3v2Version::V4] {
		let (_dir, path) = temp_file(&audio());

		let mut tag = open(&path);
		tag.set_version(version).unwrap();
		tag.set_unsync(true).unwrap();

		let index = tag.add_frame("PRIV").unwrap();
		tag.set_frame_raw(index, private.to_vec()).unwrap();
		tag.write(WriteOptions::default()).unwrap();

		// Payloads are decoded when reloaded from the new locations
		assert_eq!(tag.frame_raw(index).unwrap(), private);

		let bytes = read(&path);
		let body = &bytes[10..10 + tag.size().unwrap() as usize];
		assert!(!body.windows(2).any(|pair| pair[0] == 0xFF && pair[1] >= 0xE0));

		let mut tag = open(&path);
		assert_eq!(tag.frame_raw(0).unwrap(), private);
	}
}

#[test_log::test]
fn v22_is_written_as_v23() {
	let mut content = tag(
		2,
		&[
			("TT2", b"\x00Old title"),
			("PIC", b"\x00PNG\x03\x00\x89PNG"),
		],
		0,
	);
	content.extend(audio());
	let (_dir, path) = temp_file(&content);

	let mut tag = open(&path);
	assert_eq!(tag.version().unwrap().0, Id3v2Version::V2);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Old title"));

	tag.write(WriteOptions::default()).unwrap();
	assert_eq!(tag.version().unwrap().0, Id3v2Version::V3);

	let mut tag = open(&path);
	assert_eq!(tag.version().unwrap().0, Id3v2Version::V3);
	assert_eq!(tag.frame_by_id("TIT2").unwrap().unwrap().size(), 10);
	assert_eq!(
		tag.frame_raw(1).unwrap(),
		b"\x00image/png\x00\x03\x00\x89PNG"
	);
}

#[test_log::test]
fn volume_adjustment_round_trip() {
	let (_dir, path) = temp_file(&audio());

	let mut tag = open(&path);
	tag.set_version(Id3v2Version::V4).unwrap();
	tag.set_rva("track", tagwright::id3::v2::ChannelType::MasterVolume, -6.0)
		.unwrap();
	tag.write(WriteOptions::default()).unwrap();

	let mut tag = open(&path);
	assert_eq!(tag.frames().unwrap()[0].id(), "RVA2");

	let decibels = tag
		.rva("track", tagwright::id3::v2::ChannelType::MasterVolume)
		.unwrap()
		.unwrap();
	assert!((decibels + 6.0).abs() <= 1.0 / 512.0);

	// Converted to the ID3v2.3 equivalent
	tag.set_version(Id3v2Version::V3).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	let mut tag = open(&path);
	assert_eq!(tag.frames().unwrap()[0].id(), "XRVA");
	assert_eq!(
		tag.rva("track", tagwright::id3::v2::ChannelType::MasterVolume)
			.unwrap(),
		Some(decibels)
	);
}

#[test_log::test]
#[cfg(feature = "id3v2_compression_support")]
fn compressed_frames_survive() {
	use std::io::Write;

	let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
	encoder.write_all(b"\x00Compressed title").unwrap();
	let compressed = encoder.finish().unwrap();

	let mut stored = 17_u32.to_be_bytes().to_vec();
	stored.extend(&compressed);

	let mut frame = b"TIT2".to_vec();
	frame.extend((stored.len() as u32).to_be_bytes());
	frame.extend([0x00, 0x80]);
	frame.extend(&stored);

	let mut content = b"ID3\x03\x00\x00".to_vec();
	content.extend(crate::util::synchsafe(frame.len() as u32));
	content.extend(&frame);
	content.extend(audio());
	let (_dir, path) = temp_file(&content);

	let mut tag = open(&path);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Compressed title"));
	assert_eq!(tag.frame_raw(0).unwrap(), &compressed[..]);

	tag.set_artist("Artist", TextEncoding::Latin1).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	let mut tag = open(&path);
	assert!(tag.frames().unwrap()[0].flags().compression);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Compressed title"));
}

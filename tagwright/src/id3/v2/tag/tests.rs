use super::{Discovery, Id3Tag};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{ErrorKind, Id3v2ErrorKind};
use crate::id3::v1::LegacyTrailer;
use crate::id3::v2::{ChannelType, FrameFlag, Id3v2Version, PaddingPolicy};
use crate::util::text::TextEncoding;

use std::io::{Cursor, Read, Seek, SeekFrom};

fn synchsafe(size: usize) -> [u8; 4] {
	[
		((size >> 21) & 0x7F) as u8,
		((size >> 14) & 0x7F) as u8,
		((size >> 7) & 0x7F) as u8,
		(size & 0x7F) as u8,
	]
}

fn v3_frame(id: &[u8; 4], content: &[u8]) -> Vec<u8> {
	let mut frame = id.to_vec();
	frame.extend((content.len() as u32).to_be_bytes());
	frame.extend([0, 0]);
	frame.extend(content);
	frame
}

fn v4_frame(id: &[u8; 4], content: &[u8]) -> Vec<u8> {
	let mut frame = id.to_vec();
	frame.extend(synchsafe(content.len()));
	frame.extend([0, 0]);
	frame.extend(content);
	frame
}

fn tag(major: u8, flags: u8, body: &[u8]) -> Vec<u8> {
	let mut tag = b"ID3".to_vec();
	tag.extend([major, 0, flags]);
	tag.extend(synchsafe(body.len()));
	tag.extend(body);
	tag
}

fn title_tag() -> Vec<u8> {
	let mut body = v3_frame(b"TIT2", b"\x00Foo title");
	body.extend(v3_frame(b"TPE1", b"\x00Bar artist"));
	body.extend([0; 20]);

	tag(3, 0, &body)
}

fn read(bytes: Vec<u8>) -> Id3Tag<Cursor<Vec<u8>>> {
	Id3Tag::read_from(Cursor::new(bytes), ParseOptions::new())
}

fn empty() -> Id3Tag<Cursor<Vec<u8>>> {
	read(Vec::new())
}

// A stream that refuses to seek
struct Unseekable(Cursor<Vec<u8>>);

impl Read for Unseekable {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		self.0.read(buf)
	}
}

impl Seek for Unseekable {
	fn seek(&mut self, _: SeekFrom) -> std::io::Result<u64> {
		Err(std::io::Error::from(std::io::ErrorKind::Unsupported))
	}
}

#[test_log::test]
fn discovery_is_lazy() {
	let mut tag = read(title_tag());
	assert_eq!(tag.discovery, Discovery::Unread);

	assert_eq!(tag.frame_count().unwrap(), 2);
	assert_eq!(tag.discovery, Discovery::Present);
}

#[test_log::test]
fn prepended_tag() {
	let mut tag = read(title_tag());

	assert_eq!(tag.version().unwrap(), (Id3v2Version::V3, 0));
	assert_eq!(tag.size().unwrap(), 20 + 21 + 20);
	assert!(!tag.is_appended().unwrap());
	assert!(!tag.has_footer().unwrap());

	assert_eq!(tag.title().unwrap().as_deref(), Some("Foo title"));
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Bar artist"));
	assert_eq!(tag.album().unwrap(), None);
}

#[test_log::test]
fn payloads_load_on_demand() {
	let mut tag = read(title_tag());

	let frames = tag.frames().unwrap();
	assert!(frames.iter().all(|frame| !frame.is_loaded()));
	assert_eq!(frames[0].size(), 10);

	tag.title().unwrap();
	assert!(tag.frames[0].is_loaded());
	assert!(!tag.frames[1].is_loaded());
}

#[test_log::test]
fn unseekable_streams_read_eagerly() {
	let mut tag = Id3Tag::read_from(Unseekable(Cursor::new(title_tag())), ParseOptions::new());
	assert!(!tag.is_seekable());

	assert!(tag.frames().unwrap().iter().all(|frame| frame.is_loaded()));
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Bar artist"));
}

#[test_log::test]
fn no_tag() {
	let mut tag = read(vec![0xFF; 512]);

	assert_eq!(tag.size().unwrap(), 0);
	assert_eq!(tag.frame_count().unwrap(), 0);
	assert_eq!(tag.discovery, Discovery::Absent);

	// New tags start out as ID3v2.3
	assert_eq!(tag.version().unwrap(), (Id3v2Version::V3, 0));
}

#[test_log::test]
fn appended_tag() {
	let body = v4_frame(b"TIT2", b"\x03Appended");

	let mut bytes = vec![0xFF; 100];
	bytes.extend(tag(4, 0x10, &body));
	bytes.extend(b"3DI\x04\x00\x10");
	bytes.extend(synchsafe(body.len()));

	let mut trailer = LegacyTrailer::new();
	trailer.title = Some(String::from("Legacy"));
	bytes.extend(trailer.encode());

	let mut tag = read(bytes);
	assert!(tag.is_appended().unwrap());
	assert!(tag.has_footer().unwrap());
	assert_eq!(tag.version().unwrap(), (Id3v2Version::V4, 0));
	assert_eq!(tag.title().unwrap().as_deref(), Some("Appended"));

	assert_eq!(tag.existing.offset, 100);
	assert_eq!(tag.existing.size, 10 + body.len() as u64 + 10);
	assert!(tag.legacy_trailer().unwrap().exists());
}

#[test_log::test]
fn footer_larger_than_file() {
	let mut bytes = vec![0xFF; 20];
	bytes.extend(b"3DI\x04\x00\x10");
	bytes.extend(synchsafe(1000));

	let mut tag = read(bytes);
	assert_eq!(tag.frame_count().unwrap(), 0);
	assert!(!tag.is_appended().unwrap());
}

#[test_log::test]
fn trailer_fallback() {
	let mut trailer = LegacyTrailer::new();
	trailer.title = Some(String::from("Legacy title"));
	trailer.year = Some(String::from("1999"));
	trailer.comment = Some(String::from("Legacy comment"));
	trailer.track_number = Some(7);
	trailer.genre = Some(17);

	let mut bytes = vec![0xFF; 64];
	bytes.extend(trailer.encode());

	let mut tag = read(bytes);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Legacy title"));
	assert_eq!(tag.date().unwrap().as_deref(), Some("1999"));
	assert_eq!(tag.comment(None, None).unwrap().as_deref(), Some("Legacy comment"));
	assert_eq!(tag.track().unwrap().as_deref(), Some("7"));
	assert_eq!(tag.genre().unwrap().as_deref(), Some("17"));
	assert_eq!(tag.artist().unwrap(), None);

	// Frames take priority
	tag.set_title("Frame title", TextEncoding::UTF16).unwrap();
	assert_eq!(tag.title().unwrap().as_deref(), Some("Frame title"));
}

#[test_log::test]
fn unsupported_version() {
	let bytes = tag(5, 0, &[0; 16]);

	let mut tag = read(bytes.clone());
	for _ in 0..2 {
		let err = tag.size().unwrap_err();
		assert!(matches!(
			err.kind(),
			ErrorKind::UnsupportedVersion {
				major: 5,
				revision: 0
			}
		));
	}

	assert!(tag.discard_unsupported_tag());
	assert!(!tag.discard_unsupported_tag());
	assert_eq!(tag.size().unwrap(), 0);

	let mut relaxed = Id3Tag::read_from(
		Cursor::new(bytes),
		ParseOptions::new().parsing_mode(ParsingMode::Relaxed),
	);
	assert_eq!(relaxed.frame_count().unwrap(), 0);
}

#[test_log::test]
fn frame_store() {
	let mut tag = read(title_tag());

	let index = tag.add_frame("TALB").unwrap();
	assert_eq!(index, 2);
	assert_eq!(tag.add_frame("TALB").unwrap(), 2);
	assert_eq!(tag.push_frame("TALB").unwrap(), 3);
	assert_eq!(tag.frame_index("TPE1").unwrap(), Some(1));

	tag.set_frame_raw(2, b"\x00Album".to_vec()).unwrap();
	assert_eq!(tag.frame_raw(2).unwrap(), b"\x00Album");
	assert_eq!(tag.album().unwrap().as_deref(), Some("Album"));

	let removed = tag.remove_frame(0).unwrap();
	assert_eq!(removed.id(), "TIT2");
	assert_eq!(tag.frame_count().unwrap(), 3);
	assert_eq!(tag.frame_by_id("TIT2").unwrap(), None);

	tag.set_frame_id(0, "TPE2").unwrap();
	assert_eq!(tag.frame(0).unwrap().unwrap().id(), "TPE2");

	let err = tag.remove_frame(10).unwrap_err();
	let ErrorKind::Id3v2(err) = err.kind() else {
		panic!("Expected an ID3v2 error, got {err:?}");
	};
	assert!(matches!(err.kind(), Id3v2ErrorKind::NoSuchFrame(10)));
}

#[test_log::test]
fn frame_ids_must_match_version() {
	let mut tag = empty();

	let err = tag.add_frame("TT2").unwrap_err();
	let ErrorKind::Id3v2(err) = err.kind() else {
		panic!("Expected an ID3v2 error, got {err:?}");
	};
	assert!(matches!(err.kind(), Id3v2ErrorKind::BadFrameId(_)));

	assert!(tag.add_frame("tit2").is_err());
	assert!(tag.add_frame("TIT2").is_ok());
}

#[test_log::test]
fn frame_flags() {
	let mut tag = read(title_tag());

	tag.set_frame_flag(0, FrameFlag::ReadOnly, true).unwrap();
	assert!(tag.frame_flag(0, FrameFlag::ReadOnly).unwrap());

	// ID3v2.3 has no frame level unsynchronisation
	tag.set_frame_flag(0, FrameFlag::Unsynchronised, true).unwrap();
	assert!(!tag.frame_flag(0, FrameFlag::Unsynchronised).unwrap());

	let err = tag.set_frame_flag(0, FrameFlag::Compressed, true).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::InvalidArgument(_)));

	tag.set_version(Id3v2Version::V4).unwrap();
	assert!(tag.frame_flag(0, FrameFlag::ReadOnly).unwrap());

	tag.set_version(Id3v2Version::V2).unwrap();
	assert!(!tag.frame_flag(0, FrameFlag::ReadOnly).unwrap());
}

#[test_log::test]
fn version_conversion() {
	let mut tag = read(title_tag());

	tag.set_version(Id3v2Version::V2).unwrap();
	assert_eq!(tag.frames().unwrap()[0].id(), "TT2");
	assert_eq!(tag.title().unwrap().as_deref(), Some("Foo title"));

	tag.set_version(Id3v2Version::V4).unwrap();
	assert_eq!(tag.frames().unwrap()[0].id(), "TIT2");
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Bar artist"));
}

#[test_log::test]
fn appending_requires_v4() {
	let mut tag = read(title_tag());

	tag.set_append(true).unwrap();
	assert_eq!(tag.version().unwrap().0, Id3v2Version::V4);

	let err = tag.set_version(Id3v2Version::V3).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::InvalidArgument(_)));

	tag.set_append(false).unwrap();
	tag.set_version(Id3v2Version::V3).unwrap();
}

#[test_log::test]
fn legacy_mirroring() {
	let mut tag = empty();

	tag.set_title("Latin-1 title", TextEncoding::Latin1).unwrap();
	tag.set_artist("UTF-16 artist", TextEncoding::UTF16).unwrap();
	tag.set_genre("Rock", TextEncoding::Latin1).unwrap();
	tag.set_track("5/12", TextEncoding::Latin1).unwrap();
	tag.set_date("19991231", TextEncoding::Latin1).unwrap();

	let trailer = tag.legacy_trailer().unwrap();
	assert_eq!(trailer.title.as_deref(), Some("Latin-1 title"));
	assert_eq!(trailer.artist, None);
	assert_eq!(trailer.genre, Some(17));
	assert_eq!(trailer.track_number, Some(5));
	assert_eq!(trailer.year.as_deref(), Some("1999"));

	assert_eq!(tag.track().unwrap().as_deref(), Some("5/12"));

	tag.set_genre("(Unknown genre)", TextEncoding::UTF8).unwrap();
	assert_eq!(tag.legacy_trailer().unwrap().genre, None);
}

#[test_log::test]
fn text_encoding_substitution() {
	let mut tag = empty();

	// UTF-8 can't be stored in ID3v2.3
	let index = tag.set_text_frame("TIT2", "Title", TextEncoding::UTF8).unwrap();
	assert_eq!(tag.frame_encoding(index).unwrap(), TextEncoding::UTF16);
	assert_eq!(tag.frame_text(index).unwrap().as_deref(), Some("Title"));

	tag.set_version(Id3v2Version::V4).unwrap();
	let index = tag.set_text_frame("TPE1", "Artist", TextEncoding::UTF8).unwrap();
	assert_eq!(tag.frame_encoding(index).unwrap(), TextEncoding::UTF8);
}

#[test_log::test]
fn multiple_text_fields() {
	let body = v4_frame(b"TPE1", b"\x03Foo\x00Bar\x00");
	let mut tag = read(tag(4, 0, &body));

	assert_eq!(tag.frame_text_fields(0).unwrap(), vec!["Foo", "Bar"]);
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Foo"));
}

#[test_log::test]
fn comments() {
	let mut tag = empty();

	tag.set_comment("First", None, None, TextEncoding::Latin1)
		.unwrap();
	tag.set_comment("Replaced", None, None, TextEncoding::Latin1)
		.unwrap();
	assert_eq!(tag.frame_count().unwrap(), 1);

	// A description that doesn't match adds a new comment
	tag.set_comment("Second", Some("desc"), Some(b"eng"), TextEncoding::UTF16)
		.unwrap();
	tag.set_comment("Third", Some("other"), None, TextEncoding::Latin1)
		.unwrap();
	assert_eq!(tag.frame_count().unwrap(), 3);

	assert_eq!(tag.comment(None, None).unwrap().as_deref(), Some("Replaced"));
	assert_eq!(tag.comment(Some("desc"), None).unwrap().as_deref(), Some("Second"));
	assert_eq!(tag.comment(None, Some(b"eng")).unwrap().as_deref(), Some("Second"));
	assert_eq!(tag.comment(Some("other"), None).unwrap().as_deref(), Some("Third"));
	assert_eq!(tag.comment(Some("missing"), None).unwrap(), None);

	// Omitted values are kept
	tag.set_comment("Second, edited", Some("desc"), None, TextEncoding::UTF16)
		.unwrap();
	assert_eq!(
		tag.comment(Some("desc"), Some(b"eng")).unwrap().as_deref(),
		Some("Second, edited")
	);

	assert_eq!(
		tag.legacy_trailer().unwrap().comment.as_deref(),
		Some("Third")
	);
}

#[test_log::test]
fn volume_adjustment() {
	let mut tag = empty();

	assert_eq!(tag.rva("track", ChannelType::MasterVolume).unwrap(), None);

	tag.set_rva("track", ChannelType::MasterVolume, -6.0).unwrap();
	tag.set_rva("track", ChannelType::FrontLeft, 2.5).unwrap();
	tag.set_rva("album", ChannelType::MasterVolume, 1.0).unwrap();

	assert_eq!(tag.frame_count().unwrap(), 2);
	assert_eq!(tag.frames().unwrap()[0].id(), "XRVA");

	let master = tag.rva("track", ChannelType::MasterVolume).unwrap().unwrap();
	assert!((master + 6.0).abs() < 1.0 / 512.0);
	assert_eq!(tag.rva("track", ChannelType::FrontLeft).unwrap(), Some(2.5));
	assert_eq!(tag.rva("track", ChannelType::Subwoofer).unwrap(), None);
	assert_eq!(tag.rva("album", ChannelType::Any).unwrap(), Some(1.0));

	assert!(tag.set_rva("track", ChannelType::Any, 1.0).is_err());
}

fn snapshot(tag: &mut Id3Tag<Cursor<Vec<u8>>>) -> (Vec<(String, Vec<u8>)>, LegacyTrailer) {
	let count = tag.frame_count().unwrap();

	let frames = (0..count)
		.map(|index| {
			let id = tag.frame(index).unwrap().unwrap().id().as_str().to_owned();
			(id, tag.frame_raw(index).unwrap().to_vec())
		})
		.collect();

	(frames, tag.legacy_trailer().unwrap().clone())
}

#[test_log::test]
fn rejected_setters_change_nothing() {
	for mut tag in [empty(), read(title_tag())] {
		let before = snapshot(&mut tag);

		// Can't be encoded as Latin-1
		assert!(tag.set_comment("\u{4E00}", None, None, TextEncoding::Latin1).is_err());
		assert!(tag.set_title("\u{4E00}", TextEncoding::Latin1).is_err());
		assert!(tag.set_text_frame("TALB", "\u{4E00}", TextEncoding::Latin1).is_err());
		assert!(tag.set_comment("Text", Some("\u{4E00}"), None, TextEncoding::Latin1).is_err());

		// No field can be set for every channel
		assert!(tag.set_rva("track", ChannelType::Any, 1.0).is_err());

		// ID3v2.2 IDs in an ID3v2.3 tag
		assert!(tag.set_text_frame("TT2", "Title", TextEncoding::Latin1).is_err());
		assert!(tag.push_frame("TT2").is_err());

		assert_eq!(snapshot(&mut tag), before);
	}
}

#[test_log::test]
fn pictures() {
	let mut content = vec![0];
	content.extend(b"image/png\x00");
	content.push(3);
	content.extend(b"Cover\x00");
	content.extend(b"\x89PNG\r\n\x1a\n");

	let mut body = v3_frame(b"TIT2", b"\x00Title");
	body.extend(v3_frame(b"APIC", &content));

	let mut tag = read(tag(3, 0, &body));

	let picture = tag.picture(1).unwrap();
	assert_eq!(picture.data, b"\x89PNG\r\n\x1a\n");

	let err = tag.picture(0).unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::InvalidArgument(_)));

	let dir = tempfile::tempdir().unwrap();
	let path = tag.save_image(1, dir.path().join("cover")).unwrap();
	assert_eq!(path, dir.path().join("cover.png"));
	assert_eq!(std::fs::read(path).unwrap(), b"\x89PNG\r\n\x1a\n");
}

#[test_log::test]
fn strip() {
	let mut tag = read(title_tag());
	tag.set_padding(PaddingPolicy::None);

	tag.strip().unwrap();
	assert_eq!(tag.frame_count().unwrap(), 0);
	assert!(!tag.legacy_trailer().unwrap().is_requested());
	assert_eq!(tag.padding(), PaddingPolicy::None);

	tag.set_size(512);
	assert_eq!(tag.padding(), PaddingPolicy::Minimum(512));
}

#[test_log::test]
fn changes_stay_in_memory() {
	let mut tag = read(title_tag());
	tag.set_unsync(true).unwrap();
	assert!(tag.is_unsynchronized().unwrap());

	let bytes = tag.into_inner().into_inner();
	assert_eq!(bytes, title_tag());
}

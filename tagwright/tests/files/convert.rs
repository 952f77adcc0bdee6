use crate::util::{audio, open, tag, temp_file};

use tagwright::TextEncoding;
use tagwright::config::WriteOptions;
use tagwright::id3::v2::{Id3v2Version, PictureFormat};

fn v3_file() -> Vec<u8> {
	let mut content = tag(
		3,
		&[
			("TIT2", b"\x00Title"),
			("TYER", b"\x002004"),
			("TDAT", b"\x001509"),
			("TIME", b"\x001230"),
			("TCON", b"\x00(17)Garage"),
			("RVAD", b"\x03\x10\x00\x10\x00\x10"),
			("APIC", b"\x00image/jpeg\x00\x03\x00\xFF\xD8\xFF"),
		],
		64,
	);
	content.extend(audio());
	content
}

#[test_log::test]
fn v3_to_v4() {
	let (_dir, path) = temp_file(&v3_file());

	let mut tag = open(&path);
	tag.set_version(Id3v2Version::V4).unwrap();
	tag.write(WriteOptions::default()).unwrap();

	let mut tag = open(&path);
	assert_eq!(tag.version().unwrap().0, Id3v2Version::V4);

	let ids = tag
		.frames()
		.unwrap()
		.iter()
		.map(|frame| frame.id().as_str().to_owned())
		.collect::<Vec<_>>();

	// RVAD has no ID3v2.4 equivalent
	assert_eq!(ids, ["TIT2", "TDRC", "TCON", "APIC"]);

	assert_eq!(tag.date().unwrap().as_deref(), Some("2004-09-15T12:30"));
	assert_eq!(tag.frame_text_fields(2).unwrap(), ["17", "Garage"]);
	assert_eq!(tag.genre().unwrap().as_deref(), Some("17"));
}

#[test_log::test]
fn v3_to_v2_and_back() {
	let (_dir, path) = temp_file(&v3_file());

	let mut tag = open(&path);
	tag.set_version(Id3v2Version::V2).unwrap();

	assert_eq!(tag.frame_by_id("TT2").unwrap().unwrap().size(), 6);
	assert_eq!(tag.date().unwrap().as_deref(), Some("2004"));

	let index = tag.frame_index("PIC").unwrap().unwrap();
	let picture = tag.picture(index).unwrap();
	assert_eq!(picture.format, PictureFormat::ImageFormat(String::from("jpg")));
	assert_eq!(picture.data, b"\xFF\xD8\xFF");

	// ID3v2.2 can't be written, the tag goes back to ID3v2.3
	tag.write(WriteOptions::default()).unwrap();

	let mut tag = open(&path);
	assert_eq!(tag.version().unwrap().0, Id3v2Version::V3);
	assert_eq!(tag.title().unwrap().as_deref(), Some("Title"));

	let index = tag.frame_index("APIC").unwrap().unwrap();
	let picture = tag.picture(index).unwrap();
	assert_eq!(picture.format, PictureFormat::MimeType(String::from("image/jpeg")));
}

#[test_log::test]
fn appending_restricts_version() {
	let (_dir, path) = temp_file(&v3_file());

	let mut tag = open(&path);
	let before = tag.frames().unwrap().to_vec();

	// Appending rules out every version but ID3v2.4
	tag.set_append(true).unwrap();
	assert!(tag.set_version(Id3v2Version::V2).is_err());
	assert_eq!(tag.version().unwrap().0, Id3v2Version::V4);

	tag.set_append(false).unwrap();
	tag.set_version(Id3v2Version::V3).unwrap();
	assert_eq!(tag.frame_count().unwrap(), before.len() - 1);
}

#[test_log::test]
fn utf8_is_transcoded_for_v3() {
	let (_dir, path) = temp_file(&audio());

	let mut tag = open(&path);
	tag.set_version(Id3v2Version::V4).unwrap();
	tag.set_artist("Ärtist", TextEncoding::UTF8).unwrap();

	tag.set_version(Id3v2Version::V3).unwrap();
	assert_eq!(tag.frame_encoding(0).unwrap(), TextEncoding::UTF16);

	tag.write(WriteOptions::default()).unwrap();

	let mut tag = open(&path);
	assert_eq!(tag.artist().unwrap().as_deref(), Some("Ärtist"));
}

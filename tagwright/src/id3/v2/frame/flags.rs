use crate::id3::v2::Id3v2Version;

/// A single frame flag, for use with [`Id3Tag::frame_flag`](crate::id3::v2::Id3Tag::frame_flag)
///
/// Not every flag exists in every version. ID3v2.2 has no frame flags at all, and ID3v2.3 has no
/// per-frame unsynchronisation or data length indicator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FrameFlag {
	/// Discard the frame when the tag is altered and the frame is unknown
	TagAlterPreserve,
	/// Discard the frame when the audio is altered
	FileAlterPreserve,
	/// The frame is intended to be read only
	ReadOnly,
	/// The frame carries a group identifier
	HasGroupId,
	/// The frame is zlib compressed
	Compressed,
	/// The frame is encrypted
	Encrypted,
	/// The frame is unsynchronised
	Unsynchronised,
	/// The frame carries a data length indicator
	HasDataLength,
}

impl FrameFlag {
	const ALL: [Self; 8] = [
		Self::TagAlterPreserve,
		Self::FileAlterPreserve,
		Self::ReadOnly,
		Self::HasGroupId,
		Self::Compressed,
		Self::Encrypted,
		Self::Unsynchronised,
		Self::HasDataLength,
	];

	/// The bit for this flag in the frame header of `version`
	///
	/// Returns `0` when the flag cannot be represented.
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::{FrameFlag, Id3v2Version};
	///
	/// assert_eq!(FrameFlag::Compressed.mask(Id3v2Version::V3), 0x0080);
	/// assert_eq!(FrameFlag::Compressed.mask(Id3v2Version::V4), 0x0008);
	/// assert_eq!(FrameFlag::Unsynchronised.mask(Id3v2Version::V3), 0);
	/// ```
	pub fn mask(self, version: Id3v2Version) -> u16 {
		const V3: [u16; 8] = [0x8000, 0x4000, 0x2000, 0x0020, 0x0080, 0x0040, 0x0000, 0x0000];
		const V4: [u16; 8] = [0x4000, 0x2000, 0x1000, 0x0040, 0x0008, 0x0004, 0x0002, 0x0001];

		let index = self as usize;
		match version {
			Id3v2Version::V2 => 0,
			Id3v2Version::V3 => V3[index],
			Id3v2Version::V4 => V4[index],
		}
	}
}

/// Various flags to describe the content of an item
///
/// The values that follow a frame header when certain flags are set (group identifier,
/// encryption method, data length) are stored here, so the payload of a [`Frame`](crate::id3::v2::Frame)
/// never includes them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// Preserve frame on tag edit
	pub tag_alter_preservation: bool,
	/// Preserve frame on file edit
	pub file_alter_preservation: bool,
	/// Item cannot be written to
	pub read_only: bool,
	/// The group identifier the frame belongs to
	pub grouping_identity: Option<u8>,
	/// Frame is zlib compressed
	pub compression: bool,
	/// Frame encryption method symbol
	pub encryption: Option<u8>,
	/// Frame is unsynchronised
	///
	/// Payloads are always held decoded, this only describes the frame as it was read, or as it
	/// will be written.
	pub unsynchronisation: bool,
	/// The size of the frame data before compression/encryption
	pub data_length_indicator: Option<u32>,
}

impl FrameFlags {
	/// Parse the flags from a frame header of `version`
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)` until their values
	/// are read:
	/// * `grouping_identity`
	/// * `encryption`
	/// * `data_length_indicator`
	pub fn parse(version: Id3v2Version, flags: u16) -> Self {
		let has = |flag: FrameFlag| {
			let mask = flag.mask(version);
			mask != 0 && flags & mask == mask
		};

		let compression = has(FrameFlag::Compressed);
		Self {
			tag_alter_preservation: has(FrameFlag::TagAlterPreserve),
			file_alter_preservation: has(FrameFlag::FileAlterPreserve),
			read_only: has(FrameFlag::ReadOnly),
			grouping_identity: has(FrameFlag::HasGroupId).then_some(0),
			compression,
			encryption: has(FrameFlag::Encrypted).then_some(0),
			unsynchronisation: has(FrameFlag::Unsynchronised),
			// ID3v2.3 always stores the decompressed size of compressed frames
			data_length_indicator: (has(FrameFlag::HasDataLength)
				|| (version == Id3v2Version::V3 && compression))
				.then_some(0),
		}
	}

	/// Get the frame header representation of the flags for `version`
	pub fn as_bits(&self, version: Id3v2Version) -> u16 {
		FrameFlag::ALL
			.into_iter()
			.filter(|flag| self.get(*flag))
			.fold(0, |bits, flag| bits | flag.mask(version))
	}

	/// Whether `flag` is set
	pub fn get(&self, flag: FrameFlag) -> bool {
		match flag {
			FrameFlag::TagAlterPreserve => self.tag_alter_preservation,
			FrameFlag::FileAlterPreserve => self.file_alter_preservation,
			FrameFlag::ReadOnly => self.read_only,
			FrameFlag::HasGroupId => self.grouping_identity.is_some(),
			FrameFlag::Compressed => self.compression,
			FrameFlag::Encrypted => self.encryption.is_some(),
			FrameFlag::Unsynchronised => self.unsynchronisation,
			FrameFlag::HasDataLength => self.data_length_indicator.is_some(),
		}
	}

	/// Set or clear `flag`
	///
	/// Flags carrying a value are set to `Some(0)`, unless they already have a value.
	pub fn set(&mut self, flag: FrameFlag, value: bool) {
		fn set_value<T: Default>(slot: &mut Option<T>, value: bool) {
			match (value, slot.is_some()) {
				(true, false) => *slot = Some(T::default()),
				(false, _) => *slot = None,
				_ => {},
			}
		}

		match flag {
			FrameFlag::TagAlterPreserve => self.tag_alter_preservation = value,
			FrameFlag::FileAlterPreserve => self.file_alter_preservation = value,
			FrameFlag::ReadOnly => self.read_only = value,
			FrameFlag::HasGroupId => set_value(&mut self.grouping_identity, value),
			FrameFlag::Compressed => self.compression = value,
			FrameFlag::Encrypted => set_value(&mut self.encryption, value),
			FrameFlag::Unsynchronised => self.unsynchronisation = value,
			FrameFlag::HasDataLength => set_value(&mut self.data_length_indicator, value),
		}
	}

	/// Whether the payload cannot be interpreted as is
	pub fn is_opaque(&self) -> bool {
		self.compression || self.encryption.is_some()
	}

	/// The number of bytes between the frame header and the payload for `version`
	pub(crate) fn additions_len(&self, version: Id3v2Version) -> u32 {
		match version {
			Id3v2Version::V2 => 0,
			Id3v2Version::V3 => {
				u32::from(self.compression) * 4
					+ u32::from(self.encryption.is_some())
					+ u32::from(self.grouping_identity.is_some())
			},
			Id3v2Version::V4 => {
				u32::from(self.grouping_identity.is_some())
					+ u32::from(self.encryption.is_some())
					+ u32::from(self.data_length_indicator.is_some()) * 4
			},
		}
	}
}

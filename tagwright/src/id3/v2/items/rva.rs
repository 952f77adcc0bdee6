use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::macros::err;
use crate::util::text::{TextEncoding, latin1_decode};

use byteorder::{BigEndian, ByteOrder};

/// A channel identifier used in relative volume adjustment frames
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[allow(missing_docs)]
pub enum ChannelType {
	Other = 0,
	MasterVolume = 1,
	FrontRight = 2,
	FrontLeft = 3,
	BackRight = 4,
	BackLeft = 5,
	FrontCentre = 6,
	BackCentre = 7,
	Subwoofer = 8,
	/// Matches the first channel when reading, can't be written
	Any = 0xFF,
}

impl ChannelType {
	/// Get a [`ChannelType`] from a `u8`
	///
	/// # Examples
	///
	/// ```rust
	/// use tagwright::id3::v2::ChannelType;
	///
	/// let valid_byte = 1;
	/// assert_eq!(
	/// 	ChannelType::from_u8(valid_byte),
	/// 	Some(ChannelType::MasterVolume)
	/// );
	///
	/// // The valid range is 0..=8, and 0xFF
	/// let invalid_byte = 10;
	/// assert_eq!(ChannelType::from_u8(invalid_byte), None);
	/// ```
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Other),
			1 => Some(Self::MasterVolume),
			2 => Some(Self::FrontRight),
			3 => Some(Self::FrontLeft),
			4 => Some(Self::BackRight),
			5 => Some(Self::BackLeft),
			6 => Some(Self::FrontCentre),
			7 => Some(Self::BackCentre),
			8 => Some(Self::Subwoofer),
			0xFF => Some(Self::Any),
			_ => None,
		}
	}
}

/// The volume adjustment for a single channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelAdjustment {
	/// The raw channel byte
	pub channel: u8,
	/// A fixed point decibel value representing (adjustment*512), giving +/- 64 dB with a precision of 0.001953125 dB.
	pub volume_adjustment: i16,
	/// The number of bits the peak volume field occupies, with 0 meaning there is no peak volume.
	pub bits_representing_peak: u8,
	/// The peak volume, `ceil(bits_representing_peak / 8)` bytes
	pub peak_volume: Vec<u8>,
}

impl ChannelAdjustment {
	/// The adjustment in decibels
	pub fn decibels(&self) -> f32 {
		f32::from(self.volume_adjustment) / 512.0
	}

	fn encoded_len(&self) -> usize {
		4 + self.peak_volume.len()
	}
}

/// A relative volume adjustment frame (`XRV`/`XRVA`/`RVA2`)
///
/// Every version uses the ID3v2.4 `RVA2` layout: a terminated identification string, followed by
/// one field per channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeAdjustment {
	/// The situation and/or device where this adjustment should apply
	pub identification: String,
	/// The channel fields, in stored order
	pub channels: Vec<ChannelAdjustment>,
}

/// The raw identification string of a payload, `None` if it isn't terminated
pub(crate) fn identification(payload: &[u8]) -> Option<&[u8]> {
	let end = payload.iter().position(|b| *b == 0)?;
	Some(&payload[..end])
}

// `None` if the field doesn't fit in `bytes`
fn read_field(bytes: &[u8]) -> Option<ChannelAdjustment> {
	if bytes.len() < 4 {
		return None;
	}

	let bits_representing_peak = bytes[3];
	let peak_len = usize::from(bits_representing_peak).div_ceil(8);
	let peak_volume = bytes.get(4..4 + peak_len)?;

	Some(ChannelAdjustment {
		channel: bytes[0],
		volume_adjustment: BigEndian::read_i16(&bytes[1..3]),
		bits_representing_peak,
		peak_volume: peak_volume.to_vec(),
	})
}

impl VolumeAdjustment {
	/// Read a [`VolumeAdjustment`] from a frame payload
	///
	/// Parsing stops at the first field that does not fit in the payload.
	///
	/// # Errors
	///
	/// The identification string is not terminated
	pub fn parse(payload: &[u8]) -> Result<Self> {
		let Some(identification_bytes) = identification(payload) else {
			return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
		};

		let mut remaining = &payload[identification_bytes.len() + 1..];
		let mut channels = Vec::new();
		while let Some(field) = read_field(remaining) {
			remaining = &remaining[field.encoded_len()..];
			channels.push(field);
		}

		if !remaining.is_empty() {
			log::warn!(
				"Volume adjustment has {} trailing bytes that don't form a field",
				remaining.len()
			);
		}

		Ok(Self {
			identification: latin1_decode(identification_bytes),
			channels,
		})
	}

	/// Check a payload for structural problems, without keeping anything
	///
	/// The identification string must be terminated, there must be at least one field, every
	/// field must name a known channel and the fields must end exactly at the end of the payload.
	pub fn is_valid(payload: &[u8]) -> bool {
		let Some(identification_bytes) = identification(payload) else {
			return false;
		};

		let mut remaining = &payload[identification_bytes.len() + 1..];
		if remaining.is_empty() {
			return false;
		}

		while !remaining.is_empty() {
			let Some(field) = read_field(remaining) else {
				return false;
			};

			if field.channel > ChannelType::Subwoofer as u8 {
				return false;
			}

			remaining = &remaining[field.encoded_len()..];
		}

		true
	}

	/// Get the adjustment for a channel
	///
	/// [`ChannelType::Any`] matches the first channel.
	pub fn channel(&self, channel: ChannelType) -> Option<&ChannelAdjustment> {
		match channel {
			ChannelType::Any => self.channels.first(),
			_ => self.channels.iter().find(|field| field.channel == channel as u8),
		}
	}

	/// Set the adjustment for a channel in decibels
	///
	/// An existing field for the channel is replaced, including its peak volume. The value is
	/// rounded to the nearest 1/512 dB and clamped to the representable range.
	///
	/// # Errors
	///
	/// `channel` is [`ChannelType::Any`]
	pub fn set_channel(&mut self, channel: ChannelType, decibels: f32) -> Result<()> {
		if channel == ChannelType::Any {
			err!(InvalidArgument("A volume adjustment can't be set for any channel"));
		}

		let volume_adjustment = (decibels * 512.0)
			.round()
			.clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16;

		let field = ChannelAdjustment {
			channel: channel as u8,
			volume_adjustment,
			bits_representing_peak: 0,
			peak_volume: Vec::new(),
		};

		match self
			.channels
			.iter_mut()
			.find(|existing| existing.channel == channel as u8)
		{
			Some(existing) => *existing = field,
			None => self.channels.push(field),
		}

		Ok(())
	}

	/// Convert a [`VolumeAdjustment`] to a frame payload
	///
	/// The identification string is written as Latin-1, unrepresentable characters become `?`.
	///
	/// # Errors
	///
	/// A field's peak volume doesn't match its number of peak bits
	pub fn as_bytes(&self) -> Result<Vec<u8>> {
		let mut bytes = TextEncoding::Latin1.encode(&self.identification, true, true)?;

		for field in &self.channels {
			if field.peak_volume.len() != usize::from(field.bits_representing_peak).div_ceil(8) {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadRvaChannel(field.channel)).into());
			}

			bytes.push(field.channel);
			bytes.extend(field.volume_adjustment.to_be_bytes());
			bytes.push(field.bits_representing_peak);
			bytes.extend(&field.peak_volume);
		}

		Ok(bytes)
	}
}

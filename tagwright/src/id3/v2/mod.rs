//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! Three versions of ID3v2 can be read: 2.2, 2.3, and 2.4. Only ID3v2.3 and ID3v2.4 can be written,
//! an ID3v2.2 tag is converted to ID3v2.3 when it is committed. See [`Id3Tag::set_version`].
//!
//! Frame payloads are kept as raw bytes, see:
//!
//! * [`Id3Tag`]
//! * [`Frame`]

mod convert;
mod frame;
pub(crate) mod header;
mod items;
mod tag;
pub mod util;
mod write;

// Exports

pub use header::{HEADER_SIZE, Id3v2TagFlags, Id3v2Version};

pub use tag::Id3Tag;
pub use write::PaddingPolicy;

pub use items::{
	AttachedPicture, ChannelAdjustment, ChannelType, Comment, PictureFormat, UNKNOWN_LANGUAGE,
	VolumeAdjustment,
};

pub use frame::{Frame, FrameFlag, FrameFlags, FrameId, frame_description};

mod comment;
mod picture;
mod rva;
pub(super) mod text;

pub use comment::{Comment, UNKNOWN_LANGUAGE};
pub use picture::{AttachedPicture, PictureFormat};
pub(crate) use rva::identification as rva_identification;
pub use rva::{ChannelAdjustment, ChannelType, VolumeAdjustment};

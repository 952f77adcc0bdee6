#![allow(missing_docs)]

mod convert;
mod read;
pub(crate) mod util;
mod write;

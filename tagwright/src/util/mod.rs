pub(crate) mod alloc;
pub mod io;
pub(crate) mod text;

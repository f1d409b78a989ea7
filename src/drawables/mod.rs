pub(crate) mod picture;
pub(crate) mod shape;
pub(crate) mod text;

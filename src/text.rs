pub mod bitmap;
pub(crate) mod engine;
pub mod font;

pub mod color;
pub mod decode;
pub mod gallery;
pub mod loader;
pub mod source;

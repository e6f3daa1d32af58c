pub mod boundary;
pub mod texture;

pub use boundary::*;
pub use texture::*;

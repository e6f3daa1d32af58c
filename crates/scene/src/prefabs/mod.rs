pub mod atmosphere;
pub mod globe;
pub mod lights;
pub mod starfield;

pub use atmosphere::*;
pub use globe::*;
pub use lights::*;
pub use starfield::*;

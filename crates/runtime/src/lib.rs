pub mod animation;
pub mod frame;
pub mod lifecycle;

pub use animation::*;
pub use frame::*;
pub use lifecycle::*;

pub mod geometry;
pub mod light;
pub mod material;
pub mod segments;
pub mod starfield;
pub mod transform;

pub use geometry::*;
pub use light::*;
pub use material::*;
pub use segments::*;
pub use starfield::*;
pub use transform::*;

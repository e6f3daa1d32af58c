pub mod aurora;
pub mod borders;
pub mod graticule;
pub mod marker;
pub mod surface;
pub mod symbology;

pub use aurora::*;
pub use borders::*;
pub use marker::*;
pub use surface::*;
pub use symbology::*;

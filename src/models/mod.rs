pub mod brief;
pub mod response;

pub use brief::*;
pub use response::*;

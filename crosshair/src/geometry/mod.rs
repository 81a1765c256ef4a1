pub mod layout;
pub mod resolution;

pub use layout::*;
pub use resolution::*;

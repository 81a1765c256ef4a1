pub mod background;
pub mod color;
pub mod renderer;
pub mod surface;

pub use background::*;
pub use color::*;
pub use renderer::*;
pub use surface::*;

pub mod controls;
pub mod crosshair;
pub mod registry;
pub mod script;
pub mod widget;

pub use controls::*;
pub use registry::*;
pub use script::ConfigFile;
pub use widget::*;

pub mod control;
pub mod core;
pub mod geometry;
pub mod prelude;
pub mod render;
pub mod runtime;
pub mod state;

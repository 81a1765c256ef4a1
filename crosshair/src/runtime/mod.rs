pub mod configurator;
pub mod events;
pub mod persistence;
pub mod settings;
pub mod storage;

pub use configurator::*;
pub use events::*;
pub use persistence::*;
pub use settings::*;
pub use storage::*;

pub use super::logging::{debug, error, info, trace, warn};
pub use super::util::*;
pub use crate::ternary;
pub use crate::warn_once;

pub use crate::control::crosshair::*;
pub use crate::control::{
    ConfigFile, Control, ControlConfig, ControlRegistry, ControlRegistryBuilder,
    ControlValue, Extraction, FileHandle, FileReader, PendingRead, RawInput,
    ReadPoll, ReadResult, WidgetHandle, WidgetHost, WidgetKind, WidgetSpec,
};
pub use crate::core::logging::init_logger;
pub use crate::core::logging::{debug, error, info, trace, warn};
pub use crate::geometry::{
    LayoutResult, Rect, ResolutionTable, Viewport, compute_layout,
};
pub use crate::render::{
    Bitmap, Renderer, Rgba, encode_data_url, mime_for_path, parse_css_color,
};
pub use crate::runtime::{
    Capabilities, Configurator, ControlEvent, ControlEventReceiver,
    ControlEventSender, FileStorage, MemoryStorage, Persistence, STORAGE_KEY,
    Settings, Storage, TurnReport, event_channel,
};
pub use crate::state::{Overrides, StateStore};
pub use crate::warn_once;

//! The capabilities a host UI toolkit lends to the control layer.
//!
//! The pipeline never touches real widgets. It asks a [`WidgetHost`] to create
//! them, reads their raw values back when the host reports a change, and hands
//! file selections to a [`FileReader`].

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WidgetHandle(pub usize);

/// Opaque reference to a file the user picked
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileHandle(pub PathBuf);

/// The untyped value a widget reports. Controls turn this into a
/// [`ControlValue`](super::ControlValue).
#[derive(Clone, Debug, PartialEq)]
pub enum RawInput {
    Checked(bool),
    Text(String),
    File(FileHandle),
}

#[derive(Clone, Debug, PartialEq)]
pub enum WidgetKind {
    Checkbox {
        checked: bool,
    },
    Range {
        value: String,
        min: f32,
        max: f32,
        step: f32,
    },
    Select {
        value: String,
        options: Vec<String>,
    },
    Color {
        value: String,
    },
    File {
        accept: Vec<String>,
    },
}

/// Everything a host needs to create and mount one labeled input
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetSpec {
    pub id: String,
    pub label: String,
    pub kind: WidgetKind,
}

impl WidgetSpec {
    /// The raw value a freshly created widget reports before the user touches
    /// it. File inputs start empty.
    pub fn initial_input(&self) -> Option<RawInput> {
        match &self.kind {
            WidgetKind::Checkbox { checked } => {
                Some(RawInput::Checked(*checked))
            }
            WidgetKind::Range { value, .. }
            | WidgetKind::Select { value, .. }
            | WidgetKind::Color { value } => {
                Some(RawInput::Text(value.clone()))
            }
            WidgetKind::File { .. } => None,
        }
    }
}

pub trait WidgetHost {
    fn create_widget(&mut self, spec: WidgetSpec) -> WidgetHandle;

    fn read_value(&self, handle: WidgetHandle) -> Option<RawInput>;

    /// Pushes a value into a widget without emitting a change notification.
    /// Used when the pipeline resets state behind the widgets' backs.
    fn write_value(&mut self, _handle: WidgetHandle, _value: RawInput) {}
}

pub type ReadResult = Result<String, String>;

#[derive(Debug)]
pub enum ReadPoll {
    Pending,
    Ready(ReadResult),
    /// The producing side went away without resolving
    Abandoned,
}

/// Single-resolution channel carrying the data URI of a file read
#[derive(Debug)]
pub struct PendingRead {
    rx: Receiver<ReadResult>,
}

impl PendingRead {
    pub fn channel() -> (Sender<ReadResult>, PendingRead) {
        let (tx, rx) = mpsc::channel();
        (tx, PendingRead { rx })
    }

    pub fn resolved(result: ReadResult) -> Self {
        let (tx, read) = Self::channel();
        let _ = tx.send(result);
        read
    }

    pub fn poll(&mut self) -> ReadPoll {
        match self.rx.try_recv() {
            Ok(result) => ReadPoll::Ready(result),
            Err(TryRecvError::Empty) => ReadPoll::Pending,
            Err(TryRecvError::Disconnected) => ReadPoll::Abandoned,
        }
    }
}

pub trait FileReader {
    fn read_as_data_url(&self, file: &FileHandle) -> PendingRead;
}

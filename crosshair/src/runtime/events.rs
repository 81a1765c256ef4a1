use std::sync::mpsc;
use std::sync::mpsc::{Receiver, Sender};

use crate::control::WidgetHandle;
use crate::geometry::Viewport;

/// Notifications a host sends into the pipeline
#[derive(Clone, Debug, PartialEq)]
pub enum ControlEvent {
    /// The widget's value changed; the pipeline reads it back
    Changed(WidgetHandle),
    Resized(Viewport),
    Reset,
}

pub type ControlEventSender = Sender<ControlEvent>;
pub type ControlEventReceiver = Receiver<ControlEvent>;

pub fn event_channel() -> (ControlEventSender, ControlEventReceiver) {
    mpsc::channel()
}

//! Command-line stand-ins for the widgets and file dialog a graphical host
//! would provide

use std::fs;
use std::thread;

use crosshair::prelude::*;

/// Widgets that hold their raw values in memory. Text assigned to a widget is
/// interpreted the way the matching form input would.
pub struct CliWidgetHost {
    widgets: Vec<(WidgetSpec, Option<RawInput>)>,
    tx: ControlEventSender,
}

impl CliWidgetHost {
    pub fn new(tx: ControlEventSender) -> Self {
        Self {
            widgets: vec![],
            tx,
        }
    }

    pub fn specs(&self) -> impl Iterator<Item = &WidgetSpec> {
        self.widgets.iter().map(|(spec, _)| spec)
    }

    /// Assigns `text` to the widget labelled `name` and notifies the pipeline
    pub fn set_from_text(
        &mut self,
        name: &str,
        text: &str,
    ) -> Result<(), String> {
        let index = self
            .widgets
            .iter()
            .position(|(spec, _)| spec.id == name)
            .ok_or_else(|| format!("no control named `{}`", name))?;

        let input = to_raw_input(&self.widgets[index].0.kind, text)?;
        self.widgets[index].1 = Some(input);

        self.tx
            .send(ControlEvent::Changed(WidgetHandle(index)))
            .map_err(|err| format!("pipeline is gone: {}", err))
    }
}

fn to_raw_input(kind: &WidgetKind, text: &str) -> Result<RawInput, String> {
    let input = match kind {
        WidgetKind::Checkbox { .. } => {
            let checked = match text.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => true,
                "false" | "off" | "no" | "0" => false,
                other => return Err(format!("`{}` is not on or off", other)),
            };
            RawInput::Checked(checked)
        }
        // A range input never reports a value outside its bounds
        WidgetKind::Range { min, max, .. } => {
            match text.trim().parse::<f32>() {
                Ok(value) if value.is_finite() => {
                    RawInput::Text(value.clamp(*min, *max).to_string())
                }
                _ => RawInput::Text(text.to_string()),
            }
        }
        WidgetKind::Select { options, .. } => {
            if !options.iter().any(|o| o == text) {
                return Err(format!(
                    "`{}` is not one of {}",
                    text,
                    options.join(", ")
                ));
            }
            RawInput::Text(text.to_string())
        }
        WidgetKind::Color { .. } => RawInput::Text(text.to_string()),
        WidgetKind::File { .. } => RawInput::File(FileHandle(text.into())),
    };

    Ok(input)
}

impl WidgetHost for CliWidgetHost {
    fn create_widget(&mut self, spec: WidgetSpec) -> WidgetHandle {
        trace!("Created {:?} widget `{}`", spec.kind, spec.label);
        let initial = spec.initial_input();
        self.widgets.push((spec, initial));
        WidgetHandle(self.widgets.len() - 1)
    }

    fn read_value(&self, handle: WidgetHandle) -> Option<RawInput> {
        self.widgets.get(handle.0).and_then(|(_, v)| v.clone())
    }

    fn write_value(&mut self, handle: WidgetHandle, value: RawInput) {
        if let Some(widget) = self.widgets.get_mut(handle.0) {
            widget.1 = Some(value);
        }
    }
}

/// Reads picked files on a worker thread and resolves with a data URI
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadedFileReader;

impl FileReader for ThreadedFileReader {
    fn read_as_data_url(&self, file: &FileHandle) -> PendingRead {
        let (tx, read) = PendingRead::channel();
        let path = file.0.clone();

        thread::spawn(move || {
            let result = fs::read(&path)
                .map_err(|err| format!("{}: {}", path.display(), err))
                .and_then(|bytes| {
                    let mime = mime_for_path(&path).ok_or_else(|| {
                        format!("{}: not a png or jpeg file", path.display())
                    })?;
                    Ok(encode_data_url(mime, &bytes))
                });
            let _ = tx.send(result);
        });

        read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> WidgetKind {
        WidgetKind::Range {
            value: "5".into(),
            min: 1.0,
            max: 25.0,
            step: 1.0,
        }
    }

    #[test]
    fn test_range_clamps_like_a_form_input() {
        assert_eq!(
            to_raw_input(&range(), "40").unwrap(),
            RawInput::Text("25".into())
        );
        assert_eq!(
            to_raw_input(&range(), "abc").unwrap(),
            RawInput::Text("abc".into())
        );
    }

    #[test]
    fn test_checkbox_and_select_text() {
        let checkbox = WidgetKind::Checkbox { checked: true };
        assert_eq!(
            to_raw_input(&checkbox, "off").unwrap(),
            RawInput::Checked(false)
        );
        assert!(to_raw_input(&checkbox, "maybe").is_err());

        let select = WidgetKind::Select {
            value: "16:9".into(),
            options: vec!["16:9".into(), "4:3".into()],
        };
        assert!(to_raw_input(&select, "4:3").is_ok());
        assert!(to_raw_input(&select, "21:9").is_err());
    }

    #[test]
    fn test_threaded_reader_reports_missing_file() {
        let mut read = ThreadedFileReader
            .read_as_data_url(&FileHandle("/nonexistent/bg.png".into()));

        let result = loop {
            match read.poll() {
                ReadPoll::Pending => thread::yield_now(),
                ReadPoll::Ready(result) => break result,
                ReadPoll::Abandoned => panic!("reader dropped the read"),
            }
        };
        assert!(result.is_err());
    }
}

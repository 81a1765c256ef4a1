#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Cursor;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use crosshair::prelude::*;

/// Widget host whose widgets are plain values a test pokes at
pub struct ScriptedHost {
    widgets: Vec<(WidgetSpec, Option<RawInput>)>,
    tx: ControlEventSender,
}

impl ScriptedHost {
    pub fn new(tx: ControlEventSender) -> Self {
        Self {
            widgets: vec![],
            tx,
        }
    }

    fn index(&self, name: &str) -> usize {
        self.widgets
            .iter()
            .position(|(spec, _)| spec.id == name)
            .unwrap_or_else(|| panic!("no widget named `{}`", name))
    }

    pub fn spec(&self, name: &str) -> &WidgetSpec {
        &self.widgets[self.index(name)].0
    }

    pub fn value(&self, name: &str) -> Option<RawInput> {
        self.widgets[self.index(name)].1.clone()
    }

    pub fn labels(&self) -> Vec<String> {
        self.widgets.iter().map(|(s, _)| s.label.clone()).collect()
    }

    /// Simulates the user editing a widget
    pub fn change(&mut self, name: &str, input: RawInput) {
        let index = self.index(name);
        self.widgets[index].1 = Some(input);
        self.tx.send(ControlEvent::Changed(WidgetHandle(index))).unwrap();
    }

    pub fn resize(&self, height: f32) {
        self.tx
            .send(ControlEvent::Resized(Viewport { height }))
            .unwrap();
    }

    pub fn reset(&self) {
        self.tx.send(ControlEvent::Reset).unwrap();
    }
}

impl WidgetHost for ScriptedHost {
    fn create_widget(&mut self, spec: WidgetSpec) -> WidgetHandle {
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

/// File reader that holds every read open until the test resolves it
#[derive(Clone, Default)]
pub struct ManualReader {
    reads: Rc<RefCell<Vec<(PathBuf, Sender<ReadResult>)>>>,
}

impl ManualReader {
    pub fn in_flight(&self) -> usize {
        self.reads.borrow().len()
    }

    /// Resolves the oldest outstanding read of `path`
    pub fn resolve(&self, path: &str, result: ReadResult) {
        let mut reads = self.reads.borrow_mut();
        let index = reads
            .iter()
            .position(|(p, _)| p == &PathBuf::from(path))
            .unwrap_or_else(|| panic!("no read in flight for {}", path));
        let (_, tx) = reads.remove(index);
        let _ = tx.send(result);
    }
}

impl FileReader for ManualReader {
    fn read_as_data_url(&self, file: &FileHandle) -> PendingRead {
        let (tx, read) = PendingRead::channel();
        self.reads.borrow_mut().push((file.0.clone(), tx));
        read
    }
}

pub type TestConfigurator =
    Configurator<ScriptedHost, ManualReader, MemoryStorage>;

pub struct Harness {
    pub configurator: TestConfigurator,
    pub storage: MemoryStorage,
    pub reader: ManualReader,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(MemoryStorage::new())
    }

    /// Builds a pipeline over `storage`, as a page load would
    pub fn with_storage(storage: MemoryStorage) -> Self {
        let resolutions = ResolutionTable::default();
        let registry = crosshair_controls(&resolutions);
        let reader = ManualReader::default();
        let (tx, rx) = event_channel();

        let configurator = Configurator::new(
            registry,
            resolutions,
            Capabilities {
                host: ScriptedHost::new(tx),
                reader: reader.clone(),
                persistence: Persistence::new(storage.clone()),
                events: rx,
                viewport: Viewport::default(),
            },
        )
        .expect("crosshair controls are complete");

        Self {
            configurator,
            storage,
            reader,
        }
    }

    pub fn host(&mut self) -> &mut ScriptedHost {
        self.configurator.host_mut()
    }

    pub fn saved(&self) -> Option<serde_json::Value> {
        self.storage
            .get(STORAGE_KEY)
            .map(|json| serde_json::from_str(&json).expect("valid json"))
    }
}

pub fn png_data_url(rgba: [u8; 4]) -> String {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, 1, 1);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("png header");
        writer.write_image_data(&rgba).expect("png data");
        writer.finish().expect("png finish");
    }
    encode_data_url("image/png", &bytes)
}

/// Solid 8x8 JPEG; the colour survives compression to within a few levels
pub fn jpeg_data_url(rgb: [u8; 3]) -> String {
    let image = image::RgbImage::from_pixel(8, 8, image::Rgb(rgb));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Jpeg)
        .expect("jpeg encode");
    encode_data_url("image/jpeg", bytes.get_ref())
}

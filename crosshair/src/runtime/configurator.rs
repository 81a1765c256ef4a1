//! Owns the whole pipeline: state, widgets, persistence and the render
//! surface. Work happens in turns. Each turn applies every queued change and
//! finished file read, then flushes once if anything changed.

use std::thread;
use std::time::{Duration, Instant};

use indexmap::IndexMap;

use super::events::{ControlEvent, ControlEventReceiver};
use super::persistence::Persistence;
use super::storage::Storage;
use crate::control::crosshair::{IMAGE, REQUIRED};
use crate::control::{
    ControlRegistry, ControlValue, Extraction, FileReader, PendingRead,
    ReadPoll, WidgetHandle, WidgetHost,
};
use crate::core::prelude::*;
use crate::geometry::{LayoutResult, ResolutionTable, Viewport, compute_layout};
use crate::render::{Bitmap, Renderer};
use crate::state::StateStore;

/// What the pipeline borrows from its environment
pub struct Capabilities<H, R, S: Storage> {
    pub host: H,
    pub reader: R,
    pub persistence: Persistence<S>,
    pub events: ControlEventReceiver,
    pub viewport: Viewport,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TurnReport {
    pub events: usize,
    /// Layout, render and save ran
    pub flushed: bool,
    /// A render ran, with or without a save
    pub rendered: bool,
}

pub struct Configurator<H: WidgetHost, R: FileReader, S: Storage> {
    registry: ControlRegistry,
    resolutions: ResolutionTable,
    store: StateStore,
    host: H,
    reader: R,
    persistence: Persistence<S>,
    events: ControlEventReceiver,
    viewport: Viewport,
    widgets: IndexMap<String, WidgetHandle>,
    bound: HashMap<WidgetHandle, String>,
    pending_reads: IndexMap<String, PendingRead>,
    renderer: Renderer,
    surface: Bitmap,
    layout: Option<LayoutResult>,
    render_requested: bool,
    flush_count: usize,
    render_count: usize,
}

impl<H: WidgetHost, R: FileReader, S: Storage> Configurator<H, R, S> {
    /// Restores persisted state, then creates and seeds one widget per
    /// control. The seeding writes leave the store dirty, so the first turn
    /// performs the initial flush.
    pub fn new(
        registry: ControlRegistry,
        resolutions: ResolutionTable,
        capabilities: Capabilities<H, R, S>,
    ) -> Result<Self, String> {
        registry.require(REQUIRED)?;

        let Capabilities {
            host,
            reader,
            persistence,
            events,
            viewport,
        } = capabilities;

        let mut store = StateStore::new(&registry);
        store.restore(persistence.load());

        let mut configurator = Self {
            registry,
            resolutions,
            store,
            host,
            reader,
            persistence,
            events,
            viewport,
            widgets: IndexMap::new(),
            bound: HashMap::default(),
            pending_reads: IndexMap::new(),
            renderer: Renderer::new(),
            surface: Bitmap::default(),
            layout: None,
            render_requested: false,
            flush_count: 0,
            render_count: 0,
        };

        configurator.bind_controls();

        Ok(configurator)
    }

    fn bind_controls(&mut self) {
        let mut seeds = vec![];

        for config in self.registry.iter() {
            let control = config.control();
            let handle = control.bind(&self.store, &mut self.host);
            let name = control.name().to_string();

            if control.seeds_on_bind() {
                seeds.push(handle);
            }

            self.widgets.insert(name.clone(), handle);
            self.bound.insert(handle, name);
        }

        debug!("Bound {} widgets", self.widgets.len());

        for handle in seeds {
            self.handle_change(handle);
        }
    }

    /// Reads the widget's current raw value and runs it through its
    /// control's extraction
    pub fn handle_change(&mut self, handle: WidgetHandle) {
        let Some(name) = self.bound.get(&handle).cloned() else {
            warn!("Change from unknown widget {:?}", handle);
            return;
        };

        let Some(config) = self.registry.get(&name) else {
            return;
        };

        let Some(raw) = self.host.read_value(handle) else {
            trace!("`{}` has no value to read", name);
            return;
        };

        match config.control().extract(raw) {
            Extraction::Value(value) => {
                trace!("{} = {:?}", name, value);
                self.store.set(&name, value);
            }
            Extraction::ReadFile(file) => {
                debug!("Reading {} for `{}`", file.0.display(), name);
                let read = self.reader.read_as_data_url(&file);
                // Replaces any read still in flight for this control
                self.pending_reads.insert(name, read);
                self.render_requested = true;
            }
            Extraction::Rejected(reason) => {
                warn!("Ignoring input: {}", reason);
            }
        }
    }

    fn poll_reads(&mut self) {
        let store = &mut self.store;

        self.pending_reads.retain(|name, read| match read.poll() {
            ReadPoll::Pending => true,
            ReadPoll::Ready(Ok(url)) => {
                store.set(name, ControlValue::String(url));
                false
            }
            ReadPoll::Ready(Err(err)) => {
                warn!("Failed to read file for `{}`: {}", name, err);
                false
            }
            ReadPoll::Abandoned => {
                warn!("File read for `{}` was abandoned", name);
                false
            }
        });
    }

    fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Changed(handle) => self.handle_change(handle),
            ControlEvent::Resized(viewport) => self.resize(viewport),
            ControlEvent::Reset => self.reset(),
        }
    }

    /// One turn of the loop: drain events and finished reads, then flush at
    /// most once
    pub fn run_turn(&mut self) -> TurnReport {
        let mut report = TurnReport::default();

        self.poll_reads();

        while let Ok(event) = self.events.try_recv() {
            report.events += 1;
            self.apply(event);
        }

        self.poll_reads();

        if self.store.take_dirty() {
            self.flush();
            report.flushed = true;
            report.rendered = true;
        } else if std::mem::take(&mut self.render_requested) {
            self.redraw();
            report.rendered = true;
        }

        report
    }

    /// Runs turns until no events, reads or flushes remain. Returns `false`
    /// if `timeout` elapsed first.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;

        loop {
            let report = self.run_turn();
            let busy = report.events > 0 || report.rendered;

            if !busy && self.pending_reads.is_empty() {
                return true;
            }

            if Instant::now() >= deadline {
                warn!(
                    "Still busy after {:?} with {} pending reads",
                    timeout,
                    self.pending_reads.len()
                );
                return false;
            }

            if !busy {
                thread::sleep(Duration::from_millis(1));
            }
        }
    }

    /// Applies several writes and flushes once for all of them
    pub fn batch<F>(&mut self, update: F)
    where
        F: FnOnce(&mut StateStore),
    {
        update(&mut self.store);
        if self.store.take_dirty() {
            self.flush();
        }
    }

    /// Deferred write; flushed on the next turn
    pub fn set(&mut self, name: &str, value: ControlValue) {
        self.store.set(name, value);
    }

    fn flush(&mut self) {
        self.flush_count += 1;
        self.redraw();
        self.persistence.save(&self.store);
    }

    fn redraw(&mut self) {
        self.render_requested = false;
        self.render_count += 1;

        let layout =
            compute_layout(&self.store, &self.resolutions, self.viewport);
        self.renderer.render(
            &mut self.surface,
            &layout,
            self.store.optional_string(IMAGE),
        );
        self.layout = Some(layout);
    }

    /// Relayout for a new viewport. Nothing is persisted.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.redraw();
    }

    /// Forgets persisted state and returns every control to its default
    pub fn reset(&mut self) {
        info!("Resetting to defaults");

        self.persistence.reset();
        self.store.clear();
        // Changes applied earlier in this turn must not be saved back
        self.store.take_dirty();
        self.pending_reads.clear();

        for (name, handle) in &self.widgets {
            let Some(config) = self.registry.get(name) else {
                continue;
            };
            let spec = config.control().widget_spec(self.store.get(name));
            if let Some(raw) = spec.initial_input() {
                self.host.write_value(*handle, raw);
            }
        }

        self.render_requested = true;
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    pub fn layout(&self) -> Option<&LayoutResult> {
        self.layout.as_ref()
    }

    pub fn surface(&self) -> &Bitmap {
        &self.surface
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn handle(&self, name: &str) -> Option<WidgetHandle> {
        self.widgets.get(name).copied()
    }

    pub fn has_pending_reads(&self) -> bool {
        !self.pending_reads.is_empty()
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn render_count(&self) -> usize {
        self.render_count
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

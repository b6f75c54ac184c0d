//! Main splitter: run controller driven by host tick hooks

use super::events::{EventHandler, SplitCallback, SplitEvent};
use super::input::InputHandle;
use super::state::{RunState, RunStatus};
use crate::clock::{Clock, Tick};
use crate::conditions::BoxedCompiler;
use crate::config::SplitterConfig;
use crate::display::{self, TimerView};
use crate::persistence::{BoxedStore, JsonFileStore, MemoryStore};
use crate::splits::{SchemaDocument, SplitDef, SplitEngine, SplitSchema, SplitType, TickReport};
use crate::Result;

/// Split timer driven by the host's reset/logic/draw hooks.
///
/// One instance per host; the host calls [`on_reset`](Self::on_reset),
/// [`on_logic_tick`](Self::on_logic_tick) and [`on_draw`](Self::on_draw) from
/// its own loop, never concurrently.
pub struct Splitter {
    config: SplitterConfig,
    clock: Clock,
    /// Tick shown on the timer; follows the clock only while running
    display_tick: Tick,
    state: RunState,
    schema: SplitSchema,
    compiler: BoxedCompiler,
    store: BoxedStore,
    input: InputHandle,
    events: EventHandler,
}

impl Splitter {
    /// Create a splitter and load the stored schema, if any
    pub fn new(config: SplitterConfig, compiler: BoxedCompiler, store: BoxedStore) -> Self {
        let schema = match store.load() {
            Ok(Some(document)) => match document.validate(compiler.as_ref()) {
                Ok(schema) => {
                    log::info!("Loaded stored splits '{}' ({} splits)", schema.name, schema.len());
                    schema
                }
                Err(e) => {
                    log::warn!("Ignoring stored splits: {}", e);
                    SplitSchema::empty()
                }
            },
            Ok(None) => SplitSchema::empty(),
            Err(e) => {
                log::warn!("Could not load stored splits: {}", e);
                SplitSchema::empty()
            }
        };

        Self {
            config,
            clock: Clock::new(),
            display_tick: 0,
            state: RunState::NotStarted,
            schema,
            compiler,
            store,
            input: InputHandle::new(),
            events: EventHandler::new(),
        }
    }

    /// Create a splitter whose store follows `config.store_path`
    pub fn from_config(config: SplitterConfig, compiler: BoxedCompiler) -> Self {
        let store: BoxedStore = match &config.store_path {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };
        Self::new(config, compiler, store)
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Logical clock value
    pub fn clock(&self) -> Tick {
        self.clock.now()
    }

    pub fn display_tick(&self) -> Tick {
        self.display_tick
    }

    /// Read-only view of the active schema
    pub fn schema(&self) -> &SplitSchema {
        &self.schema
    }

    pub fn splits(&self) -> &[SplitDef] {
        &self.schema.splits
    }

    /// Pollable snapshot of the run
    pub fn status(&self) -> RunStatus {
        RunStatus {
            state: self.state,
            clock: self.clock.now(),
            display_tick: self.display_tick,
            schema_name: self.schema.name.clone(),
            completed: self
                .schema
                .splits
                .iter()
                .enumerate()
                .filter(|(_, s)| s.split_type != SplitType::Fail && s.is_completed())
                .map(|(i, _)| i)
                .collect(),
            total: self.schema.len(),
        }
    }

    /// Handle for raising split/unsplit/stop requests from a key listener
    pub fn input(&self) -> InputHandle {
        self.input.clone()
    }

    /// Register a listener for split events
    pub fn on_event(&mut self, callback: SplitCallback) {
        self.events.on_event(callback);
    }

    // =========================================================================
    // Import / export
    // =========================================================================

    /// Import a JSON split document. On error the current schema is kept.
    pub fn import_json(&mut self, source: &str) -> Result<()> {
        let document = SchemaDocument::from_json(source)?;
        self.import_document(&document)
    }

    /// Import a parsed split document. On error the current schema is kept.
    pub fn import_document(&mut self, document: &SchemaDocument) -> Result<()> {
        let schema = match document.validate(self.compiler.as_ref()) {
            Ok(schema) => schema,
            Err(e) => {
                log::warn!("Rejected split import: {}", e);
                return Err(e);
            }
        };

        log::info!("Imported splits '{}' ({} splits)", schema.name, schema.len());
        self.schema = schema;
        self.persist();
        Ok(())
    }

    /// The persisted form of the active schema
    pub fn export_document(&self) -> SchemaDocument {
        self.schema.to_document()
    }

    pub fn export_json(&self) -> Result<String> {
        self.export_document().to_json_pretty()
    }

    /// Forget every personal best
    pub fn clear_personal_best(&mut self) {
        self.schema.clear_personal_best();
        log::info!("Cleared personal bests for '{}'", self.schema.name);
        self.persist();
    }

    // =========================================================================
    // Host hooks
    // =========================================================================

    /// Host reset hook. A wipe starts a new run; any other reset counts as one tick.
    pub fn on_reset(&mut self, wipe: bool) {
        if wipe {
            self.schema.clear_run();
            self.clock.reset();
            self.display_tick = 0;
            self.state = RunState::Running;
            log::info!("Run started");
            self.events.emit(SplitEvent::RunStarted);
        } else {
            self.clock.tick();
        }
    }

    /// Host logic hook: consume requests, advance the clock, evaluate splits.
    ///
    /// Returns the evaluation report when splits were evaluated this tick.
    pub fn on_logic_tick(&mut self) -> Option<TickReport> {
        let signals = self.input.take();
        if signals.unsplit {
            self.unsplit();
        }
        if signals.stop {
            self.stop();
        }

        let tick = self.clock.tick();
        if !self.state.is_running() {
            return None;
        }
        self.display_tick = tick;

        let report = SplitEngine::new(&mut self.schema).run_tick(tick, signals.split);

        for &index in &report.completed {
            self.events.emit(SplitEvent::Split {
                index,
                name: self.schema.splits[index].name.clone(),
                tick,
            });
        }

        if let Some(&index) = report.failed.first() {
            self.state = RunState::Failed;
            log::info!("Run failed at tick {} (split {})", tick, index);
            self.events.emit(SplitEvent::RunFailed { index, tick });
        } else if report.run_complete {
            self.state = RunState::StoppedComplete;
            log::info!("Run complete at tick {}", tick);
            self.events.emit(SplitEvent::RunComplete { tick });
        }

        if report.changed() {
            self.persist();
        }
        Some(report)
    }

    /// Host draw hook: the view for this frame
    pub fn on_draw(&self) -> TimerView {
        display::render(self.state, self.display_tick, &self.schema, &self.config)
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Stop a running timer. Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state = RunState::StoppedManual;
        log::info!("Run stopped at tick {}", self.display_tick);
        self.events.emit(SplitEvent::RunStopped {
            tick: self.display_tick,
        });
        true
    }

    /// Undo the latest completed manual split. Returns whether one was undone.
    pub fn unsplit(&mut self) -> bool {
        let Some(index) = self.schema.last_completed_manual() else {
            return false;
        };

        let split = &mut self.schema.splits[index];
        split.uncomplete();
        let name = split.name.clone();
        log::debug!("Unsplit manual split {}", index);

        if self.state == RunState::StoppedComplete {
            self.state = RunState::Running;
            log::info!("Run resumed after unsplit");
        }

        self.events.emit(SplitEvent::Unsplit { index, name });
        self.persist();
        true
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.schema.to_document()) {
            log::warn!("Failed to save splits: {}", e);
        }
    }
}

impl std::fmt::Debug for Splitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Splitter")
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("display_tick", &self.display_tick)
            .field("schema", &self.schema.name)
            .finish()
    }
}

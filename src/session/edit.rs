//! The edit session: selection, configuration and the debounced apply loop

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::{parse_config, ConfigValue};
use crate::error::ConfigParseError;
use crate::interaction::{InteractionRunner, TriggerOutcome};
use crate::renderer::{format_export, render, ExportOptions, Preview};
use crate::settings::StudioSettings;
use crate::stylesheet::{StylesheetAssembler, StylesheetSpec};
use crate::template::{Template, TemplateCatalog};

use super::debounce::Debouncer;
use super::SessionError;

/// Where the configuration channel stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// Nothing edited since the session started or the template changed
    Idle,
    /// An edit is waiting for its quiet period
    PendingApply,
    /// The most recent edit parsed and was applied
    Applied,
    /// The most recent edit failed to parse; the previous configuration stands
    Rejected,
}

/// Something the apply loop did
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A configuration edit was applied; the render may still have failed
    ConfigApplied { render_failed: bool },
    /// A configuration edit did not parse
    ConfigRejected(ConfigParseError),
    /// A stylesheet edit became the live override
    StylesheetApplied,
}

/// Everything derived from the current configuration
///
/// Preview, stylesheet and export are always recomputed together so that
/// the code output never diverges from the preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub preview: Preview,
    pub stylesheet: String,
    pub export: String,
}

/// Point-in-time copy of the session, published by the driver
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub selected: usize,
    pub template: String,
    pub state: EditState,
    pub config: ConfigValue,
    pub config_text: String,
    pub error: Option<ConfigParseError>,
    pub outputs: Outputs,
    pub stylesheet_text: Option<String>,
    pub applies: u64,
}

/// Owns the current template selection and configuration
#[derive(Debug)]
pub struct EditSession {
    catalog: TemplateCatalog,
    assembler: StylesheetAssembler,
    export_options: ExportOptions,

    selected: usize,
    config: ConfigValue,
    config_text: String,
    last_good_text: String,
    error: Option<ConfigParseError>,
    state: EditState,
    applies: u64,

    config_timer: Debouncer<String>,
    stylesheet_timer: Debouncer<String>,
    stylesheet_text: String,
    live_override: Option<String>,

    outputs: Outputs,
    interactions: InteractionRunner,
}

impl EditSession {
    /// Start a session on the configured start template
    pub fn new(
        catalog: TemplateCatalog,
        assembler: StylesheetAssembler,
        settings: &StudioSettings,
    ) -> Result<Self, SessionError> {
        let selected = settings.start_template;
        let template = catalog.get(selected)?;
        let config = template.fresh_config();
        let config_text = config.to_pretty_string();
        let stylesheet_text = assembler.editable_seed();

        let mut interactions = InteractionRunner::new();
        let outputs = compute_outputs(
            template,
            &config,
            &assembler,
            None,
            &settings.export,
            &mut interactions,
        );

        info!(template = template.name(), "session started");

        Ok(Self {
            catalog,
            assembler,
            export_options: settings.export.clone(),
            selected,
            last_good_text: config_text.clone(),
            config,
            config_text,
            error: None,
            state: EditState::Idle,
            applies: 0,
            config_timer: Debouncer::new(settings.config_debounce),
            stylesheet_timer: Debouncer::new(settings.stylesheet_debounce),
            stylesheet_text,
            live_override: None,
            outputs,
            interactions,
        })
    }

    /// Record a raw configuration edit and restart the quiet period
    pub fn edit_config(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.config_text = text.clone();
        if self.config_timer.push(text, now) {
            debug!("superseded pending configuration edit");
        }
        self.state = EditState::PendingApply;
    }

    /// Record a raw stylesheet edit; only editable stylesheets accept edits
    pub fn edit_stylesheet(
        &mut self,
        text: impl Into<String>,
        now: Instant,
    ) -> Result<(), SessionError> {
        let template = self.template();
        if !template.stylesheet().is_editable() {
            return Err(SessionError::StylesheetNotEditable {
                template: template.name().to_string(),
            });
        }
        let text = text.into();
        self.stylesheet_text = text.clone();
        self.stylesheet_timer.push(text, now);
        Ok(())
    }

    /// Fire every timer whose deadline has passed
    pub fn poll(&mut self, now: Instant) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some(css) = self.stylesheet_timer.fire(now) {
            events.push(self.apply_stylesheet(css));
        }
        if let Some(text) = self.config_timer.fire(now) {
            events.push(self.apply_config(text));
        }
        self.interactions.advance(now);
        events
    }

    /// Apply pending edits immediately, without waiting for their quiet period
    pub fn flush(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if let Some(css) = self.stylesheet_timer.flush() {
            events.push(self.apply_stylesheet(css));
        }
        if let Some(text) = self.config_timer.flush() {
            events.push(self.apply_config(text));
        }
        events
    }

    /// Switch to another template, discarding any pending configuration edit
    pub fn select_template(&mut self, index: usize) -> Result<(), SessionError> {
        let template = self.catalog.get(index)?;
        let config = template.fresh_config();
        info!(template = template.name(), index, "template selected");

        if self.config_timer.cancel() {
            debug!("discarded pending configuration edit");
        }
        self.selected = index;
        self.config_text = config.to_pretty_string();
        self.last_good_text = self.config_text.clone();
        self.config = config;
        self.error = None;
        self.state = EditState::Idle;
        self.refresh();
        Ok(())
    }

    /// Forward a trigger event to the mounted interactions
    pub fn trigger(&mut self, element_id: &str, now: Instant) -> TriggerOutcome {
        self.interactions.trigger(element_id, now)
    }

    /// Earliest instant at which [`poll`](Self::poll) has work to do
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.config_timer.deadline(),
            self.stylesheet_timer.deadline(),
            self.interactions.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn apply_config(&mut self, text: String) -> SessionEvent {
        match parse_config(&text) {
            Ok(config) => {
                self.config = config;
                self.last_good_text = text;
                self.error = None;
                self.state = EditState::Applied;
                self.applies += 1;
                self.refresh();
                let render_failed = self.outputs.preview.is_failed();
                info!(
                    template = self.template().name(),
                    render_failed, "configuration applied"
                );
                SessionEvent::ConfigApplied { render_failed }
            }
            Err(err) => {
                debug!(error = %err, "configuration rejected");
                self.error = Some(err.clone());
                self.state = EditState::Rejected;
                SessionEvent::ConfigRejected(err)
            }
        }
    }

    fn apply_stylesheet(&mut self, css: String) -> SessionEvent {
        self.live_override = Some(css);
        let template = self.template();
        let stylesheet = self
            .assembler
            .assemble(template.stylesheet(), self.live_override.as_deref());
        self.outputs.export = format_export(
            &self.outputs.preview.code_markup(),
            &stylesheet,
            &self.export_options,
        );
        self.outputs.stylesheet = stylesheet;
        debug!("stylesheet override applied");
        SessionEvent::StylesheetApplied
    }

    fn refresh(&mut self) {
        let template = match self.catalog.get(self.selected) {
            Ok(template) => template,
            Err(_) => return,
        };
        self.outputs = compute_outputs(
            template,
            &self.config,
            &self.assembler,
            self.live_override.as_deref(),
            &self.export_options,
            &mut self.interactions,
        );
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected template
    pub fn template(&self) -> &Template {
        self.catalog
            .get(self.selected)
            .expect("selected index is validated before it is stored")
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// The configuration the outputs were rendered from
    pub fn config(&self) -> &ConfigValue {
        &self.config
    }

    /// Text of the configuration surface, including unapplied edits
    pub fn config_text(&self) -> &str {
        &self.config_text
    }

    /// Text of the last configuration that parsed
    pub fn last_good_config_text(&self) -> &str {
        &self.last_good_text
    }

    /// Parse error of the most recent edit, if it was rejected
    pub fn error(&self) -> Option<&ConfigParseError> {
        self.error.as_ref()
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Text of the stylesheet surface, present only for editable stylesheets
    pub fn stylesheet_text(&self) -> Option<&str> {
        match self.template().stylesheet() {
            StylesheetSpec::EditableOverride => Some(&self.stylesheet_text),
            _ => None,
        }
    }

    pub fn interactions(&self) -> &InteractionRunner {
        &self.interactions
    }

    /// Number of configuration edits applied so far
    pub fn apply_count(&self) -> u64 {
        self.applies
    }

    /// Export payload of the current outputs with different options
    pub fn export_with(&self, options: &ExportOptions) -> String {
        format_export(
            &self.outputs.preview.code_markup(),
            &self.outputs.stylesheet,
            options,
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selected: self.selected,
            template: self.template().name().to_string(),
            state: self.state,
            config: self.config.clone(),
            config_text: self.config_text.clone(),
            error: self.error.clone(),
            outputs: self.outputs.clone(),
            stylesheet_text: self.stylesheet_text().map(str::to_string),
            applies: self.applies,
        }
    }
}

fn compute_outputs(
    template: &Template,
    config: &ConfigValue,
    assembler: &StylesheetAssembler,
    live_override: Option<&str>,
    options: &ExportOptions,
    interactions: &mut InteractionRunner,
) -> Outputs {
    let preview = Preview::from_result(render(template, config));
    match &preview {
        Preview::Markup(_) => interactions.mount(template.interactions()),
        Preview::Failed(_) => interactions.unmount(),
    }
    let stylesheet = assembler.assemble(template.stylesheet(), live_override);
    let export = format_export(&preview.code_markup(), &stylesheet, options);
    Outputs {
        preview,
        stylesheet,
        export,
    }
}

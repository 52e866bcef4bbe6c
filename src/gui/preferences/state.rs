//! Preferences view-model
//!
//! Holds the two tool path fields and the inline validation message. All the
//! behavior lives here so it can be tested without a window.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::resolver::{PathResolver, ResolutionTask, ResolveSource, ToolPathEntry};
use crate::settings::{self, SettingsError, SharedSettings, COCOS_PATH_KEY};
use crate::tool::{engine_root, Tool};

/// One editable tool path
#[derive(Debug, Clone)]
pub struct ToolField {
    pub tool: Tool,
    /// Directory that should contain the executable
    pub text: String,
    /// Where the auto-detected value came from, if it was detected
    pub source: Option<ResolveSource>,
    /// Set once the user types or browses; resolution no longer overwrites it
    edited: bool,
}

impl ToolField {
    fn new(tool: Tool, text: String) -> Self {
        let source = (!text.is_empty()).then_some(ResolveSource::Stored);
        Self {
            tool,
            text,
            source,
            edited: false,
        }
    }

    /// `<text>/<tool>` exists
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && self.tool.executable_in(Path::new(&self.text)).exists()
    }
}

/// State of an open preferences dialog
pub struct PreferencesState {
    cocos: ToolField,
    sdkbox: ToolField,
    error_label: Option<String>,
    resolution: Option<ResolutionTask>,
}

impl PreferencesState {
    /// Fields filled from stored settings only
    pub fn from_settings(settings: &SharedSettings) -> Self {
        let store = settings::lock(settings);
        let text = |tool: Tool| store.value(tool.settings_key()).unwrap_or_default();
        Self {
            cocos: ToolField::new(Tool::Cocos, text(Tool::Cocos)),
            sdkbox: ToolField::new(Tool::Sdkbox, text(Tool::Sdkbox)),
            error_label: None,
            resolution: None,
        }
    }

    /// True until every tool has a stored entry. An accepted empty value
    /// counts as configured, so a missing optional tool does not reopen the
    /// dialog on each launch.
    pub fn needs_setup(settings: &SharedSettings) -> bool {
        let store = settings::lock(settings);
        Tool::ALL
            .iter()
            .any(|tool| store.value(tool.settings_key()).is_none())
    }

    /// Open the dialog: stored values show immediately, empty fields are
    /// resolved in the background
    pub fn open(settings: &SharedSettings, resolver: Arc<PathResolver>, handle: &Handle) -> Self {
        let mut state = Self::from_settings(settings);
        state.start_resolution(handle, resolver);
        state
    }

    /// Tools whose field is still empty and untouched
    pub fn unresolved_tools(&self) -> Vec<Tool> {
        Tool::ALL
            .into_iter()
            .filter(|tool| {
                let field = self.field(*tool);
                field.text.is_empty() && !field.edited
            })
            .collect()
    }

    pub fn start_resolution(&mut self, handle: &Handle, resolver: Arc<PathResolver>) {
        let tools = self.unresolved_tools();
        if tools.is_empty() {
            return;
        }
        debug!("[cocos-gui] Resolving {:?} in the background", tools);
        self.resolution = Some(ResolutionTask::spawn(handle, resolver, tools));
    }

    /// Apply finished background results. Returns true if anything arrived.
    pub fn poll_resolution(&mut self) -> bool {
        let Some(task) = self.resolution.as_mut() else {
            return false;
        };
        let entries = task.poll();
        if task.is_finished() {
            self.resolution = None;
        }
        let arrived = !entries.is_empty();
        for entry in entries {
            self.apply_resolved(entry);
        }
        arrived
    }

    pub fn is_resolving(&self) -> bool {
        self.resolution.is_some()
    }

    /// Fill a field from the resolver unless the user already changed it
    pub fn apply_resolved(&mut self, entry: ToolPathEntry) {
        let field = self.field_mut(entry.tool);
        if field.edited {
            debug!("[cocos-gui] Keeping user value for {}", entry.tool);
            return;
        }
        field.text = entry.display_path();
        field.source = entry.source;
    }

    pub fn field(&self, tool: Tool) -> &ToolField {
        match tool {
            Tool::Cocos => &self.cocos,
            Tool::Sdkbox => &self.sdkbox,
        }
    }

    pub fn field_mut(&mut self, tool: Tool) -> &mut ToolField {
        match tool {
            Tool::Cocos => &mut self.cocos,
            Tool::Sdkbox => &mut self.sdkbox,
        }
    }

    /// The user typed into a field
    pub fn set_text(&mut self, tool: Tool, text: impl Into<String>) {
        let field = self.field_mut(tool);
        field.text = text.into();
        self.mark_edited(tool);
    }

    pub fn mark_edited(&mut self, tool: Tool) {
        let field = self.field_mut(tool);
        field.edited = true;
        field.source = None;
    }

    /// Result of the directory chooser. `None` (dialog cancelled) keeps the
    /// current value; a chosen directory is taken as-is.
    pub fn browse_selected(&mut self, tool: Tool, selected: Option<PathBuf>) {
        if let Some(dir) = selected {
            self.set_text(tool, dir.display().to_string());
        }
    }

    /// The user finished editing a field: update the inline advisory
    pub fn finish_editing(&mut self, tool: Tool) {
        if self.field(tool).is_valid() {
            self.error_label = None;
        } else {
            self.error_label = Some(format!("Invalid path. '{}' not found", tool.executable()));
        }
    }

    /// Inline advisory for the last edited field
    pub fn error_label(&self) -> Option<&str> {
        self.error_label.as_deref()
    }

    /// Persist both fields verbatim, valid or not
    pub fn accept(&mut self, settings: &SharedSettings) -> Result<(), SettingsError> {
        self.stop_resolution();

        let mut store = settings::lock(settings);
        for tool in Tool::ALL {
            store.set_value(tool.settings_key(), &self.field(tool).text);
        }
        if let Some(root) = engine_root(Path::new(&self.cocos.text)) {
            store.set_value(COCOS_PATH_KEY, &root.display().to_string());
        }
        store.sync()?;

        info!(
            "[cocos-gui] Saved preferences: cocos='{}' sdkbox='{}'",
            self.cocos.text, self.sdkbox.text
        );
        Ok(())
    }

    /// Close without saving
    pub fn cancel(&mut self) {
        self.stop_resolution();
    }

    fn stop_resolution(&mut self) {
        if let Some(mut task) = self.resolution.take() {
            task.cancel();
        }
    }
}

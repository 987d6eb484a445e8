use std::collections::BTreeMap;

use crate::affinity::{ThreadGuard, ThreadRole};
use crate::error::{ParamError, Result};
use crate::font::FontDescription;
use crate::param::WindowKind;

const BUFFER_MANAGER: &str = "buffer manager";

/// A resolved source-view colour scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleScheme {
    pub id: String,
    pub name: String,
}

/// Toolkit registry of installed style schemes.
pub trait SchemeRegistry {
    fn scheme_ids(&self) -> Vec<String>;

    fn scheme(&self, id: &str) -> Option<StyleScheme>;
}

/// Owner of the open source views; re-themes them on request.
pub trait BufferManager {
    fn change_theme(&mut self, scheme: &StyleScheme);
}

/// Window-level UI state shared by every GUI window.
pub trait UiState {
    fn set_font(&mut self, font: &FontDescription, raw: &str);

    /// Re-render the titles of open windows of `kind`.
    fn retitle(&mut self, _kind: WindowKind, _template: &str) {}
}

/// GUI-side copy of the current settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuiSnapshot {
    pub theme: String,
    pub font: String,
    pub titles: BTreeMap<WindowKind, String>,
}

/// Result of applying a committed value on the GUI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Applied,
    /// The collaborator is missing; the effect runs once it is installed.
    Deferred(&'static str),
    /// The value could not be resolved to live state.
    Skipped,
}

/// Everything the GUI thread owns on behalf of the settings subsystem.
pub struct GuiContext {
    guard: ThreadGuard,
    schemes: Box<dyn SchemeRegistry>,
    ui: Box<dyn UiState>,
    buffer_manager: Option<Box<dyn BufferManager>>,
    theme_change_pending: bool,
    snapshot: GuiSnapshot,
}

impl GuiContext {
    pub fn new(
        guard: ThreadGuard,
        schemes: Box<dyn SchemeRegistry>,
        ui: Box<dyn UiState>,
    ) -> Self {
        Self {
            guard,
            schemes,
            ui,
            buffer_manager: None,
            theme_change_pending: false,
            snapshot: GuiSnapshot::default(),
        }
    }

    pub fn guard(&self) -> &ThreadGuard {
        &self.guard
    }

    /// Install the buffer manager. Only one may ever be installed.
    ///
    /// A re-theme requested before installation is applied right away.
    pub fn install_buffer_manager(
        &mut self,
        manager: Box<dyn BufferManager>,
    ) -> Result<()> {
        self.guard.ensure(ThreadRole::Gui)?;
        if self.buffer_manager.is_some() {
            return Err(ParamError::DependencyAlreadySet(BUFFER_MANAGER));
        }

        self.buffer_manager = Some(manager);
        log::debug!("buffer manager installed");

        if self.theme_change_pending {
            self.theme_change_pending = false;
            self.retheme();
        }
        Ok(())
    }

    pub fn has_buffer_manager(&self) -> bool {
        self.buffer_manager.is_some()
    }

    /// Whether a theme change is waiting for the buffer manager.
    pub fn theme_change_pending(&self) -> bool {
        self.theme_change_pending
    }

    /// Sorted, de-duplicated ids of the installed schemes.
    pub fn scheme_ids(&self) -> Result<Vec<String>> {
        self.guard.ensure(ThreadRole::Gui)?;
        let mut ids = self.schemes.scheme_ids();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    /// Resolve the current theme id to a live scheme.
    pub fn current_scheme(&self) -> Result<Option<StyleScheme>> {
        self.guard.ensure(ThreadRole::Gui)?;
        Ok(self.schemes.scheme(&self.snapshot.theme))
    }

    /// Parse the current font string.
    pub fn current_font(&self) -> Result<FontDescription> {
        self.guard.ensure(ThreadRole::Gui)?;
        Ok(FontDescription::parse(&self.snapshot.font))
    }

    /// The GUI thread's copy of the title template for `kind`.
    pub fn title_template(&self, kind: WindowKind) -> Result<Option<&str>> {
        self.guard.ensure(ThreadRole::Gui)?;
        Ok(self.snapshot.titles.get(&kind).map(String::as_str))
    }

    pub fn snapshot(&self) -> &GuiSnapshot {
        &self.snapshot
    }

    pub(crate) fn publish(&mut self, snapshot: GuiSnapshot) {
        log::debug!("gui received settings snapshot");
        self.snapshot = snapshot;
    }

    pub(crate) fn apply_theme(&mut self, id: String) -> CommitOutcome {
        self.snapshot.theme = id;
        if self.buffer_manager.is_none() {
            self.theme_change_pending = true;
            log::warn!(
                "theme change deferred: {}",
                ParamError::UninitializedDependency(BUFFER_MANAGER)
            );
            return CommitOutcome::Deferred(BUFFER_MANAGER);
        }
        self.retheme()
    }

    pub(crate) fn apply_font(&mut self, raw: String) -> CommitOutcome {
        let font = FontDescription::parse(&raw);
        self.ui.set_font(&font, &raw);
        self.snapshot.font = raw;
        CommitOutcome::Applied
    }

    pub(crate) fn apply_title(
        &mut self,
        kind: WindowKind,
        template: String,
    ) -> CommitOutcome {
        self.ui.retitle(kind, &template);
        self.snapshot.titles.insert(kind, template);
        CommitOutcome::Applied
    }

    fn retheme(&mut self) -> CommitOutcome {
        let Some(scheme) = self.schemes.scheme(&self.snapshot.theme) else {
            log::warn!(
                "theme \"{}\" is not installed, views keep their scheme",
                self.snapshot.theme
            );
            return CommitOutcome::Skipped;
        };
        let Some(manager) = self.buffer_manager.as_mut() else {
            return CommitOutcome::Deferred(BUFFER_MANAGER);
        };
        manager.change_theme(&scheme);
        CommitOutcome::Applied
    }
}

impl std::fmt::Debug for GuiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuiContext")
            .field("has_buffer_manager", &self.buffer_manager.is_some())
            .field("theme_change_pending", &self.theme_change_pending)
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

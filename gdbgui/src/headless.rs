//! Log-only stand-ins for the toolkit collaborators.

use gdbgui_params::{
    BufferManager, FontDescription, GuiContext, SchemeRegistry, StyleScheme,
    ThreadGuard, UiState, WindowKind,
};

const SCHEMES: [(&str, &str); 7] = [
    ("classic", "Classic"),
    ("cobalt", "Cobalt"),
    ("kate", "Kate"),
    ("oblivion", "Oblivion"),
    ("solarized-dark", "Solarized Dark"),
    ("solarized-light", "Solarized Light"),
    ("tango", "Tango"),
];

pub(crate) struct HeadlessSchemes;

impl SchemeRegistry for HeadlessSchemes {
    fn scheme_ids(&self) -> Vec<String> {
        SCHEMES.iter().map(|(id, _)| id.to_string()).collect()
    }

    fn scheme(&self, id: &str) -> Option<StyleScheme> {
        SCHEMES
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(id, name)| StyleScheme {
                id: id.to_string(),
                name: name.to_string(),
            })
    }
}

pub(crate) struct HeadlessUi;

impl UiState for HeadlessUi {
    fn set_font(&mut self, font: &FontDescription, raw: &str) {
        log::info!("ui font set to \"{raw}\" ({font})");
    }

    fn retitle(&mut self, kind: WindowKind, template: &str) {
        log::info!("{kind} windows retitled with \"{template}\"");
    }
}

pub(crate) struct HeadlessBuffers;

impl BufferManager for HeadlessBuffers {
    fn change_theme(&mut self, scheme: &StyleScheme) {
        log::info!("source views switched to {} ({})", scheme.name, scheme.id);
    }
}

/// GUI context backed by the headless collaborators. Build it on the GUI
/// thread.
pub(crate) fn context(guard: ThreadGuard) -> GuiContext {
    GuiContext::new(guard, Box::new(HeadlessSchemes), Box::new(HeadlessUi))
}

use std::collections::BTreeSet;
use std::time::Duration;

use crate::affinity::{Affine, ThreadGuard, ThreadRole};
use crate::command::{CommandTree, Resolved};
use crate::dispatch::{GuiHandle, Pending};
use crate::error::{ParamError, Result};
use crate::font::FontDescription;
use crate::gui::{CommitOutcome, GuiContext, GuiSnapshot, StyleScheme};
use crate::param::{ParamKey, ParamKind, Parameter, WindowKind};
use crate::store::KeyValueStore;

pub const DEFAULT_THEME: &str = "classic";
pub const DEFAULT_FONT: &str = "monospace";

/// Live state derived from a parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Scheme(Option<StyleScheme>),
    Font(FontDescription),
    Text(String),
}

/// Ask the GUI thread for the installed scheme ids, waiting at most
/// `timeout`. Call from the interpreter thread before building the
/// registry.
pub fn request_theme_ids(
    gui: &GuiHandle,
    timeout: Duration,
) -> Result<Vec<String>> {
    gui.guard().ensure(ThreadRole::Interpreter)?;
    gui.run_on_gui(|ctx| ctx.scheme_ids())?.wait_timeout(timeout)?
}

/// Owner of every GUI parameter and of the `set gui` / `show gui` commands.
///
/// Lives on the interpreter thread, which is the only writer of values and
/// storage. GUI-side effects are posted through the [`GuiHandle`].
pub struct SettingsRegistry {
    guard: ThreadGuard,
    gui: GuiHandle,
    store: Box<dyn KeyValueStore>,
    theme: Parameter,
    font: Parameter,
    /// Indexed by [`WindowKind::index`].
    titles: [Parameter; 3],
    commands: CommandTree,
}

impl SettingsRegistry {
    /// Build every parameter from `store` and register its commands.
    ///
    /// `theme_ids` is the frozen theme domain; the initial values are
    /// published to the GUI thread once construction succeeds.
    pub fn new(
        gui: GuiHandle,
        store: Box<dyn KeyValueStore>,
        theme_ids: Vec<String>,
    ) -> Result<Self> {
        let guard = gui.guard().clone();
        guard.ensure(ThreadRole::Interpreter)?;

        let domain: BTreeSet<String> = theme_ids.into_iter().collect();
        let Some(first) = domain.first().cloned() else {
            return Err(ParamError::EmptyDomain(ParamKey::Theme.to_string()));
        };
        let theme_default = if domain.contains(DEFAULT_THEME) {
            DEFAULT_THEME.to_string()
        } else {
            first
        };

        let theme = Parameter::load(
            ParamKey::Theme,
            ParamKind::Enumerated(domain),
            theme_default,
            store.as_ref(),
        )?;
        let font = Parameter::load(
            ParamKey::Font,
            ParamKind::Freeform,
            DEFAULT_FONT.to_string(),
            store.as_ref(),
        )?;

        let [source, display, log] = WindowKind::ALL.map(|kind| {
            Parameter::load(
                ParamKey::Title(kind),
                ParamKind::Freeform,
                kind.default_template().to_string(),
                store.as_ref(),
            )
        });
        let titles = [source?, display?, log?];

        let mut commands = CommandTree::new();
        for key in ParamKey::ALL {
            commands.attach(key)?;
        }

        let registry = Self {
            guard,
            gui,
            store,
            theme,
            font,
            titles,
            commands,
        };
        registry.publish_snapshot();
        Ok(registry)
    }

    /// Run one `set gui ...` / `show gui ...` command line.
    ///
    /// Setters answer with an empty string; getters with their show string.
    pub fn execute(&mut self, line: &str) -> Result<String> {
        self.guard.ensure(ThreadRole::Interpreter)?;

        match self.commands.resolve(line)? {
            Resolved::Empty => Ok(String::new()),
            Resolved::Set { key, argument } => {
                self.set(key, &argument)?;
                Ok(String::new())
            },
            Resolved::Show(key) => self.show(key),
            Resolved::ShowAll(entries) => {
                let lines = entries
                    .into_iter()
                    .map(|(label, key)| {
                        self.show(key).map(|text| format!("{label}:  {text}"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(lines.join("\n"))
            },
        }
    }

    /// Validate, persist, assign and commit a new value.
    ///
    /// Nothing changes unless validation and the store write both succeed.
    /// The returned handle resolves once the GUI thread applied the value;
    /// dropping it does not cancel anything.
    pub fn set(
        &mut self,
        key: ParamKey,
        input: &str,
    ) -> Result<Pending<CommitOutcome>> {
        self.guard.ensure(ThreadRole::Interpreter)?;

        let value = self.param(key).validate(input)?;
        self.store.set(&key.storage_key(), &value)?;
        self.param_mut(key).assign(value.clone());
        log::info!("gui {key} set to \"{value}\"");

        Ok(self.commit(key, value))
    }

    /// Human-readable description of the current value.
    pub fn show(&self, key: ParamKey) -> Result<String> {
        self.guard.ensure(ThreadRole::Interpreter)?;
        Ok(self.param(key).show_string())
    }

    /// Derive live state from the current value on the parameter's display
    /// thread.
    pub fn render(&self, key: ParamKey) -> Result<Pending<Result<Rendered>>> {
        match key.display_affinity() {
            ThreadRole::Interpreter => {
                self.guard.ensure(ThreadRole::Interpreter)?;
                let text = self.param(key).value().to_string();
                Ok(Pending::ready(Ok(Rendered::Text(text))))
            },
            ThreadRole::Gui => {
                let job = Affine::new(
                    ThreadRole::Gui,
                    self.guard.clone(),
                    move |ctx: &mut GuiContext| render_on_gui(ctx, key),
                );
                self.gui.post(job)
            },
        }
    }

    pub fn param(&self, key: ParamKey) -> &Parameter {
        match key {
            ParamKey::Theme => &self.theme,
            ParamKey::Font => &self.font,
            ParamKey::Title(kind) => &self.titles[kind.index()],
        }
    }

    /// Title parameters paired with the window kind they format, in
    /// [`WindowKind::ALL`] order.
    pub fn titles(&self) -> impl Iterator<Item = (WindowKind, &Parameter)> {
        WindowKind::ALL.into_iter().zip(self.titles.iter())
    }

    pub fn title(&self, kind: WindowKind) -> &Parameter {
        self.param(ParamKey::Title(kind))
    }

    /// Raw title template for `kind`, for window-title formatting.
    pub fn title_template(&self, kind: WindowKind) -> Result<&str> {
        let title = self.title(kind);
        self.guard.ensure(title.display_affinity())?;
        Ok(title.value())
    }

    pub fn gui(&self) -> &GuiHandle {
        &self.gui
    }

    fn param_mut(&mut self, key: ParamKey) -> &mut Parameter {
        match key {
            ParamKey::Theme => &mut self.theme,
            ParamKey::Font => &mut self.font,
            ParamKey::Title(kind) => &mut self.titles[kind.index()],
        }
    }

    fn commit(&self, key: ParamKey, value: String) -> Pending<CommitOutcome> {
        let job = Affine::new(
            key.commit_affinity(),
            self.guard.clone(),
            move |ctx: &mut GuiContext| match key {
                ParamKey::Theme => ctx.apply_theme(value),
                ParamKey::Font => ctx.apply_font(value),
                ParamKey::Title(kind) => ctx.apply_title(kind, value),
            },
        );

        match self.gui.post(job) {
            Ok(pending) => pending,
            Err(err) => {
                log::warn!("gui {key} was saved but not applied: {err}");
                Pending::failed(err)
            },
        }
    }

    fn publish_snapshot(&self) {
        let snapshot = GuiSnapshot {
            theme: self.theme.value().to_string(),
            font: self.font.value().to_string(),
            titles: self
                .titles()
                .map(|(kind, title)| (kind, title.value().to_string()))
                .collect(),
        };

        if let Err(err) = self.gui.run_on_gui(move |ctx| ctx.publish(snapshot))
        {
            log::warn!("initial gui settings were not published: {err}");
        }
    }
}

impl std::fmt::Debug for SettingsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsRegistry")
            .field("theme", &self.theme)
            .field("font", &self.font)
            .field("titles", &self.titles)
            .finish()
    }
}

fn render_on_gui(ctx: &GuiContext, key: ParamKey) -> Result<Rendered> {
    match key {
        ParamKey::Theme => ctx.current_scheme().map(Rendered::Scheme),
        ParamKey::Font => ctx.current_font().map(Rendered::Font),
        ParamKey::Title(kind) => ctx
            .title_template(kind)
            .map(|template| {
                Rendered::Text(template.unwrap_or_default().to_string())
            }),
    }
}

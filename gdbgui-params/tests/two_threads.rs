use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use gdbgui_params::{
    BufferManager, ChannelConfig, CommitOutcome, FileStore, FontDescription,
    GuiContext, GuiHandle, KeyValueStore, MemoryStore, ParamError, ParamKey,
    SchemeRegistry, SettingsRegistry, StoreLoadStatus, StyleScheme,
    ThreadGuard, ThreadRole, UiState, WindowKind, gui_channel,
    request_theme_ids,
};

const WAIT: Duration = Duration::from_secs(5);

struct Schemes;

impl SchemeRegistry for Schemes {
    fn scheme_ids(&self) -> Vec<String> {
        ["tango", "classic", "oblivion", "classic"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn scheme(&self, id: &str) -> Option<StyleScheme> {
        self.scheme_ids().contains(&id.to_string()).then(|| StyleScheme {
            id: id.to_string(),
            name: format!("{id} scheme"),
        })
    }
}

#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn entries(&self) -> Vec<String> {
        self.0.lock().expect("journal lock").clone()
    }

    fn record(&self, entry: String) {
        self.0.lock().expect("journal lock").push(entry);
    }
}

impl UiState for Journal {
    fn set_font(&mut self, font: &FontDescription, _raw: &str) {
        self.record(format!("font {}", font.family().unwrap_or("?")));
    }

    fn retitle(&mut self, kind: WindowKind, template: &str) {
        self.record(format!("retitle {kind}: {template}"));
    }
}

impl BufferManager for Journal {
    fn change_theme(&mut self, scheme: &StyleScheme) {
        self.record(format!("retheme {}", scheme.name));
    }
}

fn test_temp_dir(test_name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "gdbgui-session-{test_name}-{stamp}-{}",
        std::process::id()
    ));

    fs::create_dir_all(&dir).expect("temporary directory should be created");
    dir
}

fn open_file_store(path: &Path) -> (FileStore, StoreLoadStatus) {
    FileStore::open(path)
        .expect("settings file should open")
        .into_parts()
}

fn title_for(kind: WindowKind) -> String {
    format!("[{kind}] \\W{{number}}")
}

struct Session {
    gui: GuiHandle,
    journal: Journal,
    gui_thread: JoinHandle<gdbgui_params::Result<()>>,
}

impl Session {
    /// Start a GUI thread; the buffer manager is installed only when
    /// `with_buffer_manager` is set.
    fn start(with_buffer_manager: bool) -> Self {
        let guard = ThreadGuard::new();
        guard.bind(ThreadRole::Interpreter).expect("bind interpreter");
        let (gui, queue) = gui_channel(guard.clone(), &ChannelConfig::default());
        let journal = Journal::default();
        let gui_journal = journal.clone();

        let gui_thread = thread::Builder::new()
            .name(String::from("gui"))
            .spawn(move || -> gdbgui_params::Result<()> {
                let mut ctx = GuiContext::new(
                    guard,
                    Box::new(Schemes),
                    Box::new(gui_journal.clone()),
                );
                ctx.guard().bind(ThreadRole::Gui)?;
                if with_buffer_manager {
                    ctx.install_buffer_manager(Box::new(gui_journal))?;
                }
                queue.run(ctx)
            })
            .expect("spawn gui thread");

        Self {
            gui,
            journal,
            gui_thread,
        }
    }

    fn registry(&self, store: impl KeyValueStore + 'static) -> SettingsRegistry {
        let ids = request_theme_ids(&self.gui, WAIT).expect("theme ids");
        SettingsRegistry::new(self.gui.clone(), Box::new(store), ids)
            .expect("registry should build")
    }

    fn finish(self) -> Vec<String> {
        self.gui.shutdown().expect("queue shutdown");
        self.gui_thread
            .join()
            .expect("gui thread should not panic")
            .expect("gui loop should stop cleanly");
        self.journal.entries()
    }
}

#[test]
fn given_new_font_when_set_then_shown_persisted_and_applied() {
    let session = Session::start(true);
    let store = MemoryStore::new();
    let mut registry = session.registry(store.clone());

    assert_eq!(
        registry.execute("show gui font").expect("show"),
        "The current font is: monospace"
    );

    registry
        .set(ParamKey::Font, "Courier-10")
        .expect("set font")
        .wait_timeout(WAIT)
        .expect("commit should run");

    assert_eq!(
        registry.execute("show gui font").expect("show"),
        "The current font is: Courier-10"
    );
    assert_eq!(store.get("font").expect("get").as_deref(), Some("Courier-10"));
    assert_eq!(session.finish(), vec!["font Courier-10"]);
}

#[test]
fn given_saved_title_when_restarted_then_restored_from_store() {
    let store = MemoryStore::new();

    let first = Session::start(true);
    let mut registry = first.registry(store.clone());
    registry
        .execute(r#"set gui title source "\W{basename}""#)
        .expect("set title");
    drop(registry);
    first.finish();

    let second = Session::start(true);
    let registry = second.registry(store.clone());

    assert_eq!(
        registry
            .title_template(WindowKind::Source)
            .expect("interpreter thread"),
        r"\W{basename}"
    );
    assert_eq!(
        registry.title(WindowKind::Display).value(),
        WindowKind::Display.default_template()
    );
    second.finish();
}

#[test]
fn given_every_value_set_when_restarted_then_file_store_restores_them() {
    let dir = test_temp_dir("restart");
    let path = dir.join("settings.json");

    let first = Session::start(true);
    let (store, status) = open_file_store(&path);
    assert_eq!(status, StoreLoadStatus::Missing);
    let mut registry = first.registry(store);
    registry.execute("set gui theme obl").expect("set theme");
    registry
        .execute("set gui font Fira Code Bold 12")
        .expect("set font");
    for kind in WindowKind::ALL {
        registry
            .set(ParamKey::Title(kind), &title_for(kind))
            .expect("set title");
    }
    drop(registry);
    first.finish();

    let second = Session::start(true);
    let (store, status) = open_file_store(&path);
    assert_eq!(status, StoreLoadStatus::Loaded);
    let registry = second.registry(store);

    assert_eq!(registry.param(ParamKey::Theme).value(), "oblivion");
    assert_eq!(
        registry.show(ParamKey::Font).expect("show font"),
        "The current font is: Fira Code Bold 12"
    );
    let restored = registry
        .titles()
        .map(|(kind, title)| (kind, title.value().to_string()))
        .collect::<Vec<_>>();
    assert_eq!(
        restored,
        WindowKind::ALL
            .into_iter()
            .map(|kind| (kind, title_for(kind)))
            .collect::<Vec<_>>()
    );

    drop(registry);
    second.finish();
    fs::remove_dir_all(&dir).expect("temporary directory should be removed");
}

#[test]
fn given_unknown_theme_when_set_then_nothing_changes() {
    let session = Session::start(true);
    let store = MemoryStore::new();
    let mut registry = session.registry(store.clone());

    let err = registry
        .execute("set gui theme not-a-real-theme")
        .expect_err("unknown theme");

    assert!(matches!(err, ParamError::Validation { .. }));
    assert!(store.entries().is_empty());
    assert_eq!(registry.param(ParamKey::Theme).value(), "classic");
    assert!(session.finish().is_empty());
}

#[test]
fn given_same_theme_twice_when_set_then_store_and_views_agree() {
    let session = Session::start(true);
    let store = MemoryStore::new();
    let mut registry = session.registry(store.clone());

    let outcomes = (0..2)
        .map(|_| {
            registry
                .set(ParamKey::Theme, "oblivion")
                .expect("set theme")
                .wait_timeout(WAIT)
                .expect("commit should run")
        })
        .collect::<Vec<_>>();

    assert_eq!(outcomes, vec![CommitOutcome::Applied; 2]);
    assert_eq!(store.get("theme").expect("get").as_deref(), Some("oblivion"));
    assert_eq!(
        session.finish(),
        vec!["retheme oblivion scheme", "retheme oblivion scheme"]
    );
}

#[test]
fn given_no_buffer_manager_when_theme_set_then_commit_deferred() {
    let session = Session::start(false);
    let store = MemoryStore::new();
    let mut registry = session.registry(store.clone());

    let outcome = registry
        .set(ParamKey::Theme, "tango")
        .expect("set theme")
        .wait_timeout(WAIT)
        .expect("commit should run");

    assert_eq!(outcome, CommitOutcome::Deferred("buffer manager"));
    assert_eq!(store.get("theme").expect("get").as_deref(), Some("tango"));
    assert!(session.finish().is_empty());
}

#[test]
fn given_registry_moved_to_other_thread_when_used_then_rejected() {
    let session = Session::start(true);
    let mut registry = session.registry(MemoryStore::new());

    let (registry, show, set) = thread::spawn(move || {
        let show = registry.show(ParamKey::Font);
        let set = registry.set(ParamKey::Font, "Courier-10").map(|_| ());
        (registry, show, set)
    })
    .join()
    .expect("thread should not panic");

    for result in [show.map(|_| ()), set] {
        assert!(matches!(
            result,
            Err(ParamError::WrongThread {
                expected: ThreadRole::Interpreter,
                ..
            })
        ));
    }
    assert_eq!(registry.param(ParamKey::Font).value(), "monospace");
    session.finish();
}

#[test]
fn given_gui_thread_when_theme_rendered_then_resolves_live_scheme() {
    let session = Session::start(true);
    let registry = session.registry(MemoryStore::new());

    let rendered = registry
        .render(ParamKey::Theme)
        .expect("post render")
        .wait_timeout(WAIT)
        .expect("render should run")
        .expect("gui thread");

    assert_eq!(
        rendered,
        gdbgui_params::Rendered::Scheme(Some(StyleScheme {
            id: String::from("classic"),
            name: String::from("classic scheme"),
        }))
    );
    session.finish();
}

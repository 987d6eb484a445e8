mod config;
mod headless;

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::thread;

use env_logger::Env;
use gdbgui_params::{
    ChannelConfig, FileStore, SettingsRegistry, StoreLoadStatus, ThreadGuard,
    ThreadRole, gui_channel, request_theme_ids,
};

use crate::config::Config;
use crate::headless::HeadlessBuffers;

const PROMPT: &str = "(gdb) ";
const QUIT: &str = "quit";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = Config::from_env()?;

    let guard = ThreadGuard::new();
    guard.bind(ThreadRole::Interpreter)?;
    let (gui, queue) = gui_channel(guard.clone(), &ChannelConfig::default());
    let gui_thread = thread::Builder::new()
        .name(String::from("gui"))
        .spawn(move || queue.run(headless::context(guard)))?;

    let theme_ids = request_theme_ids(&gui, config.startup_timeout)?;

    let (store, status) =
        FileStore::open(config.settings_path.clone())?.into_parts();
    match status {
        StoreLoadStatus::Loaded => {
            log::info!("settings loaded from {}", store.path().display())
        },
        StoreLoadStatus::Missing => log::info!(
            "no settings at {}, starting from defaults",
            store.path().display()
        ),
        StoreLoadStatus::Invalid(reason) => log::warn!(
            "ignoring unreadable settings at {}: {reason}",
            store.path().display()
        ),
    }

    let mut registry =
        SettingsRegistry::new(gui.clone(), Box::new(store), theme_ids)?;

    let installed = gui.run_on_gui(|ctx| {
        ctx.install_buffer_manager(Box::new(HeadlessBuffers))
    })?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_interpreter(&mut registry, stdin.lock(), stdout.lock())?;

    installed.wait_timeout(config.startup_timeout)??;
    drop(registry);
    gui.shutdown()?;
    match gui_thread.join() {
        Ok(result) => result?,
        Err(_) => return Err("gui thread panicked".into()),
    }

    Ok(())
}

/// Read command lines until `quit` or end of input, answering each one.
fn run_interpreter(
    registry: &mut SettingsRegistry,
    input: impl BufRead,
    mut output: impl Write,
) -> io::Result<()> {
    write!(output, "{PROMPT}")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim() == QUIT {
            break;
        }

        match registry.execute(&line) {
            Ok(text) if text.is_empty() => {},
            Ok(text) => writeln!(output, "{text}")?,
            Err(err) => writeln!(output, "error: {err}")?,
        }

        write!(output, "{PROMPT}")?;
        output.flush()?;
    }

    Ok(())
}

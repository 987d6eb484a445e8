//! Persisted GUI settings for the debugger front-end.
//!
//! The crate exposes the `theme`, `font` and per-window `title` parameters
//! through the `set gui ...` / `show gui ...` commands and keeps them in a
//! durable key-value store. Two threads cooperate:
//! - the interpreter thread owns every [`Parameter`] value, the store and
//!   the [`SettingsRegistry`],
//! - the GUI thread owns the [`GuiContext`] with the toolkit collaborators
//!   ([`SchemeRegistry`], [`UiState`], [`BufferManager`]).
//!
//! A [`ThreadGuard`] records which thread plays which [`ThreadRole`]; work
//! meant for the GUI thread is wrapped in an [`Affine`] callback and posted
//! through a [`GuiHandle`], which never blocks the interpreter.
//!
//! Front-ends usually:
//! 1. Create a [`ThreadGuard`], bind the interpreter thread and build the
//!    queue with [`gui_channel`].
//! 2. Move the [`GuiQueue`] to the GUI thread, build a [`GuiContext`] there
//!    and drive it with [`GuiQueue::run`] or [`GuiQueue::pump`].
//! 3. Fetch the theme domain with [`request_theme_ids`], open a store and
//!    build the [`SettingsRegistry`].
//! 4. Feed command lines to [`SettingsRegistry::execute`].

mod affinity;
mod command;
mod dispatch;
mod error;
mod font;
mod gui;
mod param;
mod registry;
mod store;

pub use affinity::{Affine, ThreadGuard, ThreadRole};
pub use command::{CommandTree, Leaf, Resolved};
pub use dispatch::{
    ChannelConfig, GuiHandle, GuiQueue, Pending, PumpReport, gui_channel,
};
pub use error::{ParamError, Result};
pub use font::{FontDescription, FontSize, FontStretch, FontStyle, FontWeight};
pub use gui::{
    BufferManager, CommitOutcome, GuiContext, GuiSnapshot, SchemeRegistry,
    StyleScheme, UiState,
};
pub use param::{ParamKey, ParamKind, Parameter, WindowKind};
pub use registry::{
    DEFAULT_FONT, DEFAULT_THEME, Rendered, SettingsRegistry, request_theme_ids,
};
pub use store::{
    FileStore, KeyValueStore, MemoryStore, StoreError, StoreLoad,
    StoreLoadStatus,
};

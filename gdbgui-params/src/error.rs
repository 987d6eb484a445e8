use thiserror::Error;

use crate::affinity::ThreadRole;
use crate::store::StoreError;

/// Errors originating from the settings subsystem.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("invalid value for `{key}`: {reason}")]
    Validation { key: String, reason: String },

    #[error("called from {actual}, must run on the {expected} thread")]
    WrongThread { expected: ThreadRole, actual: String },

    #[error("no thread is bound as the {0} thread")]
    Unbound(ThreadRole),

    #[error("the {0} role is already bound to another thread")]
    RoleAlreadyBound(ThreadRole),

    #[error(
        "this thread is already the {held} thread and cannot also be the \
         {requested} thread"
    )]
    RoleConflict {
        requested: ThreadRole,
        held: ThreadRole,
    },

    #[error("{0} is not available yet")]
    UninitializedDependency(&'static str),

    #[error("{0} has already been set")]
    DependencyAlreadySet(&'static str),

    #[error("`{0}` has no allowed values")]
    EmptyDomain(String),

    #[error("undefined {prefix}command: \"{name}\"")]
    UnknownCommand { prefix: String, name: String },

    #[error("command \"{0}\" is already registered")]
    DuplicateCommand(String),

    #[error(
        "\"{prefix}\" must be followed by the name of a subcommand.\n{subcommands}"
    )]
    IncompleteCommand { prefix: String, subcommands: String },

    #[error("\"{0}\" takes no arguments")]
    UnexpectedArgument(String),

    #[error("settings store error: {0}")]
    Store(#[from] StoreError),

    #[error("gui dispatch channel closed")]
    DispatchClosed,

    #[error("gui dispatch channel is full")]
    DispatchFull,

    #[error("timed out waiting for the gui thread")]
    DispatchTimeout,
}

impl ParamError {
    pub(crate) fn validation(
        key: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParamError>;

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use crate::error::{ParamError, Result};

/// One of the two threads that own settings-related resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadRole {
    /// Runs the command interpreter and owns parameter values and storage.
    Interpreter,
    /// Runs the GUI event loop and owns widgets, schemes and fonts.
    Gui,
}

impl ThreadRole {
    pub fn as_str(self) -> &'static str {
        match self {
            ThreadRole::Interpreter => "interpreter",
            ThreadRole::Gui => "gui",
        }
    }
}

impl fmt::Display for ThreadRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
struct Bindings {
    interpreter: Option<ThreadId>,
    gui: Option<ThreadId>,
}

impl Bindings {
    fn slot(&mut self, role: ThreadRole) -> &mut Option<ThreadId> {
        match role {
            ThreadRole::Interpreter => &mut self.interpreter,
            ThreadRole::Gui => &mut self.gui,
        }
    }

    fn role_of(&self, id: ThreadId) -> Option<ThreadRole> {
        if self.interpreter == Some(id) {
            Some(ThreadRole::Interpreter)
        } else if self.gui == Some(id) {
            Some(ThreadRole::Gui)
        } else {
            None
        }
    }
}

/// Shared table mapping each [`ThreadRole`] to the thread that plays it.
///
/// Clones share the same table, so the interpreter and the GUI loop can
/// each bind themselves and check the other side.
#[derive(Debug, Clone, Default)]
pub struct ThreadGuard {
    bindings: Arc<Mutex<Bindings>>,
}

impl ThreadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the calling thread as the owner of `role`.
    ///
    /// Binding the same thread twice is a no-op. Binding a second thread
    /// to an already claimed role fails, and so does binding a thread that
    /// already plays the other role.
    pub fn bind(&self, role: ThreadRole) -> Result<()> {
        let current = thread::current().id();
        let mut bindings =
            self.bindings.lock().unwrap_or_else(PoisonError::into_inner);
        let held = bindings.role_of(current).filter(|held| *held != role);
        if let Some(held) = held {
            log::error!("refused to bind the {held} thread as the {role} thread");
            return Err(ParamError::RoleConflict {
                requested: role,
                held,
            });
        }
        let slot = bindings.slot(role);
        let owner = *slot;
        match owner {
            Some(owner) if owner == current => Ok(()),
            Some(_) => Err(ParamError::RoleAlreadyBound(role)),
            None => {
                *slot = Some(current);
                log::debug!("bound {role} thread to {current:?}");
                Ok(())
            },
        }
    }

    /// Role played by the calling thread, if any.
    pub fn current_role(&self) -> Option<ThreadRole> {
        let bindings =
            self.bindings.lock().unwrap_or_else(PoisonError::into_inner);
        bindings.role_of(thread::current().id())
    }

    /// Whether the calling thread is the one bound to `role`.
    pub fn is_current(&self, role: ThreadRole) -> bool {
        self.current_role() == Some(role)
    }

    /// Fail unless the calling thread is the one bound to `role`.
    pub fn ensure(&self, role: ThreadRole) -> Result<()> {
        let current = thread::current();
        let bindings =
            self.bindings.lock().unwrap_or_else(PoisonError::into_inner);
        let expected = match role {
            ThreadRole::Interpreter => bindings.interpreter,
            ThreadRole::Gui => bindings.gui,
        };

        let Some(expected) = expected else {
            log::error!("{role} thread checked before it was bound");
            return Err(ParamError::Unbound(role));
        };

        if expected == current.id() {
            return Ok(());
        }

        let actual = match bindings.role_of(current.id()) {
            Some(other) => format!("the {other} thread"),
            None => match current.name() {
                Some(name) => format!("unbound thread `{name}`"),
                None => format!("unbound thread {:?}", current.id()),
            },
        };
        log::error!("thread affinity violated: {actual} instead of {role}");
        Err(ParamError::WrongThread {
            expected: role,
            actual,
        })
    }
}

/// Callback that may only run on the thread bound to its role.
pub struct Affine<F> {
    role: ThreadRole,
    guard: ThreadGuard,
    callback: F,
}

impl<F> Affine<F> {
    pub fn new(role: ThreadRole, guard: ThreadGuard, callback: F) -> Self {
        Self {
            role,
            guard,
            callback,
        }
    }

    pub fn role(&self) -> ThreadRole {
        self.role
    }

    /// Run the callback once after checking the calling thread.
    pub fn call_once<A, T>(self, arg: A) -> Result<T>
    where
        F: FnOnce(A) -> T,
    {
        self.guard.ensure(self.role)?;
        Ok((self.callback)(arg))
    }

    /// Run the callback after checking the calling thread.
    pub fn call<A, T>(&self, arg: A) -> Result<T>
    where
        F: Fn(A) -> T,
    {
        self.guard.ensure(self.role)?;
        Ok((self.callback)(arg))
    }
}

impl<F> fmt::Debug for Affine<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Affine").field("role", &self.role).finish()
    }
}

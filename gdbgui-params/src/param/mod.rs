mod key;
mod kind;

pub use key::{ParamKey, WindowKind};
pub use kind::ParamKind;

use crate::affinity::ThreadRole;
use crate::error::{ParamError, Result};
use crate::store::KeyValueStore;

/// A named, typed, persisted setting.
///
/// `value` is always a member of `kind`'s domain; the registry is the only
/// writer and persists every accepted value before assigning it here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    key: ParamKey,
    kind: ParamKind,
    value: String,
    default: String,
}

impl Parameter {
    /// Build the parameter, seeding its value from `store`.
    ///
    /// A stored enumerated value that is no longer in the domain is ignored
    /// in favour of the default; the stored entry is left as is.
    pub(crate) fn load(
        key: ParamKey,
        kind: ParamKind,
        default: String,
        store: &dyn KeyValueStore,
    ) -> Result<Self> {
        if !kind.contains(&default) {
            return Err(ParamError::validation(
                key.to_string(),
                format!("default \"{default}\" is outside the domain"),
            ));
        }

        let storage_key = key.storage_key();
        let value = match store.get(&storage_key)? {
            Some(stored) if kind.contains(&stored) => stored,
            Some(stale) => {
                log::warn!(
                    "stored {storage_key} \"{stale}\" is no longer available, \
                     using \"{default}\""
                );
                default.clone()
            },
            None => default.clone(),
        };

        Ok(Self {
            key,
            kind,
            value,
            default,
        })
    }

    pub fn key(&self) -> ParamKey {
        self.key
    }

    pub fn kind(&self) -> &ParamKind {
        &self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn storage_key(&self) -> String {
        self.key.storage_key()
    }

    pub fn display_affinity(&self) -> ThreadRole {
        self.key.display_affinity()
    }

    pub fn commit_affinity(&self) -> ThreadRole {
        self.key.commit_affinity()
    }

    /// Human-readable description of the current value.
    pub fn show_string(&self) -> String {
        self.key.show_string(&self.value)
    }

    /// Check `input` against the domain without touching the value.
    pub(crate) fn validate(&self, input: &str) -> Result<String> {
        self.kind
            .accept(input)
            .map_err(|reason| ParamError::validation(self.key.to_string(), reason))
    }

    pub(crate) fn assign(&mut self, value: String) {
        debug_assert!(self.kind.contains(&value));
        self.value = value;
    }
}

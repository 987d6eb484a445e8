use std::fmt;
use std::str::FromStr;

use crate::affinity::ThreadRole;
use crate::error::ParamError;

/// Logical window whose title bar is driven by a title template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WindowKind {
    Source,
    Display,
    Log,
}

impl WindowKind {
    pub const ALL: [WindowKind; 3] =
        [WindowKind::Source, WindowKind::Display, WindowKind::Log];

    /// Position in [`WindowKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            WindowKind::Source => 0,
            WindowKind::Display => 1,
            WindowKind::Log => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WindowKind::Source => "source",
            WindowKind::Display => "display",
            WindowKind::Log => "log",
        }
    }

    /// Built-in title template; `\W{...}` markers are expanded by the
    /// window title formatter.
    pub fn default_template(self) -> &'static str {
        match self {
            WindowKind::Source => "\\W{basename} [GDB Source @\\W{number}]",
            WindowKind::Display => "\\W{command} [GDB Display @\\W{number}]",
            WindowKind::Log => "[GDB Log @\\W{number}]\\W{default}",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowKind {
    type Err = ParamError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        WindowKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| {
                ParamError::validation(
                    "title",
                    format!("unknown window kind `{value}`"),
                )
            })
    }
}

/// Identity of a GUI setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKey {
    Theme,
    Font,
    Title(WindowKind),
}

impl ParamKey {
    pub const ALL: [ParamKey; 5] = [
        ParamKey::Theme,
        ParamKey::Font,
        ParamKey::Title(WindowKind::Source),
        ParamKey::Title(WindowKind::Display),
        ParamKey::Title(WindowKind::Log),
    ];

    /// Key under which the value is persisted.
    pub fn storage_key(self) -> String {
        match self {
            ParamKey::Theme => String::from("theme"),
            ParamKey::Font => String::from("font"),
            ParamKey::Title(kind) => format!("title-{kind}"),
        }
    }

    /// Words following `set gui` / `show gui`.
    pub fn command_path(self) -> Vec<&'static str> {
        match self {
            ParamKey::Theme => vec!["theme"],
            ParamKey::Font => vec!["font"],
            ParamKey::Title(kind) => vec!["title", kind.as_str()],
        }
    }

    pub fn set_doc(self) -> String {
        match self {
            ParamKey::Theme => String::from("Set the source window theme."),
            ParamKey::Font => String::from("Set the source window font."),
            ParamKey::Title(kind) => {
                format!("Set the {kind} window title format.")
            },
        }
    }

    pub fn show_doc(self) -> String {
        match self {
            ParamKey::Theme => String::from("Show the source window theme."),
            ParamKey::Font => String::from("Show the source window font."),
            ParamKey::Title(kind) => {
                format!("Show the {kind} window title format.")
            },
        }
    }

    pub fn show_string(self, value: &str) -> String {
        match self {
            ParamKey::Theme => format!("The current theme is: {value}"),
            ParamKey::Font => format!("The current font is: {value}"),
            ParamKey::Title(kind) => {
                format!("The current title format for the {kind} is: {value}")
            },
        }
    }

    /// Thread allowed to derive live state from the value.
    ///
    /// Schemes and font descriptions belong to the toolkit; a title
    /// template is plain text with nothing to resolve.
    pub fn display_affinity(self) -> ThreadRole {
        match self {
            ParamKey::Theme | ParamKey::Font => ThreadRole::Gui,
            ParamKey::Title(_) => ThreadRole::Interpreter,
        }
    }

    /// Thread on which a newly accepted value is applied.
    pub fn commit_affinity(self) -> ThreadRole {
        ThreadRole::Gui
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_path().join(" "))
    }
}

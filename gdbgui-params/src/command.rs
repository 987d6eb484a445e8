use std::collections::BTreeMap;

use crate::error::{ParamError, Result};
use crate::param::ParamKey;

const SET: &str = "set";
const SHOW: &str = "show";
const GUI: &str = "gui";
const TITLE: &str = "title";

/// Action bound to a leaf command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leaf {
    Set(ParamKey),
    Show(ParamKey),
}

/// A command line resolved against the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Blank input.
    Empty,
    Set { key: ParamKey, argument: String },
    Show(ParamKey),
    /// A bare `show` prefix: every getter below it, labelled by its path
    /// relative to the prefix.
    ShowAll(Vec<(String, ParamKey)>),
}

#[derive(Debug)]
enum Node {
    Prefix {
        doc: String,
        children: BTreeMap<String, Node>,
    },
    Leaf {
        doc: String,
        leaf: Leaf,
    },
}

impl Node {
    fn prefix(doc: &str) -> Self {
        Node::Prefix {
            doc: doc.to_string(),
            children: BTreeMap::new(),
        }
    }

    fn doc(&self) -> &str {
        match self {
            Node::Prefix { doc, .. } | Node::Leaf { doc, .. } => doc,
        }
    }
}

/// `set gui ...` / `show gui ...` command namespace.
#[derive(Debug)]
pub struct CommandTree {
    root: BTreeMap<String, Node>,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    /// Tree holding the fixed `set gui`, `set gui title`, `show gui` and
    /// `show gui title` prefixes.
    pub fn new() -> Self {
        let mut tree = Self {
            root: BTreeMap::new(),
        };
        tree.root.insert(
            SET.to_string(),
            Node::prefix("Evaluate expression and assign, or change a setting."),
        );
        tree.root.insert(
            SHOW.to_string(),
            Node::prefix("Generic command for showing things about the debugger."),
        );

        let fixed: [(&[&str], &str); 4] = [
            (&[SET, GUI], "Generic command for modifying GUI settings."),
            (
                &[SET, GUI, TITLE],
                "Generic command for modifying GUI window titles.",
            ),
            (&[SHOW, GUI], "Generic command for showing GUI settings."),
            (
                &[SHOW, GUI, TITLE],
                "Generic command for showing GUI window titles.",
            ),
        ];
        for (path, doc) in fixed {
            // The parents are inserted above and in order.
            let _ = tree.insert(path, Node::prefix(doc));
        }
        tree
    }

    /// Register the `set gui <path>` and `show gui <path>` leaves of `key`.
    pub fn attach(&mut self, key: ParamKey) -> Result<()> {
        let suffix = key.command_path();

        let mut set_path = vec![SET, GUI];
        set_path.extend(&suffix);
        self.add_leaf(&set_path, &key.set_doc(), Leaf::Set(key))?;

        let mut show_path = vec![SHOW, GUI];
        show_path.extend(&suffix);
        self.add_leaf(&show_path, &key.show_doc(), Leaf::Show(key))
    }

    /// Add a leaf below an existing prefix.
    pub fn add_leaf(
        &mut self,
        path: &[&str],
        doc: &str,
        leaf: Leaf,
    ) -> Result<()> {
        self.insert(
            path,
            Node::Leaf {
                doc: doc.to_string(),
                leaf,
            },
        )
    }

    fn insert(&mut self, path: &[&str], node: Node) -> Result<()> {
        let Some((name, parents)) = path.split_last() else {
            return Err(ParamError::DuplicateCommand(String::new()));
        };

        let mut children = &mut self.root;
        for (depth, parent) in parents.iter().enumerate() {
            match children.get_mut(*parent) {
                Some(Node::Prefix { children: next, .. }) => children = next,
                _ => {
                    return Err(ParamError::UnknownCommand {
                        prefix: prefix_label(&parents[..depth]),
                        name: parent.to_string(),
                    });
                },
            }
        }

        if children.contains_key(*name) {
            return Err(ParamError::DuplicateCommand(path.join(" ")));
        }
        log::debug!("registered command `{}`", path.join(" "));
        children.insert(name.to_string(), node);
        Ok(())
    }

    /// Resolve a command line to the action it names.
    ///
    /// Keywords are whitespace separated and case-sensitive. A setter takes
    /// the rest of the line, trimmed, with one pair of surrounding quotes
    /// removed.
    ///
    /// A setter with nothing after its name is a validation error, for
    /// free-form parameters too. An empty value is still accepted when it
    /// is spelled explicitly as `""` or `''`.
    pub fn resolve(&self, line: &str) -> Result<Resolved> {
        let mut rest = line.trim();
        if rest.is_empty() {
            return Ok(Resolved::Empty);
        }

        let mut path: Vec<&str> = Vec::new();
        let mut children = &self.root;

        loop {
            let (word, tail) = split_word(rest);
            let Some(node) = children.get(word) else {
                return Err(ParamError::UnknownCommand {
                    prefix: prefix_label(&path),
                    name: word.to_string(),
                });
            };
            path.push(word);
            rest = tail;

            match node {
                Node::Leaf {
                    leaf: Leaf::Show(key),
                    ..
                } => {
                    if !rest.is_empty() {
                        return Err(ParamError::UnexpectedArgument(
                            path.join(" "),
                        ));
                    }
                    return Ok(Resolved::Show(*key));
                },
                Node::Leaf {
                    leaf: Leaf::Set(key),
                    ..
                } => {
                    let argument = strip_quotes(rest);
                    if argument.is_empty() && rest.is_empty() {
                        return Err(ParamError::validation(
                            key.to_string(),
                            "argument required",
                        ));
                    }
                    return Ok(Resolved::Set {
                        key: *key,
                        argument: argument.to_string(),
                    });
                },
                Node::Prefix { children: next, .. } => {
                    if rest.is_empty() {
                        return resolve_prefix(&path, next);
                    }
                    children = next;
                },
            }
        }
    }
}

fn resolve_prefix(
    path: &[&str],
    children: &BTreeMap<String, Node>,
) -> Result<Resolved> {
    if path.first() == Some(&SHOW) {
        let mut entries = Vec::new();
        collect_getters(children, "", &mut entries);
        return Ok(Resolved::ShowAll(entries));
    }

    let prefix = path.join(" ");
    let subcommands = children
        .iter()
        .map(|(name, node)| format!("{prefix} {name} -- {}", node.doc()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ParamError::IncompleteCommand {
        prefix,
        subcommands,
    })
}

fn collect_getters(
    children: &BTreeMap<String, Node>,
    label: &str,
    entries: &mut Vec<(String, ParamKey)>,
) {
    for (name, node) in children {
        let path = if label.is_empty() {
            name.clone()
        } else {
            format!("{label} {name}")
        };
        match node {
            Node::Leaf {
                leaf: Leaf::Show(key),
                ..
            } => entries.push((path, *key)),
            Node::Leaf { .. } => {},
            Node::Prefix { children, .. } => {
                collect_getters(children, &path, entries)
            },
        }
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(end) => (&text[..end], text[end..].trim_start()),
        None => (text, ""),
    }
}

fn strip_quotes(text: &str) -> &str {
    let text = text.trim();
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote)
        {
            return &text[1..text.len() - 1];
        }
    }
    text
}

fn prefix_label(path: &[&str]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!("{} ", path.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandTree, Leaf, Resolved};
    use crate::error::ParamError;
    use crate::param::{ParamKey, WindowKind};

    fn tree() -> CommandTree {
        let mut tree = CommandTree::new();
        for key in ParamKey::ALL {
            tree.attach(key).expect("attach leaves");
        }
        tree
    }

    #[test]
    fn given_setter_with_argument_when_resolved_then_returns_set() {
        let resolved = tree()
            .resolve("set gui font Courier-10")
            .expect("resolve");

        assert_eq!(
            resolved,
            Resolved::Set {
                key: ParamKey::Font,
                argument: String::from("Courier-10"),
            }
        );
    }

    #[test]
    fn given_quoted_template_when_resolved_then_quotes_removed_only() {
        let resolved = tree()
            .resolve(r#"set gui title source "\W{basename}""#)
            .expect("resolve");

        assert_eq!(
            resolved,
            Resolved::Set {
                key: ParamKey::Title(WindowKind::Source),
                argument: String::from(r"\W{basename}"),
            }
        );
    }

    #[test]
    fn given_spaced_argument_when_resolved_then_rest_of_line_kept() {
        let resolved = tree()
            .resolve("set gui font   DejaVu Sans Mono 11  ")
            .expect("resolve");

        assert_eq!(
            resolved,
            Resolved::Set {
                key: ParamKey::Font,
                argument: String::from("DejaVu Sans Mono 11"),
            }
        );
    }

    #[test]
    fn given_setter_without_argument_when_resolved_then_validation_error() {
        let err = tree().resolve("set gui theme").expect_err("no argument");

        assert!(matches!(err, ParamError::Validation { .. }));
    }

    #[test]
    fn given_freeform_setter_when_empty_then_only_quoted_form_accepted() {
        let tree = tree();

        let bare = tree.resolve("set gui font").expect_err("no argument");
        let quoted = tree.resolve(r#"set gui font """#).expect("quoted empty");

        assert!(matches!(bare, ParamError::Validation { .. }));
        assert_eq!(
            quoted,
            Resolved::Set {
                key: ParamKey::Font,
                argument: String::new(),
            }
        );
    }

    #[test]
    fn given_getter_with_argument_when_resolved_then_rejected() {
        let err = tree()
            .resolve("show gui font big")
            .expect_err("unexpected argument");

        assert!(matches!(
            err,
            ParamError::UnexpectedArgument(command) if command == "show gui font"
        ));
    }

    #[test]
    fn given_unknown_subcommand_when_resolved_then_names_prefix() {
        let err = tree().resolve("show gui colour").expect_err("unknown");

        assert_eq!(err.to_string(), "undefined show gui command: \"colour\"");
    }

    #[test]
    fn given_uppercase_keyword_when_resolved_then_not_matched() {
        assert!(tree().resolve("SET gui font x").is_err());
    }

    #[test]
    fn given_bare_show_prefix_when_resolved_then_lists_every_getter() {
        let resolved = tree().resolve("show gui").expect("resolve");

        assert_eq!(
            resolved,
            Resolved::ShowAll(vec![
                (String::from("font"), ParamKey::Font),
                (String::from("theme"), ParamKey::Theme),
                (
                    String::from("title display"),
                    ParamKey::Title(WindowKind::Display)
                ),
                (String::from("title log"), ParamKey::Title(WindowKind::Log)),
                (
                    String::from("title source"),
                    ParamKey::Title(WindowKind::Source)
                ),
            ])
        );
    }

    #[test]
    fn given_bare_set_prefix_when_resolved_then_lists_subcommands() {
        let err = tree().resolve("set gui title").expect_err("incomplete");

        match err {
            ParamError::IncompleteCommand {
                prefix,
                subcommands,
            } => {
                assert_eq!(prefix, "set gui title");
                assert!(subcommands.contains(
                    "set gui title log -- Set the log window title format."
                ));
            },
            other => panic!("expected incomplete command, got {other:?}"),
        }
    }

    #[test]
    fn given_registered_leaf_when_added_again_then_duplicate() {
        let mut tree = tree();

        let result = tree.add_leaf(
            &["show", "gui", "font"],
            "again",
            Leaf::Show(ParamKey::Font),
        );

        assert!(matches!(result, Err(ParamError::DuplicateCommand(_))));
    }

    #[test]
    fn given_missing_prefix_when_leaf_added_then_rejected() {
        let mut tree = CommandTree::new();

        let result = tree.add_leaf(
            &["set", "gui", "layout", "split"],
            "split",
            Leaf::Set(ParamKey::Font),
        );

        assert!(matches!(
            result,
            Err(ParamError::UnknownCommand { name, .. }) if name == "layout"
        ));
    }

    #[test]
    fn given_blank_line_when_resolved_then_empty() {
        assert_eq!(tree().resolve("   ").expect("resolve"), Resolved::Empty);
    }
}

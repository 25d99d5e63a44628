//! Normal-mode command table compiled into a small trie.
//!
//! Pending keys resolve to one of three outcomes: a complete command, a
//! strict prefix of one or more commands, or nothing at all. The table is
//! data, so it can be checked without any key-event plumbing.

use smallvec::SmallVec;
use tracing::trace;

use super::selection::SelectionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Down,
    Up,
    Right,
    Beginning,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Delete,
    Yank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    EnterInsert,
    Move(Motion),
    StartSelection(SelectionMode),
    Paste { above: bool },
    DeleteLine,
    CopyLine,
    /// `d` / `y` on their own: consume the active selection if there is one.
    SelectionOperator(Operator),
    /// Line-wise operator over the rows between the cursor and the target of
    /// `motion`, e.g. `dj`, `ygg`.
    OperatorMotion { op: Operator, motion: Motion },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub keys: String,
    pub command: Command,
}

impl Binding {
    fn new(keys: impl Into<String>, command: Command) -> Self {
        Self {
            keys: keys.into(),
            command,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// `keys` names a command. `extensible` is set when longer bindings also
    /// start with `keys`.
    Complete { command: Command, extensible: bool },
    /// Strict prefix of at least one binding.
    Prefix,
    /// Neither a binding nor a prefix of one.
    Invalid,
}

/// The built-in Normal-mode bindings.
pub fn normal_bindings() -> Vec<Binding> {
    let motions = [
        ("j", Motion::Down),
        ("k", Motion::Up),
        ("G", Motion::End),
        ("gg", Motion::Beginning),
    ];

    let mut bindings = vec![
        Binding::new("i", Command::EnterInsert),
        Binding::new("h", Command::Move(Motion::Left)),
        Binding::new("j", Command::Move(Motion::Down)),
        Binding::new("k", Command::Move(Motion::Up)),
        Binding::new("l", Command::Move(Motion::Right)),
        Binding::new("v", Command::StartSelection(SelectionMode::Precise)),
        Binding::new("V", Command::StartSelection(SelectionMode::WholeLine)),
        Binding::new("p", Command::Paste { above: false }),
        Binding::new("P", Command::Paste { above: true }),
        Binding::new("G", Command::Move(Motion::End)),
        Binding::new("gg", Command::Move(Motion::Beginning)),
        Binding::new("dd", Command::DeleteLine),
        Binding::new("yy", Command::CopyLine),
        Binding::new("d", Command::SelectionOperator(Operator::Delete)),
        Binding::new("y", Command::SelectionOperator(Operator::Yank)),
    ];

    for (prefix, op) in [("d", Operator::Delete), ("y", Operator::Yank)] {
        for (keys, motion) in motions {
            bindings.push(Binding::new(
                format!("{prefix}{keys}"),
                Command::OperatorMotion { op, motion },
            ));
        }
    }

    bindings
}

#[derive(Debug, Clone, Default)]
struct Node {
    command: Option<Command>,
    edges: SmallVec<[(char, usize); 4]>,
}

#[derive(Debug, Clone)]
pub struct CommandTrie {
    nodes: Vec<Node>,
}

impl CommandTrie {
    pub fn build(bindings: &[Binding]) -> Self {
        let mut trie = Self {
            nodes: vec![Node::default()],
        };

        for binding in bindings {
            let mut cur = 0usize;
            for ch in binding.keys.chars() {
                let existing = trie.nodes[cur]
                    .edges
                    .iter()
                    .find(|(c, _)| *c == ch)
                    .map(|(_, next)| *next);
                cur = match existing {
                    Some(next) => next,
                    None => {
                        let next = trie.nodes.len();
                        trie.nodes.push(Node::default());
                        trie.nodes[cur].edges.push((ch, next));
                        next
                    }
                };
            }
            if trie.nodes[cur].command.is_some() {
                trace!(target = "editor.keymap", keys = %binding.keys, "binding_override");
            }
            trie.nodes[cur].command = Some(binding.command);
        }

        trie
    }

    pub fn normal_mode() -> Self {
        Self::build(&normal_bindings())
    }

    pub fn resolve(&self, keys: &str) -> Resolution {
        let mut cur = 0usize;
        for ch in keys.chars() {
            match self.nodes[cur].edges.iter().find(|(c, _)| *c == ch) {
                Some((_, next)) => cur = *next,
                None => return Resolution::Invalid,
            }
        }

        let node = &self.nodes[cur];
        match node.command {
            Some(command) => Resolution::Complete {
                command,
                extensible: !node.edges.is_empty(),
            },
            None if !node.edges.is_empty() => Resolution::Prefix,
            None => Resolution::Invalid,
        }
    }
}

impl Default for CommandTrie {
    fn default() -> Self {
        Self::normal_mode()
    }
}

//! Local variable tables.
//!
//! The lexer asks one question of scopes: is this bare name a local
//! variable here? The answer decides `foo -1` (call with a negative
//! argument) against `foo - 1` (subtraction), and `foo [1]` against
//! `foo[1]`. The parser owns the writes: it opens and closes scopes and
//! declares names as it reduces parameters and assignments.
//!
//! Scopes are a stack, not a tree. A `Local` frame (method, class body,
//! top level) hides everything below it; a `Block` frame sees through to
//! the frames below it up to and including the nearest `Local` one.

use garnet_diagnostic::{Diagnostic, ErrorCode};
use garnet_ir::{Name, SharedInterner, SourceRange};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::bit_stack::BitStack;

/// How a frame treats the frames below it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Opaque: `def`, `class`, `module`, top level.
    Local,
    /// Transparent: blocks and lambdas.
    Block,
}

/// One declared name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: Name,
    /// Where the name was declared.
    pub range: SourceRange,
    pub is_param: bool,
    pub used: bool,
}

#[derive(Clone, Debug)]
struct Frame {
    kind: ScopeKind,
    vars: SmallVec<[Variable; 8]>,
    /// Command-argument stack of the enclosing code, restored on pop.
    saved_cmdarg: BitStack,
}

impl Frame {
    fn new(kind: ScopeKind, saved_cmdarg: BitStack) -> Self {
        Frame {
            kind,
            vars: SmallVec::new(),
            saved_cmdarg,
        }
    }

    fn find(&self, name: Name) -> Option<usize> {
        self.vars.iter().position(|var| var.name == name)
    }
}

/// What a popped frame leaves behind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoppedScope {
    pub kind: ScopeKind,
    /// Non-parameter locals never read, excluding `_`-prefixed names.
    pub unused: Vec<Variable>,
    /// Command-argument stack to reinstate.
    pub saved_cmdarg: BitStack,
}

/// Scope-table misuse and invalid declarations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("duplicated argument name")]
    DuplicatedArgument { name: String, range: SourceRange },

    #[error("{}", read_only_message(.name))]
    ReadOnlyAssign { name: String, range: SourceRange },

    #[error("Can't set variable {name}")]
    NthRefAssign { name: String, range: SourceRange },

    #[error("cannot pop the outermost scope")]
    PopOutermost,
}

fn read_only_message(name: &str) -> String {
    if name == "self" {
        String::from("Can't change the value of self")
    } else {
        format!("Can't assign to {name}")
    }
}

impl ScopeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ScopeError::DuplicatedArgument { .. } => ErrorCode::E0501,
            ScopeError::ReadOnlyAssign { .. } | ScopeError::NthRefAssign { .. } => {
                ErrorCode::E0502
            }
            ScopeError::PopOutermost => ErrorCode::E0902,
        }
    }

    pub fn range(&self) -> Option<SourceRange> {
        match self {
            ScopeError::DuplicatedArgument { range, .. }
            | ScopeError::ReadOnlyAssign { range, .. }
            | ScopeError::NthRefAssign { range, .. } => Some(*range),
            ScopeError::PopOutermost => None,
        }
    }

    /// `at` locates errors that carry no range of their own.
    pub fn to_diagnostic(&self, at: SourceRange) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(self.range().unwrap_or(at), "")
    }
}

/// Names that look assignable but are not.
const READ_ONLY: [&str; 7] = [
    "self",
    "nil",
    "true",
    "false",
    "__FILE__",
    "__LINE__",
    "__ENCODING__",
];

/// `_`, `_x`: never reported unused, may repeat as parameters.
#[inline]
fn is_private(name: &str) -> bool {
    name.starts_with('_')
}

/// Starts like a local variable: lowercase, `_`, or non-ASCII.
fn is_local_name(name: &str) -> bool {
    name.bytes()
        .next()
        .is_some_and(|b| b == b'_' || b.is_ascii_lowercase() || !b.is_ascii())
}

/// The stack of scopes visible to the lexer.
#[derive(Clone, Debug)]
pub struct ScopeTable {
    interner: SharedInterner,
    frames: Vec<Frame>,
}

impl ScopeTable {
    /// A table holding only the top-level scope.
    pub fn new(interner: SharedInterner) -> Self {
        ScopeTable {
            interner,
            frames: vec![Frame::new(ScopeKind::Local, BitStack::new())],
        }
    }

    /// Number of open frames, top level included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current_kind(&self) -> ScopeKind {
        self.frames.last().map_or(ScopeKind::Local, |frame| frame.kind)
    }

    /// Open an opaque scope.
    pub fn push_local(&mut self, saved_cmdarg: BitStack) {
        debug!(depth = self.frames.len() + 1, "push local scope");
        self.frames.push(Frame::new(ScopeKind::Local, saved_cmdarg));
    }

    /// Open a transparent scope.
    pub fn push_block(&mut self, saved_cmdarg: BitStack) {
        debug!(depth = self.frames.len() + 1, "push block scope");
        self.frames.push(Frame::new(ScopeKind::Block, saved_cmdarg));
    }

    /// Close the innermost scope.
    pub fn pop(&mut self) -> Result<PoppedScope, ScopeError> {
        if self.frames.len() <= 1 {
            return Err(ScopeError::PopOutermost);
        }
        let Some(frame) = self.frames.pop() else {
            return Err(ScopeError::PopOutermost);
        };
        let unused = frame
            .vars
            .iter()
            .filter(|var| !var.used && !var.is_param)
            .filter(|var| !is_private(self.interner.lookup(var.name)))
            .copied()
            .collect();
        debug!(depth = self.frames.len(), kind = ?frame.kind, "pop scope");
        Ok(PoppedScope {
            kind: frame.kind,
            unused,
            saved_cmdarg: frame.saved_cmdarg,
        })
    }

    /// Declare a parameter of the innermost scope.
    ///
    /// A name already declared in this frame is an error unless it is
    /// `_`-prefixed. Shadowing an outer local is allowed.
    pub fn declare_param(&mut self, name: &str, range: SourceRange) -> Result<Name, ScopeError> {
        let interned = self.interner.intern(name);
        let Some(frame) = self.frames.last_mut() else {
            return Err(ScopeError::PopOutermost);
        };
        if frame.find(interned).is_some() && !is_private(name) {
            return Err(ScopeError::DuplicatedArgument {
                name: name.to_owned(),
                range,
            });
        }
        frame.vars.push(Variable {
            name: interned,
            range,
            is_param: true,
            used: false,
        });
        Ok(interned)
    }

    /// Declare a local in the innermost scope unless it is already visible.
    pub fn declare_local(&mut self, name: &str, range: SourceRange) -> Name {
        let interned = self.interner.intern(name);
        if !self.is_defined_name(interned) {
            if let Some(frame) = self.frames.last_mut() {
                frame.vars.push(Variable {
                    name: interned,
                    range,
                    is_param: false,
                    used: false,
                });
            }
        }
        interned
    }

    /// Check an assignment target, declaring it when it is a new local.
    ///
    /// Pseudo variables and `$1`-style references are rejected. Instance,
    /// class and global variables and constants pass through undeclared.
    pub fn assignable(&mut self, name: &str, range: SourceRange) -> Result<Name, ScopeError> {
        if READ_ONLY.contains(&name) {
            return Err(ScopeError::ReadOnlyAssign {
                name: name.to_owned(),
                range,
            });
        }
        if let Some(digits) = name.strip_prefix('$') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) && digits != "0" {
                return Err(ScopeError::NthRefAssign {
                    name: name.to_owned(),
                    range,
                });
            }
        }
        if is_local_name(name) {
            Ok(self.declare_local(name, range))
        } else {
            Ok(self.interner.intern(name))
        }
    }

    /// Whether `name` is a visible local or parameter.
    pub fn is_defined(&self, name: &str) -> bool {
        self.interner
            .get(name)
            .is_some_and(|interned| self.is_defined_name(interned))
    }

    pub fn is_defined_name(&self, name: Name) -> bool {
        self.visible_frames().any(|frame| frame.find(name).is_some())
    }

    /// Record a read of a visible local.
    pub fn mark_used(&mut self, name: Name) {
        let visible = self.visible_len();
        let start = self.frames.len() - visible;
        for frame in self.frames[start..].iter_mut().rev() {
            if let Some(index) = frame.find(name) {
                frame.vars[index].used = true;
                return;
            }
        }
    }

    /// Frames searched for a name, innermost first.
    fn visible_frames(&self) -> impl Iterator<Item = &Frame> {
        let visible = self.visible_len();
        self.frames.iter().rev().take(visible)
    }

    /// Count of frames from the top down to the nearest `Local` inclusive.
    fn visible_len(&self) -> usize {
        self.frames
            .iter()
            .rev()
            .position(|frame| frame.kind == ScopeKind::Local)
            .map_or(self.frames.len(), |index| index + 1)
    }
}

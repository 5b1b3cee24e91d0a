//! Traversal state of the indentation rule.
//!
//! Regular indent follows the open scopes, but a scope is only charged an
//! indent unit once a line break is seen inside it, so `foo(a, b)` on one
//! line never changes the indent. Exceptional indents are layered on top and
//! live as long as their initiator node is being traversed.

use crate::kind::NodeKind;
use crate::tokens::{self, Scope};
use crate::tree::{NodeId, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    scope: Scope,
    charged: bool,
}

/// Extra indentation tied to the subtree of an initiator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionalIndent {
    /// Node whose subtree bounds the lifetime of this indent.
    pub initiator: NodeId,
    /// Extra spaces, possibly negative.
    pub extra: i32,
    /// Whether the initiator's last child still receives the extra indent.
    pub include_last_child: bool,
}

impl ExceptionalIndent {
    /// Returns `true` while `current` should still receive the extra indent.
    ///
    /// Without `include_last_child`, the indent also ends at the initiator's
    /// last child and at the line break right in front of it.
    #[must_use]
    pub fn is_active(&self, tree: &SyntaxTree, current: NodeId) -> bool {
        if !tree.is_ancestor_or_self(self.initiator, current) {
            return false;
        }
        if self.include_last_child {
            return true;
        }
        match tree.last_child(self.initiator) {
            Some(last) => {
                current != last
                    && !(tree.kind(current).is_whitespace()
                        && tree.next_sibling(current) == Some(last))
            }
            None => true,
        }
    }
}

/// Per-file indentation state.
#[derive(Debug, Clone)]
pub struct IndentContext {
    unit: i32,
    regular: i32,
    frames: Vec<Frame>,
    exceptions: Vec<ExceptionalIndent>,
}

impl IndentContext {
    /// Creates an empty context where one scope level is `unit` spaces.
    #[must_use]
    pub fn new(unit: i32) -> Self {
        Self {
            unit,
            regular: 0,
            frames: Vec::new(),
            exceptions: Vec::new(),
        }
    }

    /// Records an opened scope. Non-opening kinds are ignored.
    pub fn push_scope(&mut self, kind: NodeKind) {
        if let Some(scope) = tokens::opened_scope(kind) {
            self.frames.push(Frame {
                scope,
                charged: false,
            });
        }
    }

    /// Charges the innermost scope with one indent unit, once.
    pub fn maybe_increment(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            if !frame.charged {
                frame.charged = true;
                self.regular += self.unit;
            }
        }
    }

    /// Undoes the charge of the innermost scope and closes it if `kind` matches.
    ///
    /// A closing token with no matching opener leaves the scopes as they are.
    pub fn dec(&mut self, kind: NodeKind) {
        let Some(closed) = tokens::closed_scope(kind) else {
            return;
        };
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        if frame.charged {
            frame.charged = false;
            self.regular -= self.unit;
        }
        if frame.scope == closed {
            self.frames.pop();
        }
    }

    /// Indent from charged scopes alone.
    #[must_use]
    pub fn regular_indent(&self) -> i32 {
        self.regular
    }

    /// Expected indent: regular indent plus every active exception.
    #[must_use]
    pub fn indent(&self) -> i32 {
        self.regular + self.exceptions.iter().map(|e| e.extra).sum::<i32>()
    }

    /// Layers an extra indent over the subtree of `initiator`.
    pub fn add_exception(&mut self, initiator: NodeId, extra: i32, include_last_child: bool) {
        self.exceptions.push(ExceptionalIndent {
            initiator,
            extra,
            include_last_child,
        });
    }

    /// Drops every exception that is no longer active at `current`.
    pub fn check_and_reset(&mut self, tree: &SyntaxTree, current: NodeId) {
        self.exceptions.retain(|e| e.is_active(tree, current));
    }

    /// Number of scopes currently open.
    #[must_use]
    pub fn open_scopes(&self) -> usize {
        self.frames.len()
    }
}

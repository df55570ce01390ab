// Tree-walking aspects
//
// An aspect is a validation rule invoked once per node during synthesis.
// Errors are accumulated, never thrown mid-walk: every violating node is
// reported, and the collected set fails the synthesis step as a whole.

use crate::tree::{ConstructTree, NodeId};
use std::fmt;

/// One recorded policy violation, tied to the node that triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Error annotations collected over one traversal
#[derive(Debug, Default)]
pub struct Annotations {
    errors: Vec<Violation>,
}

impl Annotations {
    pub fn add_error(&mut self, tree: &ConstructTree, node: NodeId, message: impl Into<String>) {
        self.errors.push(Violation {
            path: tree.path(node),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<Violation> {
        self.errors
    }
}

/// A whole-tree validation rule
pub trait Aspect {
    fn visit(&self, tree: &ConstructTree, node: NodeId, annotations: &mut Annotations);
}

/// Apply every aspect to every node, post-order, collecting annotations.
/// Each invocation starts from an empty annotation set, so re-running over
/// an unchanged tree yields the identical result.
pub fn apply_aspects(tree: &ConstructTree, aspects: &[Box<dyn Aspect>]) -> Annotations {
    let mut annotations = Annotations::default();
    for node in tree.post_order() {
        for aspect in aspects {
            aspect.visit(tree, node, &mut annotations);
        }
    }
    annotations
}

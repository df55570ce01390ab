// Explicit construct tree
//
// Constructs and resources live in one arena. Every node knows its
// immediate creating scope (parent), which is what the policy aspects
// check instead of inspecting a live object graph. Children keep
// declaration order; traversal is deterministic.

use crate::error::CoreError;
use crate::resource::Resource;

/// Handle into the construct tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Closed vocabulary of construct types known to the synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    App,
    Stack,
    EnhancedLambda,
    Gateway,
    Bucket,
    Table,
    GraphqlApi,
    DataSource,
}

#[derive(Debug)]
enum NodePayload {
    Construct(ConstructKind),
    Resource(Resource),
}

#[derive(Debug)]
struct Node {
    local_id: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    payload: NodePayload,
}

/// Arena-backed tree of constructs and resource leaves
#[derive(Debug)]
pub struct ConstructTree {
    nodes: Vec<Node>,
}

impl ConstructTree {
    /// Create a tree holding only the root `App` construct
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                local_id: String::new(),
                parent: None,
                children: Vec::new(),
                payload: NodePayload::Construct(ConstructKind::App),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a child construct under `parent`
    pub fn add_construct(
        &mut self,
        parent: NodeId,
        local_id: &str,
        kind: ConstructKind,
    ) -> Result<NodeId, CoreError> {
        self.add_node(parent, local_id, NodePayload::Construct(kind))
    }

    /// Add a leaf resource node under `parent`
    pub fn add_resource(
        &mut self,
        parent: NodeId,
        local_id: &str,
        resource: Resource,
    ) -> Result<NodeId, CoreError> {
        self.add_node(parent, local_id, NodePayload::Resource(resource))
    }

    fn add_node(
        &mut self,
        parent: NodeId,
        local_id: &str,
        payload: NodePayload,
    ) -> Result<NodeId, CoreError> {
        if local_id.is_empty() || local_id.contains('/') {
            return Err(CoreError::InvalidId {
                id: local_id.to_string(),
            });
        }
        if matches!(self.node(parent).payload, NodePayload::Resource(_)) {
            return Err(CoreError::ChildOfResource {
                parent_path: self.path(parent),
            });
        }
        if self
            .node(parent)
            .children
            .iter()
            .any(|&child| self.node(child).local_id == local_id)
        {
            return Err(CoreError::DuplicateChildId {
                parent_path: self.path(parent),
                id: local_id.to_string(),
            });
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            local_id: local_id.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            payload,
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn local_id(&self, id: NodeId) -> &str {
        &self.node(id).local_id
    }

    /// Slash-joined path from the root (the root itself is not a segment)
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if node.parent.is_some() {
                segments.push(node.local_id.as_str());
            }
            current = node.parent;
        }
        segments.reverse();
        segments.join("/")
    }

    /// Construct kind of a node, `None` for resource leaves
    pub fn kind(&self, id: NodeId) -> Option<ConstructKind> {
        match &self.node(id).payload {
            NodePayload::Construct(kind) => Some(*kind),
            NodePayload::Resource(_) => None,
        }
    }

    pub fn resource(&self, id: NodeId) -> Option<&Resource> {
        match &self.node(id).payload {
            NodePayload::Resource(resource) => Some(resource),
            NodePayload::Construct(_) => None,
        }
    }

    pub fn resource_mut(&mut self, id: NodeId) -> Option<&mut Resource> {
        match &mut self.nodes[id.0].payload {
            NodePayload::Resource(resource) => Some(resource),
            NodePayload::Construct(_) => None,
        }
    }

    /// Post-order traversal of the whole tree: children (in declaration
    /// order) before their parent, root last.
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        self.visit_post_order(self.root(), &mut order);
        order
    }

    fn visit_post_order(&self, id: NodeId, order: &mut Vec<NodeId>) {
        for &child in &self.node(id).children {
            self.visit_post_order(child, order);
        }
        order.push(id);
    }

    /// All nodes strictly below `id`, in declaration (pre-order) order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut pending: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(node) = pending.pop() {
            result.push(node);
            pending.extend(self.node(node).children.iter().rev().copied());
        }
        result
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl Default for ConstructTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_exclude_the_root() {
        let mut tree = ConstructTree::new();
        let stack = tree
            .add_construct(tree.root(), "Stateful-dev", ConstructKind::Stack)
            .unwrap();
        let bucket = tree
            .add_construct(stack, "Bucket", ConstructKind::Bucket)
            .unwrap();
        assert_eq!(tree.path(tree.root()), "");
        assert_eq!(tree.path(stack), "Stateful-dev");
        assert_eq!(tree.path(bucket), "Stateful-dev/Bucket");
    }

    #[test]
    fn duplicate_sibling_ids_are_rejected() {
        let mut tree = ConstructTree::new();
        let stack = tree
            .add_construct(tree.root(), "Stack", ConstructKind::Stack)
            .unwrap();
        tree.add_construct(stack, "Bucket", ConstructKind::Bucket)
            .unwrap();
        let err = tree
            .add_construct(stack, "Bucket", ConstructKind::Bucket)
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateChildId { .. }));
    }

    #[test]
    fn resource_nodes_are_leaves() {
        let mut tree = ConstructTree::new();
        let resource = tree
            .add_resource(
                tree.root(),
                "Fn",
                Resource::with_properties("AWS::Lambda::Function", json!({})),
            )
            .unwrap();
        let err = tree
            .add_construct(resource, "Child", ConstructKind::Bucket)
            .unwrap_err();
        assert!(matches!(err, CoreError::ChildOfResource { .. }));
    }

    #[test]
    fn post_order_visits_children_before_parents() {
        let mut tree = ConstructTree::new();
        let stack = tree
            .add_construct(tree.root(), "Stack", ConstructKind::Stack)
            .unwrap();
        let lambda = tree
            .add_construct(stack, "Lambda", ConstructKind::EnhancedLambda)
            .unwrap();
        let function = tree
            .add_resource(
                lambda,
                "Resource",
                Resource::with_properties("AWS::Lambda::Function", json!({})),
            )
            .unwrap();

        let order = tree.post_order();
        let pos =
            |id: NodeId| order.iter().position(|&n| n == id).unwrap();
        assert!(pos(function) < pos(lambda));
        assert!(pos(lambda) < pos(stack));
        assert_eq!(order.last(), Some(&tree.root()));
    }

    #[test]
    fn descendants_keep_declaration_order() {
        let mut tree = ConstructTree::new();
        let stack = tree
            .add_construct(tree.root(), "Stack", ConstructKind::Stack)
            .unwrap();
        let a = tree
            .add_construct(stack, "A", ConstructKind::Bucket)
            .unwrap();
        let b = tree
            .add_construct(stack, "B", ConstructKind::Table)
            .unwrap();
        assert_eq!(tree.descendants(stack), vec![a, b]);
    }
}

// symphony-core - Pure construct-tree model and template synthesis
//
// This crate contains the composition logic only: an explicit construct
// tree, tree-walking aspects, and rendering into CloudFormation-shaped
// templates. No I/O, no async. Synthesis is a single-pass, synchronous
// post-order walk; anything that touches the network (runtime binary
// downloads, provisioning) belongs to out-of-process build steps.

mod app;
mod aspect;
mod error;
mod resource;
mod template;
mod tree;

pub use app::{import_value, App, Assembly, StackArtifact};
pub use aspect::{apply_aspects, Annotations, Aspect, Violation};
pub use error::{CoreError, SynthError};
pub use resource::{DeletionPolicy, Resource};
pub use template::{logical_id, Export, Output, Template, TemplateResource};
pub use tree::{ConstructKind, ConstructTree, NodeId};

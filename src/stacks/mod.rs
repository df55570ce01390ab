// Stack definitions
//
// The stateful stack owns long-lived storage and the GraphQL API; the
// stateless stack builds compute and routing on top of identifiers the
// stateful stack exports. Creation order matters: stateless reads what
// stateful produced, never the other way around.

mod stateful;
mod stateless;

pub use stateful::{StatefulRefs, StatefulStack};
pub use stateless::StatelessStack;

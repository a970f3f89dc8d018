pub mod builder;
pub mod jid;
pub mod node;

pub use builder::NodeBuilder;
pub use jid::{Jid, JidError};
pub use node::{Attrs, Node, NodeContent};

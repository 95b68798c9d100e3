//! Beanwalk tree assembly
//!
//! Turns a flat list of nodes of one registered type into a forest by reading
//! their id and parent-id fields by name, and optionally orders every sibling
//! list by an order field. All field access goes through
//! [`beanwalk_reflect::Reflector`].
//!
//! # Example
//!
//! ```ignore
//! use beanwalk_tree::{TreeBuilder, TreeFields};
//!
//! // A parent id of `0` marks a root unless the options say otherwise
//! let builder = TreeBuilder::<i64>::new(&reflector, TreeFields::default());
//! let root = builder.assemble_single_sorted::<Node, i32>(nodes)?;
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod error;
pub mod sorter;

mod slots;

pub use builder::TreeBuilder;
pub use config::{DuplicatePolicy, OrphanPolicy, TreeFields, TreeOptions};
pub use error::{TreeError, TreeResult};
pub use sorter::TreeSorter;

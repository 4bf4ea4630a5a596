//! INode primitives for the virtual filesystem.
//!
//! This module provides the lazily expanded directory and file nodes the
//! BSON projection is made of, plus the manager that hands out inode IDs.

mod dir;
mod file;
mod manager;
mod types;

pub use dir::{DirSource, Expansion, INodeDir};
pub use file::INodeFile;
pub use manager::INodeManager;
pub use types::{DirEntry, INode, INodeAttr, INodeId, INodeType, DIR_PERMS, FILE_PERMS, ROOT_INODE};

//! FUSE-based virtual filesystem over BSON documents.
//!
//! This crate mounts a BSON file read-only: embedded documents and arrays
//! appear as directories and every other field as a file holding the
//! value's text form. Directories are decoded the first time they are
//! visited.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: FUSE Interface (fuser::Filesystem impl)
//! Layer 2: Tree operations (lookup, readdir, getattr, read)
//! Layer 1: Primitives (INodeManager, INodeDir, INodeFile)
//! Layer 0: befuddle-model (framing, one-level decode, rendering)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use befuddle_vfs::{load_file, mount, BsonFs, VfsOptions};
//!
//! let options = VfsOptions::default();
//! let inodes = load_file(Path::new("dump.bson"), &options)?;
//! mount(BsonFs::new(inodes, options), Path::new("/mnt/bson"))?;
//! ```

pub mod builder;
pub mod error;
pub mod inode;
pub mod options;

#[cfg(feature = "fuse")]
pub mod fuse;

pub use builder::{build_tree, load_file};
pub use error::VfsError;
pub use inode::{
    DirEntry, DirSource, INode, INodeAttr, INodeDir, INodeFile, INodeId, INodeManager, INodeType,
    ROOT_INODE,
};
pub use options::{InputMode, VfsOptions};

#[cfg(feature = "fuse")]
pub use fuse::{mount, spawn_mount, BsonFs};

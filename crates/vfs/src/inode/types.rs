//! Core INode types.

use std::sync::Arc;

use super::dir::INodeDir;
use super::file::INodeFile;

/// Unique identifier for an inode.
pub type INodeId = u64;

/// Root directory inode ID (always 1 per FUSE convention).
pub const ROOT_INODE: INodeId = 1;

/// Directory permissions (r-xr-xr-x).
pub const DIR_PERMS: u16 = 0o555;

/// File permissions (r--r--r--).
pub const FILE_PERMS: u16 = 0o444;

/// Type of inode entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum INodeType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

/// Attributes reported for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct INodeAttr {
    pub id: INodeId,
    pub kind: INodeType,
    /// POSIX permission bits.
    pub perm: u16,
    /// Content length for files, 0 for directories.
    pub size: u64,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub id: INodeId,
    pub name: String,
    pub kind: INodeType,
}

/// A node in the tree: either a lazily expanded directory or a file.
#[derive(Debug, Clone)]
pub enum INode {
    Dir(Arc<INodeDir>),
    File(Arc<INodeFile>),
}

impl INode {
    /// Get the inode ID.
    pub fn id(&self) -> INodeId {
        match self {
            INode::Dir(d) => d.id(),
            INode::File(f) => f.id(),
        }
    }

    /// Get the parent directory inode ID.
    pub fn parent_id(&self) -> INodeId {
        match self {
            INode::Dir(d) => d.parent_id(),
            INode::File(f) => f.parent_id(),
        }
    }

    /// Get the exposed entry name.
    pub fn name(&self) -> &str {
        match self {
            INode::Dir(d) => d.name(),
            INode::File(f) => f.name(),
        }
    }

    pub fn inode_type(&self) -> INodeType {
        match self {
            INode::Dir(_) => INodeType::Directory,
            INode::File(_) => INodeType::File,
        }
    }

    /// Get attributes. Never triggers expansion.
    pub fn attr(&self) -> INodeAttr {
        match self {
            INode::Dir(d) => d.attr(),
            INode::File(f) => f.attr(),
        }
    }

    /// Listing entry for this node.
    pub fn dir_entry(&self) -> DirEntry {
        DirEntry {
            id: self.id(),
            name: self.name().to_string(),
            kind: self.inode_type(),
        }
    }

    pub fn as_dir(&self) -> Option<&Arc<INodeDir>> {
        match self {
            INode::Dir(d) => Some(d),
            INode::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&Arc<INodeFile>> {
        match self {
            INode::Dir(_) => None,
            INode::File(f) => Some(f),
        }
    }
}

//! Directory inode implementation.
//!
//! A directory starts collapsed, holding the raw container it projects.
//! The first lookup or listing expands it: the container is decoded one
//! level, every field becomes a child node with a freshly allocated inode,
//! and the raw source is dropped. Expansion runs at most once; concurrent
//! callers block on the same [`OnceLock`] and all observe its result,
//! including a failure.

use std::sync::{Arc, OnceLock};

use befuddle_model::{
    project_container, project_fields, DecodeError, NamedValue, Projected, TypedValue,
};
use parking_lot::Mutex;

use super::file::INodeFile;
use super::manager::INodeManager;
use super::types::{DirEntry, INode, INodeAttr, INodeId, INodeType, DIR_PERMS};
use crate::error::VfsError;

/// What a collapsed directory expands from.
#[derive(Debug, Clone)]
pub enum DirSource {
    /// An embedded document or array, decoded on expansion.
    Container(TypedValue),
    /// Fields that are already decoded (top-level documents of a stream).
    Fields(Vec<NamedValue>),
}

/// Result of expanding a directory.
#[derive(Debug)]
pub struct Expansion {
    /// Decoded fields, in document order.
    fields: Vec<NamedValue>,
    /// One child per field, in the same order.
    children: Vec<INode>,
}

impl Expansion {
    pub fn fields(&self) -> &[NamedValue] {
        &self.fields
    }

    pub fn children(&self) -> &[INode] {
        &self.children
    }
}

/// Directory inode projected from a BSON container.
#[derive(Debug)]
pub struct INodeDir {
    /// Inode ID.
    id: INodeId,
    /// Parent directory inode ID.
    parent_id: INodeId,
    /// Directory name.
    name: String,
    /// Source while collapsed; taken by the expansion.
    source: Mutex<Option<DirSource>>,
    /// Set exactly once by the first expansion.
    expansion: OnceLock<Result<Expansion, Arc<DecodeError>>>,
}

impl INodeDir {
    /// Create a new, collapsed directory inode.
    ///
    /// # Arguments
    /// * `id` - Inode ID
    /// * `parent_id` - Parent directory inode ID
    /// * `name` - Directory name
    /// * `source` - Container or fields the directory expands from
    pub fn new(id: INodeId, parent_id: INodeId, name: String, source: DirSource) -> Self {
        Self {
            id,
            parent_id,
            name,
            source: Mutex::new(Some(source)),
            expansion: OnceLock::new(),
        }
    }

    pub fn id(&self) -> INodeId {
        self.id
    }

    pub fn parent_id(&self) -> INodeId {
        self.parent_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self) -> INodeAttr {
        INodeAttr {
            id: self.id,
            kind: INodeType::Directory,
            perm: DIR_PERMS,
            size: 0,
        }
    }

    /// Whether the directory has been expanded (successfully or not).
    pub fn is_expanded(&self) -> bool {
        self.expansion.get().is_some()
    }

    /// Expand the directory if needed.
    ///
    /// # Arguments
    /// * `inodes` - Manager that allocates and indexes child inodes
    ///
    /// # Returns
    /// The expansion shared by every caller.
    pub fn expand(&self, inodes: &INodeManager) -> Result<&Expansion, VfsError> {
        self.expansion
            .get_or_init(|| self.run_expansion(inodes).map_err(Arc::new))
            .as_ref()
            .map_err(|source| VfsError::Expansion {
                inode: self.id,
                source: Arc::clone(source),
            })
    }

    /// Children in document order, expanding first if needed.
    pub fn children(&self, inodes: &INodeManager) -> Result<&[INode], VfsError> {
        Ok(self.expand(inodes)?.children())
    }

    /// Find a child by its exposed name.
    ///
    /// Names may repeat; the first match in document order wins.
    ///
    /// # Arguments
    /// * `name` - Entry name to look up
    /// * `inodes` - Manager used if the directory needs expanding
    pub fn lookup(&self, name: &str, inodes: &INodeManager) -> Result<INode, VfsError> {
        self.children(inodes)?
            .iter()
            .find(|child| child.name() == name)
            .cloned()
            .ok_or_else(|| VfsError::NotFound {
                parent: self.id,
                name: name.to_string(),
            })
    }

    /// List children as directory entries, in document order.
    pub fn readdir(&self, inodes: &INodeManager) -> Result<Vec<DirEntry>, VfsError> {
        Ok(self.children(inodes)?.iter().map(INode::dir_entry).collect())
    }

    /// Decode the source and materialize one child per field.
    ///
    /// Only called from inside the `OnceLock` initializer.
    fn run_expansion(&self, inodes: &INodeManager) -> Result<Expansion, DecodeError> {
        let source: DirSource = self.source.lock().take().ok_or_else(|| {
            DecodeError::MalformedContainer {
                offset: 0,
                reason: "directory source already consumed".to_string(),
            }
        })?;

        let (fields, projected): (Vec<NamedValue>, Vec<Projected>) = match source {
            DirSource::Container(value) => project_container(&value),
            DirSource::Fields(fields) => project_fields(&fields).map(|p| (fields, p)),
        }
        .inspect_err(|e| tracing::warn!(inode = self.id, error = %e, "Directory expansion failed"))?;

        // Inodes are allocated only once every field projected cleanly.
        let children: Vec<INode> = projected
            .into_iter()
            .map(|entry| {
                let id: INodeId = inodes.allocate_id();
                match entry {
                    Projected::Container { name, value } => INode::Dir(Arc::new(INodeDir::new(
                        id,
                        self.id,
                        name,
                        DirSource::Container(value),
                    ))),
                    Projected::Scalar { name, content } => {
                        INode::File(Arc::new(INodeFile::new(id, self.id, name, content)))
                    }
                }
            })
            .collect();

        inodes.register(&children);
        inodes.record_expansion();
        tracing::debug!(
            inode = self.id,
            name = %self.name,
            children = children.len(),
            "Expanded directory"
        );

        Ok(Expansion { fields, children })
    }
}

//! File inode implementation.

use bytes::Bytes;

use super::types::{INodeAttr, INodeId, INodeType, FILE_PERMS};

/// File inode holding a rendered scalar.
///
/// Content is fixed at construction.
#[derive(Debug)]
pub struct INodeFile {
    /// Inode ID.
    id: INodeId,
    /// Parent directory inode ID.
    parent_id: INodeId,
    /// File name (`<field>.<type label>`).
    name: String,
    /// Rendered content.
    content: Bytes,
}

impl INodeFile {
    /// Create a new file inode.
    ///
    /// # Arguments
    /// * `id` - Inode ID
    /// * `parent_id` - Parent directory inode ID
    /// * `name` - File name
    /// * `content` - File content
    pub fn new(id: INodeId, parent_id: INodeId, name: String, content: Bytes) -> Self {
        Self {
            id,
            parent_id,
            name,
            content,
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

    /// Size in bytes of the content.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn attr(&self) -> INodeAttr {
        INodeAttr {
            id: self.id,
            kind: INodeType::File,
            perm: FILE_PERMS,
            size: self.size(),
        }
    }

    /// Full file content.
    pub fn read_all(&self) -> Bytes {
        self.content.clone()
    }

    /// Read a window of the content.
    ///
    /// # Arguments
    /// * `offset` - Byte offset to start at
    /// * `size` - Maximum number of bytes to return
    ///
    /// # Returns
    /// The bytes in range; empty if `offset` is at or past the end.
    pub fn read(&self, offset: u64, size: u32) -> Bytes {
        let len: u64 = self.size();
        if offset >= len {
            return Bytes::new();
        }
        let end: u64 = (offset + size as u64).min(len);
        self.content.slice(offset as usize..end as usize)
    }
}

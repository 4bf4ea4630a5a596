//! INode manager for allocating and tracking inodes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use super::dir::{DirSource, INodeDir};
use super::file::INodeFile;
use super::types::{DirEntry, INode, INodeAttr, INodeId, ROOT_INODE};
use crate::error::VfsError;

/// Manages inode allocation and lookup for one tree.
///
/// Owns the inode counter, so independent trees never share IDs. Nodes are
/// indexed as they are materialized so inode-addressed host requests can
/// find them.
pub struct INodeManager {
    /// Next inode ID to allocate.
    next_id: AtomicU64,
    /// Root directory.
    root: Arc<INodeDir>,
    /// All materialized inodes by ID.
    inodes: RwLock<HashMap<INodeId, INode>>,
    /// Number of successful directory expansions.
    expansions: AtomicU64,
}

impl INodeManager {
    /// Create a new inode manager with a collapsed root directory.
    ///
    /// # Arguments
    /// * `root_source` - What the root directory expands from
    pub fn new(root_source: DirSource) -> Self {
        let root: Arc<INodeDir> = Arc::new(INodeDir::new(
            ROOT_INODE,
            ROOT_INODE,
            String::new(),
            root_source,
        ));

        let mut inodes: HashMap<INodeId, INode> = HashMap::new();
        inodes.insert(ROOT_INODE, INode::Dir(Arc::clone(&root)));

        Self {
            next_id: AtomicU64::new(ROOT_INODE + 1),
            root,
            inodes: RwLock::new(inodes),
            expansions: AtomicU64::new(0),
        }
    }

    /// Allocate a new inode ID.
    pub(crate) fn allocate_id(&self) -> INodeId {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Index freshly materialized nodes.
    pub(crate) fn register(&self, nodes: &[INode]) {
        let mut inodes = self.inodes.write();
        for node in nodes {
            inodes.insert(node.id(), node.clone());
        }
    }

    pub(crate) fn record_expansion(&self) {
        self.expansions.fetch_add(1, Ordering::SeqCst);
    }

    /// Get the root directory.
    pub fn root(&self) -> Arc<INodeDir> {
        Arc::clone(&self.root)
    }

    /// Get an inode by ID.
    ///
    /// # Arguments
    /// * `id` - Inode ID to look up
    ///
    /// # Returns
    /// The inode if it has been materialized.
    pub fn get(&self, id: INodeId) -> Option<INode> {
        self.inodes.read().get(&id).cloned()
    }

    /// Get an inode as a directory.
    pub fn get_as_dir(&self, id: INodeId) -> Result<Arc<INodeDir>, VfsError> {
        match self.get(id).ok_or(VfsError::InodeNotFound(id))? {
            INode::Dir(dir) => Ok(dir),
            INode::File(_) => Err(VfsError::NotADirectory(id)),
        }
    }

    /// Get an inode as a file.
    pub fn get_as_file(&self, id: INodeId) -> Result<Arc<INodeFile>, VfsError> {
        match self.get(id).ok_or(VfsError::InodeNotFound(id))? {
            INode::File(file) => Ok(file),
            INode::Dir(_) => Err(VfsError::NotAFile(id)),
        }
    }

    /// Attributes of an inode.
    pub fn getattr(&self, id: INodeId) -> Result<INodeAttr, VfsError> {
        self.get(id)
            .map(|node| node.attr())
            .ok_or(VfsError::InodeNotFound(id))
    }

    /// Resolve a child of a directory by name.
    ///
    /// # Arguments
    /// * `parent` - Directory inode ID
    /// * `name` - Child entry name
    pub fn lookup(&self, parent: INodeId, name: &str) -> Result<INode, VfsError> {
        self.get_as_dir(parent)?.lookup(name, self)
    }

    /// List the children of a directory.
    ///
    /// # Arguments
    /// * `id` - Directory inode ID
    ///
    /// # Returns
    /// Entries in document order, without `.` and `..`.
    pub fn readdir(&self, id: INodeId) -> Result<Vec<DirEntry>, VfsError> {
        self.get_as_dir(id)?.readdir(self)
    }

    /// Full content of a file.
    pub fn read_all(&self, id: INodeId) -> Result<Bytes, VfsError> {
        Ok(self.get_as_file(id)?.read_all())
    }

    /// Resolve a slash-separated path from the root.
    ///
    /// # Arguments
    /// * `path` - Path such as `"0/meta/age.int32"` (empty for root)
    pub fn resolve_path(&self, path: &str) -> Result<INode, VfsError> {
        let mut node: INode = INode::Dir(self.root());
        for part in path.split('/').filter(|p| !p.is_empty()) {
            let dir: &Arc<INodeDir> = node.as_dir().ok_or(VfsError::NotADirectory(node.id()))?;
            node = dir.lookup(part, self)?;
        }
        Ok(node)
    }

    /// Get the number of materialized inodes.
    pub fn inode_count(&self) -> usize {
        self.inodes.read().len()
    }

    /// Get the number of directory expansions performed.
    pub fn expansion_count(&self) -> u64 {
        self.expansions.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use befuddle_model::{NamedValue, TypedValue};
    use bson::doc;

    use crate::inode::INodeType;

    fn encode(doc: bson::Document) -> TypedValue {
        let mut out: Vec<u8> = Vec::new();
        doc.to_writer(&mut out).unwrap();
        TypedValue::document(Bytes::from(out))
    }

    fn manager() -> INodeManager {
        INodeManager::new(DirSource::Container(encode(doc! {
            "age": 42,
            "meta": { "city": "Oslo", "tags": ["a"] },
        })))
    }

    #[test]
    fn test_new_manager_has_root() {
        let manager: INodeManager = manager();
        let root: Arc<INodeDir> = manager.root();
        assert_eq!(root.id(), ROOT_INODE);
        assert_eq!(manager.getattr(ROOT_INODE).unwrap().kind, INodeType::Directory);
        assert_eq!(manager.inode_count(), 1);
    }

    #[test]
    fn test_lookup_by_inode() {
        let manager: INodeManager = manager();
        let meta: INode = manager.lookup(ROOT_INODE, "meta").unwrap();
        let city: INode = manager.lookup(meta.id(), "city.utf8").unwrap();
        assert_eq!(manager.read_all(city.id()).unwrap(), Bytes::from_static(b"Oslo\n"));
    }

    #[test]
    fn test_inodes_follow_materialization_order() {
        let manager: INodeManager = manager();
        let entries: Vec<DirEntry> = manager.readdir(ROOT_INODE).unwrap();
        let ids: Vec<INodeId> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3]);

        let meta: Vec<DirEntry> = manager.readdir(3).unwrap();
        let ids: Vec<INodeId> = meta.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![4, 5]);
    }

    #[test]
    fn test_resolve_path() {
        let manager: INodeManager = manager();
        let tag: INode = manager.resolve_path("meta/tags/0.utf8").unwrap();
        assert_eq!(tag.inode_type(), INodeType::File);
        assert_eq!(tag.attr().size, 2);

        let root: INode = manager.resolve_path("").unwrap();
        assert_eq!(root.id(), ROOT_INODE);

        let through_file = manager.resolve_path("age.int32/x");
        assert!(matches!(through_file, Err(VfsError::NotADirectory(_))));
    }

    #[test]
    fn test_wrong_kind_errors() {
        let manager: INodeManager = manager();
        let age: INode = manager.lookup(ROOT_INODE, "age.int32").unwrap();

        assert!(matches!(manager.readdir(age.id()), Err(VfsError::NotADirectory(_))));
        assert!(matches!(manager.read_all(ROOT_INODE), Err(VfsError::NotAFile(_))));
        assert!(matches!(manager.getattr(999), Err(VfsError::InodeNotFound(999))));
    }

    #[test]
    fn test_independent_managers_do_not_share_counters() {
        let fields: Vec<NamedValue> = vec![NamedValue::new("0", encode(doc! { "a": 1 }))];
        let first: INodeManager = INodeManager::new(DirSource::Fields(fields.clone()));
        let second: INodeManager = INodeManager::new(DirSource::Fields(fields));

        let a: Vec<DirEntry> = first.readdir(ROOT_INODE).unwrap();
        let b: Vec<DirEntry> = second.readdir(ROOT_INODE).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].id, 2);
    }
}

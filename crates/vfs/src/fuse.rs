//! FUSE filesystem implementation.

#[cfg(feature = "fuse")]
mod impl_fuse {
    use std::ffi::OsStr;
    use std::path::Path;
    use std::time::{Duration, UNIX_EPOCH};

    use fuser::{
        FileAttr, FileType, Filesystem, MountOption, ReplyAttr, ReplyData, ReplyDirectory,
        ReplyEntry, ReplyOpen, Request,
    };

    use crate::inode::{DirEntry, INode, INodeAttr, INodeManager, INodeType};
    use crate::options::VfsOptions;
    use crate::VfsError;

    /// Map a VFS error to the errno reported to the kernel.
    pub fn errno(err: &VfsError) -> i32 {
        match err {
            VfsError::InodeNotFound(_) | VfsError::NotFound { .. } => libc::ENOENT,
            VfsError::NotADirectory(_) => libc::ENOTDIR,
            VfsError::NotAFile(_) => libc::EISDIR,
            _ => libc::EIO,
        }
    }

    /// Read-only FUSE filesystem over a BSON tree.
    pub struct BsonFs {
        /// Lazily expanded node tree.
        inodes: INodeManager,
        /// VFS options.
        options: VfsOptions,
        /// Owner reported for every node.
        uid: u32,
        gid: u32,
    }

    impl BsonFs {
        /// Create a filesystem over a built tree.
        ///
        /// # Arguments
        /// * `inodes` - Tree to serve
        /// * `options` - VFS configuration options
        pub fn new(inodes: INodeManager, options: VfsOptions) -> Self {
            Self {
                inodes,
                options,
                uid: unsafe { libc::getuid() },
                gid: unsafe { libc::getgid() },
            }
        }

        /// Get the underlying tree.
        pub fn inodes(&self) -> &INodeManager {
            &self.inodes
        }

        /// Convert inode attributes to FUSE file attributes.
        fn to_file_attr(&self, attr: INodeAttr) -> FileAttr {
            let kind: FileType = file_type(attr.kind);
            FileAttr {
                ino: attr.id,
                size: attr.size,
                blocks: attr.size.div_ceil(512),
                atime: UNIX_EPOCH,
                mtime: UNIX_EPOCH,
                ctime: UNIX_EPOCH,
                crtime: UNIX_EPOCH,
                kind,
                perm: attr.perm,
                nlink: if kind == FileType::Directory { 2 } else { 1 },
                uid: self.uid,
                gid: self.gid,
                rdev: 0,
                blksize: 512,
                flags: 0,
            }
        }

        /// Get TTL for FUSE attributes.
        fn ttl(&self) -> Duration {
            self.options.attr_ttl
        }
    }

    /// Index of the first directory entry to emit for a kernel offset.
    ///
    /// # Returns
    /// `EINVAL` for negative offsets.
    fn listing_start(offset: i64) -> Result<usize, i32> {
        usize::try_from(offset).map_err(|_| libc::EINVAL)
    }

    fn file_type(kind: INodeType) -> FileType {
        match kind {
            INodeType::File => FileType::RegularFile,
            INodeType::Directory => FileType::Directory,
        }
    }

    impl Filesystem for BsonFs {
        fn lookup(&mut self, _req: &Request, parent: u64, name: &OsStr, reply: ReplyEntry) {
            let name_str: &str = match name.to_str() {
                Some(n) => n,
                None => {
                    reply.error(libc::ENOENT);
                    return;
                }
            };
            tracing::trace!(parent, name = name_str, "lookup");

            match self.inodes.lookup(parent, name_str) {
                Ok(child) => reply.entry(&self.ttl(), &self.to_file_attr(child.attr()), 0),
                Err(e) => reply.error(errno(&e)),
            }
        }

        fn getattr(&mut self, _req: &Request, ino: u64, reply: ReplyAttr) {
            match self.inodes.getattr(ino) {
                Ok(attr) => reply.attr(&self.ttl(), &self.to_file_attr(attr)),
                Err(e) => reply.error(errno(&e)),
            }
        }

        fn readdir(
            &mut self,
            _req: &Request,
            ino: u64,
            _fh: u64,
            offset: i64,
            mut reply: ReplyDirectory,
        ) {
            tracing::trace!(ino, offset, "readdir");
            let start: usize = match listing_start(offset) {
                Ok(s) => s,
                Err(code) => {
                    reply.error(code);
                    return;
                }
            };
            let dir = match self.inodes.get_as_dir(ino) {
                Ok(d) => d,
                Err(e) => {
                    reply.error(errno(&e));
                    return;
                }
            };

            let children: Vec<DirEntry> = match dir.readdir(&self.inodes) {
                Ok(c) => c,
                Err(e) => {
                    reply.error(errno(&e));
                    return;
                }
            };

            let mut entries: Vec<(u64, FileType, String)> = vec![
                (ino, FileType::Directory, ".".to_string()),
                (dir.parent_id(), FileType::Directory, "..".to_string()),
            ];
            entries.extend(
                children
                    .into_iter()
                    .map(|e| (e.id, file_type(e.kind), e.name)),
            );

            for (i, (e_ino, kind, name)) in entries.iter().enumerate().skip(start) {
                if reply.add(*e_ino, (i + 1) as i64, *kind, name) {
                    break;
                }
            }
            reply.ok();
        }

        fn open(&mut self, _req: &Request, ino: u64, flags: i32, reply: ReplyOpen) {
            let node: INode = match self.inodes.get(ino) {
                Some(n) => n,
                None => {
                    reply.error(libc::ENOENT);
                    return;
                }
            };

            if node.inode_type() != INodeType::File {
                reply.error(libc::EISDIR);
                return;
            }

            if flags & libc::O_WRONLY != 0 || flags & libc::O_RDWR != 0 {
                reply.error(libc::EROFS);
                return;
            }

            // Content is immutable, so no per-handle state is kept.
            reply.opened(0, 0);
        }

        fn read(
            &mut self,
            _req: &Request,
            ino: u64,
            _fh: u64,
            offset: i64,
            size: u32,
            _flags: i32,
            _lock: Option<u64>,
            reply: ReplyData,
        ) {
            if offset < 0 {
                reply.error(libc::EINVAL);
                return;
            }
            match self.inodes.get_as_file(ino) {
                Ok(file) => reply.data(&file.read(offset as u64, size)),
                Err(e) => reply.error(errno(&e)),
            }
        }
    }

    /// Mount options derived from VFS options.
    fn mount_options(options: &VfsOptions) -> Vec<MountOption> {
        let mut mount: Vec<MountOption> = vec![
            MountOption::RO,
            MountOption::FSName(options.fs_name.clone()),
        ];
        if options.auto_unmount {
            mount.push(MountOption::AutoUnmount);
        }
        if options.allow_other {
            mount.push(MountOption::AllowOther);
        }
        mount
    }

    /// Mount a read-only BSON filesystem and block until it is unmounted.
    ///
    /// # Arguments
    /// * `fs` - The filesystem to mount
    /// * `mountpoint` - Path to mount at
    pub fn mount(fs: BsonFs, mountpoint: &Path) -> Result<(), VfsError> {
        let options: Vec<MountOption> = mount_options(&fs.options);
        tracing::info!(mountpoint = %mountpoint.display(), "Mounting");
        fuser::mount2(fs, mountpoint, &options).map_err(|e| VfsError::MountFailed(e.to_string()))
    }

    /// Spawn a read-only BSON filesystem mount in the background.
    ///
    /// # Arguments
    /// * `fs` - The filesystem to mount
    /// * `mountpoint` - Path to mount at
    ///
    /// # Returns
    /// Background session handle; dropping it unmounts.
    pub fn spawn_mount(fs: BsonFs, mountpoint: &Path) -> Result<fuser::BackgroundSession, VfsError> {
        let options: Vec<MountOption> = mount_options(&fs.options);
        fuser::spawn_mount2(fs, mountpoint, &options)
            .map_err(|e| VfsError::MountFailed(e.to_string()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::sync::Arc;

        use befuddle_model::DecodeError;

        #[test]
        fn test_errno_mapping() {
            let missing: VfsError = VfsError::NotFound {
                parent: 1,
                name: "z".to_string(),
            };
            assert_eq!(errno(&missing), libc::ENOENT);
            assert_eq!(errno(&VfsError::NotADirectory(2)), libc::ENOTDIR);
            assert_eq!(errno(&VfsError::NotAFile(1)), libc::EISDIR);

            let expansion: VfsError = VfsError::Expansion {
                inode: 3,
                source: Arc::new(DecodeError::UnsupportedType {
                    field: "x".to_string(),
                    tag: 0x42,
                }),
            };
            assert_eq!(errno(&expansion), libc::EIO);
        }

        #[test]
        fn test_listing_start() {
            assert_eq!(listing_start(0), Ok(0));
            assert_eq!(listing_start(3), Ok(3));
            assert_eq!(listing_start(-1), Err(libc::EINVAL));
            assert_eq!(listing_start(i64::MIN), Err(libc::EINVAL));
        }

        #[test]
        fn test_mount_options() {
            let options: VfsOptions = VfsOptions::default()
                .with_fs_name("dump")
                .with_allow_other(true);
            let mount: Vec<MountOption> = mount_options(&options);
            assert!(mount.contains(&MountOption::RO));
            assert!(mount.contains(&MountOption::FSName("dump".to_string())));
            assert!(mount.contains(&MountOption::AutoUnmount));
            assert!(mount.contains(&MountOption::AllowOther));
        }
    }
}

#[cfg(feature = "fuse")]
pub use impl_fuse::{errno, mount, spawn_mount, BsonFs};

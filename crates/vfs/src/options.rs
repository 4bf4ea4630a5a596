//! Configuration options for the BSON VFS.

use std::time::Duration;

/// How the input buffer is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// The whole buffer is one document; its fields sit at the root.
    Single,
    /// Concatenated length-prefixed documents (mongodump output); each
    /// document is a root directory named by its index.
    #[default]
    Dump,
}

/// Options controlling how the tree is built and mounted.
#[derive(Debug, Clone)]
pub struct VfsOptions {
    /// Input framing.
    pub input_mode: InputMode,
    /// TTL the kernel may cache attributes and entries for.
    pub attr_ttl: Duration,
    /// Filesystem name shown in the mount table.
    pub fs_name: String,
    /// Let users other than the mounting user access the mount.
    pub allow_other: bool,
    /// Unmount automatically when the process exits.
    pub auto_unmount: bool,
}

impl Default for VfsOptions {
    fn default() -> Self {
        Self {
            input_mode: InputMode::default(),
            attr_ttl: Duration::from_secs(1),
            fs_name: "befuddle".to_string(),
            allow_other: false,
            auto_unmount: true,
        }
    }
}

impl VfsOptions {
    /// Set the input framing.
    ///
    /// # Arguments
    /// * `input_mode` - Single document or document stream
    pub fn with_input_mode(mut self, input_mode: InputMode) -> Self {
        self.input_mode = input_mode;
        self
    }

    /// Set the kernel attribute cache TTL.
    pub fn with_attr_ttl(mut self, attr_ttl: Duration) -> Self {
        self.attr_ttl = attr_ttl;
        self
    }

    /// Set the filesystem name.
    pub fn with_fs_name(mut self, fs_name: impl Into<String>) -> Self {
        self.fs_name = fs_name.into();
        self
    }

    pub fn with_allow_other(mut self, allow_other: bool) -> Self {
        self.allow_other = allow_other;
        self
    }

    pub fn with_auto_unmount(mut self, auto_unmount: bool) -> Self {
        self.auto_unmount = auto_unmount;
        self
    }
}

//! Builder for constructing the VFS tree from BSON input.

use std::path::Path;

use befuddle_model::{decode_single, decode_stream, NamedValue, TypedValue};
use bytes::Bytes;

use crate::error::VfsError;
use crate::inode::{DirSource, INodeManager};
use crate::options::{InputMode, VfsOptions};

/// Build an INodeManager from an input buffer.
///
/// Framing is checked here, before anything is mounted; a framing error
/// fails the whole build. Field decoding is deferred until directories are
/// first visited.
///
/// # Arguments
/// * `buf` - Input bytes; owned by the tree for its lifetime
/// * `options` - Selects single-document or stream framing
///
/// # Returns
/// An INodeManager with a collapsed root.
pub fn build_tree(buf: Bytes, options: &VfsOptions) -> Result<INodeManager, VfsError> {
    let source: DirSource = match options.input_mode {
        InputMode::Single => {
            let doc: TypedValue = decode_single(&buf)?;
            DirSource::Container(doc)
        }
        InputMode::Dump => {
            let docs: Vec<NamedValue> = decode_stream(&buf)?;
            DirSource::Fields(docs)
        }
    };

    tracing::info!(
        bytes = buf.len(),
        mode = ?options.input_mode,
        "Built BSON tree"
    );
    Ok(INodeManager::new(source))
}

/// Read a file and build its tree.
///
/// # Arguments
/// * `path` - BSON file to load
/// * `options` - VFS options
pub fn load_file(path: &Path, options: &VfsOptions) -> Result<INodeManager, VfsError> {
    let data: Vec<u8> = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "Read input file");
    build_tree(Bytes::from(data), options)
}

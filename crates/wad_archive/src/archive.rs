//! The archive façade consumed by filesystem adapters and tools.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{instrument, warn};

use crate::build::build_tree;
use crate::error::Result;
use crate::read::{load_lump_data, read_descriptors, read_header};
use crate::tree::WadTree;
use crate::write::{emit_tree, write_archive};

/// A WAD archive held as a mutable directory tree.
///
/// Loading parses the descriptor table into a tree and materialises every
/// lump's bytes. All queries and mutations run against the in-memory tree;
/// the source file stays open only so the serializer can re-read lumps
/// whose resident copy could not be loaded. The archive is written back in
/// full when the value is dropped; [`WadArchive::flush`] does the same on
/// demand.
///
/// Queries return `None` where a missing path, a kind mismatch or a bad
/// argument would have been a `-1` sentinel in a C surface; mutators are
/// silent no-ops on rule violations, and callers detect failure by
/// re-querying.
///
/// ```no_run
/// fn shout(path: &str) -> wad_archive::error::Result<()> {
///     let mut wad = wad_archive::WadArchive::load(path)?;
///     wad.create_file("/HELLO");
///     wad.write_at("/HELLO", b"hello", 0);
///     // dropping `wad` saves the archive
///     Ok(())
/// }
/// ```
///
/// The archive is not internally synchronized; callers that share it across
/// threads must provide their own mutual exclusion.
pub struct WadArchive {
    path: PathBuf,
    source: File,
    magic: [u8; 4],
    tree: WadTree,
}

impl WadArchive {
    /// Open and parse an archive.
    ///
    /// Fails only when the file cannot be opened. Header or table corruption
    /// degrades to the recoverable part of the tree instead of an error.
    #[instrument(skip_all, err)]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut source = File::open(&path)?;

        let header = read_header(&mut source);
        let descriptors = read_descriptors(&mut source, &header);
        let mut tree = build_tree(&descriptors);
        load_lump_data(&mut tree, &mut source);

        Ok(Self {
            path,
            source,
            magic: header.magic,
            tree,
        })
    }

    /// The archive's 4-byte identifier as text, or `""` when the header was
    /// unreadable.
    pub fn magic(&self) -> String {
        String::from_utf8_lossy(&self.magic)
            .trim_end_matches('\0')
            .to_string()
    }

    /// Whether `path` names a content lump.
    pub fn is_content(&self, path: &str) -> bool {
        self.tree
            .lookup(path)
            .is_some_and(|id| !self.tree.node(id).is_directory())
    }

    /// Whether `path` names a directory. The empty path is never one.
    pub fn is_directory(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        self.tree
            .lookup(path)
            .is_some_and(|id| self.tree.node(id).is_directory())
    }

    /// Byte length of a content lump, or `None` for a missing path or a
    /// directory.
    pub fn size_of(&self, path: &str) -> Option<u64> {
        let id = self.tree.lookup(path)?;
        let node = self.tree.node(id);
        if node.is_directory() {
            return None;
        }
        Some(node.length as u64)
    }

    /// Copy bytes from a lump's resident buffer starting at `offset`.
    ///
    /// Returns the number of bytes copied, `Some(0)` once `offset` is past
    /// the end of the buffer, and `None` for an empty destination, a missing
    /// path or a directory.
    pub fn read_at(&self, path: &str, buf: &mut [u8], offset: u64) -> Option<usize> {
        if buf.is_empty() {
            return None;
        }
        let id = self.tree.lookup(path)?;
        let node = self.tree.node(id);
        if node.is_directory() {
            return None;
        }

        let Ok(start) = usize::try_from(offset) else {
            return Some(0);
        };
        if start >= node.data.len() {
            return Some(0);
        }
        let count = buf.len().min(node.data.len() - start);
        buf[..count].copy_from_slice(&node.data[start..start + count]);
        Some(count)
    }

    /// Clean names of a directory's children, in insertion order, or `None`
    /// for the empty path, a missing path or a content lump.
    pub fn read_dir(&self, path: &str) -> Option<Vec<String>> {
        if path.is_empty() {
            return None;
        }
        let id = self.tree.lookup(path)?;
        let node = self.tree.node(id);
        if !node.is_directory() {
            return None;
        }
        Some(
            node.children
                .iter()
                .map(|&child| self.tree.node(child).name.clean().to_string())
                .collect(),
        )
    }

    /// Every indexed absolute path, in creation order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.tree.paths()
    }

    /// Create the directory at `path`; rule violations are silent no-ops.
    pub fn create_directory(&mut self, path: &str) {
        self.tree.create_directory(path);
    }

    /// Create an empty file at `path`; rule violations are silent no-ops.
    pub fn create_file(&mut self, path: &str) {
        self.tree.create_file(path);
    }

    /// Fill an empty content lump with bytes at `offset`.
    ///
    /// Returns `None` for the empty path, a missing path or a directory;
    /// `Some(0)` when the lump already carries data (lumps accept a single
    /// write) or when `buf` is empty; otherwise the number of bytes written.
    pub fn write_at(&mut self, path: &str, buf: &[u8], offset: u64) -> Option<usize> {
        if path.is_empty() {
            return None;
        }
        self.tree.write_to_file(path, buf, offset)
    }

    /// Serialize the tree and rewrite the archive file in place.
    #[instrument(skip(self), err)]
    pub fn flush(&mut self) -> Result<()> {
        let (descriptors, data) = emit_tree(&self.tree, Some(&mut self.source));
        let mut out = File::create(&self.path)?;
        write_archive(self.magic, &descriptors, &data, &mut out)?;
        Ok(())
    }
}

impl Drop for WadArchive {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            warn!(%err, path = %self.path.display(), "failed to save archive on drop");
        }
    }
}

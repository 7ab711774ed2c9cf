//! Virtual file system abstraction.
//!
//! Shell handlers never touch a concrete filesystem. On device the VFS is
//! backed by internal flash plus the SD card mounted at `/sd`; on desktop and
//! in tests it is [`MemoryVfs`].

mod memory;

pub use memory::MemoryVfs;

use orchid_types::error::Result;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry returned by [`Vfs::readdir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfsEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
}

/// Metadata returned by [`Vfs::stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VfsMetadata {
    pub kind: EntryKind,
    pub size: u64,
}

/// File system operations available to shell handlers.
///
/// Paths are absolute; callers resolve relative input against the working
/// directory with [`resolve_path`] first.
pub trait Vfs {
    /// List the direct children of a directory, sorted by name.
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>>;

    /// Read a whole file.
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Create or overwrite a file. The parent directory must exist.
    fn write(&mut self, path: &str, data: &[u8]) -> Result<()>;

    /// Entry metadata.
    fn stat(&self, path: &str) -> Result<VfsMetadata>;

    /// Create a directory (and any missing parents).
    fn mkdir(&mut self, path: &str) -> Result<()>;

    /// Remove a file or an empty directory.
    fn remove(&mut self, path: &str) -> Result<()>;

    /// Move a file or directory (with its contents) to a new path.
    fn rename(&mut self, from: &str, to: &str) -> Result<()>;

    /// Whether a path exists.
    fn exists(&self, path: &str) -> bool;
}

/// Resolve `input` against `cwd`, collapsing `.` and `..` components.
pub fn resolve_path(cwd: &str, input: &str) -> String {
    let raw = if input.starts_with('/') {
        input.to_string()
    } else {
        format!("{cwd}/{input}")
    };

    let mut parts: Vec<&str> = Vec::new();
    for component in raw.split('/') {
        match component {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

//! In-memory VFS used on desktop and in tests.

use std::collections::BTreeMap;

use orchid_types::error::{OrchidError, Result};

use crate::{EntryKind, Vfs, VfsEntry, VfsMetadata, resolve_path};

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Dir,
}

impl Node {
    fn kind(&self) -> EntryKind {
        match self {
            Node::File(_) => EntryKind::File,
            Node::Dir => EntryKind::Directory,
        }
    }

    fn size(&self) -> u64 {
        match self {
            Node::File(data) => data.len() as u64,
            Node::Dir => 0,
        }
    }
}

/// A file tree held in a sorted map keyed by normalized absolute path.
#[derive(Debug)]
pub struct MemoryVfs {
    nodes: BTreeMap<String, Node>,
}

impl MemoryVfs {
    /// Create a VFS containing only the root directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Self { nodes }
    }

    /// Paths strictly below `dir`, in sorted order.
    fn descendants<'a>(&'a self, dir: &str) -> impl Iterator<Item = (&'a String, &'a Node)> + 'a {
        let prefix = child_prefix(dir);
        self.nodes
            .range(prefix.clone()..)
            .take_while(move |(k, _)| k.starts_with(&prefix))
    }

    fn require_parent(&self, path: &str) -> Result<()> {
        let par = parent(path);
        match self.nodes.get(par) {
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(OrchidError::Vfs(format!("not a directory: {par}"))),
            None => Err(OrchidError::Vfs(format!(
                "parent directory does not exist: {par}"
            ))),
        }
    }
}

impl Default for MemoryVfs {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(path: &str) -> String {
    resolve_path("/", path)
}

fn child_prefix(dir: &str) -> String {
    if dir == "/" {
        "/".to_string()
    } else {
        format!("{dir}/")
    }
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(i) => &path[..i],
    }
}

impl Vfs for MemoryVfs {
    fn readdir(&self, path: &str) -> Result<Vec<VfsEntry>> {
        let path = normalize(path);
        match self.nodes.get(&path) {
            Some(Node::Dir) => {},
            Some(Node::File(_)) => {
                return Err(OrchidError::Vfs(format!("not a directory: {path}")));
            },
            None => return Err(OrchidError::Vfs(format!("no such directory: {path}"))),
        }
        let prefix = child_prefix(&path);
        Ok(self
            .descendants(&path)
            .filter_map(|(key, node)| {
                let rest = &key[prefix.len()..];
                (!rest.is_empty() && !rest.contains('/')).then(|| VfsEntry {
                    name: rest.to_string(),
                    kind: node.kind(),
                    size: node.size(),
                })
            })
            .collect())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let path = normalize(path);
        match self.nodes.get(&path) {
            Some(Node::File(data)) => Ok(data.clone()),
            Some(Node::Dir) => Err(OrchidError::Vfs(format!("is a directory: {path}"))),
            None => Err(OrchidError::Vfs(format!("no such file: {path}"))),
        }
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<()> {
        let path = normalize(path);
        if let Some(Node::Dir) = self.nodes.get(&path) {
            return Err(OrchidError::Vfs(format!("is a directory: {path}")));
        }
        self.require_parent(&path)?;
        self.nodes.insert(path, Node::File(data.to_vec()));
        Ok(())
    }

    fn stat(&self, path: &str) -> Result<VfsMetadata> {
        let path = normalize(path);
        self.nodes
            .get(&path)
            .map(|node| VfsMetadata {
                kind: node.kind(),
                size: node.size(),
            })
            .ok_or_else(|| OrchidError::Vfs(format!("no such path: {path}")))
    }

    fn mkdir(&mut self, path: &str) -> Result<()> {
        let path = normalize(path);
        match self.nodes.get(&path) {
            Some(Node::Dir) => return Ok(()),
            Some(Node::File(_)) => return Err(OrchidError::Vfs(format!("file exists: {path}"))),
            None => {},
        }
        let par = parent(&path).to_string();
        if !self.nodes.contains_key(&par) {
            self.mkdir(&par)?;
        }
        self.require_parent(&path)?;
        self.nodes.insert(path, Node::Dir);
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<()> {
        let path = normalize(path);
        if path == "/" {
            return Err(OrchidError::Vfs("cannot remove root".to_string()));
        }
        match self.nodes.get(&path) {
            Some(Node::Dir) if self.descendants(&path).next().is_some() => {
                return Err(OrchidError::Vfs(format!("directory not empty: {path}")));
            },
            Some(_) => {},
            None => return Err(OrchidError::Vfs(format!("no such path: {path}"))),
        }
        self.nodes.remove(&path);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        let from = normalize(from);
        let to = normalize(to);
        if from == "/" {
            return Err(OrchidError::Vfs("cannot rename root".to_string()));
        }
        if !self.nodes.contains_key(&from) {
            return Err(OrchidError::Vfs(format!("no such path: {from}")));
        }
        if self.nodes.contains_key(&to) {
            return Err(OrchidError::Vfs(format!("destination exists: {to}")));
        }
        if to.starts_with(&child_prefix(&from)) {
            return Err(OrchidError::Vfs(format!(
                "cannot move {from} into itself"
            )));
        }
        self.require_parent(&to)?;

        let moved: Vec<String> = std::iter::once(from.clone())
            .chain(self.descendants(&from).map(|(k, _)| k.clone()))
            .collect();
        for old in moved {
            if let Some(node) = self.nodes.remove(&old) {
                let new = format!("{to}{}", &old[from.len()..]);
                self.nodes.insert(new, node);
            }
        }
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.nodes.contains_key(&normalize(path))
    }
}

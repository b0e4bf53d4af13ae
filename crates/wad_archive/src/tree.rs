//! Mutable directory tree over the archive, with its path index.

use indexmap::IndexMap;
use tracing::instrument;

use crate::types::{is_map_marker, LumpName};

/// Handle to a node stored in a [`WadTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Directory,
    Content,
}

/// A directory or content lump in the tree view of the archive.
#[derive(Debug)]
pub(crate) struct Node {
    /// Stored name: `_START` suffix retained for namespace directories, map
    /// markers and lump names verbatim. Root carries the empty name.
    pub name: LumpName,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    /// Children in insertion order; emission order on save.
    pub children: Vec<NodeId>,
    /// Byte range in the source archive, for content parsed from it.
    pub offset: u32,
    pub length: u32,
    /// Resident bytes; authoritative once loaded or written to.
    pub data: Vec<u8>,
}

impl Node {
    pub fn directory(name: LumpName) -> Self {
        Self {
            name,
            kind: NodeKind::Directory,
            parent: None,
            children: Vec::new(),
            offset: 0,
            length: 0,
            data: Vec::new(),
        }
    }

    pub fn content(name: LumpName, offset: u32, length: u32) -> Self {
        Self {
            name,
            kind: NodeKind::Content,
            parent: None,
            children: Vec::new(),
            offset,
            length,
            data: Vec::new(),
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// Arena-backed node graph plus the index of clean absolute paths.
///
/// Nodes are never removed; parent links are plain arena handles, so upward
/// walks never fight the ownership of the child lists.
#[derive(Debug)]
pub(crate) struct WadTree {
    nodes: Vec<Node>,
    paths: IndexMap<String, NodeId>,
}

impl WadTree {
    pub fn new() -> Self {
        let mut paths = IndexMap::new();
        paths.insert("/".to_string(), NodeId(0));
        Self {
            nodes: vec![Node::directory(LumpName::default())],
            paths,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Ids of every content node, in arena order.
    pub fn content_ids(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| !self.node(id).is_directory())
            .collect()
    }

    /// Every indexed absolute path, in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// Attach `node` under `parent` and index its clean absolute path.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        let path = self.absolute_path(id);
        self.paths.insert(path, id);
        id
    }

    /// Clean absolute path of a node; empty-name components are skipped.
    pub fn absolute_path(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(cursor) = current {
            if cursor == self.root() {
                break;
            }
            let node = self.node(cursor);
            let clean = node.name.clean();
            if !clean.is_empty() {
                parts.push(clean);
            }
            current = node.parent;
        }
        if parts.is_empty() {
            return "/".to_string();
        }
        parts.reverse();
        format!("/{}", parts.join("/"))
    }

    pub fn lookup(&self, path: &str) -> Option<NodeId> {
        self.paths.get(&normalize(path)).copied()
    }

    fn find_child_dir(&self, parent: NodeId, clean: &str) -> Option<NodeId> {
        self.node(parent).children.iter().copied().find(|&child| {
            let node = self.node(child);
            node.is_directory() && node.name.clean() == clean
        })
    }

    fn find_child(&self, parent: NodeId, clean: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).name.clean() == clean)
    }

    /// Create the directory at `path`.
    ///
    /// Rule violations leave the tree untouched: every component before the
    /// last must already exist as a directory, no component on the chain may
    /// have the map marker shape, and the new name is capped at 2 characters.
    #[instrument(skip(self))]
    pub fn create_directory(&mut self, path: &str) {
        let parts = tokenize(path);
        let Some((last, ancestors)) = parts.split_last() else {
            return;
        };

        let mut parent = self.root();
        for component in ancestors {
            if is_map_marker(component) {
                return;
            }
            match self.find_child_dir(parent, component) {
                Some(next) => parent = next,
                None => return,
            }
        }

        if is_map_marker(last) || last.len() > 2 {
            return;
        }
        if self.find_child_dir(parent, last).is_some() {
            // already present, nothing to create
            return;
        }
        if self.find_child(parent, last).is_some() {
            // a content sibling holds the clean name
            return;
        }

        self.add_child(parent, Node::directory(LumpName::new(format!("{last}_START"))));
    }

    /// Create an empty content file at `path`.
    ///
    /// Rule violations leave the tree untouched: the parent must exist and
    /// be a directory outside any map, no sibling may share the clean name,
    /// and the filename must be a non-marker name of at most 8 characters.
    #[instrument(skip(self))]
    pub fn create_file(&mut self, path: &str) {
        let mut parts = tokenize(path);
        let Some(filename) = parts.pop() else {
            return;
        };

        let mut parent = self.root();
        for component in &parts {
            match self.find_child_dir(parent, component) {
                Some(next) => parent = next,
                None => return,
            }
        }

        if self.node(parent).name.is_map_marker() {
            return;
        }
        if self.find_child(parent, &filename).is_some() {
            return;
        }
        if is_map_marker(&filename) || filename.len() > 8 {
            return;
        }

        self.add_child(parent, Node::content(LumpName::new(filename), 0, 0));
    }

    /// Fill an empty content file with bytes at `offset`.
    ///
    /// Lumps that already carry data refuse the write with `Some(0)`: the
    /// archive is append-only for lump content. Gaps below `offset` are
    /// zero-filled.
    #[instrument(skip(self, buf), fields(len = buf.len()))]
    pub fn write_to_file(&mut self, path: &str, buf: &[u8], offset: u64) -> Option<usize> {
        let id = self.lookup(path)?;
        let node = self.node_mut(id);
        if node.is_directory() {
            return None;
        }
        if node.length > 0 {
            return Some(0);
        }
        if buf.is_empty() {
            return Some(0);
        }

        let start = usize::try_from(offset).ok()?;
        let required = start + buf.len();
        if node.data.len() < required {
            node.data.resize(required, 0);
        }
        node.data[start..required].copy_from_slice(buf);
        node.length = node.data.len() as u32;

        Some(buf.len())
    }
}

/// Canonical absolute form: one leading `/`, no repeated or trailing
/// separators (the root stays `/`), `.` and `..` segments discarded.
pub(crate) fn normalize(path: &str) -> String {
    let parts = tokenize(path);
    if parts.is_empty() {
        return "/".to_string();
    }
    format!("/{}", parts.join("/"))
}

pub(crate) fn tokenize(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|part| !part.is_empty() && *part != "." && *part != "..")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::tree::{normalize, tokenize, Node, WadTree};
    use crate::types::LumpName;

    fn tree_with_map() -> WadTree {
        let mut tree = WadTree::new();
        let map = tree.add_child(tree.root(), Node::directory(LumpName::new("E1M1")));
        tree.add_child(map, Node::content(LumpName::new("THINGS"), 12, 4));
        tree
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("//"), "/");
        assert_eq!(normalize("F/A"), "/F/A");
        assert_eq!(normalize("/F//A/"), "/F/A");
        assert_eq!(normalize("/F/./A/.."), "/F/A");
    }

    #[test]
    fn tokenize_discards_dot_segments() {
        assert_eq!(tokenize("/F/./G/../B"), vec!["F", "G", "B"]);
        assert!(tokenize("///").is_empty());
    }

    #[test]
    fn create_directory_accepts_two_character_names() {
        let mut tree = WadTree::new();
        tree.create_directory("/AA");

        let id = tree.lookup("/AA").expect("directory should exist");
        assert!(tree.node(id).is_directory());
        assert_eq!(tree.node(id).name.as_str(), "AA_START");
    }

    #[test]
    fn create_directory_rejects_long_names() {
        let mut tree = WadTree::new();
        tree.create_directory("/AAA");

        assert!(tree.lookup("/AAA").is_none());
    }

    #[test]
    fn create_directory_requires_existing_parents() {
        let mut tree = WadTree::new();
        tree.create_directory("/AA/B/C");

        assert!(tree.lookup("/AA").is_none());
        assert!(tree.lookup("/AA/B/C").is_none());

        tree.create_directory("/AA");
        tree.create_directory("/AA/B");
        tree.create_directory("/AA/B/C");
        assert!(tree.lookup("/AA/B/C").is_some());
    }

    #[test]
    fn create_directory_rejects_map_marker_shapes() {
        let mut tree = tree_with_map();
        tree.create_directory("/E1M1");
        tree.create_directory("/E1M1/AA");
        tree.create_directory("/E2M2");

        assert!(tree.lookup("/E1M1/AA").is_none());
        assert!(tree.lookup("/E2M2").is_none());
        // the loaded map directory itself is still there
        assert!(tree.lookup("/E1M1").is_some());
    }

    #[test]
    fn create_directory_reuses_existing_directories() {
        let mut tree = WadTree::new();
        tree.create_directory("/AA");
        let first = tree.lookup("/AA").unwrap();
        tree.create_directory("/AA");

        assert_eq!(tree.lookup("/AA"), Some(first));
        assert_eq!(tree.node(tree.root()).children.len(), 1);
    }

    #[test]
    fn create_directory_never_shadows_a_file() {
        let mut tree = WadTree::new();
        tree.create_file("/AA");
        let file = tree.lookup("/AA").unwrap();

        tree.create_directory("/AA");
        assert_eq!(tree.lookup("/AA"), Some(file));
        assert!(!tree.node(file).is_directory());
    }

    #[test]
    fn create_file_rules() {
        let mut tree = tree_with_map();
        tree.create_directory("/AA");

        tree.create_file("/AA/DATA");
        assert!(tree.lookup("/AA/DATA").is_some());

        // duplicate clean name
        tree.create_file("/AA/DATA");
        assert_eq!(
            tree.node(tree.lookup("/AA").unwrap()).children.len(),
            1
        );

        // missing parent
        tree.create_file("/BB/DATA");
        assert!(tree.lookup("/BB/DATA").is_none());

        // map directories accept no new children
        tree.create_file("/E1M1/DATA");
        assert!(tree.lookup("/E1M1/DATA").is_none());

        // map marker shape and overlong names are reserved
        tree.create_file("/AA/E1M1");
        assert!(tree.lookup("/AA/E1M1").is_none());
        tree.create_file("/AA/LONGNAME1");
        assert!(tree.lookup("/AA/LONGNAME1").is_none());
        tree.create_file("/AA/LONGNAME");
        assert!(tree.lookup("/AA/LONGNAME").is_some());
    }

    #[test]
    fn create_file_rejects_directory_sibling() {
        let mut tree = WadTree::new();
        tree.create_directory("/AA");
        tree.create_file("/AA");

        let id = tree.lookup("/AA").unwrap();
        assert!(tree.node(id).is_directory());
        assert_eq!(tree.node(tree.root()).children.len(), 1);
    }

    #[test]
    fn write_to_file_fills_gaps_with_zeroes() {
        let mut tree = WadTree::new();
        tree.create_file("/DATA");

        assert_eq!(tree.write_to_file("/DATA", b"xy", 3), Some(2));

        let id = tree.lookup("/DATA").unwrap();
        assert_eq!(tree.node(id).data, b"\0\0\0xy");
        assert_eq!(tree.node(id).length, 5);
    }

    #[test]
    fn write_to_file_is_first_write_only() {
        let mut tree = WadTree::new();
        tree.create_file("/DATA");
        assert_eq!(tree.write_to_file("/DATA", b"abc", 0), Some(3));
        assert_eq!(tree.write_to_file("/DATA", b"XYZ", 0), Some(0));

        let id = tree.lookup("/DATA").unwrap();
        assert_eq!(tree.node(id).data, b"abc");
    }

    #[test]
    fn write_to_file_rejects_directories_and_missing_paths() {
        let mut tree = WadTree::new();
        tree.create_directory("/AA");

        assert_eq!(tree.write_to_file("/AA", b"abc", 0), None);
        assert_eq!(tree.write_to_file("/GONE", b"abc", 0), None);
        assert_eq!(tree.write_to_file("/AA", b"", 0), None);
    }

    #[test]
    fn path_index_matches_tree_walk() {
        let mut tree = WadTree::new();
        tree.create_directory("/AA");
        tree.create_directory("/AA/BB");
        tree.create_file("/AA/BB/DATA");
        tree.write_to_file("/AA/BB/DATA", b"abc", 0);

        for path in tree.paths().map(str::to_string).collect::<Vec<_>>() {
            let indexed = tree.lookup(&path).unwrap();
            assert_eq!(tree.absolute_path(indexed), normalize(&path));

            let mut walked = tree.root();
            for component in tokenize(&path) {
                walked = tree
                    .node(walked)
                    .children
                    .iter()
                    .copied()
                    .find(|&c| tree.node(c).name.clean() == component)
                    .unwrap();
            }
            assert_eq!(walked, indexed);
        }
    }
}

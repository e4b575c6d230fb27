use crate::file_scanner::{self, EntryKind};
use crate::ignore_rules::IgnorePredicate;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionState {
    #[default]
    Unselected,
    Partial,
    FullySelected,
}

impl SelectionState {
    /// Aggregate state of a directory whose children hold `states`.
    ///
    /// Fully selected needs at least one child, so an empty directory
    /// derives to `Unselected`.
    pub fn derive<I>(states: I) -> Self
    where
        I: IntoIterator<Item = SelectionState>,
    {
        let mut total = 0usize;
        let mut full = 0usize;
        let mut any_selected = false;
        for state in states {
            total += 1;
            match state {
                SelectionState::FullySelected => {
                    full += 1;
                    any_selected = true;
                }
                SelectionState::Partial => any_selected = true,
                SelectionState::Unselected => {}
            }
        }
        if total > 0 && full == total {
            SelectionState::FullySelected
        } else if any_selected {
            SelectionState::Partial
        } else {
            SelectionState::Unselected
        }
    }
}

/// Index of a node inside the tree arena.
pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct Node {
    pub path: PathBuf,
    /// Base name for display; lossy for non UTF-8 names.
    pub name: String,
    pub kind: EntryKind,
    pub parent: Option<NodeId>,
    /// Directories first, then files, each sorted by name.
    pub children: Vec<NodeId>,
    pub depth: usize,
}

impl Node {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// In-memory directory subtree with a tri-state selection per node.
///
/// Nodes live in an arena in depth-first discovery order (node 0 is the
/// root) and are never added or removed after [`SelectionTree::build`].
/// After every mutation each directory with children holds the state
/// derived from its children. A directory with no children keeps whatever
/// was assigned to it explicitly (`Unselected` or `FullySelected`).
#[derive(Debug, Clone)]
pub struct SelectionTree {
    nodes: Vec<Node>,
    states: Vec<SelectionState>,
    index: HashMap<PathBuf, NodeId>,
}

impl SelectionTree {
    pub const ROOT: NodeId = 0;

    /// Walks the whole subtree below `root`, creating one unselected node per
    /// entry the ignore predicate lets through.
    pub fn build(root: &Path, ignore: &IgnorePredicate) -> Self {
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());

        let mut tree = SelectionTree {
            nodes: Vec::new(),
            states: Vec::new(),
            index: HashMap::new(),
        };
        let root_id = tree.push_node(root, name, EntryKind::Directory, None, 0);
        tree.discover(root_id, ignore, &mut HashSet::new());

        debug!(
            event = "tree.build.completed",
            root = %tree.root().display(),
            nodes = tree.nodes.len()
        );
        tree
    }

    fn push_node(
        &mut self,
        path: PathBuf,
        name: String,
        kind: EntryKind,
        parent: Option<NodeId>,
        depth: usize,
    ) -> NodeId {
        let id = self.nodes.len();
        self.index.insert(path.clone(), id);
        self.nodes.push(Node {
            path,
            name,
            kind,
            parent,
            children: Vec::new(),
            depth,
        });
        self.states.push(SelectionState::Unselected);
        if let Some(parent_id) = parent {
            self.nodes[parent_id].children.push(id);
        }
        id
    }

    /// `linked` holds the canonical targets of file links already given a
    /// node, so each file outside the root is reachable through one key only.
    fn discover(
        &mut self,
        dir_id: NodeId,
        ignore: &IgnorePredicate,
        linked: &mut HashSet<PathBuf>,
    ) {
        let dir_path = self.nodes[dir_id].path.clone();
        let depth = self.nodes[dir_id].depth + 1;
        for entry in file_scanner::list_children(&dir_path, ignore) {
            if let Some(target) = &entry.link_target {
                // A target under the root gets (or was denied) its own node.
                if target.starts_with(self.root()) || !linked.insert(target.clone()) {
                    debug!(
                        event = "tree.link.duplicate_skipped",
                        path = %dir_path.join(&entry.name).display(),
                        target = %target.display()
                    );
                    continue;
                }
            }
            let name = entry.name.to_string_lossy().into_owned();
            let child_id =
                self.push_node(dir_path.join(&entry.name), name, entry.kind, Some(dir_id), depth);
            if entry.kind == EntryKind::Directory {
                self.discover(child_id, ignore, linked);
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.nodes[Self::ROOT].path
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate()
    }

    pub fn id_of(&self, path: &Path) -> Option<NodeId> {
        self.index.get(path).copied()
    }

    /// State of `path`; `Unselected` when the path has no node.
    pub fn get_state(&self, path: &Path) -> SelectionState {
        self.id_of(path)
            .map(|id| self.state_of(id))
            .unwrap_or_default()
    }

    pub fn state_of(&self, id: NodeId) -> SelectionState {
        self.states.get(id).copied().unwrap_or_default()
    }

    /// Assigns `new_state` to `path`, pushes it down to every descendant of a
    /// directory, then re-derives the ancestors. Unknown paths are a no-op.
    ///
    /// `Partial` is derived only and is never accepted from callers.
    pub fn set_state(&mut self, path: &Path, new_state: SelectionState) {
        match self.id_of(path) {
            Some(id) => self.set_state_of(id, new_state),
            None => debug!(event = "tree.set_state.unknown_path", path = %path.display()),
        }
    }

    pub fn set_state_of(&mut self, id: NodeId, new_state: SelectionState) {
        if id >= self.nodes.len() {
            return;
        }
        if new_state == SelectionState::Partial {
            debug!(
                event = "tree.set_state.partial_rejected",
                path = %self.nodes[id].path.display()
            );
            return;
        }

        self.states[id] = new_state;
        if self.nodes[id].is_dir() {
            self.propagate_down(id, new_state);
        }
        self.update_ancestors(id);
    }

    /// Unselected or partial becomes fully selected; fully selected becomes
    /// unselected.
    pub fn toggle(&mut self, path: &Path) {
        if let Some(id) = self.id_of(path) {
            self.toggle_of(id);
        }
    }

    fn toggle_of(&mut self, id: NodeId) {
        let next = match self.state_of(id) {
            SelectionState::Unselected | SelectionState::Partial => SelectionState::FullySelected,
            SelectionState::FullySelected => SelectionState::Unselected,
        };
        self.set_state_of(id, next);
    }

    fn propagate_down(&mut self, id: NodeId, state: SelectionState) {
        let mut pending = self.nodes[id].children.clone();
        while let Some(child) = pending.pop() {
            self.states[child] = state;
            pending.extend(self.nodes[child].children.iter().copied());
        }
    }

    fn derived_state(&self, dir_id: NodeId) -> SelectionState {
        SelectionState::derive(self.nodes[dir_id].children.iter().map(|&c| self.states[c]))
    }

    fn update_ancestors(&mut self, id: NodeId) {
        let mut current = self.nodes[id].parent;
        while let Some(parent_id) = current {
            let derived = self.derived_state(parent_id);
            if derived == self.states[parent_id] {
                // Nothing above can change either.
                break;
            }
            self.states[parent_id] = derived;
            current = self.nodes[parent_id].parent;
        }
    }

    /// Re-seeds selections from root-relative, `/`-separated paths saved by
    /// an earlier session, as written from [`SelectionTree::collect_persisted`].
    /// Paths with no node are skipped silently. A saved directory is only
    /// reapplied while it is still empty.
    ///
    /// Returns how many saved paths were applied.
    pub fn restore<S: AsRef<str>>(&mut self, saved_relative_paths: &[S]) -> usize {
        let mut restored = 0;
        for rel in saved_relative_paths {
            let rel = rel.as_ref();
            let Some(path) = self.resolve_relative(rel) else {
                continue;
            };
            let non_empty_dir = self
                .id_of(&path)
                .and_then(|id| self.node(id))
                .map(|node| node.is_dir() && !node.children.is_empty());
            match non_empty_dir {
                Some(true) => debug!(event = "tree.restore.non_empty_dir_skipped", path = rel),
                Some(false) => {
                    self.set_state(&path, SelectionState::FullySelected);
                    restored += 1;
                }
                None => debug!(event = "tree.restore.stale_path", path = rel),
            }
        }
        restored
    }

    fn resolve_relative(&self, rel: &str) -> Option<PathBuf> {
        let mut path = self.root().to_path_buf();
        let mut any = false;
        for part in rel.split('/').filter(|p| !p.is_empty() && *p != ".") {
            if part == ".." {
                return None;
            }
            path.push(part);
            any = true;
        }
        any.then_some(path)
    }

    /// Root-relative, `/`-separated form of `path`, or `None` when it lies
    /// outside the root or is the root itself.
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(self.root()).ok()?;
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    /// Every fully selected file, in discovery order. Directories are never
    /// included.
    pub fn collect_selected_files(&self) -> Vec<PathBuf> {
        self.nodes
            .iter()
            .zip(&self.states)
            .filter(|(node, state)| !node.is_dir() && **state == SelectionState::FullySelected)
            .map(|(node, _)| node.path.clone())
            .collect()
    }

    /// What a session saves: every fully selected file plus every fully
    /// selected empty directory, in discovery order.
    pub fn collect_persisted(&self) -> Vec<PathBuf> {
        self.nodes
            .iter()
            .zip(&self.states)
            .filter(|(node, state)| {
                **state == SelectionState::FullySelected
                    && (!node.is_dir() || node.children.is_empty())
            })
            .map(|(node, _)| node.path.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    use SelectionState::{FullySelected, Partial, Unselected};

    /// root/
    ///   docs/        (a.md, b.md)
    ///   empty/
    ///   src/
    ///     nested/    (deep.rs)
    ///     lib.rs
    ///     main.rs
    ///   README.md
    fn fixture() -> (TempDir, SelectionTree) {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("docs/a.md"), "a").unwrap();
        fs::write(root.join("docs/b.md"), "b").unwrap();
        fs::write(root.join("src/nested/deep.rs"), "").unwrap();
        fs::write(root.join("src/lib.rs"), "").unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        let tree = SelectionTree::build(root, &IgnorePredicate::empty());
        (dir, tree)
    }

    fn p(tree: &SelectionTree, rel: &str) -> PathBuf {
        tree.root().join(rel)
    }

    fn rel_selected(tree: &SelectionTree) -> Vec<String> {
        tree.collect_selected_files()
            .iter()
            .filter_map(|f| tree.relative_path(f))
            .collect()
    }

    fn assert_consistent(tree: &SelectionTree) {
        for (id, node) in tree.nodes() {
            if !node.is_dir() {
                continue;
            }
            let state = tree.state_of(id);
            if node.children.is_empty() {
                assert_ne!(state, Partial, "empty dir {} is partial", node.path.display());
            } else {
                assert_eq!(
                    state,
                    tree.derived_state(id),
                    "dir {} disagrees with its children",
                    node.path.display()
                );
            }
        }
    }

    #[test]
    fn derive_covers_every_shape() {
        assert_eq!(SelectionState::derive(std::iter::empty()), Unselected);
        assert_eq!(SelectionState::derive([Unselected, Unselected]), Unselected);
        assert_eq!(SelectionState::derive([FullySelected, FullySelected]), FullySelected);
        assert_eq!(SelectionState::derive([FullySelected, Unselected]), Partial);
        assert_eq!(SelectionState::derive([Partial, Partial]), Partial);
        assert_eq!(SelectionState::derive([Unselected, Partial]), Partial);
    }

    #[test]
    fn build_orders_directories_first_depth_first() {
        let (_dir, tree) = fixture();
        let order: Vec<String> = tree
            .nodes()
            .skip(1)
            .filter_map(|(_, n)| tree.relative_path(&n.path))
            .collect();
        assert_eq!(
            order,
            vec![
                "docs",
                "docs/a.md",
                "docs/b.md",
                "empty",
                "src",
                "src/nested",
                "src/nested/deep.rs",
                "src/lib.rs",
                "src/main.rs",
                "README.md",
            ]
        );
        assert!(tree.nodes().all(|(id, _)| tree.state_of(id) == Unselected));
        assert_eq!(tree.node(SelectionTree::ROOT).map(|n| n.depth), Some(0));
    }

    #[test]
    fn unknown_paths_default_to_unselected_and_ignore_mutation() {
        let (_dir, mut tree) = fixture();
        let ghost = p(&tree, "nope.txt");
        assert_eq!(tree.get_state(&ghost), Unselected);
        tree.set_state(&ghost, FullySelected);
        tree.toggle(&ghost);
        assert!(tree.collect_selected_files().is_empty());
    }

    #[test]
    fn selecting_a_directory_selects_descendants() {
        let (_dir, mut tree) = fixture();
        let docs = p(&tree, "docs");
        tree.set_state(&docs, FullySelected);

        assert_eq!(tree.get_state(&p(&tree, "docs/a.md")), FullySelected);
        assert_eq!(tree.get_state(&p(&tree, "docs/b.md")), FullySelected);
        assert_eq!(tree.get_state(&docs), FullySelected);
        assert_eq!(tree.get_state(tree.root()), Partial);

        tree.set_state(&p(&tree, "docs/a.md"), Unselected);
        assert_eq!(tree.get_state(&docs), Partial);
        assert_consistent(&tree);
    }

    #[test]
    fn deep_selection_bubbles_to_the_root() {
        let (_dir, mut tree) = fixture();
        tree.toggle(&p(&tree, "src/nested/deep.rs"));
        assert_eq!(tree.get_state(&p(&tree, "src/nested")), FullySelected);
        assert_eq!(tree.get_state(&p(&tree, "src")), Partial);
        assert_eq!(tree.get_state(tree.root()), Partial);

        tree.toggle(&p(&tree, "src/nested/deep.rs"));
        assert_eq!(tree.get_state(&p(&tree, "src")), Unselected);
        assert_eq!(tree.get_state(tree.root()), Unselected);
    }

    #[test]
    fn completing_every_child_makes_parent_fully_selected() {
        let (_dir, mut tree) = fixture();
        tree.toggle(&p(&tree, "docs/a.md"));
        assert_eq!(tree.get_state(&p(&tree, "docs")), Partial);
        tree.toggle(&p(&tree, "docs/b.md"));
        assert_eq!(tree.get_state(&p(&tree, "docs")), FullySelected);
    }

    #[test]
    fn toggling_a_partial_directory_selects_everything_below() {
        let (_dir, mut tree) = fixture();
        tree.toggle(&p(&tree, "src/lib.rs"));
        assert_eq!(tree.get_state(&p(&tree, "src")), Partial);

        tree.toggle(&p(&tree, "src"));
        assert_eq!(tree.get_state(&p(&tree, "src")), FullySelected);
        assert_eq!(tree.get_state(&p(&tree, "src/nested/deep.rs")), FullySelected);

        tree.toggle(&p(&tree, "src"));
        assert_eq!(tree.get_state(&p(&tree, "src/lib.rs")), Unselected);
        assert_consistent(&tree);
    }

    #[test]
    fn partial_is_never_accepted_directly() {
        let (_dir, mut tree) = fixture();
        tree.set_state(&p(&tree, "docs"), Partial);
        tree.set_state(&p(&tree, "README.md"), Partial);
        assert_eq!(tree.get_state(&p(&tree, "docs")), Unselected);
        assert_eq!(tree.get_state(&p(&tree, "README.md")), Unselected);
    }

    #[test]
    fn setting_fully_selected_twice_is_idempotent() {
        let (_dir, mut tree) = fixture();
        tree.set_state(&p(&tree, "src"), FullySelected);
        let once = tree.states.clone();
        tree.set_state(&p(&tree, "src"), FullySelected);
        assert_eq!(tree.states, once);
    }

    #[test]
    fn empty_directory_keeps_explicit_selection() {
        let (_dir, mut tree) = fixture();
        let empty = p(&tree, "empty");
        assert_eq!(tree.get_state(&empty), Unselected);

        tree.toggle(&empty);
        assert_eq!(tree.get_state(&empty), FullySelected);
        assert_eq!(tree.get_state(tree.root()), Partial);
        assert!(tree.collect_selected_files().is_empty());

        tree.toggle(&empty);
        assert_eq!(tree.get_state(&empty), Unselected);
        assert_eq!(tree.get_state(tree.root()), Unselected);
    }

    #[test]
    fn selecting_root_selects_every_file() {
        let (_dir, mut tree) = fixture();
        let root = tree.root().to_path_buf();
        tree.toggle(&root);
        assert_eq!(
            rel_selected(&tree),
            vec![
                "docs/a.md",
                "docs/b.md",
                "src/nested/deep.rs",
                "src/lib.rs",
                "src/main.rs",
                "README.md",
            ]
        );
        assert_eq!(tree.get_state(&root), FullySelected);
    }

    #[test]
    fn collect_never_returns_directories() {
        let (_dir, mut tree) = fixture();
        tree.set_state(&p(&tree, "docs"), FullySelected);
        let files = tree.collect_selected_files();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.is_file()));
    }

    #[test]
    fn restore_reapplies_saved_files_and_skips_stale_ones() {
        let (_dir, mut tree) = fixture();
        let restored = tree.restore(&["docs/a.md", "src/gone.rs", "", "../escape", "README.md"]);
        assert_eq!(restored, 2);
        assert_eq!(rel_selected(&tree), vec!["docs/a.md", "README.md"]);
        assert_eq!(tree.get_state(&p(&tree, "docs")), Partial);
        assert_consistent(&tree);
    }

    #[test]
    fn restore_matches_manual_selection() {
        let (_dir, mut restored) = fixture();
        restored.restore(&["docs/a.md", "docs/b.md", "src/main.rs"]);

        let mut manual = restored.clone();
        for id in 0..manual.len() {
            manual.states[id] = Unselected;
        }
        for rel in ["docs/a.md", "docs/b.md", "src/main.rs"] {
            let path = p(&manual, rel);
            manual.toggle(&path);
        }
        assert_eq!(restored.states, manual.states);
    }

    #[test]
    fn persisted_selection_includes_selected_empty_directories() {
        let (_dir, mut tree) = fixture();
        let root = tree.root().to_path_buf();
        tree.toggle(&root);
        let persisted: Vec<String> = tree
            .collect_persisted()
            .iter()
            .filter_map(|f| tree.relative_path(f))
            .collect();
        assert_eq!(
            persisted,
            vec![
                "docs/a.md",
                "docs/b.md",
                "empty",
                "src/nested/deep.rs",
                "src/lib.rs",
                "src/main.rs",
                "README.md",
            ]
        );
        assert!(!rel_selected(&tree).contains(&"empty".to_string()));
    }

    #[test]
    fn restoring_persisted_selection_brings_root_back_fully_selected() {
        let (_dir, mut tree) = fixture();
        let root = tree.root().to_path_buf();
        tree.toggle(&root);
        let saved: Vec<String> = tree
            .collect_persisted()
            .iter()
            .filter_map(|f| tree.relative_path(f))
            .collect();

        let mut next = SelectionTree::build(&root, &IgnorePredicate::empty());
        assert_eq!(next.restore(&saved), saved.len());
        assert_eq!(next.get_state(&root), FullySelected);
        assert_eq!(next.get_state(&p(&next, "empty")), FullySelected);
    }

    #[test]
    fn saved_directory_that_gained_entries_is_not_restored() {
        let (dir, _tree) = fixture();
        fs::write(dir.path().join("empty/new.txt"), "").unwrap();
        let mut tree = SelectionTree::build(dir.path(), &IgnorePredicate::empty());

        assert_eq!(tree.restore(&["empty", "README.md"]), 1);
        assert_eq!(rel_selected(&tree), vec!["README.md"]);
        assert_eq!(tree.get_state(&p(&tree, "empty")), Unselected);
    }

    #[cfg(unix)]
    #[test]
    fn file_link_to_a_sibling_does_not_duplicate_it() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        symlink(dir.path().join("a.txt"), dir.path().join("link.txt")).unwrap();
        let mut tree = SelectionTree::build(dir.path(), &IgnorePredicate::empty());

        let root = tree.root().to_path_buf();
        tree.toggle(&root);
        let files = tree.collect_selected_files();
        assert_eq!(rel_selected(&tree), vec!["a.txt"]);

        let mut canonical: Vec<PathBuf> =
            files.iter().map(|f| f.canonicalize().unwrap()).collect();
        canonical.dedup();
        assert_eq!(canonical.len(), files.len());
        assert_eq!(tree.id_of(&root.join("link.txt")), None);
    }

    #[cfg(unix)]
    #[test]
    fn file_links_leaving_the_root_are_kept_once() {
        use std::os::unix::fs::symlink;

        let outside = tempdir().unwrap();
        let target = outside.path().join("shared.txt");
        fs::write(&target, "s").unwrap();

        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        symlink(&target, dir.path().join("sub/two.txt")).unwrap();
        symlink(&target, dir.path().join("one.txt")).unwrap();
        let mut tree = SelectionTree::build(dir.path(), &IgnorePredicate::empty());

        let root = tree.root().to_path_buf();
        tree.toggle(&root);
        // Directories are discovered first, so the link under sub/ wins.
        assert_eq!(rel_selected(&tree), vec!["sub/two.txt"]);
        assert_eq!(tree.id_of(&root.join("one.txt")), None);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_leaves_the_rest_of_the_tree() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, _tree) = fixture();
        let locked = dir.path().join("src/nested");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Privileged users read through mode 000.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut tree = SelectionTree::build(dir.path(), &IgnorePredicate::empty());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let nested = tree.id_of(&p(&tree, "src/nested")).unwrap();
        assert!(tree.node(nested).unwrap().children.is_empty());
        let root = tree.root().to_path_buf();
        tree.toggle(&root);
        assert_eq!(
            rel_selected(&tree),
            vec!["docs/a.md", "docs/b.md", "src/lib.rs", "src/main.rs", "README.md"]
        );
        assert_consistent(&tree);
    }

    #[test]
    fn ignored_entries_have_no_node() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "").unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        let mut tree = SelectionTree::build(dir.path(), &IgnorePredicate::from_patterns(["*.log"]));

        let log = tree.root().join("a.log");
        assert_eq!(tree.id_of(&log), None);
        tree.set_state(&log, FullySelected);
        assert!(tree.collect_selected_files().is_empty());

        let root = tree.root().to_path_buf();
        tree.toggle(&root);
        assert_eq!(rel_selected(&tree), vec!["b.txt"]);
    }

    #[test]
    fn relative_path_uses_forward_slashes() {
        let (_dir, tree) = fixture();
        assert_eq!(
            tree.relative_path(&p(&tree, "src/nested/deep.rs")).as_deref(),
            Some("src/nested/deep.rs")
        );
        assert_eq!(tree.relative_path(tree.root()), None);
        assert_eq!(tree.relative_path(Path::new("/elsewhere")), None);
    }

    mod invariants {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Toggle(usize),
            Select(usize),
            Deselect(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..64).prop_map(Op::Toggle),
                (0usize..64).prop_map(Op::Select),
                (0usize..64).prop_map(Op::Deselect),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn directories_track_children_after_every_operation(
                ops in proptest::collection::vec(op(), 1..40)
            ) {
                let (_dir, mut tree) = fixture();
                for op in ops {
                    match op {
                        Op::Toggle(i) => tree.toggle_of(i % tree.len()),
                        Op::Select(i) => tree.set_state_of(i % tree.len(), FullySelected),
                        Op::Deselect(i) => tree.set_state_of(i % tree.len(), Unselected),
                    }
                    assert_consistent(&tree);
                }
            }
        }
    }
}

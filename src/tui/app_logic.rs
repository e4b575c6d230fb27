use super::app_state::SessionOutcome;
use crate::selection_tree::{NodeId, SelectionTree};
use crate::tree_builder;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct TuiApp {
    pub(super) tree: SelectionTree,
    pub(super) labels: Vec<String>,
    pub(super) expanded: Vec<bool>,
    pub(super) current: NodeId,
    pub(super) scroll_offset: usize,
    pub(super) quit: bool,
    pub(super) outcome: SessionOutcome,
    pub(super) list_viewport_height: usize,
}

impl TuiApp {
    /// Starts with only the root expanded and the cursor on the root.
    pub fn new(tree: SelectionTree) -> Self {
        let labels = tree_builder::build_tree_labels(&tree);
        let mut expanded = vec![false; tree.len()];
        if let Some(root) = expanded.first_mut() {
            *root = true;
        }
        TuiApp {
            tree,
            labels,
            expanded,
            current: SelectionTree::ROOT,
            scroll_offset: 0,
            quit: false,
            outcome: SessionOutcome::Aborted,
            list_viewport_height: 0, // Will be updated by ui_renderer
        }
    }

    pub fn into_parts(self) -> (SelectionTree, SessionOutcome) {
        (self.tree, self.outcome)
    }

    /// Nodes whose ancestors are all expanded, in tree order.
    pub(super) fn visible_node_ids(&self) -> Vec<NodeId> {
        let mut visible = vec![false; self.tree.len()];
        let mut ids = Vec::new();
        for (id, node) in self.tree.nodes() {
            let shown = match node.parent {
                None => true,
                Some(parent) => visible[parent] && self.expanded[parent],
            };
            visible[id] = shown;
            if shown {
                ids.push(id);
            }
        }
        ids
    }

    pub(super) fn move_selection(&mut self, delta: i32) {
        let visible = self.visible_node_ids();
        if visible.is_empty() {
            return;
        }
        let next = match visible.iter().position(|&id| id == self.current) {
            Some(pos) => (pos as i32 + delta).rem_euclid(visible.len() as i32) as usize,
            None if delta > 0 => 0,
            None => visible.len() - 1,
        };
        self.current = visible[next];
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn toggle_current_selection(&mut self) {
        if let Some(path) = self.tree.node(self.current).map(|n| n.path.clone()) {
            self.tree.toggle(&path);
        }
    }

    pub(super) fn set_current_expanded(&mut self, expanded: bool) {
        let is_dir = self.tree.node(self.current).is_some_and(|n| n.is_dir());
        if is_dir {
            self.expanded[self.current] = expanded;
            self.ensure_selection_is_visible_in_viewport();
        } else if !expanded {
            // Collapsing on a file jumps to its directory.
            if let Some(parent) = self.tree.node(self.current).and_then(|n| n.parent) {
                self.current = parent;
                self.ensure_selection_is_visible_in_viewport();
            }
        }
    }

    pub(super) fn toggle_current_expansion(&mut self) {
        let expanded = self.expanded.get(self.current).copied().unwrap_or(false);
        self.set_current_expanded(!expanded);
    }

    pub(super) fn expand_all_directories(&mut self) {
        for (id, node) in self.tree.nodes() {
            if node.is_dir() {
                self.expanded[id] = true;
            }
        }
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn collapse_all_directories(&mut self) {
        for (id, node) in self.tree.nodes() {
            self.expanded[id] = node.is_dir() && node.parent.is_none();
        }
        // Climb until the cursor lands on a depth-1 node or the root.
        while let Some(node) = self.tree.node(self.current) {
            match node.parent {
                Some(parent) if node.depth > 1 => self.current = parent,
                _ => break,
            }
        }
        self.ensure_selection_is_visible_in_viewport();
    }

    pub(super) fn ensure_selection_is_visible_in_viewport(&mut self) {
        let list_height = self.list_viewport_height;
        if list_height == 0 {
            return;
        }
        let visible = self.visible_node_ids();
        let Some(pos) = visible.iter().position(|&id| id == self.current) else {
            self.scroll_offset = 0;
            return;
        };

        if pos < self.scroll_offset {
            self.scroll_offset = pos;
        } else if pos >= self.scroll_offset + list_height {
            self.scroll_offset = pos + 1 - list_height;
        }
        let max_offset = visible.len().saturating_sub(list_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    fn finish(&mut self, outcome: SessionOutcome) {
        self.outcome = outcome;
        self.quit = true;
    }

    pub(super) fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            if key_event.code == KeyCode::Char('c') {
                self.finish(SessionOutcome::Aborted);
            }
            return;
        }
        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('y') => self.finish(SessionOutcome::Confirmed),
            KeyCode::Esc => self.finish(SessionOutcome::Aborted),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current_selection(),
            KeyCode::Char('o') | KeyCode::Tab => self.toggle_current_expansion(),
            KeyCode::Right | KeyCode::Char('l') => self.set_current_expanded(true),
            KeyCode::Left | KeyCode::Char('h') => self.set_current_expanded(false),
            KeyCode::Char('*') => self.expand_all_directories(),
            KeyCode::Char('-') => self.collapse_all_directories(),
            _ => {}
        }
    }
}

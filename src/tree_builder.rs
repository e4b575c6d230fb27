use crate::selection_tree::SelectionTree;

/// Build pretty tree-style labels in **O(n)**, one per node, indexed by
/// `NodeId`.
///
/// Relies on the arena being in depth-first order, so a parent's label is
/// always built before any of its children.
pub fn build_tree_labels(tree: &SelectionTree) -> Vec<String> {
    let n = tree.len();
    let mut labels = Vec::with_capacity(n);
    // child_indent[i] is the prefix inherited by the children of node i.
    let mut child_indent: Vec<String> = Vec::with_capacity(n);

    for (id, node) in tree.nodes() {
        let Some(parent) = node.parent else {
            labels.push("./".to_string());
            child_indent.push(String::new());
            continue;
        };

        let is_last_child = tree
            .node(parent)
            .and_then(|p| p.children.last())
            .is_some_and(|&last| last == id);
        let indent = child_indent.get(parent).cloned().unwrap_or_default();

        let branch = if is_last_child { "└─ " } else { "├─ " };
        let suffix = if node.is_dir() { "/" } else { "" };
        labels.push(format!("{indent}{branch}{}{suffix}", node.name));

        let rail = if is_last_child { "   " } else { "│  " };
        child_indent.push(format!("{indent}{rail}"));
    }
    labels
}

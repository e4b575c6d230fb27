use crate::config::RunConfig;
use crate::formatter::{self, Formatter};
use crate::ignore_rules::IgnorePredicate;
use crate::selection_tree::SelectionTree;
use crate::session_store::{JsonFileStore, SelectionStore};
use crate::tui::{self, SessionOutcome};
use crate::{cli, clipboard, utils};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Builds the tree, re-seeds the last session's selection, and decides what
/// survives once the interactive session is over.
pub struct SelectorController<S: SelectionStore> {
    root: PathBuf,
    ignore: IgnorePredicate,
    store: S,
}

impl<S: SelectionStore> SelectorController<S> {
    pub fn new(root: PathBuf, ignore: IgnorePredicate, store: S) -> Self {
        Self {
            root,
            ignore,
            store,
        }
    }

    /// Build followed by a single restore, before any user input.
    pub fn start(&self) -> SelectionTree {
        let mut tree = SelectionTree::build(&self.root, &self.ignore);
        let saved = self.store.load(tree.root());
        let restored = tree.restore(&saved);
        info!(
            event = "session.start.completed",
            root = %tree.root().display(),
            nodes = tree.len(),
            restored,
            stale = saved.len() - restored
        );
        tree
    }

    /// Selected files on a confirmed session. The selection (files plus
    /// selected empty directories) is persisted for next time. An aborted
    /// session returns nothing and leaves the saved selection alone.
    pub fn finish(&self, tree: &SelectionTree, outcome: SessionOutcome) -> Vec<PathBuf> {
        match outcome {
            SessionOutcome::Aborted => {
                info!(event = "session.aborted");
                Vec::new()
            }
            SessionOutcome::Confirmed => {
                let relative: Vec<String> = tree
                    .collect_persisted()
                    .iter()
                    .filter_map(|p| tree.relative_path(p))
                    .collect();
                self.store.save(tree.root(), &relative);
                tree.collect_selected_files()
            }
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Formats every selected file; binary files get a placeholder.
pub fn render_output(files: &[PathBuf], root: &Path, formatter: &dyn Formatter) -> String {
    let mut pieces = Vec::with_capacity(files.len());
    for path in files {
        let shown = path.strip_prefix(root).unwrap_or(path);
        let shown = shown.to_string_lossy().replace('\\', "/");
        if utils::is_text_file(path) {
            let content = utils::read_file_content(path);
            pieces.push(formatter.format_text_file(&shown, &content));
        } else {
            warn!(event = "output.binary_file", path = %path.display());
            pieces.push(formatter.format_binary_file(&shown));
        }
    }
    pieces.join("\n")
}

fn emit_output(output: &str, file_count: usize, to_stdout: bool) {
    if to_stdout {
        println!("{output}");
        return;
    }
    match clipboard::copy_text_to_clipboard(output) {
        Ok(()) => {
            let tokens = utils::approx_tokens(output);
            println!(
                "✅ Copied {} files (≈ {} tokens) to the clipboard.",
                file_count, tokens
            );
        }
        Err(e) => {
            warn!(event = "clipboard.copy.failed", error = %e);
            println!("{output}");
        }
    }
}

// Main orchestrator for the feed-llm application logic.
pub fn run_feed_llm(cli_args: cli::Cli) -> Result<()> {
    let config = RunConfig::from_cli(&cli_args)?;
    debug!(
        event = "config.resolved",
        root = %config.root.display(),
        ignore_patterns = config.ignore.len(),
        state_dir = ?config.state_dir
    );

    let controller = SelectorController::new(
        config.root.clone(),
        config.ignore.clone(),
        JsonFileStore::new(config.state_dir.clone()),
    );

    let tree = controller.start();
    let (tree, outcome) = tui::run_selection_session(tree)?;
    let files = controller.finish(&tree, outcome);

    if files.is_empty() {
        info!("No files selected. Exiting.");
        return Ok(());
    }

    let formatter = formatter::formatter_for(config.format);
    let output = render_output(&files, tree.root(), formatter.as_ref());
    emit_output(&output, files.len(), config.to_stdout);
    Ok(())
}

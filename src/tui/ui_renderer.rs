use super::app_logic::TuiApp;
use crate::selection_tree::SelectionState;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

fn draw_help_block(f: &mut Frame, area: Rect) {
    let help_text_lines_content = vec![
        Line::from("Arrows/jk: Nav | Space/Enter: Sel | Tab/o/←→: Fold | *: Expand All | -: Collapse All"),
        Line::from("q/y: Finish and use selection | Esc/Ctrl-C: Abort without saving"),
    ];
    let help_paragraph = Paragraph::new(help_text_lines_content).block(
        Block::default()
            .borders(Borders::ALL)
            .title("feed-llm File Selection"),
    );
    f.render_widget(help_paragraph, area);
}

fn selection_marker(state: SelectionState) -> &'static str {
    match state {
        SelectionState::Unselected => "[ ] ",
        SelectionState::Partial => "[-] ",
        SelectionState::FullySelected => "[x] ",
    }
}

fn draw_main_list_block(f: &mut Frame, app: &mut TuiApp, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_selection_is_visible_in_viewport();

    let visible = app.visible_node_ids();
    let end = (app.scroll_offset + app.list_viewport_height).min(visible.len());
    let window = visible.get(app.scroll_offset..end).unwrap_or(&[]);

    let list_items: Vec<ListItem> = window
        .iter()
        .filter_map(|&id| {
            let node = app.tree.node(id)?;
            let expansion_prefix = if node.is_dir() {
                if app.expanded[id] { "[-] " } else { "[+] " }
            } else {
                "    "
            };
            let label = app.labels.get(id).map(String::as_str).unwrap_or("");
            Some(ListItem::new(format!(
                "{}{}{}",
                expansion_prefix,
                selection_marker(app.tree.get_state(&node.path)),
                label
            )))
        })
        .collect();

    let selected_count = app.tree.collect_selected_files().len();
    let list_title = format!("{} ({} selected)", app.tree.root().display(), selected_count);

    let list_widget = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state_for_view = ListState::default();
    if let Some(pos) = window.iter().position(|&id| id == app.current) {
        list_state_for_view.select(Some(pos));
    }
    f.render_stateful_widget(list_widget, area, &mut list_state_for_view);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut TuiApp) {
    let help_lines = 2;
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(help_lines + 2), Constraint::Min(0)])
        .split(frame.area());

    draw_help_block(frame, main_chunks[0]);
    draw_main_list_block(frame, app, main_chunks[1]);
}

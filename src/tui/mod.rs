// Interactive session over a SelectionTree. Selection changes only go
// through SelectionTree::toggle; everything else here is presentation.
mod app_logic;
mod app_state;
mod event_handler;
mod ui_renderer;

pub use app_state::SessionOutcome;

pub use self::run_tui::run_selection_session;

mod run_tui {
    use super::app_logic::TuiApp;
    use super::app_state::SessionOutcome;
    use super::event_handler::handle_events;
    use super::ui_renderer::ui_frame;
    use crate::selection_tree::SelectionTree;
    use anyhow::{Context, Result};
    use crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};

    /// Runs the full-screen selector until the user finishes or aborts, then
    /// hands the tree back with the outcome.
    pub fn run_selection_session(tree: SelectionTree) -> Result<(SelectionTree, SessionOutcome)> {
        let mut app = TuiApp::new(tree);

        let mut terminal = init_terminal().context("failed to initialise terminal")?;
        let loop_result = event_loop(&mut terminal, &mut app);
        restore_terminal(terminal)?;
        loop_result?;

        Ok(app.into_parts())
    }

    fn event_loop(
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut TuiApp,
    ) -> Result<()> {
        while !app.quit {
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app)?;
        }
        Ok(())
    }

    fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor().map_err(Into::into)
    }
}

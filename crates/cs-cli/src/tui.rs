use cs_core::CallScriptError;

use crate::{ActiveCall, TuiCommandContext};

/// Whether the full-screen UI can take over this terminal.
#[cfg(coverage)]
pub(crate) fn rich_terminal_available() -> bool {
    false
}

#[cfg(not(coverage))]
pub(crate) fn rich_terminal_available() -> bool {
    use std::io::IsTerminal;

    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

#[cfg(coverage)]
pub(crate) fn run_tui_ratatui_mode(
    context: &TuiCommandContext<'_>,
    call: &mut ActiveCall,
) -> Result<i32, CallScriptError> {
    crate::run_tui_line_mode(context, call)
}

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::time::{Duration, Instant};

    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use cs_core::CallScriptError;
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;
    use tracing::warn;

    use crate::{handle_key, map_tui_io, render_tui, ActiveCall, TuiCommandContext, TuiUiState};

    const TICK: Duration = Duration::from_millis(100);

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, CallScriptError> {
            enable_raw_mode().map_err(map_tui_io)?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(map_tui_io)?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(map_tui_io)?;
            Ok(Self { terminal })
        }

        fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
            &mut self.terminal
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    pub(super) fn run_tui_ratatui_mode(
        context: &TuiCommandContext<'_>,
        call: &mut ActiveCall,
    ) -> Result<i32, CallScriptError> {
        let mut terminal = TuiTerminal::new()?;
        let mut ui = TuiUiState::new(
            call.session.current_view(),
            context.config.ring_delay(),
            Instant::now(),
        );

        loop {
            let now = Instant::now();
            ui.tick(now);
            terminal
                .terminal_mut()
                .draw(|frame| render_tui(frame, &ui, call, context.state_file, now))
                .map_err(map_tui_io)?;

            if !event::poll(TICK).map_err(map_tui_io)? {
                continue;
            }

            if let Event::Key(key) = event::read().map_err(map_tui_io)? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let should_quit = match handle_key(key, context, call, &mut ui, Instant::now()) {
                    Ok(should_quit) => should_quit,
                    Err(error) => {
                        warn!(code = %error.code, "{}", error.message);
                        ui.status = error.message;
                        false
                    }
                };
                if should_quit {
                    break;
                }
            }
        }

        Ok(0)
    }
}

#[cfg(not(coverage))]
pub(crate) fn run_tui_ratatui_mode(
    context: &TuiCommandContext<'_>,
    call: &mut ActiveCall,
) -> Result<i32, CallScriptError> {
    if !rich_terminal_available() {
        return crate::run_tui_line_mode(context, call);
    }
    rich::run_tui_ratatui_mode(context, call)
}

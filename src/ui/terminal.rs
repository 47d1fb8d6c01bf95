//! crossterm/ratatui implementation of [`Frontend`].

use super::flappy_scene::{render_scene, SceneOptions};
use crate::error::{FlapError, Result};
use crate::frontend::{Frontend, InputEvent, Snapshot};
use crate::game::SpriteSet;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

const PLAY_CONTROLS: &[(&str, &str)] = &[
    ("[Space/Up]", "Flap"),
    ("[R]", "Restart"),
    ("[L]", "Lines"),
    ("[Q]", "Quit"),
];
const WATCH_CONTROLS: &[(&str, &str)] = &[("[L]", "Lines"), ("[Q]", "Quit")];

/// Owns the terminal while alive: raw mode plus the alternate screen, both
/// restored on drop.
pub struct TerminalFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    title: String,
    show_lines: bool,
    interactive: bool,
}

impl TerminalFrontend {
    /// `interactive` selects the keyboard hints for a human player.
    pub fn new(title: &str, interactive: bool) -> Result<Self> {
        enable_raw_mode().map_err(FlapError::Terminal)?;
        let mut stdout = io::stdout();
        if let Err(e) = stdout.execute(EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(FlapError::Terminal(e));
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(FlapError::Terminal)?;
        Ok(Self {
            terminal,
            title: format!(" {} ", title),
            show_lines: false,
            interactive,
        })
    }

    pub fn with_lines(mut self, show_lines: bool) -> Self {
        self.show_lines = show_lines;
        self
    }
}

impl Drop for TerminalFrontend {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl Frontend for TerminalFrontend {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO).map_err(FlapError::Terminal)? {
            let Event::Key(key) = event::read().map_err(FlapError::Terminal)? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                    events.push(InputEvent::Impulse)
                }
                KeyCode::Char('r') | KeyCode::Char('R') => events.push(InputEvent::Restart),
                KeyCode::Char('l') | KeyCode::Char('L') => self.show_lines = !self.show_lines,
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    events.push(InputEvent::Quit)
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    events.push(InputEvent::Quit)
                }
                _ => {}
            }
        }
        Ok(events)
    }

    fn render(&mut self, snapshot: &Snapshot<'_>, sprites: &SpriteSet) -> Result<()> {
        let options = SceneOptions {
            title: &self.title,
            show_lines: self.show_lines,
            controls: if self.interactive {
                PLAY_CONTROLS
            } else {
                WATCH_CONTROLS
            },
            interactive: self.interactive,
        };
        self.terminal
            .draw(|frame| {
                let area = frame.size();
                render_scene(frame, area, snapshot, sprites, &options);
            })
            .map_err(FlapError::Terminal)?;
        Ok(())
    }
}

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use webbrowser::Browser;

use crate::config::Config;
use crate::game::{Game, GameState};
use crate::runtime::GameEvent;

pub const WEBSITE_URL: &str = "https://www.muistamisentaito.fi/";

/// Terminal application state: the game plus the bits only the UI cares about
#[derive(Debug)]
pub struct App {
    pub game: Game,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config, seed: Option<u64>) -> Self {
        let game = match seed {
            Some(seed) => Game::with_seed(config, seed),
            None => Game::new(config),
        };

        Self {
            game,
            should_quit: false,
        }
    }

    /// Apply one runtime event. Returns true when the screen needs a redraw.
    pub fn handle_event(&mut self, event: GameEvent, now: Instant) -> bool {
        match event {
            GameEvent::Tick => {
                let before = self.game.presenter().map(|p| p.cursor());
                let was = self.game.state();
                self.game.tick(now);
                was != self.game.state() || before != self.game.presenter().map(|p| p.cursor())
            }
            GameEvent::Resize => true,
            GameEvent::Key(key) => {
                self.on_key(key, now);
                true
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match self.game.state() {
            GameState::Setup => match key.code {
                KeyCode::Enter => {
                    if let Err(e) = self.game.start(now) {
                        tracing::debug!(%e, "form stays open");
                    }
                }
                KeyCode::Tab | KeyCode::Down => self.game.form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => self.game.form.focus_prev(),
                KeyCode::Right | KeyCode::Char('+') => self.game.form.step(1),
                KeyCode::Left | KeyCode::Char('-') => self.game.form.step(-1),
                KeyCode::Backspace => self.game.form.backspace(),
                KeyCode::Char('o') => open_website(),
                KeyCode::Char(c) => self.game.form.type_char(c),
                _ => {}
            },
            GameState::ShowNumbers => {}
            GameState::UserInput => match key.code {
                KeyCode::Enter => {
                    if let Err(e) = self.game.submit(now) {
                        tracing::debug!(%e, "answer stays editable");
                    }
                }
                KeyCode::Backspace => self.game.backspace(),
                KeyCode::Char(c) if c.is_ascii_digit() => self.game.type_char(c),
                _ => {}
            },
            GameState::Score => match key.code {
                KeyCode::Enter | KeyCode::Char('r') => {
                    if let Err(e) = self.game.reset() {
                        tracing::debug!(%e, "score screen stays up");
                    }
                }
                _ => {}
            },
        }
    }
}

fn open_website() {
    if Browser::is_available() {
        if let Err(e) = webbrowser::open(WEBSITE_URL) {
            tracing::warn!("failed to open {WEBSITE_URL}: {e}");
        }
    } else {
        tracing::info!("no browser available to open {WEBSITE_URL}");
    }
}

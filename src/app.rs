use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::SessionEngine;
use crate::history::SessionLog;
use crate::leaderboard::Leaderboard;
use crate::passages::{PassageSource, Tier};
use crate::runtime::{Clock, HarfEvent};
use crate::session::SessionSummary;
use crate::store::{self, Storage, DURATION_KEY, LEADERBOARD_KEY, PLAYER_NAME_KEY, TIER_KEY};

pub const DURATION_CHOICES: [u32; 3] = [60, 120, 180];

/// Next preset duration; values outside the presets restart the cycle.
pub fn cycle_duration(current: u32) -> u32 {
    DURATION_CHOICES
        .iter()
        .position(|&d| d == current)
        .map(|idx| DURATION_CHOICES[(idx + 1) % DURATION_CHOICES.len()])
        .unwrap_or(DURATION_CHOICES[0])
}

/// Wires the engine to the leaderboard, storage and session log
pub struct App<P: PassageSource, C: Clock> {
    pub engine: SessionEngine<P, C>,
    pub leaderboard: Leaderboard,
    pub show_results: bool,
    pub should_quit: bool,
    store: Box<dyn Storage>,
    history: Option<SessionLog>,
}

impl<P: PassageSource, C: Clock> App<P, C> {
    pub fn new(
        engine: SessionEngine<P, C>,
        store: Box<dyn Storage>,
        history: Option<SessionLog>,
    ) -> Self {
        let entries = store::load_or(store.as_ref(), LEADERBOARD_KEY, Vec::new());
        Self {
            engine,
            leaderboard: Leaderboard::from_entries(entries),
            show_results: false,
            should_quit: false,
            store,
            history,
        }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.store.as_ref()
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.engine.set_player_name(name);
        store::save(self.store.as_ref(), PLAYER_NAME_KEY, name);
    }

    pub fn set_tier(&mut self, tier: Tier) {
        if self.engine.is_running() {
            return;
        }
        self.engine.set_tier(tier);
        store::save(self.store.as_ref(), TIER_KEY, tier.key());
    }

    pub fn set_duration(&mut self, secs: u32) {
        if self.engine.is_running() {
            return;
        }
        self.engine.set_duration(secs);
        store::save(self.store.as_ref(), DURATION_KEY, &secs);
    }

    /// Apply one event. Returns true when the screen should be redrawn.
    pub fn handle_event(&mut self, event: HarfEvent) -> bool {
        match event {
            HarfEvent::Key(key) => {
                self.handle_key(key);
                true
            }
            HarfEvent::Paste(text) => {
                self.paste(&text);
                true
            }
            HarfEvent::Second(epoch) => {
                if let Some(summary) = self.engine.on_clock_tick(epoch) {
                    self.record(summary);
                }
                true
            }
            HarfEvent::Resize => true,
            HarfEvent::Idle => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.engine.is_running() {
            self.handle_typing_key(key, ctrl);
        } else {
            self.handle_menu_key(key);
        }
    }

    /// A paste is a single input change, however long.
    pub fn paste(&mut self, text: &str) {
        if !self.engine.is_running() || text.is_empty() {
            return;
        }
        let mut typed = self.engine.state().typed_text.clone();
        typed.push_str(text);
        self.engine.submit_input(&typed);
    }

    /// Stop the running session early and score it.
    pub fn stop(&mut self) {
        if let Some(summary) = self.engine.finish() {
            self.record(summary);
        }
    }

    fn handle_typing_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char('r') if ctrl => self.engine.reset(true),
            KeyCode::Esc => self.stop(),
            KeyCode::Tab => self.engine.skip_passage(),
            KeyCode::Backspace => {
                let mut typed = self.engine.state().typed_text.clone();
                // nothing to delete, so the input did not change
                if typed.pop().is_none() {
                    return;
                }
                self.engine.submit_input(&typed);
            }
            KeyCode::Char(c) if !ctrl => {
                let mut typed = self.engine.state().typed_text.clone();
                typed.push(c);
                self.engine.submit_input(&typed);
            }
            _ => {}
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        if self.show_results {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('s')) {
                self.show_results = false;
            }
            return;
        }

        match key.code {
            KeyCode::Enter => {
                self.engine.start();
            }
            KeyCode::Tab => self.engine.skip_passage(),
            KeyCode::Char('l') => {
                let tier = self.engine.state().tier.cycle();
                self.set_tier(tier);
            }
            KeyCode::Char('d') => {
                let secs = cycle_duration(self.engine.state().configured_duration);
                self.set_duration(secs);
            }
            KeyCode::Char('r') => self.engine.reset(false),
            KeyCode::Char('s') => self.show_results = self.engine.summary().is_some(),
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    /// Called exactly once per finished session.
    fn record(&mut self, summary: SessionSummary) {
        if let Some(history) = &self.history {
            if let Err(e) = history.append(&summary) {
                log::warn!("error appending to {}: {e}", history.path().display());
            }
        }

        self.leaderboard.record(summary);
        store::save(
            self.store.as_ref(),
            LEADERBOARD_KEY,
            self.leaderboard.entries(),
        );
        self.show_results = true;
    }
}

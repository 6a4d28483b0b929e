//! Application state shared between the event loop and the renderer.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::{BREAK_RANGE, CYCLE_RANGE, Config, DURATION_STEP, WORK_RANGE};
use crate::engine::Engine;
use crate::ui::{self, Theme};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum View {
    Timer,
    Settings,
    Help,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum SettingsField {
    WorkDuration,
    BreakDuration,
    TotalCycles,
    Theme,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            Self::WorkDuration => Self::BreakDuration,
            Self::BreakDuration => Self::TotalCycles,
            Self::TotalCycles => Self::Theme,
            Self::Theme => Self::WorkDuration,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::WorkDuration => Self::Theme,
            Self::BreakDuration => Self::WorkDuration,
            Self::TotalCycles => Self::BreakDuration,
            Self::Theme => Self::TotalCycles,
        }
    }
}

pub struct App {
    pub engine: Engine,
    pub config: Config,
    pub theme: Theme,
    pub view: View,
    pub settings_field: SettingsField,
    // Edited copy of the config; adopted only when the settings view closes.
    pub draft: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            engine: Engine::new(&config),
            theme: ui::theme_by_name(&config.theme),
            view: View::Timer,
            settings_field: SettingsField::WorkDuration,
            draft: config.clone(),
            config,
        }
    }

    fn open_settings(&mut self) {
        self.draft = self.config.clone();
        self.settings_field = SettingsField::WorkDuration;
        self.view = View::Settings;
    }

    // Closing always applies: the session resets even when nothing changed.
    fn close_settings(&mut self) {
        self.config = self.draft.clone().clamped();
        self.theme = ui::theme_by_name(&self.config.theme);
        let _ = self.config.save();
        self.engine.apply_settings(&self.config);
        self.view = View::Timer;
    }

    fn adjust_setting(&mut self, up: bool) {
        match self.settings_field {
            SettingsField::WorkDuration => {
                self.draft.work_duration =
                    step(self.draft.work_duration, DURATION_STEP, up, WORK_RANGE);
            }
            SettingsField::BreakDuration => {
                self.draft.break_duration =
                    step(self.draft.break_duration, DURATION_STEP, up, BREAK_RANGE);
            }
            SettingsField::TotalCycles => {
                self.draft.total_cycles = step(self.draft.total_cycles, 1, up, CYCLE_RANGE);
            }
            SettingsField::Theme => {
                self.draft.theme = ui::cycle_theme_name(&self.draft.theme, up);
            }
        }
    }
}

fn step(value: u32, by: u32, up: bool, range: std::ops::RangeInclusive<u32>) -> u32 {
    if up {
        value.saturating_add(by).min(*range.end())
    } else {
        value.saturating_sub(by).max(*range.start())
    }
}

/// Routes a key press to the focused view. Returns true to quit.
pub fn handle_input(key: KeyEvent, app: &mut App) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.view {
        View::Timer => handle_timer_view(key, app),
        View::Settings => handle_settings_view(key, app),
        View::Help => handle_help_view(key, app),
    }
}

fn handle_timer_view(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char(' ') | KeyCode::Enter => app.engine.handle_press(Instant::now()),
        KeyCode::Char('s') => app.open_settings(),
        KeyCode::Char('h') | KeyCode::Char('?') => app.view = View::Help,
        _ => {}
    }
    false
}

fn handle_settings_view(key: KeyEvent, app: &mut App) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('s') => app.close_settings(),
        KeyCode::Down | KeyCode::Char('j') => app.settings_field = app.settings_field.next(),
        KeyCode::Up | KeyCode::Char('k') => app.settings_field = app.settings_field.prev(),
        KeyCode::Right | KeyCode::Char('l') => app.adjust_setting(true),
        KeyCode::Left | KeyCode::Char('h') => app.adjust_setting(false),
        _ => {}
    }
    false
}

fn handle_help_view(key: KeyEvent, app: &mut App) -> bool {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') | KeyCode::Char('?')
    ) {
        app.view = View::Timer;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_settings_field_cycles_both_ways() {
        let mut field = SettingsField::WorkDuration;
        for _ in 0..4 {
            field = field.next();
        }
        assert_eq!(field, SettingsField::WorkDuration);
        assert_eq!(SettingsField::WorkDuration.prev(), SettingsField::Theme);
    }

    #[test]
    fn test_adjust_respects_bounds() {
        let mut app = App::new(Config::default());
        app.open_settings();
        app.settings_field = SettingsField::TotalCycles;
        for _ in 0..20 {
            app.adjust_setting(true);
        }
        assert_eq!(app.draft.total_cycles, *CYCLE_RANGE.end());
        for _ in 0..20 {
            app.adjust_setting(false);
        }
        assert_eq!(app.draft.total_cycles, *CYCLE_RANGE.start());
    }

    #[test]
    fn test_closing_settings_applies_draft_to_engine() {
        let mut app = App::new(Config::default());
        app.engine.start(Instant::now());

        app.open_settings();
        app.settings_field = SettingsField::WorkDuration;
        app.adjust_setting(true);
        let expected = app.draft.work_duration;
        handle_input(key(KeyCode::Esc), &mut app);

        assert_eq!(app.view, View::Timer);
        assert!(!app.engine.running());
        assert_eq!(app.engine.remaining(), expected);
        assert_eq!(app.config.work_duration, expected);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(Config::default());
        assert!(handle_input(key(KeyCode::Char('q')), &mut app));
        assert!(handle_input(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            &mut app
        ));
        assert!(!handle_input(key(KeyCode::Char(' ')), &mut app));
    }
}

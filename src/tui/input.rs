//! Input handling for the TUI.
//!
//! Maps keyboard events to wizard commands for the current step.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::WizardStep;
use crate::App;

/// Handle keyboard events.
pub fn handle_events(key: KeyEvent, app: &mut App) {
    // Windows reports both press and release
    if key.kind == KeyEventKind::Release {
        return;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.wizard.step() {
        WizardStep::Intro => handle_intro(key, app),
        WizardStep::SelectLevel | WizardStep::SelectGoal | WizardStep::SelectMuscle => {
            handle_selection(key, app);
        }
        WizardStep::Loading => {
            // Only quitting is possible while a plan is being generated
            if key.code == KeyCode::Char('q') {
                app.quit();
            }
        }
        WizardStep::Result => handle_result(key, app),
        WizardStep::Error => handle_error(key, app),
    }
}

fn handle_intro(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter | KeyCode::Right | KeyCode::Char(' ') => app.advance(),
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

/// Handle input on the level, goal and muscle-group screens.
fn handle_selection(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Home | KeyCode::Char('g') => app.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => {
            app.cursor = app.options().len().saturating_sub(1);
        }

        KeyCode::Char(' ') => {
            app.select_highlighted();
        }
        KeyCode::Enter => app.confirm(),

        // Continue with the current choice, blocked when there is none
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => app.advance(),
        KeyCode::Left | KeyCode::Esc | KeyCode::BackTab | KeyCode::Char('h') => app.retreat(),

        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_result(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
        KeyCode::PageUp => app.scroll_by(-10),
        KeyCode::PageDown => app.scroll_by(10),
        KeyCode::Home | KeyCode::Char('g') => app.scroll = 0,

        KeyCode::Char('n') | KeyCode::Esc | KeyCode::Left => app.retreat(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_error(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.retry(),
        KeyCode::Esc | KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

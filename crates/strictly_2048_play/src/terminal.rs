//! Raw-mode terminal front end.

use crate::session::SessionHandle;
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::time::Duration;
use strictly_2048::{Direction, GameEvent};
use tracing::{debug, error, info, instrument};

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Forward an event to the session.
    Send(GameEvent),
    /// Dismiss a pending win.
    KeepGoing,
    /// Leave the game.
    Quit,
}

/// Maps a key to an action. Arrows and WASD swipe.
pub fn action_for(code: KeyCode) -> Option<Action> {
    let direction = match code {
        KeyCode::Up | KeyCode::Char('w') => Direction::Up,
        KeyCode::Down | KeyCode::Char('s') => Direction::Down,
        KeyCode::Left | KeyCode::Char('a') => Direction::Left,
        KeyCode::Right | KeyCode::Char('d') => Direction::Right,
        KeyCode::Char('n') => return Some(Action::Send(GameEvent::StartGame)),
        KeyCode::Char('k') => return Some(Action::KeepGoing),
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
        _ => return None,
    };
    Some(Action::Send(GameEvent::swipe(direction)))
}

/// Takes over the terminal and plays until the user quits.
///
/// The terminal is restored even when the loop fails.
pub async fn run(handle: &SessionHandle) -> Result<()> {
    let mut terminal = setup_or_restore(enter, restore_on_failed_setup)?;

    let res = run_loop(&mut terminal, handle).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

fn enter() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_on_failed_setup() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Runs `setup`, calling `restore` if it fails partway.
fn setup_or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|err| {
        error!(error = ?err, "Terminal setup failed, restoring");
        restore();
    })
}

#[instrument(skip_all)]
async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    handle: &SessionHandle,
) -> Result<()> {
    info!("Starting terminal game loop");
    let mut views = handle.subscribe();

    loop {
        let view = views.borrow_and_update().clone();
        terminal.draw(|frame| ui::draw(frame, &view))?;

        if !event::poll(Duration::from_millis(50))? {
            tokio::task::yield_now().await;
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match action_for(key.code) {
            Some(Action::Send(event)) => handle.send(event)?,
            Some(Action::KeepGoing) => handle.keep_going()?,
            Some(Action::Quit) => {
                info!("User quit");
                return Ok(());
            }
            None => debug!(code = ?key.code, "Unbound key"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd_swipe() {
        assert_eq!(action_for(KeyCode::Up), Some(Action::Send(GameEvent::SwipeUp)));
        assert_eq!(action_for(KeyCode::Char('w')), Some(Action::Send(GameEvent::SwipeUp)));
        assert_eq!(action_for(KeyCode::Char('a')), Some(Action::Send(GameEvent::SwipeLeft)));
        assert_eq!(action_for(KeyCode::Right), Some(Action::Send(GameEvent::SwipeRight)));
        assert_eq!(action_for(KeyCode::Char('s')), Some(Action::Send(GameEvent::SwipeDown)));
    }

    #[test]
    fn test_failed_setup_restores_terminal() {
        let mut restored = false;
        let res: Result<()> = setup_or_restore(
            || Err(anyhow::anyhow!("no alternate screen")),
            || restored = true,
        );
        assert!(res.is_err());
        assert!(restored);
    }

    #[test]
    fn test_successful_setup_skips_restore() {
        let mut restored = false;
        let res = setup_or_restore(|| Ok(7), || restored = true);
        assert_eq!(res.unwrap(), 7);
        assert!(!restored);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(action_for(KeyCode::Char('n')), Some(Action::Send(GameEvent::StartGame)));
        assert_eq!(action_for(KeyCode::Char('k')), Some(Action::KeepGoing));
        assert_eq!(action_for(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(action_for(KeyCode::Char('x')), None);
    }
}

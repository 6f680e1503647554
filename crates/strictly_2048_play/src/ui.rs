//! Stateless rendering of a session view.

use crate::session::SessionView;
use crate::win::WinStatus;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use strictly_2048::{GameState, Phase, Position};

const CELL_WIDTH: usize = 7;

/// Renders title, score, board and status line.
pub fn draw(frame: &mut Frame, view: &SessionView) {
    let state = view.state();
    let board_height = u16::try_from(state.rows() * 2 + 1).unwrap_or(u16::MAX);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                              // Score
            Constraint::Min(board_height.saturating_add(2)),    // Board
            Constraint::Length(3),                              // Status
        ])
        .split(frame.area());

    let score = Paragraph::new(score_line(state))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("strictly 2048"));
    frame.render_widget(score, chunks[0]);

    let board = Paragraph::new(board_lines(state))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(board, chunks[1]);

    let status = Paragraph::new(status_line(view))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);
}

/// Score, best score and the gain of the last move.
pub fn score_line(state: &GameState) -> String {
    let mut line = format!("Score {}   Best {}", state.score(), state.best_score());
    if state.added_score() > 0 {
        line.push_str(&format!("   +{}", state.added_score()));
    }
    line
}

/// Prompt matching where the game stands.
pub fn status_line(view: &SessionView) -> String {
    match (view.state().phase(), view.win()) {
        (_, WinStatus::WonPending) => {
            format!("You reached {}!  k: keep going   n: try again", view.win_score())
        }
        (Phase::Lost, _) => "Game over.  n: try again   q: quit".to_string(),
        (Phase::Idle, _) => "arrows/wasd: move   n: new game   q: quit".to_string(),
    }
}

fn board_lines(state: &GameState) -> Vec<Line<'static>> {
    let board = state.board();
    let mut lines = Vec::with_capacity(board.rows() * 2);
    for row in 0..board.rows() {
        if row > 0 {
            lines.push(Line::default());
        }
        let spans: Vec<Span<'static>> = (0..board.cols())
            .map(|col| {
                let pos = Position::new(row, col);
                let value = board.value(pos);
                let label = if value == 0 {
                    ".".to_string()
                } else {
                    value.to_string()
                };
                let mut style = tile_style(value);
                if state.merged_positions().contains(&pos) {
                    style = style.add_modifier(Modifier::BOLD);
                }
                if state.new_spawn_positions().contains(&pos) {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                Span::styled(format!("{label:^CELL_WIDTH$}"), style)
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

fn tile_style(value: u32) -> Style {
    let color = match value {
        0 => Color::DarkGray,
        2 | 4 => Color::White,
        8 | 16 => Color::Yellow,
        32 | 64 => Color::LightRed,
        128..=1024 => Color::Magenta,
        _ => Color::LightGreen,
    };
    Style::default().fg(color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use ratatui::{Terminal, backend::TestBackend};
    use strictly_2048::Board;

    fn view(values: &[[u32; 2]], score: u64, win: WinStatus) -> SessionView {
        let board = Board::from_values(values, &mut StdRng::seed_from_u64(1));
        SessionView::new(GameState::with_board(board, score, score), win, 0, 2048)
    }

    #[test]
    fn test_score_line_hides_zero_gain() {
        let view = view(&[[2, 0], [0, 0]], 12, WinStatus::Playing);
        assert_eq!(score_line(view.state()), "Score 12   Best 12");
    }

    #[test]
    fn test_status_prompts() {
        let playing = view(&[[2, 0], [0, 0]], 0, WinStatus::Playing);
        assert!(status_line(&playing).contains("n: new game"));

        let won = view(&[[2, 0], [0, 0]], 2048, WinStatus::WonPending);
        assert!(status_line(&won).starts_with("You reached 2048!"));

        let lost = view(&[[2, 4], [4, 2]], 0, WinStatus::KeepGoing);
        assert!(status_line(&lost).starts_with("Game over"));
    }

    #[test]
    fn test_draw_renders_tiles_and_score() {
        let mut terminal = Terminal::new(TestBackend::new(40, 14)).unwrap();
        let view = view(&[[2, 0], [0, 128]], 36, WinStatus::Playing);
        terminal.draw(|frame| draw(frame, &view)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Score 36"));
        assert!(text.contains("128"));
    }
}

use std::collections::HashSet;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::game::GameState;
use crate::metrics::SessionMetrics;

const BACKGROUND: Color = Color::Black;
const SNAKE_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::White;
const GAME_OVER_COLOR: Color = Color::Red;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &SessionMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Score and stats
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Controls
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let grid_area = chunks[1];
        let glyph_width = cell_glyph_width(grid_area.width, state.columns());
        frame.render_widget(self.render_grid(state, glyph_width), grid_area);

        if state.terminated {
            let popup = game_over_area(grid_area);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(state), popup);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_grid(&self, state: &GameState, glyph_width: usize) -> Paragraph<'static> {
        Paragraph::new(grid_lines(state, glyph_width))
            .style(Style::default().bg(BACKGROUND))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Snake Game "),
            )
    }

    fn render_stats(&self, state: &GameState, metrics: &SessionMetrics) -> Paragraph<'static> {
        let text = Line::from(vec![
            Span::styled(
                score_text(state.score),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Ticks: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.ticks.to_string(), Style::default().fg(Color::White)),
        ]);

        Paragraph::new(text).alignment(Alignment::Left)
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                game_over_text(state.score),
                Style::default()
                    .fg(GAME_OVER_COLOR)
                    .add_modifier(Modifier::BOLD),
            )),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GAME_OVER_COLOR)),
        )
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ]);

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn score_text(score: u32) -> String {
    format!("Score : {}", score)
}

pub fn game_over_text(score: u32) -> String {
    format!("Game Over. Your Score is : {}", score)
}

/// Two terminal columns per cell keeps cells square; fall back to one when
/// the grid does not fit.
pub fn cell_glyph_width(area_width: u16, columns: i32) -> usize {
    let inner = usize::from(area_width.saturating_sub(2));
    if inner >= columns.max(0) as usize * 2 {
        2
    } else {
        1
    }
}

/// One line per grid row. Segments outside the grid (a head that just hit the
/// wall) are not drawn.
pub fn grid_lines(state: &GameState, glyph_width: usize) -> Vec<Line<'static>> {
    let cell = state.cell_size;
    let snake_cells: HashSet<(i32, i32)> = state
        .snake
        .body
        .iter()
        .filter(|pos| state.is_in_bounds(**pos))
        .map(|pos| pos.cell(cell))
        .collect();
    let food_cell = state.food.cell(cell);

    let square = "█".repeat(glyph_width);
    let blank = " ".repeat(glyph_width);

    (0..state.rows())
        .map(|row| {
            let spans: Vec<Span<'static>> = (0..state.columns())
                .map(|col| {
                    if snake_cells.contains(&(col, row)) {
                        Span::styled(square.clone(), Style::default().fg(SNAKE_COLOR))
                    } else if food_cell == (col, row) {
                        Span::styled(square.clone(), Style::default().fg(FOOD_COLOR))
                    } else {
                        Span::styled(blank.clone(), Style::default().bg(BACKGROUND))
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Banner across the top quarter of the grid
fn game_over_area(area: Rect) -> Rect {
    let height = 4.min(area.height);
    let width = 44.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 4,
        width,
        height,
    }
}

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event::Key, KeyCode, KeyEventKind};
use rand::thread_rng;
use ratatui::{prelude::*, widgets::*};

use crate::grid::{Cell, Square, Warehouse, COLS, ROWS};
use crate::path::PathFinder;
use crate::q_table::QTable;
use crate::trainer::{Trainer, TrainerConfig};

use super::term;

/// Slider range shared by the three learning parameters
const PARAM_MIN: f64 = 0.3;
const PARAM_MAX: f64 = 1.0;

/// Step budget this UI imposes on path queries, so a cycling policy shows a
/// warning instead of freezing the terminal
const PATH_STEP_LIMIT: usize = 500;

/// Parameter rows in display order. The start coordinate is presented X
/// first: X is the COLUMN and Y the ROW, and the core is called with
/// (row = Y, col = X).
const PARAMS: [&str; 5] = [
    "epsilon",
    "discount factor",
    "learning rate",
    "start X (column)",
    "start Y (row)",
];

#[derive(Default, PartialEq)]
enum State {
    #[default]
    Run,
    Quit,
}

/// The root TUI component: owns the environment, the learned table, and the
/// interaction state, and runs the render loop
pub struct App {
    state: State,
    env: Warehouse,
    epsilon: f64,
    discount_factor: f64,
    learning_rate: f64,
    start_x: usize,
    start_y: usize,
    selected: usize,
    q: QTable,
    path: Vec<Cell>,
    warning: Option<String>,
}

impl App {
    /// Build the app and train an initial table under the default
    /// parameters, so a path can be queried right away
    pub fn new() -> Self {
        let mut app = Self {
            state: State::default(),
            env: Warehouse::new(),
            epsilon: 0.9,
            discount_factor: 0.9,
            learning_rate: 0.9,
            start_x: 3,
            start_y: 9,
            selected: 0,
            q: QTable::new(),
            path: Vec::new(),
            warning: None,
        };
        app.retrain();
        app
    }

    /// Initialize the terminal and run the main loop
    ///
    /// Restores the terminal on exit
    pub fn run(&mut self) -> io::Result<()> {
        let mut terminal = term::init()?;

        while self.state != State::Quit {
            terminal.draw(|frame| frame.render_widget(&*self, frame.size()))?;

            if event::poll(Duration::from_millis(16))? {
                if let Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        term::restore()
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected = (self.selected + PARAMS.len() - 1) % PARAMS.len(),
            KeyCode::Down => self.selected = (self.selected + 1) % PARAMS.len(),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Enter => self.find_path(),
            KeyCode::Char('q') => self.state = State::Quit,
            _ => {}
        }
    }

    /// Nudge the selected row one step. Changing a learning parameter
    /// retrains immediately; the displayed path belongs to the old policy
    /// and is dropped.
    fn adjust(&mut self, delta: i64) {
        match self.selected {
            0 => self.epsilon = step_param(self.epsilon, delta),
            1 => self.discount_factor = step_param(self.discount_factor, delta),
            2 => self.learning_rate = step_param(self.learning_rate, delta),
            3 => self.start_x = step_coord(self.start_x, delta, COLS - 1),
            4 => self.start_y = step_coord(self.start_y, delta, ROWS - 1),
            _ => unreachable!(),
        }
        if self.selected < 3 {
            self.retrain();
        }
    }

    /// Train a fresh table under the current parameters, discarding any
    /// previously learned values along with the displayed path
    fn retrain(&mut self) {
        let config = TrainerConfig {
            epsilon: self.epsilon,
            discount_factor: self.discount_factor,
            learning_rate: self.learning_rate,
            ..Default::default()
        };
        self.q = QTable::new();
        Trainer::new(config).train(&self.env, &mut self.q, &mut thread_rng());
        self.path.clear();
        self.warning = None;
    }

    fn find_path(&mut self) {
        let start = Cell::new(self.start_y, self.start_x);
        if self.env.is_terminal(start) {
            self.path.clear();
            self.warning = Some(format!(
                "The starting point {}, {} is a terminal state. Please select another starting point.",
                self.start_x, self.start_y
            ));
            return;
        }

        match PathFinder::new(&self.env, &self.q).shortest_path_capped(start, PATH_STEP_LIMIT) {
            Ok(path) => {
                self.path = path;
                self.warning = None;
            }
            Err(e) => {
                self.path.clear();
                self.warning = Some(e.to_string());
            }
        }
    }

    fn param_value(&self, index: usize) -> String {
        match index {
            0 => format!("{:.1}", self.epsilon),
            1 => format!("{:.1}", self.discount_factor),
            2 => format!("{:.1}", self.learning_rate),
            3 => self.start_x.to_string(),
            4 => self.start_y.to_string(),
            _ => unreachable!(),
        }
    }
}

fn step_param(value: f64, delta: i64) -> f64 {
    let steps = ((value * 10.0).round() as i64 + delta).clamp(
        (PARAM_MIN * 10.0).round() as i64,
        (PARAM_MAX * 10.0).round() as i64,
    );
    steps as f64 / 10.0
}

fn step_coord(value: usize, delta: i64, max: usize) -> usize {
    (value as i64 + delta).clamp(0, max as i64) as usize
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [grid_area, side_area] =
            Layout::horizontal([Constraint::Length(COLS as u16 * 2 + 2), Constraint::Fill(1)])
                .areas(area);

        // Floor plan: storage black, goal green, aisles white, path yellow
        let mut lines = Vec::with_capacity(ROWS);
        for row in 0..ROWS {
            let mut spans = Vec::with_capacity(COLS);
            for col in 0..COLS {
                let cell = Cell::new(row, col);
                let color = if self.path.contains(&cell) {
                    Color::Yellow
                } else {
                    match self.env.square(cell) {
                        Square::Storage => Color::Black,
                        Square::Goal => Color::Green,
                        Square::Aisle => Color::White,
                    }
                };
                spans.push(Span::styled("  ", Style::default().bg(color)));
            }
            lines.push(Line::from(spans));
        }
        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Warehouse"),
            )
            .render(grid_area, buf);

        let [params_area, help_area, warning_area] = Layout::vertical([
            Constraint::Length(PARAMS.len() as u16 + 2),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(side_area);

        let rows: Vec<Line> = PARAMS
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let line = Line::from(format!("{name:<18} {}", self.param_value(i)));
                if i == self.selected {
                    line.yellow()
                } else {
                    line.white()
                }
            })
            .collect();
        Paragraph::new(rows)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Learning Parameters"),
            )
            .render(params_area, buf);

        Paragraph::new(vec![
            Line::from("up/down      select parameter"),
            Line::from("left/right   adjust (retrains)"),
            Line::from("enter        calculate best path"),
            Line::from("q            quit"),
        ])
        .block(Block::default().padding(Padding::uniform(1)))
        .render(help_area, buf);

        if let Some(warning) = &self.warning {
            Paragraph::new(warning.as_str())
                .red()
                .wrap(Wrap { trim: true })
                .block(Block::bordered().border_type(BorderType::Rounded))
                .render(warning_area, buf);
        }
    }
}

use std::path::PathBuf;

use arboard::Clipboard;
use clap::Parser;
use macroquad::prelude::*;
use patrolgrid::parse::render_with_actor;
use patrolgrid::patrol::default_step_limit;
use patrolgrid::{
    load_layout, parse_grid, Actor, Config, Grid, PathAnalyzer, PatrolEngine, PatrolOptions,
    PatrolState, Scenario, Symbol,
};
use tracing_subscriber::EnvFilter;

const FALLBACK_LAYOUT: &str = "\
....#.....
.........#
..........
..#.......
.......#..
..........
.#..^.....
........#.
#.........
......#...
";

const INFO_PANEL_HEIGHT: f32 = 150.0;
const SAVE_PATH: &str = "saved_scenario.json";

/// Interactive guard patrol viewer
#[derive(Parser, Debug)]
#[command(name = "patrolgrid")]
struct Args {
    /// Grid file (.txt layout or .json scenario); defaults to the configured file
    grid: Option<PathBuf>,

    /// Configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

/// Visualization state
struct VisState {
    /// Layout without visitation marks
    layout: Grid,
    start: Actor,
    /// Working copy the engine marks up
    grid: Grid,
    engine: PatrolEngine,
    running: bool,
    loop_cells: Vec<usize>,
    status: String,
    cell_size: f32,
    steps_per_frame: usize,
    step_limit: Option<usize>,
    parallel: bool,
    background: Color,
}

impl VisState {
    fn new(layout: Grid, start: Actor, config: &Config) -> Self {
        let options = PatrolOptions::tracing().with_step_limit(config.patrol.step_limit);
        VisState {
            grid: layout.clone(),
            engine: PatrolEngine::new(start, options),
            layout,
            start,
            running: false,
            loop_cells: Vec::new(),
            status: String::new(),
            cell_size: config.visual.cell_size,
            steps_per_frame: config.visual.steps_per_frame.max(1),
            step_limit: config.patrol.step_limit,
            parallel: config.analysis.parallel,
            background: Color::from_rgba(
                config.visual.background_r,
                config.visual.background_g,
                config.visual.background_b,
                255,
            ),
        }
    }

    fn reset(&mut self) {
        let options = PatrolOptions::tracing().with_step_limit(self.step_limit);
        self.grid = self.layout.clone();
        self.engine = PatrolEngine::new(self.start, options);
        self.running = false;
        self.status.clear();
    }

    /// Replace the layout after an edit; stale loop results are dropped
    fn set_layout(&mut self, layout: Grid, start: Actor) {
        self.layout = layout;
        self.start = start;
        self.loop_cells.clear();
        self.reset();
        request_new_screen_size(
            self.layout.cols as f32 * self.cell_size,
            self.layout.rows as f32 * self.cell_size + INFO_PANEL_HEIGHT,
        );
    }

    fn step_once(&mut self) {
        if self.engine.state().is_terminal() {
            self.running = false;
            return;
        }

        let limit = self.step_limit.unwrap_or_else(|| default_step_limit(&self.grid));
        if self.engine.steps() >= limit {
            self.running = false;
            self.status = format!("No exit after {} steps", self.engine.steps());
            return;
        }

        let state = self.engine.step(&mut self.grid);
        if state == PatrolState::ExitedBounds {
            self.running = false;
            self.status = format!(
                "Left the grid: {} cells visited in {} steps",
                self.engine.visited_cell_count().unwrap_or(0),
                self.engine.steps()
            );
        }
    }

    fn update(&mut self) {
        if self.running {
            for _ in 0..self.steps_per_frame {
                self.step_once();
                if !self.running {
                    break;
                }
            }
        }
    }

    fn cell_under_mouse(&self, mouse_x: f32, mouse_y: f32) -> Option<usize> {
        let col = (mouse_x / self.cell_size).floor();
        let row = (mouse_y / self.cell_size).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        self.layout
            .contains(row, col)
            .then(|| self.layout.get_id(row, col))
    }

    fn handle_click(&mut self, mouse_x: f32, mouse_y: f32) {
        let Some(id) = self.cell_under_mouse(mouse_x, mouse_y) else {
            return;
        };
        let (row, col) = self.layout.get_coords(id);

        // Left click: toggle obstacle
        if is_mouse_button_pressed(MouseButton::Left) {
            if id == self.start.position() {
                return;
            }
            let mut layout = self.layout.clone();
            let next = if layout.is_obstacle(row, col) {
                Symbol::Empty
            } else {
                Symbol::Obstacle
            };
            if layout.set_cell_at(row, col, next).is_ok() {
                let start = self.start;
                self.set_layout(layout, start);
            }
        }
        // Right click: move the actor's start cell
        else if is_mouse_button_pressed(MouseButton::Right) && !self.layout.is_obstacle(row, col) {
            let start = Actor::new(id, self.start.direction());
            let layout = self.layout.clone();
            self.set_layout(layout, start);
        }
    }

    fn rotate_start(&mut self) {
        let mut start = self.start;
        start.turn_right();
        let layout = self.layout.clone();
        self.set_layout(layout, start);
    }

    fn compute_loops(&mut self) {
        let analyzer = PathAnalyzer::new(self.layout.clone(), self.start).with_step_limit(self.step_limit);
        match analyzer.loop_placements(self.parallel) {
            Ok(cells) => {
                self.status = format!("{} obstacle placements create a loop", cells.len());
                self.loop_cells = cells;
            }
            Err(e) => {
                self.status = format!("Loop search failed: {}", e);
                self.loop_cells.clear();
            }
        }
    }

    fn copy_to_clipboard(&mut self) {
        let text = render_with_actor(&self.grid, self.engine.actor());
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(text) {
                    tracing::warn!("Failed to copy to clipboard: {}", e);
                } else {
                    self.status = "Grid copied to clipboard".to_string();
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                tracing::warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn paste_from_clipboard(&mut self) {
        let text = match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to read clipboard: {}", e);
                return;
            }
        };

        match parse_grid(&text) {
            Ok((mut layout, start)) => {
                layout.clear_marks();
                tracing::info!(rows = layout.rows, cols = layout.cols, "pasted grid");
                self.set_layout(layout, start);
            }
            Err(e) => {
                self.status = format!("Clipboard is not a grid: {}", e);
            }
        }
    }

    fn save_scenario(&mut self) {
        let mut scenario = Scenario::from_grid("viewer", &self.layout, &self.start);

        let mut traced = self.layout.clone();
        let options = PatrolOptions::tracing().with_step_limit(self.step_limit);
        scenario.expected_visited = PatrolEngine::new(self.start, options)
            .run(&mut traced)
            .ok()
            .and_then(|report| report.visited_cells);
        if !self.loop_cells.is_empty() {
            scenario.expected_loop_placements = Some(self.loop_cells.len());
        }

        self.status = match scenario.save_to_file(SAVE_PATH) {
            Ok(()) => format!("Saved {}", SAVE_PATH),
            Err(e) => format!("Failed to save scenario: {}", e),
        };
    }

    fn draw(&self) {
        clear_background(self.background);

        let size = self.cell_size;
        let half = size / 2.0;
        let mark_color = Color::from_rgba(230, 200, 80, 255);

        for id in 0..self.grid.cell_count() {
            let (row, col) = self.grid.get_coords(id);
            let px = col as f32 * size;
            let py = row as f32 * size;

            let symbol = self.grid.cells()[id];
            let fill = if symbol == Symbol::Obstacle {
                RED
            } else {
                Color::from_rgba(60, 60, 60, 255)
            };
            draw_rectangle(px, py, size - 1.0, size - 1.0, fill);

            if matches!(symbol, Symbol::VisitedVertical | Symbol::VisitedIntersection) {
                draw_line(px + half, py, px + half, py + size, 2.0, mark_color);
            }
            if matches!(symbol, Symbol::VisitedHorizontal | Symbol::VisitedIntersection) {
                draw_line(px, py + half, px + size, py + half, 2.0, mark_color);
            }

            if self.loop_cells.binary_search(&id).is_ok() {
                draw_rectangle_lines(px + 2.0, py + 2.0, size - 5.0, size - 5.0, 2.0, ORANGE);
            }
        }

        self.draw_actor();

        let panel_y = self.grid.rows as f32 * size + 20.0;
        let lines = [
            format!(
                "Steps: {}  Turns: {}  Visited: {}  State: {:?}",
                self.engine.steps(),
                self.engine.turns(),
                self.engine.visited_cell_count().unwrap_or(0),
                self.engine.state()
            ),
            self.status.clone(),
            "Space: step  Enter: run/pause  R: reset  L: loop placements  D: rotate start".to_string(),
            "Left click: toggle obstacle  Right click: move start".to_string(),
            "C: copy grid  V: paste grid  S: save scenario  Esc: close window".to_string(),
        ];
        for (i, line) in lines.iter().enumerate() {
            draw_text(line, 10.0, panel_y + i as f32 * 22.0, 20.0, WHITE);
        }
    }

    fn draw_actor(&self) {
        let actor = self.engine.actor();
        if actor.position() >= self.grid.cell_count() {
            return;
        }
        let (row, col) = self.grid.get_coords(actor.position());
        let size = self.cell_size;
        let cx = col as f32 * size + size / 2.0;
        let cy = row as f32 * size + size / 2.0;
        let r = size * 0.4;

        let (tip, left, right) = match actor.direction() {
            patrolgrid::Direction::Up => (vec2(cx, cy - r), vec2(cx - r, cy + r), vec2(cx + r, cy + r)),
            patrolgrid::Direction::Down => (vec2(cx, cy + r), vec2(cx + r, cy - r), vec2(cx - r, cy - r)),
            patrolgrid::Direction::Left => (vec2(cx - r, cy), vec2(cx + r, cy + r), vec2(cx + r, cy - r)),
            patrolgrid::Direction::Right => (vec2(cx + r, cy), vec2(cx - r, cy - r), vec2(cx - r, cy + r)),
        };
        draw_triangle(tip, left, right, BLUE);
    }
}

fn window_conf() -> Conf {
    let args = Args::parse();
    let config = Config::load_from(&args.config).unwrap_or_default();
    Conf {
        window_title: config.visual.window_title,
        window_width: 800,
        window_height: 800,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();
    let (config, config_error) = match Config::load_from(&args.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(e) = config_error {
        tracing::warn!("Failed to load {}: {}; using default configuration", args.config.display(), e);
    }

    let path = args
        .grid
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.default_grid_file.path));

    let (layout, start) = match load_layout(&path) {
        Ok(loaded) => {
            tracing::info!("Loaded grid from {}", path.display());
            loaded
        }
        Err(e) => {
            tracing::warn!("Failed to load {}: {}; using built-in layout", path.display(), e);
            match parse_grid(FALLBACK_LAYOUT) {
                Ok(loaded) => loaded,
                Err(e) => {
                    tracing::error!("Built-in layout is invalid: {}", e);
                    return;
                }
            }
        }
    };

    let mut state = VisState::new(layout.clone(), start, &config);
    state.set_layout(layout, start);

    loop {
        // Handle input
        if is_mouse_button_pressed(MouseButton::Left) || is_mouse_button_pressed(MouseButton::Right) {
            let (mouse_x, mouse_y) = mouse_position();
            state.handle_click(mouse_x, mouse_y);
        }

        if is_key_pressed(KeyCode::Space) {
            state.running = false;
            state.step_once();
        }
        if is_key_pressed(KeyCode::Enter) {
            state.running = !state.running;
        }
        if is_key_pressed(KeyCode::R) {
            state.reset();
        }
        if is_key_pressed(KeyCode::D) {
            state.rotate_start();
        }
        if is_key_pressed(KeyCode::L) {
            state.compute_loops();
        }
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }
        if is_key_pressed(KeyCode::V) {
            state.paste_from_clipboard();
        }
        if is_key_pressed(KeyCode::S) {
            state.save_scenario();
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.update();
        state.draw();

        next_frame().await
    }
}

mod agent;
mod ai;
mod game;
mod maze;
mod mazegen;
mod path;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

use crate::game::{Difficulty, Game, Mode, Outcome};
use crate::maze::{Cell, Dir, Pos};

const DEFAULT_GRID_SIZE: usize = 10;
const DEFAULT_TICK_MS: u64 = 100;
const DEFAULT_RENDER_FPS: u64 = 60;
const CELL_W: usize = 2;
const COUNTDOWN_STEP_MS: u64 = 300;

fn main() -> io::Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout) -> io::Result<()> {
    let (grid_size, tick_ms, render_fps) = read_settings();

    let mode = match select_mode(stdout)? {
        Some(mode) => mode,
        None => return Ok(()),
    };
    let difficulty = match select_difficulty(stdout)? {
        Some(difficulty) => difficulty,
        None => return Ok(()),
    };

    let mut rng = rand::thread_rng();
    let mut game = Game::new(grid_size, mode, difficulty, &mut rng);
    show_countdown(stdout)?;

    let mut renderer = Renderer::new(grid_size);
    let mut last_tick = Instant::now();
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        let dir = match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                            KeyCode::Up | KeyCode::Char('k') => Some(Dir::Up),
                            KeyCode::Down | KeyCode::Char('j') => Some(Dir::Down),
                            KeyCode::Left | KeyCode::Char('h') => Some(Dir::Left),
                            KeyCode::Right | KeyCode::Char('l') => Some(Dir::Right),
                            _ => None,
                        };
                        if let Some(dir) = dir {
                            game.apply_human_input(dir);
                        }
                    }
                    _ => {}
                }
            }
        }

        if game.maybe_shift(&mut rng) {
            renderer.needs_full = true;
        }

        let now = Instant::now();
        if last_tick.elapsed() >= Duration::from_millis(tick_ms) {
            last_tick = now;
            game.move_opponent(now);
        }

        if let Some(outcome) = game.outcome(now) {
            render(stdout, &game, &mut renderer, now)?;
            return render_end_screen(stdout, &game, outcome);
        }

        render(stdout, &game, &mut renderer, now)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn read_settings() -> (usize, u64, u64) {
    let grid_size = std::env::var("MAZE_GRID_SIZE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v >= 4)
        .unwrap_or(DEFAULT_GRID_SIZE);
    let tick_ms = std::env::var("MAZE_TICK_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    let render_fps = std::env::var("MAZE_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    (grid_size, tick_ms, render_fps)
}

fn draw_menu(stdout: &mut Stdout, lines: &[&str]) -> io::Result<()> {
    stdout.queue(Clear(ClearType::All))?;
    for (i, line) in lines.iter().enumerate() {
        stdout.queue(MoveTo(4, 2 + 2 * i as u16))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Print(line))?;
    }
    stdout.queue(ResetColor)?;
    stdout.flush()
}

fn select_mode(stdout: &mut Stdout) -> io::Result<Option<Mode>> {
    draw_menu(
        stdout,
        &[
            "Select Mode:",
            "1 - Classic",
            "2 - Time Trial",
            "3 - Survival",
            "q - Quit",
        ],
    )?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('1') => return Ok(Some(Mode::Classic)),
                    KeyCode::Char('2') => return Ok(Some(Mode::TimeTrial)),
                    KeyCode::Char('3') => return Ok(Some(Mode::Survival)),
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }
    }
}

fn select_difficulty(stdout: &mut Stdout) -> io::Result<Option<Difficulty>> {
    draw_menu(
        stdout,
        &["Select Difficulty:", "1 - Easy", "2 - Medium", "q - Quit"],
    )?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('1') => return Ok(Some(Difficulty::Easy)),
                    KeyCode::Char('2') => return Ok(Some(Difficulty::Medium)),
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }
    }
}

fn show_countdown(stdout: &mut Stdout) -> io::Result<()> {
    let (term_w, term_h) = terminal::size()?;
    for text in ["3", "2", "1", "Go!"] {
        stdout.queue(Clear(ClearType::All))?;
        let w = UnicodeWidthStr::width(text) as u16;
        stdout.queue(MoveTo(term_w.saturating_sub(w) / 2, term_h / 2))?;
        stdout.queue(SetForegroundColor(Color::Green))?;
        stdout.queue(Print(text))?;
        stdout.queue(ResetColor)?;
        stdout.flush()?;
        thread::sleep(Duration::from_millis(COUNTDOWN_STEP_MS));
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Human,
    Opponent,
    Wall,
    Open,
    Bonus,
    Trap,
}

#[derive(Clone, Copy, PartialEq)]
struct CellView {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<CellView>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(size: usize) -> Self {
        Self {
            last: vec![
                CellView {
                    glyph: Glyph::Open,
                    color: Color::Reset,
                };
                size * size
            ],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

fn render(
    stdout: &mut Stdout,
    game: &Game,
    renderer: &mut Renderer,
    now: Instant,
) -> io::Result<()> {
    let size = game.maze.size();
    let needed_h = (size + 2) as u16;
    let needed_w = (size * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let hud = if game.mode == Mode::TimeTrial {
        format!(
            "You: {}  Rival: {}  Mode: {}  Difficulty: {}  Time left: {}s  (q quits)",
            game.scores.human,
            game.scores.opponent,
            game.mode.label(),
            game.difficulty.label(),
            game.time_left(now)
        )
    } else {
        format!(
            "You: {}  Rival: {}  Mode: {}  Difficulty: {}  (q quits)",
            game.scores.human,
            game.scores.opponent,
            game.mode.label(),
            game.difficulty.label()
        )
    };
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    for row in 0..size {
        for col in 0..size {
            let view = cell_for(game, Pos::new(row, col));
            let idx = row * size + col;
            if renderer.needs_full || view != renderer.last[idx] {
                renderer.last[idx] = view;
                draw_cell(stdout, renderer, row, col, view)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn cell_for(game: &Game, pos: Pos) -> CellView {
    if pos == game.human.pos {
        return CellView {
            glyph: Glyph::Human,
            color: Color::Blue,
        };
    }
    if pos == game.opponent.pos {
        return CellView {
            glyph: Glyph::Opponent,
            color: Color::Red,
        };
    }
    match game.maze.get(pos) {
        Cell::Wall => CellView {
            glyph: Glyph::Wall,
            color: Color::DarkGrey,
        },
        Cell::Open => CellView {
            glyph: Glyph::Open,
            color: Color::Reset,
        },
        Cell::Bonus => CellView {
            glyph: Glyph::Bonus,
            color: Color::Green,
        },
        Cell::Trap => CellView {
            glyph: Glyph::Trap,
            color: Color::Red,
        },
    }
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    row: usize,
    col: usize,
    view: CellView,
) -> io::Result<()> {
    let (text, color) = match view.glyph {
        Glyph::Human => ("()", view.color),
        Glyph::Opponent => ("><", view.color),
        Glyph::Wall => ("██", view.color),
        Glyph::Open => ("· ", view.color),
        Glyph::Bonus => ("★ ", view.color),
        Glyph::Trap => ("✖ ", view.color),
    };
    let x_pos = renderer.origin_x + (col * CELL_W) as u16;
    let y_pos = renderer.origin_y + row as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}

fn render_end_screen(stdout: &mut Stdout, game: &Game, outcome: Outcome) -> io::Result<()> {
    let message = match outcome {
        Outcome::HumanWins => "You reached the far corner. You win!",
        Outcome::OpponentWins => "The rival reached your corner. You lose!",
        Outcome::TimeUp => "Time's up! You lost!",
    };
    let size = game.maze.size();
    let needed_h = (size + 2) as u16;
    let needed_w = (size * CELL_W) as u16;
    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(MoveTo(0, needed_h))?;
    } else {
        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        stdout.queue(MoveTo(origin_x, origin_y + size as u16))?;
    }
    stdout.queue(Print(format!(
        "{} Final score {} - {} (press q to quit)",
        message, game.scores.human, game.scores.opponent
    )))?;
    stdout.flush()?;
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && (key.code == KeyCode::Char('q') || key.code == KeyCode::Esc)
                {
                    return Ok(());
                }
            }
        }
    }
}

//! Card-deck demo.
//!
//! A stack of cards in the terminal; grab the top one with the mouse and
//! fling it away. Release past the halfway line (or with enough speed and
//! the right direction) and the card dismisses, the next one springing back
//! into place. Press `d` to dismiss programmatically, arrow keys to change
//! the dismiss direction, `q` to quit.

use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};

use swiper::constants::MAX_FLING_VELOCITY;
use swiper::{Axis, Direction, SwiperCallbacks, SwiperConfig, SwiperState, VelocityTracker};
use swiper_runtime::platform::DefaultScheduler;
use swiper_runtime::scheduler::Scheduler;

const CARD_WIDTH: u16 = 26;
const CARD_HEIGHT: u16 = 9;
const FRAME: Duration = Duration::from_millis(16);

const CARD_COLORS: [Color; 5] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
];

/// Puts the terminal into raw mode with the alternate screen and mouse
/// capture, and restores everything on drop (including on panic unwind).
struct TerminalSession;

impl TerminalSession {
    fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let session = TerminalSession::new()?;
    let result = run();
    drop(session);

    if result.is_ok() {
        println!("Deck closed.");
    }
    result
}

fn run() -> Result<()> {
    let scheduler = Scheduler::new(Arc::new(DefaultScheduler));
    let (cols, rows) = terminal::size()?;

    let deck: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(
        (1..=6).map(|n| format!("Card {n}")).collect(),
    ));
    let dirty = Rc::new(Cell::new(true));

    let callbacks = SwiperCallbacks::new()
        .on_start(|| log::debug!("drag started"))
        .on_dismiss({
            let deck = deck.clone();
            let dirty = dirty.clone();
            move || {
                let gone = deck.borrow_mut().remove(0);
                log::info!("dismissed {gone}");
                dirty.set(true);
            }
        })
        .on_end(|| log::debug!("restoring"));

    let state = SwiperState::new(
        scheduler.handle(),
        SwiperConfig {
            direction: Direction::Up,
            ..SwiperConfig::default()
        },
        callbacks,
    );
    refresh_extent(&state, cols, rows);
    state.subscribe({
        let dirty = dirty.clone();
        move || dirty.set(true)
    });

    let mut tracker = VelocityTracker::new();
    let mut dragging = false;
    let mut last_position = (0u16, 0u16);
    let mut screen = (cols, rows);
    let started = Instant::now();
    let mut stdout = io::stdout();

    loop {
        if event::poll(FRAME)? {
            loop {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('d') => {
                            if !deck.borrow().is_empty() {
                                state.dismiss_it();
                            }
                        }
                        KeyCode::Up => retarget(&state, Direction::Up, screen, &dirty),
                        KeyCode::Down => retarget(&state, Direction::Down, screen, &dirty),
                        KeyCode::Left => retarget(&state, Direction::Left, screen, &dirty),
                        KeyCode::Right => retarget(&state, Direction::Right, screen, &dirty),
                        _ => {}
                    },
                    Event::Mouse(mouse) => {
                        let position = (mouse.column, mouse.row);
                        match mouse.kind {
                            MouseEventKind::Down(MouseButton::Left) => {
                                if !deck.borrow().is_empty() {
                                    dragging = true;
                                    last_position = position;
                                    tracker.reset();
                                    tracker.add_sample(
                                        started.elapsed().as_millis() as i64,
                                        axis_position(&state, position),
                                    );
                                    state.on_drag_start();
                                }
                            }
                            MouseEventKind::Drag(MouseButton::Left) if dragging => {
                                let delta = axis_position(&state, position)
                                    - axis_position(&state, last_position);
                                last_position = position;
                                tracker.add_sample(
                                    started.elapsed().as_millis() as i64,
                                    axis_position(&state, position),
                                );
                                state.on_drag_delta(delta);
                            }
                            MouseEventKind::Up(MouseButton::Left) if dragging => {
                                dragging = false;
                                let velocity = tracker.velocity_capped(MAX_FLING_VELOCITY);
                                state.on_drag_end(velocity);
                            }
                            _ => {}
                        }
                    }
                    Event::Resize(new_cols, new_rows) => {
                        screen = (new_cols, new_rows);
                        refresh_extent(&state, new_cols, new_rows);
                        dirty.set(true);
                    }
                    _ => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        scheduler.drain_frame_callbacks(started.elapsed().as_nanos() as u64);

        if dirty.replace(false) {
            render(&mut stdout, &deck.borrow(), &state, screen)?;
        }
    }
}

/// The tracked coordinate along the active axis, in cell units.
fn axis_position(state: &SwiperState, position: (u16, u16)) -> f32 {
    match state.direction().axis() {
        Axis::Horizontal => position.0 as f32,
        Axis::Vertical => position.1 as f32,
    }
}

/// Travel distance to fully off-screen along the active axis.
fn refresh_extent(state: &SwiperState, cols: u16, rows: u16) {
    let extent = match state.direction().axis() {
        Axis::Horizontal => cols as f32,
        Axis::Vertical => rows as f32,
    };
    state.set_bound_extent(extent);
}

fn retarget(state: &SwiperState, direction: Direction, screen: (u16, u16), dirty: &Rc<Cell<bool>>) {
    state.set_direction(direction);
    refresh_extent(state, screen.0, screen.1);
    dirty.set(true);
}

fn render(
    stdout: &mut impl Write,
    deck: &[String],
    state: &SwiperState,
    (cols, rows): (u16, u16),
) -> Result<()> {
    queue!(stdout, terminal::Clear(terminal::ClearType::All))?;

    let center_col = (cols.saturating_sub(CARD_WIDTH) / 2) as i32;
    let center_row = (rows.saturating_sub(CARD_HEIGHT) / 2) as i32;

    if deck.is_empty() {
        queue!(
            stdout,
            cursor::MoveTo(center_col.max(0) as u16, center_row.max(0) as u16),
            Print("Deck empty - press q to quit")
        )?;
        stdout.flush()?;
        return Ok(());
    }

    // The card underneath sits at rest; only the top card carries the offset.
    if deck.len() > 1 {
        draw_card(
            stdout,
            center_col,
            center_row,
            &deck[1],
            card_color(&deck[1]),
            cols,
            rows,
        )?;
    }

    let offset = state.offset().round() as i32;
    let (top_col, top_row) = match state.direction().axis() {
        Axis::Horizontal => (center_col + offset, center_row),
        Axis::Vertical => (center_col, center_row + offset),
    };
    draw_card(
        stdout,
        top_col,
        top_row,
        &deck[0],
        card_color(&deck[0]),
        cols,
        rows,
    )?;

    let status = format!(
        "offset {:+7.1}  progress {:3.0}%  {:?} {:?}  |  drag: mouse  d: dismiss  arrows: direction  q: quit",
        state.offset(),
        state.progress() * 100.0,
        state.phase(),
        state.direction(),
    );
    print_clipped(stdout, 0, rows as i32 - 1, &status, cols, rows)?;
    stdout.flush()?;
    Ok(())
}

fn card_color(label: &str) -> Color {
    let index = label.bytes().map(usize::from).sum::<usize>() % CARD_COLORS.len();
    CARD_COLORS[index]
}

fn draw_card(
    stdout: &mut impl Write,
    col: i32,
    row: i32,
    label: &str,
    color: Color,
    cols: u16,
    rows: u16,
) -> Result<()> {
    let interior = (CARD_WIDTH - 2) as usize;
    queue!(stdout, SetForegroundColor(color))?;
    for line_index in 0..CARD_HEIGHT {
        let line = match line_index {
            0 => format!("\u{250c}{}\u{2510}", "\u{2500}".repeat(interior)),
            i if i == CARD_HEIGHT - 1 => {
                format!("\u{2514}{}\u{2518}", "\u{2500}".repeat(interior))
            }
            i if i == CARD_HEIGHT / 2 => {
                format!("\u{2502}{label:^interior$}\u{2502}")
            }
            _ => format!("\u{2502}{}\u{2502}", " ".repeat(interior)),
        };
        print_clipped(stdout, col, row + line_index as i32, &line, cols, rows)?;
    }
    queue!(stdout, ResetColor)?;
    Ok(())
}

/// Prints `text` at a possibly off-screen position, clipping to the
/// viewport. Assumes one terminal cell per char, which holds for the
/// box-drawing set used here.
fn print_clipped(
    stdout: &mut impl Write,
    col: i32,
    row: i32,
    text: &str,
    cols: u16,
    rows: u16,
) -> Result<()> {
    if row < 0 || row >= rows as i32 {
        return Ok(());
    }
    let skip = if col < 0 { (-col) as usize } else { 0 };
    let col = col.max(0);
    let budget = (cols as i32 - col).max(0) as usize;
    let visible: String = text.chars().skip(skip).take(budget).collect();
    if visible.is_empty() {
        return Ok(());
    }
    queue!(stdout, cursor::MoveTo(col as u16, row as u16), Print(visible))?;
    Ok(())
}

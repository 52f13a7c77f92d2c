use std::{
    io::{stdin, stdout, Write},
    process::exit,
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use termion::{event::Key, input::TermRead, raw::IntoRawMode};

use crate::{pos, Frame, Pos, SimHandle, World};

use canvas::Canvas;
mod canvas;

pub struct View {
    thread: JoinHandle<()>,
}

impl View {
    pub fn spawn<W>(handle: SimHandle<W>) -> Self
    where
        W: World,
    {
        let thread = thread::spawn(|| view_loop(handle));
        Self { thread }
    }

    pub fn join(self) {
        self.thread.join().unwrap();
    }
}

#[derive(Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug)]
pub enum InputCmd {
    Exit,
    Move(Dir),
    ZoomIn,
    ZoomOut,
    Accelerate,
    Decelerate,
    ToggleRun,
    ToggleCell,
    Clear,
}

fn input_loop(sender: mpsc::Sender<InputCmd>) {
    let stdout = stdout().into_raw_mode().unwrap();
    for c in stdin().keys() {
        let command = match c.unwrap() {
            Key::Char('q') => InputCmd::Exit,
            Key::Char('\n') => InputCmd::ToggleRun,
            Key::Char(' ') => InputCmd::ToggleCell,
            Key::Esc => InputCmd::Clear,
            Key::Up => InputCmd::Move(Dir::Up),
            Key::Down => InputCmd::Move(Dir::Down),
            Key::Left => InputCmd::Move(Dir::Left),
            Key::Right => InputCmd::Move(Dir::Right),
            Key::Char('+') | Key::Char('=') => InputCmd::ZoomIn,
            Key::Char('-') => InputCmd::ZoomOut,
            Key::Char(']') => InputCmd::Accelerate,
            Key::Char('[') => InputCmd::Decelerate,
            _ => continue,
        };

        if let InputCmd::Exit = command {
            // leave raw mode before the view tears the process down
            stdout.suspend_raw_mode().unwrap();
            sender.send(command).unwrap();
            break;
        }
        sender.send(command).unwrap();
    }
    drop(stdout);
}

const VIEW_REFRESH_INTERVAL: Duration = Duration::from_millis(100);
const PAN_STEP: i32 = 4;
const MIN_ZOOM: i32 = 1;
const MAX_ZOOM: i32 = 8;

struct ViewState {
    /// world cell shown at the canvas top-left corner
    origin: Pos,
    /// edit cursor, in cell coordinates
    cursor: Pos,
    /// terminal characters per cell
    zoom: i32,
    help: bool,
}

impl ViewState {
    /// Starts with the origin cell (0, 0) roughly at the screen center.
    fn centered() -> Self {
        let (width, height) = termion::terminal_size().unwrap();
        let zoom = 2;
        let origin = pos!(
            -(width as i32 / zoom / 2),
            -(height as i32 / zoom / 2)
        );
        Self {
            origin,
            cursor: pos!(0, 0),
            zoom,
            help: true,
        }
    }
}

fn view_loop<W>(handle: SimHandle<W>)
where
    W: World,
{
    let (sender, receiver) = mpsc::channel();
    let _input_handle = thread::spawn(|| input_loop(sender));

    print!("{}", termion::cursor::Hide);

    let mut state = ViewState::centered();
    loop {
        let frame = handle.snapshot();
        handle_inputs(&receiver, &mut state, &handle, &frame);
        draw(&mut state, &frame);
        thread::sleep(VIEW_REFRESH_INTERVAL);
    }
}

fn handle_inputs<W>(
    receiver: &mpsc::Receiver<InputCmd>,
    state: &mut ViewState,
    handle: &SimHandle<W>,
    frame: &Frame<W>,
) where
    W: World,
{
    let Some(cmd) = receiver.try_recv().ok() else {
        return;
    };

    // the first key press only dismisses the help screen
    if state.help {
        state.help = false;
        if !matches!(cmd, InputCmd::Exit) {
            return;
        }
    }

    match cmd {
        InputCmd::Exit => {
            let clear = termion::clear::All;
            let goto = termion::cursor::Goto(1, 1);
            let show = termion::cursor::Show;
            print!("{clear}{goto}{show}");
            stdout().flush().unwrap();
            exit(0);
        }
        InputCmd::Move(direction) => {
            let offset = match direction {
                Dir::Up => pos!(0, -1),
                Dir::Down => pos!(0, 1),
                Dir::Left => pos!(-1, 0),
                Dir::Right => pos!(1, 0),
            };
            if frame.running {
                state.origin = state.origin + pos!(offset.x * PAN_STEP, offset.y * PAN_STEP);
            } else {
                state.cursor = state.cursor + offset;
            }
        }
        InputCmd::ZoomIn => state.zoom = (state.zoom + 1).min(MAX_ZOOM),
        InputCmd::ZoomOut => state.zoom = (state.zoom - 1).max(MIN_ZOOM),
        InputCmd::Accelerate => handle.accelerate(),
        InputCmd::Decelerate => handle.decelerate(),
        InputCmd::ToggleRun => handle.toggle_running(),
        InputCmd::ToggleCell => {
            if !frame.running {
                handle.toggle(state.cursor);
            }
        }
        InputCmd::Clear => handle.reset(),
    }
}

fn draw<W>(state: &mut ViewState, frame: &Frame<W>)
where
    W: World,
{
    let mut canvas = Canvas::from_screen();

    if state.help {
        draw_help(&mut canvas);
        canvas.display();
        return;
    }

    if !frame.running {
        keep_cursor_visible(state, &canvas);
    }

    let (origin, zoom) = (state.origin, state.zoom);
    canvas.layer(|p| {
        let cell = origin + pos!(p.x / zoom, p.y / zoom);
        frame.world.is_alive(cell).then_some('#')
    });

    if !frame.running {
        let cursor = state.cursor;
        let marker = if frame.world.is_alive(cursor) { '@' } else { '+' };
        canvas.layer(|p| {
            let cell = origin + pos!(p.x / zoom, p.y / zoom);
            (cell == cursor).then_some(marker)
        });
    }

    canvas.display();
    draw_status(state, frame);
}

/// Pans the viewport whenever the edit cursor walks out of it.
fn keep_cursor_visible(state: &mut ViewState, canvas: &Canvas) {
    let cells_wide = (canvas.width() as i32 / state.zoom).max(1);
    let cells_high = (canvas.height() as i32 / state.zoom).max(1);
    let offset = state.cursor - state.origin;
    if offset.x < 0 {
        state.origin.x = state.cursor.x;
    }
    if offset.y < 0 {
        state.origin.y = state.cursor.y;
    }
    if offset.x >= cells_wide {
        state.origin.x = state.cursor.x - cells_wide + 1;
    }
    if offset.y >= cells_high {
        state.origin.y = state.cursor.y - cells_high + 1;
    }
}

fn draw_status<W>(state: &ViewState, frame: &Frame<W>)
where
    W: World,
{
    let run_state = if frame.running { "running" } else { "paused" };
    let mut status = format!(
        "gen {} | alive {} | {run_state} | tick {}ms | zoom {}",
        frame.generation,
        frame.world.len(),
        frame.interval.as_millis(),
        state.zoom,
    );
    if !frame.running {
        status += &format!(" | cursor {}", state.cursor);
    }

    let (width, height) = termion::terminal_size().unwrap();
    status.truncate(width as usize);
    let goto = termion::cursor::Goto(1, height);
    let clear = termion::clear::CurrentLine;
    print!("{goto}{clear}{status}");
    stdout().flush().unwrap();
}

const HELP: &str = "\
Conway's Game of Life

Any live cell with 2 or 3 live neighbors stays alive.
Any live cell with fewer than 2 live neighbors dies (underpopulation).
Any live cell with more than 3 live neighbors dies (overpopulation).
Any dead cell with exactly 3 live neighbors becomes alive (reproduction).

enter   run or pause the simulation
space   toggle the cell under the cursor (while paused)
arrows  pan the view while running, move the cursor while paused
+ / -   zoom in and out
] / [   speed the simulation up and down
esc     clear the grid
q       quit

press enter to continue";

fn draw_help(canvas: &mut Canvas) {
    let lines: Vec<&str> = HELP.lines().collect();
    let top = canvas.height().saturating_sub(lines.len()) / 2;
    for (index, line) in lines.iter().enumerate() {
        let x = canvas.width().saturating_sub(line.chars().count()) / 2;
        canvas.text(x, top + index, line);
    }
}

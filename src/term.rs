use crate::engine::{EndCause, Snapshot};
use crate::error::{GameError, GameResult};
use crate::game::{Ack, Command, InputSource, Renderer};
use crate::snake::Direction;
use crate::{Coords, TermInt};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, read, poll};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';

const HEAD_COLOR: Color = Color::Red;
const BODY_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Cyan;
const BORDER_COLOR: Color = Color::White;
const MESSAGE_COLOR: Color = Color::DarkYellow;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

/// Owns the terminal: raw mode, the alternate screen, and a buffer of what
/// is currently on it so frames only write the cells that changed.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Cell>,
    board: Coords,
    current_msg: Option<Message>,
    active: bool,
}

struct Message {
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> GameResult<Self> {
        let (width, height) = terminal::size()?;
        let screen = vec![BLANK; width as usize * height as usize];
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen,
            board: (width, height),
            current_msg: None,
            active: false,
        })
    }

    /// The board plus the score line under it must fit on screen.
    pub fn check_fits(&self, board_width: TermInt, board_height: TermInt) -> GameResult<()> {
        let needed_height = board_height.saturating_add(1);
        if self.width < board_width || self.height < needed_height {
            return Err(GameError::TerminalTooSmall {
                width: self.width,
                height: self.height,
                needed_width: board_width,
                needed_height,
            });
        }
        Ok(())
    }

    pub fn setup(&mut self) -> GameResult<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        Ok(())
    }

    pub fn restore(&mut self) -> GameResult<()> {
        if !self.active {
            return Ok(());
        }

        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    fn clear(&mut self) -> GameResult<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    fn flush(&mut self) -> GameResult<()> {
        self.stdout.flush().map_err(crossterm::ErrorKind::from)?;
        Ok(())
    }

    fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    fn in_bounds(&self, pos: Coords) -> bool {
        pos.0 < self.width && pos.1 < self.height
    }

    fn index(&self, pos: Coords) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }

    /// Writes a cell unless the screen already shows exactly that.
    fn paint(&mut self, pos: Coords, cell: Cell) -> GameResult<()> {
        if !self.in_bounds(pos) {
            return Ok(());
        }

        let idx = self.index(pos);
        if self.screen[idx] != cell {
            self.print_at_no_save(pos, cell)?;
            self.screen[idx] = cell;
        }
        Ok(())
    }

    fn paint_str(&mut self, pos: Coords, text: &str, color: Color) -> GameResult<()> {
        for (i, ch) in text.chars().enumerate() {
            self.paint((pos.0.saturating_add(i as TermInt), pos.1), Cell { ch, color })?;
        }
        Ok(())
    }

    // Messages go through here so the buffer keeps what lies underneath
    fn print_at_no_save(&mut self, pos: Coords, cell: Cell) -> GameResult<()> {
        if !self.in_bounds(pos) {
            return Ok(());
        }

        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            style::SetForegroundColor(cell.color),
            style::Print(cell.ch),
            style::ResetColor
        )?;
        Ok(())
    }

    fn draw_borders(&mut self) -> GameResult<()> {
        let (width, height) = self.board;
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x {'+'} else {'-'};
            self.paint((x, 0), Cell { ch, color: BORDER_COLOR })?;
            self.paint((x, end_y), Cell { ch, color: BORDER_COLOR })?;
        }

        for y in 1..end_y {
            self.paint((0, y), Cell { ch: '|', color: BORDER_COLOR })?;
            self.paint((end_x, y), Cell { ch: '|', color: BORDER_COLOR })?;
        }

        Ok(())
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        // Nothing sensible to do with a failure here
        let _ = self.restore();
    }
}

impl InputSource for TermManager {
    fn poll_command(&mut self) -> GameResult<Option<Command>> {
        while poll(Duration::from_millis(1))? {
            if let Event::Key(ev) = read()? {
                if let Some(command) = key_to_command(&ev) {
                    return Ok(Some(command));
                }
            }
        }

        Ok(None)
    }

    fn wait_for_ack(&mut self) -> GameResult<Ack> {
        loop {
            if let Event::Key(ev) = read()? {
                return Ok(if is_ctrl_c(&ev) { Ack::Quit } else { Ack::Continue });
            }
        }
    }
}

impl Renderer for TermManager {
    fn draw_board(&mut self, width: TermInt, height: TermInt) -> GameResult<()> {
        self.current_msg = None;
        self.board = (width, height);
        self.clear()?;
        self.draw_borders()?;
        self.flush()
    }

    fn draw(&mut self, snapshot: &Snapshot) -> GameResult<()> {
        let (width, height) = (snapshot.grid_width, snapshot.grid_height);
        let inner_width = (width - 2) as usize;
        let mut frame = vec![BLANK; inner_width * (height - 2) as usize];
        let slot = |pos: Coords| (pos.1 as usize - 1) * inner_width + (pos.0 as usize - 1);
        let inside = |pos: Coords| pos.0 > 0 && pos.1 > 0 && pos.0 < width - 1 && pos.1 < height - 1;

        if let Some(food) = snapshot.food {
            frame[slot(food)] = Cell { ch: FOOD_CHAR, color: FOOD_COLOR };
        }
        for pos in snapshot.body.iter().filter(|pos| inside(**pos)) {
            frame[slot(*pos)] = Cell { ch: SNAKE_BODY_CHAR, color: BODY_COLOR };
        }
        if inside(snapshot.head) {
            frame[slot(snapshot.head)] = Cell { ch: snapshot.direction.head_char(), color: HEAD_COLOR };
        }

        for y in 1..height - 1 {
            for x in 1..width - 1 {
                self.paint((x, y), frame[slot((x, y))])?;
            }
        }

        let score_line = format!("Score: {:<6}", snapshot.score);
        self.paint_str((0, height), &score_line, Color::Reset)?;
        self.flush()
    }

    fn draw_game_over(&mut self, snapshot: &Snapshot, cause: EndCause) -> GameResult<()> {
        if cause != EndCause::BoardFull {
            let dead = Cell { ch: DEAD_SNAKE_CHAR, color: HEAD_COLOR };
            for pos in snapshot.body.iter().chain(std::iter::once(&snapshot.head)) {
                self.paint(*pos, dead)?;
            }
        }

        let title = match cause {
            EndCause::BoardFull => "You won!",
            EndCause::Wall | EndCause::SelfBite => "Game over!",
        };

        self.show_message(&[
            title,
            &*format!("Score: {}", snapshot.score),
            "",
            "Press any key to play again,",
            "or CTRL+C to quit.",
        ])
    }

    fn show_message(&mut self, lines: &[&str]) -> GameResult<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.board.0 / 2, self.board.1 / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));
        let blank = Cell { ch: ' ', color: MESSAGE_COLOR };

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), blank)?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), Cell { ch, color: MESSAGE_COLOR })?;
            }
        }

        self.current_msg = Some(Message::new(msg_width, msg_height, top_left));
        self.flush()
    }

    fn hide_message(&mut self) -> GameResult<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let pos = (top_left.0 + x_diff, top_left.1 + y_diff);
                if self.in_bounds(pos) {
                    let cell = self.screen[self.index(pos)];
                    self.print_at_no_save(pos, cell)?;
                }
            }
        }

        self.flush()
    }
}

impl Message {
    pub fn new(width: TermInt, height: TermInt, top_left: Coords) -> Self {
        Message { width, height, top_left }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}

fn key_to_command(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Steer(Direction::Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Steer(Direction::Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Steer(Direction::Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Steer(Direction::Right)),
        KeyCode::Esc => Some(Command::Pause),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

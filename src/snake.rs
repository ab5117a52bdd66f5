use std::collections::VecDeque;

use crate::{Coords, TermInt};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Right => Left,
            Down => Up,
            Left => Right,
            Up => Down,
        }
    }

    /// The cell one unit away from `pos` in this direction. Saturates at 0,
    /// which is wall anyway.
    pub fn step(self, pos: Coords) -> Coords {
        match self {
            Right => (pos.0.saturating_add(1), pos.1),
            Down => (pos.0, pos.1.saturating_add(1)),
            Left => (pos.0.saturating_sub(1), pos.1),
            Up => (pos.0, pos.1.saturating_sub(1)),
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// A turn straight back onto the neck is never allowed.
pub fn is_reversal(current: Direction, requested: Direction) -> bool {
    requested == current.opposite()
}

/// The head plus the trail of cells it has left behind. `body` runs from the
/// tail (front) to the segment right behind the head (back).
///
/// Every step method consumes the snake and hands back the next one, so a
/// tick reads as a straight pipeline of moves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snake {
    head: Coords,
    body: VecDeque<Coords>,
}

impl Snake {
    pub fn new(head: Coords) -> Self {
        Snake { head, body: VecDeque::new() }
    }

    pub fn head(&self) -> Coords {
        self.head
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn occupies(&self, pos: Coords) -> bool {
        self.head == pos || self.body.contains(&pos)
    }

    /// Leaves a segment where the head currently is.
    pub fn grow(mut self) -> Self {
        self.body.push_back(self.head);
        self
    }

    pub fn advance(mut self, direction: Direction) -> Self {
        self.head = direction.step(self.head);
        self
    }

    /// Drops tail segments until the body is at most `max_len` long.
    pub fn trim(mut self, max_len: usize) -> Self {
        while self.body.len() > max_len {
            self.body.pop_front();
        }
        self
    }

    pub fn hits_wall(&self, width: TermInt, height: TermInt) -> bool {
        let (x, y) = self.head;
        x == 0 || y == 0 || x >= width - 1 || y >= height - 1
    }

    pub fn bites_itself(&self) -> bool {
        self.body.contains(&self.head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(snake: Snake, direction: Direction, max_len: usize) -> Snake {
        snake.grow().advance(direction).trim(max_len)
    }

    #[test]
    fn opposites_pair_up() {
        for dir in [Right, Down, Left, Up] {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
            assert!(is_reversal(dir, dir.opposite()));
            assert!(!is_reversal(dir, dir));
        }
        assert!(!is_reversal(Right, Up));
        assert!(!is_reversal(Right, Down));
    }

    #[test]
    fn steps_follow_screen_axes() {
        assert_eq!(Right.step((5, 5)), (6, 5));
        assert_eq!(Down.step((5, 5)), (5, 6));
        assert_eq!(Left.step((5, 5)), (4, 5));
        assert_eq!(Up.step((5, 5)), (5, 4));
        assert_eq!(Left.step((0, 3)), (0, 3));
    }

    #[test]
    fn body_trails_head_and_is_clamped() {
        let mut snake = Snake::new((5, 5));
        for _ in 0..4 {
            snake = walk(snake, Right, 2);
        }

        assert_eq!(snake.head(), (9, 5));
        assert_eq!(snake.body().iter().copied().collect::<Vec<_>>(), vec![(7, 5), (8, 5)]);
    }

    #[test]
    fn zero_length_body_stays_empty() {
        let snake = walk(Snake::new((5, 5)), Down, 0);
        assert_eq!(snake.head(), (5, 6));
        assert!(snake.body().is_empty());
        assert!(snake.occupies((5, 6)));
        assert!(!snake.occupies((5, 5)));
    }

    #[test]
    fn detects_walls_on_every_side() {
        assert!(Snake::new((0, 4)).hits_wall(10, 8));
        assert!(Snake::new((9, 4)).hits_wall(10, 8));
        assert!(Snake::new((4, 0)).hits_wall(10, 8));
        assert!(Snake::new((4, 7)).hits_wall(10, 8));
        assert!(!Snake::new((1, 1)).hits_wall(10, 8));
        assert!(!Snake::new((8, 6)).hits_wall(10, 8));
    }

    #[test]
    fn detects_self_bite() {
        let mut snake = Snake::new((5, 5));
        for dir in [Right, Right, Down, Left, Up] {
            snake = walk(snake, dir, 5);
        }

        assert_eq!(snake.head(), (6, 5));
        assert!(snake.bites_itself());
    }
}

use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    /// Unit step on the grid. `y` grows downwards.
    pub fn delta(self) -> Coords {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

/// Snake body stored head-first: `body[0]` is the head, the back is the tail.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
}

impl Snake {
    /// Lays out `size` cells in a straight line ending at `head`, trailing
    /// away from `direction`.
    pub fn new(head: Coords, size: usize, direction: Direction) -> Self {
        let diff = direction.delta();

        let body = (0..size.max(1) as i16)
            .map(|i| (head.0 - diff.0 * i, head.1 - diff.1 * i))
            .collect();
        Snake { body, direction }
    }

    #[cfg(test)]
    pub fn from_body<I: IntoIterator<Item = Coords>>(cells: I, direction: Direction) -> Self {
        Snake { body: cells.into_iter().collect(), direction }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// The cell the head would move into on the next step.
    pub fn next_head(&self) -> Coords {
        let (x, y) = self.head();
        let (dx, dy) = self.direction.delta();
        (x + dx, y + dy)
    }

    pub fn push_head(&mut self, pos: Coords) {
        self.body.push_front(pos);
    }

    pub fn pop_tail(&mut self) -> Option<Coords> {
        self.body.pop_back()
    }

    /// Returns whether the new direction was taken. Turning straight back
    /// into the body is refused.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(snake: &Snake) -> Vec<Coords> {
        snake.body().iter().copied().collect()
    }

    #[test]
    fn new_snake_trails_behind_head() {
        let snake = Snake::new((10, 10), 3, Right);
        assert_eq!(cells(&snake), vec![(10, 10), (9, 10), (8, 10)]);

        let snake = Snake::new((4, 4), 2, Up);
        assert_eq!(cells(&snake), vec![(4, 4), (4, 5)]);
    }

    #[test]
    fn new_snake_has_at_least_one_cell() {
        let snake = Snake::new((3, 3), 0, Left);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), (3, 3));
    }

    #[test]
    fn next_head_follows_direction() {
        let mut snake = Snake::new((10, 10), 3, Right);
        assert_eq!(snake.next_head(), (11, 10));

        snake.set_direction(Up);
        assert_eq!(snake.next_head(), (10, 9));
    }

    #[test]
    fn reversal_is_refused() {
        let mut snake = Snake::new((10, 10), 3, Right);
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Right);

        assert!(snake.set_direction(Right));
        assert!(snake.set_direction(Down));
        assert!(!snake.set_direction(Up));
        assert_eq!(snake.get_direction(), Down);
    }

    #[test]
    fn opposite_is_symmetric() {
        for dir in [Up, Down, Left, Right].iter() {
            assert_eq!(dir.opposite().opposite(), *dir);
            let (dx, dy) = dir.delta();
            assert_eq!(dir.opposite().delta(), (-dx, -dy));
        }
    }
}

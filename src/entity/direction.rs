use glam::IVec2;
use strum_macros::Display;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Tie-break order used when two candidate directions score equally.
pub const DIRECTIONS: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn as_ivec2(&self) -> IVec2 {
        (*self).into()
    }

    /// The heading implied by a velocity. The horizontal axis wins when both are non-zero.
    pub fn from_velocity(velocity: IVec2) -> Option<Direction> {
        match (velocity.x.signum(), velocity.y.signum()) {
            (1, _) => Some(Direction::Right),
            (-1, _) => Some(Direction::Left),
            (_, 1) => Some(Direction::Down),
            (_, -1) => Some(Direction::Up),
            _ => None,
        }
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => -IVec2::Y,
            Direction::Down => IVec2::Y,
            Direction::Left => -IVec2::X,
            Direction::Right => IVec2::X,
        }
    }
}

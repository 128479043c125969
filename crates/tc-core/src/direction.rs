//! Absolute compass directions and relative turn codes.
//!
//! Absolute codes run clockwise from north: `N=0, NE=1, ..., NW=7`.
//! Offsets are `(drow, dcol)` with rows increasing downward.
//!
//! Turn codes encode `diff = (new - prev) mod 8` through a fixed, asymmetric
//! table: odd codes `1, 3, 5` are right turns, even codes `2, 4, 6` are left
//! turns, `0` is straight and `7` is the U-turn.

use core::f32::consts::SQRT_2;

use crate::{Error, TilePos};

const OFFSETS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

// Indexed by `diff`.
const TURN_FROM_DIFF: [Turn; 8] = [
    Turn::Straight,
    Turn::SmallRight,
    Turn::MediumRight,
    Turn::BigRight,
    Turn::UTurn,
    Turn::BigLeft,
    Turn::MediumLeft,
    Turn::SmallLeft,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Direction {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Direction {
    /// Fixed enumeration order used by every neighbor scan.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Direction> {
        Self::ALL.get(code as usize).copied()
    }

    #[inline]
    pub fn offset(self) -> (isize, isize) {
        OFFSETS[self as usize]
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        self.code() & 1 == 1
    }

    /// Step length: `1.0` for orthogonal moves, `sqrt(2)` for diagonal ones.
    #[inline]
    pub fn distance(self) -> f32 {
        if self.is_diagonal() { SQRT_2 } else { 1.0 }
    }

    #[inline]
    pub fn opposite(self) -> Direction {
        Self::ALL[((self.code() + 4) & 7) as usize]
    }

    /// Direction of the unit move `from -> to`.
    pub fn between(from: TilePos, to: TilePos) -> Result<Direction, Error> {
        let dr = to.row as isize - from.row as isize;
        let dc = to.col as isize - from.col as isize;
        Self::ALL
            .into_iter()
            .find(|d| d.offset() == (dr, dc))
            .ok_or(Error::NotAdjacent { from, to })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Turn {
    Straight = 0,
    SmallRight = 1,
    SmallLeft = 2,
    MediumRight = 3,
    MediumLeft = 4,
    BigRight = 5,
    BigLeft = 6,
    UTurn = 7,
}

impl Turn {
    pub fn between(prev: Direction, next: Direction) -> Turn {
        let diff = (next.code() + 8 - prev.code()) & 7;
        TURN_FROM_DIFF[diff as usize]
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Turn> {
        match code {
            0 => Some(Turn::Straight),
            1 => Some(Turn::SmallRight),
            2 => Some(Turn::SmallLeft),
            3 => Some(Turn::MediumRight),
            4 => Some(Turn::MediumLeft),
            5 => Some(Turn::BigRight),
            6 => Some(Turn::BigLeft),
            7 => Some(Turn::UTurn),
            _ => None,
        }
    }

    /// Unsigned sharpness in degrees, used to rank candidate moves.
    pub fn angle_deg(self) -> u16 {
        match self {
            Turn::Straight => 0,
            Turn::SmallRight | Turn::SmallLeft => 45,
            Turn::MediumRight | Turn::MediumLeft => 90,
            Turn::BigRight | Turn::BigLeft => 135,
            Turn::UTurn => 180,
        }
    }

    pub fn is_right(self) -> bool {
        matches!(self, Turn::SmallRight | Turn::MediumRight | Turn::BigRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, Turn::SmallLeft | Turn::MediumLeft | Turn::BigLeft)
    }

    pub fn is_u_turn(self) -> bool {
        self == Turn::UTurn
    }
}

/// One move of a chain: the turn relative to the previous heading and the
/// Euclidean length of the move in tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub turn: Turn,
    pub distance: f32,
}

impl Step {
    pub fn new(prev: Direction, next: Direction) -> Self {
        Self {
            turn: Turn::between(prev, next),
            distance: next.distance(),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::f32::consts::SQRT_2;

    use proptest::prelude::*;

    use super::{Direction, Step, Turn};
    use crate::{Error, TilePos};

    #[test]
    fn direction_between_neighbors() {
        let c = TilePos::new(5, 5);
        assert_eq!(Direction::between(c, TilePos::new(4, 5)), Ok(Direction::N));
        assert_eq!(Direction::between(c, TilePos::new(4, 6)), Ok(Direction::NE));
        assert_eq!(Direction::between(c, TilePos::new(5, 6)), Ok(Direction::E));
        assert_eq!(Direction::between(c, TilePos::new(6, 6)), Ok(Direction::SE));
        assert_eq!(Direction::between(c, TilePos::new(6, 5)), Ok(Direction::S));
        assert_eq!(Direction::between(c, TilePos::new(6, 4)), Ok(Direction::SW));
        assert_eq!(Direction::between(c, TilePos::new(5, 4)), Ok(Direction::W));
        assert_eq!(Direction::between(c, TilePos::new(4, 4)), Ok(Direction::NW));
    }

    #[test]
    fn direction_between_rejects_non_neighbors() {
        let c = TilePos::new(5, 5);
        let far = TilePos::new(7, 5);
        assert_eq!(
            Direction::between(c, far),
            Err(Error::NotAdjacent { from: c, to: far })
        );
        assert!(Direction::between(c, c).is_err());
    }

    #[test]
    fn distances() {
        assert_eq!(Direction::N.distance(), 1.0);
        assert_eq!(Direction::E.distance(), 1.0);
        assert_eq!(Direction::NE.distance(), SQRT_2);
        assert_eq!(Direction::NW.distance(), SQRT_2);
    }

    #[test]
    fn turn_table() {
        let n = Direction::N;
        let expected = [0u8, 1, 3, 5, 7, 6, 4, 2];
        for (d, &want) in Direction::ALL.iter().zip(expected.iter()) {
            assert_eq!(Turn::between(n, *d).code(), want, "N -> {d:?}");
        }

        // diff wraps modulo 8
        assert_eq!(Turn::between(Direction::NW, Direction::N), Turn::SmallRight);
        assert_eq!(Turn::between(Direction::N, Direction::NW), Turn::SmallLeft);
        assert_eq!(Turn::between(Direction::W, Direction::E), Turn::UTurn);
    }

    #[test]
    fn turn_sides_and_angles() {
        assert!(Turn::SmallRight.is_right() && Turn::BigRight.is_right());
        assert!(Turn::SmallLeft.is_left() && Turn::MediumLeft.is_left());
        assert!(!Turn::Straight.is_left() && !Turn::Straight.is_right());
        assert!(Turn::UTurn.is_u_turn() && !Turn::UTurn.is_right());

        assert_eq!(Turn::Straight.angle_deg(), 0);
        assert_eq!(Turn::SmallLeft.angle_deg(), 45);
        assert_eq!(Turn::MediumRight.angle_deg(), 90);
        assert_eq!(Turn::BigLeft.angle_deg(), 135);
        assert_eq!(Turn::UTurn.angle_deg(), 180);
    }

    #[test]
    fn step_from_headings() {
        let s = Step::new(Direction::E, Direction::SE);
        assert_eq!(s.turn, Turn::SmallRight);
        assert_eq!(s.distance, SQRT_2);
    }

    proptest! {
        #[test]
        fn turn_angle_is_symmetric(p in 0u8..8, n in 0u8..8) {
            let p = Direction::from_code(p).unwrap();
            let n = Direction::from_code(n).unwrap();
            prop_assert_eq!(Turn::between(p, n).angle_deg(), Turn::between(n, p).angle_deg());
        }

        #[test]
        fn codes_round_trip(code in 0u8..8) {
            prop_assert_eq!(Direction::from_code(code).map(Direction::code), Some(code));
            prop_assert_eq!(Turn::from_code(code).map(Turn::code), Some(code));
            prop_assert_eq!(Direction::from_code(code).unwrap().opposite().opposite().code(), code);
        }
    }
}

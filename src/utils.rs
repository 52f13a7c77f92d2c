use std::fmt;
use std::ops::{Add, Sub};

/// Grid coordinate. `i32` leaves ample headroom for any extent an
/// interactive session can reach, so neighbor arithmetic never overflows.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[macro_export]
macro_rules! pos {
    ($x:expr, $y:expr) => {
        Pos { x: $x, y: $y }
    };
}

impl Pos {
    /// The 8 surrounding cells (Moore neighborhood), excluding `self`.
    pub fn neighbors(self) -> impl Iterator<Item = Pos> {
        (-1..=1)
            .map(|x| (-1..=1).map(move |y| pos!(x, y)))
            .flatten()
            .filter(|offset| *offset != pos!(0, 0))
            .map(move |offset| self + offset)
    }
}

impl Add for Pos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        pos!(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Pos {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        pos!(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[test]
fn test_neighbors() {
    let neighbors: Vec<_> = pos!(3, -2).neighbors().collect();
    assert_eq!(neighbors.len(), 8);
    assert!(!neighbors.contains(&pos!(3, -2)));
    assert!(neighbors.contains(&pos!(2, -3)));
    assert!(neighbors.contains(&pos!(4, -1)));
}

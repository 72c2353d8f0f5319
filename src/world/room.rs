//! Room geometry
//!
//! Axis-aligned room rectangles and the overlap test used during placement.

use serde::{Deserialize, Serialize};

use super::grid::Position;

/// An inclusive, axis-aligned cell rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Grow the rectangle by `amount` cells on every side
    pub fn inflate(&self, amount: i32) -> Rect {
        Rect::new(self.x1 - amount, self.y1 - amount, self.x2 + amount, self.y2 + amount)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x1 >= self.x1 && other.x2 <= self.x2 && other.y1 >= self.y1 && other.y2 <= self.y2
    }

    pub fn corners(&self) -> [Position; 4] {
        [
            Position::new(self.x1, self.y1),
            Position::new(self.x2, self.y1),
            Position::new(self.x1, self.y2),
            Position::new(self.x2, self.y2),
        ]
    }
}

/// A placed room
///
/// Centered on an odd coordinate with odd width and height, so its edges sit
/// a whole number of cells from the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub center: Position,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn new(center: Position, width: i32, height: i32) -> Self {
        Self { center, width, height }
    }

    /// The cells covered by the room, `center ± dim/2` inclusive
    pub fn rect(&self) -> Rect {
        let half_w = self.width / 2;
        let half_h = self.height / 2;
        Rect::new(
            self.center.x - half_w,
            self.center.y - half_h,
            self.center.x + half_w,
            self.center.y + half_h,
        )
    }

    /// Room rectangle grown by the separation distance
    pub fn inflated(&self, separation: i32) -> Rect {
        self.rect().inflate(separation)
    }

    /// Every interior cell of the room
    pub fn footprint(&self) -> impl Iterator<Item = Position> {
        let rect = self.rect();
        (rect.y1..=rect.y2).flat_map(move |y| (rect.x1..=rect.x2).map(move |x| Position::new(x, y)))
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }
}

/// Geometric intersection test supplied to room placement
pub trait OverlapTest {
    fn overlaps(&self, a: &Rect, b: &Rect) -> bool;
}

/// Plain pairwise rectangle intersection
#[derive(Debug, Clone, Copy, Default)]
pub struct AabbOverlap;

impl OverlapTest for AabbOverlap {
    fn overlaps(&self, a: &Rect, b: &Rect) -> bool {
        a.intersects(b)
    }
}

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::puzzle::{Clue, Point};

/// An axis-aligned rectangle of grid cells, identified by its top-left cell
/// and its extent.
///
/// The derived ordering is (row, col, height, width) ascending, which is the
/// canonical order used for solution listings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Rect {
    pub row: usize,
    pub col: usize,
    pub height: usize,
    pub width: usize,
}

impl Rect {
    pub fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    /// The clue class this rectangle's shape satisfies: `Plus` for squares,
    /// `Vert` when taller than wide, `Horiz` when wider than tall.
    pub fn shape(&self) -> Clue {
        match self.height.cmp(&self.width) {
            Ordering::Equal => Clue::Plus,
            Ordering::Greater => Clue::Vert,
            Ordering::Less => Clue::Horiz,
        }
    }

    /// Iterates over every cell inside the rectangle in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let Rect {
            row,
            col,
            height,
            width,
        } = *self;
        (row..row + height).flat_map(move |r| (col..col + width).map(move |c| Point::new(r, c)))
    }

    pub fn contains(&self, p: Point) -> bool {
        p.row >= self.row
            && p.row < self.row + self.height
            && p.col >= self.col
            && p.col < self.col + self.width
    }

    // Corner cells. Height and width must be positive.

    pub fn top_left(&self) -> Point {
        Point::new(self.row, self.col)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.row, self.col + self.width - 1)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.row + self.height - 1, self.col)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.row + self.height - 1, self.col + self.width - 1)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.row, self.col, self.height, self.width)
    }
}

/// Error for a malformed `row,col,height,width` rectangle specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed rectangle spec {input:?}: expected `row,col,height,width`")]
pub struct ParseRectError {
    input: String,
}

impl FromStr for Rect {
    type Err = ParseRectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRectError {
            input: s.to_string(),
        };
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(err());
        }
        let mut fields = [0usize; 4];
        for (field, part) in fields.iter_mut().zip(&parts) {
            *field = part.trim().parse().map_err(|_| err())?;
        }
        Ok(Rect::new(fields[0], fields[1], fields[2], fields[3]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rect() {
        let rect: Rect = "1,2,3,4".parse().unwrap();
        assert_eq!(rect, Rect::new(1, 2, 3, 4));
    }

    #[test]
    fn test_parse_rect_rejects_malformed() {
        assert!("".parse::<Rect>().is_err());
        assert!("1,2,3".parse::<Rect>().is_err());
        assert!("1,2,3,4,5".parse::<Rect>().is_err());
        assert!("1,2,3,x".parse::<Rect>().is_err());
        assert!("1,2,3,-4".parse::<Rect>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let rect = Rect::new(0, 3, 2, 1);
        assert_eq!(rect.to_string(), "0,3,2,1");
        assert_eq!(rect.to_string().parse::<Rect>().unwrap(), rect);
    }

    #[test]
    fn test_shape_classes() {
        assert_eq!(Rect::new(0, 0, 2, 2).shape(), Clue::Plus);
        assert_eq!(Rect::new(0, 0, 3, 1).shape(), Clue::Vert);
        assert_eq!(Rect::new(0, 0, 1, 4).shape(), Clue::Horiz);
    }

    #[test]
    fn test_canonical_ordering() {
        let mut rects = vec![
            Rect::new(1, 0, 1, 1),
            Rect::new(0, 1, 1, 1),
            Rect::new(0, 0, 2, 1),
            Rect::new(0, 0, 1, 2),
        ];
        rects.sort();
        assert_eq!(
            rects,
            vec![
                Rect::new(0, 0, 1, 2),
                Rect::new(0, 0, 2, 1),
                Rect::new(0, 1, 1, 1),
                Rect::new(1, 0, 1, 1),
            ]
        );
    }

    #[test]
    fn test_points_and_corners() {
        let rect = Rect::new(1, 2, 2, 3);
        let points: Vec<Point> = rect.points().collect();
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], Point::new(1, 2));
        assert_eq!(points[5], Point::new(2, 4));
        assert_eq!(rect.top_left(), Point::new(1, 2));
        assert_eq!(rect.top_right(), Point::new(1, 4));
        assert_eq!(rect.bottom_left(), Point::new(2, 2));
        assert_eq!(rect.bottom_right(), Point::new(2, 4));
        assert!(rect.contains(Point::new(2, 3)));
        assert!(!rect.contains(Point::new(3, 2)));
    }
}

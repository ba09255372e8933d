//! Edge anchors: the nine anchor points and the human-written forms they parse from.
//!
//! An anchor says which reference point of the parent's bounds an edge is
//! measured from. `"top_left"`, `"Top-Left"`, `"top + left"`, `"top|left"`,
//! `"top & left"` and `"top and left"` all name [`AnchorPoint::TopLeft`].

use std::fmt;
use std::str::FromStr;

use logos::Logos;

use crate::error::SceneError;
use crate::geometry::Region;

/// Words of an anchor string. Joiners are skipped by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r_\-+|&]+")]
enum AnchorWord {
    #[token("top")]
    Top,
    #[token("middle")]
    Middle,
    #[token("bottom")]
    Bottom,
    #[token("left")]
    Left,
    #[token("center")]
    #[token("centre")]
    Center,
    #[token("right")]
    Right,
    #[token("and")]
    And,
}

/// Vertical component of an anchor point, ordered top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VAnchor {
    Top,
    Middle,
    Bottom,
}

/// Horizontal component of an anchor point, ordered left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HAnchor {
    Left,
    Center,
    Right,
}

/// One of nine reference points on a parent's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnchorPoint {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl AnchorPoint {
    /// All nine anchor points, row by row.
    pub const ALL: [AnchorPoint; 9] = [
        AnchorPoint::TopLeft,
        AnchorPoint::TopCenter,
        AnchorPoint::TopRight,
        AnchorPoint::MiddleLeft,
        AnchorPoint::MiddleCenter,
        AnchorPoint::MiddleRight,
        AnchorPoint::BottomLeft,
        AnchorPoint::BottomCenter,
        AnchorPoint::BottomRight,
    ];

    /// Build from the two components.
    pub const fn from_parts(v: VAnchor, h: HAnchor) -> Self {
        match (v, h) {
            (VAnchor::Top, HAnchor::Left) => AnchorPoint::TopLeft,
            (VAnchor::Top, HAnchor::Center) => AnchorPoint::TopCenter,
            (VAnchor::Top, HAnchor::Right) => AnchorPoint::TopRight,
            (VAnchor::Middle, HAnchor::Left) => AnchorPoint::MiddleLeft,
            (VAnchor::Middle, HAnchor::Center) => AnchorPoint::MiddleCenter,
            (VAnchor::Middle, HAnchor::Right) => AnchorPoint::MiddleRight,
            (VAnchor::Bottom, HAnchor::Left) => AnchorPoint::BottomLeft,
            (VAnchor::Bottom, HAnchor::Center) => AnchorPoint::BottomCenter,
            (VAnchor::Bottom, HAnchor::Right) => AnchorPoint::BottomRight,
        }
    }

    /// The vertical component.
    pub const fn vertical(self) -> VAnchor {
        match self {
            AnchorPoint::TopLeft | AnchorPoint::TopCenter | AnchorPoint::TopRight => VAnchor::Top,
            AnchorPoint::MiddleLeft | AnchorPoint::MiddleCenter | AnchorPoint::MiddleRight => {
                VAnchor::Middle
            }
            AnchorPoint::BottomLeft | AnchorPoint::BottomCenter | AnchorPoint::BottomRight => {
                VAnchor::Bottom
            }
        }
    }

    /// The horizontal component.
    pub const fn horizontal(self) -> HAnchor {
        match self {
            AnchorPoint::TopLeft | AnchorPoint::MiddleLeft | AnchorPoint::BottomLeft => HAnchor::Left,
            AnchorPoint::TopCenter | AnchorPoint::MiddleCenter | AnchorPoint::BottomCenter => {
                HAnchor::Center
            }
            AnchorPoint::TopRight | AnchorPoint::MiddleRight | AnchorPoint::BottomRight => {
                HAnchor::Right
            }
        }
    }

    /// Horizontal reference coordinate on `parent`.
    pub fn ref_x(self, parent: Region) -> f32 {
        match self.horizontal() {
            HAnchor::Left => parent.left(),
            HAnchor::Center => parent.center_x(),
            HAnchor::Right => parent.right(),
        }
    }

    /// Vertical reference coordinate on `parent`.
    pub fn ref_y(self, parent: Region) -> f32 {
        match self.vertical() {
            VAnchor::Top => parent.top(),
            VAnchor::Middle => parent.center_y(),
            VAnchor::Bottom => parent.bottom(),
        }
    }

    /// Canonical `snake_case` name.
    pub const fn as_str(self) -> &'static str {
        match self {
            AnchorPoint::TopLeft => "top_left",
            AnchorPoint::TopCenter => "top_center",
            AnchorPoint::TopRight => "top_right",
            AnchorPoint::MiddleLeft => "middle_left",
            AnchorPoint::MiddleCenter => "middle_center",
            AnchorPoint::MiddleRight => "middle_right",
            AnchorPoint::BottomLeft => "bottom_left",
            AnchorPoint::BottomCenter => "bottom_center",
            AnchorPoint::BottomRight => "bottom_right",
        }
    }
}

impl fmt::Display for AnchorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorPoint {
    type Err = SceneError;

    /// Parse case-insensitively. The vertical and horizontal words may come in
    /// either order; exactly one of each is required.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        let invalid = || SceneError::InvalidAnchor(s.to_owned());

        let mut vertical = None;
        let mut horizontal = None;
        for word in AnchorWord::lexer(&lowered) {
            let (slot_v, slot_h) = match word.map_err(|()| invalid())? {
                AnchorWord::And => continue,
                AnchorWord::Top => (Some(VAnchor::Top), None),
                AnchorWord::Middle => (Some(VAnchor::Middle), None),
                AnchorWord::Bottom => (Some(VAnchor::Bottom), None),
                AnchorWord::Left => (None, Some(HAnchor::Left)),
                AnchorWord::Center => (None, Some(HAnchor::Center)),
                AnchorWord::Right => (None, Some(HAnchor::Right)),
            };
            if let Some(v) = slot_v {
                if vertical.replace(v).is_some() {
                    return Err(invalid());
                }
            }
            if let Some(h) = slot_h {
                if horizontal.replace(h).is_some() {
                    return Err(invalid());
                }
            }
        }

        match (vertical, horizontal) {
            (Some(v), Some(h)) => Ok(AnchorPoint::from_parts(v, h)),
            _ => Err(invalid()),
        }
    }
}

// ---------------------------------------------------------------------------
// Edge / Anchors
// ---------------------------------------------------------------------------

/// One of the four edges of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Top,
    Left,
    Bottom,
    Right,
}

/// The anchor assigned to each edge of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchors {
    pub top: AnchorPoint,
    pub left: AnchorPoint,
    pub bottom: AnchorPoint,
    pub right: AnchorPoint,
}

impl Anchors {
    /// All four edges anchored to the same point.
    pub const fn uniform(point: AnchorPoint) -> Self {
        Self { top: point, left: point, bottom: point, right: point }
    }

    /// The anchor of `edge`.
    pub fn get(&self, edge: Edge) -> AnchorPoint {
        match edge {
            Edge::Top => self.top,
            Edge::Left => self.left,
            Edge::Bottom => self.bottom,
            Edge::Right => self.right,
        }
    }

    /// Replace the anchor of `edge`.
    pub fn set(&mut self, edge: Edge, point: AnchorPoint) {
        match edge {
            Edge::Top => self.top = point,
            Edge::Left => self.left = point,
            Edge::Bottom => self.bottom = point,
            Edge::Right => self.right = point,
        }
    }

    /// Reference coordinate for `edge` on `parent`: x for left/right, y for top/bottom.
    pub fn reference(&self, edge: Edge, parent: Region) -> f32 {
        match edge {
            Edge::Left | Edge::Right => self.get(edge).ref_x(parent),
            Edge::Top | Edge::Bottom => self.get(edge).ref_y(parent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_joiner_normalizes_to_the_same_point() {
        for s in [
            "top_left",
            "top-left",
            "top+left",
            "top|left",
            "top & left",
            "top and left",
            "top left",
            "TOP_LEFT",
            "Top-Left",
            "left_top",
        ] {
            assert_eq!(s.parse::<AnchorPoint>().unwrap(), AnchorPoint::TopLeft, "{s}");
        }
    }

    #[test]
    fn display_round_trips_for_all_points() {
        for point in AnchorPoint::ALL {
            assert_eq!(point.to_string().parse::<AnchorPoint>().unwrap(), point);
        }
    }

    #[test]
    fn centre_spelling_accepted() {
        assert_eq!(
            "middle centre".parse::<AnchorPoint>().unwrap(),
            AnchorPoint::MiddleCenter
        );
    }

    #[test]
    fn rejects_incomplete_or_duplicated_words() {
        for s in ["top", "left", "top_bottom", "left-right", "", "top_lft", "top_left_right"] {
            assert!(
                matches!(s.parse::<AnchorPoint>(), Err(SceneError::InvalidAnchor(_))),
                "{s} should be rejected"
            );
        }
    }

    #[test]
    fn reference_points() {
        let parent = Region::new(100.0, 50.0, 200.0, 80.0);
        assert_eq!(AnchorPoint::TopLeft.ref_x(parent), 100.0);
        assert_eq!(AnchorPoint::TopCenter.ref_x(parent), 200.0);
        assert_eq!(AnchorPoint::BottomRight.ref_x(parent), 300.0);
        assert_eq!(AnchorPoint::TopLeft.ref_y(parent), 50.0);
        assert_eq!(AnchorPoint::MiddleLeft.ref_y(parent), 90.0);
        assert_eq!(AnchorPoint::BottomLeft.ref_y(parent), 130.0);
    }

    #[test]
    fn anchors_reference_uses_axis_of_edge() {
        let mut anchors = Anchors::default();
        anchors.set(Edge::Right, AnchorPoint::BottomRight);
        let parent = Region::new(0.0, 0.0, 10.0, 20.0);
        assert_eq!(anchors.reference(Edge::Right, parent), 10.0);
        assert_eq!(anchors.reference(Edge::Top, parent), 0.0);
        assert_eq!(anchors.get(Edge::Right), AnchorPoint::BottomRight);
    }
}

/// Edge a card is allowed to leave toward.
///
/// The direction fixes both the drag axis and the offset sign that counts
/// as dismissal: `Up`/`Left` dismiss on negative offsets, `Down`/`Right`
/// on positive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Up
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    /// True when an offset released at this position lies on the dismiss
    /// side of this direction.
    pub fn matches_offset(self, offset: f32) -> bool {
        match self {
            Direction::Up | Direction::Left => offset < 0.0,
            Direction::Down | Direction::Right => offset > 0.0,
        }
    }

    /// Signed edge target for a programmatic dismissal, independent of the
    /// current offset sign.
    pub fn dismiss_target(self, extent: f32) -> f32 {
        match self {
            Direction::Up | Direction::Left => -extent,
            Direction::Down | Direction::Right => extent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_split() {
        assert_eq!(Direction::Up.axis(), Axis::Vertical);
        assert_eq!(Direction::Down.axis(), Axis::Vertical);
        assert_eq!(Direction::Left.axis(), Axis::Horizontal);
        assert_eq!(Direction::Right.axis(), Axis::Horizontal);
    }

    #[test]
    fn dismiss_side_sign_table() {
        assert!(Direction::Up.matches_offset(-1.0));
        assert!(!Direction::Up.matches_offset(1.0));
        assert!(Direction::Left.matches_offset(-1.0));
        assert!(!Direction::Left.matches_offset(1.0));
        assert!(Direction::Down.matches_offset(1.0));
        assert!(!Direction::Down.matches_offset(-1.0));
        assert!(Direction::Right.matches_offset(1.0));
        assert!(!Direction::Right.matches_offset(-1.0));
    }

    #[test]
    fn zero_offset_matches_no_direction() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert!(!direction.matches_offset(0.0));
        }
    }

    #[test]
    fn programmatic_target_uses_direction_only() {
        assert_eq!(Direction::Up.dismiss_target(400.0), -400.0);
        assert_eq!(Direction::Left.dismiss_target(400.0), -400.0);
        assert_eq!(Direction::Down.dismiss_target(400.0), 400.0);
        assert_eq!(Direction::Right.dismiss_target(400.0), 400.0);
    }
}

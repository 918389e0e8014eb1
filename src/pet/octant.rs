use glam::IVec2;

/// One of the 8 compass sectors a cursor offset can fall into.
///
/// Screen y grows downward, so angles grow clockwise starting from `Right`.
/// Each sector is `(lower, upper]` in degrees; `Right` wraps around and
/// covers `(337.5, 360) ∪ [0, 22.5]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Octant {
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
    Up,
    UpRight,
}

impl Octant {
    pub const ALL: [Octant; 8] = [
        Octant::Right,
        Octant::DownRight,
        Octant::Down,
        Octant::DownLeft,
        Octant::Left,
        Octant::UpLeft,
        Octant::Up,
        Octant::UpRight,
    ];

    /// Classify an angle in degrees. Values outside `[0, 360)` are wrapped.
    pub fn from_degrees(angle: f64) -> Self {
        let a = angle.rem_euclid(360.0);
        if a <= 22.5 || a > 337.5 {
            Octant::Right
        } else if a <= 67.5 {
            Octant::DownRight
        } else if a <= 112.5 {
            Octant::Down
        } else if a <= 157.5 {
            Octant::DownLeft
        } else if a <= 202.5 {
            Octant::Left
        } else if a <= 247.5 {
            Octant::UpLeft
        } else if a <= 292.5 {
            Octant::Up
        } else {
            Octant::UpRight
        }
    }

    /// Classify a screen-space offset (x right, y down).
    pub fn from_offset(offset: IVec2) -> Self {
        Self::from_degrees(degrees(offset))
    }

    /// Unit step along the axes this octant moves on.
    pub fn step(self) -> IVec2 {
        match self {
            Octant::Right => IVec2::new(1, 0),
            Octant::DownRight => IVec2::new(1, 1),
            Octant::Down => IVec2::new(0, 1),
            Octant::DownLeft => IVec2::new(-1, 1),
            Octant::Left => IVec2::new(-1, 0),
            Octant::UpLeft => IVec2::new(-1, -1),
            Octant::Up => IVec2::new(0, -1),
            Octant::UpRight => IVec2::new(1, -1),
        }
    }
}

/// Angle of `offset` in degrees, normalized to `[0, 360)`.
pub fn degrees(offset: IVec2) -> f64 {
    let a = (offset.y as f64).atan2(offset.x as f64).to_degrees();
    let a = a.rem_euclid(360.0);
    // rem_euclid can round a tiny negative up to exactly 360
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_belong_to_the_lower_sector() {
        let cases = [
            (22.5, Octant::Right),
            (67.5, Octant::DownRight),
            (112.5, Octant::Down),
            (157.5, Octant::DownLeft),
            (202.5, Octant::Left),
            (247.5, Octant::UpLeft),
            (292.5, Octant::Up),
            (337.5, Octant::UpRight),
        ];
        for (angle, expected) in cases {
            assert_eq!(Octant::from_degrees(angle), expected, "angle {angle}");
        }
    }

    #[test]
    fn just_past_boundaries_moves_to_next_sector() {
        let cases = [
            (22.6, Octant::DownRight),
            (67.6, Octant::Down),
            (112.6, Octant::DownLeft),
            (157.6, Octant::Left),
            (202.6, Octant::UpLeft),
            (247.6, Octant::Up),
            (292.6, Octant::UpRight),
            (337.6, Octant::Right),
        ];
        for (angle, expected) in cases {
            assert_eq!(Octant::from_degrees(angle), expected, "angle {angle}");
        }
    }

    #[test]
    fn wraps_full_turns() {
        assert_eq!(Octant::from_degrees(0.0), Octant::Right);
        assert_eq!(Octant::from_degrees(360.0), Octant::Right);
        assert_eq!(Octant::from_degrees(-90.0), Octant::Up);
        assert_eq!(Octant::from_degrees(450.0), Octant::Down);
    }

    #[test]
    fn offsets_map_to_compass_directions() {
        assert_eq!(Octant::from_offset(IVec2::new(100, 0)), Octant::Right);
        assert_eq!(Octant::from_offset(IVec2::new(-100, 0)), Octant::Left);
        assert_eq!(Octant::from_offset(IVec2::new(0, 100)), Octant::Down);
        assert_eq!(Octant::from_offset(IVec2::new(0, -100)), Octant::Up);
        assert_eq!(Octant::from_offset(IVec2::new(50, 50)), Octant::DownRight);
        assert_eq!(Octant::from_offset(IVec2::new(-50, 50)), Octant::DownLeft);
        assert_eq!(Octant::from_offset(IVec2::new(-50, -50)), Octant::UpLeft);
        assert_eq!(Octant::from_offset(IVec2::new(50, -50)), Octant::UpRight);
    }

    #[test]
    fn degrees_stay_in_range() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..1000 {
            let offset = IVec2::new(rng.i32(-2000..2000), rng.i32(-2000..2000));
            let a = degrees(offset);
            assert!((0.0..360.0).contains(&a), "{offset} -> {a}");
        }
    }

    #[test]
    fn cardinal_steps_move_one_axis() {
        for octant in Octant::ALL {
            let step = octant.step();
            let axes = (step.x != 0) as u8 + (step.y != 0) as u8;
            let diagonal = matches!(
                octant,
                Octant::DownRight | Octant::DownLeft | Octant::UpLeft | Octant::UpRight
            );
            assert_eq!(axes, if diagonal { 2 } else { 1 }, "{octant:?}");
        }
    }
}

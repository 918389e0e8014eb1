/// Number of interchangeable poses the pet cycles through while following.
pub const POSE_COUNT: u8 = 8;

const POSE_NAMES: [&str; POSE_COUNT as usize] = ["0", "1", "2", "3", "4", "5", "6", "7"];

/// Key into the sprite table. Names match the asset filename stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// Following pose, index in `0..POSE_COUNT`.
    Pose(u8),
    /// First resting frame (`wait0`).
    RestA,
    /// Second resting frame (`wait1`).
    RestB,
}

impl SpriteKey {
    pub const ALL: [SpriteKey; 10] = [
        Self::Pose(0),
        Self::Pose(1),
        Self::Pose(2),
        Self::Pose(3),
        Self::Pose(4),
        Self::Pose(5),
        Self::Pose(6),
        Self::Pose(7),
        Self::RestA,
        Self::RestB,
    ];

    /// Uniform pick among the following poses.
    pub fn random_pose(rng: &mut fastrand::Rng) -> Self {
        Self::Pose(rng.u8(0..POSE_COUNT))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pose(i) => POSE_NAMES[usize::from(i) % POSE_NAMES.len()],
            Self::RestA => "wait0",
            Self::RestB => "wait1",
        }
    }
}

/// Sound triggered by the controller. Names match the asset filename stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Pet settles down.
    Rest,
    /// Pet wakes up and starts chasing.
    Alert,
    /// Cursor touched the pet.
    Contact,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [Self::Rest, Self::Alert, Self::Contact];

    pub fn name(self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Alert => "alert",
            Self::Contact => "contact",
        }
    }
}

/// Tick counts bounding the animation sub-phases of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub min: u32,
    pub max: u32,
}

impl Thresholds {
    pub const RESTING: Thresholds = Thresholds { min: 50, max: 100 };
    pub const FOLLOWING: Thresholds = Thresholds { min: 10, max: 20 };
}

/// Resting frame for a counter value: `RestA` below `min`, `RestB` after.
pub fn resting_frame(counter: u32, thresholds: Thresholds) -> SpriteKey {
    if counter < thresholds.min {
        SpriteKey::RestA
    } else {
        SpriteKey::RestB
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_names_are_unique() {
        let mut names: Vec<_> = SpriteKey::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SpriteKey::ALL.len());
    }

    #[test]
    fn random_pose_stays_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..500 {
            match SpriteKey::random_pose(&mut rng) {
                SpriteKey::Pose(i) => assert!(i < POSE_COUNT),
                other => panic!("unexpected key {other:?}"),
            }
        }
    }

    #[test]
    fn resting_frame_switches_at_min() {
        let t = Thresholds::RESTING;
        assert_eq!(resting_frame(0, t), SpriteKey::RestA);
        assert_eq!(resting_frame(t.min - 1, t), SpriteKey::RestA);
        assert_eq!(resting_frame(t.min, t), SpriteKey::RestB);
        assert_eq!(resting_frame(t.max - 1, t), SpriteKey::RestB);
    }
}

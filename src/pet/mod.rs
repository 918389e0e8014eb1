pub mod animation;
pub mod octant;

use glam::IVec2;

use self::animation::{resting_frame, SoundCue, SpriteKey, Thresholds};
use self::octant::Octant;

/// Sprite edge length in logical pixels. Also the window size.
pub const SPRITE_SIZE: i32 = 32;
/// Manhattan distance below which the cursor counts as touching the pet.
pub const CONTACT_DISTANCE: i32 = SPRITE_SIZE;
/// Distance moved per tick along each active axis.
pub const STEP: i32 = 3;

/// Something driven by the fixed-step simulation loop.
pub trait Simulated {
    type Input;
    type Output;

    /// Advance one tick.
    fn tick(&mut self, input: &Self::Input, rng: &mut fastrand::Rng) -> Self::Output;
}

/// Behaviour mode, toggled by clicking the pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Following,
    Resting,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Following => Mode::Resting,
            Mode::Resting => Mode::Following,
        }
    }

    /// Canonical animation thresholds for this mode.
    pub fn thresholds(self) -> Thresholds {
        match self {
            Mode::Following => Thresholds::FOLLOWING,
            Mode::Resting => Thresholds::RESTING,
        }
    }

    /// Sound played when entering this mode.
    pub fn entry_cue(self) -> SoundCue {
        match self {
            Mode::Following => SoundCue::Alert,
            Mode::Resting => SoundCue::Rest,
        }
    }
}

/// Per-tick input snapshot.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    /// Left button went down since the previous tick.
    pub pressed: bool,
    /// Cursor position in logical screen coordinates.
    pub cursor: IVec2,
    /// Monitor size in logical pixels; positions are clamped to `[0, bounds]`.
    pub bounds: IVec2,
}

/// What the host has to do after a tick. Every field is `None` when
/// nothing changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutput {
    pub position: Option<IVec2>,
    pub sprite: Option<SpriteKey>,
    pub sound: Option<SoundCue>,
}

/// The pet: window position, mode and animation state.
#[derive(Debug, Clone)]
pub struct PetState {
    position: IVec2,
    mode: Mode,
    counter: u32,
    thresholds: Thresholds,
    sprite: SpriteKey,
    last_sprite: Option<SpriteKey>,
    touching: bool,
}

impl PetState {
    /// Resting pet in the middle of the screen.
    pub fn new(bounds: IVec2, rng: &mut fastrand::Rng) -> Self {
        let mode = Mode::Resting;
        Self {
            position: (bounds / 2).max(IVec2::ZERO),
            mode,
            counter: 0,
            thresholds: mode.thresholds(),
            sprite: SpriteKey::random_pose(rng),
            last_sprite: None,
            touching: false,
        }
    }

    /// Top-left corner of the window.
    pub fn position(&self) -> IVec2 {
        self.position
    }

    pub fn center(&self) -> IVec2 {
        self.position + IVec2::splat(SPRITE_SIZE / 2)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sprite(&self) -> SpriteKey {
        self.sprite
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    fn toggle(&mut self, rng: &mut fastrand::Rng) -> SoundCue {
        self.mode = self.mode.toggled();
        self.thresholds = self.mode.thresholds();
        self.counter = 0;
        self.sprite = SpriteKey::random_pose(rng);
        if self.mode == Mode::Resting {
            self.sprite = resting_frame(self.counter, self.thresholds);
        }
        self.mode.entry_cue()
    }

    /// Alternate between the two resting frames.
    fn rest(&mut self) {
        self.counter += 1;
        if self.counter >= self.thresholds.max {
            self.counter = 0;
        }
        self.sprite = resting_frame(self.counter, self.thresholds);
    }

    /// Step toward the cursor unless it is already touching the pet.
    fn follow(&mut self, cursor: IVec2, bounds: IVec2, rng: &mut fastrand::Rng) -> Option<SoundCue> {
        let offset = cursor - self.center();
        let distance = offset.x.abs() + offset.y.abs();

        let mut cue = None;
        if distance < CONTACT_DISTANCE {
            if !self.touching {
                cue = Some(SoundCue::Contact);
            }
            self.touching = true;
        } else {
            self.touching = false;
            let step = Octant::from_offset(offset).step() * STEP;
            self.position = (self.position + step).clamp(IVec2::ZERO, bounds.max(IVec2::ZERO));
        }

        // Idle pose shuffle, independent of movement.
        self.counter += 1;
        if self.counter > self.thresholds.min {
            self.counter = 0;
            self.sprite = SpriteKey::random_pose(rng);
        }

        cue
    }
}

impl Simulated for PetState {
    type Input = TickInput;
    type Output = TickOutput;

    fn tick(&mut self, input: &TickInput, rng: &mut fastrand::Rng) -> TickOutput {
        let start = self.position;

        // A press tick only toggles; the new mode starts on the next tick.
        let sound = if input.pressed {
            Some(self.toggle(rng))
        } else {
            match self.mode {
                Mode::Resting => {
                    self.rest();
                    None
                }
                Mode::Following => self.follow(input.cursor, input.bounds, rng),
            }
        };

        let sprite = if self.last_sprite == Some(self.sprite) {
            None
        } else {
            self.last_sprite = Some(self.sprite);
            Some(self.sprite)
        };

        TickOutput {
            position: (self.position != start).then_some(self.position),
            sprite,
            sound,
        }
    }
}

//! Zone-based initial placement.
//!
//! A new element is classified into a functional zone by its type, anchored
//! at that zone's preferred spot, and nudged along X/Z until the validator
//! accepts it or the attempt budget runs out.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use shared::{Container, Element};

use crate::geometry::clamp_center;
use crate::state::settings::{JitterStrategy, PlacementSettings, ValidationSettings};
use crate::validation::{Candidate, Validator};

/// Clearance between an anchored element and the walls it is anchored to.
pub const ANCHOR_INSET: f64 = 0.1;

/// Functional zone of the container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Entrance,
    Sleeping,
    Dining,
    Bathroom,
    Kitchen,
    Living,
    Utilities,
    Appliances,
}

const ZONE_TABLE: &[(&str, Zone)] = &[
    ("door", Zone::Entrance),
    ("exit_door", Zone::Entrance),
    ("door_with_frame", Zone::Entrance),
    ("doors", Zone::Entrance),
    ("bed", Zone::Sleeping),
    ("double_bed", Zone::Sleeping),
    ("twobed", Zone::Sleeping),
    ("table", Zone::Dining),
    ("chair", Zone::Dining),
    ("table_chairs", Zone::Dining),
    ("table_and_chair", Zone::Dining),
    ("plastic_table", Zone::Dining),
    ("psx_wooden_chair", Zone::Dining),
    ("toilet", Zone::Bathroom),
    ("toilet_alt", Zone::Bathroom),
    ("sink", Zone::Bathroom),
    ("shower", Zone::Bathroom),
    ("kitchen_assets", Zone::Kitchen),
    ("cupboards", Zone::Kitchen),
    ("cupboard", Zone::Kitchen),
    ("sideboard_kitchen", Zone::Kitchen),
    ("sofa_large", Zone::Living),
    ("tv", Zone::Living),
    ("retro_tv", Zone::Living),
    ("lamp", Zone::Living),
    ("office_desk", Zone::Living),
    ("science_research_table", Zone::Living),
    ("shelf", Zone::Living),
    ("window", Zone::Living),
    ("dirty_window", Zone::Living),
    ("partition", Zone::Living),
    ("wall_panel", Zone::Living),
    ("cabin_wall", Zone::Living),
    ("fan", Zone::Utilities),
    ("tube_light", Zone::Utilities),
    ("square_recessed_led", Zone::Utilities),
    ("ac", Zone::Utilities),
    ("outlet", Zone::Utilities),
    ("switches", Zone::Utilities),
    ("fridge", Zone::Appliances),
    ("washing_machine", Zone::Appliances),
    ("table_fan", Zone::Appliances),
];

/// Utility types hung from the ceiling rather than a wall.
const CEILING_MOUNTED: &[&str] = &["fan", "tube_light", "square_recessed_led"];

impl Zone {
    /// Zone for an element type; unknown types land in the living zone.
    pub fn classify(kind: &str) -> Zone {
        ZONE_TABLE
            .iter()
            .find(|(name, _)| *name == kind)
            .map(|(_, zone)| *zone)
            .unwrap_or(Zone::Living)
    }

    /// Preferred center for an element of `kind` with scaled extents `size`.
    ///
    /// `ceiling` is the Y coordinate of the usable ceiling.
    pub fn anchor(self, kind: &str, container: &Container, ceiling: f64, size: [f64; 3]) -> [f64; 3] {
        let [ex, ey, ez] = size.map(|s| s / 2.0);
        let hl = container.half_length();
        let hw = container.half_width();
        let i = ANCHOR_INSET;
        let floor = ey + i;

        let pos_x = hl - ex - i;
        let neg_x = -hl + ex + i;
        let pos_z = hw - ez - i;
        let neg_z = -hw + ez + i;

        match self {
            Zone::Entrance => [pos_x, floor, 0.0],
            Zone::Sleeping => [neg_x, floor, neg_z],
            Zone::Dining => [0.0, floor, pos_z],
            Zone::Bathroom => [neg_x, floor, pos_z],
            Zone::Kitchen => [pos_x, floor, neg_z],
            Zone::Living => [0.0, floor, 0.0],
            Zone::Utilities if CEILING_MOUNTED.contains(&kind) => [0.0, ceiling - ey - i, 0.0],
            Zone::Utilities => [0.0, (ceiling / 2.0).max(floor), neg_z],
            Zone::Appliances => [hl / 2.0, floor, neg_z],
        }
    }
}

/// Source of perturbed candidates after the anchor is rejected
pub trait Jitter {
    /// Next X/Z candidate for `attempt` (1-based); Y is kept by the caller.
    fn perturb(&mut self, anchor: [f64; 3], previous: [f64; 3], attempt: usize) -> [f64; 3];
}

/// Deterministic rings of eight offsets around the anchor.
///
/// Ring `k` uses offsets of `k * step` along X, Z and the diagonals.
pub struct Spiral {
    pub step: f64,
}

const SPIRAL_DIRECTIONS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (0.0, 1.0),
    (-1.0, 0.0),
    (0.0, -1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
    (-1.0, -1.0),
    (1.0, -1.0),
];

impl Jitter for Spiral {
    fn perturb(&mut self, anchor: [f64; 3], _previous: [f64; 3], attempt: usize) -> [f64; 3] {
        let index = attempt.saturating_sub(1);
        let ring = (index / SPIRAL_DIRECTIONS.len() + 1) as f64;
        let (dx, dz) = SPIRAL_DIRECTIONS[index % SPIRAL_DIRECTIONS.len()];
        [
            anchor[0] + dx * ring * self.step,
            anchor[1],
            anchor[2] + dz * ring * self.step,
        ]
    }
}

/// Uniform random offsets in `[-bound, bound]`, applied to the previous attempt.
pub struct RandomJitter<R: Rng> {
    rng: R,
    bound: f64,
}

impl<R: Rng> RandomJitter<R> {
    pub fn new(rng: R, bound: f64) -> Self {
        Self { rng, bound }
    }
}

impl<R: Rng> Jitter for RandomJitter<R> {
    fn perturb(&mut self, _anchor: [f64; 3], previous: [f64; 3], _attempt: usize) -> [f64; 3] {
        let b = self.bound.abs();
        if !b.is_finite() {
            return previous;
        }
        [
            previous[0] + self.rng.gen_range(-b..=b),
            previous[1],
            previous[2] + self.rng.gen_range(-b..=b),
        ]
    }
}

/// Jitter source described by the placement settings.
pub fn jitter_for(settings: &PlacementSettings, salt: u64) -> Box<dyn Jitter> {
    match settings.strategy {
        JitterStrategy::Spiral => Box::new(Spiral {
            step: settings.jitter,
        }),
        JitterStrategy::Random => Box::new(RandomJitter::new(
            StdRng::seed_from_u64(settings.seed ^ salt),
            settings.jitter,
        )),
    }
}

/// Outcome of the placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// First accepted candidate
    Accepted { position: [f64; 3], attempts: usize },
    /// Budget exhausted; `last` is the final (rejected) candidate
    Exhausted { last: [f64; 3], attempts: usize },
}

/// Initial placement search over a container and its current elements.
pub struct Placer<'a> {
    container: &'a Container,
    elements: &'a [Element],
    settings: &'a PlacementSettings,
    rules: &'a ValidationSettings,
}

impl<'a> Placer<'a> {
    pub fn new(
        container: &'a Container,
        elements: &'a [Element],
        settings: &'a PlacementSettings,
        rules: &'a ValidationSettings,
    ) -> Self {
        Self {
            container,
            elements,
            settings,
            rules,
        }
    }

    /// Propose a position for `element`, which must not be in the collection yet.
    pub fn propose_initial_placement(&self, element: &Element, jitter: &mut dyn Jitter) -> Placement {
        let validator = Validator::new(self.container, self.elements, self.rules);
        let size = element.scaled_size();
        let margin = self.rules.wall_margin;
        let ceiling = self.rules.ceiling;

        let zone = Zone::classify(&element.kind);
        let preferred = zone.anchor(&element.kind, self.container, ceiling.limit(self.container), size);
        let anchor = clamp_center(preferred, size, self.container, margin, ceiling);

        let mut candidate = anchor;
        for attempt in 0..self.settings.max_attempts {
            if attempt > 0 {
                let moved = jitter.perturb(anchor, candidate, attempt);
                candidate = clamp_center(moved, size, self.container, margin, ceiling);
            }
            if validator.validate_position(Candidate::Pending(element), candidate) {
                tracing::debug!(
                    "Placed {} in {:?} zone after {} attempt(s)",
                    element.kind,
                    zone,
                    attempt + 1
                );
                return Placement::Accepted {
                    position: candidate,
                    attempts: attempt + 1,
                };
            }
        }

        Placement::Exhausted {
            last: candidate,
            attempts: self.settings.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{container_6x3, element_at};
    use crate::geometry::within_bounds;

    fn pending(kind: &str, size: [f64; 3]) -> Element {
        element_at(100, kind, [0.0; 3], size)
    }

    fn place(elements: &[Element], element: &Element) -> Placement {
        let container = container_6x3();
        let settings = PlacementSettings::default();
        let rules = ValidationSettings::default();
        let mut jitter = Spiral { step: settings.jitter };
        Placer::new(&container, elements, &settings, &rules).propose_initial_placement(element, &mut jitter)
    }

    #[test]
    fn test_classify() {
        assert_eq!(Zone::classify("door"), Zone::Entrance);
        assert_eq!(Zone::classify("bed"), Zone::Sleeping);
        assert_eq!(Zone::classify("table"), Zone::Dining);
        assert_eq!(Zone::classify("toilet"), Zone::Bathroom);
        assert_eq!(Zone::classify("cupboards"), Zone::Kitchen);
        assert_eq!(Zone::classify("tv"), Zone::Living);
        assert_eq!(Zone::classify("fan"), Zone::Utilities);
        assert_eq!(Zone::classify("fridge"), Zone::Appliances);
        assert_eq!(Zone::classify("hammock"), Zone::Living);
    }

    #[test]
    fn test_entrance_anchor_near_positive_x_wall() {
        let c = container_6x3();
        let pos = Zone::Entrance.anchor("door", &c, c.height, [0.9, 2.0, 0.1]);
        assert!((pos[0] - 2.45).abs() < 1e-9);
        assert!((pos[1] - 1.1).abs() < 1e-9);
        assert_eq!(pos[2], 0.0);
    }

    #[test]
    fn test_sleeping_anchor_in_negative_corner() {
        let c = container_6x3();
        let pos = Zone::Sleeping.anchor("bed", &c, c.height, [2.0, 0.5, 1.5]);
        assert!(pos[0] < 0.0 && pos[2] < 0.0);
    }

    #[test]
    fn test_ceiling_mounted_fan() {
        let c = container_6x3();
        let pos = Zone::Utilities.anchor("fan", &c, c.height, [0.5, 0.1, 0.5]);
        assert!((pos[1] - (3.0 - 0.05 - ANCHOR_INSET)).abs() < 1e-9);
        let outlet = Zone::Utilities.anchor("outlet", &c, c.height, [0.1, 0.1, 0.05]);
        assert!(outlet[1] < pos[1]);
    }

    #[test]
    fn test_every_zone_anchor_is_in_bounds() {
        let c = container_6x3();
        let rules = ValidationSettings::default();
        for (kind, zone) in ZONE_TABLE {
            let size = [0.5, 0.5, 0.5];
            let pos = zone.anchor(kind, &c, c.height, size);
            assert!(
                within_bounds(pos, size, &c, rules.wall_margin, rules.ceiling),
                "{kind} anchor {pos:?} out of bounds"
            );
        }
    }

    #[test]
    fn test_first_door_takes_anchor() {
        let door = pending("door", [0.9, 2.0, 0.1]);
        match place(&[], &door) {
            Placement::Accepted { position, attempts } => {
                assert_eq!(attempts, 1);
                assert!((position[0] - 2.45).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_second_door_is_perturbed() {
        let first = element_at(1, "door", [2.45, 1.1, 0.0], [0.9, 2.0, 0.1]);
        let second = pending("door", [0.9, 2.0, 0.1]);
        match place(&[first.clone()], &second) {
            Placement::Accepted { position, attempts } => {
                assert!(attempts > 1);
                assert!(!crate::geometry::overlaps(position, second.size, first.position, first.size));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_exhausted_when_nothing_fits() {
        let huge = element_at(1, "crate", [0.0, 1.5, 0.0], [5.8, 2.8, 2.3]);
        let chair = pending("chair", [0.5, 1.0, 0.5]);
        match place(&[huge], &chair) {
            Placement::Exhausted { attempts, .. } => assert_eq!(attempts, 10),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_spiral_rings() {
        let mut spiral = Spiral { step: 0.25 };
        let anchor = [1.0, 0.5, 0.0];
        assert_eq!(spiral.perturb(anchor, anchor, 1), [1.25, 0.5, 0.0]);
        assert_eq!(spiral.perturb(anchor, anchor, 2), [1.0, 0.5, 0.25]);
        assert_eq!(spiral.perturb(anchor, anchor, 9), [1.5, 0.5, 0.0]);
    }

    #[test]
    fn test_random_jitter_is_bounded_and_seeded() {
        let mut a = RandomJitter::new(StdRng::seed_from_u64(7), 0.25);
        let mut b = RandomJitter::new(StdRng::seed_from_u64(7), 0.25);
        let start = [0.0, 1.0, 0.0];
        for attempt in 1..20 {
            let pa = a.perturb(start, start, attempt);
            let pb = b.perturb(start, start, attempt);
            assert_eq!(pa, pb);
            assert!(pa[0].abs() <= 0.25 && pa[2].abs() <= 0.25);
            assert_eq!(pa[1], 1.0);
        }
    }

    #[test]
    fn test_random_jitter_with_nan_bound_stays_put() {
        let mut jitter = RandomJitter::new(StdRng::seed_from_u64(7), f64::NAN);
        let start = [0.3, 1.0, -0.2];
        assert_eq!(jitter.perturb(start, start, 2), start);
    }

    #[test]
    fn test_jitter_for_random_strategy() {
        let settings = PlacementSettings {
            strategy: JitterStrategy::Random,
            ..Default::default()
        };
        let mut jitter = jitter_for(&settings, 3);
        let p = jitter.perturb([0.0; 3], [0.0; 3], 1);
        assert!(p[0].abs() <= 0.25);
    }
}

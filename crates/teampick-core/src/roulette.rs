// Roulette wheel geometry: where a spin ends so the pointer lands on the winner.
//
// The wheel is drawn with segment 0 starting at the top pointer and segments
// running clockwise. A positive rotation turns the wheel clockwise, so the
// segment under the pointer after rotating by `r` degrees is the one that
// covers angle `360 - (r mod 360)`.

use rand::Rng;

/// Fewest whole turns a spin makes before settling.
pub const MIN_FULL_SPINS: u32 = 5;
/// Most whole turns a spin makes before settling.
pub const MAX_FULL_SPINS: u32 = 7;
/// Width of the random landing jitter, as a fraction of one segment.
/// Kept below 1.0 so the pointer never crosses into a neighbouring segment.
pub const JITTER_FRACTION: f64 = 0.6;
/// Labels longer than this are shortened on the wheel.
pub const LABEL_MAX_CHARS: usize = 8;

/// The precomputed motion of one spin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    pub segments: usize,
    pub winner_index: usize,
    pub full_spins: u32,
    /// Jitter applied around the winner's segment centre, in degrees.
    pub offset: f64,
    pub start_rotation: f64,
    pub final_rotation: f64,
}

impl SpinPlan {
    /// Rotation at `progress` (0.0..=1.0) through the spin, eased out so the
    /// wheel decelerates into its final position.
    pub fn rotation_at(&self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.start_rotation + (self.final_rotation - self.start_rotation) * eased
    }

    /// Segment under the pointer at `progress` through the spin.
    pub fn segment_at_progress(&self, progress: f64) -> usize {
        segment_at(self.rotation_at(progress), self.segments)
    }
}

/// Angular width of one segment for a wheel with `segments` entries.
pub fn segment_angle(segments: usize) -> f64 {
    360.0 / segments.max(1) as f64
}

/// Plan a spin that ends with `winner_index` under the pointer.
///
/// `current_rotation` is where the wheel rests now; the plan always moves
/// forward from there by at least `MIN_FULL_SPINS` turns.
pub fn plan_spin<R: Rng + ?Sized>(
    rng: &mut R,
    segments: usize,
    winner_index: usize,
    current_rotation: f64,
) -> SpinPlan {
    let segment = segment_angle(segments);
    let full_spins = rng.gen_range(MIN_FULL_SPINS..=MAX_FULL_SPINS);
    let winner_center = winner_index as f64 * segment + segment / 2.0;

    let target = current_rotation + f64::from(full_spins) * 360.0 + (360.0 - winner_center)
        - current_rotation.rem_euclid(360.0);
    let offset = (rng.gen::<f64>() - 0.5) * (segment * JITTER_FRACTION);

    SpinPlan {
        segments,
        winner_index,
        full_spins,
        offset,
        start_rotation: current_rotation,
        final_rotation: target + offset,
    }
}

/// Index of the segment under the top pointer after rotating by `rotation`.
pub fn segment_at(rotation: f64, segments: usize) -> usize {
    if segments == 0 {
        return 0;
    }
    let segment = segment_angle(segments);
    let pointer = (360.0 - rotation.rem_euclid(360.0)).rem_euclid(360.0);
    ((pointer / segment).floor() as usize).min(segments - 1)
}

/// Shorten a player name for display on a wheel segment.
pub fn wheel_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let head: String = name.chars().take(LABEL_MAX_CHARS - 1).collect();
        format!("{head}..")
    } else {
        name.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

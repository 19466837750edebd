//! Gradient cycling and fade progress, advanced from the main-loop tick.

use std::time::Duration;

/// RGBA components in 0.0-1.0.
pub type Color = (f64, f64, f64, f64);

pub fn lerp(a: Color, b: Color, t: f64) -> Color {
    (
        a.0 + (b.0 - a.0) * t,
        a.1 + (b.1 - a.1) * t,
        a.2 + (b.2 - a.2) * t,
        a.3 + (b.3 - a.3) * t,
    )
}

/// Samples a cyclic palette at phase `t`. Phase 0 is the first color, the
/// palette wraps, and values outside [0, 1) are folded back in.
pub fn sample(colors: &[Color], t: f64) -> Color {
    match colors {
        [] => (0.0, 0.0, 0.0, 0.0),
        [only] => *only,
        _ => {
            let t = t.rem_euclid(1.0);
            let scaled = t * colors.len() as f64;
            let index = (scaled.floor() as usize).min(colors.len() - 1);
            let next = (index + 1) % colors.len();
            lerp(colors[index], colors[next], scaled - scaled.floor())
        }
    }
}

/// Phase accumulator sliding the gradient through its palette.
#[derive(Debug, Clone)]
pub struct GradientCycle {
    phase: f64,
    cycle: Duration,
}

impl GradientCycle {
    pub fn new(cycle: Duration) -> Self {
        Self {
            phase: 0.0,
            cycle,
        }
    }

    pub fn set_cycle(&mut self, cycle: Duration) {
        self.cycle = cycle;
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.cycle.is_zero() {
            return;
        }
        self.phase = (self.phase + dt.as_secs_f64() / self.cycle.as_secs_f64()).fract();
    }

    /// Color stops for the current phase, evenly spaced across the bar.
    pub fn stops(&self, colors: &[Color], count: usize) -> Vec<Color> {
        (0..count)
            .map(|i| sample(colors, self.phase + i as f64 / count as f64))
            .collect()
    }
}

/// Alpha ramp toward a shown/hidden target.
#[derive(Debug, Clone)]
pub struct Fade {
    alpha: f64,
    target: f64,
}

impl Fade {
    pub fn hidden() -> Self {
        Self {
            alpha: 0.0,
            target: 0.0,
        }
    }

    pub fn shown() -> Self {
        Self {
            alpha: 1.0,
            target: 1.0,
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.target = if visible { 1.0 } else { 0.0 };
    }

    pub fn is_visible_target(&self) -> bool {
        self.target > 0.0
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fully faded out, nothing left to draw.
    pub fn is_hidden(&self) -> bool {
        self.alpha == 0.0 && self.target == 0.0
    }

    /// Steps alpha toward the target. `fade_in`/`fade_out` pick the ramp
    /// duration by direction; zero durations jump. Returns true when alpha
    /// changed and a redraw is needed.
    pub fn advance(&mut self, dt: Duration, fade_in: Duration, fade_out: Duration) -> bool {
        if self.alpha == self.target {
            return false;
        }

        let duration = if self.target > self.alpha {
            fade_in
        } else {
            fade_out
        };

        if duration.is_zero() {
            self.alpha = self.target;
            return true;
        }

        let step = dt.as_secs_f64() / duration.as_secs_f64();
        if self.target > self.alpha {
            self.alpha = (self.alpha + step).min(self.target);
        } else {
            self.alpha = (self.alpha - step).max(self.target);
        }
        true
    }
}

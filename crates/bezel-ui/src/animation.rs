//! Widget field animation ("twitching").
//!
//! Each widget owns a [`TwitchSet`]: a table with at most one active
//! tween per [`TwitchField`]. Starting a tween for a field cancels the
//! one already running, so the last writer wins and the table never
//! accumulates stale entries. Widgets drive the table from their update
//! with [`TwitchSet::tick`], which hands back sampled values through a
//! callback and drops tweens that have reached their end.

use std::collections::HashMap;

/// Interpolation shape for a tween, applied over normalized time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow finish.
    EaseOut,
    /// Quadratic in and out.
    EaseInOut,
    /// Overshoots the target before settling, for snappy arrive-and-bounce
    /// motion. Output exceeds 1.0 mid-curve.
    OvershootOut,
}

impl Easing {
    /// Maps normalized time to progress. Input is clamped to 0..=1.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Easing::OvershootOut => {
                const S: f32 = 1.70158;
                let u = t - 1.0;
                1.0 + (S + 1.0) * u * u * u + S * u * u
            }
        }
    }
}

/// Widget field a tween can drive. Position and scale move the widget,
/// alpha and dim fade it, grey desaturates it, and display-value eases
/// a slider's shown number toward its logical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TwitchField {
    PositionX,
    PositionY,
    PositionZ,
    Scale,
    Alpha,
    Grey,
    Dim,
    DisplayValue,
}

/// One in-flight interpolation.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    start: f32,
    end: f32,
    duration_ms: u32,
    elapsed_ms: u32,
    easing: Easing,
}

impl Tween {
    pub fn new(start: f32, end: f32, duration_ms: u32, easing: Easing) -> Self {
        Self {
            start,
            end,
            duration_ms,
            elapsed_ms: 0,
            easing,
        }
    }

    pub fn target(&self) -> f32 {
        self.end
    }

    pub fn finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Advances the clock and returns the sampled value.
    pub fn advance(&mut self, dt_ms: u32) -> f32 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        self.sample()
    }

    pub fn sample(&self) -> f32 {
        if self.duration_ms == 0 {
            return self.end;
        }
        let t = self.elapsed_ms as f32 / self.duration_ms as f32;
        self.start + (self.end - self.start) * self.easing.apply(t)
    }
}

/// Per-widget tween table, one slot per field.
#[derive(Debug, Default)]
pub struct TwitchSet {
    active: HashMap<TwitchField, Tween>,
}

impl TwitchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a tween for `field`, replacing any tween already running
    /// on it. If the running tween is already headed to `to`, the call
    /// is a no-op so repeated requests do not restart the motion. A
    /// zero duration delivers `to` on the next tick, even one with no
    /// elapsed time.
    pub fn start(&mut self, field: TwitchField, from: f32, to: f32, duration_ms: u32, easing: Easing) {
        if let Some(current) = self.active.get(&field)
            && current.target() == to
        {
            return;
        }
        self.active.insert(field, Tween::new(from, to, duration_ms, easing));
    }

    pub fn cancel(&mut self, field: TwitchField) {
        self.active.remove(&field);
    }

    pub fn cancel_all(&mut self) {
        self.active.clear();
    }

    pub fn is_active(&self, field: TwitchField) -> bool {
        self.active.contains_key(&field)
    }

    /// Target of the tween running on `field`, if any.
    pub fn target(&self, field: TwitchField) -> Option<f32> {
        self.active.get(&field).map(Tween::target)
    }

    /// Advances every tween by `dt_ms`, reporting each sampled value
    /// through `apply` and dropping tweens that finished this tick.
    pub fn tick(&mut self, dt_ms: u32, mut apply: impl FnMut(TwitchField, f32)) {
        self.active.retain(|field, tween| {
            let value = tween.advance(dt_ms);
            apply(*field, value);
            !tween.finished()
        });
    }
}

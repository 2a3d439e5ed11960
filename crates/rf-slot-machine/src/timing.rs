//! Presentation timing profiles
//!
//! The engine resolves spins instantly. These values only tell the
//! presentation layer how long to animate between `start_spin` and
//! `complete_spin`.

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimingProfile {
    /// Normal gameplay timing
    #[default]
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Studio mode (instant for testing)
    Studio,
    /// Custom timing
    Custom,
}

/// Spin animation timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinTiming {
    /// Profile type
    pub profile: TimingProfile,

    /// How long the reels visibly spin (ms)
    pub spin_duration_ms: f64,

    /// Pause after the reels stop, before the result is revealed (ms)
    pub settle_delay_ms: f64,

    /// Scroll speed of the reel strip while spinning (px/s)
    pub reel_scroll_speed: f64,
}

impl SpinTiming {
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_duration_ms: 2000.0,
            settle_delay_ms: 500.0,
            reel_scroll_speed: 2000.0,
        }
    }

    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            spin_duration_ms: 800.0,
            settle_delay_ms: 150.0,
            reel_scroll_speed: 3500.0,
        }
    }

    /// No animation at all
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            spin_duration_ms: 0.0,
            settle_delay_ms: 0.0,
            reel_scroll_speed: 0.0,
        }
    }

    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Studio => Self::studio(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            profile: TimingProfile::Custom,
            spin_duration_ms: self.spin_duration_ms * factor,
            settle_delay_ms: self.settle_delay_ms * factor,
            reel_scroll_speed: if factor > 0.0 {
                self.reel_scroll_speed / factor
            } else {
                self.reel_scroll_speed
            },
        }
    }

    /// Time from spin start until the result should be revealed (ms)
    pub fn total_duration_ms(&self) -> f64 {
        self.spin_duration_ms + self.settle_delay_ms
    }

    pub fn is_instant(&self) -> bool {
        self.total_duration_ms() <= 0.0
    }
}

impl Default for SpinTiming {
    fn default() -> Self {
        Self::normal()
    }
}

//! Runtime configuration for the toolkit.
//!
//! Hosts ship a `bezel.toml` (or embed the defaults) controlling texture
//! allocation scale and input pacing. Every field is individually
//! defaulted, so a partial file or no file at all is fine.

use serde::Deserialize;

use crate::error::Result;
use crate::input::Repeater;

/// Toolkit configuration, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Logical-unit to pixel scale used when allocating widget render
    /// targets. 96 suits plain panels; text-heavy widgets pass 128.
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    /// Round render-target dimensions up to powers of two. Set on
    /// platforms whose surfaces require it; the cache adjusts its UV
    /// extents so art does not stretch into the padding.
    #[serde(default)]
    pub pow2_render_targets: bool,

    /// How long an adjust direction must be held before slider stepping
    /// switches to fast-scroll, in milliseconds.
    #[serde(default = "default_fast_scroll_delay_ms")]
    pub fast_scroll_delay_ms: u64,

    /// Step multiplier applied while fast-scrolling.
    #[serde(default = "default_fast_scroll_scalar")]
    pub fast_scroll_scalar: u32,

    /// Duration of the grid recentering twitch after a focus move, in
    /// milliseconds.
    #[serde(default = "default_scroll_time_ms")]
    pub scroll_time_ms: u32,

    /// Delay before a held direction starts repeating, in milliseconds.
    #[serde(default = "default_nav_repeat_delay_ms")]
    pub nav_repeat_delay_ms: u64,

    /// Cadence of repeated direction events while held, in milliseconds.
    #[serde(default = "default_nav_repeat_interval_ms")]
    pub nav_repeat_interval_ms: u64,
}

fn default_dpi() -> u32 {
    96
}
fn default_fast_scroll_delay_ms() -> u64 {
    1500
}
fn default_fast_scroll_scalar() -> u32 {
    5
}
fn default_scroll_time_ms() -> u32 {
    350
}
fn default_nav_repeat_delay_ms() -> u64 {
    330
}
fn default_nav_repeat_interval_ms() -> u64 {
    130
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            pow2_render_targets: false,
            fast_scroll_delay_ms: default_fast_scroll_delay_ms(),
            fast_scroll_scalar: default_fast_scroll_scalar(),
            scroll_time_ms: default_scroll_time_ms(),
            nav_repeat_delay_ms: default_nav_repeat_delay_ms(),
            nav_repeat_interval_ms: default_nav_repeat_interval_ms(),
        }
    }
}

impl UiConfig {
    /// Parse a configuration from TOML text. Unknown keys are ignored;
    /// missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: UiConfig = toml::from_str(text)?;
        log::debug!(
            "ui config loaded: dpi={} pow2={} fast_scroll={}ms x{}",
            cfg.dpi,
            cfg.pow2_render_targets,
            cfg.fast_scroll_delay_ms,
            cfg.fast_scroll_scalar
        );
        Ok(cfg)
    }

    /// Build a directional repeat gate from the configured pacing.
    pub fn nav_repeater(&self) -> Repeater {
        Repeater::new(self.nav_repeat_delay_ms, self.nav_repeat_interval_ms)
    }
}

use std::fmt;

use serde::Deserialize;

use crate::animation::Color;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub bar: BarConfig,
    #[serde(default)]
    pub notch: NotchConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BarConfig {
    /// Bar thickness in points.
    #[serde(default = "default_height")]
    pub height: f64,
    /// Gradient colors in hex format (#RRGGBB or #RRGGBBAA), cycled left to
    /// right.
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
    /// Seconds for one full slide through the palette.
    #[serde(default = "default_cycle_duration")]
    pub cycle_duration: f64,
    /// Seconds to fade the bar in on `show`.
    #[serde(default = "default_fade_in_duration")]
    pub fade_in_duration: f64,
    /// Seconds to fade the bar out on `hide`.
    #[serde(default = "default_fade_out_duration")]
    pub fade_out_duration: f64,
    /// Show the bar immediately on launch instead of waiting for `show`.
    #[serde(default)]
    pub shown_on_launch: bool,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            colors: default_colors(),
            cycle_duration: default_cycle_duration(),
            fade_in_duration: default_fade_in_duration(),
            fade_out_duration: default_fade_out_duration(),
            shown_on_launch: false,
        }
    }
}

impl BarConfig {
    /// Parsed gradient palette, skipping entries that fail to parse.
    /// Validation reports those entries; rendering just works with the rest.
    pub fn palette(&self) -> Vec<Color> {
        self.colors
            .iter()
            .filter_map(|hex| parse_hex_color(hex))
            .collect()
    }
}

/// Notch handling for the overlay mask.
#[derive(Debug, Deserialize, Clone)]
pub struct NotchConfig {
    /// Route the bar around the notch on screens that have one. When false
    /// the bar is always a plain rectangle.
    #[serde(default = "default_avoid")]
    pub avoid: bool,
    /// Override the detected notch width in points.
    pub width: Option<f64>,
}

impl Default for NotchConfig {
    fn default() -> Self {
        Self {
            avoid: default_avoid(),
            width: None,
        }
    }
}

fn default_height() -> f64 {
    3.0
}

fn default_colors() -> Vec<String> {
    [
        "#4cd964", "#5ac8fa", "#007aff", "#34aadc", "#5856d6", "#ff2d55",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_cycle_duration() -> f64 {
    3.33
}

fn default_fade_in_duration() -> f64 {
    0.33
}

fn default_fade_out_duration() -> f64 {
    0.66
}

fn default_avoid() -> bool {
    true
}

/// One validation finding. Errors make the config unusable; warnings are
/// logged and the config is kept.
#[derive(Debug)]
pub struct ConfigIssue {
    pub message: String,
    pub is_error: bool,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Config {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let error = |message: String| ConfigIssue {
            message,
            is_error: true,
        };
        let warning = |message: String| ConfigIssue {
            message,
            is_error: false,
        };

        if self.bar.height <= 0.0 {
            issues.push(error(format!(
                "bar.height must be positive, got {}",
                self.bar.height
            )));
        }
        if self.bar.cycle_duration <= 0.0 {
            issues.push(error(format!(
                "bar.cycle_duration must be positive, got {}",
                self.bar.cycle_duration
            )));
        }
        if self.bar.fade_in_duration < 0.0 {
            issues.push(error("bar.fade_in_duration must not be negative".into()));
        }
        if self.bar.fade_out_duration < 0.0 {
            issues.push(error("bar.fade_out_duration must not be negative".into()));
        }

        for hex in &self.bar.colors {
            if parse_hex_color(hex).is_none() {
                issues.push(warning(format!("unparseable color '{}'", hex)));
            }
        }
        if self.bar.palette().is_empty() {
            issues.push(error(
                "bar.colors needs at least one parseable color".into(),
            ));
        }

        if let Some(width) = self.notch.width {
            if width <= 0.0 {
                issues.push(error(format!(
                    "notch.width must be positive, got {}",
                    width
                )));
            }
        }

        issues
    }
}

/// Parse a hex color string into RGBA components (0.0-1.0).
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 && hex.len() != 8 {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .ok()
            .map(|v| v as f64 / 255.0)
    };

    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;
    let a = if hex.len() == 8 { channel(6..8)? } else { 1.0 };
    Some((r, g, b, a))
}

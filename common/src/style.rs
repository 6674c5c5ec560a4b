use std::path::PathBuf;

use eyre::{Result, bail};
use plotters::style::{
    FontDesc, FontFamily, FontStyle, RGBColor, TextStyle,
    colors::{BLACK, WHITE},
};
use tracing::{debug, warn};

/// Directory probed for the report's preferred font files.
pub const FONT_DIR: &str = "/usr/share/fonts/truetype/custom";
pub const FONT_FILE_PREFIX: &str = "IosevkaNerdFont";
pub const CUSTOM_FONT_FAMILY: &str = "Iosevka NF";
pub const FALLBACK_FONT_FAMILY: &str = "sans-serif";
const MAX_FONT_FILES: usize = 10;

pub const PREFERRED_THEME: &str = "paper";
pub const SECONDARY_THEME: &str = "plain";

/// Series color cycle, applied by series index.
pub const PALETTE: [RGBColor; 7] = [
    RGBColor(0x2C, 0x3E, 0x50),
    RGBColor(0xE7, 0x4C, 0x3C),
    RGBColor(0x27, 0xAE, 0x60),
    RGBColor(0x8E, 0x44, 0xAD),
    RGBColor(0xF3, 0x9C, 0x12),
    RGBColor(0x34, 0x98, 0xDB),
    RGBColor(0xD3, 0x54, 0x00),
];

/// Marker cycle, applied by series index alongside [`PALETTE`].
pub const MARKERS: [Marker; 3] = [Marker::Circle, Marker::Square, Marker::Triangle];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub name: &'static str,
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub grid: RGBColor,
    pub draw_grid: bool,
    pub framed_legend: bool,
}

pub static THEMES: [Theme; 2] = [
    Theme {
        name: "paper",
        background: WHITE,
        foreground: RGBColor(0x26, 0x26, 0x26),
        grid: RGBColor(0xE0, 0xE0, 0xE0),
        draw_grid: true,
        framed_legend: false,
    },
    Theme {
        name: "plain",
        background: WHITE,
        foreground: BLACK,
        grid: RGBColor(0xD5, 0xD5, 0xD5),
        draw_grid: false,
        framed_legend: true,
    },
];

pub fn lookup_theme(name: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.name == name)
}

/// Figure geometry: 10in x 6in saved at 300 DPI.
pub const FIG_WIDTH_IN: f64 = 10.0;
pub const FIG_HEIGHT_IN: f64 = 6.0;
pub const SAVE_DPI: f64 = 300.0;

// Point sizes, converted to pixels through [`Style::px`].
const TITLE_PT: f64 = 16.0;
const AXIS_LABEL_PT: f64 = 14.0;
const TICK_PT: f64 = 12.0;
const LEGEND_PT: f64 = 11.0;
const NOTE_PT: f64 = 8.0;
const LINE_PT: f64 = 2.5;
const MARKER_PT: f64 = 9.0;
const MARKER_EDGE_PT: f64 = 1.5;

/// Process-wide rendering defaults, built once before any chart is produced.
#[derive(Debug, Clone)]
pub struct Style {
    pub theme: &'static Theme,
    pub font_family: String,
    pub dpi: f64,
    pub width: u32,
    pub height: u32,
}

impl Style {
    pub fn init() -> Result<Self> {
        Self::with_themes(PREFERRED_THEME, SECONDARY_THEME)
    }

    /// Resolves `preferred`, falling back to `secondary` if its name is
    /// unknown. Errors only when neither name resolves.
    pub fn with_themes(preferred: &str, secondary: &str) -> Result<Self> {
        let theme = match lookup_theme(preferred) {
            Some(theme) => theme,
            None => match lookup_theme(secondary) {
                Some(theme) => {
                    warn!("Theme {preferred} unavailable, using {secondary}");
                    theme
                }
                None => bail!("No usable theme: neither {preferred} nor {secondary} is known"),
            },
        };

        Ok(Self {
            theme,
            font_family: select_font_family(),
            dpi: SAVE_DPI,
            width: (FIG_WIDTH_IN * SAVE_DPI) as u32,
            height: (FIG_HEIGHT_IN * SAVE_DPI) as u32,
        })
    }

    /// Point size to pixels at the configured DPI.
    pub fn px(&self, pt: f64) -> u32 {
        (pt * self.dpi / 72.0).round() as u32
    }

    fn font(&self, pt: f64, font_style: FontStyle) -> TextStyle<'_> {
        let family = if self.font_family == FALLBACK_FONT_FAMILY {
            FontFamily::SansSerif
        } else {
            FontFamily::Name(&self.font_family)
        };
        FontDesc::new(family, self.px(pt) as f64, font_style).color(&self.theme.foreground)
    }

    pub fn title_font(&self) -> TextStyle<'_> {
        self.font(TITLE_PT, FontStyle::Bold)
    }

    pub fn label_font(&self) -> TextStyle<'_> {
        self.font(AXIS_LABEL_PT, FontStyle::Normal)
    }

    pub fn tick_font(&self) -> TextStyle<'_> {
        self.font(TICK_PT, FontStyle::Normal)
    }

    pub fn legend_font(&self) -> TextStyle<'_> {
        self.font(LEGEND_PT, FontStyle::Normal)
    }

    pub fn note_font(&self) -> TextStyle<'_> {
        self.font(NOTE_PT, FontStyle::Normal)
    }

    pub fn line_width(&self) -> u32 {
        self.px(LINE_PT)
    }

    pub fn marker_radius(&self) -> i32 {
        (self.px(MARKER_PT) / 2) as i32
    }

    pub fn marker_edge(&self) -> u32 {
        self.px(MARKER_EDGE_PT)
    }

    pub fn margin(&self) -> u32 {
        self.px(12.0)
    }

    pub fn x_label_area(&self) -> u32 {
        self.px(28.0)
    }

    pub fn y_label_area(&self) -> u32 {
        self.px(48.0)
    }
}

fn discover_font_files() -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(FONT_DIR) else {
        return Vec::new();
    };
    let mut files = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(FONT_FILE_PREFIX) && name.ends_with(".ttf"))
        })
        .collect::<Vec<_>>();
    files.sort();
    files.truncate(MAX_FONT_FILES);
    files
}

fn select_font_family() -> String {
    let files = discover_font_files();
    if files.is_empty() {
        debug!("No custom fonts under {FONT_DIR}, falling back to {FALLBACK_FONT_FAMILY}");
        FALLBACK_FONT_FAMILY.to_owned()
    } else {
        debug!("Found {} custom font files under {FONT_DIR}", files.len());
        CUSTOM_FONT_FAMILY.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferred_theme_resolves() {
        let style = Style::init().expect("default themes");
        assert_eq!(style.theme.name, "paper");
    }

    #[test]
    fn unknown_preferred_falls_back_to_secondary() {
        let style = Style::with_themes("nonexistent", SECONDARY_THEME).expect("fallback theme");
        assert_eq!(style.theme.name, "plain");
    }

    #[test]
    fn two_unknown_themes_fail() {
        let err = Style::with_themes("nope", "also-nope").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("nope") && msg.contains("also-nope"), "{msg}");
    }

    #[test]
    fn point_sizes_scale_with_dpi() {
        let style = Style::init().expect("style");
        // 72pt is one inch, i.e. exactly `dpi` pixels.
        assert_eq!(style.px(72.0), 300);
        assert_eq!((style.width, style.height), (3000, 1800));
    }
}

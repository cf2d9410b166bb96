//! Deterministic event colors.
//!
//! Two strategies are available through [`ColorResolver`]:
//!
//! - **hash**: the event id is hashed into a fixed pastel [`Palette`]
//! - **calendar**: the event's calendar id is looked up in a
//!   [`CalendarRegistry`] and a three-tone [`ColorScheme`] is derived from
//!   that single base color
//!
//! Resolution is pure. [`ColorMemo`] caches schemes for one layout pass.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::event::CalendarEvent;

const BACKGROUND_ALPHA: f64 = 0.8;
const BORDER_ALPHA: f64 = 0.5;
const TEXT_SHADE: f64 = 0.5;

/// An opaque sRGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn map(self, f: impl Fn(u8) -> f64) -> Self {
        let channel = |c: u8| f(c).round().clamp(0.0, 255.0) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }

    /// The color painted at `alpha` opacity over white.
    pub fn over_white(self, alpha: f64) -> Self {
        self.map(|c| 255.0 - (255.0 - f64::from(c)) * alpha)
    }

    /// Each channel scaled by `factor`.
    pub fn shade(self, factor: f64) -> Self {
        self.map(|c| f64::from(c) * factor)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let parse = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
        match hex.len() {
            6 => Ok(Self::new(
                parse(&hex[0..2])?,
                parse(&hex[2..4])?,
                parse(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| parse(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Background, text and border colors for one event block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorScheme {
    pub background: Rgb,
    pub text: Rgb,
    pub border: Rgb,
}

impl ColorScheme {
    pub const fn new(background: Rgb, text: Rgb, border: Rgb) -> Self {
        Self {
            background,
            text,
            border,
        }
    }

    /// Derives a light background, a dark text color and a mid-tone border
    /// from a single calendar color.
    pub fn from_base(base: Rgb) -> Self {
        Self {
            background: base.over_white(BACKGROUND_ALPHA),
            text: base.shade(TEXT_SHADE),
            border: base.over_white(BORDER_ALPHA),
        }
    }
}

/// A non-empty list of schemes indexed by hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<ColorScheme>);

impl Palette {
    pub fn new(schemes: Vec<ColorScheme>) -> Result<Self, ConfigError> {
        if schemes.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self(schemes))
    }

    /// Lavender, sage, blue, peach and mint.
    pub fn pastel() -> Self {
        Self(vec![
            ColorScheme::new(
                Rgb::new(0xE8, 0xDE, 0xFF),
                Rgb::new(0x5B, 0x4A, 0x70),
                Rgb::new(0xD4, 0xC4, 0xF0),
            ),
            ColorScheme::new(
                Rgb::new(0xD8, 0xE8, 0xD8),
                Rgb::new(0x4A, 0x6B, 0x4A),
                Rgb::new(0xC4, 0xDC, 0xC4),
            ),
            ColorScheme::new(
                Rgb::new(0xD4, 0xE8, 0xF8),
                Rgb::new(0x4A, 0x6B, 0x8A),
                Rgb::new(0xC0, 0xD8, 0xE8),
            ),
            ColorScheme::new(
                Rgb::new(0xFF, 0xE8, 0xD8),
                Rgb::new(0x8A, 0x6B, 0x5A),
                Rgb::new(0xF0, 0xD8, 0xC4),
            ),
            ColorScheme::new(
                Rgb::new(0xD8, 0xF8, 0xF0),
                Rgb::new(0x4A, 0x7A, 0x6B),
                Rgb::new(0xC4, 0xE8, 0xDC),
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn schemes(&self) -> &[ColorScheme] {
        &self.0
    }

    /// Picks the scheme for an identifier.
    pub fn pick(&self, identifier: &str) -> ColorScheme {
        let index = hash_identifier(identifier).unsigned_abs() as usize % self.0.len();
        self.0[index]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::pastel()
    }
}

/// Order-sensitive polynomial string hash (`h = h * 31 + unit`) over UTF-16
/// code units, wrapping in signed 32-bit arithmetic.
pub fn hash_identifier(identifier: &str) -> i32 {
    identifier
        .encode_utf16()
        .fold(0i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
}

/// Calendar id to base color lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarRegistry {
    colors: BTreeMap<String, Rgb>,
}

impl CalendarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_color(mut self, calendar_id: impl Into<String>, color: Rgb) -> Self {
        self.insert(calendar_id, color);
        self
    }

    pub fn insert(&mut self, calendar_id: impl Into<String>, color: Rgb) {
        self.colors.insert(calendar_id.into(), color);
    }

    pub fn color_for(&self, calendar_id: &str) -> Option<Rgb> {
        self.colors.get(calendar_id).copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Rgb)> for CalendarRegistry {
    fn from_iter<I: IntoIterator<Item = (K, Rgb)>>(iter: I) -> Self {
        let mut registry = Self::new();
        for (id, color) in iter {
            registry.insert(id, color);
        }
        registry
    }
}

/// Which color strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorStrategy {
    /// Derive from the calendar's configured color.
    #[default]
    Calendar,
    /// Hash the event id into the pastel palette.
    Hash,
}

/// Color settings as they appear in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub strategy: ColorStrategy,
    /// Base color for events whose calendar is not in the registry.
    pub default_color: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            strategy: ColorStrategy::Calendar,
            default_color: DEFAULT_CALENDAR_COLOR,
        }
    }
}

/// Fallback base color for unknown calendars.
pub const DEFAULT_CALENDAR_COLOR: Rgb = Rgb::new(0xE8, 0xDE, 0xFF);

/// Maps events to color schemes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorResolver {
    /// Hash the event id into a palette.
    Hashed { palette: Palette },
    /// Derive from the event's calendar color.
    ByCalendar {
        registry: CalendarRegistry,
        fallback: Rgb,
    },
}

impl ColorResolver {
    pub fn hashed(palette: Palette) -> Self {
        Self::Hashed { palette }
    }

    pub fn by_calendar(registry: CalendarRegistry, fallback: Rgb) -> Self {
        Self::ByCalendar { registry, fallback }
    }

    /// Builds the resolver selected by `config`.
    pub fn from_config(config: &ColorConfig, registry: CalendarRegistry) -> Self {
        match config.strategy {
            ColorStrategy::Hash => Self::hashed(Palette::pastel()),
            ColorStrategy::Calendar => Self::by_calendar(registry, config.default_color),
        }
    }

    /// The identifier this resolver keys on: event id or calendar id.
    pub fn key_for<'e>(&self, event: &'e CalendarEvent) -> &'e str {
        match self {
            Self::Hashed { .. } => &event.id,
            Self::ByCalendar { .. } => event.calendar_id.as_deref().unwrap_or(""),
        }
    }

    /// Resolves the scheme for a key returned by [`ColorResolver::key_for`].
    pub fn resolve_key(&self, key: &str) -> ColorScheme {
        match self {
            Self::Hashed { palette } => palette.pick(key),
            Self::ByCalendar { registry, fallback } => {
                ColorScheme::from_base(registry.color_for(key).unwrap_or(*fallback))
            }
        }
    }

    pub fn resolve(&self, event: &CalendarEvent) -> ColorScheme {
        self.resolve_key(self.key_for(event))
    }
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::from_config(&ColorConfig::default(), CalendarRegistry::new())
    }
}

/// Per-pass cache in front of a [`ColorResolver`].
#[derive(Debug)]
pub struct ColorMemo<'a> {
    resolver: &'a ColorResolver,
    cache: HashMap<String, ColorScheme>,
}

impl<'a> ColorMemo<'a> {
    pub fn new(resolver: &'a ColorResolver) -> Self {
        Self {
            resolver,
            cache: HashMap::new(),
        }
    }

    pub fn scheme_for(&mut self, event: &CalendarEvent) -> ColorScheme {
        let key = self.resolver.key_for(event);
        if let Some(scheme) = self.cache.get(key) {
            return *scheme;
        }
        let scheme = self.resolver.resolve_key(key);
        self.cache.insert(key.to_string(), scheme);
        scheme
    }

    /// Number of distinct keys resolved so far.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

//! Colours and palettes.  A palette is an ordered, never-empty list of
//! RGB triples, always indexed cyclically.  Named palettes live in a
//! registry that is built once and handed to the renderers; names the
//! registry doesn't know get a generated grayscale ramp instead.

use std::collections::HashMap;
use std::fmt;

use crate::error::{FractalError, Result};

/// A single 8-bit-per-channel colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse six hex digits, without a leading `#`, e.g. `"FFD700"`.
    pub fn from_hex(s: &str) -> Result<Rgb> {
        let bad = || FractalError::Colour(s.to_string());
        if s.len() != 6 || !s.is_ascii() {
            return Err(bad());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&s[range], 16);
        match (channel(0..2), channel(2..4), channel(4..6)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Rgb(r, g, b)),
            _ => Err(bad()),
        }
    }

    /// The colour as lowercase hex digits, without a leading `#`.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// The colour as a byte triple, ready for a raster.
    pub fn to_bytes(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Length of the generated ramp when nobody asks for a specific one.
pub const DEFAULT_RAMP_LENGTH: usize = 3;

/// An ordered, non-empty list of colours.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    /// Wraps a list of colours.  An empty list is refused, since every
    /// lookup is `index mod len`.
    pub fn new(colours: Vec<Rgb>) -> Result<Palette> {
        if colours.is_empty() {
            return Err(FractalError::Parameter("a palette needs at least one colour".to_string()));
        }
        Ok(Palette(colours))
    }

    /// A grayscale ramp of `length` entries: entry `i` is
    /// `8 + (48 * i mod 256)` in every channel.  A zero length gets the
    /// default ramp so the result is never empty.
    pub fn grayscale(length: usize) -> Palette {
        let length = if length == 0 { DEFAULT_RAMP_LENGTH } else { length };
        Palette(
            (0..length)
                .map(|i| {
                    let v = (8 + (48 * i) % 256) as u8;
                    Rgb(v, v, v)
                })
                .collect(),
        )
    }

    /// Cyclic lookup.
    #[inline]
    pub fn get(&self, index: usize) -> Rgb {
        self.0[index % self.0.len()]
    }

    /// Replace one entry, as the contour colour overrides do.  Indices
    /// past the end wrap, like lookups.
    pub fn set(&mut self, index: usize, colour: Rgb) {
        let len = self.0.len();
        self.0[index % len] = colour;
    }

    /// Number of entries, always at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The colours, in order.
    pub fn colours(&self) -> &[Rgb] {
        &self.0
    }
}

const TEST: [Rgb; 3] = [Rgb(0x00, 0x80, 0xF0), Rgb(0x00, 0x40, 0xB0), Rgb(0x00, 0x00, 0x70)];

const DEFAULT: [Rgb; 3] = [Rgb(0xA0, 0x10, 0x10), Rgb(0x10, 0xA0, 0x10), Rgb(0x10, 0x10, 0xA0)];

// Blues
const PALETTE5: [Rgb; 5] = [
    Rgb(0xA0, 0xFF, 0xFF),
    Rgb(0x00, 0x00, 0x40),
    Rgb(0x10, 0x00, 0xE0),
    Rgb(0x40, 0x80, 0xFF),
    Rgb(0x03, 0x03, 0x03),
];

// The Portuguese flag
const PORTUGAL: [Rgb; 5] = [
    Rgb(0x00, 0x10, 0x80),
    Rgb(0x10, 0x80, 0x10),
    Rgb(0xF0, 0xD0, 0x00),
    Rgb(0xFF, 0x00, 0x00),
    Rgb(0xFC, 0xFC, 0xFC),
];

const RAINBOW: [Rgb; 8] = [
    Rgb(0xB0, 0x20, 0x20),
    Rgb(0xFF, 0x80, 0x20),
    Rgb(0xFF, 0xD7, 0x00),
    Rgb(0x40, 0xB0, 0x30),
    Rgb(0x40, 0x90, 0xA0),
    Rgb(0x60, 0x60, 0xC0),
    Rgb(0x00, 0x00, 0xF0),
    Rgb(0x60, 0x10, 0xA0),
];

/// Read-only table of named palettes.
#[derive(Clone, Debug, Default)]
pub struct PaletteRegistry {
    palettes: HashMap<String, Palette>,
}

impl PaletteRegistry {
    /// An empty registry; every lookup falls through to grayscale.
    pub fn new() -> Self {
        PaletteRegistry::default()
    }

    /// The registry with the stock palettes: `TEST`, `DEFAULT`,
    /// `PALETTE5`, `PORTUGAL` and `RAINBOW`.
    pub fn builtin() -> Self {
        let mut registry = PaletteRegistry::new();
        let stock: [(&str, &[Rgb]); 5] = [
            ("TEST", &TEST),
            ("DEFAULT", &DEFAULT),
            ("PALETTE5", &PALETTE5),
            ("PORTUGAL", &PORTUGAL),
            ("RAINBOW", &RAINBOW),
        ];
        for (name, colours) in stock.iter() {
            registry
                .palettes
                .insert((*name).to_string(), Palette(colours.to_vec()));
        }
        registry
    }

    /// Add or replace a named palette.  Registries are assembled before
    /// a pass and only read during it.
    pub fn with(mut self, name: &str, palette: Palette) -> Self {
        self.palettes.insert(name.to_string(), palette);
        self
    }

    /// The palette registered as `name`, or a grayscale ramp of
    /// `length` entries if there is none.
    pub fn get_palette(&self, name: &str, length: usize) -> Palette {
        match self.palettes.get(name) {
            Some(palette) => palette.clone(),
            None => Palette::grayscale(length),
        }
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.palettes.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.palettes.keys().map(|k| k.as_str()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_and_formats() {
        assert_eq!(Rgb::from_hex("FFD700").unwrap(), Rgb(0xFF, 0xD7, 0x00));
        assert_eq!(Rgb::from_hex("faebd7").unwrap(), Rgb(0xFA, 0xEB, 0xD7));
        assert_eq!(Rgb(0xD0, 0xFF, 0x0F).to_hex(), "d0ff0f");
        assert_eq!(format!("{}", Rgb(1, 2, 3)), "#010203");
    }

    #[test]
    fn malformed_hex_is_refused() {
        assert!(Rgb::from_hex("FFD70").is_err());
        assert!(Rgb::from_hex("#FFD700").is_err());
        assert!(Rgb::from_hex("GGGGGG").is_err());
        assert!(Rgb::from_hex("ÿÿÿ").is_err());
    }

    #[test]
    fn grayscale_ramp_values() {
        let p = Palette::grayscale(7);
        let expected = [8u8, 56, 104, 152, 200, 248, 40];
        assert_eq!(p.len(), 7);
        for (i, v) in expected.iter().enumerate() {
            assert_eq!(p.get(i), Rgb(*v, *v, *v));
        }
    }

    #[test]
    fn grayscale_is_never_empty() {
        assert_eq!(Palette::grayscale(0).len(), DEFAULT_RAMP_LENGTH);
        assert!(Palette::new(vec![]).is_err());
    }

    #[test]
    fn lookup_is_cyclic() {
        let p = PaletteRegistry::builtin().get_palette("RAINBOW", 3);
        for i in 0..40 {
            assert_eq!(p.get(i), p.get(i + p.len()));
        }
        assert_eq!(p.get(8), Rgb(0xB0, 0x20, 0x20));
    }

    #[test]
    fn unknown_names_fall_back_to_grayscale() {
        let registry = PaletteRegistry::builtin();
        assert!(!registry.contains("3CAL_0"));
        assert_eq!(registry.get_palette("3CAL_0", 5), Palette::grayscale(5));
        assert_eq!(registry.get_palette("PORTUGAL", 2).len(), 5);
    }

    #[test]
    fn overrides_replace_entries() {
        let mut p = PaletteRegistry::builtin().get_palette("TEST", 3);
        p.set(1, Rgb(1, 2, 3));
        assert_eq!(p.get(1), Rgb(1, 2, 3));
        assert_eq!(p.get(0), TEST[0]);
    }

    #[test]
    fn registry_can_be_extended() {
        let registry = PaletteRegistry::new().with("MONO", Palette::new(vec![Rgb(9, 9, 9)]).unwrap());
        assert_eq!(registry.names(), vec!["MONO"]);
        assert_eq!(registry.get_palette("MONO", 3).get(5), Rgb(9, 9, 9));
    }
}

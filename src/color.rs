//! Color type and SVG color value parsing.
//!
//! Only sRGB 8-bit RGBA is supported. Alpha is straight (not premultiplied),
//! matching the layout of [`RasterizedImage`](crate::rendering_buffer::RasterizedImage).
//!
//! Recognised color syntax is the icon subset: `#RGB`, `#RRGGBB`,
//! `#RRGGBBAA` and the keywords `none`, `transparent`, `black`, `white`.
//! Anything else degrades to opaque black with a warning so a single bad
//! attribute does not blank the whole icon.

use log::warn;

// ============================================================================
// Rgba8 (8-bit per channel)
// ============================================================================

/// RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_SCALE: u32 = 1 << Self::BASE_SHIFT;
    pub const BASE_MASK: u32 = Self::BASE_SCALE - 1;
    pub const BASE_MSB: u32 = 1 << (Self::BASE_SHIFT - 1);

    pub const TRANSPARENT: Rgba8 = Rgba8::new(0, 0, 0, 0);
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn new_opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with alpha replaced by `a`.
    pub fn with_opacity(c: &Rgba8, a: u8) -> Self {
        Self { a, ..*c }
    }

    /// Read a pixel from a 4-byte RGBA slice.
    #[inline]
    pub fn from_slice(p: &[u8]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }

    /// Store this color into a 4-byte RGBA slice.
    #[inline]
    pub fn store(&self, p: &mut [u8]) {
        p[0] = self.r;
        p[1] = self.g;
        p[2] = self.b;
        p[3] = self.a;
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    pub fn is_opaque(&self) -> bool {
        self.a == Self::BASE_MASK as u8
    }

    /// Fixed-point multiply, exact over u8.
    /// `(a * b + 128) >> 8`, with rounding correction.
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        let t: u32 = a as u32 * b as u32 + Self::BASE_MSB;
        (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT) as u8
    }

    /// Alpha scaled by a coverage value in `[0, 1]`.
    #[inline]
    pub fn alpha_with_coverage(&self, coverage: f32) -> u8 {
        (self.a as f32 * coverage.clamp(0.0, 1.0)).round() as u8
    }

    /// Replace RGB with `tint` and scale alpha by the tint's alpha.
    ///
    /// Used for monochrome icons rendered in a theme color.
    pub fn tinted(&self, tint: &Rgba8) -> Self {
        Self::new(tint.r, tint.g, tint.b, Self::multiply(self.a, tint.a))
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse an SVG paint/color value.
///
/// `none` and `transparent` produce alpha 0. Unknown input falls back to
/// opaque black and logs a warning.
pub fn parse_color(s: &str) -> Rgba8 {
    let s = s.trim();
    match s {
        "none" | "transparent" => return Rgba8::TRANSPARENT,
        "black" => return Rgba8::BLACK,
        "white" => return Rgba8::WHITE,
        _ => {}
    }
    if let Some(c) = s.strip_prefix('#').and_then(parse_hex_color) {
        return c;
    }
    warn!("unrecognised color {:?}, using opaque black", s);
    Rgba8::BLACK
}

/// Returns `true` if the paint value disables painting entirely.
pub fn is_paint_none(s: &str) -> bool {
    s.trim() == "none"
}

fn parse_hex_color(hex: &str) -> Option<Rgba8> {
    // from_str_radix alone would accept a leading '+'.
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    match hex.len() {
        3 => Some(Rgba8::new_opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Rgba8::new_opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

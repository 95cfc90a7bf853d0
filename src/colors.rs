//! Packed ARGB8888 colors.

pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const BACKGROUND: u32 = 0xFF1E1E1E;

#[inline]
pub fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

/// Splits a packed color into `(a, r, g, b)` bytes.
#[inline]
pub fn channels(color: u32) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

#[inline]
pub fn pack(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Multiplies the RGB channels by `intensity`, clamped to `[0, 1]`.
/// Alpha is preserved.
#[inline]
pub fn scale(color: u32, intensity: f32) -> u32 {
    let intensity = intensity.clamp(0.0, 1.0);
    let (a, r, g, b) = channels(color);
    let s = |c: u8| (c as f32 * intensity).round() as u8;
    pack(a, s(r), s(g), s(b))
}

/// Component-wise product of two colors, including alpha.
///
/// A white tint leaves the texel unchanged.
#[inline]
pub fn modulate(texel: u32, tint: u32) -> u32 {
    let (ta, tr, tg, tb) = channels(texel);
    let (ca, cr, cg, cb) = channels(tint);
    let m = |x: u8, y: u8| ((x as u32 * y as u32 + 127) / 255) as u8;
    pack(m(ta, ca), m(tr, cr), m(tg, cg), m(tb, cb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_tint_is_identity() {
        for texel in [0xFF123456, 0x80FFFFFF, 0x00000000, 0xFFFF00FF] {
            assert_eq!(modulate(texel, WHITE), texel);
        }
    }

    #[test]
    fn scale_preserves_alpha() {
        assert_eq!(scale(0x80FF8040, 0.5), 0x80804020);
        assert_eq!(scale(0xFF102030, 1.0), 0xFF102030);
    }
}

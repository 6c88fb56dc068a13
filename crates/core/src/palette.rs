//! Per-session color palette
//!
//! One color per piece type-id. Hues are drawn uniformly and re-rolled while
//! they sit too close to a hue already in the palette; saturation and
//! lightness are fixed so every piece reads with the same weight.

use rand::Rng;
use serde::Serialize;

use crate::types::{
    PieceType, HUE_ATTEMPTS, HUE_SEPARATION_DEG, PALETTE_LIGHTNESS, PALETTE_SATURATION,
};

/// HSL color: hue in degrees `0..360`, saturation and lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Hsl {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Hsl {
    pub const fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Convert to 8-bit RGB.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = f32::from(self.hue % 360) / 60.0;
        let s = f32::from(self.saturation.min(100)) / 100.0;
        let l = f32::from(self.lightness.min(100)) / 100.0;

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - chroma / 2.0;

        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };

        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (channel(r), channel(g), channel(b))
    }
}

/// Circular distance between two hues, in degrees
pub fn hue_distance(a: u16, b: u16) -> u16 {
    let d = (a % 360).abs_diff(b % 360);
    d.min(360 - d)
}

/// Colors indexed by type-id (`1..=len`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    colors: Vec<Hsl>,
    well_separated: bool,
}

impl Palette {
    /// Draw `count` colors.
    ///
    /// Each hue gets up to `HUE_ATTEMPTS` draws to land at least
    /// `HUE_SEPARATION_DEG` away from every earlier hue; the last draw is kept
    /// either way.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, count: PieceType) -> Self {
        let mut colors: Vec<Hsl> = Vec::with_capacity(count as usize);
        let mut well_separated = true;

        for _ in 0..count {
            let mut hue = 0;
            let mut separated = false;
            for _ in 0..HUE_ATTEMPTS {
                hue = rng.gen_range(0..360);
                separated = colors
                    .iter()
                    .all(|c| hue_distance(c.hue, hue) >= HUE_SEPARATION_DEG);
                if separated {
                    break;
                }
            }
            if !separated {
                log::debug!("palette hue {} kept without full separation", hue);
                well_separated = false;
            }
            colors.push(Hsl::new(hue, PALETTE_SATURATION, PALETTE_LIGHTNESS));
        }

        Self {
            colors,
            well_separated,
        }
    }

    /// Color for a type-id; `None` for 0 or ids past the palette
    pub fn color(&self, kind: PieceType) -> Option<Hsl> {
        (kind as usize)
            .checked_sub(1)
            .and_then(|idx| self.colors.get(idx).copied())
    }

    pub fn colors(&self) -> &[Hsl] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Whether every hue found its separation within the attempt budget
    pub fn is_well_separated(&self) -> bool {
        self.well_separated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_primary_colors() {
        assert_eq!(Hsl::new(0, 100, 50).to_rgb(), (255, 0, 0));
        assert_eq!(Hsl::new(120, 100, 50).to_rgb(), (0, 255, 0));
        assert_eq!(Hsl::new(240, 100, 50).to_rgb(), (0, 0, 255));
        assert_eq!(Hsl::new(60, 100, 50).to_rgb(), (255, 255, 0));
        assert_eq!(Hsl::new(0, 0, 100).to_rgb(), (255, 255, 255));
        assert_eq!(Hsl::new(200, 70, 0).to_rgb(), (0, 0, 0));
    }

    #[test]
    fn test_hue_distance_wraps() {
        assert_eq!(hue_distance(10, 350), 20);
        assert_eq!(hue_distance(350, 10), 20);
        assert_eq!(hue_distance(0, 180), 180);
        assert_eq!(hue_distance(90, 90), 0);
    }

    #[test]
    fn test_palette_shape() {
        let mut rng = StdRng::seed_from_u64(11);
        let palette = Palette::generate(&mut rng, 10);

        assert_eq!(palette.len(), 10);
        for color in palette.colors() {
            assert!(color.hue < 360);
            assert_eq!(color.saturation, PALETTE_SATURATION);
            assert_eq!(color.lightness, PALETTE_LIGHTNESS);
        }
        assert!(palette.color(0).is_none());
        assert!(palette.color(11).is_none());
        assert_eq!(palette.color(1), Some(palette.colors()[0]));
    }

    #[test]
    fn test_separated_palettes_keep_distance() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let palette = Palette::generate(&mut rng, 10);
            if !palette.is_well_separated() {
                continue;
            }
            let colors = palette.colors();
            for (i, a) in colors.iter().enumerate() {
                for b in &colors[i + 1..] {
                    assert!(hue_distance(a.hue, b.hue) >= HUE_SEPARATION_DEG);
                }
            }
        }
    }
}

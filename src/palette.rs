//! Dominant colour of an artwork, for the adaptive background

use std::collections::HashMap;

/// Sample every Nth pixel
const SAMPLE_STRIDE: usize = 10;
/// Bits kept per channel when bucketing
const QUANT_BITS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Most common colour in an RGBA8 buffer.
///
/// Pixels are bucketed by their top bits; the fullest bucket's mean is the
/// answer. Transparent and near-white pixels are skipped.
pub fn dominant_color(rgba: &[u8]) -> Option<Rgb> {
    let shift = 8 - QUANT_BITS;
    let mut buckets: HashMap<(u8, u8, u8), (u32, [u64; 3])> = HashMap::new();

    for px in rgba.chunks_exact(4).step_by(SAMPLE_STRIDE) {
        let (r, g, b, a) = (px[0], px[1], px[2], px[3]);
        if a < 125 || (r > 250 && g > 250 && b > 250) {
            continue;
        }
        let entry = buckets
            .entry((r >> shift, g >> shift, b >> shift))
            .or_insert((0, [0; 3]));
        entry.0 += 1;
        entry.1[0] += r as u64;
        entry.1[1] += g as u64;
        entry.1[2] += b as u64;
    }

    buckets
        .into_iter()
        .max_by_key(|(key, (count, _))| (*count, std::cmp::Reverse(*key)))
        .map(|(_, (count, sum))| {
            let n = count as u64;
            Rgb {
                r: (sum[0] / n) as u8,
                g: (sum[1] / n) as u8,
                b: (sum[2] / n) as u8,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(pixels: &[[u8; 4]], repeat: usize) -> Vec<u8> {
        pixels
            .iter()
            .flat_map(|p| std::iter::repeat_n(*p, repeat))
            .flatten()
            .collect()
    }

    #[test]
    fn test_solid_colour() {
        let buf = image(&[[200, 30, 60, 255]], 100);
        assert_eq!(
            dominant_color(&buf),
            Some(Rgb {
                r: 200,
                g: 30,
                b: 60
            })
        );
    }

    #[test]
    fn test_majority_wins() {
        let mut mostly_blue = image(&[[10, 10, 200, 255]], 700);
        mostly_blue.extend(image(&[[250, 120, 0, 255]], 300));
        assert_eq!(dominant_color(&mostly_blue).unwrap().b, 200);
    }

    #[test]
    fn test_skips_white_and_transparent() {
        let buf = image(&[[255, 255, 255, 255], [0, 0, 0, 0]], 500);
        assert_eq!(dominant_color(&buf), None);
    }

    #[test]
    fn test_css() {
        assert_eq!(Rgb { r: 1, g: 2, b: 3 }.to_css(), "rgb(1, 2, 3)");
    }
}

/// Convert a normalized RGB pixel to HSV, all channels in `[0, 1]`.
///
/// Hue wraps (0.0 and 1.0 are both red), which is why the brown rule in the
/// analyzer checks both ends of the range.
#[inline]
pub fn rgb_to_hsv(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta < 1e-6 {
        0.0
    } else if (max - r).abs() < 1e-6 {
        let mut x = ((g - b) / delta) % 6.0;
        if x < 0.0 {
            x += 6.0;
        }
        x / 6.0
    } else if (max - g).abs() < 1e-6 {
        (((b - r) / delta) + 2.0) / 6.0
    } else {
        (((r - g) / delta) + 4.0) / 6.0
    };

    let s = if max < 1e-6 { 0.0 } else { delta / max };

    [h, s, max]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn primary_colors() {
        let [h, s, v] = rgb_to_hsv([1.0, 0.0, 0.0]);
        assert!(close(h, 0.0) && close(s, 1.0) && close(v, 1.0));

        let [h, _, _] = rgb_to_hsv([0.0, 1.0, 0.0]);
        assert!(close(h, 1.0 / 3.0));

        let [h, _, _] = rgb_to_hsv([0.0, 0.0, 1.0]);
        assert!(close(h, 2.0 / 3.0));
    }

    #[test]
    fn grey_has_zero_saturation() {
        let [h, s, v] = rgb_to_hsv([0.5, 0.5, 0.5]);
        assert!(close(h, 0.0) && close(s, 0.0) && close(v, 0.5));
    }

    #[test]
    fn magenta_side_hue_wraps_high() {
        // Red with a little blue sits just below 1.0 rather than negative.
        let [h, _, _] = rgb_to_hsv([1.0, 0.0, 0.2]);
        assert!(h > 0.9 && h < 1.0);
    }
}

//! Color palettes shared by the interactive and static renderers.

/// Backend-neutral RGB triple.
pub type Rgb = (u8, u8, u8);

pub const LINE_COLOR: Rgb = (31, 119, 180); // Blue
pub const BAR_COLOR: Rgb = (33, 145, 140); // Teal
pub const HIST_FILL: Rgb = (135, 206, 235); // Sky blue
pub const HIST_EDGE: Rgb = (0, 0, 0);
pub const KDE_COLOR: Rgb = (31, 119, 180);
pub const MEAN_COLOR: Rgb = (255, 0, 0);
pub const MEDIAN_COLOR: Rgb = (0, 128, 0);
pub const STD_COLOR: Rgb = (255, 165, 0);
pub const MISSING_COLOR: Rgb = (190, 190, 190);

/// Categorical colors for pie slices.
pub const CATEGORY: [Rgb; 10] = [
    (31, 119, 180),  // Blue
    (255, 127, 14),  // Orange
    (44, 160, 44),   // Green
    (214, 39, 40),   // Red
    (148, 103, 189), // Purple
    (140, 86, 75),   // Brown
    (227, 119, 194), // Pink
    (127, 127, 127), // Gray
    (188, 189, 34),  // Olive
    (23, 190, 207),  // Cyan
];

const VIRIDIS: [Rgb; 5] = [
    (68, 1, 84),    // Dark purple
    (59, 82, 139),  // Blue-purple
    (33, 145, 140), // Teal
    (94, 201, 98),  // Green
    (253, 231, 37), // Yellow
];

const COOLWARM_LOW: Rgb = (59, 76, 192);
const COOLWARM_MID: Rgb = (221, 221, 221);
const COOLWARM_HIGH: Rgb = (180, 4, 38);

pub fn category(index: usize) -> Rgb {
    CATEGORY[index % CATEGORY.len()]
}

/// Viridis at `t` in `[0, 1]`.
pub fn viridis(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0) * (VIRIDIS.len() - 1) as f64;
    let i = (t.floor() as usize).min(VIRIDIS.len() - 2);
    lerp(VIRIDIS[i], VIRIDIS[i + 1], t - i as f64)
}

/// `n` evenly spaced viridis colors.
pub fn viridis_samples(n: usize) -> Vec<Rgb> {
    match n {
        0 => Vec::new(),
        1 => vec![viridis(0.0)],
        _ => (0..n)
            .map(|i| viridis(i as f64 / (n - 1) as f64))
            .collect(),
    }
}

/// Diverging blue-grey-red scale centered at 0 over `[-1, 1]`.
pub fn coolwarm(value: f64) -> Rgb {
    if value.is_nan() {
        return MISSING_COLOR;
    }
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        lerp(COOLWARM_MID, COOLWARM_LOW, -v)
    } else {
        lerp(COOLWARM_MID, COOLWARM_HIGH, v)
    }
}

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    (mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viridis_endpoints() {
        assert_eq!(viridis(0.0), (68, 1, 84));
        assert_eq!(viridis(1.0), (253, 231, 37));
        assert_eq!(viridis_samples(3)[1], (33, 145, 140));
    }

    #[test]
    fn test_coolwarm_is_centered() {
        assert_eq!(coolwarm(0.0), COOLWARM_MID);
        assert_eq!(coolwarm(-1.0), COOLWARM_LOW);
        assert_eq!(coolwarm(1.0), COOLWARM_HIGH);
        assert_eq!(coolwarm(f64::NAN), MISSING_COLOR);
    }
}

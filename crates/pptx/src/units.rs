//! Length units for OOXML geometry.

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Slide width (10 in).
pub const SLIDE_WIDTH: i64 = 10 * EMU_PER_INCH;

/// Slide height (7.5 in).
pub const SLIDE_HEIGHT: i64 = 6_858_000;

/// Convert inches to EMU.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Font size in hundredths of a point, as `sz` attributes expect.
pub fn font_size(points: u32) -> u32 {
    points * 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inch_conversion() {
        assert_eq!(inches(1.0), 914_400);
        assert_eq!(inches(0.5), 457_200);
        assert_eq!(inches(-0.69), -630_936);
    }

    #[test]
    fn font_sizes_are_hundredths() {
        assert_eq!(font_size(32), 3200);
    }
}

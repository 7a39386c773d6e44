//! Sample pixel transforms used by the demo and benchmark commands

/// Brightest value a pixel may take
pub const MAX_PIXEL: i32 = 255;
pub const BRIGHTEN_STEP: i32 = 50;

/// `min(255, pixel + 50)`
pub fn brighten(pixel: &i32) -> i32 {
    pixel.saturating_add(BRIGHTEN_STEP).min(MAX_PIXEL)
}

pub fn pixel_label(pixel: &i32) -> String {
    format!("pixel_{}", pixel)
}

/// Square widened to `i64` so large pixels cannot overflow
pub fn square(pixel: &i32) -> i64 {
    let wide = i64::from(*pixel);
    wide * wide
}

/// Pixels `0..count`, saturating at `i32::MAX`
pub fn sample_pixels(count: usize) -> Vec<i32> {
    (0..count)
        .map(|i| i32::try_from(i).unwrap_or(i32::MAX))
        .collect()
}

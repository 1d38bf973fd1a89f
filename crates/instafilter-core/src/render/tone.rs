//! Per-pixel tonal filters: sepia toning and vignetting.

use image::RgbImage;

/// Sepia matrix rows (R, G, B outputs).
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Smootherstep interpolation: `6t^5 - 15t^4 + 10t^3`, with `t` clamped to
/// `[0, 1]`.
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Blend each pixel towards its sepia-toned colour.
///
/// `intensity` is the blend fraction, clamped to `[0, 1]`; 0 leaves the
/// image untouched.
pub fn sepia_tone(image: &mut RgbImage, intensity: f32) {
    let amount = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };
    if amount <= 0.0 {
        return;
    }

    for px in image.pixels_mut() {
        let [r, g, b] = px.0.map(f32::from);
        let toned = SEPIA.map(|row| (row[0] * r + row[1] * g + row[2] * b).min(255.0));
        px.0 = [
            to_u8(r + (toned[0] - r) * amount),
            to_u8(g + (toned[1] - g) * amount),
            to_u8(b + (toned[2] - b) * amount),
        ];
    }
}

/// Darken the image outside a centred disc.
///
/// Pixels within `radius` pixels of the centre are untouched; beyond it the
/// darkening ramps (smootherstep) up to `intensity` at the corners. An
/// intensity of 1 takes the corners to black.
pub fn vignette(image: &mut RgbImage, intensity: f32, radius: f32) {
    if intensity.is_nan() || intensity <= 0.0 {
        return;
    }

    let (width, height) = image.dimensions();
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let corner = (cx * cx + cy * cy).sqrt();
    let radius = if radius.is_nan() { 0.0 } else { radius.max(0.0) };
    let span = corner - radius;
    if span <= 0.0 {
        return;
    }

    for (x, y, px) in image.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let distance = (dx * dx + dy * dy).sqrt();

        let falloff = smootherstep((distance - radius) / span);
        if falloff <= 0.0 {
            continue;
        }
        let gain = (1.0 - intensity * falloff).max(0.0);
        px.0 = px.0.map(|c| to_u8(c as f32 * gain));
    }
}

/// Un-premultiply RGBA8 pixels in place.
pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Normalized Gaussian falloff weights for `steps` concentric samples (innermost first).
///
/// Weights lie in `(0, 1]` and decrease with distance from the center.
pub(crate) fn gaussian_falloff(steps: usize, sigma: f64) -> Vec<f64> {
    if steps == 0 {
        return Vec::new();
    }
    let sigma = if sigma.is_finite() && sigma > 0.0 {
        sigma
    } else {
        1.0
    };
    let denom = 2.0 * sigma * sigma;
    (0..steps)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;

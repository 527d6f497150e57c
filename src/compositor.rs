//! The render pass.
//!
//! Priority, lowest to highest:
//!
//! 1. the base frame,
//! 2. active indicators, in registry order (later ones win a shared LED),
//! 3. active layer overlays, in registry order.
//!
//! Layer overlays are drawn last so the active layer stays visible no matter
//! which indicators are lit.

use crate::colors::Rgb8;
use crate::overlay::{IndicatorOverlay, LayerOverlay};

/// Composes `base` and the active overlays into `output`.
///
/// Pure: no I/O, no allocation, and the result depends only on the inputs,
/// so rendering twice yields the same frame.
///
/// # Panics
/// If an overlay references an index outside the frame. The registry
/// rejects such configurations, so this only fires on a broken invariant.
pub fn render<const N: usize>(
    base: &[Rgb8; N],
    indicators: &[IndicatorOverlay],
    layers: &[LayerOverlay],
    output: &mut [Rgb8; N],
) {
    output.copy_from_slice(base);

    for indicator in indicators.iter().filter(|o| o.is_active()) {
        fill(output, indicator.led_indexes(), indicator.color());
    }

    for layer in layers.iter().filter(|o| o.is_active()) {
        fill(output, layer.led_indexes(), layer.color());
    }
}

#[inline]
fn fill(output: &mut [Rgb8], led_indexes: &[usize], color: Rgb8) {
    for &index in led_indexes {
        output[index] = color;
    }
}

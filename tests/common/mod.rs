//! Shared test infrastructure for rgb-overlay integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use rgb_overlay::{
    BLACK, BLUE, DeviceConfig, GREEN, IndicatorDef, InitialLayerState, LayerDef, LedSink,
    NoopRawMutex, OverlayDevice, Rgb8, WHITE, YELLOW,
};

// ============================================================================
// Mock LED strips
// ============================================================================

/// Mock strip that records every submitted frame
#[derive(Default)]
pub struct MockStrip {
    frames: Vec<Vec<Rgb8>>,
}

impl MockStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Vec<Rgb8>] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&[Rgb8]> {
        self.frames.last().map(Vec::as_slice)
    }

    pub fn write_count(&self) -> usize {
        self.frames.len()
    }
}

impl LedSink for MockStrip {
    type Error = core::convert::Infallible;

    fn write(&mut self, pixels: &[Rgb8]) -> Result<(), Self::Error> {
        self.frames.push(pixels.to_vec());
        Ok(())
    }
}

/// Transport error reported by `FlakyStrip`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

impl core::fmt::Display for BusFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "bus fault")
    }
}

/// Mock strip that fails while `failing` is set
#[derive(Default)]
pub struct FlakyStrip {
    pub failing: bool,
    pub attempts: usize,
}

impl LedSink for FlakyStrip {
    type Error = BusFault;

    fn write(&mut self, _pixels: &[Rgb8]) -> Result<(), Self::Error> {
        self.attempts += 1;
        if self.failing { Err(BusFault) } else { Ok(()) }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub const FRAME_LEN: usize = 10;

/// Frame color of LEDs not covered by an overlay
pub const BASE_COLOR: Rgb8 = rgb_overlay::Srgb::new(10, 20, 30);

pub const LAYER_COLORS: [Rgb8; 4] = [GREEN, BLUE, YELLOW, WHITE];

pub static INDICATORS: [IndicatorDef; 1] = [IndicatorDef::new("caps", &[3])];
pub static LAYERS: [LayerDef; 1] = [LayerDef::new("L", &[3, 7], LAYER_COLORS)];

/// One indicator "caps" over LED 3, one layer overlay "L" over LEDs 3 and 7
pub static KEYBOARD: DeviceConfig =
    DeviceConfig::new(&INDICATORS, &LAYERS, InitialLayerState::Inactive);

pub type TestDevice<S> = OverlayDevice<NoopRawMutex, S, FRAME_LEN, 4, 4>;

/// Builds the keyboard fixture and paints the base frame
pub fn keyboard() -> TestDevice<MockStrip> {
    let device = TestDevice::new(&KEYBOARD, MockStrip::new()).unwrap();
    device.write_base(&[BASE_COLOR; FRAME_LEN]).unwrap();
    device
}

/// Expected frame: base color everywhere except the given overrides
pub fn frame_with(overrides: &[(usize, Rgb8)]) -> [Rgb8; FRAME_LEN] {
    let mut frame = [BASE_COLOR; FRAME_LEN];
    for &(index, color) in overrides {
        frame[index] = color;
    }
    frame
}

pub fn black_frame() -> [Rgb8; FRAME_LEN] {
    [BLACK; FRAME_LEN]
}

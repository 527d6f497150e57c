#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;
use rgb_overlay::{
    CriticalSectionRawMutex, DeviceConfig, DisableLayerBehavior, IndicatorDef,
    InactiveLayerPolicy, InitialLayerState, LayerChangeAdapter, LayerDef, LayerTarget, LedSink,
    OverlayDevice, RemapSink, Rgb8, colors,
};
use static_cell::StaticCell;

// ============================================================================
// Static Configuration
// ============================================================================

const MAP_LEN: usize = 16;
const CHAIN_LENGTH: usize = 18;

static MAP: [usize; MAP_LEN] = [0, 1, 2, 3, 4, 5, 6, 7, 15, 14, 13, 12, 11, 10, 9, 8];

static INDICATORS: [IndicatorDef; 2] = [
    IndicatorDef::new("CAPS_LOCK", &[0]),
    IndicatorDef::new("NUM_LOCK", &[1]),
];

static LAYERS: [LayerDef; 1] = [LayerDef::new(
    "LAYER_INDICATOR",
    &[14, 15],
    [
        colors::from_u32(0x00FF00),
        colors::from_u32(0x0000FF),
        colors::from_u32(0xFFFF00),
        colors::from_u32(0xFFFFFF),
    ],
)];

static CONFIG: DeviceConfig = DeviceConfig::new(&INDICATORS, &LAYERS, InitialLayerState::Inactive);

// ============================================================================
// Minimal LED Strip Implementation
// ============================================================================

/// Zero-size strip implementation for measuring library overhead
pub struct MinimalStrip;

impl LedSink for MinimalStrip {
    type Error = ();

    fn write(&mut self, pixels: &[Rgb8]) -> Result<(), ()> {
        core::hint::black_box(pixels);
        Ok(())
    }
}

type Strip = RemapSink<MinimalStrip, CHAIN_LENGTH>;
type Device = OverlayDevice<CriticalSectionRawMutex, Strip, MAP_LEN, 2, 1>;

static DEVICE: StaticCell<Device> = StaticCell::new();

// ============================================================================
// Composition Root
// ============================================================================

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn run() {
    let Ok(strip) = RemapSink::new(MinimalStrip, &MAP) else {
        return;
    };
    let Ok(device) = Device::new(&CONFIG, strip) else {
        return;
    };
    let device: &'static Device = DEVICE.init(device);

    let layer_listener = LayerChangeAdapter::new(
        device,
        LayerTarget::Label("LAYER_INDICATOR"),
        InactiveLayerPolicy::Ignore,
    );
    let disable_layer_led = DisableLayerBehavior::new(device, LayerTarget::All);

    let _ = device.write_base(&[colors::hue(200.0); MAP_LEN]);
    let _ = device.set_indicator("CAPS_LOCK", colors::RED);
    let _ = layer_listener.on_layer_change(2, true);
    let _ = disable_layer_led.on_pressed();
    let _ = device.disable_indicator("CAPS_LOCK");

    core::hint::black_box(device.output());
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    run();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}

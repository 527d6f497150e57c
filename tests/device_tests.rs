//! Integration tests for OverlayDevice

mod common;
use common::*;

use std::cell::OnceCell;
use std::rc::Rc;

use rgb_overlay::{
    BLUE, ConfigError, DeviceConfig, DeviceError, GREEN, IndicatorDef, InitialLayerState,
    LayerDef, LayerSlot, LayerTarget, LedSink, MAGENTA, NoopRawMutex, OverlayAction,
    OverlayDevice, OverlayRegistry, OverlayState, RED, Rgb8, WHITE, YELLOW,
};

#[test]
fn layer_overlay_wins_then_indicator_reappears() {
    let device = keyboard();

    device.set_indicator("caps", RED).unwrap();
    assert_eq!(device.output(), frame_with(&[(3, RED)]));

    device.set_layer("L", 1).unwrap();
    assert_eq!(device.output(), frame_with(&[(3, BLUE), (7, BLUE)]));

    device.disable_layer("L").unwrap();
    assert_eq!(device.output(), frame_with(&[(3, RED)]));
}

#[test]
fn every_operation_submits_the_rendered_frame() {
    let device = keyboard();
    device.set_indicator("caps", RED).unwrap();
    device.set_layer("L", 2).unwrap();

    let expected = device.output();
    device.inspect_sink(|strip| {
        // write_base, set_indicator, set_layer
        assert_eq!(strip.write_count(), 3);
        assert_eq!(strip.last_frame().unwrap(), &expected[..]);
    });
}

#[test]
fn unknown_indicator_label_is_rejected_without_submitting() {
    let device = keyboard();
    device.set_indicator("caps", RED).unwrap();
    let before = device.output();

    assert_eq!(
        device.set_indicator("ghost", RED),
        Err(DeviceError::LabelNotFound)
    );
    assert_eq!(
        device.disable_indicator("ghost"),
        Err(DeviceError::LabelNotFound)
    );

    assert_eq!(device.output(), before);
    device.inspect_sink(|strip| assert_eq!(strip.write_count(), 2));
}

#[test]
fn unknown_layer_label_is_rejected_without_submitting() {
    let device = keyboard();

    assert_eq!(device.set_layer("ghost", 1), Err(DeviceError::LabelNotFound));
    assert_eq!(device.disable_layer("ghost"), Err(DeviceError::LabelNotFound));
    // indicator labels are not layer labels
    assert_eq!(device.set_layer("caps", 1), Err(DeviceError::LabelNotFound));

    device.inspect_sink(|strip| assert_eq!(strip.write_count(), 1));
}

#[test]
fn layer_index_wraps_into_four_slots() {
    let device = keyboard();

    for (layer, slot) in [(0, 0), (3, 3), (4, 0), (5, 1), (255, 3), (1026, 2)] {
        device.set_layer("L", layer).unwrap();
        let state = device.layer("L").unwrap();
        assert_eq!(state.current_layer.index(), slot, "layer {}", layer);
        assert_eq!(device.output()[7], LAYER_COLORS[slot]);
    }
}

#[test]
fn set_indicator_is_idempotent() {
    let device = keyboard();

    device.set_indicator("caps", MAGENTA).unwrap();
    let once = device.output();
    device.set_indicator("caps", MAGENTA).unwrap();

    assert_eq!(device.output(), once);
    assert_eq!(
        device.indicator("caps").unwrap().state,
        OverlayState::Enabled(MAGENTA)
    );
}

#[test]
fn disabling_indicator_restores_base() {
    let device = keyboard();
    let untouched = device.output();

    device.set_indicator("caps", RED).unwrap();
    device.disable_indicator("caps").unwrap();

    assert_eq!(device.output(), untouched);
    assert_eq!(
        device.indicator("caps").unwrap().state,
        OverlayState::Disabled
    );
}

#[test]
fn indicator_can_change_color_while_enabled() {
    let device = keyboard();

    device.set_indicator("caps", RED).unwrap();
    device.set_indicator("caps", GREEN).unwrap();
    assert_eq!(device.output()[3], GREEN);
}

#[test]
fn out_of_range_index_prevents_construction() {
    static BAD_INDICATORS: [IndicatorDef; 1] = [IndicatorDef::new("caps", &[3, 10])];
    static BAD: DeviceConfig = DeviceConfig::new(&BAD_INDICATORS, &[], InitialLayerState::Active);

    let result = TestDevice::new(&BAD, MockStrip::new());
    assert!(matches!(
        result,
        Err(ConfigError::IndexOutOfRange {
            label: "caps",
            index: 10,
            frame_len: FRAME_LEN
        })
    ));
}

#[test]
fn out_of_range_layer_index_prevents_construction() {
    static BAD_LAYERS: [LayerDef; 1] = [LayerDef::new("L", &[0, 99], LAYER_COLORS)];
    static BAD: DeviceConfig = DeviceConfig::new(&[], &BAD_LAYERS, InitialLayerState::Active);

    assert!(matches!(
        TestDevice::new(&BAD, MockStrip::new()),
        Err(ConfigError::IndexOutOfRange { index: 99, .. })
    ));
}

#[test]
fn registry_validated_for_longer_frame_is_rechecked() {
    let registry = OverlayRegistry::<4, 4>::builder(64, InitialLayerState::Inactive)
        .indicator(IndicatorDef::new("far", &[40]))
        .unwrap()
        .build();

    let result = TestDevice::with_registry(registry, MockStrip::new());
    assert!(matches!(
        result,
        Err(ConfigError::IndexOutOfRange { label: "far", index: 40, .. })
    ));
}

#[test]
fn write_base_checks_length() {
    let device = keyboard();
    let before = device.output();

    assert_eq!(
        device.write_base(&[RED; FRAME_LEN - 1]),
        Err(DeviceError::LengthMismatch {
            expected: FRAME_LEN,
            actual: FRAME_LEN - 1
        })
    );
    assert_eq!(device.output(), before);
    assert_eq!(device.base(), [BASE_COLOR; FRAME_LEN]);
    device.inspect_sink(|strip| assert_eq!(strip.write_count(), 1));
}

#[test]
fn base_falls_through_where_no_overlay_is_active() {
    let device = keyboard();
    device.set_indicator("caps", RED).unwrap();
    device.set_layer("L", 0).unwrap();

    let mut base = [WHITE; FRAME_LEN];
    base[0] = YELLOW;
    device.write_base(&base).unwrap();

    let output = device.output();
    assert_eq!(output[0], YELLOW);
    assert_eq!(output[3], GREEN);
    assert_eq!(output[7], GREEN);
    for index in [1, 2, 4, 5, 6, 8, 9] {
        assert_eq!(output[index], WHITE);
    }
}

#[test]
fn transport_errors_reach_the_caller() {
    let device =
        OverlayDevice::<NoopRawMutex, _, FRAME_LEN, 4, 4>::new(&KEYBOARD, FlakyStrip::default())
            .unwrap();

    device.set_indicator("caps", RED).unwrap();

    // Flip the strip into failure mode through teardown and rebuild
    let mut strip = device.into_sink();
    strip.failing = true;
    let device = OverlayDevice::<NoopRawMutex, _, FRAME_LEN, 4, 4>::new(&KEYBOARD, strip).unwrap();

    assert_eq!(
        device.set_indicator("caps", RED),
        Err(DeviceError::Transport(BusFault))
    );
    assert_eq!(device.set_layer("L", 1), Err(DeviceError::Transport(BusFault)));
    assert_eq!(device.refresh(), Err(DeviceError::Transport(BusFault)));

    // state is still updated; the next successful submission shows it
    assert_eq!(device.output()[7], BLUE);
    device.inspect_sink(|strip| assert_eq!(strip.attempts, 4));
}

#[test]
fn layers_start_in_configured_state() {
    static ACTIVE: DeviceConfig = DeviceConfig::new(&INDICATORS, &LAYERS, InitialLayerState::Active);

    let device = TestDevice::new(&ACTIVE, MockStrip::new()).unwrap();
    device.refresh().unwrap();
    assert_eq!(
        device.layer("L").unwrap().state(),
        OverlayState::Enabled(LayerSlot::from_layer(0))
    );
    assert_eq!(device.output()[3], GREEN);

    let device = keyboard();
    assert_eq!(device.layer("L").unwrap().state(), OverlayState::Disabled);
    assert_eq!(device.output()[3], BASE_COLOR);
}

#[test]
fn nothing_is_submitted_before_the_first_operation() {
    let device = TestDevice::new(&KEYBOARD, MockStrip::new()).unwrap();
    device.inspect_sink(|strip| assert_eq!(strip.write_count(), 0));
    assert_eq!(device.output(), black_frame());
}

#[test]
fn refresh_resubmits_identical_frame() {
    let device = keyboard();
    device.set_layer("L", 3).unwrap();
    device.refresh().unwrap();

    device.inspect_sink(|strip| {
        let frames = strip.frames();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[1], frames[2]);
    });
}

#[test]
fn wildcard_targets_every_layer_overlay() {
    static TWO_LAYERS: [LayerDef; 2] = [
        LayerDef::new("left", &[0], [RED, GREEN, BLUE, WHITE]),
        LayerDef::new("right", &[9], [WHITE, BLUE, GREEN, RED]),
    ];
    static CONFIG: DeviceConfig = DeviceConfig::new(&[], &TWO_LAYERS, InitialLayerState::Inactive);

    let device = TestDevice::new(&CONFIG, MockStrip::new()).unwrap();

    device.set_layer(LayerTarget::All, 6).unwrap();
    let output = device.output();
    assert_eq!(output[0], BLUE);
    assert_eq!(output[9], GREEN);

    device.disable_layer("left").unwrap();
    assert!(!device.layer("left").unwrap().active);
    assert!(device.layer("right").unwrap().active);

    device.disable_layer(LayerTarget::All).unwrap();
    assert!(!device.layer("right").unwrap().active);
    assert_eq!(device.output(), black_frame());
}

#[test]
fn wildcard_on_device_without_layers_succeeds() {
    static CONFIG: DeviceConfig = DeviceConfig::new(&INDICATORS, &[], InitialLayerState::Active);

    let device = TestDevice::new(&CONFIG, MockStrip::new()).unwrap();
    assert_eq!(device.set_layer(LayerTarget::All, 2), Ok(()));
    device.inspect_sink(|strip| assert_eq!(strip.write_count(), 1));
}

#[test]
fn later_indicator_wins_shared_led() {
    static OVERLAPPING: [IndicatorDef; 2] = [
        IndicatorDef::new("caps", &[1, 2]),
        IndicatorDef::new("num", &[2, 3]),
    ];
    static CONFIG: DeviceConfig =
        DeviceConfig::new(&OVERLAPPING, &LAYERS, InitialLayerState::Inactive);

    let device = TestDevice::new(&CONFIG, MockStrip::new()).unwrap();
    device.write_base(&[BASE_COLOR; FRAME_LEN]).unwrap();

    // activation order does not matter, registry order does
    device.set_indicator("num", GREEN).unwrap();
    device.set_indicator("caps", RED).unwrap();
    assert_eq!(device.output(), frame_with(&[(1, RED), (2, GREEN), (3, GREEN)]));

    device.set_layer("L", 2).unwrap();
    assert_eq!(
        device.output(),
        frame_with(&[(1, RED), (2, GREEN), (3, YELLOW), (7, YELLOW)])
    );
}

#[test]
fn actions_dispatch_to_operations() {
    let device = keyboard();

    device
        .handle_action(OverlayAction::SetIndicator {
            label: "caps",
            color: RED,
        })
        .unwrap();
    device
        .handle_action(OverlayAction::SetLayer {
            target: LayerTarget::Label("L"),
            layer: 1,
        })
        .unwrap();
    assert_eq!(device.output(), frame_with(&[(3, BLUE), (7, BLUE)]));

    device
        .handle_action(OverlayAction::DisableLayer(LayerTarget::All))
        .unwrap();
    device
        .handle_action(OverlayAction::DisableIndicator("caps"))
        .unwrap();
    device
        .handle_action(OverlayAction::WriteBase([WHITE; FRAME_LEN]))
        .unwrap();
    device.handle_action(OverlayAction::Refresh).unwrap();
    assert_eq!(device.output(), [WHITE; FRAME_LEN]);

    assert_eq!(
        device.handle_action(OverlayAction::DisableIndicator("ghost")),
        Err(DeviceError::LabelNotFound)
    );
}

/// Strip that refreshes its own device from inside `write`
struct ReentrantStrip {
    device: Rc<OnceCell<Rc<TestDevice<ReentrantStrip>>>>,
}

impl LedSink for ReentrantStrip {
    type Error = core::convert::Infallible;

    fn write(&mut self, _pixels: &[Rgb8]) -> Result<(), Self::Error> {
        if let Some(device) = self.device.get() {
            let _ = device.refresh();
        }
        Ok(())
    }
}

#[test]
#[should_panic(expected = "already")]
fn sink_calling_back_into_its_device_panics() {
    let slot = Rc::new(OnceCell::new());
    let device = Rc::new(
        TestDevice::new(&KEYBOARD, ReentrantStrip { device: slot.clone() }).unwrap(),
    );
    let _ = slot.set(device.clone());

    let _ = device.refresh();
}

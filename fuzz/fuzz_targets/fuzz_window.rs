//! Fuzz testing for the stepping window.
//!
//! Drives a window with arbitrary width/step settings over arbitrary bytes
//! and checks the traversal terminates and keeps its bookkeeping consistent.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use jagmem::{
    ByteRegion, FieldSpec, LayoutDescriptor, ScalarType, SteppingWindow, WindowConfig,
    WindowContents,
};

#[derive(Debug, Arbitrary)]
struct WindowInput {
    width: u8,
    step: u8,
    width_in_bytes: bool,
    step_in_bytes: bool,
    raw_span: bool,
    start: u8,
    data: Vec<u8>,
}

fuzz_target!(|input: WindowInput| {
    let Ok(layout) = LayoutDescriptor::build(vec![
        FieldSpec::scalar("len", ScalarType::U8),
        FieldSpec::var("blob", "len"),
    ]) else {
        return;
    };

    let width = input.width as usize;
    let step = input.step as usize;
    let mut config = if input.width_in_bytes {
        WindowConfig::bytes(width)
    } else {
        WindowConfig::records(width)
    };
    config = if input.step_in_bytes {
        config.step_bytes(step)
    } else {
        config.step_records(step)
    };
    if input.raw_span {
        config = config.contents(WindowContents::RawSpan);
    }
    config = config.start(input.start as usize);

    let region = ByteRegion::new(&input.data);
    let Ok(windows) = SteppingWindow::new(region, &layout, config) else {
        assert!(width == 0 || step == 0);
        return;
    };

    let mut previous_start = None;
    let mut yielded = 0usize;
    for window in windows {
        let window = window.expect("u8 length layouts never misalign");
        assert!(window.end() <= region.len());
        if let Some(prev) = previous_start {
            assert!(window.start() > prev);
        }
        previous_start = Some(window.start());
        yielded += 1;
        assert!(yielded <= region.len());
    }
});

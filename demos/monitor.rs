use canmon::fmt;
use canmon::{CanFrame, FrameInterpreter, Protocol};

fn main() {
    let mut interpreter = FrameInterpreter::new();

    // A short capture touching every protocol family.
    let mut frames: Vec<CanFrame> = vec![
        CanFrame::new(0x705, false, &[0x05]),
        CanFrame::new(
            0x581,
            false,
            &[0x43, 0x18, 0x10, 0x01, 0x78, 0x56, 0x34, 0x12],
        ),
        CanFrame::new(
            0x18FEF100,
            true,
            &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77],
        ),
        CanFrame::new(0x18EAFF00, true, &[0xE5, 0xFE, 0x00]),
        CanFrame::new(0x18DA1242, true, &[0x02, 0x10, 0x03]),
        CanFrame::new(0x51, false, b"FLASH"),
        CanFrame::new(0x100, false, &[0x02, 0x10, 0x00]),
    ];
    for (i, frame) in frames.iter_mut().enumerate() {
        frame.timestamp_us = 250_000 * (i as u64 + 1);
    }

    for protocol in Protocol::ALL {
        interpreter.set_protocol(protocol);
        println!("=== {} ===", interpreter.protocol_name());
        for (i, frame) in frames.iter().enumerate() {
            println!("{}", interpreter.interpret_numbered(frame, i as u64 + 1));
        }
        println!();
    }

    interpreter.set_protocol(Protocol::CanOpen);
    println!("=== log lines ===");
    for frame in &frames {
        println!(
            "{} {}",
            fmt::timestamp_string(frame.timestamp_us, false),
            interpreter.log_line(frame)
        );
    }
}

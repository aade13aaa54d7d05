//! 最小运动示例（mock 驱动，无需硬件）
//!
//! ```bash
//! cargo run -p noki-sdk --example simple_move --features mock
//! ```

use noki_sdk::prelude::*;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    noki_sdk::init_tracing();

    let driver = MockServoDriver::new();
    let handle = driver.handle();
    let controller = ServoController::builder().build(driver)?;

    println!("initial angles: {:?}", controller.get_angles());

    // 抬头（通道 0 → 80°），1 秒完成；越界目标会被安全截断
    controller.move_to(&[(0, Some(80.0))], Duration::from_secs(1))?;
    std::thread::sleep(Duration::from_millis(1200));

    println!("after move:     {:?}", controller.get_angles());
    println!("hardware writes: {}", handle.write_count());

    controller.stop();
    Ok(())
}

//! 头部动作演示序列（mock 驱动，无需硬件）
//!
//! 回中 → 抬头+低头 → 回中，对应 CLI `noki-cli demo` 的脚本。
//!
//! ```bash
//! cargo run -p noki-sdk --example head_demo --features mock
//! ```

use noki_sdk::prelude::*;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    noki_sdk::init_tracing();

    let controller = ServoController::builder().build(MockServoDriver::new())?;

    // 1.5 秒回中
    controller.center_all(Duration::from_secs_f64(1.5))?;
    std::thread::sleep(Duration::from_millis(1600));
    println!("centered:  {:?}", controller.get_angles());

    // 抬头（bob → 80°）+ 低头（nod → 20°），1 秒；sway/ears 不受影响
    controller.move_to(
        &[(0, Some(80.0)), (3, Some(20.0)), (1, None), (2, None)],
        Duration::from_secs(1),
    )?;
    std::thread::sleep(Duration::from_millis(2200));
    println!("pose held: {:?}", controller.get_angles());

    // 再回中
    controller.center_all(Duration::from_secs_f64(1.5))?;
    std::thread::sleep(Duration::from_millis(1600));
    println!("centered:  {:?}", controller.get_angles());

    println!("metrics:   {:?}", controller.metrics());
    controller.stop();
    Ok(())
}

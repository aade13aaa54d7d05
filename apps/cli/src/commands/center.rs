//! 回中命令

use anyhow::Result;
use clap::Args;
use noki_sdk::ServoController;
use std::time::Duration;

/// 回中命令参数
#[derive(Args, Debug)]
pub struct CenterCommand {
    /// 运动时长（秒）
    #[arg(short, long, default_value_t = 1.0)]
    pub duration: f64,
}

impl CenterCommand {
    pub fn execute(self, controller: &ServoController) -> Result<()> {
        let duration = if self.duration > 0.0 {
            Duration::from_secs_f64(self.duration)
        } else {
            Duration::ZERO
        };

        controller.center_all(duration)?;
        std::thread::sleep(duration + controller.tick_interval() * 2);

        println!("angles: {:?}", controller.get_angles());
        controller.stop();
        Ok(())
    }
}

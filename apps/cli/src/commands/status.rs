//! 状态查询命令

use anyhow::Result;
use clap::Args;
use noki_sdk::ServoController;

/// 状态查询参数
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// 同时打印运行指标
    #[arg(long)]
    pub metrics: bool,
}

impl StatusCommand {
    pub fn execute(self, controller: &ServoController) -> Result<()> {
        let angles = controller.get_angles();
        let limits = controller.limits();

        println!("tick interval: {:?}", controller.tick_interval());
        println!("{:<8} {:<12} {:>8} {:>8} {:>8} {:>8}", "channel", "label", "min", "max", "center", "angle");
        for (channel, limit) in &limits {
            println!(
                "{:<8} {:<12} {:>8.1} {:>8.1} {:>8.1} {:>8.2}",
                channel, limit.label, limit.min_angle, limit.max_angle, limit.center, angles[channel]
            );
        }

        if self.metrics {
            println!("metrics: {:?}", controller.metrics());
        }

        controller.stop();
        Ok(())
    }
}

//! 演示动作序列
//!
//! 回中 → 抬头+低头 → 回中。每个阶段之间用 `recv_timeout` 等待，
//! Ctrl-C 通过通道打断等待，随后控制器停止、舵机停在当前姿态。

use anyhow::Result;
use clap::Args;
use noki_sdk::ServoController;
use std::time::Duration;
use tracing::info;

/// 演示命令参数
#[derive(Args, Debug)]
pub struct DemoCommand {
    /// 循环次数
    #[arg(short, long, default_value_t = 1)]
    pub repeat: u32,
}

impl DemoCommand {
    pub fn execute(self, controller: &ServoController) -> Result<()> {
        // Ctrl-C → 通道消息；recv_timeout 同时承担"阶段等待"和"中止监听"
        let (abort_tx, abort_rx) = crossbeam_channel::bounded::<()>(1);
        ctrlc::set_handler(move || {
            let _ = abort_tx.try_send(());
        })?;

        let wait = |duration: Duration| -> bool {
            // Ok = 收到中止信号；Err(Timeout) = 正常等完
            abort_rx.recv_timeout(duration).is_ok()
        };

        'demo: for cycle in 0..self.repeat {
            info!("demo cycle {}/{}", cycle + 1, self.repeat);

            controller.center_all(Duration::from_secs_f64(1.5))?;
            if wait(Duration::from_millis(1600)) {
                break 'demo;
            }

            // 抬头（bob → 80°）+ 低头（nod → 20°）；sway/ears 保持不动
            controller.move_to(
                &[(0, Some(80.0)), (3, Some(20.0)), (1, None), (2, None)],
                Duration::from_secs(1),
            )?;
            if wait(Duration::from_millis(2200)) {
                break 'demo;
            }

            controller.center_all(Duration::from_secs_f64(1.5))?;
            if wait(Duration::from_millis(1600)) {
                break 'demo;
            }
        }

        println!("final angles: {:?}", controller.get_angles());
        controller.stop();
        Ok(())
    }
}

//! 移动命令
//!
//! 把若干通道移动到目标角度；越界目标由控制器截断到安全边界。

use anyhow::{Context, Result};
use clap::Args;
use noki_sdk::ServoController;
use std::time::Duration;

/// 移动命令参数
#[derive(Args, Debug)]
pub struct MoveCommand {
    /// 目标列表，逗号分隔的 `通道=角度` 对
    /// 例如：`0=80,3=20`；角度写 `-` 表示保持该通道的在途运动
    #[arg(short, long)]
    pub targets: String,

    /// 运动时长（秒），非正值表示下一拍直接到位
    #[arg(short, long, default_value_t = 1.0)]
    pub duration: f64,
}

impl MoveCommand {
    /// 解析目标列表
    pub fn parse_targets(&self) -> Result<Vec<(u8, Option<f64>)>> {
        let mut targets = Vec::new();
        for pair in self.targets.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (channel, angle) = pair
                .split_once('=')
                .with_context(|| format!("expected `channel=angle`, got {:?}", pair))?;
            let channel: u8 = channel
                .trim()
                .parse()
                .with_context(|| format!("invalid channel {:?}", channel))?;
            let angle = match angle.trim() {
                "-" | "none" => None,
                value => Some(
                    value
                        .parse::<f64>()
                        .with_context(|| format!("invalid angle {:?}", value))?,
                ),
            };
            targets.push((channel, angle));
        }
        if targets.is_empty() {
            anyhow::bail!("no targets given; use e.g. --targets 0=80,3=20");
        }
        Ok(targets)
    }

    pub fn execute(self, controller: &ServoController) -> Result<()> {
        let targets = self.parse_targets()?;
        let duration = if self.duration > 0.0 {
            Duration::from_secs_f64(self.duration)
        } else {
            Duration::ZERO
        };

        controller.move_to(&targets, duration)?;

        // One-shot 模式：等运动完成再退出（多留两拍余量）
        std::thread::sleep(duration + controller.tick_interval() * 2);

        println!("angles: {:?}", controller.get_angles());
        controller.stop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(targets: &str) -> MoveCommand {
        MoveCommand {
            targets: targets.to_string(),
            duration: 1.0,
        }
    }

    #[test]
    fn test_parse_single_target() {
        let targets = command("0=80").parse_targets().unwrap();
        assert_eq!(targets, vec![(0, Some(80.0))]);
    }

    #[test]
    fn test_parse_multiple_targets_with_hold() {
        let targets = command("0=80, 3=20, 1=-").parse_targets().unwrap();
        assert_eq!(targets, vec![(0, Some(80.0)), (3, Some(20.0)), (1, None)]);
    }

    #[test]
    fn test_parse_none_keyword() {
        let targets = command("2=none").parse_targets().unwrap();
        assert_eq!(targets, vec![(2, None)]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(command("0:80").parse_targets().is_err());
        assert!(command("x=80").parse_targets().is_err());
        assert!(command("0=up").parse_targets().is_err());
        assert!(command("").parse_targets().is_err());
    }
}

//! # Noki Motion - 后台舵机轨迹控制
//!
//! 本模块提供 Noki 机器人头部的运动控制核心，包括：
//! - 每通道安全限位（min / max / center，命令永远不会越界）
//! - 步进式线性插值（有界时长，整数步数保证精确到达）
//! - 后台节拍线程（固定频率推进所有活动通道并写入硬件）
//! - 请求路径与节拍路径之间的单一互斥边界
//!
//! # 使用场景
//!
//! 上层"场景"逻辑只需要声明目标姿态和时长，不需要关心硬件节拍、
//! 过冲或机械安全范围。任意线程都可以安全地并发调用公开 API。
//!
//! # Example
//!
//! ```no_run
//! use noki_motion::ServoController;
//! use noki_pwm::Pca9685Driver;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let driver = Pca9685Driver::open_default()?;
//! let controller = ServoController::builder().build(driver)?;
//!
//! // 抬头（通道 0）+ 低头（通道 3），1 秒完成
//! controller.move_to(&[(0, Some(80.0)), (3, Some(20.0))], Duration::from_secs(1))?;
//!
//! // 两秒内全部回中
//! controller.center_all(Duration::from_secs(2))?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod controller;
mod error;
pub mod limits;
pub mod metrics;
mod trajectory;

pub use builder::ControllerBuilder;
pub use controller::ServoController;
pub use error::MotionError;
pub use limits::{DEFAULT_TICK_HZ, Limit, default_limits};
pub use metrics::{MetricsSnapshot, MotionMetrics};
pub use trajectory::Trajectory;

// 重新导出硬件层能力，多数用户不需要直接依赖 noki-pwm
pub use noki_pwm::{PwmError, ServoDriver};

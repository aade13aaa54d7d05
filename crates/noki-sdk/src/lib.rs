//! # Noki SDK
//!
//! Noki 机器人头部舵机运动控制的统一入口，重新导出：
//! - [`motion`]：轨迹控制器、限位、指标（核心 API）
//! - [`pwm`]：硬件抽象层（PCA9685 适配器、mock 驱动）
//!
//! # 快速开始
//!
//! ```no_run
//! use noki_sdk::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! noki_sdk::init_tracing();
//!
//! let driver = Pca9685Driver::open_default()?;
//! let controller = ServoController::builder().build(driver)?;
//!
//! controller.move_to(&[(0, Some(80.0)), (3, Some(20.0))], Duration::from_secs(1))?;
//! controller.center_all(Duration::from_secs(2))?;
//! controller.stop();
//! # Ok(())
//! # }
//! ```

pub use noki_motion as motion;
pub use noki_pwm as pwm;

// 常用类型平铺导出
pub use noki_motion::{
    ControllerBuilder, Limit, MetricsSnapshot, MotionError, ServoController, Trajectory,
    default_limits,
};
pub use noki_pwm::{PwmError, ServoDriver};

/// 常用类型预导入
pub mod prelude {
    pub use crate::{ControllerBuilder, Limit, MotionError, ServoController, ServoDriver};

    #[cfg(target_os = "linux")]
    pub use noki_pwm::Pca9685Driver;

    #[cfg(feature = "mock")]
    pub use noki_pwm::{MockHandle, MockServoDriver};
}

/// 初始化 tracing 订阅者
///
/// - 过滤级别来自 `RUST_LOG`，缺省 `info`
/// - 通过 `tracing-log` 桥接 `log` 宏产生的记录
///
/// 重复调用是无害的（后续调用不覆盖已安装的全局订阅者）。
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_tracing_is_idempotent() {
        super::init_tracing();
        super::init_tracing();
    }

    #[test]
    fn test_reexports_resolve() {
        // 平铺导出和模块导出指向同一类型
        let limit: crate::Limit = crate::motion::Limit::new(0.0, 180.0, 90.0, "sway");
        assert_eq!(limit.clamp(200.0), 180.0);
    }
}

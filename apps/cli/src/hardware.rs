//! 控制器构建（硬件 / mock）

use crate::config::CliConfig;
use anyhow::Result;
use noki_sdk::{ControllerBuilder, ServoController};
use tracing::info;

/// 按配置构建控制器
///
/// `mock == true` 时使用记录型 mock 驱动（任何平台可用）；
/// 否则在 Linux 上打开 PCA9685，其他平台直接报错。
pub fn build_controller(mock: bool, config: &CliConfig) -> Result<ServoController> {
    let builder = ControllerBuilder::new()
        .channels(config.channels.iter().copied())
        .tick_hz(config.tick_hz)
        .limits(config.limit_overrides()?);

    if mock {
        info!("using mock servo driver");
        let driver = noki_sdk::pwm::MockServoDriver::new();
        return Ok(builder.build(driver)?);
    }

    #[cfg(target_os = "linux")]
    {
        let driver = noki_sdk::pwm::Pca9685Driver::open(&config.i2c_bus, config.i2c_address)?;
        Ok(builder.build(driver)?)
    }

    #[cfg(not(target_os = "linux"))]
    {
        anyhow::bail!("PCA9685 hardware is only supported on Linux; use --mock on this platform")
    }
}

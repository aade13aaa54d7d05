//! PCA9685 适配器（Linux only）
//!
//! 通过 `/dev/i2c-*` 驱动 Adafruit 16 通道 PWM Servo HAT。
//!
//! # 脉宽映射
//!
//! 标准舵机约定：50Hz 刷新（20ms 周期），0°-180° 对应 500µs-2500µs
//! 高电平。PCA9685 每个周期分 4096 个计数，因此：
//!
//! ```text
//! counts = pulse_us * 4096 / 20000
//! ```

use crate::{PwmDeviceError, PwmDeviceErrorKind, PwmError, ServoDriver};
use linux_embedded_hal::I2cdev;
use pwm_pca9685::{Address, Channel, Pca9685};
use tracing::{debug, trace};

/// 默认 I2C 总线设备
pub const DEFAULT_I2C_BUS: &str = "/dev/i2c-1";

/// 默认 I2C 从机地址（Adafruit Servo HAT 出厂地址）
pub const DEFAULT_I2C_ADDRESS: u8 = 0x40;

/// 50Hz 舵机刷新率对应的预分频值
///
/// `25MHz / (4096 * 50Hz) - 1 ≈ 121`
const SERVO_PRESCALE: u8 = 121;

/// PWM 周期（微秒），50Hz
const PERIOD_US: f64 = 20_000.0;

/// 0° 对应的脉宽（微秒）
const PULSE_MIN_US: f64 = 500.0;

/// 180° 对应的脉宽（微秒）
const PULSE_MAX_US: f64 = 2_500.0;

/// PCA9685 舵机驱动
///
/// # Example
///
/// ```no_run
/// use noki_pwm::pca9685::Pca9685Driver;
///
/// let driver = Pca9685Driver::open("/dev/i2c-1", 0x40).unwrap();
/// ```
pub struct Pca9685Driver {
    pwm: Pca9685<I2cdev>,
}

impl Pca9685Driver {
    /// 打开并初始化 PCA9685
    ///
    /// 配置 50Hz 预分频并使能振荡器。
    ///
    /// # Errors
    /// - `PwmError::Device`: I2C 总线打开或芯片初始化失败
    pub fn open(bus: &str, address: u8) -> Result<Self, PwmError> {
        let dev = I2cdev::new(bus).map_err(|e| {
            PwmDeviceError::new(
                PwmDeviceErrorKind::NotFound,
                format!("Failed to open I2C bus '{}': {}", bus, e),
            )
        })?;

        let mut pwm = Pca9685::new(dev, Address::from(address)).map_err(backend_error)?;
        pwm.set_prescale(SERVO_PRESCALE).map_err(backend_error)?;
        pwm.enable().map_err(backend_error)?;

        debug!(
            "PCA9685 initialized: bus={}, address=0x{:02X}, prescale={}",
            bus, address, SERVO_PRESCALE
        );

        Ok(Self { pwm })
    }

    /// 使用默认总线和地址打开
    pub fn open_default() -> Result<Self, PwmError> {
        Self::open(DEFAULT_I2C_BUS, DEFAULT_I2C_ADDRESS)
    }
}

impl ServoDriver for Pca9685Driver {
    fn set_position(&mut self, channel: u8, angle_deg: f64) -> Result<(), PwmError> {
        let ch = pwm_channel(channel).ok_or(PwmError::ChannelOutOfRange(channel))?;
        let off = pulse_counts(angle_deg);

        trace!("PCA9685 write: channel={}, angle={:.2}°, off={}", channel, angle_deg, off);
        self.pwm.set_channel_on_off(ch, 0, off).map_err(backend_error)?;
        Ok(())
    }
}

/// 把 PCA9685 后端错误统一映射为结构化设备错误
fn backend_error<E: core::fmt::Debug>(e: pwm_pca9685::Error<E>) -> PwmError {
    PwmError::Device(PwmDeviceError::new(
        PwmDeviceErrorKind::Backend,
        format!("PCA9685: {:?}", e),
    ))
}

/// 通道号 → PCA9685 通道枚举
fn pwm_channel(channel: u8) -> Option<Channel> {
    let ch = match channel {
        0 => Channel::C0,
        1 => Channel::C1,
        2 => Channel::C2,
        3 => Channel::C3,
        4 => Channel::C4,
        5 => Channel::C5,
        6 => Channel::C6,
        7 => Channel::C7,
        8 => Channel::C8,
        9 => Channel::C9,
        10 => Channel::C10,
        11 => Channel::C11,
        12 => Channel::C12,
        13 => Channel::C13,
        14 => Channel::C14,
        15 => Channel::C15,
        _ => return None,
    };
    Some(ch)
}

/// 角度（度）→ OFF 计数
///
/// 角度超出 [0, 180] 时按端点截断（上层限位应该已经保证范围，
/// 这里只是保护脉宽不会超出舵机的机械标定）。
fn pulse_counts(angle_deg: f64) -> u16 {
    let angle = angle_deg.clamp(0.0, 180.0);
    let pulse_us = PULSE_MIN_US + (PULSE_MAX_US - PULSE_MIN_US) * angle / 180.0;
    (pulse_us * 4096.0 / PERIOD_US).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_counts_endpoints() {
        // 0° → 500µs → 102 counts
        assert_eq!(pulse_counts(0.0), 102);
        // 180° → 2500µs → 512 counts
        assert_eq!(pulse_counts(180.0), 512);
    }

    #[test]
    fn test_pulse_counts_midpoint() {
        // 90° → 1500µs → 307 counts
        assert_eq!(pulse_counts(90.0), 307);
    }

    #[test]
    fn test_pulse_counts_clamps_out_of_range() {
        assert_eq!(pulse_counts(-30.0), pulse_counts(0.0));
        assert_eq!(pulse_counts(270.0), pulse_counts(180.0));
    }

    #[test]
    fn test_pulse_counts_monotonic() {
        let mut last = 0;
        for deg in 0..=180 {
            let counts = pulse_counts(deg as f64);
            assert!(counts >= last, "counts must be monotonic in angle");
            last = counts;
        }
    }

    #[test]
    fn test_pwm_channel_range() {
        assert!(pwm_channel(0).is_some());
        assert!(pwm_channel(15).is_some());
        assert!(pwm_channel(16).is_none());
        assert!(pwm_channel(255).is_none());
    }
}

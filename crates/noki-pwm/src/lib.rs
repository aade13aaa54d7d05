//! # Noki PWM Adapter Layer
//!
//! PWM 舵机硬件抽象层，提供统一的舵机驱动接口。
//!
//! 本层只关心"把某个通道推到某个角度"这一件事；插值、限位和节拍
//! 都由上层 [`noki-motion`](https://crates.io/crates/noki-motion) 负责。

use thiserror::Error;

#[cfg(target_os = "linux")]
pub mod pca9685;

#[cfg(target_os = "linux")]
pub use pca9685::Pca9685Driver;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::{MockHandle, MockServoDriver};

/// PCA9685 板载通道数
pub const CHANNEL_COUNT: u8 = 16;

/// PWM 适配层统一错误类型
#[derive(Error, Debug)]
pub enum PwmError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(#[from] PwmDeviceError),
    #[error("Channel {0} out of range (0-15)")]
    ChannelOutOfRange(u8),
    #[error("Device not started")]
    NotStarted,
}

/// 设备/后端错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmDeviceErrorKind {
    Unknown,
    NotFound,
    NoDevice,
    AccessDenied,
    Busy,
    UnsupportedConfig,
    Backend,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct PwmDeviceError {
    pub kind: PwmDeviceErrorKind,
    pub message: String,
}

impl PwmDeviceError {
    pub fn new(kind: PwmDeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            PwmDeviceErrorKind::NoDevice
                | PwmDeviceErrorKind::AccessDenied
                | PwmDeviceErrorKind::NotFound
        )
    }
}

impl From<String> for PwmDeviceError {
    fn from(message: String) -> Self {
        Self::new(PwmDeviceErrorKind::Unknown, message)
    }
}

impl From<&str> for PwmDeviceError {
    fn from(message: &str) -> Self {
        Self::new(PwmDeviceErrorKind::Unknown, message)
    }
}

/// 舵机驱动能力
///
/// 被运动控制层持有并在后台节拍线程中调用，因此要求写入在节拍频率
/// （默认 50Hz）下是安全且幂等的。
pub trait ServoDriver {
    /// 把 `channel` 推到 `angle_deg`（度）
    fn set_position(&mut self, channel: u8, angle_deg: f64) -> Result<(), PwmError>;

    /// 读取 `channel` 的当前角度（度）
    ///
    /// 大多数 PWM 板不能回读脉宽，默认返回 `Ok(None)`，
    /// 由上层用通道的中心角初始化。
    fn position(&mut self, _channel: u8) -> Result<Option<f64>, PwmError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pwm_device_error_display() {
        let err = PwmDeviceError::new(PwmDeviceErrorKind::AccessDenied, "permission denied");
        let msg = format!("{}", err);
        assert!(msg.contains("AccessDenied"));
        assert!(msg.contains("permission denied"));
    }

    #[test]
    fn test_pwm_device_error_fatal() {
        assert!(PwmDeviceError::new(PwmDeviceErrorKind::NoDevice, "gone").is_fatal());
        assert!(PwmDeviceError::new(PwmDeviceErrorKind::AccessDenied, "denied").is_fatal());
        assert!(!PwmDeviceError::new(PwmDeviceErrorKind::Busy, "busy").is_fatal());
        assert!(!PwmDeviceError::new(PwmDeviceErrorKind::Unknown, "?").is_fatal());
    }

    #[test]
    fn test_pwm_error_from_device_error() {
        let device_err = PwmDeviceError::new(PwmDeviceErrorKind::Backend, "i2c write failed");
        let err: PwmError = device_err.into();
        match err {
            PwmError::Device(e) => assert_eq!(e.kind, PwmDeviceErrorKind::Backend),
            _ => panic!("Expected Device variant"),
        }
    }

    #[test]
    fn test_channel_out_of_range_display() {
        let err = PwmError::ChannelOutOfRange(42);
        assert_eq!(format!("{}", err), "Channel 42 out of range (0-15)");
    }

    #[test]
    fn test_servo_driver_default_position() {
        struct WriteOnly;
        impl ServoDriver for WriteOnly {
            fn set_position(&mut self, _channel: u8, _angle_deg: f64) -> Result<(), PwmError> {
                Ok(())
            }
        }

        let mut driver = WriteOnly;
        assert!(driver.position(0).unwrap().is_none());
    }
}

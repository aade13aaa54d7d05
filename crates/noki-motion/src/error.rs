//! 运动控制层错误类型定义

use noki_pwm::PwmError;
use thiserror::Error;

/// 运动控制层错误类型
///
/// 只有配置类错误会同步返回给调用方；节拍线程中的硬件写入失败
/// 由控制器就地吸收（记录日志和指标，跳过该通道本拍的写入），
/// 永远不会跨线程传播为 panic。
#[derive(Error, Debug)]
pub enum MotionError {
    /// 调用方点名了一个未配置的通道
    ///
    /// 在任何状态被修改之前拒绝整个请求（同一次调用不允许部分生效）。
    #[error("channel {0} is not configured")]
    UnknownChannel(u8),

    /// 激活的通道没有对应的限位（默认限位表覆盖通道 0-3）
    #[error("no limit configured for channel {0}")]
    MissingLimit(u8),

    /// 限位不满足 min ≤ center ≤ max
    #[error("invalid limit for channel {channel}: min={min}, center={center}, max={max}")]
    InvalidLimit {
        channel: u8,
        min: f64,
        center: f64,
        max: f64,
    },

    /// 节拍频率必须为正
    #[error("tick rate must be positive (got {0} Hz)")]
    InvalidTickRate(u32),

    /// 没有配置任何激活通道
    #[error("no active channels configured")]
    NoChannels,

    /// 在 `stop()` 完成之后继续调用了变更类操作
    #[error("controller already stopped")]
    ControllerStopped,

    /// PWM 驱动错误（仅构造阶段向上传播）
    #[error("PWM driver error: {0}")]
    Pwm(#[from] PwmError),
}

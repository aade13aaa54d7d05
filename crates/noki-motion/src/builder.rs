//! Builder 模式实现
//!
//! 提供链式构造 [`ServoController`] 的便捷方式。所有配置错误
//! （未知限位、非法限位、非法节拍频率）都在 `build` 阶段暴露，
//! 节拍线程只会带着已校验的状态启动。

use crate::controller::{ChannelState, ServoController};
use crate::error::MotionError;
use crate::limits::{DEFAULT_TICK_HZ, Limit, default_limits};
use crate::trajectory::Trajectory;
use noki_pwm::ServoDriver;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

/// ServoController Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use noki_motion::{ControllerBuilder, Limit};
/// use noki_pwm::Pca9685Driver;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let driver = Pca9685Driver::open_default()?;
///
/// // 默认配置：通道 0-3，出厂限位表，50Hz
/// let controller = ControllerBuilder::new().build(driver)?;
/// # Ok(())
/// # }
/// ```
pub struct ControllerBuilder {
    /// 激活的通道集合
    channels: Vec<u8>,
    /// 在出厂限位表之上的覆盖项
    limit_overrides: BTreeMap<u8, Limit>,
    /// 节拍频率（Hz）
    tick_hz: u32,
}

impl ControllerBuilder {
    pub fn new() -> Self {
        Self {
            channels: vec![0, 1, 2, 3],
            limit_overrides: BTreeMap::new(),
            tick_hz: DEFAULT_TICK_HZ,
        }
    }

    /// 设置激活通道（可选，默认 0-3）
    pub fn channels(mut self, channels: impl IntoIterator<Item = u8>) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    /// 覆盖单个通道的限位（可选，可多次调用）
    ///
    /// 出厂表之外的通道（≥4）必须通过本方法提供限位，否则
    /// `build` 返回 [`MotionError::MissingLimit`]。
    pub fn limit(mut self, channel: u8, limit: Limit) -> Self {
        self.limit_overrides.insert(channel, limit);
        self
    }

    /// 批量覆盖限位（可选）
    pub fn limits(mut self, overrides: impl IntoIterator<Item = (u8, Limit)>) -> Self {
        self.limit_overrides.extend(overrides);
        self
    }

    /// 设置节拍频率（可选，默认 50Hz）
    pub fn tick_hz(mut self, tick_hz: u32) -> Self {
        self.tick_hz = tick_hz;
        self
    }

    /// 构建并启动控制器
    ///
    /// 校验配置、探测每个通道的初始角度（驱动不能回读时退回
    /// 中心角），然后启动后台节拍线程。
    ///
    /// # Errors
    ///
    /// - [`MotionError::InvalidTickRate`]：节拍频率为 0
    /// - [`MotionError::NoChannels`]：通道集合为空
    /// - [`MotionError::MissingLimit`]：激活通道没有限位
    /// - [`MotionError::InvalidLimit`]：限位违反 min ≤ center ≤ max
    /// - [`MotionError::Pwm`]：初始角度探测失败
    pub fn build(
        self,
        mut driver: impl ServoDriver + Send + 'static,
    ) -> Result<ServoController, MotionError> {
        if self.tick_hz == 0 {
            return Err(MotionError::InvalidTickRate(self.tick_hz));
        }
        if self.channels.is_empty() {
            return Err(MotionError::NoChannels);
        }

        let mut limits = default_limits();
        limits.extend(self.limit_overrides);

        let mut channels = BTreeMap::new();
        for channel in &self.channels {
            let limit = limits.get(channel).cloned().ok_or(MotionError::MissingLimit(*channel))?;
            if !limit.is_valid() {
                return Err(MotionError::InvalidLimit {
                    channel: *channel,
                    min: limit.min_angle,
                    center: limit.center,
                    max: limit.max_angle,
                });
            }

            // 初始角度：驱动能回读就用回读值（截断到限位内），
            // 否则退回中心角
            let reported = driver.position(*channel)?;
            let initial = limit.clamp(reported.unwrap_or(limit.center));
            debug!(
                "channel {} ({}) initialized at {:.2}° (reported: {:?})",
                channel, limit.label, initial, reported
            );

            channels.insert(
                *channel,
                ChannelState {
                    limit,
                    trajectory: Trajectory::at_rest(initial),
                },
            );
        }

        let tick_interval = Duration::from_secs_f64(1.0 / self.tick_hz as f64);
        info!(
            "servo controller starting: channels={:?}, tick={}Hz",
            channels.keys().collect::<Vec<_>>(),
            self.tick_hz
        );

        Ok(ServoController::spawn(channels, tick_interval, driver))
    }
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

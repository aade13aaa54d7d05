//! Mock 舵机驱动（无硬件依赖）
//!
//! 记录每次写入，供测试断言和无硬件演示使用。
//! 通过 [`MockHandle`] 在驱动被移交给控制线程之后仍然可以读取记录。

use crate::{PwmDeviceError, PwmDeviceErrorKind, PwmError, ServoDriver};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MockState {
    /// 全部写入记录，按发生顺序
    writes: Vec<(u8, f64)>,
    /// 注入写入失败的通道集合
    failing: Vec<u8>,
}

/// Mock 舵机驱动
///
/// # Example
///
/// ```
/// use noki_pwm::{MockServoDriver, ServoDriver};
///
/// let mut driver = MockServoDriver::new();
/// let handle = driver.handle();
///
/// driver.set_position(0, 55.0).unwrap();
/// assert_eq!(handle.writes(), vec![(0, 55.0)]);
/// ```
#[derive(Debug, Default)]
pub struct MockServoDriver {
    state: Arc<Mutex<MockState>>,
    /// 可回读的初始角度（模拟能读取脉宽的板子）
    initial: BTreeMap<u8, f64>,
}

impl MockServoDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置某通道的可回读初始角度
    pub fn with_initial(mut self, channel: u8, angle_deg: f64) -> Self {
        self.initial.insert(channel, angle_deg);
        self
    }

    /// 获取观察句柄（驱动移交给控制线程后仍可使用）
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: self.state.clone(),
        }
    }
}

impl ServoDriver for MockServoDriver {
    fn set_position(&mut self, channel: u8, angle_deg: f64) -> Result<(), PwmError> {
        let mut state = self.state.lock();
        if state.failing.contains(&channel) {
            return Err(PwmError::Device(PwmDeviceError::new(
                PwmDeviceErrorKind::Backend,
                format!("injected write failure on channel {}", channel),
            )));
        }
        state.writes.push((channel, angle_deg));
        Ok(())
    }

    fn position(&mut self, channel: u8) -> Result<Option<f64>, PwmError> {
        Ok(self.initial.get(&channel).copied())
    }
}

/// Mock 驱动观察句柄
#[derive(Debug, Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockHandle {
    /// 所有写入记录的副本
    pub fn writes(&self) -> Vec<(u8, f64)> {
        self.state.lock().writes.clone()
    }

    /// 写入总次数
    pub fn write_count(&self) -> usize {
        self.state.lock().writes.len()
    }

    /// 某通道最后一次写入的角度
    pub fn last_write(&self, channel: u8) -> Option<f64> {
        self.state
            .lock()
            .writes
            .iter()
            .rev()
            .find(|(ch, _)| *ch == channel)
            .map(|(_, angle)| *angle)
    }

    /// 注入/撤销某通道的写入失败
    pub fn set_failing(&self, channel: u8, failing: bool) {
        let mut state = self.state.lock();
        if failing {
            if !state.failing.contains(&channel) {
                state.failing.push(channel);
            }
        } else {
            state.failing.retain(|ch| *ch != channel);
        }
    }
}

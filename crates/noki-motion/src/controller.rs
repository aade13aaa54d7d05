//! 舵机控制器（对外 API + 节拍线程）
//!
//! [`ServoController`] 持有通道→轨迹映射，在一个专职后台线程上以
//! 固定周期推进所有在途运动并把新角度写入驱动。公开操作
//! （`move_to` / `center_all` / `get_angles`）可以从任意线程并发调用。
//!
//! # 锁规则
//!
//! 通道映射的每一次读写（请求路径和节拍路径）都发生在同一把
//! `parking_lot::Mutex` 之下，临界区只覆盖状态更新本身；硬件写入
//! 在记录完新角度、释放锁之后进行，慢速 I2C 不会阻塞 API 调用方。
//! 先记录后写入的顺序保证 `get_angles` 返回的角度要么已经发给
//! 硬件，要么在本拍内即将发出。
//!
//! # 生命周期
//!
//! `stop()` 置位停止标志并 join 节拍线程（观察延迟至多一个节拍
//! 周期），返回后不再发生任何硬件写入；重复调用是无害的空操作。
//! 忘记调用时 `Drop` 会做同样的事。

use crate::error::MotionError;
use crate::limits::Limit;
use crate::metrics::{MetricsSnapshot, MotionMetrics};
use crate::trajectory::Trajectory;
use noki_pwm::ServoDriver;
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{error, info, trace, warn};

/// 每拍写入批量的栈上容量（头部只有 4 个关节，16 通道板满载也不大）
type WriteBatch = SmallVec<[(u8, f64); 8]>;

pub(crate) struct ChannelState {
    pub(crate) limit: Limit,
    pub(crate) trajectory: Trajectory,
}

pub(crate) struct SharedState {
    pub(crate) channels: Mutex<BTreeMap<u8, ChannelState>>,
}

/// 后台舵机运动控制器
///
/// 通过 [`ServoController::builder`] 构造；构造即启动节拍线程。
///
/// # Example
///
/// ```no_run
/// use noki_motion::ServoController;
/// use noki_pwm::Pca9685Driver;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let driver = Pca9685Driver::open_default()?;
/// let controller = ServoController::builder()
///     .channels([0, 1, 2, 3])
///     .tick_hz(50)
///     .build(driver)?;
///
/// controller.move_to(&[(0, Some(80.0))], Duration::from_secs(1))?;
/// # Ok(())
/// # }
/// ```
pub struct ServoController {
    shared: Arc<SharedState>,
    running: Arc<AtomicBool>,
    /// 节拍线程句柄；`stop()` 取走并 join，因此天然幂等
    tick_thread: Mutex<Option<JoinHandle<()>>>,
    tick_interval: Duration,
    metrics: Arc<MotionMetrics>,
}

impl std::fmt::Debug for ServoController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServoController")
            .field("tick_interval", &self.tick_interval)
            .field("running", &self.running.load(std::sync::atomic::Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl ServoController {
    /// 创建 [`ControllerBuilder`]
    pub fn builder() -> crate::ControllerBuilder {
        crate::ControllerBuilder::new()
    }

    /// 内部构造：由 Builder 调用，状态已经校验完毕
    pub(crate) fn spawn(
        channels: BTreeMap<u8, ChannelState>,
        tick_interval: Duration,
        driver: impl ServoDriver + Send + 'static,
    ) -> Self {
        let shared = Arc::new(SharedState {
            channels: Mutex::new(channels),
        });
        let running = Arc::new(AtomicBool::new(true));
        let metrics = Arc::new(MotionMetrics::new());

        let shared_clone = shared.clone();
        let running_clone = running.clone();
        let metrics_clone = metrics.clone();
        let handle = std::thread::spawn(move || {
            tick_loop(driver, shared_clone, tick_interval, running_clone, metrics_clone);
        });

        Self {
            shared,
            running,
            tick_thread: Mutex::new(Some(handle)),
            tick_interval,
            metrics,
        }
    }

    /// 请求一组通道在 `duration` 内移动到新角度
    ///
    /// - `targets` 中为 `Some(angle)` 的通道安装新轨迹：目标角度先
    ///   经过该通道的限位截断，再按 `steps = max(1, round(duration / tick))`
    ///   均分；对节拍线程而言替换是原子的，不可能观察到旧 delta
    ///   配新 target 之类的半成品。
    /// - 为 `None` 或未出现在 `targets` 中的通道不受影响，在途运动
    ///   继续进行（这是刻意的部分更新语义）。
    /// - `Duration::ZERO` 视作恰好一拍：下一个节拍边界上的截断式
    ///   瞬移，永远不会出现零步或负步。
    /// - 不在本函数内写硬件；所有物理写入都发生在节拍线程上。
    ///
    /// # Errors
    ///
    /// - [`MotionError::UnknownChannel`]：`targets` 点名了未配置的
    ///   通道。在任何通道被修改之前整体拒绝。
    /// - [`MotionError::ControllerStopped`]：`stop()` 之后调用。
    pub fn move_to(
        &self,
        targets: &[(u8, Option<f64>)],
        duration: Duration,
    ) -> Result<(), MotionError> {
        if !self.running.load(Ordering::Acquire) {
            return Err(MotionError::ControllerStopped);
        }

        let steps = self.steps_for(duration);
        let mut channels = self.shared.channels.lock();

        // 先整体校验：同一次调用不允许部分生效
        for (channel, _) in targets {
            if !channels.contains_key(channel) {
                return Err(MotionError::UnknownChannel(*channel));
            }
        }

        for (channel, angle) in targets {
            let Some(angle) = angle else {
                // None：保留该通道的在途轨迹
                continue;
            };
            if let Some(state) = channels.get_mut(channel) {
                let clamped = state.limit.clamp(*angle);
                if clamped != *angle {
                    self.metrics.targets_clamped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        "target {:.2}° on channel {} ({}) clamped to {:.2}°",
                        angle, channel, state.limit.label, clamped
                    );
                }
                state.trajectory.retarget(clamped, steps);
                trace!(
                    "channel {} retargeted: {:.2}° -> {:.2}° in {} steps",
                    channel,
                    state.trajectory.current(),
                    clamped,
                    steps
                );
            }
        }
        drop(channels);

        self.metrics.moves_total.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// 让每个通道在 `duration` 内回到各自的中心角
    pub fn center_all(&self, duration: Duration) -> Result<(), MotionError> {
        let targets: Vec<(u8, Option<f64>)> = {
            let channels = self.shared.channels.lock();
            channels
                .iter()
                .map(|(channel, state)| (*channel, Some(state.limit.center)))
                .collect()
        };
        self.move_to(&targets, duration)
    }

    /// 所有通道当前角度的一致性快照
    ///
    /// 在同一把锁下取出，不可能混合同一拍的推进前后值。`stop()` 之后
    /// 仍然可用（只读最终姿态）。
    pub fn get_angles(&self) -> BTreeMap<u8, f64> {
        let channels = self.shared.channels.lock();
        channels
            .iter()
            .map(|(channel, state)| (*channel, state.trajectory.current()))
            .collect()
    }

    /// 配置的限位表副本（通道 → 限位）
    pub fn limits(&self) -> BTreeMap<u8, Limit> {
        let channels = self.shared.channels.lock();
        channels
            .iter()
            .map(|(channel, state)| (*channel, state.limit.clone()))
            .collect()
    }

    /// 节拍周期
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// 节拍线程是否仍在运行
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// 实时指标快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// 停止节拍线程并等待其退出
    ///
    /// 置位停止标志后 join；节拍线程至多一个周期后观察到信号。
    /// 返回后不再发生任何硬件写入，在途轨迹停留在最后的 `current`。
    /// 幂等：重复调用是空操作。
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.tick_thread.lock().take() {
            if handle.join().is_err() {
                error!("tick thread panicked during shutdown");
            }
            info!("servo controller stopped");
        }
    }

    /// 把 `duration` 换算成节拍数
    ///
    /// 非正时长视作恰好一拍（下一拍截断式瞬移）。
    fn steps_for(&self, duration: Duration) -> u32 {
        if duration.is_zero() {
            return 1;
        }
        let ratio = duration.as_secs_f64() / self.tick_interval.as_secs_f64();
        (ratio.round() as u32).max(1)
    }
}

impl Drop for ServoController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// 节拍线程主循环
///
/// 绝对时间锚点调度：`next_tick` 逐周期累加而不是"睡一个固定间隔"，
/// 推进和写入的耗时会被自动从下一次睡眠中扣除，节拍间距不随时间
/// 漂移。单拍耗时超过周期时记录 overrun 并把锚点重置到当前时刻追赶。
///
/// 一拍之内所有通道在同一次持锁中推进（调用方不可能观察到
/// 半拍快照），随后在锁外按记录顺序写入驱动。单通道写失败记录
/// 日志和指标后跳过，不影响其余通道和后续节拍。
fn tick_loop(
    mut driver: impl ServoDriver,
    shared: Arc<SharedState>,
    period: Duration,
    running: Arc<AtomicBool>,
    metrics: Arc<MotionMetrics>,
) {
    let mut next_tick = Instant::now() + period;

    loop {
        // Acquire: 看到 false 时必须同时看到停止方之前的全部写入
        if !running.load(Ordering::Acquire) {
            trace!("tick thread: running flag is false, exiting");
            break;
        }

        let now = Instant::now();
        if next_tick > now {
            // spin_sleep 提供微秒级精度（std::thread::sleep 粒度约 1-2ms）
            spin_sleep::sleep(next_tick - now);
        } else {
            metrics.tick_overruns.fetch_add(1, Ordering::Relaxed);
            warn!(
                "tick overrun: fell behind by {:?} (period {:?}), resetting anchor",
                now - next_tick,
                period
            );
            next_tick = now;
        }
        next_tick += period;

        // 睡醒后再查一次，stop() 的等待时间不超过一个周期
        if !running.load(Ordering::Acquire) {
            trace!("tick thread: stop observed after sleep, exiting");
            break;
        }

        // === 1. 持锁推进所有在途通道（单一临界区，快照一致性的来源） ===
        let writes: WriteBatch = {
            let mut channels = shared.channels.lock();
            channels
                .iter_mut()
                .filter_map(|(channel, state)| {
                    state.trajectory.advance().map(|angle| (*channel, angle))
                })
                .collect()
        };
        metrics.ticks_total.fetch_add(1, Ordering::Relaxed);

        // === 2. 锁外写入硬件（慢速 I2C 不阻塞 API 调用方） ===
        for (channel, angle) in writes {
            match driver.set_position(channel, angle) {
                Ok(()) => {
                    metrics.writes_total.fetch_add(1, Ordering::Relaxed);
                },
                Err(e) => {
                    // 单通道写失败只丢掉该通道本拍的一次更新，
                    // 其余通道和后续节拍照常进行
                    metrics.write_errors.fetch_add(1, Ordering::Relaxed);
                    error!(
                        "servo write failed: channel={}, angle={:.2}°: {}",
                        channel, angle, e
                    );
                },
            }
        }
    }

    trace!("tick thread: loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ControllerBuilder;
    use noki_pwm::MockServoDriver;

    fn test_controller() -> (ServoController, noki_pwm::MockHandle) {
        let driver = MockServoDriver::new();
        let handle = driver.handle();
        let controller = ControllerBuilder::new()
            .tick_hz(200)
            .build(driver)
            .expect("builder must succeed with default limits");
        (controller, handle)
    }

    #[test]
    fn test_initial_angles_are_centers() {
        let (controller, _handle) = test_controller();
        let angles = controller.get_angles();
        assert_eq!(angles[&0], 55.0);
        assert_eq!(angles[&1], 90.0);
        assert_eq!(angles[&2], 90.0);
        assert_eq!(angles[&3], 60.0);
        controller.stop();
    }

    #[test]
    fn test_move_unknown_channel_rejected_without_mutation() {
        let (controller, _handle) = test_controller();
        let before = controller.get_angles();

        let err = controller
            .move_to(&[(0, Some(70.0)), (9, Some(0.0))], Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, MotionError::UnknownChannel(9)));

        // 合法通道 0 也不允许部分生效
        assert_eq!(controller.get_angles(), before);
        controller.stop();
    }

    #[test]
    fn test_move_after_stop_rejected() {
        let (controller, _handle) = test_controller();
        controller.stop();

        let err = controller
            .move_to(&[(0, Some(70.0))], Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, MotionError::ControllerStopped));

        let err = controller.center_all(Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, MotionError::ControllerStopped));

        // 只读快照仍然可用
        assert_eq!(controller.get_angles()[&0], 55.0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (controller, handle) = test_controller();
        controller.stop();
        let writes_after_first = handle.write_count();
        controller.stop();
        assert_eq!(handle.write_count(), writes_after_first);
        assert!(!controller.is_running());
    }

    #[test]
    fn test_steps_for_rounding() {
        let (controller, _handle) = test_controller();
        let tick = controller.tick_interval();

        // 非正时长 → 恰好一拍
        assert_eq!(controller.steps_for(Duration::ZERO), 1);
        // 不足一拍 → 向上保底一拍
        assert_eq!(controller.steps_for(tick / 4), 1);
        // 整数倍
        assert_eq!(controller.steps_for(tick * 10), 10);
        // 四舍五入
        assert_eq!(controller.steps_for(tick * 10 + tick / 3), 10);
        assert_eq!(controller.steps_for(tick * 10 + tick * 2 / 3), 11);
        controller.stop();
    }
}

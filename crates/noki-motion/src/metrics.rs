//! 运动控制实时指标
//!
//! 提供零开销的原子计数器，用于监控节拍线程的健康状态。
//! 所有计数器都使用原子操作，可以在任何线程安全地读取，
//! 不会和控制器的互斥锁产生竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 运动控制实时指标
///
/// # 使用示例
///
/// ```rust
/// use noki_motion::MotionMetrics;
/// use std::sync::atomic::Ordering;
///
/// let metrics = MotionMetrics::new();
/// metrics.ticks_total.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.ticks_total, 1);
/// ```
#[derive(Debug, Default)]
pub struct MotionMetrics {
    /// 节拍总数
    pub ticks_total: AtomicU64,

    /// 成功写入硬件的次数
    pub writes_total: AtomicU64,

    /// 硬件写入失败次数
    ///
    /// 失败的写入会被跳过（该通道本拍丢失一次更新），不会中断
    /// 其他通道或节拍循环。如果这个值持续增长，说明总线或舵机
    /// 供电存在问题。
    pub write_errors: AtomicU64,

    /// `move_to` / `center_all` 接受的请求数
    pub moves_total: AtomicU64,

    /// 目标角度因越界被截断的次数
    pub targets_clamped: AtomicU64,

    /// 节拍超时（overrun）次数：一拍的推进+写入耗时超过了节拍周期
    pub tick_overruns: AtomicU64,
}

impl MotionMetrics {
    /// 创建新的指标实例（所有计数器初始化为 0）
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取人类可读的指标快照
    ///
    /// 各计数器独立原子读取（计数器之间可能有微小时间差）。
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks_total: self.ticks_total.load(Ordering::Relaxed),
            writes_total: self.writes_total.load(Ordering::Relaxed),
            write_errors: self.write_errors.load(Ordering::Relaxed),
            moves_total: self.moves_total.load(Ordering::Relaxed),
            targets_clamped: self.targets_clamped.load(Ordering::Relaxed),
            tick_overruns: self.tick_overruns.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器（用于测试）
    pub fn reset(&self) {
        self.ticks_total.store(0, Ordering::Relaxed);
        self.writes_total.store(0, Ordering::Relaxed);
        self.write_errors.store(0, Ordering::Relaxed);
        self.moves_total.store(0, Ordering::Relaxed);
        self.targets_clamped.store(0, Ordering::Relaxed);
        self.tick_overruns.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（普通整数，便于打印和断言）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// 节拍总数
    pub ticks_total: u64,
    /// 成功写入硬件的次数
    pub writes_total: u64,
    /// 硬件写入失败次数
    pub write_errors: u64,
    /// 接受的运动请求数
    pub moves_total: u64,
    /// 目标被截断的次数
    pub targets_clamped: u64,
    /// 节拍超时次数
    pub tick_overruns: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_snapshot() {
        let metrics = MotionMetrics::new();
        metrics.ticks_total.fetch_add(3, Ordering::Relaxed);
        metrics.write_errors.fetch_add(1, Ordering::Relaxed);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.ticks_total, 3);
        assert_eq!(snapshot.write_errors, 1);
        assert_eq!(snapshot.writes_total, 0);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = MotionMetrics::new();
        metrics.moves_total.fetch_add(5, Ordering::Relaxed);
        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}

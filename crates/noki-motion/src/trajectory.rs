//! 单通道插值状态
//!
//! [`Trajectory`] 描述一个通道正在进行的线性运动：当前角度、目标
//! 角度、每拍增量和剩余步数。控制器对它的所有读写都发生在同一把
//! 锁之下，本类型自身不做任何同步。
//!
//! # 精确到达
//!
//! 浮点增量逐拍累加会产生微小漂移，最后一步直接赋值 `target`，
//! 保证 `steps_remaining == 0 ⇒ current == target` 严格成立。

/// 单通道轨迹状态
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    /// 最后一次已命令的角度（度），始终在所属通道的限位内
    current: f64,
    /// 运动目标角度（度），可能等于 current
    target: f64,
    /// 每拍增量（度，带符号）
    delta_per_tick: f64,
    /// 到达目标前剩余的节拍数
    steps_remaining: u32,
}

impl Trajectory {
    /// 以静止状态创建（current == target，无剩余步数）
    pub fn at_rest(angle: f64) -> Self {
        Self {
            current: angle,
            target: angle,
            delta_per_tick: 0.0,
            steps_remaining: 0,
        }
    }

    /// 整体替换运动目标
    ///
    /// 从当前角度出发，`steps` 拍后到达 `target`。正在进行的运动
    /// 被直接取代（没有独立的取消原语，后到的目标即刻生效）。
    pub fn retarget(&mut self, target: f64, steps: u32) {
        debug_assert!(steps >= 1, "trajectory needs at least one step");
        self.target = target;
        self.delta_per_tick = (target - self.current) / steps as f64;
        self.steps_remaining = steps;
    }

    /// 推进一拍
    ///
    /// 空闲（无剩余步数）返回 `None`；否则前进一步并返回新的
    /// 当前角度，供调用方写入硬件。
    pub fn advance(&mut self) -> Option<f64> {
        if self.steps_remaining == 0 {
            return None;
        }
        self.steps_remaining -= 1;
        if self.steps_remaining == 0 {
            // 最后一步：直接落在目标上，消除浮点累积误差
            self.current = self.target;
        } else {
            self.current += self.delta_per_tick;
        }
        Some(self.current)
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }

    pub fn is_idle(&self) -> bool {
        self.steps_remaining == 0
    }
}

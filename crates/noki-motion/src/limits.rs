//! 每通道安全限位
//!
//! [`Limit`] 是纯校验/截断策略，构造后不可变。头部每个关节的
//! 机械行程都不一样，越界的命令会被截断到最近的边界而不是报错，
//! 这样场景层可以放心地发"夸张"的姿态。

use std::collections::BTreeMap;

/// 默认节拍频率（Hz）
pub const DEFAULT_TICK_HZ: u32 = 50;

/// 单个通道的安全包络
///
/// 不变量：`min_angle ≤ center ≤ max_angle`，由
/// [`ControllerBuilder::build`](crate::ControllerBuilder::build) 在构造时校验。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limit {
    /// 最小角度（度，含）
    pub min_angle: f64,
    /// 最大角度（度，含）
    pub max_angle: f64,
    /// 默认休息角度，必须落在 [min_angle, max_angle] 内
    pub center: f64,
    /// 人类可读的通道名，不参与任何逻辑
    pub label: String,
}

impl Limit {
    pub fn new(min_angle: f64, max_angle: f64, center: f64, label: impl Into<String>) -> Self {
        Self {
            min_angle,
            max_angle,
            center,
            label: label.into(),
        }
    }

    /// 把角度截断到安全包络内
    ///
    /// 全函数：范围内的输入原样返回，范围外的输入返回较近的边界。
    pub fn clamp(&self, angle: f64) -> f64 {
        angle.min(self.max_angle).max(self.min_angle)
    }

    /// 角度是否已经在包络内
    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.min_angle && angle <= self.max_angle
    }

    /// 校验 min ≤ center ≤ max
    pub fn is_valid(&self) -> bool {
        self.min_angle <= self.center && self.center <= self.max_angle
    }
}

/// 头部四个关节的出厂限位表
///
/// | 通道 | 行程 | 中心 | 关节 |
/// |------|-----------|------|------------|
/// | 0 | 30°-80° | 55° | bob（上下点动） |
/// | 1 | 0°-180° | 90° | sway（左右摇摆） |
/// | 2 | 40°-140° | 90° | ear wiggle（耳朵） |
/// | 3 | 0°-180° | 60° | nod（点头） |
pub fn default_limits() -> BTreeMap<u8, Limit> {
    BTreeMap::from([
        (0, Limit::new(30.0, 80.0, 55.0, "bob")),
        (1, Limit::new(0.0, 180.0, 90.0, "sway")),
        (2, Limit::new(40.0, 140.0, 90.0, "ear wiggle")),
        (3, Limit::new(0.0, 180.0, 60.0, "nod")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_in_range_unchanged() {
        let limit = Limit::new(30.0, 80.0, 55.0, "bob");
        assert_eq!(limit.clamp(30.0), 30.0);
        assert_eq!(limit.clamp(55.5), 55.5);
        assert_eq!(limit.clamp(80.0), 80.0);
    }

    #[test]
    fn test_clamp_out_of_range_to_nearest_bound() {
        let limit = Limit::new(30.0, 80.0, 55.0, "bob");
        assert_eq!(limit.clamp(200.0), 80.0);
        assert_eq!(limit.clamp(-10.0), 30.0);
    }

    #[test]
    fn test_contains() {
        let limit = Limit::new(40.0, 140.0, 90.0, "ear wiggle");
        assert!(limit.contains(40.0));
        assert!(limit.contains(140.0));
        assert!(!limit.contains(39.9));
        assert!(!limit.contains(140.1));
    }

    #[test]
    fn test_is_valid() {
        assert!(Limit::new(0.0, 180.0, 90.0, "ok").is_valid());
        // center 越界
        assert!(!Limit::new(30.0, 80.0, 90.0, "bad center").is_valid());
        // min > max
        assert!(!Limit::new(80.0, 30.0, 55.0, "inverted").is_valid());
    }

    #[test]
    fn test_default_limits_table() {
        let limits = default_limits();
        assert_eq!(limits.len(), 4);
        assert_eq!(limits[&0].label, "bob");
        assert_eq!(limits[&0].center, 55.0);
        assert_eq!(limits[&3].center, 60.0);
        // 出厂表自身必须满足不变量
        for limit in limits.values() {
            assert!(limit.is_valid(), "default limit violates invariant: {:?}", limit);
        }
    }

    proptest! {
        /// clamp 结果总是落在 [min, max] 内
        #[test]
        fn clamp_always_within_bounds(angle in -1000.0..1000.0f64) {
            let limit = Limit::new(30.0, 80.0, 55.0, "bob");
            let clamped = limit.clamp(angle);
            prop_assert!(clamped >= limit.min_angle && clamped <= limit.max_angle);
        }

        /// 已经在范围内的角度 clamp 后保持不变
        #[test]
        fn clamp_identity_in_range(angle in 30.0..=80.0f64) {
            let limit = Limit::new(30.0, 80.0, 55.0, "bob");
            prop_assert_eq!(limit.clamp(angle), angle);
        }

        /// clamp 幂等
        #[test]
        fn clamp_idempotent(angle in -1000.0..1000.0f64) {
            let limit = Limit::new(0.0, 180.0, 90.0, "sway");
            let once = limit.clamp(angle);
            prop_assert_eq!(limit.clamp(once), once);
        }
    }
}

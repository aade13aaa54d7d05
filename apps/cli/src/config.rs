//! CLI 配置文件
//!
//! TOML 格式，默认路径 `~/.config/noki/config.toml`：
//!
//! ```toml
//! i2c_bus = "/dev/i2c-1"
//! i2c_address = 0x40
//! tick_hz = 50
//! channels = [0, 1, 2, 3]
//!
//! # 可选：覆盖单个通道的限位（TOML 的表键是字符串）
//! [limits.0]
//! min_angle = 30.0
//! max_angle = 80.0
//! center = 55.0
//! label = "bob"
//! ```

use anyhow::{Context, Result};
use noki_sdk::Limit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CLI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// I2C 总线设备
    pub i2c_bus: String,
    /// PCA9685 从机地址
    pub i2c_address: u8,
    /// 节拍频率（Hz）
    pub tick_hz: u32,
    /// 激活的通道
    pub channels: Vec<u8>,
    /// 每通道限位覆盖（键为通道号的十进制字符串）
    pub limits: BTreeMap<String, Limit>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            i2c_bus: "/dev/i2c-1".to_string(),
            i2c_address: 0x40,
            tick_hz: 50,
            channels: vec![0, 1, 2, 3],
            limits: BTreeMap::new(),
        }
    }
}

impl CliConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("noki").join("config.toml"))
    }

    /// 加载配置
    ///
    /// - 显式给出的路径必须存在，否则报错
    /// - 默认路径不存在时静默使用内置默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                anyhow::bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// 保存配置
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// 解析限位覆盖表（字符串键 → 通道号）
    pub fn limit_overrides(&self) -> Result<BTreeMap<u8, Limit>> {
        self.limits
            .iter()
            .map(|(key, limit)| {
                let channel: u8 = key
                    .parse()
                    .with_context(|| format!("invalid channel key in [limits]: {:?}", key))?;
                Ok((channel, limit.clone()))
            })
            .collect()
    }
}

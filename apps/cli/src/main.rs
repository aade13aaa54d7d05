//! # Noki CLI
//!
//! Command-line interface for Noki robot head servo control.
//!
//! One-shot 模式：每个子命令内部完成"连接 → 动作 → 等待 → 停止"。
//!
//! ```bash
//! # 配置文件初始化（~/.config/noki/config.toml）
//! noki-cli config init
//!
//! # 抬头 + 低头，1 秒完成
//! noki-cli move --targets 0=80,3=20 --duration 1.0
//!
//! # 全部回中
//! noki-cli center --duration 2.0
//!
//! # 无硬件演示（mock 驱动）
//! noki-cli --mock demo
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod hardware;

use commands::{CenterCommand, ConfigCommand, DemoCommand, MoveCommand, StatusCommand};
use config::CliConfig;

/// Noki CLI - 机器人头部舵机命令行工具
#[derive(Parser, Debug)]
#[command(name = "noki-cli")]
#[command(about = "Command-line interface for Noki robot head servo control", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 ~/.config/noki/config.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 使用 mock 驱动（无硬件演示/调试）
    #[arg(long, global = true)]
    mock: bool,

    /// I2C 总线设备（覆盖配置文件）
    #[arg(long, global = true)]
    i2c_bus: Option<String>,

    /// 节拍频率 Hz（覆盖配置文件）
    #[arg(long, global = true)]
    tick_hz: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 移动通道到目标角度
    Move {
        #[command(flatten)]
        args: MoveCommand,
    },

    /// 所有通道回中
    Center {
        #[command(flatten)]
        args: CenterCommand,
    },

    /// 查询通道状态（限位、当前角度、指标）
    Status {
        #[command(flatten)]
        args: StatusCommand,
    },

    /// 演示动作序列（Ctrl-C 中止）
    Demo {
        #[command(flatten)]
        args: DemoCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志（RUST_LOG 可覆盖，默认 info）
    noki_sdk::init_tracing();

    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(bus) = &cli.i2c_bus {
        config.i2c_bus = bus.clone();
    }
    if let Some(tick_hz) = cli.tick_hz {
        config.tick_hz = tick_hz;
    }

    match cli.command {
        Commands::Config(cmd) => cmd.execute(cli.config.as_deref(), &config),
        Commands::Move { args } => {
            let controller = hardware::build_controller(cli.mock, &config)?;
            args.execute(&controller)
        },
        Commands::Center { args } => {
            let controller = hardware::build_controller(cli.mock, &config)?;
            args.execute(&controller)
        },
        Commands::Status { args } => {
            let controller = hardware::build_controller(cli.mock, &config)?;
            args.execute(&controller)
        },
        Commands::Demo { args } => {
            let controller = hardware::build_controller(cli.mock, &config)?;
            args.execute(&controller)
        },
    }
}

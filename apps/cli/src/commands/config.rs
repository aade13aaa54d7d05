//! 配置管理命令

use crate::config::CliConfig;
use anyhow::Result;
use clap::Subcommand;
use std::path::Path;

/// 配置管理
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印生效的配置（含命令行覆盖）
    Show,
    /// 打印配置文件路径
    Path,
    /// 在默认路径写入一份默认配置
    Init {
        /// 已存在时覆盖
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self, explicit_path: Option<&Path>, config: &CliConfig) -> Result<()> {
        match self {
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(config)?);
                Ok(())
            },
            ConfigCommand::Path => {
                match explicit_path {
                    Some(path) => println!("{}", path.display()),
                    None => match CliConfig::default_path() {
                        Some(path) => println!("{}", path.display()),
                        None => anyhow::bail!("no config directory available on this platform"),
                    },
                }
                Ok(())
            },
            ConfigCommand::Init { force } => {
                let path = match explicit_path {
                    Some(path) => path.to_path_buf(),
                    None => CliConfig::default_path()
                        .ok_or_else(|| anyhow::anyhow!("no config directory available"))?,
                };
                if path.exists() && !force {
                    anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
                }
                CliConfig::default().save(&path)?;
                println!("wrote {}", path.display());
                Ok(())
            },
        }
    }
}

//! 配置文件
//!
//! 优先级：命令行参数 > 环境变量 > 配置文件 > 内置默认值。
//! 命令行与环境变量由 clap 合并，这里只处理配置文件与默认值。
//!
//! ```toml
//! # ~/.config/servoctl/config.toml
//! topology = "1=11,12,13;2=21,22,23"
//! marker_path = "/tmp/servoctl-rezero-complete"
//! elevate = true
//!
//! [sim]
//! latency_ms = 2
//! fail_on = "rezero"   # 可选：注入故障
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use servoctl_control::marker::DEFAULT_MARKER_PATH;
use servoctl_protocol::RequestKind;
use servoctl_transport::SimConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 默认拓扑：4 条总线，每条 3 个舵机
pub const DEFAULT_TOPOLOGY: &str = "1=11,12,13;2=21,22,23;3=31,32,33;4=41,42,43";

/// 默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("servoctl").join("config.toml"))
}

/// 配置文件内容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// 拓扑字符串
    pub topology: Option<String>,

    /// rezero 标记文件路径
    pub marker_path: Option<PathBuf>,

    /// 非 root 时是否通过 sudo 重新执行
    pub elevate: Option<bool>,

    /// 模拟路由器
    pub sim: SimSection,
}

/// `[sim]` 配置段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimSection {
    /// 周期延迟（毫秒）
    pub latency_ms: Option<u64>,

    /// 注入故障的请求类型
    pub fail_on: Option<SimFault>,
}

/// 可注入故障的请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SimFault {
    Stop,
    StopQuery,
    Rezero,
}

impl From<SimFault> for RequestKind {
    fn from(fault: SimFault) -> Self {
        match fault {
            SimFault::Stop => RequestKind::Stop,
            SimFault::StopQuery => RequestKind::StopQuery,
            SimFault::Rezero => RequestKind::Rezero,
        }
    }
}

impl CliConfig {
    /// 解析 TOML 内容
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("解析配置文件失败")
    }

    /// 加载配置
    ///
    /// - `explicit` 为 `Some` 时文件必须存在
    /// - 否则读取默认路径，不存在时返回默认配置
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("配置文件无效: {}", path.display()))
    }
}

/// 命令行 / 环境变量提供的覆盖项
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub topology: Option<String>,
    pub marker_path: Option<PathBuf>,
    pub no_elevate: bool,
}

/// 最终生效的设置
#[derive(Debug, Clone)]
pub struct Settings {
    pub topology: String,
    pub marker_path: PathBuf,
    pub elevate: bool,
    pub sim: SimConfig,
    pub sim_fault: Option<RequestKind>,
}

impl Settings {
    pub fn resolve(overrides: Overrides, config: CliConfig) -> Self {
        let defaults = SimConfig::default();

        Self {
            topology: overrides
                .topology
                .or(config.topology)
                .unwrap_or_else(|| DEFAULT_TOPOLOGY.to_string()),
            marker_path: overrides
                .marker_path
                .or(config.marker_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MARKER_PATH)),
            elevate: !overrides.no_elevate && config.elevate.unwrap_or(true),
            sim: SimConfig {
                latency: config
                    .sim
                    .latency_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.latency),
            },
            sim_fault: config.sim.fail_on.map(RequestKind::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = CliConfig::parse(
            r#"
topology = "1=1,2"
marker_path = "/var/run/rezeroed"
elevate = false

[sim]
latency_ms = 0
fail_on = "stop-query"
"#,
        )
        .unwrap();

        assert_eq!(config.topology.as_deref(), Some("1=1,2"));
        assert_eq!(config.marker_path, Some(PathBuf::from("/var/run/rezeroed")));
        assert_eq!(config.elevate, Some(false));
        assert_eq!(config.sim.latency_ms, Some(0));
        assert_eq!(config.sim.fail_on, Some(SimFault::StopQuery));
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(CliConfig::parse("").unwrap(), CliConfig::default());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(CliConfig::parse("interface = \"can0\"").is_err());
        assert!(CliConfig::parse("[sim]\nfail_on = \"explode\"").is_err());
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "topology = \"3=9\"\n").unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.topology.as_deref(), Some("3=9"));
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(Overrides::default(), CliConfig::default());

        assert_eq!(settings.topology, DEFAULT_TOPOLOGY);
        assert_eq!(settings.marker_path, PathBuf::from(DEFAULT_MARKER_PATH));
        assert!(settings.elevate);
        assert_eq!(settings.sim.latency, SimConfig::default().latency);
        assert_eq!(settings.sim_fault, None);
    }

    #[test]
    fn test_overrides_win_over_config() {
        let config = CliConfig {
            topology: Some("1=1".to_string()),
            marker_path: Some(PathBuf::from("/a")),
            elevate: Some(true),
            sim: SimSection {
                latency_ms: Some(7),
                fail_on: Some(SimFault::Rezero),
            },
        };
        let overrides = Overrides {
            topology: Some("2=2".to_string()),
            marker_path: None,
            no_elevate: true,
        };

        let settings = Settings::resolve(overrides, config);
        assert_eq!(settings.topology, "2=2");
        assert_eq!(settings.marker_path, PathBuf::from("/a"));
        assert!(!settings.elevate);
        assert_eq!(settings.sim.latency, Duration::from_millis(7));
        assert_eq!(settings.sim_fault, Some(RequestKind::Rezero));
    }

    #[test]
    fn test_config_can_disable_elevation() {
        let config = CliConfig {
            elevate: Some(false),
            ..CliConfig::default()
        };
        assert!(!Settings::resolve(Overrides::default(), config).elevate);
    }

    #[test]
    fn test_default_topology_parses() {
        let topology = servoctl_protocol::Topology::parse(DEFAULT_TOPOLOGY).unwrap();
        assert_eq!(topology.servos().len(), 12);
        assert_eq!(topology.bus_map().len(), 4);
    }
}

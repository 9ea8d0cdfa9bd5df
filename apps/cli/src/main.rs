//! # servoctl
//!
//! 向多总线路由器上的全部舵机发送 stop / rezero / stats。
//!
//! ```bash
//! # 停止所有舵机
//! servoctl stop
//!
//! # 重置位置参考，成功后写入标记文件
//! servoctl --marker /tmp/rezeroed rezero
//!
//! # 打印遥测表格
//! servoctl --topology "1=1,2,3;2=4,5,6" stats
//! ```
//!
//! 无论命令成功与否，第一个和最后一个硬件周期都是停止批次。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use servoctl_control::{CommandOutcome, Orchestrator, RezeroMarker, ServoCommand};
use servoctl_protocol::Topology;
use servoctl_transport::{ControllerSet, SimRouter};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod elevate;

use config::{CliConfig, Overrides, Settings};

/// servoctl - 舵机批量命令工具
#[derive(Parser, Debug)]
#[command(name = "servoctl")]
#[command(about = "Send stop / rezero / stats to every servo behind a multi-bus router")]
#[command(long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 拓扑（如 "1=1,2,3;2=4,5,6"），覆盖配置文件
    #[arg(long, global = true, env = "SERVOCTL_TOPOLOGY")]
    topology: Option<String>,

    /// rezero 标记文件路径，覆盖配置文件
    #[arg(long, global = true, env = "SERVOCTL_MARKER")]
    marker: Option<PathBuf>,

    /// 配置文件路径
    #[arg(long, global = true, env = "SERVOCTL_CONFIG")]
    config: Option<PathBuf>,

    /// 非 root 时不通过 sudo 重新执行
    #[arg(long, global = true)]
    no_elevate: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// 重置所有舵机的位置参考
    Rezero,

    /// 停止并打印遥测表格
    Stats,

    /// 停止所有舵机
    Stop,
}

impl From<Commands> for ServoCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Rezero => ServoCommand::Rezero,
            Commands::Stats => ServoCommand::Stats,
            Commands::Stop => ServoCommand::Stop,
        }
    }
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            topology: self.topology.clone(),
            marker_path: self.marker.clone(),
            no_elevate: self.no_elevate,
        }
    }
}

/// Ctrl+C；信号注册失败时永不完成
async fn interrupted() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => warn!("interrupt received, abandoning command"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 初始化日志（stderr，stdout 只留给操作员输出）
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("servoctl=info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 启动期错误：任何硬件动作之前退出
    let config = CliConfig::load(cli.config.as_deref())?;
    let settings = Settings::resolve(cli.overrides(), config);
    let topology = Topology::parse(&settings.topology)
        .with_context(|| format!("invalid topology '{}'", settings.topology))?;

    if settings.elevate {
        elevate::ensure_elevated()?;
    }

    info!(
        servos = topology.servos().len(),
        buses = topology.bus_map().len(),
        "topology resolved"
    );

    let mut router = SimRouter::new(topology.bus_map().clone(), settings.sim);
    if let Some(kind) = settings.sim_fault {
        router = router.fail_on(kind);
    }

    let mut orchestrator = Orchestrator::new(
        router,
        ControllerSet::from_topology(&topology),
        RezeroMarker::new(settings.marker_path),
        std::io::stdout(),
    );

    let report = orchestrator
        .run_until(cli.command.into(), interrupted())
        .await?;

    if let CommandOutcome::Ignored(reason) = &report.outcome {
        info!(command = %report.command, %reason, "command step ignored, servos stopped");
    }

    Ok(())
}

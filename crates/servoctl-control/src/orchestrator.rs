//! # 命令编排器
//!
//! 每次运行的状态机：
//!
//! ```text
//! Start → PreStop → {Rezero | Stats | Stop} → PostStop → Exit
//! ```
//!
//! - `PreStop` / `PostStop`：全体停止批次，错误直接返回给调用方
//! - 命令步骤：错误（包括中断）被打印为 `Ignoring exception: ...` 后忽略
//! - 所有路径都经过 `PostStop`
//!
//! 所有周期严格串行，同一时刻只有一个周期在进行。

use std::future::Future;
use std::io::Write;

use servoctl_protocol::{QueryResult, ServoRequest};
use servoctl_transport::{ControllerSet, Transport};
use tracing::{debug, info, warn};

use crate::command::ServoCommand;
use crate::marker::RezeroMarker;
use crate::stats::{StatsRow, render_table};
use crate::ControlError;

/// 运行阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PreStop,
    Command,
    PostStop,
}

/// 命令步骤的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// 命令步骤成功完成
    Completed,
    /// 命令步骤失败，错误已忽略
    Ignored(String),
}

impl CommandOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CommandOutcome::Completed)
    }
}

/// 单次运行报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub command: ServoCommand,
    pub outcome: CommandOutcome,
    /// 本次运行发出的硬件周期数（含失败的周期）
    pub cycles: usize,
}

/// 命令编排器
///
/// 持有共享传输、控制器集合、rezero 标记以及面向操作员的输出。
pub struct Orchestrator<T, W> {
    transport: T,
    controllers: ControllerSet,
    marker: RezeroMarker,
    out: W,
    cycles: usize,
    /// 进度行已输出 `Sending ...` 但尚未结束
    line_open: bool,
}

impl<T: Transport, W: Write> Orchestrator<T, W> {
    pub fn new(transport: T, controllers: ControllerSet, marker: RezeroMarker, out: W) -> Self {
        Self {
            transport,
            controllers,
            marker,
            out,
            cycles: 0,
            line_open: false,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 拆出内部组件（传输、输出）
    pub fn into_parts(self) -> (T, W) {
        (self.transport, self.out)
    }

    /// 执行命令
    pub async fn run(&mut self, command: ServoCommand) -> Result<RunReport, ControlError> {
        self.run_until(command, std::future::pending()).await
    }

    /// 执行命令，`interrupt` 先完成时放弃命令步骤（最终停止照常执行）
    pub async fn run_until<I>(
        &mut self,
        command: ServoCommand,
        interrupt: I,
    ) -> Result<RunReport, ControlError>
    where
        I: Future<Output = ()>,
    {
        let start = self.cycles;
        info!(%command, servos = self.controllers.len(), "run started");

        let outcome = self
            .with_stopped(async move |this| {
                tokio::select! {
                    biased;
                    () = interrupt => Err(ControlError::Interrupted),
                    result = this.execute(command) => result,
                }
            })
            .await?;

        let report = RunReport {
            command,
            outcome,
            cycles: self.cycles - start,
        };
        info!(
            %command,
            cycles = report.cycles,
            completed = report.outcome.is_completed(),
            "run finished"
        );
        Ok(report)
    }

    /// 在"已停止"状态中执行 `body`
    ///
    /// 进入与退出各发一次停止批次；`body` 的错误被打印并忽略，
    /// 不会跳过退出时的停止。
    async fn with_stopped(
        &mut self,
        body: impl AsyncFnOnce(&mut Self) -> Result<(), ControlError>,
    ) -> Result<CommandOutcome, ControlError> {
        debug!(phase = ?Phase::PreStop);
        self.send_stop().await?;

        debug!(phase = ?Phase::Command);
        let outcome = match body(&mut *self).await {
            Ok(()) => CommandOutcome::Completed,
            Err(e) => {
                self.finish_line("interrupted");
                warn!(error = %e, "ignoring command failure");
                self.progress(format_args!("Ignoring exception: {}\n", e));
                CommandOutcome::Ignored(e.to_string())
            },
        };

        debug!(phase = ?Phase::PostStop);
        self.send_stop().await?;

        Ok(outcome)
    }

    async fn execute(&mut self, command: ServoCommand) -> Result<(), ControlError> {
        match command {
            ServoCommand::Stop => self.send_stop().await,
            ServoCommand::Rezero => self.rezero().await,
            ServoCommand::Stats => self.stats().await,
        }
    }

    async fn rezero(&mut self) -> Result<(), ControlError> {
        self.send_batch("rezero", self.controllers.rezero_batch()).await?;

        self.marker.touch()?;
        info!(marker = %self.marker.path().display(), "rezero marker written");
        Ok(())
    }

    async fn stats(&mut self) -> Result<(), ControlError> {
        let results = self.cycle(self.controllers.query_batch()).await?;
        if results.len() != self.controllers.len() {
            warn!(
                expected = self.controllers.len(),
                received = results.len(),
                "incomplete query replies"
            );
        }

        let rows = StatsRow::collect_sorted(&results);
        self.out.write_all(render_table(&rows).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    async fn send_stop(&mut self) -> Result<(), ControlError> {
        self.send_batch("stop", self.controllers.stop_batch()).await?;
        Ok(())
    }

    /// 发送一个批次并输出 `Sending <label>... done|failed`
    async fn send_batch(
        &mut self,
        label: &str,
        requests: Vec<ServoRequest>,
    ) -> Result<Vec<QueryResult>, ControlError> {
        self.progress(format_args!("Sending {}... ", label));
        self.line_open = true;

        let result = self.cycle(requests).await;
        self.finish_line(if result.is_ok() { "done" } else { "failed" });
        result
    }

    /// 结束未完成的进度行（周期失败或被中断时）
    fn finish_line(&mut self, status: &str) {
        if std::mem::take(&mut self.line_open) {
            self.progress(format_args!("{}\n", status));
        }
    }

    async fn cycle(
        &mut self,
        requests: Vec<ServoRequest>,
    ) -> Result<Vec<QueryResult>, ControlError> {
        self.cycles += 1;
        debug!(cycle = self.cycles, requests = requests.len(), "issuing cycle");
        Ok(self.transport.cycle(&requests).await?)
    }

    /// 进度输出失败不影响硬件动作
    fn progress(&mut self, args: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(args).and_then(|()| self.out.flush()) {
            warn!(error = %e, "failed to write progress output");
        }
    }
}

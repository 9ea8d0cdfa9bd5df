//! # servoctl Control
//!
//! 命令编排层：在"停止 → 命令 → 停止"的固定序列中执行 stop / rezero / stats。
//!
//! ## 安全保证
//!
//! 每次运行的第一个和最后一个硬件周期都是停止批次。命令步骤中的错误
//! 被记录并忽略，最终停止照常执行；两次强制停止本身的错误直接向上传播。
//!
//! ## 模块
//!
//! - `command`: 命令关键字
//! - `orchestrator`: 编排器与运行报告
//! - `stats`: 遥测表格
//! - `marker`: rezero 完成标记文件

use std::path::PathBuf;

use servoctl_transport::TransportError;
use thiserror::Error;

pub mod command;
pub mod marker;
pub mod orchestrator;
pub mod stats;

pub use command::ServoCommand;
pub use marker::RezeroMarker;
pub use orchestrator::{CommandOutcome, Orchestrator, Phase, RunReport};
pub use stats::{StatsRow, format3, render_table};

/// 编排层错误类型
#[derive(Error, Debug)]
pub enum ControlError {
    /// 传输周期失败
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 标记文件写入失败
    #[error("Failed to touch rezero marker {}: {}", .path.display(), .source)]
    Marker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 输出写入失败
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// 命令步骤被中断（如 Ctrl+C）
    #[error("Interrupted")]
    Interrupted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use servoctl_protocol::ServoId;

    #[test]
    fn test_control_error_display() {
        let err = ControlError::Transport(TransportError::Timeout);
        assert_eq!(format!("{}", err), "Transport error: Cycle timeout");

        let err = ControlError::Marker {
            path: PathBuf::from("/tmp/x"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("/tmp/x") && msg.contains("denied"));
    }

    #[test]
    fn test_from_transport_error() {
        let err: ControlError = TransportError::UnknownServo { id: ServoId(3) }.into();
        match err {
            ControlError::Transport(TransportError::UnknownServo { id }) => {
                assert_eq!(id, ServoId(3))
            },
            _ => panic!("Expected Transport variant"),
        }
    }
}

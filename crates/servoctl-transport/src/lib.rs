//! # servoctl Transport Layer
//!
//! 传输层抽象：一次"周期"把一批单舵机请求发到多总线路由器上，
//! 等整批往返完成后返回查询应答。
//!
//! 线协议与总线仲裁由具体实现负责（真实硬件适配器或 [`SimRouter`]），
//! 上层只依赖 [`Transport`] trait。

use std::future::Future;

use servoctl_protocol::{QueryResult, ServoId, ServoRequest};
use thiserror::Error;

pub mod controller;
pub mod sim;

pub use controller::{Controller, ControllerSet};
pub use sim::{SimConfig, SimRouter};

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Servo {id} is not attached to any bus")]
    UnknownServo { id: ServoId },
    #[error("Device error on servo {id}: {message}")]
    Device { id: ServoId, message: String },
    #[error("Cycle timeout")]
    Timeout,
}

impl TransportError {
    pub fn device(id: ServoId, message: impl Into<String>) -> Self {
        Self::Device {
            id,
            message: message.into(),
        }
    }
}

/// 批量周期传输
///
/// 一次 `cycle` 是一次完整往返：所有请求合并发送，调用方挂起直到整批完成。
/// 同一时刻最多只有一个周期在进行（`&mut self` 保证）。
pub trait Transport {
    /// 执行一个周期，返回查询类请求的应答（顺序由实现决定）
    fn cycle(
        &mut self,
        requests: &[ServoRequest],
    ) -> impl Future<Output = Result<Vec<QueryResult>, TransportError>> + Send;
}

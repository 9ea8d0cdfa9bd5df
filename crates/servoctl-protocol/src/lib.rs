//! # servoctl Protocol
//!
//! 舵机拓扑与请求/应答数据类型（无硬件依赖）
//!
//! ## 模块
//!
//! - `ids`: 舵机 ID / 总线 ID 类型
//! - `topology`: 拓扑字符串解析（`<bus>=<id>,<id>;...`）
//! - `request`: 单舵机请求与查询结果
//!
//! 线协议本身由外部传输层负责，本 crate 只描述"发什么"和"收到什么"。

pub mod ids;
pub mod request;
pub mod topology;

// 重新导出常用类型
pub use ids::{BusId, ServoId};
pub use request::{QueryResult, RequestKind, ServoRequest, Telemetry};
pub use topology::{BusMap, Servo, Topology};

use thiserror::Error;

/// 拓扑解析错误
///
/// 任何解析错误都是启动期致命错误，不会重试。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Malformed bus clause '{clause}': expected '<bus>=<id>,<id>,...'")]
    MissingSeparator { clause: String },

    #[error("Invalid bus id '{value}': expected a positive integer")]
    InvalidBusId { value: String },

    #[error("Invalid servo id '{value}': expected a positive integer")]
    InvalidServoId { value: String },

    #[error("Servo {id} is assigned to more than one bus")]
    DuplicateServo { id: ServoId },
}

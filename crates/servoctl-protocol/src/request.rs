//! 单舵机请求与查询结果
//!
//! 一个周期（cycle）由若干 [`ServoRequest`] 组成，传输层一次往返完成整批请求，
//! 只有查询类请求会产生 [`QueryResult`]。

use crate::ids::ServoId;

/// 请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// 停止：零力矩/零速度，并清除锁存故障
    Stop,
    /// 停止 + 读取遥测寄存器
    StopQuery,
    /// 重置绝对位置参考
    Rezero,
}

impl RequestKind {
    /// 该请求是否期待应答
    pub fn expects_reply(self) -> bool {
        matches!(self, RequestKind::StopQuery)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestKind::Stop => "stop",
            RequestKind::StopQuery => "stop+query",
            RequestKind::Rezero => "rezero",
        }
    }
}

/// 发往单个舵机的请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoRequest {
    pub id: ServoId,
    pub kind: RequestKind,
}

impl ServoRequest {
    pub fn new(id: ServoId, kind: RequestKind) -> Self {
        Self { id, kind }
    }
}

/// 遥测寄存器值（控制器原生单位）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Telemetry {
    /// 运行模式代码（0 = stopped）
    pub mode: u8,
    /// 位置（圈，rev）
    pub position: f64,
    /// 速度（rev/s）
    pub velocity: f64,
    /// 力矩（N·m）
    pub torque: f64,
}

impl Telemetry {
    /// 停止模式代码
    pub const MODE_STOPPED: u8 = 0;
}

/// 单舵机查询应答
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryResult {
    pub id: ServoId,
    pub telemetry: Telemetry,
}

//! 命令关键字

use std::fmt;

/// 可执行的命令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServoCommand {
    /// 重置位置参考，成功后写入标记文件
    Rezero,
    /// 停止并读取遥测，输出表格
    Stats,
    /// 再次停止
    Stop,
}

impl ServoCommand {
    pub const ALL: [ServoCommand; 3] = [
        ServoCommand::Rezero,
        ServoCommand::Stats,
        ServoCommand::Stop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServoCommand::Rezero => "rezero",
            ServoCommand::Stats => "stats",
            ServoCommand::Stop => "stop",
        }
    }
}

impl fmt::Display for ServoCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

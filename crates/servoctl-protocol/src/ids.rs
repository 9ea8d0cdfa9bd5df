//! 舵机 / 总线标识符

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

/// 舵机 ID（全拓扑唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServoId(pub u32);

/// 总线 ID（路由器上的通道号）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BusId(pub u32);

/// 解析正整数（拒绝 0、负数和非数字）
fn parse_positive(s: &str) -> Option<u32> {
    s.trim().parse::<NonZeroU32>().ok().map(NonZeroU32::get)
}

impl FromStr for ServoId {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_positive(s).map(ServoId).ok_or_else(|| crate::ParseError::InvalidServoId {
            value: s.trim().to_string(),
        })
    }
}

impl FromStr for BusId {
    type Err = crate::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_positive(s).map(BusId).ok_or_else(|| crate::ParseError::InvalidBusId {
            value: s.trim().to_string(),
        })
    }
}

impl fmt::Display for ServoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 透传宽度/对齐参数，便于表格对齐
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

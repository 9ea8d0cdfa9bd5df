//! 遥测表格
//!
//! 控制器原生单位为圈（rev），表格中的位置/速度按 `value × 2π` 换算为弧度，
//! 力矩不换算；三者在渲染时保留 3 位小数。

use std::f64::consts::TAU;
use std::fmt::Write as _;

use servoctl_protocol::{QueryResult, ServoId};

/// 表头（顺序即列顺序）
pub const HEADERS: [&str; 5] = [
    "id",
    "Mode",
    "Position (rad)",
    "Velocity (rad/s)",
    "Torque (N*m)",
];

/// 最小列宽
const MIN_WIDTH: usize = 4;

/// 列间距
const GAP: &str = "  ";

/// 格式化为 3 位小数（由格式化器按精确十进制值舍入，`-0.000` 归一为 `0.000`）
pub fn format3(value: f64) -> String {
    let text = format!("{:.3}", value);
    match text.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => text,
    }
}

/// 单舵机遥测行（SI 单位，未取整）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsRow {
    pub id: ServoId,
    pub mode: u8,
    /// rad
    pub position: f64,
    /// rad/s
    pub velocity: f64,
    /// N·m
    pub torque: f64,
}

impl StatsRow {
    pub fn from_result(result: &QueryResult) -> Self {
        let t = &result.telemetry;
        Self {
            id: result.id,
            mode: t.mode,
            position: t.position * TAU,
            velocity: t.velocity * TAU,
            torque: t.torque,
        }
    }

    /// 按舵机 ID 升序构建所有行（与应答到达顺序无关）
    pub fn collect_sorted(results: &[QueryResult]) -> Vec<Self> {
        let mut rows: Vec<Self> = results.iter().map(Self::from_result).collect();
        rows.sort_by_key(|row| row.id);
        rows
    }
}

fn widths() -> [usize; 5] {
    HEADERS.map(|h| h.len().max(MIN_WIDTH))
}

/// 渲染固定宽度表格：表头、分隔线、每行一个舵机（按传入顺序）
pub fn render_table(rows: &[StatsRow]) -> String {
    let [w_id, w_mode, w_pos, w_vel, w_torque] = widths();
    let mut out = String::new();

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths())
        .map(|(h, w)| format!("{:>w$}", h))
        .collect();
    let _ = writeln!(out, "{}", header.join(GAP));

    let rule: Vec<String> = widths().iter().map(|&w| "-".repeat(w)).collect();
    let _ = writeln!(out, "{}", rule.join(GAP));

    for row in rows {
        let cells = [
            format!("{:>w_id$}", row.id),
            format!("{:>w_mode$}", row.mode),
            format!("{:>w_pos$}", format3(row.position)),
            format!("{:>w_vel$}", format3(row.velocity)),
            format!("{:>w_torque$}", format3(row.torque)),
        ];
        let _ = writeln!(out, "{}", cells.join(GAP));
    }

    out
}

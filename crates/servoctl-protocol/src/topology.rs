//! # 拓扑解析
//!
//! 拓扑字符串描述每条总线上挂载的舵机：
//!
//! ```text
//! 1=11,12,13;2=21,22,23
//! └┬┘ └───┬──┘
//!  bus   servo ids
//! ```
//!
//! - 子句之间用 `;` 分隔，总线与 ID 列表之间用 `=` 分隔，ID 之间用 `,` 分隔
//! - 空子句和空 ID 项被忽略（允许结尾多余的分隔符）
//! - 同一总线可以出现在多个子句中，ID 按出现顺序追加
//! - 同一舵机 ID 只能出现一次
//!
//! ```rust
//! use servoctl_protocol::{BusId, ServoId, Topology};
//!
//! let topology: Topology = "1=1,2,3;2=4,5,6".parse()?;
//! assert_eq!(topology.servos().len(), 6);
//! assert_eq!(
//!     topology.bus_map().get(BusId(2)),
//!     Some(&[ServoId(4), ServoId(5), ServoId(6)][..])
//! );
//! # Ok::<(), servoctl_protocol::ParseError>(())
//! ```

use std::collections::btree_map;
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use crate::ParseError;
use crate::ids::{BusId, ServoId};

/// 子句分隔符
pub const CLAUSE_SEPARATOR: char = ';';

/// 总线与 ID 列表分隔符
pub const BUS_SEPARATOR: char = '=';

/// ID 分隔符
pub const ID_SEPARATOR: char = ',';

/// 单个舵机（构造后不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Servo {
    pub id: ServoId,
    pub bus: BusId,
}

/// 总线 → 舵机 ID 列表
///
/// 列表内保持解析顺序（不排序）；每个舵机 ID 在整个映射中只出现一次。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusMap {
    buses: BTreeMap<BusId, Vec<ServoId>>,
}

impl BusMap {
    /// 从舵机列表构建（调用方保证 ID 唯一）
    fn from_servos(servos: &[Servo]) -> Self {
        let mut buses: BTreeMap<BusId, Vec<ServoId>> = BTreeMap::new();
        for servo in servos {
            buses.entry(servo.bus).or_default().push(servo.id);
        }
        Self { buses }
    }

    /// 获取某条总线上的舵机 ID
    pub fn get(&self, bus: BusId) -> Option<&[ServoId]> {
        self.buses.get(&bus).map(Vec::as_slice)
    }

    /// 查找舵机所在总线
    pub fn bus_of(&self, id: ServoId) -> Option<BusId> {
        self.buses
            .iter()
            .find(|(_, ids)| ids.contains(&id))
            .map(|(bus, _)| *bus)
    }

    /// 总线数量
    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    /// 舵机总数
    pub fn servo_count(&self) -> usize {
        self.buses.values().map(Vec::len).sum()
    }

    /// 按总线 ID 升序遍历
    pub fn iter(&self) -> btree_map::Iter<'_, BusId, Vec<ServoId>> {
        self.buses.iter()
    }
}

impl<'a> IntoIterator for &'a BusMap {
    type Item = (&'a BusId, &'a Vec<ServoId>);
    type IntoIter = btree_map::Iter<'a, BusId, Vec<ServoId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// 解析后的拓扑：舵机列表 + 总线映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    servos: Vec<Servo>,
    bus_map: BusMap,
}

impl Topology {
    /// 解析拓扑字符串
    ///
    /// # 错误
    ///
    /// - 子句缺少 `=`：[`ParseError::MissingSeparator`]
    /// - 总线 ID 不是正整数：[`ParseError::InvalidBusId`]
    /// - 舵机 ID 不是正整数：[`ParseError::InvalidServoId`]
    /// - 舵机 ID 重复：[`ParseError::DuplicateServo`]
    pub fn parse(spec: &str) -> Result<Self, ParseError> {
        let mut servos = Vec::new();
        let mut seen = HashSet::new();

        for clause in spec.split(CLAUSE_SEPARATOR).map(str::trim) {
            if clause.is_empty() {
                continue;
            }

            let (bus, ids) = clause.split_once(BUS_SEPARATOR).ok_or_else(|| {
                ParseError::MissingSeparator {
                    clause: clause.to_string(),
                }
            })?;
            let bus: BusId = bus.parse()?;

            for id in ids.split(ID_SEPARATOR).map(str::trim) {
                if id.is_empty() {
                    continue;
                }

                let id: ServoId = id.parse()?;
                if !seen.insert(id) {
                    return Err(ParseError::DuplicateServo { id });
                }
                servos.push(Servo { id, bus });
            }
        }

        let bus_map = BusMap::from_servos(&servos);
        Ok(Self { servos, bus_map })
    }

    /// 舵机列表（解析顺序）
    pub fn servos(&self) -> &[Servo] {
        &self.servos
    }

    /// 总线映射
    pub fn bus_map(&self) -> &BusMap {
        &self.bus_map
    }

    /// 所有舵机 ID（解析顺序）
    pub fn servo_ids(&self) -> impl Iterator<Item = ServoId> + '_ {
        self.servos.iter().map(|s| s.id)
    }

    pub fn is_empty(&self) -> bool {
        self.servos.is_empty()
    }
}

impl FromStr for Topology {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

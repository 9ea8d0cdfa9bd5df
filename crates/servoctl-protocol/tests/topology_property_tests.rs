//! 拓扑解析的属性测试
//!
//! 使用 proptest 验证 BusMap 不变量。

use proptest::prelude::*;
use servoctl_protocol::{BusId, ServoId, Topology};
use std::collections::HashSet;

/// 生成 (总线, 舵机 ID 列表)，舵机 ID 全局唯一
fn layout() -> impl Strategy<Value = Vec<(u32, Vec<u32>)>> {
    prop::collection::hash_set(1u32..500, 0..24).prop_flat_map(|ids| {
        let ids: Vec<u32> = ids.into_iter().collect();
        let len = ids.len();
        (Just(ids), prop::collection::vec(1u32..6, len)).prop_map(|(ids, buses)| {
            let mut clauses: Vec<(u32, Vec<u32>)> = Vec::new();
            for (id, bus) in ids.into_iter().zip(buses) {
                match clauses.last_mut() {
                    Some((last_bus, group)) if *last_bus == bus => group.push(id),
                    _ => clauses.push((bus, vec![id])),
                }
            }
            clauses
        })
    })
}

fn render(clauses: &[(u32, Vec<u32>)], trailing: bool) -> String {
    let mut spec = clauses
        .iter()
        .map(|(bus, ids)| {
            let ids: Vec<String> = ids.iter().map(u32::to_string).collect();
            let mut clause = format!("{}={}", bus, ids.join(","));
            if trailing {
                clause.push(',');
            }
            clause
        })
        .collect::<Vec<_>>()
        .join(";");
    if trailing {
        spec.push_str(";;");
    }
    spec
}

proptest! {
    /// 每个舵机 ID 恰好出现在一条总线上，且保持首次出现顺序
    #[test]
    fn every_servo_on_exactly_one_bus(clauses in layout()) {
        let topology = Topology::parse(&render(&clauses, false)).unwrap();

        let expected: Vec<u32> = clauses.iter().flat_map(|(_, ids)| ids.clone()).collect();
        let parsed: Vec<u32> = topology.servo_ids().map(|id| id.0).collect();
        prop_assert_eq!(&parsed, &expected);

        let mut seen = HashSet::new();
        for (bus, ids) in topology.bus_map() {
            for id in ids {
                prop_assert!(seen.insert(*id), "servo {} listed twice", id);
                prop_assert_eq!(topology.bus_map().bus_of(*id), Some(*bus));
            }
        }
        prop_assert_eq!(seen.len(), expected.len());

        // 每条总线内部的顺序 = 该总线舵机的首次出现顺序
        for (bus, ids) in topology.bus_map() {
            let order: Vec<ServoId> = topology
                .servos()
                .iter()
                .filter(|s| s.bus == *bus)
                .map(|s| s.id)
                .collect();
            prop_assert_eq!(ids, &order);
        }
    }

    /// 结尾分隔符和空项不影响结果
    #[test]
    fn trailing_separators_are_ignored(clauses in layout()) {
        let plain = Topology::parse(&render(&clauses, false)).unwrap();
        let padded = Topology::parse(&render(&clauses, true)).unwrap();
        prop_assert_eq!(plain, padded);
    }

    /// 任意总线 ID 都能被接受（无需连续或有序）
    #[test]
    fn bus_ids_need_not_be_contiguous(bus in 1u32..100_000, id in 1u32..1000) {
        let topology = Topology::parse(&format!("{}={}", bus, id)).unwrap();
        prop_assert_eq!(topology.bus_map().bus_of(ServoId(id)), Some(BusId(bus)));
    }
}

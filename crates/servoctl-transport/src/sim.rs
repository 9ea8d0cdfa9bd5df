//! 模拟多总线路由器
//!
//! 无硬件依赖的 [`Transport`] 实现，按总线映射维护每个舵机的状态：
//!
//! | 请求 | 效果 |
//! |------|------|
//! | `Stop` | mode = 0，速度/力矩清零 |
//! | `StopQuery` | 同 `Stop`，并返回遥测 |
//! | `Rezero` | 位置参考重置为 0 rev |
//!
//! 整批请求先校验、后执行：任一请求无效时整个周期失败，不修改任何状态。

use std::collections::HashMap;
use std::time::Duration;

use servoctl_protocol::{
    BusId, BusMap, QueryResult, RequestKind, ServoId, ServoRequest, Telemetry,
};
use tracing::debug;

use crate::{Transport, TransportError};

/// 模拟路由器配置
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// 每个周期的往返延迟
    pub latency: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(2),
        }
    }
}

/// 上电时舵机的模拟运行模式（非 stopped）
const INITIAL_MODE: u8 = 10;

/// 模拟多总线路由器
#[derive(Debug)]
pub struct SimRouter {
    bus_map: BusMap,
    servos: HashMap<ServoId, Telemetry>,
    config: SimConfig,
    fault: Option<RequestKind>,
    cycles: u64,
}

impl SimRouter {
    /// 根据总线映射创建路由器
    ///
    /// 每个舵机以非零位置/速度和运行模式启动，便于观察 stop 的效果。
    pub fn new(bus_map: BusMap, config: SimConfig) -> Self {
        let servos = bus_map
            .iter()
            .flat_map(|(_, ids)| ids.iter().copied())
            .map(|id| {
                let seed = f64::from(id.0);
                let telemetry = Telemetry {
                    mode: INITIAL_MODE,
                    position: seed * 0.01,
                    velocity: 0.5,
                    torque: 0.1,
                };
                (id, telemetry)
            })
            .collect();

        Self {
            bus_map,
            servos,
            config,
            fault: None,
            cycles: 0,
        }
    }

    /// 注入故障：包含该类型请求的周期将失败
    pub fn fail_on(mut self, kind: RequestKind) -> Self {
        self.fault = Some(kind);
        self
    }

    /// 已完成（含失败）的周期数
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// 读取舵机当前状态
    pub fn telemetry(&self, id: ServoId) -> Option<Telemetry> {
        self.servos.get(&id).copied()
    }

    fn bus_of(&self, id: ServoId) -> Result<BusId, TransportError> {
        self.bus_map
            .bus_of(id)
            .ok_or(TransportError::UnknownServo { id })
    }

    /// 校验整批请求（不修改状态）
    fn validate(&self, requests: &[ServoRequest]) -> Result<(), TransportError> {
        for request in requests {
            self.bus_of(request.id)?;
            if self.fault == Some(request.kind) {
                return Err(TransportError::device(
                    request.id,
                    format!("injected fault on {} request", request.kind.as_str()),
                ));
            }
        }
        Ok(())
    }

    fn apply(&mut self, request: &ServoRequest) -> Option<QueryResult> {
        let telemetry = self.servos.get_mut(&request.id)?;

        match request.kind {
            RequestKind::Stop | RequestKind::StopQuery => {
                telemetry.mode = Telemetry::MODE_STOPPED;
                telemetry.velocity = 0.0;
                telemetry.torque = 0.0;
            },
            RequestKind::Rezero => {
                telemetry.position = 0.0;
            },
        }

        request.kind.expects_reply().then(|| QueryResult {
            id: request.id,
            telemetry: *telemetry,
        })
    }
}

impl Transport for SimRouter {
    async fn cycle(
        &mut self,
        requests: &[ServoRequest],
    ) -> Result<Vec<QueryResult>, TransportError> {
        self.cycles += 1;
        debug!(
            cycle = self.cycles,
            requests = requests.len(),
            "sim router cycle"
        );

        self.validate(requests)?;

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        Ok(requests.iter().filter_map(|r| self.apply(r)).collect())
    }
}

//! 单舵机控制器句柄
//!
//! 每个 [`Controller`] 绑定一个舵机 ID，只负责构造请求；
//! 请求由持有共享传输的一方合并成一个周期发送。

use servoctl_protocol::{RequestKind, ServoId, ServoRequest, Topology};

/// 单舵机控制器句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    id: ServoId,
}

impl Controller {
    pub fn new(id: ServoId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> ServoId {
        self.id
    }

    /// 停止请求；`query` 为 true 时附带遥测读取
    pub fn make_stop(&self, query: bool) -> ServoRequest {
        let kind = if query {
            RequestKind::StopQuery
        } else {
            RequestKind::Stop
        };
        ServoRequest::new(self.id, kind)
    }

    /// 重置位置参考请求
    pub fn make_rezero(&self) -> ServoRequest {
        ServoRequest::new(self.id, RequestKind::Rezero)
    }
}

/// 控制器集合（启动时构建一次，之后只读）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerSet {
    controllers: Vec<Controller>,
}

impl ControllerSet {
    /// 按拓扑中的舵机顺序构建
    pub fn from_topology(topology: &Topology) -> Self {
        Self {
            controllers: topology.servo_ids().map(Controller::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Controller> {
        self.controllers.iter()
    }

    /// 全体停止批次
    pub fn stop_batch(&self) -> Vec<ServoRequest> {
        self.controllers.iter().map(|c| c.make_stop(false)).collect()
    }

    /// 全体停止 + 查询批次
    pub fn query_batch(&self) -> Vec<ServoRequest> {
        self.controllers.iter().map(|c| c.make_stop(true)).collect()
    }

    /// 全体重置位置参考批次
    pub fn rezero_batch(&self) -> Vec<ServoRequest> {
        self.controllers.iter().map(Controller::make_rezero).collect()
    }
}

impl<'a> IntoIterator for &'a ControllerSet {
    type Item = &'a Controller;
    type IntoIter = std::slice::Iter<'a, Controller>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! rezero 完成标记文件
//!
//! 外部监督进程通过该文件是否存在判断 rezero 是否完成。

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::ControlError;

/// 默认标记文件路径
pub const DEFAULT_MARKER_PATH: &str = "/tmp/servoctl-rezero-complete";

/// 标记文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RezeroMarker {
    path: PathBuf,
}

impl RezeroMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// 创建文件（已存在则只更新修改时间），不改动内容
    pub fn touch(&self) -> Result<(), ControlError> {
        let wrap = |source: std::io::Error| ControlError::Marker {
            path: self.path.clone(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(wrap)?;
        file.set_modified(SystemTime::now()).map_err(wrap)?;

        Ok(())
    }
}

impl Default for RezeroMarker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_PATH)
    }
}

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个 peer 的累计流量计数器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerCounters {
    pub rx: u64, // 累计接收字节数
    pub tx: u64, // 累计发送字节数
}

/// 某一时刻的计数器快照，key 为 peer 的 allowed-ips
pub type Snapshot = BTreeMap<String, PeerCounters>;

/// 计数器来源接口
pub trait CounterSource {
    /// 读取原始 dump 输出（阻塞调用），按行返回
    fn read_dump(&mut self) -> Result<Vec<String>>;

    /// 获取来源名称
    fn name(&self) -> &str;
}

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 格式化字节数显示（1024 进制，保留两位小数）
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{:.2} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2} PB", value)
}

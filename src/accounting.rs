use crate::monitor::{PeerCounters, Snapshot};
use crate::period::WindowKind;
use std::collections::BTreeMap;

/// 单个 peer 在某窗口内的统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeerDelta {
    pub total: PeerCounters, // 原始累计值
    pub delta: PeerCounters, // 相对基线的增量
}

pub type DeltaTable = BTreeMap<String, PeerDelta>;

/// 判断窗口是否已滚动（lastcheck 永不滚动）
pub fn rolled_over(kind: WindowKind, stored_key: Option<&str>, current_key: &str) -> bool {
    kind.rotates() && stored_key != Some(current_key)
}

/// 窗口滚动时基线清空，否则沿用上次保存的快照
pub fn effective_baseline(stored: Snapshot, rolled_over: bool) -> Snapshot {
    if rolled_over {
        Snapshot::new()
    } else {
        stored
    }
}

/// 计数器增量；当前值小于基线说明计数器已重置，此时增量即当前值
fn counter_delta(current: u64, baseline: u64) -> u64 {
    current.checked_sub(baseline).unwrap_or(current)
}

/// 计算当前快照中每个 peer 相对基线的增量
///
/// 只报告当前快照中存在的 peer，基线中没有的 peer 按 {0, 0} 计算。
pub fn compute_deltas(current: &Snapshot, baseline: &Snapshot) -> DeltaTable {
    current
        .iter()
        .map(|(peer, &total)| {
            let base = baseline.get(peer).copied().unwrap_or_default();
            let delta = PeerCounters {
                rx: counter_delta(total.rx, base.rx),
                tx: counter_delta(total.tx, base.tx),
            };
            (peer.clone(), PeerDelta { total, delta })
        })
        .collect()
}

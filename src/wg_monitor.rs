use crate::error::{Result, StatsError};
use crate::monitor::{CounterSource, PeerCounters, Snapshot};
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// 直接在宿主机上执行 wg 的执行上下文名称
pub const HOST_CONTEXT: &str = "host";

// wg show dump 的 peer 行字段数
const PEER_FIELDS: usize = 7;
const ALLOWED_IPS_FIELD: usize = 3;
const RX_FIELD: usize = 5;
const TX_FIELD: usize = 6;

/// 基于 `wg show <iface> dump` 的计数器来源
pub struct WgDumpMonitor {
    container: String,
    interface: String,
}

impl WgDumpMonitor {
    pub fn new(container: String, interface: String) -> Self {
        Self {
            container,
            interface,
        }
    }

    /// 构造要执行的命令：容器内通过 docker exec，宿主机上直接执行 wg
    fn command(&self) -> Command {
        let mut cmd = if self.container == HOST_CONTEXT {
            Command::new("wg")
        } else {
            let mut cmd = Command::new("docker");
            cmd.args(["exec", &self.container, "wg"]);
            cmd
        };
        cmd.args(["show", &self.interface, "dump"]);
        cmd
    }
}

impl CounterSource for WgDumpMonitor {
    fn read_dump(&mut self) -> Result<Vec<String>> {
        let output = self
            .command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| StatsError::SourceUnavailable(format!("执行 wg show 失败: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StatsError::SourceUnavailable(format!(
                "wg show 退出状态 {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        log::debug!("wg show 输出 {} 字节", output.stdout.len());
        Ok(stdout.trim().lines().map(str::to_string).collect())
    }

    fn name(&self) -> &str {
        "wg"
    }
}

/// 从已保存的 dump 文件读取计数器
pub struct DumpFileMonitor {
    path: PathBuf,
}

impl DumpFileMonitor {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CounterSource for DumpFileMonitor {
    fn read_dump(&mut self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            StatsError::SourceUnavailable(format!("读取 {} 失败: {e}", self.path.display()))
        })?;
        Ok(content.trim().lines().map(str::to_string).collect())
    }

    fn name(&self) -> &str {
        "dump-file"
    }
}

/// 解析 rx/tx 字段，任一无法解析时返回 None
fn parse_counters(rx: &str, tx: &str) -> Option<PeerCounters> {
    Some(PeerCounters {
        rx: rx.trim().parse().ok()?,
        tx: tx.trim().parse().ok()?,
    })
}

/// 解析 wg show dump 输出为快照
///
/// 字段不足 7 个的行（接口头行或损坏行）直接跳过；
/// 同一 allowed-ips 出现多次时以后出现的行为准。
pub fn parse_wg_dump<S: AsRef<str>>(lines: &[S]) -> Snapshot {
    let mut peers = Snapshot::new();

    for line in lines {
        let parts: Vec<&str> = line.as_ref().split('\t').collect();
        if parts.len() < PEER_FIELDS {
            continue;
        }

        let allowed_ips = parts[ALLOWED_IPS_FIELD];
        let counters = parse_counters(parts[RX_FIELD], parts[TX_FIELD]).unwrap_or_else(|| {
            log::debug!("peer {allowed_ips} 计数器无法解析，按 0 处理");
            PeerCounters::default()
        });
        peers.insert(allowed_ips.to_string(), counters);
    }

    peers
}

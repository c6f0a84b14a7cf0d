use crate::accounting::DeltaTable;
use crate::monitor::format_bytes;
use crate::period::WindowKind;
use chrono::NaiveDateTime;
use std::fmt::Write as FmtWrite;

/// 报告头：来源身份与时间戳
pub fn render_header(container: &str, interface: &str, now: NaiveDateTime) -> String {
    format!(
        "WireGuard Traffic Report ({container}:{interface})\nTimestamp: {}\n\n",
        now.format("%d %B %Y %H:%M:%S")
    )
}

/// 渲染单个窗口的统计小节
pub fn render_section(kind: WindowKind, deltas: &DeltaTable) -> String {
    let mut out = format!("\n=== {} stats ===\n", kind.label());

    if deltas.is_empty() {
        out.push_str("No data.\n");
        return out;
    }

    for (peer, stats) in deltas {
        let _ = writeln!(out, "Peer: {peer}");
        let _ = writeln!(
            out,
            "  RX: {} (Total), +{} since last check",
            format_bytes(stats.total.rx),
            format_bytes(stats.delta.rx)
        );
        let _ = writeln!(
            out,
            "  TX: {} (Total), +{} since last check\n",
            format_bytes(stats.total.tx),
            format_bytes(stats.delta.tx)
        );
    }

    out
}

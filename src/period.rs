use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;

/// lastcheck 窗口固定使用的 key，永远不会触发滚动
pub const LASTCHECK_KEY: &str = "lastcheck";

/// 统计窗口类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    Daily,
    Weekly,
    Monthly,
    /// 自上次运行以来的增量，不按日历滚动
    LastCheck,
}

impl WindowKind {
    pub const ALL: [WindowKind; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::LastCheck];

    /// 配置与状态文件名中使用的名称
    pub fn name(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::LastCheck => "lastcheck",
        }
    }

    /// 报告中的小节标题
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::LastCheck => "Lastcheck",
        }
    }

    pub fn rotates(self) -> bool {
        self != Self::LastCheck
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("未知的统计窗口 '{s}'，可选: daily, weekly, monthly, lastcheck"))
    }
}

/// 计算当前时刻所属窗口的 key
///
/// 周编号以周一为一周的开始（`%W`），年初第一个周一之前属于第 00 周。
pub fn period_key(kind: WindowKind, now: NaiveDateTime) -> String {
    match kind {
        WindowKind::Daily => now.format("%Y-%m-%d").to_string(),
        WindowKind::Weekly => now.format("%Y-W%W").to_string(),
        WindowKind::Monthly => now.format("%Y-%m").to_string(),
        WindowKind::LastCheck => LASTCHECK_KEY.to_string(),
    }
}

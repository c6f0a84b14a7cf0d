use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StatsError>;

/// 流量统计过程中可能出现的错误
#[derive(Debug)]
pub enum StatsError {
    /// 无法获取 wg 计数器输出（命令缺失或执行失败）
    SourceUnavailable(String),
    /// 窗口状态写入失败
    Persist { path: PathBuf, source: io::Error },
    /// 配置无效
    Config(String),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceUnavailable(msg) => write!(f, "无法获取 wg 计数器: {msg}"),
            Self::Persist { path, source } => {
                write!(f, "保存窗口状态 {} 失败: {source}", path.display())
            }
            Self::Config(msg) => write!(f, "配置错误: {msg}"),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persist { source, .. } => Some(source),
            _ => None,
        }
    }
}

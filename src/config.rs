use crate::error::{Result, StatsError};
use crate::monitor::CounterSource;
use crate::period::WindowKind;
use crate::store::WindowStore;
use crate::wg_monitor::{DumpFileMonitor, WgDumpMonitor};
use std::path::PathBuf;

pub const DEFAULT_CONTAINER: &str = "wg-easy";
pub const DEFAULT_INTERFACE: &str = "wg0";
pub const DEFAULT_DATA_DIR: &str = "/var/opt/wg-stats";
pub const DEFAULT_PERIODS: &str = "daily,weekly,monthly,lastcheck";

/// 逗号分隔的窗口列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodList(pub Vec<WindowKind>);

/// 解析窗口列表：忽略空项，重复项只保留第一次出现
pub fn parse_period_list(s: &str) -> std::result::Result<PeriodList, String> {
    let mut kinds = Vec::new();
    for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let kind: WindowKind = item.parse()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    if kinds.is_empty() {
        return Err("至少需要一个统计窗口".to_string());
    }
    Ok(PeriodList(kinds))
}

/// 单次运行的全部配置，创建后不可变
#[derive(Debug, Clone)]
pub struct Config {
    pub container: String,
    pub interface: String,
    pub data_dir: PathBuf,
    pub periods: Vec<WindowKind>,
    pub dump_file: Option<PathBuf>,
}

impl Config {
    pub fn new(
        container: String,
        interface: String,
        data_dir: PathBuf,
        periods: PeriodList,
        dump_file: Option<PathBuf>,
    ) -> Result<Self> {
        if container.trim().is_empty() {
            return Err(StatsError::Config("容器名不能为空".to_string()));
        }
        if interface.trim().is_empty() {
            return Err(StatsError::Config("网卡名不能为空".to_string()));
        }

        Ok(Self {
            container,
            interface,
            data_dir,
            periods: periods.0,
            dump_file,
        })
    }

    pub fn store(&self) -> WindowStore {
        WindowStore::new(
            self.data_dir.clone(),
            self.container.clone(),
            self.interface.clone(),
        )
    }

    /// 根据配置选择计数器来源
    pub fn source(&self) -> Box<dyn CounterSource> {
        match &self.dump_file {
            Some(path) => Box::new(DumpFileMonitor::new(path.clone())),
            None => Box::new(WgDumpMonitor::new(
                self.container.clone(),
                self.interface.clone(),
            )),
        }
    }
}

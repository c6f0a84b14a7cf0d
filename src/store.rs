//! 各统计窗口的状态持久化。
//!
//! 每个 (容器, 网卡, 窗口) 组合对应数据目录下的一个 JSON 文件。

use crate::error::{Result, StatsError};
use crate::monitor::Snapshot;
use crate::period::WindowKind;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// 单个窗口上次运行时保存的状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    #[serde(default)]
    pub period_key: Option<String>,
    #[serde(default)]
    pub stats: Snapshot,
}

/// 窗口状态存储，按来源身份区分文件
#[derive(Debug, Clone)]
pub struct WindowStore {
    data_dir: PathBuf,
    container: String,
    interface: String,
}

impl WindowStore {
    pub fn new(data_dir: PathBuf, container: String, interface: String) -> Self {
        Self {
            data_dir,
            container,
            interface,
        }
    }

    pub fn path_for(&self, kind: WindowKind) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}_{}.json", self.container, self.interface, kind.name()))
    }

    /// 读取窗口状态；文件不存在或无法解析时视为首次运行
    pub fn load(&self, kind: WindowKind) -> WindowState {
        let path = self.path_for(kind);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!("{kind} 窗口无历史状态 ({}): {e}", path.display());
                return WindowState::default();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("{kind} 窗口状态文件 {} 已损坏，重新开始统计: {e}", path.display());
                WindowState::default()
            }
        }
    }

    /// 保存窗口状态：先写临时文件再重命名覆盖
    pub fn save(&self, kind: WindowKind, period_key: &str, snapshot: &Snapshot) -> Result<()> {
        let path = self.path_for(kind);
        let persist_err = |source: std::io::Error| StatsError::Persist {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.data_dir).map_err(persist_err)?;

        let tmp_path = path.with_extension("json.tmp");
        write_state(&tmp_path, period_key, snapshot).map_err(persist_err)?;
        fs::rename(&tmp_path, &path).map_err(persist_err)?;

        log::debug!("{kind} 窗口状态已保存到 {}", path.display());
        Ok(())
    }
}

fn write_state(path: &Path, period_key: &str, snapshot: &Snapshot) -> std::io::Result<()> {
    #[derive(Serialize)]
    struct StateRef<'a> {
        period_key: &'a str,
        stats: &'a Snapshot,
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(
        &mut writer,
        &StateRef {
            period_key,
            stats: snapshot,
        },
    )?;
    writer.flush()?;
    writer.get_ref().sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::PeerCounters;

    fn store(dir: &Path) -> WindowStore {
        WindowStore::new(dir.to_path_buf(), "wg-easy".to_string(), "wg0".to_string())
    }

    fn snapshot(entries: &[(&str, u64, u64)]) -> Snapshot {
        entries
            .iter()
            .map(|&(peer, rx, tx)| (peer.to_string(), PeerCounters { rx, tx }))
            .collect()
    }

    #[test]
    fn file_name_combines_container_interface_and_kind() {
        let store = WindowStore::new(PathBuf::from("/data"), "box".to_string(), "wg1".to_string());
        assert_eq!(
            store.path_for(WindowKind::Weekly),
            PathBuf::from("/data/box_wg1_weekly.json")
        );
    }

    #[test]
    fn missing_state_loads_as_fresh_window() {
        let dir = tempfile::tempdir().unwrap();
        let state = store(dir.path()).load(WindowKind::Daily);

        assert_eq!(state, WindowState::default());
        assert!(state.period_key.is_none());
        assert!(state.stats.is_empty());
    }

    #[test]
    fn corrupt_state_loads_as_fresh_window() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        fs::write(store.path_for(WindowKind::Daily), "not valid json").unwrap();

        assert_eq!(store.load(WindowKind::Daily), WindowState::default());
    }

    #[test]
    fn save_then_load_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("stats");
        let store = store(&nested);
        let stats = snapshot(&[("10.0.0.2/32", 500, 1000)]);

        store.save(WindowKind::Monthly, "2024-10", &stats).unwrap();
        let state = store.load(WindowKind::Monthly);

        assert_eq!(state.period_key.as_deref(), Some("2024-10"));
        assert_eq!(state.stats, stats);
        assert!(!store.path_for(WindowKind::Monthly).with_extension("json.tmp").exists());
    }

    #[test]
    fn kinds_are_stored_independently() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store.save(WindowKind::Daily, "2024-10-19", &snapshot(&[("a", 1, 1)])).unwrap();
        store.save(WindowKind::LastCheck, "lastcheck", &snapshot(&[("b", 2, 2)])).unwrap();

        assert!(store.load(WindowKind::Daily).stats.contains_key("a"));
        assert!(store.load(WindowKind::LastCheck).stats.contains_key("b"));
        assert_eq!(store.load(WindowKind::Weekly), WindowState::default());
    }

    #[test]
    fn reads_records_with_null_period_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        fs::write(
            store.path_for(WindowKind::Daily),
            r#"{"period_key": null, "stats": {"10.0.0.2/32": {"rx": 5, "tx": 6}}}"#,
        )
        .unwrap();

        let state = store.load(WindowKind::Daily);

        assert!(state.period_key.is_none());
        assert_eq!(state.stats["10.0.0.2/32"], PeerCounters { rx: 5, tx: 6 });
    }

    #[test]
    fn saved_file_uses_period_key_and_stats_fields() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save(WindowKind::Daily, "2024-10-19", &snapshot(&[("p", 7, 8)])).unwrap();

        let raw = fs::read_to_string(store.path_for(WindowKind::Daily)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["period_key"], "2024-10-19");
        assert_eq!(value["stats"]["p"]["rx"], 7);
        assert_eq!(value["stats"]["p"]["tx"], 8);
    }

    #[test]
    fn save_into_unwritable_location_reports_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let store = store(&blocker);

        let err = store.save(WindowKind::Daily, "2024-10-19", &Snapshot::new()).unwrap_err();

        assert!(matches!(err, StatsError::Persist { .. }));
    }
}

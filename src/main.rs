use chrono::{Local, NaiveDateTime};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

mod accounting;
mod config;
mod error;
mod monitor;
mod period;
mod report;
mod store;
mod wg_monitor;

use accounting::{compute_deltas, effective_baseline, rolled_over};
use config::{parse_period_list, Config, PeriodList};
use error::Result;
use monitor::CounterSource;
use period::period_key;
use store::WindowStore;
use wg_monitor::parse_wg_dump;

// ==================== 命令行参数定义 ====================
#[derive(Parser, Debug)]
#[command(author, version, about = "WireGuard peer 流量按日/周/月统计工具", long_about = None)]
struct Cli {
    /// wg 所在的 Docker 容器名（host 表示直接在本机执行 wg）
    #[arg(short, long, env = "WG_CONTAINER", default_value = config::DEFAULT_CONTAINER)]
    container: String,

    /// WireGuard 网卡名
    #[arg(short, long, env = "WG_INTERFACE", default_value = config::DEFAULT_INTERFACE)]
    interface: String,

    /// 窗口状态文件目录
    #[arg(short = 'd', long, env = "WG_DATA_DIR", default_value = config::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// 要统计的窗口，逗号分隔
    #[arg(
        short,
        long,
        env = "PERIOD",
        default_value = config::DEFAULT_PERIODS,
        value_parser = parse_period_list,
        help = "可选：daily、weekly、monthly、lastcheck"
    )]
    periods: PeriodList,

    /// 从已保存的 wg show dump 文件读取，而不是执行 wg
    #[arg(long, env = "WG_DUMP_FILE")]
    dump_file: Option<PathBuf>,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

// ==================== 日志初始化 ====================
fn init_logging(level: LevelFilter) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", level.to_string());

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}

// ==================== 执行单次统计 ====================
/// 读取计数器并依次处理每个窗口，返回完整报告
///
/// 计数器读取失败时直接返回错误；窗口状态保存失败只记录日志。
fn run_pass(
    config: &Config,
    source: &mut dyn CounterSource,
    store: &WindowStore,
    now: NaiveDateTime,
) -> Result<String> {
    log::info!("通过 {} 读取 {}:{} 的计数器", source.name(), config.container, config.interface);
    let lines = source.read_dump()?;
    let current = parse_wg_dump(&lines);
    log::info!("解析到 {} 个 peer", current.len());

    let mut out = report::render_header(&config.container, &config.interface, now);

    for &kind in &config.periods {
        let key = period_key(kind, now);
        let state = store.load(kind);

        let rolled = rolled_over(kind, state.period_key.as_deref(), &key);
        if rolled {
            log::info!("{kind} 窗口进入新周期 {key}，基线清空");
        }
        let baseline = effective_baseline(state.stats, rolled);

        let deltas = compute_deltas(&current, &baseline);
        out.push_str(&report::render_section(kind, &deltas));

        if let Err(e) = store.save(kind, &key, &current) {
            log::warn!("{e}");
        }
    }

    Ok(out)
}

// ==================== 主函数 ====================
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let config = match Config::new(cli.container, cli.interface, cli.data_dir, cli.periods, cli.dump_file) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let mut source = config.source();
    let store = config.store();

    match run_pass(&config, source.as_mut(), &store, Local::now().naive_local()) {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

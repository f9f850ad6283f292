//! STAG Updater - aktualizátor definic vozů
//!
//! 非官方的 STAG 车辆定义更新工具：
//! - 定位 STAG 安装目录（包含 stag.exe）
//! - 比较本地与服务器的定义版本
//! - 下载新的 vozy.ini
//! - 下载车辆图片并转换为 STAG 使用的 32 位 BMP

#![allow(dead_code)]

mod config;
mod error;
mod formats;
mod image;
mod prompt;
mod remote;
mod sync;

use anyhow::Context;
use clap::Parser;
use config::{LOG_FILE_PREFIX, SETTINGS_FILE, UpdaterConfig};
use formats::Catalog;
use formats::settings::{is_stag_directory, load_saved_directory, save_directory, validate_stag_directory};
use prompt::Prompter;
use remote::RemoteClient;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sync::{ConsoleProgress, delete_old_images, sync_images};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 应用程序名称
pub const APP_NAME: &str = "STAG Updater";

/// 应用程序版本（从 Cargo.toml 读取）
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "stag_updater", version, about = "Neoficiální aplikace na aktualizování STAG definic")]
struct Cli {
    /// Složka se Stag (obsahuje stag.exe)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Adresa serveru; přebíjí [update] base ze stag.ini
    #[arg(long)]
    base_url: Option<String>,

    /// Odpovědět "ano" na všechny otázky
    #[arg(short, long)]
    yes: bool,

    /// Smazat staré obrázky bez ptaní
    #[arg(long, conflicts_with = "no_wipe")]
    wipe: bool,

    /// Nemazat staré obrázky
    #[arg(long)]
    no_wipe: bool,

    /// Podrobný výpis
    #[arg(short, long)]
    verbose: bool,

    /// Časový limit připojení v sekundách
    #[arg(long, default_value_t = 30)]
    connect_timeout: u64,
}

/// 初始化日志：控制台 + stag_updater.log
fn init_logging(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .build(log_dir);

    let (file_layer, guard) = match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        Err(err) => {
            eprintln!("Nelze otevřít log soubor: {err}");
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    guard
}

fn print_banner() {
    println!("==================================================");
    println!("            AKTUALIZÁTOR DEFINIC VOZŮ             ");
    println!("Neoficiální aplikace na aktualizování STAG definic");
    println!("    Před aktualizací doporučuji udělat ZÁLOHU!    ");
    println!("==================================================");
}

/// 确定 STAG 目录：命令行 > 已保存的设置（需确认）> 交互输入
fn resolve_stag_directory<R: BufRead, W: Write>(
    cli_dir: Option<&Path>,
    settings_path: &Path,
    prompter: &mut Prompter<R, W>,
) -> error::Result<PathBuf> {
    if let Some(dir) = cli_dir {
        return validate_stag_directory(dir);
    }

    let saved = load_saved_directory(settings_path).unwrap_or_else(|err| {
        warn!("nelze načíst nastavení {}: {}", settings_path.display(), err);
        None
    });

    if let Some(dir) = saved {
        if is_stag_directory(&dir) {
            let question = format!("Je složka se Stag: {} správná? (Y/N)", dir.display());
            if prompter.ask_yes_no(&question)? {
                return Ok(dir);
            }
        } else {
            warn!("uložená složka {} neobsahuje stag.exe", dir.display());
        }
    }

    prompter.ask_directory()
}

/// 比较本地与服务器版本，失败时只记录错误
async fn report_versions(client: &RemoteClient, catalog: &Catalog) {
    let local = catalog.version();
    info!("Verze definice na tomto PC: {}", local);
    info!("Zjišťuji novou verzi definice...");

    match client.fetch_server_version().await {
        Ok(server) => {
            info!("Verze definice na serveru: {}", server);
            if local < server {
                info!("Na serveru je novější verze definice vozů");
            } else {
                info!("Máte aktuální verzi definice vozů");
            }
        }
        Err(err) => error!("Chyba/Error: {}", err),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, Path::new("."));

    print_banner();
    info!("{} {}", APP_NAME, APP_VERSION);

    let mut prompter = Prompter::stdio(cli.yes);
    let settings_path = Path::new(SETTINGS_FILE);

    let stag_dir = resolve_stag_directory(cli.dir.as_deref(), settings_path, &mut prompter)
        .context("nelze určit složku se Stag")?;
    if let Err(err) = save_directory(settings_path, &stag_dir) {
        warn!("nelze uložit nastavení: {}", err);
    }

    let config = UpdaterConfig::load(
        &stag_dir,
        cli.base_url.as_deref(),
        Duration::from_secs(cli.connect_timeout),
    )?;
    info!("Server: {}", config.base_url);

    let catalog_path = config.catalog_path();
    let catalog = Catalog::load_or_empty(&catalog_path);

    let client = RemoteClient::new(&config.base_url, config.connect_timeout)?;
    report_versions(&client, &catalog).await;

    if !prompter.ask_yes_no("Stáhnout? (Y/N)")? {
        return Ok(());
    }

    let images_dir = config.images_dir();
    tokio::fs::create_dir_all(&images_dir)
        .await
        .with_context(|| format!("nelze vytvořit {}", images_dir.display()))?;

    let wipe = if cli.wipe {
        true
    } else if cli.no_wipe {
        false
    } else {
        prompter.ask_yes_no("Smazat starou definici (doporučeno)? (Y/N)")?
    };
    if wipe {
        info!("Mažu starou definici...");
        match delete_old_images(&images_dir).await {
            Ok(report) => info!(
                "Stará definice smazána (smazáno: {}, chyby: {})",
                report.deleted, report.failed
            ),
            Err(err) => error!("Chyba čtení adresáře s vozy: {}", err),
        }
    }

    info!("Stahuji novou definici vozů...");
    let definitions = client
        .fetch_definitions()
        .await
        .context("stažení definice selhalo")?;
    info!("Definice stažena... - aktualizuji");

    tokio::fs::write(&catalog_path, &definitions)
        .await
        .with_context(|| format!("nelze zapsat {}", catalog_path.display()))?;
    let catalog = Catalog::from_bytes(&definitions).context("stažená definice je neplatná")?;

    let encoder = crate::image::PaddedBmpEncoder::new();
    let report = sync_images(&catalog, &images_dir, &client, &encoder, &mut ConsoleProgress).await;
    info!(
        "Vozů: {}, s obrázkem: {}, uloženo obrázků: {}, chyb: {}",
        report.entries_total, report.entries_with_images, report.images_written, report.entries_failed
    );
    info!("Definice vozů byla aktualizována.");

    if !cli.yes {
        prompter.ask_yes_no("Ukončit aplikaci? (Y/N)")?;
    }

    Ok(())
}

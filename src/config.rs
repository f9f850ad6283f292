//! 运行配置

use crate::error::Result;
use crate::formats::ini_file::read_ini_file;
use crate::formats::settings::{base_url_from_stag_ini, normalize_base_url, validate_stag_directory};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 设置文件（位于工作目录）
pub const SETTINGS_FILE: &str = "stag_updater_settings.ini";
/// 日志文件前缀
pub const LOG_FILE_PREFIX: &str = "stag_updater";
/// STAG 目录中的车辆目录
pub const VOZY_DIR: &str = "vozy";
/// 车辆定义文件
pub const VOZY_INI: &str = "vozy.ini";
/// STAG 主配置文件
pub const STAG_INI: &str = "stag.ini";

/// 一次更新所需的全部配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdaterConfig {
    /// STAG 安装目录
    pub stag_dir: PathBuf,
    /// 服务器地址，以 `/` 结尾
    pub base_url: String,
    /// 连接超时
    pub connect_timeout: Duration,
}

impl UpdaterConfig {
    /// 读取 stag.ini 中的服务器地址；`base_url_override` 优先
    pub fn load(stag_dir: &Path, base_url_override: Option<&str>, connect_timeout: Duration) -> Result<Self> {
        let stag_dir = validate_stag_directory(stag_dir)?;

        let base_url = match base_url_override {
            Some(url) => normalize_base_url(url),
            None => {
                let stag_ini_path = stag_dir.join(STAG_INI);
                let stag_ini = match read_ini_file(&stag_ini_path) {
                    Ok(ini) => Some(ini),
                    Err(err) => {
                        tracing::warn!("nelze načíst {}: {}", stag_ini_path.display(), err);
                        None
                    }
                };
                base_url_from_stag_ini(stag_ini.as_ref())
            }
        };

        Ok(Self {
            stag_dir,
            base_url,
            connect_timeout,
        })
    }

    /// `<STAG>/vozy`
    pub fn images_dir(&self) -> PathBuf {
        self.stag_dir.join(VOZY_DIR)
    }

    /// `<STAG>/vozy/vozy.ini`
    pub fn catalog_path(&self) -> PathBuf {
        self.images_dir().join(VOZY_INI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpdaterError;
    use crate::formats::settings::DEFAULT_BASE_URL;

    fn stag_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stag_updater_config_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("stag.exe"), b"MZ").unwrap();
        dir
    }

    #[test]
    fn test_paths() {
        let dir = stag_dir("paths");
        let config = UpdaterConfig::load(&dir, None, Duration::from_secs(30)).unwrap();

        assert_eq!(config.images_dir(), dir.join("vozy"));
        assert_eq!(config.catalog_path(), dir.join("vozy").join("vozy.ini"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_base_url_sources() {
        let dir = stag_dir("base");
        std::fs::write(dir.join(STAG_INI), b"[update]\nbase=http://mirror.test/vini\n").unwrap();

        let config = UpdaterConfig::load(&dir, None, Duration::from_secs(30)).unwrap();
        assert_eq!(config.base_url, "http://mirror.test/vini/");

        let config = UpdaterConfig::load(&dir, Some("http://cli.test/x/"), Duration::from_secs(30)).unwrap();
        assert_eq!(config.base_url, "http://cli.test/x/");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rejects_non_stag_directory() {
        let err = UpdaterConfig::load(Path::new("/nonexistent"), None, Duration::from_secs(30)).unwrap_err();
        assert!(matches!(err, UpdaterError::InvalidDirectory(_)));
    }
}

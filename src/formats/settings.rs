//! 更新器设置与 STAG 配置

use crate::error::{Result, UpdaterError};
use crate::formats::ini_file::parse_ini_str;
use ini::{EscapePolicy, Ini, WriteOption};
use std::path::{Path, PathBuf};

/// 设置节
pub const SETTINGS_SECTION: &str = "settings";
/// STAG 目录键
pub const STAG_DIRECTORY_KEY: &str = "stagDirectory";
/// stag.ini 中的更新节
pub const UPDATE_SECTION: &str = "update";
/// 服务器地址键
pub const BASE_URL_KEY: &str = "base";
/// 缺省服务器地址
pub const DEFAULT_BASE_URL: &str = "https://stag.jachyhm.cz/vini/";
/// STAG 目录中的标志文件
pub const STAG_EXECUTABLE: &str = "stag.exe";

/// 读取保存的 STAG 目录
pub fn load_saved_directory(settings_path: &Path) -> Result<Option<PathBuf>> {
    if !settings_path.exists() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(settings_path)?;
    let ini = parse_ini_str(&text)?;
    Ok(ini
        .get_from(Some(SETTINGS_SECTION), STAG_DIRECTORY_KEY)
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from))
}

/// 保存 STAG 目录
pub fn save_directory(settings_path: &Path, stag_dir: &Path) -> Result<()> {
    let mut ini = Ini::new();
    ini.with_section(Some(SETTINGS_SECTION))
        .set(STAG_DIRECTORY_KEY, stag_dir.to_string_lossy().into_owned());

    let opt = WriteOption {
        escape_policy: EscapePolicy::Nothing,
        ..WriteOption::default()
    };
    ini.write_to_file_opt(settings_path, opt)?;
    tracing::debug!("nastavení uloženo do {}", settings_path.display());
    Ok(())
}

/// 从 stag.ini 读取服务器地址，保证以 `/` 结尾
pub fn base_url_from_stag_ini(stag_ini: Option<&Ini>) -> String {
    let base = stag_ini
        .and_then(|ini| ini.get_from(Some(UPDATE_SECTION), BASE_URL_KEY))
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_BASE_URL);
    normalize_base_url(base)
}

/// 补全结尾的 `/`
pub fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// 目录存在且包含 stag.exe
pub fn is_stag_directory(dir: &Path) -> bool {
    dir.is_dir() && dir.join(STAG_EXECUTABLE).is_file()
}

/// 校验 STAG 目录
pub fn validate_stag_directory(dir: &Path) -> Result<PathBuf> {
    if is_stag_directory(dir) {
        Ok(dir.to_path_buf())
    } else {
        Err(UpdaterError::InvalidDirectory(dir.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::ini_file::parse_ini_bytes;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("stag_updater_settings_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_settings_roundtrip() {
        let dir = temp_dir("roundtrip");
        let settings = dir.join("stag_updater_settings.ini");

        assert_eq!(load_saved_directory(&settings).unwrap(), None);

        let stag = PathBuf::from(r"C:\Program Files\Stag");
        save_directory(&settings, &stag).unwrap();
        assert_eq!(load_saved_directory(&settings).unwrap(), Some(stag));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_base_url() {
        assert_eq!(base_url_from_stag_ini(None), DEFAULT_BASE_URL);

        let ini = parse_ini_bytes(b"[update]\nbase=http://example.test/vini\n").unwrap();
        assert_eq!(base_url_from_stag_ini(Some(&ini)), "http://example.test/vini/");

        let ini = parse_ini_bytes(b"[update]\nbase=\n").unwrap();
        assert_eq!(base_url_from_stag_ini(Some(&ini)), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_stag_directory() {
        let dir = temp_dir("marker");
        assert!(!is_stag_directory(&dir));
        assert!(matches!(
            validate_stag_directory(&dir),
            Err(UpdaterError::InvalidDirectory(_))
        ));

        std::fs::write(dir.join(STAG_EXECUTABLE), b"MZ").unwrap();
        assert!(is_stag_directory(&dir));
        assert_eq!(validate_stag_directory(&dir).unwrap(), dir);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}

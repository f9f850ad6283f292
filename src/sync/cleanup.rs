//! 删除旧的车辆图片

use crate::error::Result;
use std::fs::FileType;
use std::io;
use std::path::Path;
use tracing::{debug, error};

/// 删除结果统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: usize,
    pub failed: usize,
}

fn is_bitmap(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"))
}

/// 删除单个目录项；失败只记录日志并计数
async fn delete_entry(path: &Path, file_type: io::Result<FileType>, report: &mut CleanupReport) {
    if !is_bitmap(path) {
        return;
    }

    match file_type {
        Ok(file_type) if !file_type.is_file() => return,
        Ok(_) => {}
        Err(err) => {
            error!("Chyba čtení souboru {}: {}", path.display(), err);
            report.failed += 1;
            return;
        }
    }

    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!("smazán soubor: {}", path.display());
            report.deleted += 1;
        }
        Err(err) => {
            error!("Chyba mazání souboru {}: {}", path.display(), err);
            report.failed += 1;
        }
    }
}

/// 删除目录中所有 `.bmp` 文件；只有打开目录失败才返回错误
pub async fn delete_old_images(images_dir: &Path) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();
    let mut entries = tokio::fs::read_dir(images_dir).await?;

    loop {
        let entry = match entries.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(err) => {
                // 出错后的目录项不可靠，停止遍历但保留已完成的删除
                error!("Chyba čtení adresáře {}: {}", images_dir.display(), err);
                report.failed += 1;
                break;
            }
        };

        let path = entry.path();
        delete_entry(&path, entry.file_type().await, &mut report).await;
    }

    Ok(report)
}

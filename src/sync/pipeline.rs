//! 图片下载、转换与保存
//!
//! 按目录顺序逐个处理条目，每个条目从第 0 张图片开始依次下载，
//! 直到序号超过 `imgex`。任何一张失败都会放弃该条目剩余的图片，然后继续下一个条目。

use crate::error::Result;
use crate::formats::{Catalog, CatalogEntry};
use crate::image::{BitmapEncoder, convert_to_legacy_bmp};
use crate::remote::ImageFetcher;
use crate::sync::progress::{ProgressSink, format_progress_line};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// 同步结果统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// 目录中的条目数
    pub entries_total: usize,
    /// 有图片的条目数
    pub entries_with_images: usize,
    /// 写入的图片数
    pub images_written: usize,
    /// 中途失败的条目数
    pub entries_failed: usize,
}

/// 图片文件名：第 0 张为 `vuz_<条目>.bmp`，其余为 `vuz__<序号>_<条目>.bmp`
pub fn image_file_name(entry_key: &str, variant: u32) -> String {
    if variant == 0 {
        format!("vuz_{entry_key}.bmp")
    } else {
        format!("vuz__{variant}_{entry_key}.bmp")
    }
}

/// 下载目录中所有条目的图片并写入 `images_dir`
pub async fn sync_images<F, E, P>(
    catalog: &Catalog,
    images_dir: &Path,
    fetcher: &F,
    encoder: &E,
    progress: &mut P,
) -> SyncReport
where
    F: ImageFetcher,
    E: BitmapEncoder + ?Sized,
    P: ProgressSink + ?Sized,
{
    info!("Stahuji nové obrázky vozů, jsou-li dostupné...");

    let total = catalog.len();
    let mut report = SyncReport {
        entries_total: total,
        ..SyncReport::default()
    };

    for (position, entry) in catalog.entries().enumerate() {
        let Some(image_id) = entry.image_id else {
            continue;
        };
        report.entries_with_images += 1;

        for variant in 0..=entry.variant_count {
            let message = format!(
                "Stahuji obrázek pro vůz {} (id: {}, img: {})...",
                entry.key, image_id, variant
            );
            progress.report(&format_progress_line(&message, position + 1, total));

            match sync_variant(&entry, image_id, variant, images_dir, fetcher, encoder).await {
                Ok(path) => {
                    debug!("uloženo: {}", path.display());
                    report.images_written += 1;
                }
                Err(err) => {
                    error!(
                        "Chyba při stahování vozu {} (id: {}, img: {}): {}",
                        entry.key, image_id, variant, err
                    );
                    report.entries_failed += 1;
                    break;
                }
            }
        }
    }

    info!("Update - hotovo");
    report
}

async fn sync_variant<F, E>(
    entry: &CatalogEntry<'_>,
    image_id: &str,
    variant: u32,
    images_dir: &Path,
    fetcher: &F,
    encoder: &E,
) -> Result<PathBuf>
where
    F: ImageFetcher,
    E: BitmapEncoder + ?Sized,
{
    let data = fetcher.fetch_image(image_id, variant).await?;
    let bitmap = convert_to_legacy_bmp(&data, encoder)?;

    let path = images_dir.join(image_file_name(entry.key, variant));
    tokio::fs::write(&path, bitmap).await?;
    Ok(path)
}

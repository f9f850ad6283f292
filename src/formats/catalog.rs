//! 车辆定义目录 (vozy.ini)
//!
//! 每个节是一个车辆条目，`[default]` 节保存版本号，不参与遍历。

use crate::error::Result;
use crate::formats::ini_file::{last_value, parse_ini_bytes, parse_leading_int};
use ini::Ini;
use std::path::Path;

/// 元数据节名
pub const METADATA_SECTION: &str = "default";
/// 版本号键
pub const VERSION_KEY: &str = "_verze";
/// 缺省版本号
pub const DEFAULT_VERSION: i64 = 100;
/// 图片 ID 键
pub const IMAGE_ID_KEY: &str = "img";
/// 附加图片数量键
pub const VARIANT_COUNT_KEY: &str = "imgex";
/// 表示“无图片”的图片 ID
pub const NO_IMAGE_SENTINEL: &str = "-1";

/// 车辆定义目录
#[derive(Debug, Clone)]
pub struct Catalog {
    ini: Ini,
}

/// 目录中的单个条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    /// 条目 ID（节名）
    pub key: &'a str,
    /// 外部图片 ID，`None` 表示无图片
    pub image_id: Option<&'a str>,
    /// 附加图片的最大序号
    pub variant_count: u32,
}

impl CatalogEntry<'_> {
    /// 需要下载的图片数量
    pub fn image_count(&self) -> u32 {
        match self.image_id {
            Some(_) => self.variant_count.saturating_add(1),
            None => 0,
        }
    }
}

impl Catalog {
    pub fn new(ini: Ini) -> Self {
        Self { ini }
    }

    /// 空目录（本地还没有 vozy.ini）
    pub fn empty() -> Self {
        Self::new(Ini::new())
    }

    /// 从 Windows-1250 字节解析
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(parse_ini_bytes(bytes)?))
    }

    /// 读取目录文件，文件不存在时返回空目录
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("soubor {} neexistuje, začínám s prázdnou definicí", path.display());
            return Ok(Self::empty());
        }
        Self::from_bytes(&std::fs::read(path)?)
    }

    /// 读取本地目录；文件损坏时记录警告并返回空目录，以便重新下载
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            tracing::warn!("nelze načíst {}: {}, začínám s prázdnou definicí", path.display(), err);
            Self::empty()
        })
    }

    /// 本地定义版本号
    pub fn version(&self) -> i64 {
        self.ini
            .section(Some(METADATA_SECTION))
            .and_then(|props| last_value(props, VERSION_KEY))
            .and_then(parse_leading_int)
            .unwrap_or(DEFAULT_VERSION)
    }

    /// 按文件顺序遍历条目，跳过元数据节；每次调用重新开始
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> + '_ {
        self.ini.iter().filter_map(|(section, props)| {
            let key = section.filter(|s| *s != METADATA_SECTION)?;
            let image_id = last_value(props, IMAGE_ID_KEY)
                .map(str::trim)
                .filter(|id| !id.is_empty() && *id != NO_IMAGE_SENTINEL);
            let variant_count = last_value(props, VARIANT_COUNT_KEY)
                .and_then(parse_leading_int)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0);

            Some(CatalogEntry {
                key,
                image_id,
                variant_count,
            })
        })
    }

    /// 条目数量（不含元数据节）
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }
}

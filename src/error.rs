//! 错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 更新器错误类型
#[derive(Error, Debug)]
pub enum UpdaterError {
    #[error("neplatná délka pixelového bufferu: {0} (musí být násobkem 4)")]
    InvalidBufferLength(usize),

    #[error("nepodporovaná bitová hloubka: {0}")]
    UnsupportedBitDepth(u16),

    #[error("chyba stahování: {0}")]
    Fetch(String),

    #[error("chyba dekódování obrázku: {0}")]
    Decode(#[from] image::ImageError),

    #[error("chyba souborového systému: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("chyba čtení INI: {0}")]
    Ini(#[from] ini::ParseError),

    #[error("složka neobsahuje stag.exe: {}", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("neplatná verze definice: {0}")]
    Version(String),
}

impl From<reqwest::Error> for UpdaterError {
    fn from(err: reqwest::Error) -> Self {
        UpdaterError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, UpdaterError>;

//! 像素通道重排

use crate::error::{Result, UpdaterError};

/// 将 RGBA 像素重排为 `[0, B, G, R]`
///
/// 每个 4 字节像素 `[A, B, C, D]` 输出为 `[0, C, B, A]`，第四个通道（透明度）被丢弃：
/// 目标程序只接受不透明位图，服务器返回的透明度不会保留。
pub fn remap_rgba_to_zbgr(pixels: &[u8]) -> Result<Vec<u8>> {
    if pixels.len() % 4 != 0 {
        return Err(UpdaterError::InvalidBufferLength(pixels.len()));
    }

    let mut output = Vec::with_capacity(pixels.len());
    for px in pixels.chunks_exact(4) {
        output.extend_from_slice(&[0, px[2], px[1], px[0]]);
    }

    Ok(output)
}

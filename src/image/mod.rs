//! 图像处理模块

pub mod bitmap;
pub mod channels;
pub mod legacy;

pub use bitmap::{BitmapEncoder, PaddedBmpEncoder};
pub use channels::remap_rgba_to_zbgr;
pub use legacy::encode_legacy_bmp;

use crate::error::Result;

/// 计算行字节数（用于 BMP 格式）
pub fn width_bytes(bit_count: u32, width: u32) -> u32 {
    ((width * bit_count) + 31) / 32 * 4
}

/// 将服务器返回的压缩图片转换为目标程序使用的 32 位 BMP
pub fn convert_to_legacy_bmp<E>(data: &[u8], encoder: &E) -> Result<Vec<u8>>
where
    E: BitmapEncoder + ?Sized,
{
    let decoded = ::image::load_from_memory(data)?.to_rgba8();
    let (width, height) = decoded.dimensions();
    tracing::debug!("dekódováno: {}x{}", width, height);

    let pixels = remap_rgba_to_zbgr(decoded.as_raw())?;
    encode_legacy_bmp(encoder, &pixels, width, height)
}

//! 通用 BMP 编码器

use crate::error::{Result, UpdaterError};
use crate::image::width_bytes;
use byteorder::{LittleEndian, WriteBytesExt};

/// 文件头大小 (BITMAPFILEHEADER)
pub const FILE_HEADER_SIZE: u32 = 14;
/// 信息头大小 (BITMAPINFOHEADER)
pub const INFO_HEADER_SIZE: u32 = 40;
/// 像素数据偏移
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// 72 DPI
const PIXELS_PER_METER: i32 = 2835;

/// 无压缩位图编码器
pub trait BitmapEncoder {
    /// 编码完整的位图文件（文件头 + 信息头 + 像素行）
    fn encode(&self, pixels: &[u8], width: u32, height: u32, bit_depth: u16) -> Result<Vec<u8>>;
}

/// 32 位 BMP 编码器
///
/// 输入像素为自上而下的 `[0, B, G, R]`，写出自下而上的 `B, G, R, 0` 行。
/// 整个文件按 4 字节对齐补零，两个大小字段都把补齐字节算在内；
/// 32 位图像总是多出 2 个字节，由 [`crate::image::legacy`] 修正。
#[derive(Debug, Default, Clone, Copy)]
pub struct PaddedBmpEncoder;

impl PaddedBmpEncoder {
    pub const BIT_DEPTH: u16 = 32;

    pub fn new() -> Self {
        Self
    }
}

impl BitmapEncoder for PaddedBmpEncoder {
    fn encode(&self, pixels: &[u8], width: u32, height: u32, bit_depth: u16) -> Result<Vec<u8>> {
        if bit_depth != Self::BIT_DEPTH {
            return Err(UpdaterError::UnsupportedBitDepth(bit_depth));
        }

        let stride = width_bytes(u32::from(bit_depth), width) as usize;
        let rows = height as usize;
        let expected = stride
            .checked_mul(rows)
            .ok_or(UpdaterError::InvalidBufferLength(pixels.len()))?;
        if pixels.len() != expected {
            return Err(UpdaterError::InvalidBufferLength(pixels.len()));
        }

        let unpadded = PIXEL_DATA_OFFSET as usize + expected;
        let pad = (4 - unpadded % 4) % 4;
        let file_size = u32::try_from(unpadded + pad)
            .map_err(|_| UpdaterError::InvalidBufferLength(pixels.len()))?;
        let image_size = file_size - PIXEL_DATA_OFFSET;

        let mut out = Vec::with_capacity(file_size as usize);

        // 文件头
        out.extend_from_slice(b"BM");
        out.write_u32::<LittleEndian>(file_size)?;
        out.write_u32::<LittleEndian>(0)?;
        out.write_u32::<LittleEndian>(PIXEL_DATA_OFFSET)?;

        // 信息头，高度为正表示自下而上
        out.write_u32::<LittleEndian>(INFO_HEADER_SIZE)?;
        out.write_i32::<LittleEndian>(width as i32)?;
        out.write_i32::<LittleEndian>(height as i32)?;
        out.write_u16::<LittleEndian>(1)?;
        out.write_u16::<LittleEndian>(bit_depth)?;
        out.write_u32::<LittleEndian>(0)?; // BI_RGB
        out.write_u32::<LittleEndian>(image_size)?;
        out.write_i32::<LittleEndian>(PIXELS_PER_METER)?;
        out.write_i32::<LittleEndian>(PIXELS_PER_METER)?;
        out.write_u32::<LittleEndian>(0)?;
        out.write_u32::<LittleEndian>(0)?;

        for row in (0..rows).rev() {
            let start = row * stride;
            for px in pixels[start..start + stride].chunks_exact(4) {
                out.extend_from_slice(&[px[1], px[2], px[3], px[0]]);
            }
        }

        out.resize(out.len() + pad, 0);
        Ok(out)
    }
}

//! 旧版 32 位 BMP 输出修正
//!
//! 通用编码器在像素数据后多写 2 个字节，并把它们计入文件大小和图像大小字段。
//! 目标程序信任文件头，所以这里截掉多余字节并重写两个字段。
//! 更换编码器前需要先确认新编码器是否有同样的问题。

use crate::error::Result;
use crate::image::bitmap::BitmapEncoder;
use byteorder::{ByteOrder, LittleEndian};

/// 固定位深
pub const LEGACY_BIT_DEPTH: u16 = 32;
/// 编码器多写的字节数
pub const TRAILING_GARBAGE_LEN: usize = 2;
/// 文件大小字段偏移
pub const FILE_SIZE_OFFSET: usize = 0x02;
/// 图像数据大小字段偏移
pub const IMAGE_SIZE_OFFSET: usize = 0x22;

/// 编码为目标程序可读的 32 位 BMP
pub fn encode_legacy_bmp<E>(encoder: &E, pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>>
where
    E: BitmapEncoder + ?Sized,
{
    let mut data = encoder.encode(pixels, width, height, LEGACY_BIT_DEPTH)?;

    if data.len() >= TRAILING_GARBAGE_LEN {
        data.truncate(data.len() - TRAILING_GARBAGE_LEN);
    }

    let file_size = data.len() as u32;
    patch_u32(&mut data, FILE_SIZE_OFFSET, file_size);

    let image_size = width.wrapping_mul(height).wrapping_mul(4);
    patch_u32(&mut data, IMAGE_SIZE_OFFSET, image_size);

    Ok(data)
}

fn patch_u32(data: &mut [u8], offset: usize, value: u32) {
    if let Some(field) = data.get_mut(offset..offset + 4) {
        LittleEndian::write_u32(field, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::bitmap::PaddedBmpEncoder;
    use proptest::prelude::*;

    /// 返回固定内容的编码器
    struct FixedEncoder(Vec<u8>);

    impl BitmapEncoder for FixedEncoder {
        fn encode(&self, _: &[u8], _: u32, _: u32, _: u16) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_truncates_and_patches() {
        let raw = vec![0xEE; 64];
        let out = encode_legacy_bmp(&FixedEncoder(raw), &[], 2, 3).unwrap();

        assert_eq!(out.len(), 62);
        assert_eq!(LittleEndian::read_u32(&out[2..6]), 62);
        assert_eq!(LittleEndian::read_u32(&out[0x22..0x26]), 2 * 3 * 4);
        assert_eq!(out[0], 0xEE);
        assert_eq!(out[61], 0xEE);
    }

    #[test]
    fn test_short_buffers() {
        assert!(encode_legacy_bmp(&FixedEncoder(vec![]), &[], 1, 1).unwrap().is_empty());
        assert_eq!(encode_legacy_bmp(&FixedEncoder(vec![7]), &[], 1, 1).unwrap(), vec![7]);

        // 截断后不足以容纳图像大小字段
        let out = encode_legacy_bmp(&FixedEncoder(vec![0; 20]), &[], 1, 1).unwrap();
        assert_eq!(out.len(), 18);
        assert_eq!(LittleEndian::read_u32(&out[2..6]), 18);
    }

    #[test]
    fn test_readable_by_standard_decoder() {
        // 1x2：上红下蓝，[0, B, G, R]
        let pixels = [0, 0, 0, 255, 0, 255, 0, 0];
        let bmp = encode_legacy_bmp(&PaddedBmpEncoder::new(), &pixels, 1, 2).unwrap();

        let decoded = ::image::load_from_memory_with_format(&bmp, ::image::ImageFormat::Bmp)
            .unwrap()
            .to_rgb8();
        assert_eq!(decoded.dimensions(), (1, 2));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(0, 1).0, [0, 0, 255]);
    }

    proptest! {
        #[test]
        fn prop_header_matches_length(width in 1u32..24, height in 1u32..24) {
            let encoder = PaddedBmpEncoder::new();
            let pixels = vec![0x5A; (width * height * 4) as usize];

            let raw = encoder.encode(&pixels, width, height, LEGACY_BIT_DEPTH).unwrap();
            let out = encode_legacy_bmp(&encoder, &pixels, width, height).unwrap();

            prop_assert_eq!(out.len(), raw.len() - 2);
            prop_assert_eq!(LittleEndian::read_u32(&out[2..6]) as usize, out.len());
            prop_assert_eq!(LittleEndian::read_u32(&out[0x22..0x26]), width * height * 4);
            prop_assert_eq!(&out[..2], &raw[..2]);
            prop_assert_eq!(&out[6..0x22], &raw[6..0x22]);
            prop_assert_eq!(&out[0x26..], &raw[0x26..out.len()]);
        }
    }
}

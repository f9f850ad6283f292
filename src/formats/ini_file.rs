//! INI 文件读取
//! STAG 写出的 INI 文件使用 Windows-1250 编码
//!
//! STAG 的文件按宽松规则逐行解释：行内 `;`/`#` 注释、没有 `=` 的裸键、
//! 没有 `]` 的节头都可能出现。解析前先把每一行整理成 rust-ini 接受的形式。

use crate::error::Result;
use encoding_rs::WINDOWS_1250;
use ini::{Ini, ParseOption, Properties};
use std::borrow::Cow;
use std::path::Path;

/// 裸键的值
pub const BARE_KEY_VALUE: &str = "true";

/// 解析选项：不处理转义，保留 Windows 路径中的反斜杠
pub fn parse_option() -> ParseOption {
    ParseOption {
        enabled_escape: false,
        ..ParseOption::default()
    }
}

/// 将 Windows-1250 字节解码为字符串
pub fn decode_windows_1250(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = WINDOWS_1250.decode(bytes);
    if had_errors {
        tracing::warn!("INI obsahuje neplatné znaky pro Windows-1250");
    }
    text
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}

/// 去掉值中的行内注释；`\;` `\#` `\\` 表示字面字符，其余反斜杠原样保留
pub fn strip_inline_comment(value: &str) -> Cow<'_, str> {
    let value = value.trim();
    if is_quoted(value) || !value.contains([';', '#', '\\']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut escaped = false;
    for ch in value.chars() {
        if escaped {
            if !matches!(ch, '\\' | ';' | '#') {
                out.push('\\');
            }
            out.push(ch);
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            ';' | '#' => break,
            _ => out.push(ch),
        }
    }
    if escaped {
        out.push('\\');
    }

    Cow::Owned(out.trim().to_string())
}

/// 把一行整理成 rust-ini 接受的形式；`None` 表示丢弃该行
fn normalize_line(line: &str) -> Option<Cow<'_, str>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with([';', '#']) {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix('[') {
        return match rest.strip_suffix(']') {
            Some(name) if !name.contains(']') => Some(Cow::Borrowed(trimmed)),
            _ => {
                tracing::warn!("ignoruji neplatný řádek INI: {}", trimmed);
                None
            }
        };
    }

    let (key, value) = match trimmed.split_once('=') {
        Some((key, value)) => (key.trim(), strip_inline_comment(value)),
        None => (trimmed, Cow::Borrowed(BARE_KEY_VALUE)),
    };
    if key.is_empty() {
        tracing::warn!("ignoruji řádek INI bez klíče: {}", trimmed);
        return None;
    }

    Some(Cow::Owned(format!("{key}={value}")))
}

/// 逐行整理 INI 文本；被丢弃的行保留为空行，使错误位置的行号不变
pub fn normalize_ini_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if let Some(line) = normalize_line(line) {
            out.push_str(&line);
        }
        out.push('\n');
    }
    out
}

/// 同一节中重复的键以最后一个值为准
pub fn last_value<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props.get_all(key).next_back()
}

/// 读取开头的十进制整数，忽略其后的字符
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    let number: i64 = digits[..end].parse().ok()?;
    Some(if negative { -number } else { number })
}

/// 解析 UTF-8 文本
pub fn parse_ini_str(text: &str) -> Result<Ini> {
    Ok(Ini::load_from_str_opt(&normalize_ini_text(text), parse_option())?)
}

/// 解码并解析 INI 字节
pub fn parse_ini_bytes(bytes: &[u8]) -> Result<Ini> {
    parse_ini_str(&decode_windows_1250(bytes))
}

/// 读取 Windows-1250 编码的 INI 文件
pub fn read_ini_file(path: &Path) -> Result<Ini> {
    tracing::debug!("čtu INI: {}", path.display());
    let raw = std::fs::read(path)?;
    parse_ini_bytes(&raw)
}

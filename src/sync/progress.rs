//! 下载进度输出

/// 消息部分的宽度
pub const MESSAGE_WIDTH: usize = 80;
/// 百分比部分的宽度
pub const PERCENT_WIDTH: usize = 6;

/// 进度输出目标
pub trait ProgressSink {
    fn report(&mut self, line: &str);
}

/// 输出到标准输出
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn report(&mut self, line: &str) {
        println!("{line}");
    }
}

/// 格式化进度行：消息用 `.` 补齐到固定宽度，百分比右对齐
pub fn format_progress_line(message: &str, current: usize, total: usize) -> String {
    let percentage = if total == 0 {
        100.0
    } else {
        current as f64 / total as f64 * 100.0
    };
    let percentage = format!("{percentage:.2}");

    format!("{message:.<MESSAGE_WIDTH$}{percentage:.>PERCENT_WIDTH$}%")
}

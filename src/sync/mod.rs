//! 车辆图片同步模块

pub mod cleanup;
pub mod pipeline;
pub mod progress;

pub use cleanup::delete_old_images;
pub use pipeline::sync_images;
pub use progress::ConsoleProgress;

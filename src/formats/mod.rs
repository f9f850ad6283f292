//! 配置与定义文件解析模块

pub mod catalog;
pub mod ini_file;
pub mod settings;

pub use catalog::{Catalog, CatalogEntry};

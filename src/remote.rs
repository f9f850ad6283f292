//! 定义服务器客户端
//!
//! 服务器提供三个接口：
//! - `getversion.php`：第一行为定义版本号
//! - `getvini.php`：完整的 vozy.ini（Windows-1250）
//! - `getimg.php?obrid=<序号>&id=<图片ID>`：PNG 图片

use crate::error::{Result, UpdaterError};
use reqwest::{Client, Url};
use std::time::Duration;

const VERSION_ENDPOINT: &str = "getversion.php";
const DEFINITIONS_ENDPOINT: &str = "getvini.php";
const IMAGE_ENDPOINT: &str = "getimg.php";

/// 图片来源
pub trait ImageFetcher {
    /// 获取指定图片 ID 的第 `variant` 张图片的原始字节
    async fn fetch_image(&self, image_id: &str, variant: u32) -> Result<Vec<u8>>;
}

/// HTTP 客户端
pub struct RemoteClient {
    http: Client,
    base_url: Url,
}

impl RemoteClient {
    /// `base_url` 必须以 `/` 结尾
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UpdaterError::Fetch(format!("neplatná adresa serveru {base_url}: {e}")))?;
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("stag_updater/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> Result<Url> {
        self.base_url
            .join(name)
            .map_err(|e| UpdaterError::Fetch(format!("neplatná adresa {name}: {e}")))
    }

    /// 图片下载地址
    pub fn image_url(&self, image_id: &str, variant: u32) -> Result<Url> {
        let mut url = self.endpoint(IMAGE_ENDPOINT)?;
        url.query_pairs_mut()
            .append_pair("obrid", &variant.to_string())
            .append_pair("id", image_id);
        Ok(url)
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>> {
        tracing::debug!("GET {}", url);
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpdaterError::Fetch(format!("HTTP {} ({})", status.as_u16(), url)));
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// 服务器上的定义版本号
    pub async fn fetch_server_version(&self) -> Result<i64> {
        let body = self.get_bytes(self.endpoint(VERSION_ENDPOINT)?).await?;
        parse_server_version(&String::from_utf8_lossy(&body))
    }

    /// 下载新的 vozy.ini 原始字节
    pub async fn fetch_definitions(&self) -> Result<Vec<u8>> {
        self.get_bytes(self.endpoint(DEFINITIONS_ENDPOINT)?).await
    }
}

impl ImageFetcher for RemoteClient {
    async fn fetch_image(&self, image_id: &str, variant: u32) -> Result<Vec<u8>> {
        self.get_bytes(self.image_url(image_id, variant)?).await
    }
}

/// 解析版本接口的响应：第一行的整数
pub fn parse_server_version(body: &str) -> Result<i64> {
    let first = body.lines().next().unwrap_or("").trim();
    first
        .parse()
        .map_err(|_| UpdaterError::Version(first.to_string()))
}

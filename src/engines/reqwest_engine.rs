// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};

use crate::config::settings::ScannerSettings;
use crate::engines::deadline::Deadline;
use crate::engines::traits::{ContentSource, FetchError, FetchTarget, FetchedPage};

/// 最多跟随的重定向次数
const MAX_REDIRECTS: usize = 10;

/// 直连抓取引擎
///
/// 基于reqwest直接请求目标站点，自动跟随重定向，非 2xx 状态视为失败。
/// 客户端在所有请求间共享。
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建引擎
    ///
    /// # 参数
    ///
    /// * `user_agent` - 浏览器风格的 User-Agent
    /// * `timeout` - 客户端级别的超时，作为时限之外的兜底
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    pub fn from_settings(settings: &ScannerSettings) -> Result<Self, reqwest::Error> {
        Self::new(&settings.user_agent, settings.timeout())
    }
}

#[async_trait]
impl ContentSource for ReqwestEngine {
    async fn fetch(
        &self,
        target: &FetchTarget,
        deadline: &Deadline,
    ) -> Result<FetchedPage, FetchError> {
        let start = Instant::now();

        deadline
            .run(async {
                let response = self
                    .client
                    .get(target.url.clone())
                    .send()
                    .await
                    .map_err(|e| FetchError::from_reqwest(&e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::HttpStatus(status.as_u16()));
                }

                let final_url = response.url().to_string();
                let html = response
                    .text()
                    .await
                    .map_err(|e| FetchError::from_reqwest(&e))?;

                Ok(FetchedPage {
                    html,
                    final_url: Some(final_url),
                    response_time_ms: start.elapsed().as_millis() as u64,
                })
            })
            .await
    }

    fn name(&self) -> &str {
        "direct"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;

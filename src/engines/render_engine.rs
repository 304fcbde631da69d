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

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use url::Url;

use crate::config::settings::RenderProviderSettings;
use crate::engines::deadline::Deadline;
use crate::engines::traits::{ContentSource, FetchError, FetchTarget, FetchedPage};
use crate::utils::text_utils::truncate_chars;

/// 渲染服务错误正文的截取长度
const BODY_SNIPPET_CHARS: usize = 20;

/// 外部渲染引擎
///
/// 通过第三方渲染服务（ScraperAPI 风格的接口）获取执行过脚本的页面：
/// `GET {base_url}?api_key=...&url=...&render=true`。
/// 渲染服务自身的失败统一归为未知错误，超时除外。
pub struct RenderEngine {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    render_js: bool,
    label: String,
}

impl RenderEngine {
    /// 根据配置创建渲染引擎
    ///
    /// 未配置 API key 或 base_url 非法时返回错误
    pub fn new(settings: &RenderProviderSettings, timeout: Duration) -> anyhow::Result<Self> {
        let api_key = settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("render provider '{}' has no api key", settings.name))?
            .to_string();

        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("invalid render provider url: {}", settings.base_url))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build render provider client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
            render_js: settings.render_js,
            label: format!("render:{}", settings.name),
        })
    }

    /// 构造渲染服务请求URL
    pub fn request_url(&self, target: &FetchTarget) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api_key", &self.api_key);
            query.append_pair("url", target.url.as_str());
            if self.render_js {
                query.append_pair("render", "true");
            }
        }
        url
    }
}

fn provider_error(err: &reqwest::Error) -> FetchError {
    match FetchError::from_reqwest(err) {
        FetchError::Timeout => FetchError::Timeout,
        other => FetchError::unknown(format!("render provider: {}", other)),
    }
}

#[async_trait]
impl ContentSource for RenderEngine {
    async fn fetch(
        &self,
        target: &FetchTarget,
        deadline: &Deadline,
    ) -> Result<FetchedPage, FetchError> {
        let start = Instant::now();
        let request_url = self.request_url(target);

        deadline
            .run(async {
                let response = self
                    .client
                    .get(request_url)
                    .send()
                    .await
                    .map_err(|e| provider_error(&e))?;

                let status = response.status();
                let body = response.text().await.map_err(|e| provider_error(&e))?;

                if !status.is_success() {
                    return Err(FetchError::unknown(format!(
                        "render provider HTTP {}: {}",
                        status.as_u16(),
                        truncate_chars(&body, BODY_SNIPPET_CHARS)
                    )));
                }

                Ok(FetchedPage {
                    html: body,
                    final_url: None,
                    response_time_ms: start.elapsed().as_millis() as u64,
                })
            })
            .await
    }

    fn name(&self) -> &str {
        &self.label
    }
}

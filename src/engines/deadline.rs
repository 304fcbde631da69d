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

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::engines::traits::FetchError;

/// 单次抓取的时限
///
/// 包含超时时长和取消令牌。令牌通常是批次令牌的子令牌，
/// 批次被放弃时所有进行中的抓取一起结束。
#[derive(Debug, Clone)]
pub struct Deadline {
    timeout: Duration,
    token: CancellationToken,
}

impl Deadline {
    pub fn new(timeout: Duration, token: CancellationToken) -> Self {
        Self { timeout, token }
    }

    /// 不可取消的时限
    pub fn after(timeout: Duration) -> Self {
        Self::new(timeout, CancellationToken::new())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 在时限内运行 future
    ///
    /// 超时或取消都返回 `FetchError::Timeout`，被放弃的 future 随之被丢弃
    pub async fn run<F, T>(&self, fut: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(FetchError::Timeout),
            res = tokio::time::timeout(self.timeout, fut) => {
                res.unwrap_or(Err(FetchError::Timeout))
            }
        }
    }
}

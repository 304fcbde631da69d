// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 扫描请求数据传输对象
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct ScanRequestDto {
    /// 待扫描的域名列表
    #[validate(length(min = 1, message = "domain list cannot be empty"))]
    pub domains: Vec<String>,
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 供应商规则表模块
///
/// 以数据形式维护支付门户、PSA 服务台和技术栈的检测规则
pub mod registry;

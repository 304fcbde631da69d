// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 内容分类（classifier）：按规则表识别支付门户、PSA 服务台和技术栈
/// - 元数据提取（metadata_extractor）：标题、描述、联系方式、社交链接
/// - 批次编排（batch_orchestrator）：窗口并发调度并按完成顺序推送结果
pub mod batch_orchestrator;
pub mod classifier;
pub mod metadata_extractor;

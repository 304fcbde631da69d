// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取引擎模块
///
/// 内容源特质、错误分类、时限控制，以及直连和渲染服务两种实现
pub mod deadline;
pub mod factory;
pub mod reqwest_engine;
pub mod render_engine;
pub mod traits;

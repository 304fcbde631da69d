// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::response::sse::Event;
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::error;

use crate::domain::models::stream_event::StreamEvent;

/// 把事件编码为一帧 `data: <json>\n\n`
///
/// 与传输无关，SSE 之外的出口也可以直接使用
pub fn encode_frame(event: &StreamEvent) -> Result<String, serde_json::Error> {
    Ok(format!("data: {}\n\n", serde_json::to_string(event)?))
}

/// 把事件转换为 SSE 事件
pub fn to_sse_event(event: &StreamEvent) -> Option<Event> {
    match Event::default().json_data(event) {
        Ok(sse) => Some(sse),
        Err(e) => {
            error!("Failed to encode stream event: {}", e);
            None
        }
    }
}

/// 把事件接收端包装为 SSE 流
///
/// 编排器在结束标记之后释放发送端，流随之关闭
pub fn sse_stream(
    rx: mpsc::Receiver<StreamEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    ReceiverStream::new(rx).filter_map(|event| async move { to_sse_event(&event).map(Ok) })
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::stream::{FuturesUnordered, StreamExt};
use metrics::{counter, histogram};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::config::settings::{ScanMode, ScannerSettings};
use crate::domain::models::domain_request::DomainRequest;
use crate::domain::models::scrape_outcome::ScrapeOutcome;
use crate::domain::models::stream_event::StreamEvent;
use crate::domain::services::classifier::ContentClassifier;
use crate::domain::services::metadata_extractor::MetadataExtractor;
use crate::engines::deadline::Deadline;
use crate::engines::traits::{ContentSource, FetchError, FetchTarget};

/// 批次调度参数
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// 并发或顺序
    pub mode: ScanMode,
    /// 每个窗口的域名数量
    pub window_size: usize,
    /// 单次抓取时限
    pub timeout: Duration,
    /// 是否提取页面元数据
    pub extract_details: bool,
}

impl ScanOptions {
    pub fn from_settings(settings: &ScannerSettings) -> Self {
        Self {
            mode: settings.mode,
            window_size: settings.window_size.max(1),
            timeout: settings.timeout(),
            extract_details: settings.extract_details,
        }
    }
}

/// 单个域名的扫描：抓取、分类、提取元数据
///
/// 任何失败都转成 error 结果，不会向外传播
#[derive(Clone)]
pub struct DomainScanner {
    source: Arc<dyn ContentSource>,
    classifier: Arc<ContentClassifier>,
    extract_details: bool,
}

impl DomainScanner {
    pub fn new(
        source: Arc<dyn ContentSource>,
        classifier: Arc<ContentClassifier>,
        extract_details: bool,
    ) -> Self {
        Self {
            source,
            classifier,
            extract_details,
        }
    }

    /// 扫描一个域名
    pub async fn scan(&self, domain: &str, index: usize, deadline: &Deadline) -> ScrapeOutcome {
        let started = Instant::now();
        let result = match FetchTarget::resolve(domain) {
            Ok(target) => self.source.fetch(&target, deadline).await,
            Err(e) => Err(e),
        };
        histogram!("scan_fetch_duration_seconds").record(started.elapsed().as_secs_f64());

        match result {
            Ok(page) => {
                let classification = self
                    .classifier
                    .classify(&page.html, page.final_url.as_deref());

                let mut outcome = ScrapeOutcome::done(domain, index);
                outcome.payment_portals = classification.payment_portals;
                outcome.psa_portals = classification.psa_portals;
                if self.classifier.detects_tech() {
                    outcome.tech_stack = Some(classification.tech_stack);
                }
                if self.extract_details {
                    outcome.details = Some(MetadataExtractor::extract(&page.html));
                }

                debug!(
                    "Scanned {} in {}ms: {} payment, {} psa",
                    domain,
                    page.response_time_ms,
                    outcome.payment_portals.len(),
                    outcome.psa_portals.len()
                );
                counter!("scan_domains_total", "status" => "done").increment(1);
                outcome
            }
            Err(e) => {
                warn!("Scan of {} failed ({}): {}", domain, e.kind(), e);
                counter!("scan_domains_total", "status" => "error").increment(1);
                ScrapeOutcome::failed(domain, index, e.to_string())
            }
        }
    }
}

/// 事件出口
///
/// 发送失败说明调用方已断开，此时取消整个批次
struct EventSink {
    tx: mpsc::Sender<StreamEvent>,
    batch: CancellationToken,
}

impl EventSink {
    async fn emit(&self, event: StreamEvent) -> bool {
        if self.tx.send(event).await.is_ok() {
            return true;
        }
        if !self.batch.is_cancelled() {
            info!("Stream consumer disconnected, cancelling batch");
            self.batch.cancel();
        }
        false
    }

    fn is_closed(&self) -> bool {
        self.batch.is_cancelled()
    }
}

/// 批次编排器
///
/// 并发模式下按固定窗口划分域名，窗口内所有域名同时抓取并按完成顺序推送，
/// 一个窗口的结果全部推送后才开始下一个窗口。顺序模式下逐个处理，
/// 每个域名前先推送 `processing` 事件。
///
/// 每个批次以 `info` 开始，以 `batch_complete` 结束，中间每个输入域名恰好一个结果。
pub struct BatchOrchestrator {
    scanner: DomainScanner,
    options: ScanOptions,
}

impl BatchOrchestrator {
    pub fn new(
        source: Arc<dyn ContentSource>,
        classifier: Arc<ContentClassifier>,
        options: ScanOptions,
    ) -> Self {
        Self {
            scanner: DomainScanner::new(source, classifier, options.extract_details),
            options,
        }
    }

    pub fn source_name(&self) -> &str {
        self.scanner.source.name()
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// 在后台启动批次，返回事件接收端
    ///
    /// 丢弃接收端即放弃该批次
    pub fn start(
        self: &Arc<Self>,
        request: DomainRequest,
        capacity: usize,
    ) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move { orchestrator.run(request, tx).await });
        rx
    }

    /// 运行一个批次，把事件写入 `tx`
    pub async fn run(&self, request: DomainRequest, tx: mpsc::Sender<StreamEvent>) {
        let sink = EventSink {
            tx,
            batch: CancellationToken::new(),
        };
        let span = info_span!(
            "scan_batch",
            domains = request.len(),
            source = %self.source_name(),
            mode = ?self.options.mode
        );

        async {
            counter!("scan_batches_total").increment(1);
            let started = Instant::now();

            sink.emit(StreamEvent::Info {
                scraper: self.source_name().to_string(),
            })
            .await;

            match self.options.mode {
                ScanMode::Concurrent => self.run_windows(request.domains(), &sink).await,
                ScanMode::Sequential => self.run_sequential(request.domains(), &sink).await,
            }

            sink.emit(StreamEvent::BatchComplete).await;
            info!(
                "Batch finished in {}ms{}",
                started.elapsed().as_millis(),
                if sink.is_closed() { " (abandoned)" } else { "" }
            );
        }
        .instrument(span)
        .await
    }

    async fn run_windows(&self, domains: &[String], sink: &EventSink) {
        let size = self.options.window_size.max(1);

        for (window, chunk) in domains.chunks(size).enumerate() {
            if sink.is_closed() {
                break;
            }
            debug!("Starting window {} with {} domains", window, chunk.len());

            let offset = window * size;
            let mut pending: FuturesUnordered<_> = chunk
                .iter()
                .enumerate()
                .map(|(i, domain)| {
                    self.spawn_scan(domain.clone(), offset + i, sink.batch.child_token())
                })
                .collect();

            // Drain the whole window even after a disconnect so no task outlives the batch.
            while let Some(outcome) = pending.next().await {
                sink.emit(StreamEvent::Result(outcome)).await;
            }
        }
    }

    async fn run_sequential(&self, domains: &[String], sink: &EventSink) {
        for (index, domain) in domains.iter().enumerate() {
            if sink.is_closed() {
                break;
            }
            let processing = StreamEvent::Processing {
                domain: domain.clone(),
                index,
            };
            if !sink.emit(processing).await {
                break;
            }

            let outcome = self
                .spawn_scan(domain.clone(), index, sink.batch.child_token())
                .await;
            sink.emit(StreamEvent::Result(outcome)).await;
        }
    }

    /// 在独立任务中扫描一个域名，任务崩溃也会得到一个 error 结果
    fn spawn_scan(
        &self,
        domain: String,
        index: usize,
        token: CancellationToken,
    ) -> impl Future<Output = ScrapeOutcome> + Send + 'static {
        let scanner = self.scanner.clone();
        let deadline = Deadline::new(self.options.timeout, token);
        let task_domain = domain.clone();
        let span = info_span!("scan_domain", domain = %domain, index);

        let handle = tokio::spawn(
            async move { scanner.scan(&task_domain, index, &deadline).await }.instrument(span),
        );

        async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("Scan task for {} aborted: {}", domain, e);
                    counter!("scan_domains_total", "status" => "error").increment(1);
                    let err = FetchError::unknown(format!("scan task failed: {}", e));
                    ScrapeOutcome::failed(domain, index, err.to_string())
                }
            }
        }
    }
}

//! Paginated listing
//!
//! List endpoints take a `page` query parameter (starting at 0) and answer
//! with `{"page": n, "pages_count": m, "items": [...]}`. [`Paginator`] walks
//! those pages lazily, one request per page, only when the buffered records
//! run out.

use super::request::ApiRequest;
use super::transport::ApiContext;
use crate::error::{DeepintError, DeepintResult, ResultExt};
use futures::stream::{self, Stream};
use serde::Deserialize;
use serde_json::Value;
use std::collections::VecDeque;
use tracing::debug;

pub const PAGE_PARAMETER: &str = "page";

/// One page of a list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub pages_count: Option<u64>,
    #[serde(default)]
    pub items: Vec<Value>,
}

impl Page {
    /// Decode a response body; a bare array is a single, final page
    pub fn from_value(value: Value) -> DeepintResult<Self> {
        match value {
            Value::Array(items) => Ok(Page {
                page: Some(0),
                pages_count: Some(1),
                items,
            }),
            Value::Null => Ok(Page::default()),
            other => serde_json::from_value(other)
                .map_err(DeepintError::from)
                .context("Decoding paginated response"),
        }
    }
}

/// Lazy, single-pass sequence of raw records from a list endpoint
#[derive(Debug)]
pub struct Paginator {
    context: ApiContext,
    request: ApiRequest,
    next_page: u64,
    buffer: VecDeque<Value>,
    exhausted: bool,
    pages_fetched: u64,
}

impl Paginator {
    pub fn new(context: ApiContext, request: ApiRequest) -> Self {
        Self {
            context,
            request,
            next_page: 0,
            buffer: VecDeque::new(),
            exhausted: false,
            pages_fetched: 0,
        }
    }

    /// Number of page requests issued so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    /// True once every page has been requested and every record handed out
    pub fn is_exhausted(&self) -> bool {
        self.exhausted && self.buffer.is_empty()
    }

    /// Next record, fetching the next page if the buffer is empty
    pub async fn next_record(&mut self) -> DeepintResult<Option<Value>> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Ok(Some(record));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    /// Drain every remaining record
    pub async fn collect_remaining(&mut self) -> DeepintResult<Vec<Value>> {
        let mut records = Vec::new();
        while let Some(record) = self.next_record().await? {
            records.push(record);
        }
        Ok(records)
    }

    /// Adapt into a stream; the stream ends after the first error
    pub fn into_stream(self) -> impl Stream<Item = DeepintResult<Value>> + Send {
        stream::unfold(Some(self), |state| async move {
            let mut paginator = state?;
            match paginator.next_record().await {
                Ok(Some(record)) => Some((Ok(record), Some(paginator))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    async fn fetch_page(&mut self) -> DeepintResult<()> {
        let requested = self.next_page;
        let request = self
            .request
            .clone()
            .with_parameter(PAGE_PARAMETER, requested);

        let page = Page::from_value(self.context.send(request).await?)
            .with_context(|| format!("Listing '{}'", self.request.path))?;
        self.pages_fetched += 1;

        let served = page.page.unwrap_or(requested);
        // A server echoing a stale page number must not stall the cursor
        self.next_page = served.max(requested) + 1;

        // An empty page before the last one does not end the listing
        self.exhausted = match page.pages_count {
            Some(count) => self.next_page >= count,
            None => true,
        };

        debug!(
            path = %self.request.path,
            page = served,
            pages_count = ?page.pages_count,
            items = page.items.len(),
            "fetched page"
        );

        self.buffer.extend(page.items);
        Ok(())
    }
}

//! In-memory fakes and helpers for tests.
//!
//! Provides `FakeGenerator`, `FakeDocumentSource` and `FakeProfileApi`, which
//! satisfy the pipeline's trait seams without any network access, plus `serve`
//! for tests that need a real HTTP peer.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;

use crate::enrichment::acquisition::{
    AcquisitionError, DocumentSource, ProfileApi, RawContent, StructuredProfile,
};
use crate::llm_client::{GenerationError, LlmError, TextGenerator};

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// FakeGenerator
// ---------------------------------------------------------------------------

/// Replies from a script, in order. `Err(msg)` becomes an upstream API error;
/// an exhausted script replies `GenerationError::Empty`.
#[derive(Debug, Default)]
pub struct FakeGenerator {
    replies: Mutex<VecDeque<Result<serde_json::Value, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn replying(replies: Vec<Result<serde_json::Value, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _system: &str,
    ) -> Result<serde_json::Value, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(GenerationError::Llm(LlmError::Api {
                status: 529,
                message,
            })),
            None => Err(GenerationError::Empty),
        }
    }
}

// ---------------------------------------------------------------------------
// FakeDocumentSource
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FakeDocumentSource {
    result: Result<RawContent, AcquisitionError>,
    urls: Mutex<Vec<String>>,
}

impl FakeDocumentSource {
    pub fn returning(result: Result<RawContent, AcquisitionError>) -> Self {
        Self {
            result,
            urls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn last_url(&self) -> Option<String> {
        self.urls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl DocumentSource for FakeDocumentSource {
    async fn fetch_document(&self, url: &str) -> Result<RawContent, AcquisitionError> {
        self.urls.lock().unwrap().push(url.to_string());
        self.result.clone()
    }
}

// ---------------------------------------------------------------------------
// FakeProfileApi
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FakeProfileApi {
    result: Result<StructuredProfile, AcquisitionError>,
    calls: AtomicUsize,
}

impl FakeProfileApi {
    pub fn returning(result: Result<StructuredProfile, AcquisitionError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileApi for FakeProfileApi {
    async fn fetch_profile(&self, _username: &str) -> Result<StructuredProfile, AcquisitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

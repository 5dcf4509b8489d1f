use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use itertools::Itertools;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use snafu::{ensure, ResultExt};

use crate::error::{
    ClientSnafu, DecodeSnafu, NoQuotesSnafu, RequestSnafu, StatusSnafu, TextLoadError,
    UnavailableSnafu,
};
use crate::runtime::AppEvent;
use crate::session::RequestId;

pub const DEFAULT_QUOTES_URL: &str = "https://dummyjson.com/quotes";
pub const DEFAULT_QUOTE_COUNT: usize = 4;
pub const MAX_QUOTE_COUNT: usize = 20;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Supplies the paragraph a session is typed against
pub trait TextProvider: Send + Sync + 'static {
    fn fetch_sample_text(&self) -> Result<String, TextLoadError>;
}

#[derive(Debug, Deserialize)]
pub struct Quote {
    pub quote: String,
}

#[derive(Debug, Deserialize)]
struct QuotesPayload {
    quotes: Vec<Quote>,
}

pub fn parse_quotes(body: &str) -> Result<Vec<Quote>, TextLoadError> {
    let payload: QuotesPayload = serde_json::from_str(body).context(DecodeSnafu)?;
    Ok(payload.quotes)
}

/// Join `count` quotes picked uniformly at random (with replacement)
pub fn compose_paragraph<R: Rng + ?Sized>(
    quotes: &[Quote],
    count: usize,
    rng: &mut R,
) -> Result<String, TextLoadError> {
    ensure!(!quotes.is_empty(), NoQuotesSnafu);

    Ok((0..count.max(1))
        .filter_map(|_| quotes.choose(&mut *rng))
        .map(|q| q.quote.trim())
        .join(" "))
}

/// Pulls quotes from a dummyjson-style `/quotes` endpoint
#[derive(Debug, Clone)]
pub struct QuoteApiProvider {
    client: reqwest::blocking::Client,
    url: String,
    quote_count: usize,
}

impl QuoteApiProvider {
    pub fn new(url: impl Into<String>, quote_count: usize) -> Result<Self, TextLoadError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(ClientSnafu)?;

        Ok(Self {
            client,
            url: url.into(),
            quote_count,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TextProvider for QuoteApiProvider {
    fn fetch_sample_text(&self) -> Result<String, TextLoadError> {
        debug!("fetching sample text from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .context(RequestSnafu { url: &self.url })?;

        let status = response.status();
        ensure!(
            status.is_success(),
            StatusSnafu {
                url: &self.url,
                status: status.as_u16()
            }
        );

        let body = response.text().context(RequestSnafu { url: &self.url })?;
        let quotes = parse_quotes(&body)?;
        compose_paragraph(&quotes, self.quote_count, &mut rand::thread_rng())
    }
}

/// Always answers with the same text
#[derive(Debug, Clone)]
pub struct StaticTextProvider {
    text: String,
}

impl StaticTextProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextProvider for StaticTextProvider {
    fn fetch_sample_text(&self) -> Result<String, TextLoadError> {
        Ok(self.text.clone())
    }
}

/// Fails every fetch with the reason its real source could not be set up
#[derive(Debug, Clone)]
pub struct UnavailableTextProvider {
    reason: String,
}

impl UnavailableTextProvider {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TextProvider for UnavailableTextProvider {
    fn fetch_sample_text(&self) -> Result<String, TextLoadError> {
        UnavailableSnafu {
            reason: &self.reason,
        }
        .fail()
    }
}

/// Use the built provider, or one that always fails when setup went wrong
pub fn provider_or_unavailable<P: TextProvider>(
    built: Result<P, TextLoadError>,
) -> Arc<dyn TextProvider> {
    match built {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            warn!("sample text source unavailable, sessions will use placeholder text: {e}");
            Arc::new(UnavailableTextProvider::new(e.to_string()))
        }
    }
}

/// Starts a sample text request; the answer is delivered out of band
pub trait TextLoader: Send {
    fn request(&self, request: RequestId);
}

/// Fetches on a worker thread and posts the result into the app event channel
pub struct ChannelTextLoader {
    provider: Arc<dyn TextProvider>,
    tx: Sender<AppEvent>,
}

impl ChannelTextLoader {
    pub fn new(provider: Arc<dyn TextProvider>, tx: Sender<AppEvent>) -> Self {
        Self { provider, tx }
    }
}

impl TextLoader for ChannelTextLoader {
    fn request(&self, request: RequestId) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();

        std::thread::spawn(move || {
            let result = provider.fetch_sample_text();
            if let Ok(ref text) = result {
                info!(
                    "sample text request {} loaded ({} chars)",
                    request.value(),
                    text.chars().count()
                );
            }
            // receiver gone means the app already shut down
            let _ = tx.send(AppEvent::TextLoaded { request, result });
        });
    }
}

//! Telemetry source adapter: one request per category, synthetic fallback on any failure.

use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::{DashError, Result};
use crate::synthetic;
use crate::types::{
    AllocationPlan, Category, CoolingPlan, ForecastSet, Origin, SystemStatus, RACK_CELLS,
};

/// A single outbound request. POST bodies are already-serialized JSON.
#[derive(Debug, Clone)]
pub struct Request {
    pub category: Category,
    pub body: Option<String>,
}

/// Moves a request to the backend and returns the raw response body.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, req: Request) -> impl Future<Output = Result<String>> + Send;
}

/// reqwest-backed transport rooted at the backend's base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|source| DashError::Url {
            url: base_url.to_string(),
            source,
        })?;
        // An unanswered request is a late failure; the timeout turns it into one.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DashError::Client)?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

impl Transport for HttpTransport {
    async fn send(&self, req: Request) -> Result<String> {
        let category = req.category;
        let url = self
            .base
            .join(category.path())
            .map_err(|source| DashError::Url {
                url: format!("{}{}", self.base, category.path()),
                source,
            })?;

        let builder = if category.is_post() {
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(req.body.unwrap_or_default())
        } else {
            self.client.get(url)
        };

        let resp = builder
            .send()
            .await
            .map_err(|source| DashError::Http { category, source })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DashError::Status {
                category,
                status: status.as_u16(),
            });
        }
        resp.text()
            .await
            .map_err(|source| DashError::Http { category, source })
    }
}

/// Transport for running without a backend: every category is unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    async fn send(&self, req: Request) -> Result<String> {
        Err(DashError::Unreachable {
            category: req.category,
            reason: "offline mode".into(),
        })
    }
}

/// A category payload the adapter knows how to decode, check and synthesize.
pub trait Payload: DeserializeOwned + Send + Sized {
    const CATEGORY: Category;

    fn validate(&self) -> Result<()>;

    /// Synthetic stand-in covering `server_ids` where the category is per server.
    fn synthesize(server_ids: &[u32]) -> Self;

    /// Fills optional parts a live backend may leave out.
    fn normalize(&mut self) {}
}

impl Payload for SystemStatus {
    const CATEGORY: Category = Category::SystemStatus;

    fn validate(&self) -> Result<()> {
        SystemStatus::validate(self)
    }

    fn synthesize(server_ids: &[u32]) -> Self {
        synthetic::system_status_for(&mut rand::rng(), server_ids)
    }
}

impl Payload for ForecastSet {
    const CATEGORY: Category = Category::Forecast;

    fn validate(&self) -> Result<()> {
        ForecastSet::validate(self)
    }

    fn synthesize(server_ids: &[u32]) -> Self {
        synthetic::forecast_for(&mut rand::rng(), server_ids)
    }
}

impl Payload for AllocationPlan {
    const CATEGORY: Category = Category::ResourceAllocation;

    fn validate(&self) -> Result<()> {
        AllocationPlan::validate(self)
    }

    fn synthesize(server_ids: &[u32]) -> Self {
        synthetic::allocation_for(&mut rand::rng(), server_ids)
    }
}

impl Payload for CoolingPlan {
    const CATEGORY: Category = Category::CoolingPlan;

    fn validate(&self) -> Result<()> {
        CoolingPlan::validate(self)
    }

    fn synthesize(_server_ids: &[u32]) -> Self {
        synthetic::cooling_plan(&mut rand::rng())
    }

    fn normalize(&mut self) {
        if self.server_temperatures.len() != RACK_CELLS {
            debug!(
                cells = self.server_temperatures.len(),
                "cooling plan rack layout incomplete, filling synthetic cells"
            );
            synthetic::fill_rack_temperatures(&mut rand::rng(), &mut self.server_temperatures);
        }
    }
}

/// A category result and whether it came from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub origin: Origin,
}

impl<T> Fetched<T> {
    pub fn is_live(&self) -> bool {
        self.origin == Origin::Live
    }

    fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            origin: self.origin,
        }
    }
}

/// Any one category's data.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryPayload {
    SystemStatus(SystemStatus),
    Forecast(ForecastSet),
    ResourceAllocation(AllocationPlan),
    CoolingPlan(CoolingPlan),
}

/// What to fetch. Dependent categories carry the payload they are computed from.
#[derive(Debug, Clone, Copy)]
pub enum CategoryRequest<'a> {
    SystemStatus,
    Forecast,
    ResourceAllocation(&'a ForecastSet),
    CoolingPlan(&'a SystemStatus),
}

impl CategoryRequest<'_> {
    pub fn category(&self) -> Category {
        match self {
            CategoryRequest::SystemStatus => Category::SystemStatus,
            CategoryRequest::Forecast => Category::Forecast,
            CategoryRequest::ResourceAllocation(_) => Category::ResourceAllocation,
            CategoryRequest::CoolingPlan(_) => Category::CoolingPlan,
        }
    }
}

pub struct TelemetryAdapter<T> {
    transport: T,
}

impl<T: Transport> TelemetryAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn fetch_category(&self, request: CategoryRequest<'_>) -> Fetched<TelemetryPayload> {
        match request {
            CategoryRequest::SystemStatus => self
                .system_status()
                .await
                .map(TelemetryPayload::SystemStatus),
            CategoryRequest::Forecast => self.forecast().await.map(TelemetryPayload::Forecast),
            CategoryRequest::ResourceAllocation(forecast) => self
                .resource_allocation(forecast)
                .await
                .map(TelemetryPayload::ResourceAllocation),
            CategoryRequest::CoolingPlan(status) => self
                .cooling_plan(status)
                .await
                .map(TelemetryPayload::CoolingPlan),
        }
    }

    pub async fn system_status(&self) -> Fetched<SystemStatus> {
        self.fetch_or_synthesize(None, &synthetic::SYNTHETIC_FLEET).await
    }

    pub async fn forecast(&self) -> Fetched<ForecastSet> {
        self.fetch_or_synthesize(None, &synthetic::SYNTHETIC_FLEET).await
    }

    /// Falls back to synthetic decisions for the servers in `forecast`.
    pub async fn resource_allocation(&self, forecast: &ForecastSet) -> Fetched<AllocationPlan> {
        self.fetch_with_body(forecast, &forecast.server_ids()).await
    }

    pub async fn cooling_plan(&self, status: &SystemStatus) -> Fetched<CoolingPlan> {
        self.fetch_with_body(status, &status.server_ids()).await
    }

    async fn fetch_with_body<P: Payload, B: Serialize + Sync>(
        &self,
        body: &B,
        server_ids: &[u32],
    ) -> Fetched<P> {
        match serde_json::to_string(body) {
            Ok(json) => self.fetch_or_synthesize(Some(json), server_ids).await,
            Err(source) => fallback(
                DashError::Decode {
                    category: P::CATEGORY,
                    source,
                },
                server_ids,
            ),
        }
    }

    async fn fetch_or_synthesize<P: Payload>(
        &self,
        body: Option<String>,
        server_ids: &[u32],
    ) -> Fetched<P> {
        let req = Request {
            category: P::CATEGORY,
            body,
        };
        match self.fetch_live::<P>(req).await {
            Ok(data) => {
                debug!(category = %P::CATEGORY, "live data");
                Fetched {
                    data,
                    origin: Origin::Live,
                }
            }
            Err(e) => fallback(e, server_ids),
        }
    }

    async fn fetch_live<P: Payload>(&self, req: Request) -> Result<P> {
        let category = req.category;
        let text = self.transport.send(req).await?;
        let mut payload: P =
            serde_json::from_str(&text).map_err(|source| DashError::Decode { category, source })?;
        payload.normalize();
        payload.validate()?;
        Ok(payload)
    }
}

fn fallback<P: Payload>(err: DashError, server_ids: &[u32]) -> Fetched<P> {
    if err.is_payload_error() {
        warn!(category = %P::CATEGORY, error = %err, "payload rejected, using synthetic data");
    } else {
        warn!(category = %P::CATEGORY, error = %err, "category unavailable, using synthetic data");
    }
    Fetched {
        data: P::synthesize(server_ids),
        origin: Origin::Synthetic,
    }
}

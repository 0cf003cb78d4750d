use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use snafu::ResultExt;
use tender_core::{CoreResult, GeoPoint, WaypointSource, core_error::UnexpectedSnafu};

use crate::{
    error::{
        Result,
        error::{CoreSnafu, FailedRequestSnafu, RequestSnafu},
    },
    models::PierRecord,
};

/// Fetches the pier location, published by the backend as `{ "lat": .., "lng": .. }`.
pub struct PierClient {
    url: String,
    client: Client,
}

/// A pier location known up front.
pub struct ConfiguredPier(pub Option<GeoPoint>);

impl PierClient {
    pub fn new(url: String) -> PierClient {
        PierClient {
            url,
            client: Client::new(),
        }
    }

    async fn fetch(&self) -> Result<Option<GeoPoint>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return FailedRequestSnafu {
                url: self.url.clone(),
                status,
                body: response.text().await.context(RequestSnafu)?,
            }
            .fail();
        }

        let record: Option<PierRecord> = response.json().await.context(RequestSnafu)?;

        record
            .map(|r| GeoPoint::try_new(r.lat, r.lng))
            .transpose()
            .context(CoreSnafu)
    }
}

#[async_trait]
impl WaypointSource for PierClient {
    async fn pier(&self) -> CoreResult<Option<GeoPoint>> {
        self.fetch()
            .await
            .map_err(|e| UnexpectedSnafu { error: e }.build())
    }
}

#[async_trait]
impl WaypointSource for ConfiguredPier {
    async fn pier(&self) -> CoreResult<Option<GeoPoint>> {
        Ok(self.0)
    }
}

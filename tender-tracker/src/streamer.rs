use futures::{StreamExt, TryStreamExt};
use reqwest::{Client, header::ACCEPT};
use snafu::ResultExt;
use tokio::io::AsyncRead;

use crate::error::{
    Result,
    error::{FailedRequestSnafu, RequestSnafu},
};

/// Client of the push backend, which streams every position update as a JSON line.
pub struct FixStreamClient {
    url: String,
    client: Client,
}

impl FixStreamClient {
    pub fn new(url: String) -> FixStreamClient {
        FixStreamClient {
            url,
            client: Client::new(),
        }
    }

    /// Opens the stream, which keeps delivering records until the server hangs up.
    pub async fn streamer(&self) -> Result<impl AsyncRead + Unpin + Send> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/x-ndjson")
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url: self.url.clone(),
                status,
                body: response.text().await.context(RequestSnafu)?,
            }
            .fail();
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(|e| std::io::Error::other(format!("{e:?}"))));

        let reader = Box::pin(stream).into_async_read();

        Ok(tokio_util::compat::FuturesAsyncReadCompatExt::compat(reader))
    }
}

use crate::{ApiConfig, ClientError, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use report_address::{AddressError, DistrictAccountSource};
use report_protocol::{
    endpoints, AddressDetails, AddressSuggestion, AutocompleteResponse, HealthStatus, DATA_FIELD,
};
use report_submission::{ReportTransport, SubmissionError, SubmissionPayload, TransportResponse};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

/// Talks to the violation report backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate().map_err(ClientError::InvalidConfig)?;
        let http = Client::builder().timeout(config.timeout()).build()?;
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let base =
            Url::parse(&base_url).map_err(|err| ClientError::InvalidConfig(err.to_string()))?;
        Ok(Self {
            http,
            base_url,
            base,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn district_accounts_url(&self, district: &str) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::InvalidConfig(format!("{} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(endpoints::district_accounts_segments(district));
        Ok(url)
    }

    /// Every account in a district, used as the autocomplete candidate set.
    pub async fn district_accounts(&self, district: &str) -> Result<Vec<AddressSuggestion>> {
        let url = self.district_accounts_url(district)?;
        let response = self.http.get(url.clone()).send().await?;
        let accounts: Vec<AddressSuggestion> = read_json("GET", url.as_str(), response).await?;
        debug!("Fetched {} accounts for district {district}", accounts.len());
        Ok(accounts)
    }

    /// Server-side address lookup. Superseded by filtering the district
    /// account set locally.
    pub async fn autocomplete(&self, query: &str, limit: usize) -> Result<Vec<AddressSuggestion>> {
        let url = self.url(endpoints::AUTOCOMPLETE);
        let limit = limit.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("limit", limit.as_str())])
            .send()
            .await?;
        let body: AutocompleteResponse = read_json("GET", &url, response).await?;
        Ok(body.into_suggestions())
    }

    pub async fn address_details(&self, address: &str) -> Result<AddressDetails> {
        let url = self.url(endpoints::ADDRESS_DETAILS);
        let response = self
            .http
            .get(&url)
            .query(&[("address", address)])
            .send()
            .await?;
        read_json("GET", &url, response).await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let url = self.url(endpoints::HEALTH);
        let response = self.http.get(&url).send().await?;
        read_json("GET", &url, response).await
    }

    /// POST one report as multipart form data. The response is returned as
    /// received, whatever its status.
    pub async fn post_report(&self, payload: &SubmissionPayload) -> Result<TransportResponse> {
        let url = self.url(endpoints::VIOLATIONS);
        let form = build_form(payload)?;
        info!(
            "POST {url} ({} violations, {} images)",
            payload.document.violations.len(),
            payload.attachments.len()
        );

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}

fn build_form(payload: &SubmissionPayload) -> Result<Form> {
    let data = payload.data_json()?;
    let mut form = Form::new().text(DATA_FIELD, data);

    for attachment in &payload.attachments {
        let image = &attachment.image;
        let mut part = Part::bytes(image.bytes.to_vec()).file_name(image.file_name.clone());
        if !image.content_type.is_empty() {
            part = part.mime_str(&image.content_type)?;
        }
        form = form.part(attachment.field.clone(), part);
    }

    Ok(form)
}

async fn read_json<T: DeserializeOwned>(
    method: &'static str,
    url: &str,
    response: Response,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        warn!("{method} {url} failed with HTTP {status}");
        return Err(ClientError::Status {
            method,
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl DistrictAccountSource for ApiClient {
    async fn district_accounts(
        &self,
        district: &str,
    ) -> report_address::Result<Vec<AddressSuggestion>> {
        ApiClient::district_accounts(self, district)
            .await
            .map_err(|err| AddressError::AccountSource(err.to_string()))
    }
}

#[async_trait]
impl ReportTransport for ApiClient {
    async fn post_report(
        &self,
        payload: &SubmissionPayload,
    ) -> report_submission::Result<TransportResponse> {
        ApiClient::post_report(self, payload)
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))
    }
}

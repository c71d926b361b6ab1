//! City backend client

use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::ApiConfig;
use crate::state::{City, CityId, NewCity};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} answered with status {status}")]
    Status { status: u16, url: String },
}

/// The REST collaborator behind the city store.
#[async_trait]
pub trait CityApi: Send + Sync {
    async fn list_cities(&self) -> Result<Vec<City>, ApiError>;

    async fn get_city(&self, id: &CityId) -> Result<City, ApiError>;

    /// Returns the record as stored by the server, with its assigned id.
    async fn create_city(&self, city: &NewCity) -> Result<City, ApiError>;

    async fn delete_city(&self, id: &CityId) -> Result<(), ApiError>;
}

/// [`CityApi`] over HTTP/JSON
#[derive(Clone, Debug)]
pub struct HttpCityApi {
    client: Client,
    config: ApiConfig,
}

impl HttpCityApi {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        reqwest::Url::parse(&config.base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

#[async_trait]
impl CityApi for HttpCityApi {
    async fn list_cities(&self) -> Result<Vec<City>, ApiError> {
        let url = self.config.cities_url();
        debug!(%url, "GET");
        let response = ensure_success(self.client.get(&url).send().await?)?;
        Ok(response.json().await?)
    }

    async fn get_city(&self, id: &CityId) -> Result<City, ApiError> {
        let url = self.config.city_url(id);
        debug!(%url, "GET");
        let response = ensure_success(self.client.get(&url).send().await?)?;
        Ok(response.json().await?)
    }

    async fn create_city(&self, city: &NewCity) -> Result<City, ApiError> {
        let url = self.config.cities_url();
        debug!(%url, city = %city.city_name, "POST");
        // `json` sets `Content-Type: application/json`
        let response = ensure_success(self.client.post(&url).json(city).send().await?)?;
        Ok(response.json().await?)
    }

    async fn delete_city(&self, id: &CityId) -> Result<(), ApiError> {
        let url = self.config.city_url(id);
        debug!(%url, "DELETE");
        ensure_success(self.client.delete(&url).send().await?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = HttpCityApi::new(ApiConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_keeps_config() {
        let api = HttpCityApi::new(ApiConfig::new("http://127.0.0.1:9000/")).unwrap();
        assert_eq!(api.config().base_url, "http://127.0.0.1:9000");
    }
}

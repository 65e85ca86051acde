// src/services/market.rs
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::error::Error as StdError;
use tokio::sync::Mutex;

use crate::models::{AccountDetails, AccountNumber, OptionChain, PriceHistory, RawPosition};
use crate::services::candles::PeriodParams;

pub type Result<T> = std::result::Result<T, Box<dyn StdError + Send + Sync>>;

const API_BASE: &str = "https://api.schwabapi.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Brokerage market-data source. Production talks to Schwab; tests
/// substitute a fake.
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn price_history(&self, symbol: &str, params: &PeriodParams) -> Result<PriceHistory>;
    async fn positions(&self) -> Result<Vec<RawPosition>>;
    async fn option_chain(&self, symbol: &str) -> Result<OptionChain>;
}

struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

pub struct SchwabClient {
    http: Client,
    app_key: String,
    app_secret: String,
    refresh_token: String,
    token: Mutex<Option<CachedToken>>,
}

impl SchwabClient {
    pub fn new(app_key: String, app_secret: String, refresh_token: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(SchwabClient {
            http,
            app_key,
            app_secret,
            refresh_token,
            token: Mutex::new(None),
        })
    }

    /// Exchange the refresh token for an access token, reusing the cached
    /// one while it still has at least a minute of validity left.
    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Utc::now() + Duration::minutes(1) {
                return Ok(cached.access_token.clone());
            }
        }

        info!("Requesting new Schwab access token");

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: i64,
        }

        let resp: TokenResponse = self
            .http
            .post(format!("{}/v1/oauth/token", API_BASE))
            .basic_auth(&self.app_key, Some(&self.app_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let access_token = resp.access_token.clone();
        *guard = Some(CachedToken {
            access_token: resp.access_token,
            expires_at: Utc::now() + Duration::seconds(resp.expires_in),
        });
        Ok(access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let token = self.access_token().await?;
        let url = format!("{}{}", API_BASE, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Schwab API returned {} for {}: {}", status, path, body).into());
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MarketData for SchwabClient {
    async fn price_history(&self, symbol: &str, params: &PeriodParams) -> Result<PriceHistory> {
        self.get_json(
            "/marketdata/v1/pricehistory",
            &[
                ("symbol", symbol.to_string()),
                ("periodType", params.period_type.to_string()),
                ("period", params.period.to_string()),
                ("frequencyType", params.frequency_type.to_string()),
                ("frequency", params.frequency.to_string()),
            ],
        )
        .await
    }

    async fn positions(&self) -> Result<Vec<RawPosition>> {
        let numbers: Vec<AccountNumber> = self
            .get_json("/trader/v1/accounts/accountNumbers", &[])
            .await?;
        let account = numbers.first().ok_or("no linked Schwab accounts")?;

        let details: AccountDetails = self
            .get_json(
                &format!("/trader/v1/accounts/{}", account.hash_value),
                &[("fields", "positions".to_string())],
            )
            .await?;
        Ok(details.securities_account.positions)
    }

    async fn option_chain(&self, symbol: &str) -> Result<OptionChain> {
        self.get_json("/marketdata/v1/chains", &[("symbol", symbol.to_string())])
            .await
    }
}

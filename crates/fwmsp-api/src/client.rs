// Hand-crafted async HTTP client for the Firewalla MSP API v2.
//
// Base path: https://{msp_domain}/v2/
// Auth: Authorization: Bearer {token}

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{
    Alarm, BoxInfo, Device, Flow, ListQuery, ListResponse, Rule, RuleCreateUpdate, SimpleStats,
    StatsRecord, StatsType, TargetList, TargetListCreateUpdate, TrendPoint, TrendType,
};

// ── Error response shape from the MSP API ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Firewalla MSP API.
///
/// Built once at process start and shared read-only across tool calls;
/// all working data is local to a single request/response cycle.
pub struct MspClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MspClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an MSP domain, bearer token, and transport config.
    ///
    /// Injects `Authorization: Bearer …` as a sensitive default header
    /// on every request.
    pub fn new(
        msp_domain: &str,
        token: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Client(format!("invalid token header value: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(msp_domain)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(msp_domain: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(msp_domain)?;
        Ok(Self { http, base_url })
    }

    /// Build the versioned base URL from the configured domain.
    ///
    /// Accepts a bare domain (`acme.firewalla.net`) or a full URL; the
    /// `/v2/` base path is appended either way.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let with_scheme = if raw.contains("://") {
            raw.to_owned()
        } else {
            format!("https://{raw}")
        };
        let mut url = Url::parse(&with_scheme)?;

        let trimmed = url.path().trim_end_matches('/').to_owned();
        if trimmed.ends_with("/v2") {
            url.set_path(&format!("{trimmed}/"));
        } else {
            url.set_path(&format!("{trimmed}/v2/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"alarms"`) onto the versioned base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        // base_url always ends with `/v2/`, so joining `alarms` works.
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn post_no_response(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        Self::handle_empty(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                // Char-based truncation: a byte slice could split a
                // multibyte character and panic.
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Classify a non-success response per the upstream error taxonomy:
    /// 401 invalid token, 404 not found, 400 validation (message passed
    /// through verbatim), anything else a generic MSP error.
    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.clone()
                }
            });

        match status {
            reqwest::StatusCode::NOT_FOUND => Error::NotFound { message },
            reqwest::StatusCode::BAD_REQUEST => Error::Validation { message },
            _ => Error::Msp {
                status: status.as_u16(),
                message,
            },
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Boxes ────────────────────────────────────────────────────────

    pub async fn list_boxes(&self, group: Option<&str>) -> Result<ListResponse<BoxInfo>, Error> {
        let mut params = Vec::new();
        if let Some(g) = group {
            params.push(("group", g.to_owned()));
        }
        self.get_with_params("boxes", &params).await
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn list_devices(
        &self,
        box_id: Option<&str>,
        group: Option<&str>,
    ) -> Result<ListResponse<Device>, Error> {
        let mut params = Vec::new();
        if let Some(b) = box_id {
            params.push(("box", b.to_owned()));
        }
        if let Some(g) = group {
            params.push(("group", g.to_owned()));
        }
        self.get_with_params("devices", &params).await
    }

    // ── Alarms ───────────────────────────────────────────────────────

    pub async fn list_alarms(&self, query: &ListQuery) -> Result<ListResponse<Alarm>, Error> {
        self.get_with_params("alarms", &query.to_params()).await
    }

    pub async fn get_alarm(&self, gid: &str, aid: u64) -> Result<Alarm, Error> {
        self.get(&format!("alarms/{gid}/{aid}")).await
    }

    pub async fn delete_alarm(&self, gid: &str, aid: u64) -> Result<(), Error> {
        self.delete(&format!("alarms/{gid}/{aid}")).await
    }

    // ── Rules ────────────────────────────────────────────────────────

    pub async fn list_rules(
        &self,
        query: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ListResponse<Rule>, Error> {
        let mut params = Vec::new();
        if let Some(q) = query {
            params.push(("query", q.to_owned()));
        }
        if let Some(l) = limit {
            params.push(("limit", l.to_string()));
        }
        self.get_with_params("rules", &params).await
    }

    pub async fn create_rule(&self, body: &RuleCreateUpdate) -> Result<Rule, Error> {
        self.post("rules", body).await
    }

    pub async fn update_rule(&self, rule_id: &str, body: &RuleCreateUpdate) -> Result<Rule, Error> {
        self.put(&format!("rules/{rule_id}"), body).await
    }

    pub async fn delete_rule(&self, rule_id: &str) -> Result<(), Error> {
        self.delete(&format!("rules/{rule_id}")).await
    }

    pub async fn pause_rule(&self, rule_id: &str) -> Result<(), Error> {
        self.post_no_response(&format!("rules/{rule_id}/pause")).await
    }

    pub async fn resume_rule(&self, rule_id: &str) -> Result<(), Error> {
        self.post_no_response(&format!("rules/{rule_id}/resume"))
            .await
    }

    // ── Flows ────────────────────────────────────────────────────────

    pub async fn list_flows(&self, query: &ListQuery) -> Result<ListResponse<Flow>, Error> {
        self.get_with_params("flows", &query.to_params()).await
    }

    // ── Target lists ─────────────────────────────────────────────────

    pub async fn list_target_lists(&self) -> Result<ListResponse<TargetList>, Error> {
        self.get("target-lists").await
    }

    pub async fn get_target_list(&self, list_id: &str) -> Result<TargetList, Error> {
        self.get(&format!("target-lists/{list_id}")).await
    }

    pub async fn create_target_list(
        &self,
        body: &TargetListCreateUpdate,
    ) -> Result<TargetList, Error> {
        self.post("target-lists", body).await
    }

    pub async fn update_target_list(
        &self,
        list_id: &str,
        body: &TargetListCreateUpdate,
    ) -> Result<TargetList, Error> {
        self.put(&format!("target-lists/{list_id}"), body).await
    }

    pub async fn delete_target_list(&self, list_id: &str) -> Result<(), Error> {
        self.delete(&format!("target-lists/{list_id}")).await
    }

    // ── Statistics ───────────────────────────────────────────────────

    pub async fn get_simple_stats(&self, group: Option<&str>) -> Result<SimpleStats, Error> {
        let mut params = Vec::new();
        if let Some(g) = group {
            params.push(("group", g.to_owned()));
        }
        self.get_with_params("stats/simple", &params).await
    }

    pub async fn get_stats(
        &self,
        stats_type: StatsType,
        group: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ListResponse<StatsRecord>, Error> {
        let mut params = Vec::new();
        if let Some(g) = group {
            params.push(("group", g.to_owned()));
        }
        if let Some(l) = limit {
            params.push(("limit", l.to_string()));
        }
        self.get_with_params(&format!("stats/{stats_type}"), &params)
            .await
    }

    // ── Trends ───────────────────────────────────────────────────────

    pub async fn get_trends(
        &self,
        trend_type: TrendType,
        group: Option<&str>,
    ) -> Result<ListResponse<TrendPoint>, Error> {
        let mut params = Vec::new();
        if let Some(g) = group {
            params.push(("group", g.to_owned()));
        }
        self.get_with_params(&format!("trends/{trend_type}"), &params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_from_bare_domain() {
        let url = MspClient::normalize_base_url("acme.firewalla.net").expect("parses");
        assert_eq!(url.as_str(), "https://acme.firewalla.net/v2/");
    }

    #[test]
    fn base_url_keeps_existing_scheme_and_version() {
        let url = MspClient::normalize_base_url("http://localhost:8080/v2").expect("parses");
        assert_eq!(url.as_str(), "http://localhost:8080/v2/");
    }
}

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://dns.hetzner.com/api/v1";

const AUTH_HEADER: &str = "Auth-API-Token";

#[derive(Deserialize, Debug, Clone)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Record {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    pub zone_id: String,
}

#[derive(Serialize, Debug)]
pub struct UpdateRecord {
    pub name: String,
    pub ttl: u64,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    pub zone_id: String,
}

#[derive(Deserialize, Debug)]
struct ZonesResponse {
    zones: Vec<Zone>,
}

#[derive(Deserialize, Debug)]
struct RecordsResponse {
    records: Vec<Record>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

/// Client for the Hetzner DNS API. Every request is authenticated with the
/// `Auth-API-Token` header.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    api_token: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_token", &"**********")
            .finish()
    }
}

impl Client {
    pub fn new(api_token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Client {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        }
    }

    /// Looks up a zone by its domain name.
    pub fn find_zone(&self, name: &str) -> Result<Zone> {
        let response = attohttpc::get(format!("{}/zones", self.base_url))
            .param("name", name)
            .header(AUTH_HEADER, self.api_token.as_str())
            .send()
            .map_err(|e| Error::api(format!("zone lookup for {} failed: {}", name, e)))?;
        if !response.is_success() {
            return Err(api_error(&format!("zone lookup for {}", name), response));
        }
        let zones: ZonesResponse = response
            .json()
            .map_err(|e| Error::api(format!("could not decode zone list: {}", e)))?;
        let zone = zones
            .zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::api(format!("no zone named {}", name)))?;
        debug!("Resolved zone {} to id {}", zone.name, zone.id);
        Ok(zone)
    }

    /// Returns all records of the given zone.
    pub fn list_records(&self, zone_id: &str) -> Result<Vec<Record>> {
        let response = attohttpc::get(format!("{}/records", self.base_url))
            .param("zone_id", zone_id)
            .header(AUTH_HEADER, self.api_token.as_str())
            .send()
            .map_err(|e| Error::api(format!("record listing for zone {} failed: {}", zone_id, e)))?;
        if !response.is_success() {
            return Err(api_error(
                &format!("record listing for zone {}", zone_id),
                response,
            ));
        }
        let records: RecordsResponse = response
            .json()
            .map_err(|e| Error::api(format!("could not decode record list: {}", e)))?;
        Ok(records.records)
    }

    /// Overwrites all data of a record.
    pub fn update_record(&self, record_id: &str, update: &UpdateRecord) -> Result<()> {
        let response = attohttpc::put(format!("{}/records/{}", self.base_url, record_id))
            .json(update)
            .map_err(|e| Error::api(format!("could not serialize record update: {}", e)))?
            .header(AUTH_HEADER, self.api_token.as_str())
            .send()
            .map_err(|e| Error::api(format!("record update for {} failed: {}", update.name, e)))?;
        if !response.is_success() {
            return Err(api_error(
                &format!("record update for {}", update.name),
                response,
            ));
        }
        Ok(())
    }
}

fn api_error(what: &str, response: attohttpc::Response) -> Error {
    let status = response.status();
    let message = match response.text() {
        Ok(body) => serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body),
        Err(e) => format!("unreadable response body: {}", e),
    };
    Error::api(format!(
        "{} failed with status {}: {}",
        what,
        status,
        message.trim()
    ))
}

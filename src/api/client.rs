use crate::analysis::audit::ProfileLookup;
use crate::analysis::classifier::TimeControl;
use crate::config::Config;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use std::io::{BufReader, Read};

use super::endpoints::{export_games_url, public_data_url, NDJSON, USER_AGENT};
use super::models::*;
use super::stream::GameStream;

pub type LiveGameStream = GameStream<BufReader<Box<dyn Read + Send + Sync + 'static>>>;

/// Filters for the game export endpoint.
#[derive(Debug, Clone)]
pub struct ExportQuery {
    pub perf_types: Vec<TimeControl>,
    pub rated: bool,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub max: Option<u32>,
}

impl ExportQuery {
    pub fn perf_type_param(&self) -> String {
        self.perf_types
            .iter()
            .map(|tc| tc.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("rated", self.rated.to_string()),
            ("perfType", self.perf_type_param()),
            ("pgnInJson", "false".to_string()),
        ];
        if let Some(since) = self.since {
            params.push(("since", since.timestamp_millis().to_string()));
        }
        if let Some(until) = self.until {
            params.push(("until", until.timestamp_millis().to_string()));
        }
        if let Some(max) = self.max {
            params.push(("max", max.to_string()));
        }
        params
    }
}

pub struct LichessClient {
    config: Config,
}

impl LichessClient {
    pub fn new(config: Config) -> Self {
        LichessClient { config }
    }

    fn get(&self, url: &str) -> ureq::Request {
        ureq::get(url)
            .set("User-Agent", USER_AGENT)
            .set("Authorization", &format!("Bearer {}", self.config.token))
    }

    fn execute_request(&self, request: ureq::Request, subject: &str) -> Result<ureq::Response, AppError> {
        log::debug!("GET {}", request.url());

        match request.call() {
            Ok(resp) => Ok(resp),
            Err(ureq::Error::Status(404, _)) => Err(AppError::PlayerNotFound(subject.to_string())),
            Err(e) => Err(AppError::HttpError(e.to_string())),
        }
    }

    /// Opens the export stream; games are read lazily as the caller iterates.
    pub fn export_games(&self, username: &str, query: &ExportQuery) -> Result<LiveGameStream, AppError> {
        let url = export_games_url(&self.config.base_url, username);
        let mut request = self.get(&url).set("Accept", NDJSON);
        for (key, value) in query.params() {
            request = request.query(key, &value);
        }

        let resp = self.execute_request(request, username)?;
        Ok(GameStream::new(BufReader::new(resp.into_reader())))
    }

    pub fn get_public_data(&self, username: &str) -> Result<PublicProfileDto, AppError> {
        let url = public_data_url(&self.config.base_url, username);
        let body = self
            .execute_request(self.get(&url), username)?
            .into_string()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }
}

impl ProfileLookup for LichessClient {
    fn is_blocked(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.get_public_data(username)?.blocking)
    }

    fn is_banned(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.get_public_data(username)?.tos_violation)
    }
}

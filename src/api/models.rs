use chrono::{DateTime, Utc};
use serde::Deserialize;

// Game export (one NDJSON line per game)
#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
#[serde(rename_all = "camelCase")]
pub struct GameDto {
    pub id: String,
    #[serde(default)]
    pub rated: bool,
    pub perf: String,
    pub status: String,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub players: PlayersDto,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct PlayersDto {
    pub white: PlayerDto,
    pub black: PlayerDto,
}

// `user` is absent for AI and anonymous players
#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    #[serde(default)]
    pub user: Option<LightUserDto>,
    #[serde(default)]
    pub rating: Option<u32>,
    #[serde(default)]
    pub ai_level: Option<u8>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct LightUserDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

// User public data; the flags are only present when true
#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileDto {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub blocking: bool,
    #[serde(default)]
    pub tos_violation: bool,
    #[serde(default)]
    pub disabled: bool,
}

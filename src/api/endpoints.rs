// Lichess API endpoints

pub const LICHESS_BASE_URL: &str = "https://lichess.org";
pub const USER_AGENT: &str = "lichess_stats/0.1.0";
pub const NDJSON: &str = "application/x-ndjson";

pub fn export_games_url(base_url: &str, username: &str) -> String {
    format!("{}/api/games/user/{}", base_url.trim_end_matches('/'), username)
}

pub fn public_data_url(base_url: &str, username: &str) -> String {
    format!("{}/api/user/{}", base_url.trim_end_matches('/'), username)
}

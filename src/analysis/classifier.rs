use crate::api::models::{GameDto, PlayerDto};
use crate::error::AppError;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lichess speed categories, named the way the `perfType` parameter spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TimeControl {
    #[value(name = "ultraBullet")]
    UltraBullet,
    Bullet,
    Blitz,
    Rapid,
    Classical,
    Correspondence,
}

impl TimeControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeControl::UltraBullet => "ultraBullet",
            TimeControl::Bullet => "bullet",
            TimeControl::Blitz => "blitz",
            TimeControl::Rapid => "rapid",
            TimeControl::Classical => "classical",
            TimeControl::Correspondence => "correspondence",
        }
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeControl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ultraBullet" => Ok(TimeControl::UltraBullet),
            "bullet" => Ok(TimeControl::Bullet),
            "blitz" => Ok(TimeControl::Blitz),
            "rapid" => Ok(TimeControl::Rapid),
            "classical" => Ok(TimeControl::Classical),
            "correspondence" => Ok(TimeControl::Correspondence),
            other => Err(format!("unknown time control '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Lose,
}

impl Outcome {
    pub fn rating_offset(self) -> i32 {
        match self {
            Outcome::Win => 400,
            Outcome::Draw => 0,
            Outcome::Lose => -400,
        }
    }
}

/// One game seen from the analyzed user's side of the board.
#[derive(Debug, Clone)]
pub struct Classification {
    pub color: Color,
    pub opponent_id: String,
    pub opponent_rating: u32,
    /// `None` while the game has no decisive result (ongoing, aborted, ...).
    pub outcome: Option<Outcome>,
    pub time_control: TimeControl,
    pub created_at: DateTime<Utc>,
}

pub fn classify(game: &GameDto, username: &str) -> Result<Classification, AppError> {
    let white_id = player_id(game, &game.players.white, "white")?;
    let color = if white_id.eq_ignore_ascii_case(username) {
        Color::White
    } else {
        Color::Black
    };

    let (opponent, opponent_side) = match color {
        Color::White => (&game.players.black, "black"),
        Color::Black => (&game.players.white, "white"),
    };
    let opponent_id = player_id(game, opponent, opponent_side)?.to_string();
    let opponent_rating = opponent
        .rating
        .ok_or_else(|| malformed(game, format!("{} player has no rating", opponent_side)))?;

    let time_control = game
        .perf
        .parse::<TimeControl>()
        .map_err(|reason| malformed(game, reason))?;

    Ok(Classification {
        color,
        opponent_id,
        opponent_rating,
        outcome: outcome(&game.status, game.winner.as_deref(), color),
        time_control,
        created_at: game.created_at,
    })
}

pub fn outcome(status: &str, winner: Option<&str>, color: Color) -> Option<Outcome> {
    if status == "draw" {
        return Some(Outcome::Draw);
    }
    let winner = winner?;
    if winner == color.as_str() {
        Some(Outcome::Win)
    } else {
        Some(Outcome::Lose)
    }
}

fn player_id<'a>(game: &GameDto, player: &'a PlayerDto, side: &str) -> Result<&'a str, AppError> {
    player
        .user
        .as_ref()
        .map(|user| user.id.as_str())
        .ok_or_else(|| malformed(game, format!("{} player has no user", side)))
}

fn malformed(game: &GameDto, reason: String) -> AppError {
    AppError::MalformedGame {
        id: game.id.clone(),
        reason,
    }
}

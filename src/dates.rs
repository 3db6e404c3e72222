use axum::http::StatusCode;
use serde::Deserialize;
use time::{macros::format_description, Date};

// Calendar days travel as `YYYY-MM-DD` on the wire.
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

pub fn parse_day(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
}

/// `?date=YYYY-MM-DD`; absent means the caller's today.
#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

impl DayQuery {
    pub fn day_or(&self, today: Date) -> Result<Date, (StatusCode, String)> {
        match self.date.as_deref() {
            None | Some("") => Ok(today),
            Some(raw) => parse_day(raw)
                .map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid date: {raw}"))),
        }
    }
}

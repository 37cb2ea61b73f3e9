use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{CreateError, ReadError, UserID, ValidationError};

#[allow(async_fn_in_trait)]
pub trait SessionRecordService {
    async fn get_session_records(&self, user_id: UserID) -> Result<Vec<SessionRecord>, ReadError>;
    async fn create_session_record(
        &self,
        user_id: UserID,
        session_record: SessionRecord,
    ) -> Result<SessionRecord, CreateError>;

    async fn has_session_record_on(
        &self,
        user_id: UserID,
        date: NaiveDate,
    ) -> Result<bool, ReadError> {
        Ok(self
            .get_session_records(user_id)
            .await?
            .iter()
            .any(|r| r.date == date))
    }

    async fn validate_session_date(
        &self,
        user_id: UserID,
        date: &str,
    ) -> Result<NaiveDate, ValidationError> {
        match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed_date) => {
                if parsed_date <= Local::now().date_naive() {
                    match self.has_session_record_on(user_id, parsed_date).await {
                        Ok(false) => Ok(parsed_date),
                        Ok(true) => Err(ValidationError::Conflict("date".to_string())),
                        Err(err) => Err(ValidationError::Other(err.into())),
                    }
                } else {
                    Err(ValidationError::Other(
                        "Date must not be in the future".into(),
                    ))
                }
            }
            Err(_) => Err(ValidationError::Other("Invalid date".into())),
        }
    }
}

/// Append-only table of training sessions per user.
///
/// Records are returned in insertion order. Implementations must reject a
/// second record on the same date for the same user with
/// [`CreateError::Conflict`].
#[allow(async_fn_in_trait)]
pub trait SessionRecordRepository {
    async fn read_session_records(&self, user_id: UserID)
    -> Result<Vec<SessionRecord>, ReadError>;
    async fn create_session_record(
        &self,
        user_id: UserID,
        session_record: SessionRecord,
    ) -> Result<SessionRecord, CreateError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub date: NaiveDate,
    /// Free text as entered, e.g. `1:34:00`.
    pub duration: String,
    pub rating: Rating,
    pub values: BTreeMap<String, Value>,
}

impl SessionRecord {
    /// Load or duration recorded for `exercise`, 0 if it was not performed.
    #[must_use]
    pub fn amount(&self, exercise: &str) -> f32 {
        self.values.get(exercise).map_or(0.0, Value::amount)
    }
}

#[derive(AsRefStr, Display, EnumIter, EnumString, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Rating {
    Poor,
    #[default]
    Normal,
    Good,
}

/// Exercise value as stored by the record store.
///
/// Spreadsheet-backed stores hand over cells as text, so a value is either a
/// number or the raw text of a cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),
    Text(String),
}

impl Value {
    /// Non-negative amount of this value, 0 for anything that is not a usable number.
    #[must_use]
    pub fn amount(&self) -> f32 {
        match self {
            Value::Number(number) => non_negative(*number),
            Value::Text(text) => parse_amount(text),
        }
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

/// Parse a load or duration, accepting a decimal comma. Returns 0 on failure.
#[must_use]
pub fn parse_amount(text: &str) -> f32 {
    text.replace(',', ".")
        .trim()
        .parse::<f32>()
        .map_or(0.0, non_negative)
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

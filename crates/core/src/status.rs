//! Record status vocabulary shared by categories, authors and books.
//!
//! Clients speak a tri-state status: `1` active, `0` inactive, `2` deleted.
//! Storage keeps only the availability half (`0`/`1`) in the `status`
//! column; deletion lives in a separate `deleted_at` column so that a
//! deleted book and an out-of-stock book never share a value.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::StatusId;

/// Public record status.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    Inactive = 0,
    Active = 1,
    Deleted = 2,
}

impl RecordStatus {
    /// Return the numeric status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Whether this status may be written through an explicit status update.
    ///
    /// Only the active/inactive toggle is exposed; deletion goes through the
    /// soft-delete operation and there is no undelete path.
    pub fn ensure_settable(self) -> Result<Self, CoreError> {
        match self {
            RecordStatus::Active | RecordStatus::Inactive => Ok(self),
            RecordStatus::Deleted => Err(CoreError::Validation(
                "Status must be 0 (inactive) or 1 (active)".into(),
            )),
        }
    }

    /// Availability derived from stock on book updates: zero stock means
    /// the book is inactive.
    pub fn for_stock(stock: i32) -> Self {
        if stock == 0 {
            RecordStatus::Inactive
        } else {
            RecordStatus::Active
        }
    }
}

impl From<RecordStatus> for StatusId {
    fn from(value: RecordStatus) -> Self {
        value as StatusId
    }
}

impl TryFrom<i64> for RecordStatus {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RecordStatus::Inactive),
            1 => Ok(RecordStatus::Active),
            2 => Ok(RecordStatus::Deleted),
            other => Err(format!("unknown status {other}")),
        }
    }
}

impl Serialize for RecordStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i16(self.id())
    }
}

/// Browser clients send the status either as a number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum StatusRepr {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for RecordStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match StatusRepr::deserialize(deserializer)? {
            StatusRepr::Number(n) => n,
            StatusRepr::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| de::Error::custom(format!("invalid status '{s}'")))?,
        };
        RecordStatus::try_from(raw).map_err(de::Error::custom)
    }
}

//! Domain entities for the campus coffee review system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// A registered user. Users author reviews and approve the reviews of others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// `None` until the user has been persisted.
    pub id: Option<i64>,
    pub login_name: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Stamped by the storage layer.
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A point of sale: a coffee spot on campus that can be reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    /// `None` until the POS has been persisted.
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub campus: Campus,
    pub pos_type: PosType,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Campus {
    Altstadt,
    Bergheim,
    Neuenheim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PosType {
    Cafe,
    VendingMachine,
    Bakery,
}

/// A review of a POS.
///
/// Reviews are approved once they received a configurable number of
/// approvals. `approval_count` and `approved` are updated exclusively by the
/// review service's approve operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// `None` until the review has been persisted.
    pub id: Option<i64>,
    pub text: String,
    pub author_id: i64,
    pub pos_id: i64,
    pub approval_count: u32,
    pub approved: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// An inbound review that has not passed validation yet.
///
/// Unlike [`Review`], the author and POS references may still be missing
/// here; the review service rejects such drafts instead of persisting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub id: Option<i64>,
    pub text: String,
    pub author_id: Option<i64>,
    pub pos_id: Option<i64>,
    pub approval_count: u32,
    pub approved: bool,
}

impl fmt::Display for Campus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Campus::Altstadt => "altstadt",
            Campus::Bergheim => "bergheim",
            Campus::Neuenheim => "neuenheim",
        };
        f.write_str(s)
    }
}

impl FromStr for Campus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "altstadt" => Ok(Campus::Altstadt),
            "bergheim" => Ok(Campus::Bergheim),
            "neuenheim" => Ok(Campus::Neuenheim),
            other => Err(format!("unknown campus '{}'", other)),
        }
    }
}

impl fmt::Display for PosType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PosType::Cafe => "cafe",
            PosType::VendingMachine => "vending_machine",
            PosType::Bakery => "bakery",
        };
        f.write_str(s)
    }
}

impl FromStr for PosType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cafe" => Ok(PosType::Cafe),
            "vending_machine" => Ok(PosType::VendingMachine),
            "bakery" => Ok(PosType::Bakery),
            other => Err(format!("unknown POS type '{}'", other)),
        }
    }
}

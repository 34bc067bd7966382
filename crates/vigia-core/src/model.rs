//! Canonical domain types and status/name normalization.
//!
//! Wire aggregates that are shape-identical on both sides
//! ([`SummaryCounts`], [`DowntimeEntry`]) are re-exported from
//! `vigia-api` rather than duplicated.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;
use vigia_api::{SystemEntry, SystemStatus};

pub use vigia_api::{DowntimeEntry, SummaryCounts};

/// Status string recorded when a live check fails on the client side.
pub const ERROR_STATUS: &str = "ERRO";

/// Presentation class for an empty or missing status.
pub const FALLBACK_CLASS: &str = "other";

/// One monitored system: a name (unique within its server group) and the
/// URL the backend probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct System {
    pub name: String,
    pub url: String,
}

impl From<SystemEntry> for System {
    fn from(entry: SystemEntry) -> Self {
        Self {
            name: entry.name,
            url: entry.url,
        }
    }
}

/// Last known health of one system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: String,
    #[serde(default)]
    pub checked_at: Option<String>,
}

impl StatusRecord {
    /// Presentation class for this record's status.
    pub fn class(&self) -> String {
        status_class(&self.status)
    }
}

impl From<SystemStatus> for StatusRecord {
    fn from(status: SystemStatus) -> Self {
        Self {
            status: status.status,
            checked_at: status.checked_at,
        }
    }
}

/// Normalize a status string into its presentation class.
///
/// Lowercases and collapses each whitespace run into a single hyphen;
/// the empty string maps to [`FALLBACK_CLASS`]. Unknown statuses pass
/// through as their own normalized word — the backend owns the
/// vocabulary, the client only styles it.
pub fn status_class(status: &str) -> String {
    if status.is_empty() {
        return FALLBACK_CLASS.to_owned();
    }
    let mut out = String::with_capacity(status.len());
    let mut in_whitespace = false;
    for ch in status.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push('-');
                in_whitespace = true;
            }
        } else {
            in_whitespace = false;
            out.extend(ch.to_lowercase());
        }
    }
    if out.is_empty() {
        FALLBACK_CLASS.to_owned()
    } else {
        out
    }
}

/// Full presentation class of a card, loading placeholder included.
pub fn card_class(record: Option<&StatusRecord>) -> String {
    record.map_or_else(
        || "system-card loading".to_owned(),
        |record| format!("system-card {}", record.class()),
    )
}

/// Normalize a name into a stable, selector-safe identifier: lowercase,
/// with every run of non-alphanumeric characters collapsed into a single
/// hyphen.
///
/// Two names may normalize to the same id and will then share a panel
/// handle; no dedup is attempted.
pub fn safe_id(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_run = false;
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() {
            in_run = false;
            out.push(ch.to_ascii_lowercase());
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }
    out
}

/// Known presentation classes, for styling. Anything the backend invents
/// beyond these lands in `Other` with its normalized class.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StatusKind {
    Up,
    Down,
    Forbidden,
    Loading,
    Erro,
    #[strum(default)]
    Other(String),
}

impl StatusKind {
    /// Classify a raw status string via its normalized class.
    pub fn classify(status: &str) -> Self {
        let class = status_class(status);
        Self::from_str(&class).unwrap_or_else(|_| Self::Other(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_class_lowercases_known_statuses() {
        assert_eq!(status_class("UP"), "up");
        assert_eq!(status_class("DOWN"), "down");
        assert_eq!(status_class("FORBIDDEN"), "forbidden");
        assert_eq!(status_class("ERRO"), "erro");
    }

    #[test]
    fn status_class_collapses_whitespace_runs() {
        assert_eq!(status_class("SERVICE  UNAVAILABLE"), "service-unavailable");
        assert_eq!(status_class("Gateway\tTimeout"), "gateway-timeout");
    }

    #[test]
    fn status_class_empty_maps_to_fallback() {
        assert_eq!(status_class(""), FALLBACK_CLASS);
    }

    #[test]
    fn status_class_unknown_passes_through_normalized() {
        assert_eq!(status_class("MAINTENANCE"), "maintenance");
    }

    #[test]
    fn card_class_matches_dashboard_selectors() {
        let up = StatusRecord {
            status: "UP".into(),
            checked_at: Some("2024-01-01 00:00:00".into()),
        };
        assert_eq!(card_class(Some(&up)), "system-card up");

        let erro = StatusRecord {
            status: ERROR_STATUS.into(),
            checked_at: None,
        };
        assert_eq!(card_class(Some(&erro)), "system-card erro");

        assert_eq!(card_class(None), "system-card loading");
    }

    #[test]
    fn safe_id_collapses_special_characters() {
        assert_eq!(safe_id("servidor-produtos-principais"), "servidor-produtos-principais");
        assert_eq!(safe_id("Servidor Produtos (2)"), "servidor-produtos-2-");
        assert_eq!(safe_id("bg.arialief.com"), "bg-arialief-com");
    }

    #[test]
    fn safe_id_collision_is_possible() {
        // Known limitation: distinct names can share an id.
        assert_eq!(safe_id("srv 1"), safe_id("srv-1"));
    }

    #[test]
    fn classify_known_and_unknown() {
        assert_eq!(StatusKind::classify("UP"), StatusKind::Up);
        assert_eq!(StatusKind::classify("forbidden"), StatusKind::Forbidden);
        assert_eq!(StatusKind::classify("ERRO"), StatusKind::Erro);
        assert_eq!(
            StatusKind::classify("MAINTENANCE"),
            StatusKind::Other("maintenance".into())
        );
        assert_eq!(
            StatusKind::classify(""),
            StatusKind::Other(FALLBACK_CLASS.into())
        );
    }
}

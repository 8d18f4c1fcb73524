// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cupflow application intake service.
//!
//! Defines the error taxonomy, the application domain model, and the
//! notifier trait seam used between the HTTP gateway and the admin console.
//! This crate performs no I/O.

pub mod error;
pub mod traits;
pub mod types;

pub use error::CupflowError;
pub use traits::AdminNotifier;
pub use types::{
    Application, ApplicationFilter, ApplicationKind, ApplicationStatus, NewApplication,
    StatusFilter,
};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn status_display_and_from_str_round_trip() {
        let variants = [
            ApplicationStatus::New,
            ApplicationStatus::InProgress,
            ApplicationStatus::Done,
            ApplicationStatus::Rejected,
        ];
        for variant in variants {
            let token = variant.to_string();
            let parsed = ApplicationStatus::from_str(&token).expect("should parse back");
            assert_eq!(variant, parsed);
        }
        assert_eq!(ApplicationStatus::InProgress.to_string(), "in_progress");
    }

    #[test]
    fn kind_tokens_match_the_http_contract() {
        assert_eq!(ApplicationKind::Cups.to_string(), "cups");
        assert_eq!(ApplicationKind::Brand.to_string(), "brand");
        assert_eq!(
            ApplicationKind::from_str("brand").unwrap(),
            ApplicationKind::Brand
        );
        assert!(ApplicationKind::from_str("widget").is_err());
    }

    #[test]
    fn application_serializes_kind_under_the_type_key() {
        let app = Application {
            id: 7,
            kind: ApplicationKind::Cups,
            contact: "Анна".into(),
            phone: "79990001122".into(),
            city: Some("Казань".into()),
            size: None,
            comment: None,
            status: ApplicationStatus::New,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["type"], "cups");
        assert_eq!(json["status"], "new");
        assert!(json["size"].is_null());

        let back: Application = serde_json::from_value(json).unwrap();
        assert_eq!(back, app);
    }

    #[test]
    fn active_filter_is_a_status_set_not_a_single_status() {
        let filter = ApplicationFilter::active();
        assert_eq!(filter.kind, None);
        assert_eq!(filter.status, Some(StatusFilter::Active));
        assert_eq!(ApplicationStatus::ACTIVE.len(), 2);
    }

    #[test]
    fn error_variants_can_be_constructed() {
        let _config = CupflowError::Config("test".into());
        let _storage = CupflowError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = CupflowError::Channel {
            message: "test".into(),
            source: None,
        };
        let _internal = CupflowError::Internal("test".into());
    }
}

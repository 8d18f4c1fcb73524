// SPDX-FileCopyrightText: 2026 Cupflow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text filter resolution for list commands.
//!
//! Turns the raw argument of a `/заявки` command into a structured
//! [`ApplicationFilter`] plus a human-readable description. Pure and total:
//! unrecognized text falls back to the implicit "active" filter, never to
//! "show everything".

use cupflow_core::types::{ApplicationFilter, ApplicationKind, ApplicationStatus, StatusFilter};

/// A resolved filter: the structured predicate, the normalized raw text that
/// produced it (re-encoded into pagination controls), and a display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFilter {
    pub filter: ApplicationFilter,
    pub raw: String,
    pub description: String,
}

const CUPS_KEYWORDS: [&str; 2] = ["стаканчики", "cups"];
const BRAND_KEYWORDS: [&str; 2] = ["бренд", "brand"];

/// Status keyword sets in fixed priority order; the first matching set wins.
/// Spellings with and without the `ё` diacritic map to the same status.
const STATUS_KEYWORDS: [(&[&str], ApplicationStatus, &str); 4] = [
    (&["новые", "new"], ApplicationStatus::New, "новые"),
    (
        &["в работе", "in progress"],
        ApplicationStatus::InProgress,
        "в работе",
    ),
    (
        &["завершённые", "завершенные", "done"],
        ApplicationStatus::Done,
        "завершённые",
    ),
    (
        &["отклонённые", "отклоненные", "rejected"],
        ApplicationStatus::Rejected,
        "отклонённые",
    ),
];

/// Resolve free-text filter input. Case-insensitive; never fails.
pub fn resolve(raw: &str) -> ResolvedFilter {
    let raw = raw.trim().to_lowercase();

    let kind = if CUPS_KEYWORDS.iter().any(|k| raw.contains(k)) {
        Some(ApplicationKind::Cups)
    } else if BRAND_KEYWORDS.iter().any(|k| raw.contains(k)) {
        Some(ApplicationKind::Brand)
    } else {
        None
    };

    let mut status = None;
    let mut status_label = None;
    for (keywords, value, label) in STATUS_KEYWORDS {
        if keywords.iter().any(|k| raw.contains(k)) {
            status = Some(StatusFilter::Is(value));
            status_label = Some(label);
            break;
        }
    }

    if kind.is_none() && status.is_none() {
        return ResolvedFilter {
            filter: ApplicationFilter::active(),
            raw,
            description: "активные".to_string(),
        };
    }

    let mut parts = Vec::new();
    if let Some(kind) = kind {
        parts.push(match kind {
            ApplicationKind::Cups => "стаканчики",
            ApplicationKind::Brand => "бренды",
        });
    }
    if let Some(label) = status_label {
        parts.push(label);
    }

    ResolvedFilter {
        filter: ApplicationFilter { kind, status },
        raw,
        description: parts.join(" + "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_resolves_to_the_active_set() {
        let resolved = resolve("");
        assert_eq!(resolved.filter, ApplicationFilter::active());
        assert_eq!(resolved.description, "активные");
    }

    #[test]
    fn unrecognized_input_still_resolves_to_active() {
        let resolved = resolve("что-то непонятное");
        assert_eq!(resolved.filter.status, Some(StatusFilter::Active));
        assert_eq!(resolved.filter.kind, None);
    }

    #[test]
    fn type_keywords_select_the_kind() {
        assert_eq!(
            resolve("стаканчики").filter.kind,
            Some(ApplicationKind::Cups)
        );
        assert_eq!(resolve("бренд").filter.kind, Some(ApplicationKind::Brand));
        assert_eq!(resolve("cups").filter.kind, Some(ApplicationKind::Cups));
    }

    #[test]
    fn type_without_status_leaves_status_unset() {
        let resolved = resolve("бренд");
        assert_eq!(resolved.filter.status, None);
        assert_eq!(resolved.description, "бренды");
    }

    #[test]
    fn brand_done_combination_resolves_both_fields() {
        for input in ["бренд завершённые", "бренд завершенные"] {
            let resolved = resolve(input);
            assert_eq!(resolved.filter.kind, Some(ApplicationKind::Brand));
            assert_eq!(
                resolved.filter.status,
                Some(StatusFilter::Is(ApplicationStatus::Done)),
                "input: {input}"
            );
            assert_eq!(resolved.description, "бренды + завершённые");
        }
    }

    #[test]
    fn diacritic_variants_map_to_the_same_status() {
        assert_eq!(
            resolve("отклонённые").filter.status,
            resolve("отклоненные").filter.status,
        );
    }

    #[test]
    fn status_priority_order_takes_the_first_match() {
        // Contains both "новые" and "в работе": the earlier set wins.
        let resolved = resolve("новые в работе");
        assert_eq!(
            resolved.filter.status,
            Some(StatusFilter::Is(ApplicationStatus::New))
        );
    }

    #[test]
    fn input_is_case_insensitive() {
        assert_eq!(resolve("БРЕНД").filter.kind, Some(ApplicationKind::Brand));
        assert_eq!(
            resolve("Новые").filter.status,
            Some(StatusFilter::Is(ApplicationStatus::New))
        );
    }

    #[test]
    fn english_aliases_work() {
        let resolved = resolve("brand done");
        assert_eq!(resolved.filter.kind, Some(ApplicationKind::Brand));
        assert_eq!(
            resolved.filter.status,
            Some(StatusFilter::Is(ApplicationStatus::Done))
        );
    }
}

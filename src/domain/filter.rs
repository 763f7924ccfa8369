//! Listing filters. A filter is a conjunction of optional predicates; an empty filter matches all.

use super::{Complaint, ComplaintCategory, ComplaintStatus, Identity, Role};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Case-insensitive substring searched in title and description, matched as typed.
    /// Blank means no predicate.
    pub search: Option<String>,
    pub category: Option<ComplaintCategory>,
    pub status: Option<ComplaintStatus>,
    pub station: Option<String>,
    /// Inclusive lower bound on the incident date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the incident date.
    pub date_to: Option<NaiveDate>,
}

impl ComplaintFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, complaint: &Complaint) -> bool {
        if let Some(needle) = self.search.as_deref() {
            if !needle.trim().is_empty() {
                let needle = needle.to_lowercase();
                if !complaint.title.to_lowercase().contains(&needle)
                    && !complaint.description.to_lowercase().contains(&needle)
                {
                    return false;
                }
            }
        }
        if self.category.is_some_and(|c| c != complaint.category) {
            return false;
        }
        if self.status.is_some_and(|s| s != complaint.status) {
            return false;
        }
        if self
            .station
            .as_deref()
            .is_some_and(|s| s != complaint.station)
        {
            return false;
        }
        if self.date_from.is_some_and(|from| complaint.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| complaint.date > to) {
            return false;
        }
        true
    }
}

/// Whether `viewer` may see `complaint` at all. Travelers only see their own.
pub fn is_visible_to(complaint: &Complaint, viewer: &Identity) -> bool {
    match viewer.role {
        Role::Traveler => complaint.is_owned_by(&viewer.id),
        Role::Agent => true,
    }
}

/// Visibility plus filter, newest-created first.
pub fn select<'a>(
    complaints: impl IntoIterator<Item = &'a Complaint>,
    viewer: &Identity,
    filter: &ComplaintFilter,
) -> Vec<Complaint> {
    let mut out: Vec<Complaint> = complaints
        .into_iter()
        .filter(|c| is_visible_to(c, viewer) && filter.matches(c))
        .cloned()
        .collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComplaintDraft;
    use chrono::{TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn complaint(id: &str, owner: &str, day: &str, title: &str) -> Complaint {
        let created = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::hours(id.len() as i64))
            .unwrap();
        Complaint::submit(
            id.to_string(),
            owner.to_string(),
            ComplaintDraft {
                title: title.to_string(),
                description: "Air conditioning broken in car 3".into(),
                category: ComplaintCategory::Technical,
                station: "Gare d'Oran".into(),
                line: None,
                date: date(day),
                attachments: vec![],
            },
            format!("{id}-h"),
            created,
        )
    }

    fn viewer(id: &str, role: Role) -> Identity {
        Identity {
            id: id.into(),
            email: format!("{id}@example.com"),
            name: id.into(),
            role,
            phone: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn inclusive_date_range() {
        let all = [
            complaint("a", "1", "2024-01-10", "First"),
            complaint("b", "1", "2024-01-15", "Second"),
        ];
        let filter = ComplaintFilter {
            date_from: Some(date("2024-01-12")),
            date_to: Some(date("2024-01-20")),
            ..Default::default()
        };
        let hits = select(&all, &viewer("agent", Role::Agent), &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "b");

        let edges = ComplaintFilter {
            date_from: Some(date("2024-01-10")),
            date_to: Some(date("2024-01-10")),
            ..Default::default()
        };
        let hits = select(&all, &viewer("agent", Role::Agent), &edges);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
    }

    #[test]
    fn search_is_case_insensitive_over_title_or_description() {
        let c = complaint("a", "1", "2024-01-10", "Delayed train");
        let by_title = ComplaintFilter {
            search: Some("DELAYED".into()),
            ..Default::default()
        };
        let by_desc = ComplaintFilter {
            search: Some("air condition".into()),
            ..Default::default()
        };
        let miss = ComplaintFilter {
            search: Some("refund".into()),
            ..Default::default()
        };
        let blank = ComplaintFilter {
            search: Some("  ".into()),
            ..Default::default()
        };
        assert!(by_title.matches(&c));
        assert!(by_desc.matches(&c));
        assert!(!miss.matches(&c));
        assert!(blank.matches(&c));
    }

    #[test]
    fn search_keeps_surrounding_spaces() {
        let c = complaint("a", "1", "2024-01-10", "Delayed train");
        let leading = ComplaintFilter {
            search: Some(" train".into()),
            ..Default::default()
        };
        let trailing = ComplaintFilter {
            search: Some("train ".into()),
            ..Default::default()
        };
        assert!(leading.matches(&c));
        assert!(!trailing.matches(&c));
    }

    #[test]
    fn predicates_are_conjunctive() {
        let c = complaint("a", "1", "2024-01-10", "Delayed train");
        let filter = ComplaintFilter {
            category: Some(ComplaintCategory::Technical),
            station: Some("Gare d'Oran".into()),
            status: Some(ComplaintStatus::Submitted),
            ..Default::default()
        };
        assert!(filter.matches(&c));
        let wrong_station = ComplaintFilter {
            station: Some("Gare d'Alger".into()),
            ..filter.clone()
        };
        assert!(!wrong_station.matches(&c));
        let wrong_status = ComplaintFilter {
            status: Some(ComplaintStatus::Treated),
            ..filter
        };
        assert!(!wrong_status.matches(&c));
    }

    #[test]
    fn traveler_never_sees_other_owners() {
        let all = [
            complaint("mine", "1", "2024-01-10", "Mine"),
            complaint("theirs", "3", "2024-01-11", "Theirs"),
        ];
        let traveler = viewer("1", Role::Traveler);
        let hits = select(&all, &traveler, &ComplaintFilter::default());
        assert_eq!(hits.len(), 1);
        assert!(hits.iter().all(|c| c.user_id == "1"));

        let agent_hits = select(&all, &viewer("2", Role::Agent), &ComplaintFilter::default());
        assert_eq!(agent_hits.len(), 2);
        // newest created first
        assert_eq!(agent_hits[0].id, "theirs");
    }
}

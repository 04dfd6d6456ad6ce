//! Behavioural properties of the company aggregate


use bdd_support::{event_summary, ExpectEvents};
use company_domain::{Company, CompanyEvent, Tag, TAG_NAME_MAX_LEN};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;

fn tag(name: &str) -> Tag {
    Tag::new(name).unwrap()
}

fn tag_name() -> impl Strategy<Value = String> {
    // Small alphabet so generated lists contain duplicates
    proptest::string::string_regex(&format!("[a-e]{{1,{}}}", 2.min(TAG_NAME_MAX_LEN))).unwrap()
}

fn company_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 &.-]{0,254}"
}

#[test]
fn scenario_duplicate_tag_is_collapsed() {
    let mut acme = Company::create("Acme").unwrap();

    acme.add_tag(tag("fintech"));
    acme.add_tag(tag("fintech"));

    assert_eq!(acme.tag_names(), vec!["fintech"]);
    let events = acme.take_events();
    assert_eq!(
        event_summary(&events),
        vec![("TagAdded".to_string(), "fintech".to_string())]
    );
}

#[test]
fn scenario_remove_middle_tag() {
    let mut company = Company::create("Acme").unwrap();
    company.add_tags(vec![tag("a"), tag("b"), tag("c")]);
    company.take_events();

    company.remove_tag("b");

    assert_eq!(company.tag_names(), vec!["a", "c"]);
    let events = company.take_events();
    events.expect_types(&["TagRemoved"]);
    assert_eq!(events[0].tag().name(), "b");
}

#[test]
fn distinct_records_with_same_name_share_membership() {
    let mut acme = Company::create("Acme").unwrap();
    let first = tag("saas");
    let second = tag("saas");
    assert_ne!(
        company_domain::AggregateRoot::id(&first),
        company_domain::AggregateRoot::id(&second)
    );

    acme.add_tag(first);
    acme.add_tag(second);

    assert_eq!(acme.tags().len(), 1);
}

#[test]
fn events_snapshot_the_company_name_at_change_time() {
    let mut acme = Company::create("Acme").unwrap();
    acme.add_tag(tag("a"));
    acme.update_name("Acme Corp").unwrap();
    acme.add_tag(tag("b"));

    let names: Vec<String> = acme
        .take_events()
        .into_iter()
        .map(|e| match e {
            CompanyEvent::TagAdded(added) => added.company_name,
            CompanyEvent::TagRemoved(removed) => removed.company_name,
        })
        .collect();
    assert_eq!(names, vec!["Acme", "Acme Corp"]);
}

proptest! {
    #[test]
    fn create_keeps_any_valid_name(name in company_name()) {
        let company = Company::create(name.clone()).unwrap();
        prop_assert_eq!(company.name(), name.as_str());
        prop_assert!(company.tags().is_empty());
        prop_assert!(company.pending_events().is_empty());
    }

    #[test]
    fn add_tags_collapses_duplicates(names in proptest::collection::vec(tag_name(), 0..24)) {
        let mut company = Company::create("Acme").unwrap();
        company.add_tags(names.iter().map(|n| tag(n)));

        let mut seen = HashSet::new();
        let expected: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|n| seen.insert(*n))
            .collect();

        prop_assert_eq!(company.tag_names(), expected.clone());

        let events = company.take_events();
        prop_assert_eq!(events.len(), expected.len());
        for (event, name) in events.iter().zip(expected) {
            prop_assert!(matches!(event, CompanyEvent::TagAdded(_)));
            prop_assert_eq!(event.tag().name(), name);
        }
    }

    #[test]
    fn remove_tags_empties_and_reports_each(names in proptest::collection::vec(tag_name(), 0..24)) {
        let mut company = Company::create("Acme").unwrap();
        company.add_tags(names.iter().map(|n| tag(n)));
        let present: Vec<String> = company.tag_names().iter().map(|n| n.to_string()).collect();
        company.take_events();

        let removed = company.remove_tags();

        prop_assert!(company.tags().is_empty());
        prop_assert_eq!(removed, present.len());
        let events = company.take_events();
        let removed_names: Vec<String> = events
            .iter()
            .map(|e| {
                assert!(matches!(e, CompanyEvent::TagRemoved(_)));
                e.tag().name().to_string()
            })
            .collect();
        prop_assert_eq!(removed_names, present);
    }

    #[test]
    fn second_add_of_same_name_is_noop(name in tag_name()) {
        let mut company = Company::create("Acme").unwrap();
        prop_assert!(company.add_tag(tag(&name)));
        prop_assert!(!company.add_tag(tag(&name)));
        prop_assert_eq!(company.tags().len(), 1);
        prop_assert_eq!(company.pending_events().len(), 1);
    }

    #[test]
    fn removing_absent_name_changes_nothing(
        names in proptest::collection::vec(tag_name(), 0..10),
        absent in "[x-z]{1,3}",
    ) {
        let mut company = Company::create("Acme").unwrap();
        company.add_tags(names.iter().map(|n| tag(n)));
        let before: Vec<String> = company.tag_names().iter().map(|n| n.to_string()).collect();
        company.take_events();

        prop_assert!(company.remove_tag(&absent).is_none());

        let after: Vec<String> = company.tag_names().iter().map(|n| n.to_string()).collect();
        prop_assert_eq!(after, before);
        prop_assert!(company.pending_events().is_empty());
    }
}

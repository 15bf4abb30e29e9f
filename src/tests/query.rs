use crate::{
    entity::ContainerEntity,
    nodekey::EntityKey,
    properties::{EntityKind, EntityRef},
    query::{EntityPred, WrappedRegex},
    tests::helpers::create_web_container,
};
use test_log::test;

fn selected_names(pred: &EntityPred) -> Vec<String> {
    let graph = create_web_container();
    graph
        .select(pred)
        .into_iter()
        .filter_map(|entity| graph.entity(entity).map(|node| node.name().to_string()))
        .collect()
}

#[test]
fn select_by_kind_is_sorted() {
    assert_eq!(
        selected_names(&EntityPred::kind(EntityKind::Trigger)),
        vec!["All Pages", "Internal Traffic", "Outbound Click", "Unused Trigger"]
    );
}

#[test]
fn select_unused_skips_tags() {
    assert_eq!(
        selected_names(&EntityPred::unused()),
        vec!["Page URL", "Unused Constant", "Unused Trigger"]
    );
}

#[test]
fn select_builtins() {
    assert_eq!(
        selected_names(&EntityPred::And(vec![
            EntityPred::BuiltIn,
            EntityPred::kind(EntityKind::Variable)
        ])),
        vec!["Click URL", "Page Hostname", "Page Path", "Page URL"]
    );
    assert_eq!(
        selected_names(&EntityPred::And(vec![
            EntityPred::BuiltIn,
            EntityPred::kind(EntityKind::Trigger)
        ])),
        vec!["All Pages"]
    );
}

#[test]
fn name_regex_is_case_insensitive() {
    let re: WrappedRegex = "^page".parse().unwrap();
    assert_eq!(
        selected_names(&EntityPred::NameMatches(re)),
        vec!["Page Hostname", "Page Path", "Page URL"]
    );
}

#[test]
fn invalid_regex_falls_back_to_literal() {
    let re: WrappedRegex = "Click (".parse().unwrap();
    assert!(re.is_match("click ("));
    assert!(!re.is_match("Click Event"));
}

#[test]
fn field_predicate_matches_payload_text() {
    let re: WrappedRegex = "^gaawe$".parse().unwrap();
    assert_eq!(
        selected_names(&EntityPred::Field("type".to_string(), re)),
        vec!["Click Event"]
    );
}

#[test]
fn combinators_compose() {
    let pred = EntityPred::And(vec![
        EntityPred::kind(EntityKind::Variable),
        EntityPred::Not(Box::new(EntityPred::Or(vec![
            EntityPred::BuiltIn,
            EntityPred::Unreferenced,
        ]))),
    ]);
    assert_eq!(selected_names(&pred), vec!["Event Name", "Measurement ID"]);
}

#[test]
fn entity_key_converts_to_predicate() {
    let graph = create_web_container();
    let key: EntityKey = "trigger:id:12".parse().unwrap();
    let selected = graph.select(&EntityPred::from(&key));
    assert_eq!(selected.len(), 1);
    assert_eq!(Some(selected[0]), graph.find(&key));
    assert!(matches!(selected[0], EntityRef::Trigger(_)));
}

#[test]
fn predicates_serialize() {
    let pred = EntityPred::And(vec![
        EntityPred::NameMatches("^page".parse().unwrap()),
        EntityPred::kind(EntityKind::Variable),
    ]);
    let json = serde_json::to_string(&pred).unwrap();
    let back: EntityPred = serde_json::from_str(&json).unwrap();
    assert_eq!(back, pred);
    assert_eq!(
        selected_names(&back),
        vec!["Page Hostname", "Page Path", "Page URL"]
    );
    assert_eq!(selected_names(&back), selected_names(&pred));
}

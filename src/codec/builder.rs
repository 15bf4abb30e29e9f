//! Graph assembly: the build pipeline from raw container JSON to [ContainerGraph].
//!
//! Order matters and is fixed: compile, synthesize built-ins, populate every forward edge,
//! then invert the forward edges into back edges. Back-edge construction is a pure derivation
//! of the finished forward graph, so it never runs before all forward lists are final.

use serde_json::Value;
use std::{
    collections::{hash_map::Entry, HashMap, HashSet},
    fs::read_to_string,
    path::Path,
};

use crate::{
    codec::{
        builtins::{add_builtin_triggers, add_builtin_variables},
        compiler::{compile_entities, CompiledEntities},
        diagnostic::{BuildDiagnostic, DiagnosticSource},
        input::{parse_json, RawContainerVersion},
        scanner::ReferenceScanner,
    },
    config::GraphConfig,
    container::ContainerGraph,
    entity::{ContainerEntity, Tag},
    error::GtmGraphError,
    properties::{ObjectId, TagIndex, TriggerIndex, VariableIndex},
};

pub const FIRING_TRIGGER_FIELD: &str = "firingTriggerId";
pub const BLOCKING_TRIGGER_FIELD: &str = "blockingTriggerId";

/// Build a graph with the default [GraphConfig].
///
/// `json` may be the container object itself or a JSON string holding it.
pub fn build_graph(json: &Value) -> Result<ContainerGraph, GtmGraphError> {
    GraphBuilder::default().build_value(json)
}

/// Runs one full graph build per call. Holds no state between builds.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> GraphBuilder {
        GraphBuilder { config }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn build_str(&self, content: &str) -> Result<ContainerGraph, GtmGraphError> {
        let root = parse_json(content)?;
        self.build_value(&root)
    }

    pub fn build_file<P: AsRef<Path>>(&self, path: P) -> Result<ContainerGraph, GtmGraphError> {
        tracing::debug!("[GraphBuilder::build_file] Reading {:?}", path.as_ref());
        let content = read_to_string(path)?;
        self.build_str(&content)
    }

    #[tracing::instrument(skip_all)]
    pub fn build_value(&self, root: &Value) -> Result<ContainerGraph, GtmGraphError> {
        if let Value::String(content) = root {
            return self.build_str(content);
        }
        let raw = RawContainerVersion::from_value(root)?;
        let mut diagnostics = Vec::new();

        let mut entities = compile_entities(&raw, &mut diagnostics);

        if self.config.builtin_variables {
            let added =
                add_builtin_variables(&raw.builtins, &mut entities.variables, &mut diagnostics);
            tracing::debug!(
                "[GraphBuilder::build_value] synthesized {} built-in variables",
                added
            );
        }
        add_builtin_triggers(&mut entities.triggers);

        self.map_variables(&mut entities, &mut diagnostics);
        map_triggers_in_tags(&mut entities, &mut diagnostics);
        build_back_references(&mut entities);

        for diagnostic in diagnostics.iter() {
            if diagnostic.is_unresolved_reference() {
                tracing::warn!("[GraphBuilder::build_value] {}", diagnostic);
            } else {
                tracing::debug!("[GraphBuilder::build_value] {}", diagnostic);
            }
        }
        tracing::info!(
            "[GraphBuilder::build_value] built graph: {} tags, {} triggers, {} variables, {} diagnostics",
            entities.tags.len(),
            entities.triggers.len(),
            entities.variables.len(),
            diagnostics.len()
        );
        if !self.config.keep_diagnostics {
            diagnostics.clear();
        }

        Ok(ContainerGraph::from_parts(
            raw.version.clone(),
            entities,
            diagnostics,
        ))
    }

    /// Scan every tag, trigger and variable for placeholders and write the resolved variables
    /// into its `variables` list.
    fn map_variables(
        &self,
        entities: &mut CompiledEntities,
        diagnostics: &mut Vec<BuildDiagnostic>,
    ) {
        let scanner = ReferenceScanner::new(&self.config);
        let by_name = first_wins_index(
            entities
                .variables
                .iter()
                .map(|v| v.name.clone())
                .enumerate()
                .map(|(idx, name)| (name, VariableIndex(idx))),
        );
        let lookup = |name: &str| by_name.get(name).copied();

        for tag in entities.tags.iter_mut() {
            tag.variables = scan_entity(&scanner, &*tag, lookup, diagnostics);
        }
        for trigger in entities.triggers.iter_mut() {
            trigger.variables = scan_entity(&scanner, &*trigger, lookup, diagnostics);
        }
        for variable in entities.variables.iter_mut() {
            variable.variables = scan_entity(&scanner, &*variable, lookup, diagnostics);
        }
    }
}

fn first_wins_index<K, V, I>(entries: I) -> HashMap<K, V>
where
    K: std::hash::Hash + Eq,
    I: IntoIterator<Item = (K, V)>,
{
    let mut index = HashMap::new();
    for (key, value) in entries {
        if let Entry::Vacant(slot) = index.entry(key) {
            slot.insert(value);
        }
    }
    index
}

fn diagnostic_source<E: ContainerEntity>(entity: &E) -> DiagnosticSource {
    DiagnosticSource {
        kind: entity.kind(),
        object_id: entity.object_id().clone(),
        name: entity.name().to_string(),
    }
}

fn scan_entity<E, F>(
    scanner: &ReferenceScanner<'_>,
    entity: &E,
    lookup: F,
    diagnostics: &mut Vec<BuildDiagnostic>,
) -> Vec<VariableIndex>
where
    E: ContainerEntity,
    F: Fn(&str) -> Option<VariableIndex>,
{
    let names = scanner.scan_fields(entity.fields());
    let (resolved, unresolved) = scanner.resolve(&names, lookup);
    diagnostics.extend(
        unresolved
            .into_iter()
            .map(|name| BuildDiagnostic::UnresolvedVariable {
                source: diagnostic_source(entity),
                name,
            }),
    );
    resolved
}

/// Firing trigger IDs followed by blocking trigger IDs, deduplicated by value. Either field may
/// hold an array or a single scalar.
pub fn tag_trigger_ids(tag: &Tag) -> Vec<ObjectId> {
    let mut ids = Vec::new();
    for field in [FIRING_TRIGGER_FIELD, BLOCKING_TRIGGER_FIELD] {
        match tag.fields.get(field) {
            Some(Value::Array(items)) => ids.extend(items.iter().filter_map(ObjectId::from_value)),
            Some(value) => ids.extend(ObjectId::from_value(value)),
            None => {}
        }
    }
    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
    ids
}

/// Resolve every tag's trigger IDs, overwriting its `triggers` list.
fn map_triggers_in_tags(entities: &mut CompiledEntities, diagnostics: &mut Vec<BuildDiagnostic>) {
    let by_id = first_wins_index(
        entities
            .triggers
            .iter()
            .enumerate()
            .map(|(idx, trigger)| (trigger.object_id.clone(), TriggerIndex(idx))),
    );

    for tag in entities.tags.iter_mut() {
        let mut triggers = Vec::new();
        for trigger_id in tag_trigger_ids(tag) {
            match by_id.get(&trigger_id) {
                Some(idx) => triggers.push(*idx),
                None => diagnostics.push(BuildDiagnostic::UnresolvedTrigger {
                    tag: diagnostic_source(&*tag),
                    trigger_id,
                }),
            }
        }
        tag.triggers = triggers;
    }
}

/// Invert every forward edge onto its target.
///
/// Forward lists are already deduplicated, so the back lists come out duplicate-free without
/// further work.
pub fn build_back_references(entities: &mut CompiledEntities) {
    for (idx, tag) in entities.tags.iter().enumerate() {
        for var_idx in tag.variables.iter() {
            if let Some(variable) = entities.variables.get_mut(var_idx.index()) {
                variable.tags.push(TagIndex(idx));
            }
        }
        for trigger_idx in tag.triggers.iter() {
            if let Some(trigger) = entities.triggers.get_mut(trigger_idx.index()) {
                trigger.tags.push(TagIndex(idx));
            }
        }
    }

    for (idx, trigger) in entities.triggers.iter().enumerate() {
        for var_idx in trigger.variables.iter() {
            if let Some(variable) = entities.variables.get_mut(var_idx.index()) {
                variable.triggers.push(TriggerIndex(idx));
            }
        }
    }

    let variable_edges = entities
        .variables
        .iter()
        .enumerate()
        .flat_map(|(idx, variable)| {
            variable
                .variables
                .iter()
                .map(move |target| (VariableIndex(idx), *target))
        })
        .collect::<Vec<_>>();
    for (source, target) in variable_edges {
        if let Some(variable) = entities.variables.get_mut(target.index()) {
            variable.referencing_variables.push(source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};
    use test_log::test;

    #[test]
    fn trigger_ids_merge_firing_and_blocking() {
        let mut fields = Map::new();
        fields.insert(FIRING_TRIGGER_FIELD.to_string(), json!(["10", 11, "10"]));
        fields.insert(BLOCKING_TRIGGER_FIELD.to_string(), json!("11"));
        let tag = Tag::new(ObjectId::from("1"), "T", fields);
        assert_eq!(
            tag_trigger_ids(&tag),
            vec![ObjectId::from("10"), ObjectId::from("11")]
        );
    }

    #[test]
    fn trigger_ids_absent_fields_yield_nothing() {
        let tag = Tag::new(ObjectId::from("1"), "T", Map::new());
        assert!(tag_trigger_ids(&tag).is_empty());
    }

    #[test]
    fn first_wins_keeps_earliest() {
        let index = first_wins_index(vec![("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(index.get("a"), Some(&1));
        assert_eq!(index.get("b"), Some(&2));
    }

    #[test]
    fn rescanning_an_entity_yields_identical_indices() {
        let config = GraphConfig::default();
        let scanner = ReferenceScanner::new(&config);
        let by_name = first_wins_index(vec![
            ("A".to_string(), VariableIndex(0)),
            ("B".to_string(), VariableIndex(1)),
        ]);
        let lookup = |name: &str| by_name.get(name).copied();

        let mut fields = Map::new();
        fields.insert("html".to_string(), json!("{{A}} {{B}} {{A}}"));
        fields.insert("parameter".to_string(), json!([{"value": "{{B}}"}]));
        let tag = Tag::new(ObjectId::from("1"), "T", fields);

        let mut diagnostics = Vec::new();
        let first = scan_entity(&scanner, &tag, lookup, &mut diagnostics);
        let second = scan_entity(&scanner, &tag, lookup, &mut diagnostics);
        assert_eq!(first, vec![VariableIndex(0), VariableIndex(1)]);
        assert_eq!(first, second);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn string_payload_is_parsed() {
        let payload = Value::String(r#"{"containerVersion": {"container": {}}}"#.to_string());
        let graph = build_graph(&payload).unwrap();
        assert_eq!(graph.num_triggers(), 1);
    }

    #[test]
    fn non_object_payload_is_invalid() {
        assert!(matches!(
            build_graph(&json!(42)),
            Err(GtmGraphError::InvalidInput(_))
        ));
        assert!(matches!(
            build_graph(&json!("not json")),
            Err(GtmGraphError::InvalidInput(_))
        ));
    }

    #[test]
    fn config_can_disable_builtins_and_diagnostics() {
        let payload = json!({"containerVersion": {
            "container": {"enabledBuiltInVariable": ["PAGE_URL"]},
            "tag": [{"tagId": "1", "name": "T", "html": "{{Page URL}} {{Missing}}"}]
        }});
        let config = GraphConfig {
            builtin_variables: false,
            keep_diagnostics: false,
            ..Default::default()
        };
        let graph = GraphBuilder::new(config).build_value(&payload).unwrap();
        assert_eq!(graph.num_variables(), 0);
        assert!(graph.diagnostics().is_empty());
        assert_eq!(graph.num_triggers(), 1);
    }

    #[test]
    fn custom_reserved_names_are_skipped() {
        let payload = json!({"containerVersion": {
            "tag": [{"tagId": "1", "name": "T", "html": "{{Internal}}"}],
            "variable": [{"variableId": "2", "name": "Internal"}]
        }});
        let config = GraphConfig {
            reserved_variable_names: vec!["_event".to_string(), "Internal".to_string()],
            ..Default::default()
        };
        let graph = GraphBuilder::new(config).build_value(&payload).unwrap();
        let tag = graph.find_tag_by_name("T").unwrap();
        assert!(!tag.has_variables());
    }
}

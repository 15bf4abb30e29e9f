//! Shared test utilities for container graph tests

use serde_json::{json, Value};

use crate::{codec::build_graph, container::ContainerGraph};

/// Initialize logging for tests
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// Wrap raw collections in the `{"containerVersion": {...}}` envelope.
pub fn container_json(tags: Value, triggers: Value, variables: Value) -> Value {
    json!({
        "containerVersion": {
            "container": {},
            "tag": tags,
            "trigger": triggers,
            "variable": variables
        }
    })
}

pub fn build(payload: &Value) -> ContainerGraph {
    init_logging();
    build_graph(payload).expect("test payload builds")
}

/// The minimal one-tag, one-trigger, one-variable container.
pub fn create_simple_container() -> ContainerGraph {
    build(&container_json(
        json!([{"tagId": "1", "name": "T", "firingTriggerId": ["10"], "someField": "{{V}}"}]),
        json!([{"triggerId": "10", "name": "Trig"}]),
        json!([{"variableId": "5", "name": "V"}]),
    ))
}

/// A container exercising every edge kind:
///
/// - "GA4 Config" fires on All Pages, blocked by "Internal Traffic", uses "Measurement ID"
/// - "Click Event" fires on "Outbound Click" and uses "Click URL" (built-in) and "Event Name"
/// - "Outbound Click" filters on "Click URL" and "Page Hostname" (built-ins)
/// - "Event Name" is a lookup table keyed on "Page Path" and returning "Measurement ID"
/// - "Unused Constant" and "Unused Trigger" are referenced by nothing
pub fn create_web_container() -> ContainerGraph {
    build(&json!({
        "containerVersion": {
            "path": "accounts/1/containers/2/versions/3",
            "container": {
                "publicId": "GTM-TEST",
                "enabledBuiltInVariable": ["PAGE_URL", "PAGE_HOSTNAME", "PAGE_PATH", "CLICK_URL"]
            },
            "tag": [
                {
                    "tagId": "1",
                    "name": "GA4 Config",
                    "type": "gaawc",
                    "parameter": [{"type": "template", "key": "measurementId", "value": "{{Measurement ID}}"}],
                    "firingTriggerId": ["2147479553"],
                    "blockingTriggerId": ["12"]
                },
                {
                    "tagId": "2",
                    "name": "Click Event",
                    "type": "gaawe",
                    "parameter": [
                        {"type": "template", "key": "eventName", "value": "{{Event Name}}"},
                        {"type": "list", "key": "eventParameters", "list": [
                            {"type": "map", "map": [{"type": "template", "key": "value", "value": "{{Click URL}}"}]}
                        ]}
                    ],
                    "firingTriggerId": [11]
                }
            ],
            "trigger": [
                {
                    "triggerId": "11",
                    "name": "Outbound Click",
                    "type": "linkClick",
                    "filter": [
                        {"type": "contains", "parameter": [{"key": "arg0", "value": "{{Click URL}}"}]},
                        {"type": "equals", "parameter": [{"key": "arg0", "value": "{{Page Hostname}}"}]}
                    ]
                },
                {"triggerId": "12", "name": "Internal Traffic", "type": "pageview"},
                {"triggerId": "13", "name": "Unused Trigger", "type": "customEvent",
                 "customEventFilter": [{"parameter": [{"value": "{{_event}}"}]}]}
            ],
            "variable": [
                {"variableId": "21", "name": "Measurement ID", "type": "c",
                 "parameter": [{"key": "value", "value": "G-XXXX"}]},
                {
                    "variableId": "22",
                    "name": "Event Name",
                    "type": "smm",
                    "parameter": [
                        {"key": "input", "value": "{{Page Path}}"},
                        {"key": "map", "list": [{"map": [{"key": "value", "value": "{{Measurement ID}}"}]}]}
                    ]
                },
                {"variableId": "23", "name": "Unused Constant", "type": "c"}
            ]
        }
    }))
}

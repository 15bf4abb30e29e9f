//! Built-in variable and trigger synthesis.
//!
//! GTM exports list enabled built-in variables by token (`PAGE_URL`, or `pageUrl` in newer
//! exports) rather than as variable objects, while tags and triggers reference them by display
//! name (`{{Page URL}}`). Each enabled token becomes a synthetic [Variable] with a reserved
//! negative ID so that placeholder resolution treats built-ins like any other variable.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::{
    codec::diagnostic::BuildDiagnostic,
    entity::{Trigger, Variable},
    properties::{ObjectId, BUILT_IN_ALL_PAGES_TRIGGER_NAME},
};

/// Display name for a built-in variable token, as used in `{{...}}` placeholders.
pub fn canonical_builtin_name(token: &str) -> Option<&'static str> {
    let name = match token {
        // Page
        "PAGE_URL" | "pageUrl" => "Page URL",
        "PAGE_HOSTNAME" | "pageHostname" => "Page Hostname",
        "PAGE_PATH" | "pagePath" => "Page Path",
        "REFERRER" | "referrer" => "Referrer",
        // Utilities
        "EVENT" | "event" => "Event",
        "CONTAINER_ID" | "containerId" => "Container ID",
        "CONTAINER_VERSION" | "containerVersion" => "Container Version",
        "RANDOM_NUMBER" | "randomNumber" => "Random Number",
        "HTML_ID" | "htmlId" => "HTML ID",
        // Errors
        "ERROR_MESSAGE" | "errorMessage" => "Error Message",
        "ERROR_URL" | "errorUrl" => "Error URL",
        "ERROR_LINE" | "errorLine" => "Error Line",
        "DEBUG_MODE" | "debugMode" => "Debug Mode",
        // Clicks
        "CLICK_ELEMENT" | "clickElement" => "Click Element",
        "CLICK_CLASSES" | "clickClasses" => "Click Classes",
        "CLICK_ID" | "clickId" => "Click ID",
        "CLICK_TARGET" | "clickTarget" => "Click Target",
        "CLICK_URL" | "clickUrl" => "Click URL",
        "CLICK_TEXT" | "clickText" => "Click Text",
        // Forms
        "FORM_ELEMENT" | "formElement" => "Form Element",
        "FORM_CLASSES" | "formClasses" => "Form Classes",
        "FORM_ID" | "formId" => "Form ID",
        "FORM_TARGET" | "formTarget" => "Form Target",
        "FORM_URL" | "formUrl" => "Form URL",
        "FORM_TEXT" | "formText" => "Form Text",
        // History
        "NEW_HISTORY_FRAGMENT" | "newHistoryFragment" => "New History Fragment",
        "OLD_HISTORY_FRAGMENT" | "oldHistoryFragment" => "Old History Fragment",
        "NEW_HISTORY_STATE" | "newHistoryState" => "New History State",
        "OLD_HISTORY_STATE" | "oldHistoryState" => "Old History State",
        "HISTORY_SOURCE" | "historySource" => "History Source",
        // Apps
        "APP_ID" | "appId" => "App ID",
        "APP_NAME" | "APP_VERSION_NAME" | "appName" | "appVersionName" => "App Name",
        "APP_VERSION_CODE" | "appVersionCode" => "App Version Code",
        "SDK_VERSION" | "sdkVersion" => "SDK Version",
        // Device
        "ADVERTISING_TRACKING_ENABLED" | "advertisingTrackingEnabled" => {
            "Advertising Tracking Enabled"
        }
        "DEVICE_NAME" | "deviceName" => "Device Name",
        "LANGUAGE" | "language" => "Language",
        "OS_VERSION" | "osVersion" => "OS Version",
        "PLATFORM" | "platform" => "Platform",
        "RESOLUTION" | "resolution" => "Screen Resolution",
        "ADVERTISER_ID" | "advertiserId" => "Advertiser ID",
        _ => return None,
    };
    Some(name)
}

/// Resolve one built-in entry to its display name.
///
/// Strings are tokens mapped through [canonical_builtin_name] (unknown tokens pass through
/// verbatim). Objects in the `builtInVariable` shape contribute their `name`, falling back to
/// their mapped `type`. Returns `None` for entries carrying neither.
pub fn builtin_display_name(
    entry: &Value,
    diagnostics: &mut Vec<BuildDiagnostic>,
) -> Option<(String, Map<String, Value>)> {
    let (token, fields) = match entry {
        Value::String(token) => (token.as_str(), Map::new()),
        Value::Object(object) => {
            if let Some(name) = object.get("name").and_then(Value::as_str) {
                return Some((name.to_string(), object.clone()));
            }
            match object.get("type").and_then(Value::as_str) {
                Some(token) => (token, object.clone()),
                None => {
                    tracing::warn!(
                        "[builtins] ignoring built-in variable entry without name or type: {}",
                        entry
                    );
                    return None;
                }
            }
        }
        other => {
            tracing::warn!("[builtins] ignoring non-string built-in variable entry: {}", other);
            return None;
        }
    };
    let name = match canonical_builtin_name(token) {
        Some(name) => name.to_string(),
        None => {
            tracing::debug!("[builtins] unknown built-in token '{}'", token);
            diagnostics.push(BuildDiagnostic::UnknownBuiltIn {
                token: token.to_string(),
            });
            token.to_string()
        }
    };
    Some((name, fields))
}

/// Append a synthetic variable for each enabled built-in, skipping any whose display name is
/// already taken (first write wins). The `i`th entry gets ID `-(i+1)` whether or not it is
/// synthesized.
///
/// Returns the number of variables added.
pub fn add_builtin_variables(
    entries: &[&Value],
    variables: &mut Vec<Variable>,
    diagnostics: &mut Vec<BuildDiagnostic>,
) -> usize {
    let mut taken = variables
        .iter()
        .map(|v| v.name.clone())
        .collect::<HashSet<String>>();
    let before = variables.len();

    for (idx, entry) in entries.iter().enumerate() {
        let Some((name, mut fields)) = builtin_display_name(entry, diagnostics) else {
            continue;
        };
        let object_id = ObjectId::builtin_variable(idx);
        if !taken.insert(name.clone()) {
            tracing::debug!(
                "[builtins] skipping built-in '{}': variable name already in use",
                name
            );
            diagnostics.push(BuildDiagnostic::BuiltInSkipped { name, object_id });
            continue;
        }
        fields.insert("name".to_string(), Value::String(name.clone()));
        variables.push(Variable {
            builtin: true,
            ..Variable::new(object_id, name, fields)
        });
    }
    variables.len() - before
}

/// Append the fixed built-in triggers. Currently only "All Pages".
pub fn add_builtin_triggers(triggers: &mut Vec<Trigger>) {
    let mut fields = Map::new();
    fields.insert(
        "name".to_string(),
        Value::String(BUILT_IN_ALL_PAGES_TRIGGER_NAME.to_string()),
    );
    triggers.push(Trigger {
        builtin: true,
        ..Trigger::new(
            ObjectId::builtin_all_pages(),
            BUILT_IN_ALL_PAGES_TRIGGER_NAME,
            fields,
        )
    });
}

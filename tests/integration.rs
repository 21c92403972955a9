//! Integration tests for scripted navigation and flow inspection.
mod common;
use common::*;
use navflow::prelude::*;
use navflow::script::{NavigationScript, ScriptRunner, ScriptStep};
use serde_json::Value;

const READER_SCRIPT: &str = r#"{
    "destinations": [
        { "name": "root", "kind": "tabs", "tabs": ["feed", "search"], "selected": "feed",
          "children": [
              { "slot": { "tab": "feed" }, "destination": "feed-stack" },
              { "slot": { "tab": "search" }, "destination": "search" }
          ] },
        { "name": "feed-stack", "kind": "stack",
          "children": [{ "slot": "stack", "destination": "feed" }] },
        { "name": "feed",
          "bindings": [{ "interaction": "open",
                         "presentation": { "presentation": "push-in-stack", "destination": "article" } }] },
        { "name": "article" },
        { "name": "search" },
        { "name": "compose" }
    ],
    "start": { "presentation": "replace-current", "destination": "root" },
    "steps": [
        { "action": "interact", "destination": "feed", "interaction": "open", "content": { "id": 7 } },
        { "action": "present", "presentation": "present-sheet", "destination": "compose" },
        { "action": "system-navigation", "destination": "compose", "navigation": "dismiss-sheet" },
        { "action": "complete" },
        { "action": "present", "presentation": "select-tab", "tab": "search" },
        { "action": "interact", "destination": "feed", "interaction": "open" }
    ]
}"#;

fn quiet_options() -> FlowOptions {
    FlowOptions::from_json(r#"{ "logging": { "enabled": false } }"#).unwrap()
}

fn script_type(runner: &ScriptRunner, id: Option<DestinationId>) -> Option<String> {
    id.and_then(|id| runner.flow().destination(id))
        .map(|destination| destination.destination_type().clone())
}

#[test]
fn test_script_replay() {
    let mut runner = ScriptRunner::from_json(READER_SCRIPT, quiet_options()).unwrap();
    let reports = runner.run();

    assert_eq!(reports.len(), 7);
    assert_eq!(reports[0].action, "start");
    assert!(reports.iter().all(|report| report.error.is_none()));
    assert_eq!(reports[2].action, "present present-sheet compose");
    assert_eq!(reports[3].action, "system dismiss on compose");

    // The last interaction ran on the feed in the background tab and brought it back to front.
    let flow = runner.flow();
    assert_eq!(script_type(&runner, flow.current_destination_id()).as_deref(), Some("article"));
    assert!(flow.pending_presentations().is_empty());

    let articles: Vec<_> = flow
        .active_destinations()
        .iter()
        .filter_map(|id| flow.destination(*id))
        .filter(|destination| destination.destination_type() == "article")
        .collect();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].content(), Some(&serde_json::json!({ "id": 7 })));
    assert!(!flow
        .active_destinations()
        .iter()
        .any(|id| script_type(&runner, Some(*id)).as_deref() == Some("compose")));

    let kinds: Vec<_> = runner.transitions().iter().map(|record| record.kind).collect();
    assert_eq!(
        kinds,
        vec![
            PresentationKind::ReplaceCurrent,
            PresentationKind::PushInStack,
            PresentationKind::PresentSheet,
            PresentationKind::DismissSheet,
            PresentationKind::SelectTab,
            PresentationKind::PushInStack,
        ]
    );
    assert!(runner.transitions()[3].system_navigation);
}

#[test]
fn test_script_failed_steps_are_reported() {
    let script = r#"{
        "destinations": [
            { "name": "main", "kind": "stack", "children": [{ "slot": "stack", "destination": "home" }] },
            { "name": "home" }
        ],
        "start": { "presentation": "replace-current", "destination": "main" },
        "steps": [
            { "action": "interact", "destination": "home", "interaction": "missing" },
            { "action": "remove", "destination": "nowhere" },
            { "action": "present", "presentation": "pop-in-stack" },
            { "action": "complete" }
        ]
    }"#;
    let mut runner = ScriptRunner::from_json(script, quiet_options()).unwrap();
    let reports = runner.run();

    assert!(reports[1].error.as_deref().is_some_and(|error| error.contains("missing")));
    assert!(reports[2].error.is_some());
    // A pop at the root is a no-op rather than an error.
    assert!(reports[3].error.is_none());
    assert!(reports[3].destination.is_none());
    assert!(reports[4].error.is_none());
}

#[test]
fn test_script_with_deferred_transitions() {
    let script = r#"{
        "destinations": [
            { "name": "main", "kind": "stack", "children": [{ "slot": "stack", "destination": "home" }] },
            { "name": "home" },
            { "name": "detail" }
        ],
        "start": { "presentation": "replace-current", "destination": "main" },
        "defer_transitions": true,
        "steps": [
            { "action": "complete" },
            { "action": "path", "steps": [
                { "presentation": "push-in-stack", "destination": "detail" },
                { "presentation": "push-in-stack", "destination": "detail" }
            ] },
            { "action": "complete" },
            { "action": "complete", "success": false }
        ]
    }"#;
    let mut runner = ScriptRunner::from_json(script, quiet_options()).unwrap();
    runner.run();

    let flow = runner.flow();
    let details = flow
        .active_destinations()
        .iter()
        .filter(|id| script_type(&runner, Some(**id)).as_deref() == Some("detail"))
        .count();
    assert_eq!(details, 1);
    assert!(!flow.is_path_active());
    assert!(flow.pending_presentations().is_empty());
    assert_eq!(script_type(&runner, flow.current_destination_id()).as_deref(), Some("detail"));
}

#[test]
fn test_script_validation() {
    let unknown_child = r#"{
        "destinations": [{ "name": "main", "kind": "stack", "children": [{ "slot": "stack", "destination": "ghost" }] }],
        "start": { "presentation": "replace-current", "destination": "main" }
    }"#;
    assert!(matches!(
        ScriptRunner::from_json(unknown_child, quiet_options()),
        Err(ConfigError::InvalidScript(_))
    ));

    let cycle = r#"{
        "destinations": [
            { "name": "a", "kind": "stack", "children": [{ "slot": "stack", "destination": "b" }] },
            { "name": "b", "kind": "stack", "children": [{ "slot": "stack", "destination": "a" }] }
        ],
        "start": { "presentation": "replace-current", "destination": "a" }
    }"#;
    assert!(matches!(
        ScriptRunner::from_json(cycle, quiet_options()),
        Err(ConfigError::InvalidScript(_))
    ));

    let duplicate = r#"{
        "destinations": [{ "name": "a" }, { "name": "a" }],
        "start": { "presentation": "replace-current", "destination": "a" }
    }"#;
    assert!(ScriptRunner::from_json(duplicate, quiet_options()).is_err());

    let custom = r#"{
        "destinations": [{ "name": "a" }],
        "start": { "presentation": "custom", "destination": "a" }
    }"#;
    assert!(ScriptRunner::from_json(custom, quiet_options()).is_err());

    let empty_path = r#"{
        "destinations": [{ "name": "a" }],
        "start": { "presentation": "replace-current", "destination": "a" },
        "steps": [{ "action": "path", "steps": [] }]
    }"#;
    assert!(ScriptRunner::from_json(empty_path, quiet_options()).is_err());

    let no_destination = r#"{
        "destinations": [{ "name": "a" }],
        "start": { "presentation": "push-in-stack" }
    }"#;
    assert!(ScriptRunner::from_json(no_destination, quiet_options()).is_err());

    assert!(matches!(ScriptRunner::from_json("[]", quiet_options()), Err(ConfigError::Json(_))));
}

#[test]
fn test_script_from_file() {
    let path = std::env::temp_dir().join(format!("navflow-script-{}.json", std::process::id()));
    std::fs::write(&path, READER_SCRIPT).unwrap();
    let script = NavigationScript::from_file(path.to_str().unwrap()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(script.destinations.len(), 6);
    assert!(matches!(script.steps[3], ScriptStep::Complete { success: true }));
    assert_eq!(script.steps[0].describe(), "interact open on feed");
    assert!(matches!(
        NavigationScript::from_file("/definitely/not/here.json"),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_formatter_stack_with_sheet() {
    let mut flow = create_stack_flow();
    let main = flow.root_destination_id().unwrap();
    let home = flow.current_destination_id().unwrap();
    let detail = flow.present_destination(Config::push(Screen::Detail)).unwrap();
    let sheet = flow.present_destination(Config::sheet(Screen::Sheet)).unwrap();

    let expected = format!(
        "Main ({}) <stack, depth 2>\n├── Home ({})\n└── Detail ({})\n    └── sheet: Sheet ({}) *\n",
        main, home, detail, sheet
    );
    assert_eq!(GraphFormatter::new(&flow).format(), expected);
    assert_eq!(GraphFormatter::new(&flow).to_string(), expected);
}

#[test]
fn test_formatter_tabs() {
    let flow = create_tab_flow();
    let tree = GraphFormatter::new(&flow).format();
    let lines: Vec<_> = tree.lines().collect();

    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Tabs ("));
    assert!(lines[0].ends_with("<tabs [Home, List, Profile], selected Home>"));
    assert!(lines[1].starts_with("├── Home: HomeStack ("));
    assert!(lines[2].starts_with("│   └── Home (") && lines[2].ends_with(" *"));
    assert!(lines[3].starts_with("└── List: ListStack ("));
    assert!(lines[4].starts_with("    └── List ("));
}

#[test]
fn test_formatter_empty_flow() {
    let flow = flow_builder().build();
    assert_eq!(GraphFormatter::new(&flow).format(), "<empty flow>\n");
}

#[test]
fn test_snapshot_json() {
    let mut flow = create_split_flow();
    flow.present_destination(Config::column(Screen::Detail, SplitColumn::Detail).with_content("x".to_string()));
    flow.present_destination(Config::column(Screen::Settings, SplitColumn::Content).delay_completion(true));

    let snapshot = FlowSnapshot::capture(&flow);
    assert_eq!(snapshot.destinations.len(), 4);
    assert_eq!(snapshot.pending_presentations, 1);
    assert_eq!(snapshot.current, flow.current_destination_id().map(|id| id.to_string()));

    let json: Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
    let root = &json["destinations"][0];
    assert_eq!(root["destination_type"], "Split");
    assert_eq!(root["group"]["kind"], "columns");
    assert_eq!(root["group"]["selection"], "detail");
    assert_eq!(root["group"]["children"].as_array().map(Vec::len), Some(3));
    assert!(root.get("content").is_none());

    let detail = &json["destinations"][3];
    assert_eq!(detail["destination_type"], "Detail");
    assert_eq!(detail["content"], "\"x\"");
    assert_eq!(detail["is_current"], true);
}

use std::rc::Rc;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use satur_eval::{EvalError, NativeFn, Object, Value};
use satur_reactive::{watcher, EventHandler, Hooks, Lifecycle, ManualFrames, SetupFn};
use saturc::ComponentDef;

use super::*;
use crate::dom::Mutation;

type Log = Arc<Mutex<Vec<String>>>;

const COUNTER: &str = r#"<button onclick="inc(1)">{{ count }}</button>"#;

fn state(entries: &[(&str, Value)]) -> Object {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect()
}

fn record(log: &Log, hooks: &mut dyn Hooks, label: &'static str) {
    for stage in Lifecycle::ALL {
        let log = Arc::clone(log);
        hooks.on(
            stage,
            Rc::new(move || log.lock().unwrap().push(format!("{label}:{stage:?}"))),
        );
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

fn counter_setup(log: Log) -> SetupFn {
    Arc::new(move |hooks: &mut dyn Hooks| {
        record(&log, hooks, "counter");
        let signal = hooks.def_proxy(state(&[("count", Value::from(0))]));
        let inc: EventHandler = Rc::new(move |_event: &EventPayload, args: &[Value]| {
            let step = args.first().map_or(1.0, Value::to_number);
            signal.set("count", signal.get("count").to_number() + step)
        });
        hooks.def_events(vec![("inc".to_owned(), inc)]);
    })
}

fn counter() -> (Runtime, Rc<ManualFrames>, Log) {
    let log = Log::default();
    let frames = Rc::new(ManualFrames::new());
    let doc = Document::parse(
        r#"<main><button element="counter" onclick="inc(1)">0</button></main>"#,
    );
    let runtime = Runtime::new(doc, frames.clone());
    runtime
        .register_component(
            ComponentDef::new("counter", COUNTER).with_setup(counter_setup(Arc::clone(&log))),
        )
        .unwrap();
    runtime
        .hydrate_json(r#"{"counter": {"counter": {}}}"#)
        .unwrap();
    (runtime, frames, log)
}

fn text_of(runtime: &Runtime, key: &str) -> String {
    let root = runtime.root_of(key).unwrap();
    runtime.document().text_content(root)
}

// === Hydration ===

#[test]
fn test_hydrate_runs_setup_and_mount_hooks() {
    let (runtime, _frames, log) = counter();
    assert!(runtime.has_instance("counter"));
    assert_eq!(take(&log), ["counter:BeforeMount"]);

    runtime.run_frame().unwrap();
    assert_eq!(take(&log), ["counter:Mounted"]);
}

#[test]
fn test_hydrate_rejects_unknown_components() {
    let runtime = Runtime::new(Document::new(), Rc::new(ManualFrames::new()));
    let err = runtime
        .hydrate_json(r#"{"ghost": {"ghost": {}}}"#)
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::UnknownComponent {
            name: "ghost".to_owned()
        }
    );
    assert!(matches!(
        runtime.hydrate_json("{nope"),
        Err(ClientError::PageProps(_))
    ));
}

#[test]
fn test_hydrate_syncs_boolean_properties() {
    let runtime = Runtime::new(
        Document::parse(
            r#"<form element="toggle"><input checked="false"><input checked="true"></form>"#,
        ),
        Rc::new(ManualFrames::new()),
    );
    runtime
        .register_component(ComponentDef::new(
            "toggle",
            r#"<form><input checked="{{ on }}"><input checked="true"></form>"#,
        ))
        .unwrap();
    runtime
        .hydrate_json(r#"{"toggle": {"toggle": {"on": false}}}"#)
        .unwrap();

    let doc = runtime.document();
    let root = runtime.root_of("toggle").unwrap();
    let inputs = doc.children(root).to_vec();
    assert_eq!(doc.property(inputs[0], "checked"), Some(false));
    assert_ne!(doc.property(inputs[1], "checked"), Some(false));
}

// === Batched updates ===

#[test]
fn test_three_writes_render_once() {
    let (runtime, frames, log) = counter();
    runtime.run_frame().unwrap();
    take(&log);
    let requests = frames.requests();

    let signal = runtime.signal("counter").unwrap();
    signal.set("count", 1).unwrap();
    signal.set("count", 2).unwrap();
    signal.set("count", 3).unwrap();
    assert_eq!(frames.requests(), requests + 1);
    assert_eq!(runtime.queue().pending_len(), 1);
    assert!(entries(&log).is_empty());

    runtime.document_mut().take_mutations();
    runtime.run_frame().unwrap();

    assert_eq!(take(&log), ["counter:BeforeUpdate", "counter:Updated"]);
    let mutations = runtime.document_mut().take_mutations();
    assert_eq!(mutations.len(), 1);
    assert!(matches!(mutations[0], Mutation::SetText { .. }));
    assert_eq!(text_of(&runtime, "counter"), "3");
}

#[test]
fn test_update_of_an_unmounted_instance_is_skipped() {
    let (runtime, _frames, log) = counter();
    runtime.run_frame().unwrap();
    take(&log);

    let root = runtime.root_of("counter").unwrap();
    runtime.document_mut().remove(root);
    runtime.signal("counter").unwrap().set("count", 9).unwrap();
    runtime.document_mut().take_mutations();

    runtime.run_frame().unwrap();
    assert!(runtime.document_mut().take_mutations().is_empty());
    assert!(entries(&log).is_empty());
}

#[test]
fn test_unknown_instance_update_is_a_noop() {
    let (runtime, _frames, _log) = counter();
    assert_eq!(runtime.update_component("nobody"), Ok(()));
}

// === Events ===

#[test]
fn test_click_runs_the_bound_handler() {
    let (runtime, _frames, _log) = counter();
    let button = runtime.root_of("counter").unwrap();

    assert!(runtime.dispatch(button, &EventPayload::new("click")).unwrap());
    assert_eq!(
        runtime.signal("counter").unwrap().get("count").to_display_string(),
        "1"
    );
    runtime.run_frame().unwrap();
    assert_eq!(text_of(&runtime, "counter"), "1");

    assert!(!runtime.dispatch(button, &EventPayload::new("keyup")).unwrap());
}

#[test]
fn test_events_bubble_to_the_bound_ancestor() {
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(
        Document::parse(r#"<div element="pick" onclick="choose(label)"><b>x</b></div>"#),
        frames,
    );
    let chosen = Arc::new(Mutex::new(String::new()));
    let sink = Arc::clone(&chosen);
    let setup: SetupFn = Arc::new(move |hooks: &mut dyn Hooks| {
        let sink = Arc::clone(&sink);
        let choose: EventHandler = Rc::new(move |event: &EventPayload, args: &[Value]| {
            *sink.lock().unwrap() = format!("{} {}", event.event, args[0].to_display_string());
            Ok(())
        });
        hooks.def_events(vec![("choose".to_owned(), choose)]);
    });
    runtime
        .register_component(
            ComponentDef::new("pick", r#"<div onclick="choose(label)"><b>x</b></div>"#)
                .with_setup(setup),
        )
        .unwrap();
    runtime
        .hydrate_json(r#"{"pick": {"pick": {"label": "blue"}}}"#)
        .unwrap();

    let root = runtime.root_of("pick").unwrap();
    let bold = runtime.document().first_element_child(root).unwrap();
    assert!(runtime.dispatch(bold, &EventPayload::new("click")).unwrap());
    assert_eq!(*chosen.lock().unwrap(), "click blue");
}

#[test]
fn test_missing_handler_is_reported() {
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(
        Document::parse(r#"<a element="link" onclick="nowhere()">x</a>"#),
        frames,
    );
    runtime
        .register_component(ComponentDef::new("link", r#"<a onclick="nowhere()">x</a>"#))
        .unwrap();
    runtime.hydrate_json(r#"{"link": {"link": {}}}"#).unwrap();
    let root = runtime.root_of("link").unwrap();
    let err = runtime
        .dispatch(root, &EventPayload::new("click"))
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::EventBinding {
            binding: "nowhere()".to_owned(),
            reason: "no event handler named nowhere".to_owned(),
        }
    );
}

#[test]
fn test_input_events_update_the_live_value() {
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(
        Document::parse(r#"<input element="field" oninput="typed()" value="">"#),
        frames,
    );
    let setup: SetupFn = Arc::new(|hooks: &mut dyn Hooks| {
        let signal = hooks.def_proxy(state(&[("text", Value::from(""))]));
        let typed: EventHandler = Rc::new(move |event: &EventPayload, _args: &[Value]| {
            signal.update(
                [(
                    "text".to_owned(),
                    Value::from(event.value.clone().unwrap_or_default()),
                )],
                false,
            )
        });
        hooks.def_events(vec![("typed".to_owned(), typed)]);
    });
    runtime
        .register_component(
            ComponentDef::new("field", r#"<input oninput="typed()" value="">"#)
                .with_setup(setup),
        )
        .unwrap();
    runtime.hydrate_json(r#"{"field": {"field": {}}}"#).unwrap();
    runtime.run_frame().unwrap();

    let input = runtime.root_of("field").unwrap();
    let payload = EventPayload::new("input").with_value("hello");
    assert!(runtime.dispatch(input, &payload).unwrap());
    assert_eq!(runtime.document().value(input).as_deref(), Some("hello"));
    assert_eq!(
        runtime.signal("field").unwrap().get("text").as_str(),
        Some("hello")
    );
    assert_eq!(runtime.queue().pending_len(), 0);
}

// === Children ===

const LIST: &str = "<ul>{{for (i, label in labels)}}{{@ row({label: label})}}{{/}}</ul>";

fn list() -> Runtime {
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(
        Document::parse(
            r#"<ul element="list"><li element="row">a</li><li element="row_1">b</li></ul>"#,
        ),
        frames,
    );
    let setup: SetupFn = Arc::new(|hooks: &mut dyn Hooks| {
        hooks.def_proxy(state(&[(
            "labels",
            Value::array(vec![Value::from("a"), Value::from("b")]),
        )]));
    });
    runtime
        .register_component(ComponentDef::new("list", LIST).with_setup(setup))
        .unwrap();
    runtime
        .register_component(ComponentDef::new("row", "<li>{{ label }}</li>"))
        .unwrap();
    runtime
        .hydrate_json(
            r#"{"list": {"list": {}}, "row": {"row": {"label": "a"}, "row_1": {"label": "b"}}}"#,
        )
        .unwrap();
    runtime.run_frame().unwrap();
    runtime
}

fn labels(items: &[&str]) -> Value {
    Value::array(items.iter().map(|s| Value::from(*s)).collect())
}

#[test]
fn test_growing_list_creates_the_next_positional_instance() {
    let runtime = list();
    let signal = runtime.signal("list").unwrap();
    signal.set("labels", labels(&["a", "b", "c"])).unwrap();
    runtime.run_frame().unwrap();

    assert!(runtime.has_instance("row_2"));
    let root = runtime.root_of("list").unwrap();
    assert_eq!(
        runtime.document().inner_html(root),
        r#"<li element="row">a</li><li element="row_1">b</li><li element="row_2">c</li>"#
    );
    assert_eq!(
        runtime.page_props().to_json()["row"]["row_2"],
        serde_json::json!({"label": "c"})
    );
}

#[test]
fn test_cursor_rewinds_between_renders() {
    let runtime = list();
    let signal = runtime.signal("list").unwrap();
    signal.set("labels", labels(&["x", "y"])).unwrap();
    runtime.run_frame().unwrap();
    signal.set("labels", labels(&["x", "y"])).unwrap();
    runtime.run_frame().unwrap();

    assert!(!runtime.has_instance("row_2"));
    assert_eq!(runtime.inner.registry.borrow().keys("row"), ["row", "row_1"]);
    let root = runtime.root_of("list").unwrap();
    assert_eq!(
        runtime.document().inner_html(root),
        r#"<li element="row">x</li><li element="row_1">y</li>"#
    );
}

#[test]
fn test_shrinking_list_removes_trailing_items() {
    let runtime = list();
    runtime
        .signal("list")
        .unwrap()
        .set("labels", labels(&["a"]))
        .unwrap();
    runtime.run_frame().unwrap();
    assert_eq!(runtime.root_of("row_1"), None);
    assert!(runtime.root_of("row").is_some());
}

#[test]
fn test_explicit_keys_are_scoped_by_component() {
    let runtime = Runtime::new(
        Document::parse(r#"<div element="page"></div>"#),
        Rc::new(ManualFrames::new()),
    );
    let page = r#"<div>{{@ card({$key: "main"})}}{{@ badge({$key: "main"})}}</div>"#;
    runtime.register_component(ComponentDef::new("page", page)).unwrap();
    runtime
        .register_component(ComponentDef::new("card", "<p>card</p>"))
        .unwrap();
    runtime
        .register_component(ComponentDef::new("badge", "<i>badge</i>"))
        .unwrap();
    runtime.hydrate_json(r#"{"page": {"page": {}}}"#).unwrap();

    runtime.update_component("page").unwrap();

    assert!(runtime.has_instance("card:main"));
    assert!(runtime.has_instance("badge:main"));
    let root = runtime.root_of("page").unwrap();
    assert_eq!(
        runtime.document().inner_html(root),
        r#"<p element="card:main">card</p><i element="badge:main">badge</i>"#
    );
}

// === Lifecycle ===

#[test]
fn test_hiding_and_showing_a_child() {
    let log = Log::default();
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(
        Document::parse(r#"<div element="panel"><span element="tip">tip</span></div>"#),
        frames,
    );
    let panel: SetupFn = Arc::new(|hooks: &mut dyn Hooks| {
        hooks.def_proxy(state(&[("open", Value::from(true))]));
    });
    let tip_log = Arc::clone(&log);
    let tip: SetupFn = Arc::new(move |hooks: &mut dyn Hooks| record(&tip_log, hooks, "tip"));
    runtime
        .register_component(
            ComponentDef::new("panel", "<div>{{@ tip({$show: open})}}</div>").with_setup(panel),
        )
        .unwrap();
    runtime
        .register_component(ComponentDef::new("tip", "<span>tip</span>").with_setup(tip))
        .unwrap();
    runtime
        .hydrate_json(r#"{"panel": {"panel": {}}, "tip": {"tip": {"$show": true}}}"#)
        .unwrap();
    runtime.run_frame().unwrap();
    assert_eq!(take(&log), ["tip:BeforeMount", "tip:Mounted"]);

    let open = runtime.signal("panel").unwrap();
    open.set("open", false).unwrap();
    runtime.run_frame().unwrap();
    assert_eq!(take(&log), ["tip:BeforeUnmount"]);
    assert_eq!(runtime.root_of("tip"), None);
    runtime.run_frame().unwrap();
    assert_eq!(take(&log), ["tip:Unmounted"]);

    // Hiding again does not re-fire the unmount pair.
    open.set("open", false).unwrap();
    runtime.run_frame().unwrap();
    runtime.run_frame().unwrap();
    assert!(entries(&log).is_empty());

    open.set("open", true).unwrap();
    runtime.run_frame().unwrap();
    assert_eq!(take(&log), ["tip:BeforeMount"]);
    runtime.run_frame().unwrap();
    assert_eq!(take(&log), ["tip:Mounted"]);
    assert!(runtime.root_of("tip").is_some());
}

// === Setup hooks ===

#[test]
fn test_watchers_declared_before_state_are_attached() {
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(Document::parse(r#"<p element="name">x</p>"#), frames);
    let setup: SetupFn = Arc::new(|hooks: &mut dyn Hooks| {
        hooks.def_watch(
            "name",
            watcher(|_old, new| Ok(Some(Value::from(new.to_display_string().to_uppercase())))),
        );
        hooks.def_proxy(state(&[("name", Value::from("x"))]));
    });
    runtime
        .register_component(ComponentDef::new("name", "<p>{{ name }}</p>").with_setup(setup))
        .unwrap();
    runtime.hydrate_json(r#"{"name": {"name": {}}}"#).unwrap();

    let signal = runtime.signal("name").unwrap();
    signal.set("name", "ada").unwrap();
    assert_eq!(signal.get("name").as_str(), Some("ADA"));
    runtime.run_frame().unwrap();
    assert_eq!(text_of(&runtime, "name"), "ADA");
}

#[test]
fn test_use_signal_reaches_other_instances() {
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(
        Document::parse(r#"<p element="source">1</p><p element="mirror">1</p>"#),
        frames,
    );
    let source: SetupFn = Arc::new(|hooks: &mut dyn Hooks| {
        hooks.def_proxy(state(&[("n", Value::from(1))]));
    });
    let mirror: SetupFn = Arc::new(|hooks: &mut dyn Hooks| {
        let other = hooks.use_signal("source");
        hooks.def_methods(vec![NativeFn::new("n", move |_args| {
            Ok(other.as_ref().map_or(Value::Null, |s| s.get("n")))
        })]);
    });
    runtime
        .register_component(ComponentDef::new("source", "<p>{{ n }}</p>").with_setup(source))
        .unwrap();
    runtime
        .register_component(ComponentDef::new("mirror", "<p>{{ n() }}</p>").with_setup(mirror))
        .unwrap();
    runtime
        .hydrate_json(r#"{"source": {"source": {}}, "mirror": {"mirror": {}}}"#)
        .unwrap();

    runtime.signal("source").unwrap().set("n", 5).unwrap();
    runtime.update_component("mirror").unwrap();
    assert_eq!(text_of(&runtime, "mirror"), "5");
}

#[test]
fn test_load_runs_immediately() {
    let ran = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&ran);
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(Document::parse(r#"<p element="boot">x</p>"#), frames);
    let setup: SetupFn = Arc::new(move |hooks: &mut dyn Hooks| {
        let flag = Arc::clone(&flag);
        hooks.def_load(Box::new(move || *flag.lock().unwrap() = true));
    });
    runtime
        .register_component(ComponentDef::new("boot", "<p>x</p>").with_setup(setup))
        .unwrap();
    runtime.hydrate_json(r#"{"boot": {"boot": {}}}"#).unwrap();
    assert!(*ran.lock().unwrap());
}

// === Errors ===

const BROKEN: &str = "<p>{{for (x in items)}}{{x}}{{/}}</p>";

fn broken(hook: bool) -> Runtime {
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(Document::parse(r#"<p element="broken">ab</p>"#), frames);
    let setup: SetupFn = Arc::new(move |hooks: &mut dyn Hooks| {
        hooks.def_proxy(state(&[("items", labels(&["a", "b"]))]));
        if hook {
            hooks.def_error(Rc::new(|error: &EvalError| {
                format!("<p>failed: {}</p>", error.message)
            }));
        }
    });
    runtime
        .register_component(ComponentDef::new("broken", BROKEN).with_setup(setup))
        .unwrap();
    runtime.hydrate_json(r#"{"broken": {"broken": {}}}"#).unwrap();
    runtime.run_frame().unwrap();
    runtime
}

#[test]
fn test_render_error_without_hook_leaves_the_tree() {
    let runtime = broken(false);
    runtime
        .signal("broken")
        .unwrap()
        .set("items", "nope")
        .unwrap();
    let err = runtime.run_frame().unwrap_err();
    assert_eq!(
        err,
        ClientError::Render {
            component: "broken".to_owned(),
            key: "broken".to_owned(),
            message: "array or object required.".to_owned(),
            line: 1,
        }
    );
    assert_eq!(text_of(&runtime, "broken"), "ab");
}

#[test]
fn test_error_hook_renders_fallback() {
    let runtime = broken(true);
    let root = runtime.root_of("broken").unwrap();
    runtime
        .signal("broken")
        .unwrap()
        .set("items", "nope")
        .unwrap();
    runtime.run_frame().unwrap();
    assert_eq!(
        runtime.document().text_content(root),
        "failed: array or object required."
    );
}

// === Blocks ===

#[test]
fn test_blocks_render_inside_client_updates() {
    let frames = Rc::new(ManualFrames::new());
    let runtime = Runtime::new(Document::parse(r#"<p element="score"><i>0</i></p>"#), frames);
    runtime
        .register_block(
            "blocks/ui.html",
            r#"<template name="badge"><i>{{ n }}</i></template>"#,
        )
        .unwrap();
    let setup: SetupFn = Arc::new(|hooks: &mut dyn Hooks| {
        hooks.def_proxy(state(&[("points", Value::from(0))]));
    });
    runtime
        .register_component(
            ComponentDef::new("score", "<p>{{$ ui.badge({n: points})}}</p>").with_setup(setup),
        )
        .unwrap();
    runtime.hydrate_json(r#"{"score": {"score": {}}}"#).unwrap();

    runtime.signal("score").unwrap().set("points", 7).unwrap();
    runtime.run_frame().unwrap();
    assert_eq!(text_of(&runtime, "score"), "7");
}

use pretty_assertions::assert_eq;

use super::*;
use crate::dom::{Document, Mutation, NodeId};

/// Parse `live` as the mounted tree and `fresh` as the render, reconcile
/// their first elements, and return the live document and the patched root.
fn run(live: &str, fresh: &str) -> (Document, NodeId) {
    let mut doc = Document::parse(live);
    let old = doc.first_element_child(doc.root());
    doc.take_mutations();
    let source = Document::parse(fresh);
    let new = source.first_element_child(source.root());
    let root = reconcile(&mut doc, old, &source, new).unwrap();
    (doc, root)
}

// === No-ops ===

#[test]
fn test_equal_trees_touch_nothing() {
    let (mut doc, _) = run("<p class=\"a\">x</p>", "<p class=\"a\">x</p>");
    assert!(doc.take_mutations().is_empty());
}

#[test]
fn test_missing_side_is_a_noop() {
    let mut doc = Document::parse("<p>x</p>");
    let old = doc.first_element_child(doc.root());
    let source = Document::new();
    assert_eq!(reconcile(&mut doc, old, &source, None), old);
    assert_eq!(reconcile(&mut doc, None, &source, Some(source.root())), None);
    assert!(doc.take_mutations().is_empty());
}

// === Text and attributes ===

#[test]
fn test_text_change_only_touches_the_text_node() {
    let (mut doc, root) = run(
        "<div class=\"card\"><h2>Old</h2><p>same</p></div>",
        "<div class=\"card\"><h2>New</h2><p>same</p></div>",
    );
    let h2 = doc.children(root)[0];
    let text = doc.children(h2)[0];
    assert_eq!(doc.take_mutations(), vec![Mutation::SetText { node: text }]);
    assert_eq!(doc.text(text), Some("New"));
}

#[test]
fn test_attributes_are_added_changed_and_removed() {
    let (doc, root) = run(
        "<a href=\"/x\" title=\"t\">l</a>",
        "<a href=\"/y\" rel=\"next\">l</a>",
    );
    assert_eq!(doc.attribute(root, "href"), Some("/y"));
    assert_eq!(doc.attribute(root, "rel"), Some("next"));
    assert_eq!(doc.attribute(root, "title"), None);
}

// === Structure ===

#[test]
fn test_tag_change_replaces_the_node() {
    let mut doc = Document::parse("<main><div>a</div></main>");
    let main = doc.first_element_child(doc.root()).unwrap();
    let old = doc.first_element_child(main).unwrap();
    let source = Document::parse("<span>a</span>");
    let new = source.first_element_child(source.root());

    let placed = reconcile(&mut doc, Some(old), &source, new).unwrap();
    assert_ne!(placed, old);
    assert_eq!(doc.tag(placed), Some("span"));
    assert_eq!(doc.parent(placed), Some(main));
    assert!(!doc.contains(old));
    assert_eq!(doc.inner_html(main), "<span>a</span>");
}

#[test]
fn test_text_to_element_replaces() {
    let (doc, root) = run("<p>plain</p>", "<p><b>bold</b></p>");
    assert_eq!(doc.inner_html(root), "<b>bold</b>");
}

#[test]
fn test_extra_children_are_appended_and_removed() {
    let (doc, root) = run("<ul><li>a</li></ul>", "<ul><li>a</li><li>b</li><li>c</li></ul>");
    assert_eq!(doc.inner_html(root), "<li>a</li><li>b</li><li>c</li>");

    let (doc, root) = run("<ul><li>a</li><li>b</li><li>c</li></ul>", "<ul><li>a</li></ul>");
    assert_eq!(doc.inner_html(root), "<li>a</li>");
}

#[test]
fn test_reorder_is_patched_positionally() {
    let (mut doc, root) = run("<ul><li>a</li><li>b</li></ul>", "<ul><li>b</li><li>a</li></ul>");
    assert_eq!(doc.inner_html(root), "<li>b</li><li>a</li>");
    let texts = doc
        .take_mutations()
        .into_iter()
        .filter(|m| matches!(m, Mutation::SetText { .. }))
        .count();
    assert_eq!(texts, 2);
}

// === Form controls ===

#[test]
fn test_input_value_is_synced() {
    let mut doc = Document::parse("<input value=\"a\">");
    let input = doc.first_element_child(doc.root());
    doc.set_value(input.unwrap(), "typed");
    let source = Document::parse("<input value=\"b\">");
    let new = source.first_element_child(source.root());
    let root = reconcile(&mut doc, input, &source, new).unwrap();
    assert_eq!(doc.value(root).as_deref(), Some("b"));
    assert_eq!(doc.attribute(root, "value"), Some("b"));
}

#[test]
fn test_matching_live_value_is_left_alone() {
    let mut doc = Document::parse("<input value=\"a\" class=\"x\">");
    let input = doc.first_element_child(doc.root());
    doc.take_mutations();
    let source = Document::parse("<input value=\"a\" class=\"y\">");
    let new = source.first_element_child(source.root());
    reconcile(&mut doc, input, &source, new);
    assert!(!doc
        .take_mutations()
        .iter()
        .any(|m| matches!(m, Mutation::SetValue { .. })));
}

#[test]
fn test_textarea_value_follows_its_text() {
    let (doc, root) = run("<textarea>old</textarea>", "<textarea>new</textarea>");
    assert_eq!(doc.value(root).as_deref(), Some("new"));
}

// === Boolean properties ===

#[test]
fn test_boolean_properties_follow_the_attribute() {
    let mut doc = Document::parse(
        "<form disabled=\"false\"><input checked=\"true\"><input checked=\"false\"></form>",
    );
    let form = doc.first_element_child(doc.root()).unwrap();
    let inputs = doc.children(form).to_vec();
    doc.take_mutations();
    sync_boolean_properties(&mut doc, form);

    assert_eq!(doc.property(form, "disabled"), Some(false));
    assert_eq!(doc.property(inputs[0], "checked"), None);
    assert_eq!(doc.property(inputs[1], "checked"), Some(false));
    assert_eq!(doc.take_mutations().len(), 2);
}

#[test]
fn test_boolean_sync_turns_properties_back_on() {
    let mut doc = Document::parse("<input checked=\"true\">");
    let input = doc.first_element_child(doc.root()).unwrap();
    doc.set_property(input, "checked", false);
    sync_boolean_properties(&mut doc, input);
    assert_eq!(doc.property(input, "checked"), Some(true));
}

// === Properties ===

mod properties {
    use proptest::prelude::*;

    use super::*;

    fn html_tree() -> impl Strategy<Value = String> {
        "[a-z]{1,3}".prop_recursive(3, 24, 4, |inner| {
            (
                prop::sample::select(vec!["div", "p", "span", "li"]),
                prop::option::of(prop::sample::select(vec!["x", "y"])),
                prop::collection::vec(inner, 0..4),
            )
                .prop_map(|(tag, class, children)| {
                    let class = class.map(|c| format!(" class=\"{c}\"")).unwrap_or_default();
                    format!("<{tag}{class}>{}</{tag}>", children.concat())
                })
        })
    }

    proptest! {
        #[test]
        fn reconciled_tree_matches_the_render(old in html_tree(), new in html_tree()) {
            let mut doc = Document::parse(&format!("<main>{old}</main>"));
            let live = doc.first_element_child(doc.root());
            let source = Document::parse(&format!("<main>{new}</main>"));
            let fresh = source.first_element_child(source.root()).unwrap();

            let patched = reconcile(&mut doc, live, &source, Some(fresh)).unwrap();
            prop_assert!(doc.deep_equal(patched, &source, fresh));
            prop_assert_eq!(doc.inner_html(doc.root()), source.inner_html(source.root()));
        }
    }
}

use serde_json::json;
use stache::{Template, Value};

fn render(template: &str, data: serde_json::Value) -> String {
    Template::compile(template)
        .unwrap()
        .render(&Value::from(data))
        .unwrap()
}

// ============================================================================
// Basic interpolation
// ============================================================================

#[test]
fn test_text_without_tags_renders_as_is() {
    assert_eq!(
        render("Hello from { Mustache }!", json!(null)),
        "Hello from { Mustache }!"
    );
}

#[test]
fn test_basic_interpolation() {
    assert_eq!(
        render("Hello, {{subject}}!", json!({"subject": "world"})),
        "Hello, world!"
    );
}

#[test]
fn test_html_escaping() {
    assert_eq!(
        render(
            "These characters should be HTML escaped: {{forbidden}}",
            json!({"forbidden": "& \" < >"})
        ),
        "These characters should be HTML escaped: &amp; &quot; &lt; &gt;"
    );
}

#[test]
fn test_unescaped_forms() {
    let data = json!({"forbidden": "& \" < >"});
    assert_eq!(render("{{{forbidden}}}", data.clone()), "& \" < >");
    assert_eq!(render("{{&forbidden}}", data), "& \" < >");
}

#[test]
fn test_integers() {
    for template in [
        "\"{{mph}} miles an hour!\"",
        "\"{{{mph}}} miles an hour!\"",
        "\"{{&mph}} miles an hour!\"",
    ] {
        assert_eq!(
            render(template, json!({"mph": 85})),
            "\"85 miles an hour!\""
        );
    }
}

#[test]
fn test_decimals_use_shortest_form() {
    for template in [
        "\"{{power}} jiggawatts!\"",
        "\"{{{power}}} jiggawatts!\"",
        "\"{{&power}} jiggawatts!\"",
    ] {
        assert_eq!(
            render(template, json!({"power": 1.210})),
            "\"1.21 jiggawatts!\""
        );
    }
}

#[test]
fn test_booleans_render_lowercase() {
    assert_eq!(render("{{yes}}/{{no}}", json!({"yes": true, "no": false})), "true/false");
}

#[test]
fn test_collections_render_as_json() {
    assert_eq!(
        render("{{list}} {{map}}", json!({"list": [1, "a"], "map": {"k": null}})),
        "[1,&quot;a&quot;] {&quot;k&quot;:null}"
    );
    assert_eq!(render("{{{list}}}", json!({"list": [1, "a"]})), "[1,\"a\"]");
}

#[test]
fn test_context_miss_is_empty() {
    for template in [
        "I ({{cannot}}) be seen!",
        "I ({{{cannot}}}) be seen!",
        "I ({{&cannot}}) be seen!",
    ] {
        assert_eq!(render(template, json!({})), "I () be seen!");
    }
}

#[test]
fn test_null_is_empty() {
    assert_eq!(render("[{{nothing}}]", json!({"nothing": null})), "[]");
}

// ============================================================================
// Dotted names
// ============================================================================

#[test]
fn test_dotted_names_match_sections() {
    let data = json!({"person": {"name": "Joe"}});
    assert_eq!(
        render(
            "\"{{person.name}}\" == \"{{#person}}{{name}}{{/person}}\"",
            data.clone()
        ),
        "\"Joe\" == \"Joe\""
    );
    assert_eq!(
        render(
            "\"{{{person.name}}}\" == \"{{#person}}{{{name}}}{{/person}}\"",
            data.clone()
        ),
        "\"Joe\" == \"Joe\""
    );
    assert_eq!(
        render(
            "\"{{&person.name}}\" == \"{{#person}}{{&name}}{{/person}}\"",
            data
        ),
        "\"Joe\" == \"Joe\""
    );
}

#[test]
fn test_dotted_names_arbitrary_depth() {
    let data = json!({"a": {"b": {"c": {"d": {"e": {"name": "Phil"}}}}}});
    assert_eq!(
        render("\"{{a.b.c.d.e.name}}\" == \"Phil\"", data),
        "\"Phil\" == \"Phil\""
    );
}

#[test]
fn test_dotted_names_broken_chains() {
    assert_eq!(render("\"{{a.b.c}}\" == \"\"", json!({"a": {}})), "\"\" == \"\"");
}

#[test]
fn test_dotted_names_broken_chain_resolution() {
    assert_eq!(
        render(
            "\"{{a.b.c.name}}\" == \"\"",
            json!({"c": {"name": "Jim"}})
        ),
        "\"\" == \"\""
    );
}

#[test]
fn test_dotted_names_initial_resolution() {
    let data = json!({
        "a": {"b": {"c": {"d": {"e": {"name": "Phil"}}}}},
        "b": {"c": {"d": {"e": {"name": "Wrong"}}}}
    });
    assert_eq!(
        render("\"{{#a}}{{b.c.d.e.name}}{{/a}}\" == \"Phil\"", data),
        "\"Phil\" == \"Phil\""
    );
}

#[test]
fn test_dotted_names_context_precedence() {
    let data = json!({"a": {"b": {}}, "b": {"c": "ERROR"}});
    assert_eq!(render("{{#a}}{{b.c}}{{/a}}", data), "");
}

// ============================================================================
// Whitespace
// ============================================================================

#[test]
fn test_surrounding_whitespace_is_kept() {
    let data = json!({"text": "---"});
    assert_eq!(render("| {{text}} |", data.clone()), "| --- |");
    assert_eq!(render("| {{{text}}} |", data.clone()), "| --- |");
    assert_eq!(render("| {{&text}} |", data), "| --- |");
}

#[test]
fn test_interpolation_is_never_standalone() {
    let data = json!({"text": "---"});
    assert_eq!(render("  {{text}}\n", data.clone()), "  ---\n");
    assert_eq!(render("  {{{text}}}\n", data.clone()), "  ---\n");
    assert_eq!(render("  {{&text}}\n", data), "  ---\n");
}

#[test]
fn test_padding_inside_tags_is_ignored() {
    let data = json!({"text": "---"});
    assert_eq!(render("|{{ text }}|", data.clone()), "|---|");
    assert_eq!(render("|{{{ text }}}|", data.clone()), "|---|");
    assert_eq!(render("|{{& text }}|", data), "|---|");
}

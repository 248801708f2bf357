use std::cell::{Cell, RefCell};
use std::rc::Rc;

use stache::{Error, Lambda, Resolve, Template, Value};

fn render(template: &str, data: &Value) -> String {
    Template::compile(template).unwrap().render(data).unwrap()
}

// ============================================================================
// Interpolation
// ============================================================================

#[test]
fn test_result_is_interpolated() {
    let data = Value::default().with("lambda", Lambda::new(|_| "world"));
    assert_eq!(render("Hello, {{lambda}}!", &data), "Hello, world!");
}

#[test]
fn test_result_is_parsed() {
    let data = Value::default()
        .with("planet", "world")
        .with("lambda", Lambda::new(|_| "{{planet}}"));
    assert_eq!(render("Hello, {{lambda}}!", &data), "Hello, world!");
}

#[test]
fn test_interpolation_result_uses_default_delimiters() {
    let data = Value::default()
        .with("planet", "world")
        .with("lambda", Lambda::new(|_| "|planet| => {{planet}}"));
    assert_eq!(
        render("{{= | | =}}\nHello, (|&lambda|)!", &data),
        "Hello, (|planet| => world)!"
    );
}

#[test]
fn test_called_on_every_occurrence() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let data = Value::default().with(
        "lambda",
        Lambda::new(move |_| {
            counter.set(counter.get() + 1);
            counter.get()
        }),
    );
    assert_eq!(
        render("{{lambda}} == {{{lambda}}} == {{lambda}}", &data),
        "1 == 2 == 3"
    );
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_result_is_escaped() {
    let data = Value::default().with("lambda", Lambda::new(|_| ">"));
    assert_eq!(render("<{{lambda}}{{{lambda}}}", &data), "<&gt;>");
}

#[test]
fn test_inner_escaping_still_applies() {
    let data = Value::default()
        .with("html", "<b>")
        .with("lambda", Lambda::new(|_| "{{html}}"));
    assert_eq!(render("{{{lambda}}}", &data), "&lt;b&gt;");
}

#[test]
fn test_void_lambda_renders_nothing() {
    let data = Value::default()
        .with("Planet", "world")
        .with("Lambda", Lambda::void(|_| {}));
    assert_eq!(render("Hello, {{Planet}}{{Lambda}}!", &data), "Hello, world!");
}

#[test]
fn test_void_lambda_falls_back_to_parent() {
    let data = Value::from(serde_json::json!({"name": "outer"}))
        .with("inner", Value::default().with("name", Lambda::void(|_| {})));
    assert_eq!(render("{{#inner}}{{name}}{{/inner}}", &data), "outer");
}

#[test]
fn test_dotted_lambda_renders_in_its_parent() {
    let person = Value::default()
        .with("name", "Ada")
        .with("greet", Lambda::new(|_| "Hi {{name}}"));
    let data = Value::default().with("name", "outer").with("person", person);
    assert_eq!(render("{{person.greet}}", &data), "Hi Ada");
}

#[test]
fn test_unparsable_result_fails_render() {
    let data = Value::default().with("lambda", Lambda::new(|_| "{{#open}}"));
    let err = Template::compile("{{lambda}}")
        .unwrap()
        .render(&data)
        .unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}

struct Greeter {
    planet: &'static str,
}

impl Resolve for Greeter {
    fn resolve(&self, key: &str) -> Option<Value> {
        match key {
            "Planet" => Some(self.planet.into()),
            "Lambda" => Some(Lambda::new(|_| "{{Planet}}").into()),
            "Void" => Some(Lambda::void(|_| {}).into()),
            _ => None,
        }
    }
}

#[test]
fn test_record_members_can_be_lambdas() {
    let data = Value::Object(Rc::new(Greeter { planet: "world" }));
    assert_eq!(render("Hello, {{Lambda}}!", &data), "Hello, world!");
    assert_eq!(render("Hello, {{Planet}}{{Void}}!", &data), "Hello, world!");
}

// ============================================================================
// Sections
// ============================================================================

#[test]
fn test_section_receives_raw_text() {
    let data = Value::default().with(
        "lambda",
        Lambda::new(|raw: &str| if raw == "{{x}}" { "yes" } else { "no" }),
    );
    assert_eq!(render("<{{#lambda}}{{x}}{{/lambda}}>", &data), "<yes>");
}

#[test]
fn test_section_result_is_parsed() {
    let data = Value::default()
        .with("planet", "Earth")
        .with("lambda", Lambda::new(|raw: &str| format!("{raw}{{{{planet}}}}{raw}")));
    assert_eq!(render("<{{#lambda}}-{{/lambda}}>", &data), "<-Earth->");
}

#[test]
fn test_section_result_uses_active_delimiters() {
    let data = Value::default()
        .with("planet", "Earth")
        .with("lambda", Lambda::new(|raw: &str| format!("{raw}|planet|{{{{planet}}}}{raw}")));
    assert_eq!(
        render("{{=| |=}}<|#lambda|-|/lambda|>", &data),
        "<-Earth{{planet}}->"
    );
}

#[test]
fn test_section_result_is_not_escaped() {
    let data = Value::default().with("lambda", Lambda::new(|_| "<b>"));
    assert_eq!(render("{{#lambda}}x{{/lambda}}", &data), "<b>");
}

#[test]
fn test_section_lambda_called_once_per_occurrence() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let data = Value::default().with(
        "lambda",
        Lambda::new(move |raw: &str| {
            log.borrow_mut().push(raw.to_string());
            "*"
        }),
    );
    assert_eq!(
        render("{{#lambda}}FILE{{/lambda}} != {{#lambda}}LINE{{/lambda}}", &data),
        "* != *"
    );
    assert_eq!(*seen.borrow(), vec!["FILE".to_string(), "LINE".to_string()]);
}

#[test]
fn test_non_text_result_is_used_as_value() {
    let data = Value::default().with("items", Lambda::new(|_| vec![1, 2, 3]));
    assert_eq!(render("{{#items}}({{.}}){{/items}}", &data), "(1)(2)(3)");
}

#[test]
fn test_false_result_hides_section() {
    let data = Value::default().with("hide", Lambda::new(|_| false));
    assert_eq!(render("[{{#hide}}x{{/hide}}{{^hide}}y{{/hide}}]", &data), "[y]");
}

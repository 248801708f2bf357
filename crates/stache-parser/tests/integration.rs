use stache_parser::{parse, Delimiters, Node, ParseError, Partial, Scanner, Section, Tag, Variable};

fn section(node: &Node) -> &Section {
    match node {
        Node::Section(section) | Node::InvertedSection(section) => section,
        other => panic!("expected a section, got {other:?}"),
    }
}

#[test]
fn test_tree_shape() {
    let doc = parse("Hi {{name}}!\n{{#items}}\n  - {{.}}\n{{/items}}\n{{>footer}}").unwrap();
    assert_eq!(doc.root.children.len(), 5);
    assert_eq!(doc.root.children[0], Node::Text("Hi ".into()));
    assert_eq!(
        doc.root.children[1],
        Node::Variable(Variable {
            key: "name".into(),
            escape: true,
        })
    );
    assert_eq!(doc.root.children[2], Node::Text("!\n".into()));

    let items = section(&doc.root.children[3]);
    assert_eq!(items.key, "items");
    // Raw text starts right after the opening tag, line break included.
    assert_eq!(items.raw_text, "\n  - {{.}}\n");

    assert_eq!(
        doc.root.children[4],
        Node::Partial(Partial {
            key: "footer".into(),
            indent: String::new(),
        })
    );
}

#[test]
fn test_sections_remember_their_delimiters() {
    let doc = parse("{{#a}}{{/a}}{{=<% %>=}}<%#b%><%/b%>").unwrap();
    assert!(section(&doc.root.children[0]).delimiters.is_default());
    assert_eq!(
        section(&doc.root.children[1]).delimiters,
        Delimiters::new("<%", "%>")
    );
}

#[test]
fn test_scanner_is_lazy() {
    let mut scanner = Scanner::new("{{a}}{{b}}{{");
    assert_eq!(
        scanner.next().unwrap().unwrap(),
        Tag::Variable {
            key: "a",
            escape: true
        }
    );
    assert_eq!(scanner.delimiters(), &Delimiters::default());
    assert!(scanner.next().unwrap().is_ok());
    assert!(matches!(
        scanner.next(),
        Some(Err(ParseError::UnclosedTag { offset: 10 }))
    ));
    assert!(scanner.next().is_none());
}

#[test]
fn test_error_messages() {
    let cases = [
        ("{{#a}}{{/b}}", "end tag 'b' does not match open tag 'a'"),
        ("{{/a}}", "end tag 'a' has no matching open tag"),
        ("{{#a}}{{#b}}", "blocks 'a, b' are not closed"),
        ("ab{{c", "tag opened at byte 2 is never closed"),
        ("{{<p}}{{/p}}{{<p}}{{/p}}", "partial 'p' is defined more than once"),
    ];
    for (source, message) in cases {
        assert_eq!(parse(source).unwrap_err().to_string(), message, "{source}");
    }
}

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;
use sam::{
    DocumentSerializer, IdentifierMatching, ListKind, ParseError, SamConfig, SamParser,
    XmlSerializer, sam_to_xml,
};

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

fn to_xml(text: &str) -> String {
    let tree = SamParser::new().parse_str(text).unwrap();
    XmlSerializer::new(IdentifierMatching::Unicode).serialize(&tree)
}

#[test]
fn single_leaf_block() {
    assert_eq!(
        to_xml("sam: doc\nsection: intro\n"),
        format!("{DECLARATION}<section>intro</section>\n")
    );
}

#[test]
fn identifier_content_becomes_id() {
    let xml = to_xml("sam: doc\nsection: chapter_one\n  title: Chapter One\n");
    assert!(
        xml.contains("<section>\n<id>chapter_one</id>\n<title>Chapter One</title>\n</section>\n")
    );
}

#[test]
fn paragraph_decorations() {
    assert_eq!(
        to_xml("sam: doc\nThis is *bold* and _italic_ text.\n\n"),
        format!(
            "{DECLARATION}<p>This is <decoration type=\"bold\">bold</decoration> and \
             <decoration type=\"italic\">italic</decoration> text.</p>\n"
        )
    );
}

#[test]
fn codeblock_is_cdata() {
    assert_eq!(
        to_xml("sam: doc\n```python\nprint(\"hi\")\n```\n"),
        format!(
            "{DECLARATION}<codeblock language=\"python\">\
             <![CDATA[print(\"hi\")\n]]></codeblock>\n"
        )
    );
}

#[test]
fn full_document() {
    let input = "\
sam: Example document
section: intro \"Introduction\"
  # drafted quickly
  Read [the guide](link \"guide\" (docs)) before a < b.

  * first
  * second

  ```
  raw *text*
  ```
section: data
  person:: name, age
  Ann, 30
  Bob, 41, extra

";
    let expected = format!(
        "{DECLARATION}\
<section>
<id>intro</id>
<label>Introduction</label>
<!-- drafted quickly -->
<p>Read <annotation type=\"link\" canonical=\"guide\" namespace=\"docs\">\
the guide</annotation> before a &lt; b.</p>
<ul>
<li>first</li>
<li>second</li>
</ul>
<codeblock language=\"\"><![CDATA[  raw *text*
]]></codeblock>
</section>
<section>
<id>data</id>
<person>
<name>Ann</name>
<age>30</age>
</person>
<person>
<name>Bob</name>
<age>41</age>
</person>
</section>
"
    );
    assert_eq!(to_xml(input), expected);
}

#[test]
fn block_named_codeblock_keeps_plain_tag() {
    assert_eq!(
        to_xml("sam: doc\ncodeblock:\n  title: x\n"),
        format!("{DECLARATION}<codeblock>\n<title>x</title>\n</codeblock>\n")
    );
}

#[test]
fn one_shot_conversion_matches_serializer() {
    let input = "sam: doc\nsection: intro\n  Hello.\n";
    assert_eq!(sam_to_xml(input).unwrap(), to_xml(input));
}

#[rstest]
#[case("sam: doc\n* one\n* two\nthree\n", 4, ListKind::Bullet)]
#[case("sam: doc\nsection: s\n  1. one\n  2. two\n  - three\n", 5, ListKind::Numbered)]
#[case("sam: doc\n\n\n* one\n1. mixed\n", 5, ListKind::Bullet)]
fn interrupted_lists_name_the_line(#[case] input: &str, #[case] line: u64, #[case] kind: ListKind) {
    let err = SamParser::new().parse_str(input).unwrap_err();
    assert_eq!(err, ParseError::broken_list(line, "<string>", kind));
}

#[test]
fn ordered_list_config() {
    let tree = SamParser::with_config(SamConfig::default().with_numbered_list_element("ol"))
        .parse_str("sam: doc\n1. one\n2. two\n")
        .unwrap();
    let xml = XmlSerializer::new(IdentifierMatching::Unicode).serialize(&tree);
    assert_eq!(xml, format!("{DECLARATION}<ol>\n<li>one</li>\n<li>two</li>\n</ol>\n"));
}

proptest! {
    /// The root's own name and content never reach the output
    #[test]
    fn root_is_never_rendered(
        root in "[A-Z]{3,8}[0-9]{2}",
        blocks in proptest::collection::vec(("[a-z]{1,6}", "[a-z ]{0,8}", 0usize..3), 0..8),
    ) {
        let mut input = format!("sam: {root}\n");
        for (name, content, depth) in &blocks {
            input.push_str(&format!("{}{name}: {content}\n", "  ".repeat(*depth)));
        }
        let xml = to_xml(&input);
        prop_assert!(xml.starts_with(DECLARATION));
        prop_assert!(!xml.contains(&root));
        if blocks.is_empty() {
            prop_assert_eq!(xml, DECLARATION);
        }
    }

    /// The reported line is the first line that breaks the list
    #[test]
    fn list_break_line_is_exact(items in 1usize..10, leading_blanks in 0usize..4) {
        let mut input = String::from("sam: doc\n");
        input.push_str(&"\n".repeat(leading_blanks));
        for i in 0..items {
            input.push_str(&format!("* item {i}\n"));
        }
        input.push_str("not an item\n");

        let expected = (1 + leading_blanks + items + 1) as u64;
        let err = SamParser::new().parse_str(&input).unwrap_err();
        prop_assert_eq!(err, ParseError::broken_list(expected, "<string>", ListKind::Bullet));
    }
}

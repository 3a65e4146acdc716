use serial_test::serial;

use hymnal_backend::{HtmlStanzaParser, Stanza, StanzaParser};
use hymnal_backend::chorus::{ChorusLabels, HtmlChorusClassifier};

mod helpers;
use helpers as h;

fn parse(html: &str) -> Vec<Stanza> {
    let parser: HtmlStanzaParser = HtmlStanzaParser::default();
    parser.parse(html)
}

#[test]
fn test_marked_verse_and_chorus() {
    let html = "<p><font><b>1</b></font> Line one<br>Line two</p><p><i><b>Chorus</b></i><br>Chorus line</p>";
    assert_eq!(parse(html), vec![
        h::verse(1, &["Line one", "Line two"]),
        h::chorus(&["Chorus line"]),
    ]);
}

#[test]
fn test_chorus_does_not_advance_counter() {
    let html = "<p>First verse<br>goes here</p>\
                <p><i>CHORUS</i><br>Refrain</p>\
                <p>Second verse</p>";
    assert_eq!(parse(html), vec![
        h::verse(1, &["First verse", "goes here"]),
        h::chorus(&["Refrain"]),
        h::verse(2, &["Second verse"]),
    ]);
}

#[test]
fn test_multiple_markers_in_one_paragraph() {
    let html = r##"<h1>Blessed Assurance</h1>
<p><font color="#c00"><b>1</b></font> Blessed assurance, Jesus is mine!<br>
O what a foretaste of glory divine!<br>
<font color="#c00"><b>2</b></font> Perfect submission, perfect delight,<br>
Visions of rapture now burst on my sight</p>"##;

    assert_eq!(parse(html), vec![
        h::verse(1, &["Blessed assurance, Jesus is mine!", "O what a foretaste of glory divine!"]),
        h::verse(2, &["Perfect submission, perfect delight,", "Visions of rapture now burst on my sight"]),
    ]);
}

#[test]
fn test_marker_numbers_are_kept_in_document_order() {
    let html = "<p><b>3</b> Three</p><p><strong>1.</strong> One</p><p><span style=\"color:red\"><b>7</b></span> Seven</p>";
    let numbers: Vec<Option<u32>> = parse(html).iter().map(|s| s.number()).collect();
    assert_eq!(numbers, vec![Some(3), Some(1), Some(7)]);
}

#[test]
fn test_trailing_marker_without_text_is_dropped() {
    let html = "<p><b>1</b> Only verse<br><b>2</b></p>";
    assert_eq!(parse(html), vec![h::verse(1, &["Only verse"])]);
}

#[test]
fn test_luganda_and_swahili_chorus_labels() {
    let html = r#"<p><span style="font-weight:bold"><b>Nnyeso</b></span><br>Tukutendereza Yesu</p>
<p><b>KWAYA:</b> Bwana Yesu<br>Ni mwema</p>"#;

    assert_eq!(parse(html), vec![
        h::chorus(&["Tukutendereza Yesu"]),
        h::chorus(&["Bwana Yesu", "Ni mwema"]),
    ]);
}

#[test]
fn test_label_outside_emphasis_is_verse() {
    let html = "<p>Chorus<br>of angels singing</p>";
    assert_eq!(parse(html), vec![h::verse(1, &["Chorus", "of angels singing"])]);
}

#[test]
fn test_stray_tags_are_removed() {
    let html = "<p></span>Amazing grace</b><br></i>How sweet the sound<font></p>";
    assert_eq!(parse(html), vec![h::verse(1, &["Amazing grace", "How sweet the sound"])]);
}

#[test]
fn test_whitespace_normalization() {
    let html = "<p>Holy,\t\tholy,   holy <br>\n   Lord God &amp; Almighty<br/>  </p>";
    assert_eq!(parse(html), vec![h::verse(1, &["Holy, holy, holy", "Lord God & Almighty"])]);
}

#[test]
fn test_unicode_passes_through() {
    let html = "<p>Ŋŋ́ Katonda — “ayagala” abantu…</p>";
    assert_eq!(parse(html), vec![h::verse(1, &["Ŋŋ́ Katonda — “ayagala” abantu…"])]);
}

#[test]
fn test_plain_text_without_tags() {
    let text = "  Be thou my vision\nO Lord of my heart  ";
    assert_eq!(parse(text), vec![h::verse(1, &["Be thou my vision", "O Lord of my heart"])]);
}

#[test]
fn test_empty_paragraphs_produce_nothing() {
    assert!(parse("").is_empty());
    assert!(parse("<h2>Title only</h2>").is_empty());
    assert!(parse("<p></p><p> <br> </p><p><i></i></p>").is_empty());
}

#[test]
fn test_custom_chorus_label() {
    let labels = ChorusLabels::default().with_label("Refrain");
    let classifier = HtmlChorusClassifier::try_new(&labels).unwrap();
    let parser = HtmlStanzaParser::with_classifier(classifier);

    let stanzas = parser.parse("<p>Verse</p><p><em>Refrain:</em> Alleluia</p>");
    assert_eq!(stanzas, vec![h::verse(1, &["Verse"]), h::chorus(&["Alleluia"])]);
}

#[test]
fn test_parse_is_idempotent() {
    let html = "<p><b>1</b> A<br>B</p><p><i>Chorus</i><br>C</p><p>D</p>";
    let first = serde_json::to_string(&parse(html)).unwrap();
    let second = serde_json::to_string(&parse(html)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_stanzas_are_well_formed() {
    let html = "<h3>T</h3><p>a<br><br>b</p><p><i>Kwaya</i></p><p><b>Chorus</b><br>r</p><p>c</p><p> </p><p>d<br></p>";
    let stanzas = parse(html);
    h::assert_well_formed(&stanzas);
    assert_eq!(stanzas.len(), 4);
}

#[test]
#[serial]
fn test_text_before_first_marker_is_dropped() {
    h::logging_setup();
    let html = "<p>Intro line<br><b>2</b> Second</p><p>Unmarked</p>";
    assert_eq!(parse(html), vec![h::verse(2, &["Second"]), h::verse(1, &["Unmarked"])]);
}

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use locgrid::{LocaleDir, TranslationStore};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn roundtrip_unmodified_two_space_files_bytes_identical() -> Result<()> {
    let dir = tempfile::tempdir()?;

    // Already in the saved layout: two-space indent, no trailing newline.
    let en = r#"{
  "app": {
    "title": "Editor",
    "menu": {
      "open": "Open",
      "save": "Save"
    }
  },
  "days": [
    "Mon",
    "Tue"
  ],
  "count": 3,
  "enabled": true
}"#;
    std::fs::write(dir.path().join("en.json"), en)?;

    let store = TranslationStore::load(LocaleDir::open(dir.path())?)?;
    store.save()?;

    assert_eq!(std::fs::read_to_string(dir.path().join("en.json"))?, en);
    Ok(())
}

#[test]
fn roundtrip_reindents_and_keeps_member_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("de.json"),
        r#"{"zeta":"Z","alpha":{"b":"B","a":"A"},"list":[1,{"x":2}]}"#,
    )?;

    let store = TranslationStore::load(LocaleDir::open(dir.path())?)?;
    store.save()?;

    let text = std::fs::read_to_string(dir.path().join("de.json"))?;
    assert_eq!(
        text,
        r#"{
  "zeta": "Z",
  "alpha": {
    "b": "B",
    "a": "A"
  },
  "list": [
    1,
    {
      "x": 2
    }
  ]
}"#
    );
    Ok(())
}

#[test]
fn saved_files_parse_back_to_the_same_document() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let doc = json!({
        "errors": { "404": "Not found", "500": "Server error" },
        "greeting": "Hello, world",
        "nothing": null,
        "ratio": 0.5,
    });
    std::fs::write(dir.path().join("en.json"), serde_json::to_string(&doc)?)?;

    let store = TranslationStore::load(LocaleDir::open(dir.path())?)?;
    store.save()?;

    let back: Value = serde_json::from_str(&std::fs::read_to_string(dir.path().join("en.json"))?)?;
    assert_eq!(back, doc);
    Ok(())
}

#[test]
fn keys_with_outer_whitespace_keep_their_values() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(
        dir.path().join("en.json"),
        r#"{"a":{"b ":"x"}," c":"y","d":"z"}"#,
    )?;

    let mut store = TranslationStore::load(LocaleDir::open(dir.path())?)?;
    let mut grid = locgrid::Grid::new(&store);
    assert_eq!(store.key_order(), ["a.b ", " c", "d"]);

    // Flushing untouched key cells before saving must not rename anything.
    assert!(grid.commit_pending(&mut store).is_empty());
    store.save()?;

    let back: Value = serde_json::from_str(&std::fs::read_to_string(dir.path().join("en.json"))?)?;
    assert_eq!(back, json!({ "a": { "b ": "x" }, " c": "y", "d": "z" }));
    Ok(())
}

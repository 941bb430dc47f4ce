use anyhow::Result;
use camino::Utf8PathBuf;
use labelsmith::merge::{Merge, MergeKind};
use tempfile::TempDir;

fn write_source(dir: &TempDir, name: &str, content: &str) -> Utf8PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write merge source");
    Utf8PathBuf::from_path_buf(path).expect("utf-8 temp path")
}

#[test]
fn test_comma_with_line1_keys() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_source(
        &dir,
        "contacts.csv",
        "name,email,city\nAda,a@x.org,London\nGrace,g@x.org,Arlington\n",
    );

    let mut merge = Merge::new(MergeKind::TextCommaKeys);
    merge.set_source(&path)?;

    assert_eq!(merge.keys(), ["name", "email", "city"]);
    assert_eq!(merge.record_count(), 2);
    assert_eq!(merge.records()[0].value("name"), "Ada");
    assert_eq!(merge.records()[1].value("city"), "Arlington");
    assert_eq!(merge.source(), Some(path.as_path()));

    Ok(())
}

#[test]
fn test_tab_and_colon_delimiters() -> Result<()> {
    let dir = TempDir::new()?;

    let tab = write_source(&dir, "contacts.tsv", "name\temail\nAda\ta@x.org\n");
    let mut merge = Merge::new(MergeKind::TextTabKeys);
    merge.set_source(&tab)?;
    assert_eq!(merge.keys(), ["name", "email"]);
    assert_eq!(merge.records()[0].value("email"), "a@x.org");

    let colon = write_source(&dir, "contacts.txt", "Ada:a@x.org\nGrace:g@x.org\n");
    let mut merge = Merge::new(MergeKind::TextColon);
    merge.set_source(&colon)?;
    // Without a key line, fields are numbered from 1.
    assert_eq!(merge.keys(), ["1", "2"]);
    assert_eq!(merge.records()[1].value("2"), "g@x.org");

    Ok(())
}

#[test]
fn test_missing_fields_read_as_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_source(
        &dir,
        "ragged.csv",
        "name,email,city\nAda\nGrace,g@x.org\n",
    );

    let mut merge = Merge::new(MergeKind::TextCommaKeys);
    merge.set_source(&path)?;

    assert_eq!(merge.records()[0].value("email"), "");
    assert_eq!(merge.records()[0].value("city"), "");
    assert_eq!(merge.records()[1].value("email"), "g@x.org");
    // Unknown keys also read as empty rather than failing.
    assert_eq!(merge.records()[1].value("zip"), "");

    Ok(())
}

#[test]
fn test_record_selection_defaults_and_toggles() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_source(&dir, "contacts.csv", "name\nAda\nGrace\nLin\n");

    let mut merge = Merge::new(MergeKind::TextCommaKeys);
    merge.set_source(&path)?;

    // Every record starts selected.
    assert_eq!(merge.selected_records().len(), 3);

    merge.set_record_selected(1, false);
    let selected: Vec<&str> = merge
        .selected_records()
        .iter()
        .map(|r| r.value("name"))
        .collect();
    assert_eq!(selected, ["Ada", "Lin"]);

    merge.unselect_all_records();
    assert!(merge.selected_records().is_empty());
    merge.select_all_records();
    assert_eq!(merge.selected_records().len(), 3);

    // An out-of-range index is ignored.
    merge.set_record_selected(99, false);
    assert_eq!(merge.selected_records().len(), 3);

    Ok(())
}

#[test]
fn test_primary_key_defaults_to_first() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_source(&dir, "contacts.csv", "id,name\n1,Ada\n");

    let mut merge = Merge::new(MergeKind::TextCommaKeys);
    merge.set_source(&path)?;

    assert_eq!(merge.primary_key(), Some("id"));
    merge.set_primary_key("name");
    assert_eq!(merge.primary_key(), Some("name"));
    // Unknown keys leave the current choice in place.
    merge.set_primary_key("zip");
    assert_eq!(merge.primary_key(), Some("name"));

    Ok(())
}

#[test]
fn test_replacing_source_drops_stale_state() -> Result<()> {
    let dir = TempDir::new()?;
    let first = write_source(&dir, "a.csv", "id,name\n1,Ada\n2,Grace\n");
    let second = write_source(&dir, "b.csv", "email\nlin@x.org\n");

    let mut merge = Merge::new(MergeKind::TextCommaKeys);
    merge.set_source(&first)?;
    merge.set_primary_key("name");
    merge.set_record_selected(0, false);

    merge.set_source(&second)?;
    assert_eq!(merge.keys(), ["email"]);
    assert_eq!(merge.record_count(), 1);
    // The explicit primary key died with the old schema.
    assert_eq!(merge.primary_key(), Some("email"));
    assert_eq!(merge.selected_records().len(), 1);

    Ok(())
}

#[test]
fn test_none_kind_ignores_sources() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_source(&dir, "contacts.csv", "name\nAda\n");

    let mut merge = Merge::none();
    merge.set_source(&path)?;

    assert_eq!(merge.kind(), MergeKind::None);
    assert!(merge.source().is_none());
    assert_eq!(merge.record_count(), 0);
    assert!(merge.keys().is_empty());

    Ok(())
}

#[test]
fn test_missing_file_is_an_error() {
    let mut merge = Merge::new(MergeKind::TextCommaKeys);
    assert!(merge.set_source("/nonexistent/contacts.csv").is_err());
}

#[test]
fn test_format_ids_resolve() {
    for kind in MergeKind::all() {
        assert_eq!(MergeKind::from_id(kind.id()), Some(kind));
    }
    assert_eq!(MergeKind::from_id("Text/Semicolon"), None);
}

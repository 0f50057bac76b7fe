use cellflame::cells::{DocumentFlavor, Partitioner};
use cellflame::document::SourceText;
use cellflame::flamegraph::{FlameGraphView, SvgSurface, ViewContext};
use cellflame::output::{read_cell_report, read_profile, write_cell_report, write_svg, CellReport};
use cellflame::profile::ThreadProfiles;
use cellflame::utils::error::ProfileError;
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn test_profile_file_to_svg_file() {
    let mut profile = tempfile::NamedTempFile::new().unwrap();
    write!(
        profile,
        r#"{{ "worker": {{ "meta": {{ "func": "run", "file": "w.jl", "line": 3, "count": 5 }} }} }}"#
    )
    .unwrap();

    let data = read_profile(profile.path()).unwrap();
    let profiles = ThreadProfiles::from_data(data).unwrap();
    assert_eq!(profiles.default_thread(), "worker");

    let mut view = FlameGraphView::new(
        SvgSurface::new(300.0, 100.0, 12.0),
        SvgSurface::new(300.0, 100.0, 12.0),
        ViewContext::default(),
    );
    view.set_data(profiles, None).unwrap();

    let out_dir = tempfile::tempdir().unwrap();
    let svg_path = out_dir.path().join("out/flame.svg");
    write_svg(&view.graph().to_svg(), &svg_path).unwrap();

    let written = std::fs::read_to_string(&svg_path).unwrap();
    assert!(written.contains(">run</text>"));
}

#[test]
fn test_empty_profile_is_an_error() {
    let mut profile = tempfile::NamedTempFile::new().unwrap();
    write!(profile, "{{}}").unwrap();

    let data = read_profile(profile.path()).unwrap();
    assert!(matches!(ThreadProfiles::from_data(data), Err(ProfileError::EmptyProfile)));
}

#[test]
fn test_markdown_cell_report() {
    let doc = SourceText::new("# Title\n\n```julia\nx = 1\n```\n");
    let cells = Partitioner::default()
        .partition(&doc, DocumentFlavor::Markdown)
        .unwrap();
    let report = CellReport::new("notes.jmd", DocumentFlavor::Markdown, &doc, &cells);

    let out = tempfile::NamedTempFile::new().unwrap();
    write_cell_report(&report, out.path()).unwrap();
    let loaded = read_cell_report(out.path()).unwrap();

    assert_eq!(loaded.flavor, "markdown");
    assert_eq!(loaded.cells.len(), 2);
    assert_eq!(loaded.cells[0].code_range, None);
    assert_eq!(loaded.cells[1].code, "x = 1\n");
    assert_eq!(loaded.executable_cells(), 1);
}

use cs_test_cases::{case_path, cases_root};
use cs_tool::{assert_case, find_case_files, read_test_case};

#[test]
fn every_case_file_replays_cleanly() {
    let cases = find_case_files(&cases_root()).expect("cases should be discovered");
    assert_eq!(cases.len(), 4);
    for path in cases {
        if let Err(error) = assert_case(&path) {
            panic!("{} failed: {}", path.display(), error);
        }
    }
}

#[test]
fn successful_call_ends_with_save_notes() {
    let case = read_test_case(&case_path("01-successful-call")).expect("case should load");
    let last = case.expected_views.last().expect("case should expect views");
    assert_eq!(last.side_effect.map(|effect| effect.as_str()), Some("saveNotes"));
}

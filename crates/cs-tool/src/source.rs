use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{CsToolError, TestCase, TESTCASE_SCHEMA_V1};

const CASE_SUFFIX: &str = ".case.json";

/// Every `*.case.json` under `dir`, sorted by path.
pub fn find_case_files(dir: &Path) -> Result<Vec<PathBuf>, CsToolError> {
    let mut cases = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().to_string_lossy().ends_with(CASE_SUFFIX))
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();

    if cases.is_empty() {
        return Err(CsToolError::SourceEmpty {
            path: dir.to_path_buf(),
        });
    }
    cases.sort();
    Ok(cases)
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, CsToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| CsToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| CsToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(CsToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod source_tests {
    use super::*;

    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should move forward")
            .as_nanos();
        std::env::temp_dir().join(format!("cs-tool-{}-{}", name, nanos))
    }

    fn write_file(path: &Path, content: &str) {
        let parent = path.parent().expect("path should have parent");
        fs::create_dir_all(parent).expect("parent dir should be created");
        fs::write(path, content).expect("file should be written");
    }

    #[test]
    fn find_case_files_collects_nested_cases_in_order() {
        let root = temp_dir("find");
        write_file(&root.join("b.case.json"), "{}");
        write_file(&root.join("nested/a.case.json"), "{}");
        write_file(&root.join("notes.json"), "{}");
        write_file(&root.join("readme.txt"), "skip");

        let cases = find_case_files(&root).expect("scan should pass");
        assert_eq!(
            cases,
            vec![root.join("b.case.json"), root.join("nested/a.case.json")]
        );
    }

    #[test]
    fn find_case_files_fails_when_nothing_matches() {
        let root = temp_dir("find-empty");
        write_file(&root.join("other.json"), "{}");
        let error = find_case_files(&root).expect_err("empty dir should fail");
        assert!(matches!(error, CsToolError::SourceEmpty { .. }));
    }

    #[test]
    fn read_test_case_validates_schema_and_reports_parse_errors() {
        let root = temp_dir("read");
        let good = root.join("good.case.json");
        write_file(&good, r#"{"schemaVersion":"cs-tool-case.v1"}"#);
        assert!(read_test_case(&good).expect("case").actions.is_empty());

        let wrong = root.join("wrong.case.json");
        write_file(&wrong, r#"{"schemaVersion":"call-case.v0"}"#);
        assert!(matches!(
            read_test_case(&wrong).expect_err("schema"),
            CsToolError::InvalidSchemaVersion { .. }
        ));

        let broken = root.join("broken.case.json");
        write_file(&broken, "{");
        assert!(matches!(
            read_test_case(&broken).expect_err("parse"),
            CsToolError::ParseCase { .. }
        ));

        assert!(matches!(
            read_test_case(&root.join("missing.case.json")).expect_err("read"),
            CsToolError::ReadFile { .. }
        ));
    }
}

use std::error::Error;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

type TestResult = Result<(), Box<dyn Error>>;

const SAMPLE: &str = r#"/// Adds two numbers.
int add(int a, int b) {
  // full-line comment
  print("adding $a and $b");
  var url = "http://example.com"; // trailing
  print(
    "multi\nline");
  return a + b;
}
"#;

const SAMPLE_CLEAN: &str = r#"/// Adds two numbers.
int add(int a, int b) {
  var url = "http://example.com";
  return a + b;
}
"#;

#[test]
fn rewrites_matching_files_in_place() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let lib = temp.child("lib");
    lib.create_dir_all()?;

    let main_dart = lib.child("main.dart");
    main_dart.write_str(SAMPLE)?;

    let notes = lib.child("notes.txt");
    notes.write_str("// not a source file\n")?;

    let mut cmd = cargo_bin_cmd!("tidysrc");
    cmd.current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed: lib/main.dart"))
        .stdout(predicate::str::contains("Processed 1 of 1 files"))
        .stdout(predicate::str::contains("notes.txt").not());

    main_dart.assert(SAMPLE_CLEAN);
    notes.assert("// not a source file\n");

    Ok(())
}

#[test]
fn second_run_is_a_no_op() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("main.dart");
    f.write_str(SAMPLE)?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .assert()
        .success();

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed: ").not())
        .stdout(predicate::str::contains("Processed 0 of 1 files"));

    f.assert(SAMPLE_CLEAN);

    Ok(())
}

#[test]
fn dry_run_leaves_files_untouched() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("main.dart");
    f.write_str(SAMPLE)?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Would process: main.dart"));

    f.assert(SAMPLE);

    Ok(())
}

#[test]
fn keep_flags_select_a_single_pass() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let comments_only = temp.child("a.c");
    comments_only.write_str("x(); // c\nprint(\"p\");\n")?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("c")
        .arg("--keep-calls")
        .assert()
        .success();
    comments_only.assert("x();\nprint(\"p\");\n");

    let calls_only = temp.child("b.c");
    calls_only.write_str("x(); // c\nprint(\"p\");\n")?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("c")
        .arg("--keep-comments")
        .arg("b.c")
        .assert()
        .success();
    calls_only.assert("x(); // c\n");

    Ok(())
}

#[test]
fn keeping_everything_is_rejected() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("c")
        .arg("--keep-calls")
        .arg("--keep-comments")
        .assert()
        .failure()
        .stderr(predicate::str::contains("leave nothing to do"));

    Ok(())
}

#[test]
fn custom_call_prefixes_replace_print() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("app.js");
    f.write_str("console.log('a');\nconsole.debug(\n  'b',\n);\nprint('c');\n")?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("js")
        .arg("--call")
        .arg("console.log,console.debug(")
        .assert()
        .success();

    f.assert("print('c');\n");

    Ok(())
}

#[test]
fn respects_gitignore_by_default() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    temp.child(".gitignore").write_str("generated.dart\n")?;

    let included = temp.child("included.dart");
    included.write_str("a(); // x\n")?;

    let ignored = temp.child("generated.dart");
    ignored.write_str("a(); // x\n")?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .assert()
        .success()
        .stdout(predicate::str::contains("included.dart"))
        .stdout(predicate::str::contains("generated.dart").not());

    included.assert("a();\n");
    ignored.assert("a(); // x\n");

    Ok(())
}

#[test]
fn no_gitignore_processes_ignored_files_too() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    temp.child(".gitignore").write_str("generated.dart\n")?;
    let ignored = temp.child("generated.dart");
    ignored.write_str("a(); // x\n")?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .arg("--no-gitignore")
        .assert()
        .success();

    ignored.assert("a();\n");

    Ok(())
}

#[test]
fn exclude_glob_skips_matching_paths() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    let lib = temp.child("lib");
    let test = temp.child("test");
    lib.create_dir_all()?;
    test.create_dir_all()?;

    let main = lib.child("main.dart");
    main.write_str("print('main');\nrun();\n")?;
    let test_file = test.child("main_test.dart");
    test_file.write_str("print('test');\nrun();\n")?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .arg("--exclude")
        .arg("test/**")
        .assert()
        .success()
        .stdout(predicate::str::contains("lib/main.dart"))
        .stdout(predicate::str::contains("test/main_test.dart").not());

    main.assert("run();\n");
    test_file.assert("print('test');\nrun();\n");

    Ok(())
}

#[test]
fn invalid_exclude_glob_fails_up_front() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .arg("--exclude")
        .arg("lib/[")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --exclude glob pattern"));

    Ok(())
}

#[test]
fn max_bytes_skips_large_files_and_logs_to_stderr() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let f = temp.child("big.dart");

    let content = "print('x');\n".repeat(10);
    f.write_str(&content)?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .arg("--max-bytes")
        .arg("50")
        .assert()
        .success()
        .stdout(predicate::str::contains("big.dart").not())
        .stderr(predicate::str::contains("Skipping big.dart"));

    f.assert(content.as_str());

    Ok(())
}

#[test]
fn unreadable_file_is_reported_and_batch_continues() -> TestResult {
    let temp = assert_fs::TempDir::new()?;

    let bad = temp.child("bad.dart");
    bad.write_binary(b"a(); // \xff\xfe\n")?;
    let good = temp.child("good.dart");
    good.write_str("b(); // y\n")?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Processed: good.dart"))
        .stderr(predicate::str::contains("Error processing bad.dart"))
        .stderr(predicate::str::contains("could not be processed"));

    good.assert("b();\n");

    Ok(())
}

#[test]
fn json_output_lists_changed_files() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let lib = temp.child("lib");
    lib.create_dir_all()?;

    lib.child("main.dart").write_str(SAMPLE)?;
    lib.child("clean.dart").write_str("void main() {}\n")?;

    let output = cargo_bin_cmd!("tidysrc")
        .current_dir(&temp)
        .arg("-t")
        .arg("dart")
        .arg("--json")
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        report,
        serde_json::json!([{
            "path": "lib/main.dart",
            "file_name": "main.dart",
            "lines_before": 9,
            "lines_after": 5,
        }])
    );

    Ok(())
}

#[test]
fn file_path_argument_is_processed_directly() -> TestResult {
    let temp = assert_fs::TempDir::new()?;
    let runner = temp.child("runner");
    runner.create_dir_all()?;

    let repo = temp.child("repo");
    repo.child("src").create_dir_all()?;
    let main = repo.child("src/main.c");
    main.write_str("int main() { return 0; } // entry\n")?;

    cargo_bin_cmd!("tidysrc")
        .current_dir(&runner)
        .arg("-t")
        .arg(".C")
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed: src/main.c"));

    main.assert("int main() { return 0; }\n");

    Ok(())
}

//! Real Kotlin sources through the parser, the lowering and the indentation rule.

use kstyle_core::{Analyzer, FileOutcome, FixMode, IndentationConfig, IndentationRule};
use kstyle_kotlin::KotlinParser;
use std::path::Path;

fn analyzer_with(root: &Path, mode: FixMode, config: IndentationConfig) -> Analyzer {
    Analyzer::builder()
        .root(root)
        .parser(KotlinParser::new())
        .rule(IndentationRule::new(config))
        .mode(mode)
        .build()
        .unwrap()
}

fn analyzer(root: &Path, mode: FixMode) -> Analyzer {
    analyzer_with(root, mode, IndentationConfig::default())
}

fn run_with(config: IndentationConfig, source: &str, mode: FixMode) -> FileOutcome {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Main.kt");
    analyzer_with(dir.path(), mode, config)
        .check_source(&path, source)
        .unwrap()
}

fn run(source: &str, mode: FixMode) -> FileOutcome {
    run_with(IndentationConfig::default(), source, mode)
}

/// Text after fixing; the input itself when nothing changed.
fn fix(source: &str) -> String {
    run(source, FixMode::Fix)
        .fixed_text
        .unwrap_or_else(|| source.to_string())
}

fn assert_clean(source: &str) {
    let outcome = run(source, FixMode::Check);
    assert!(outcome.violations.is_empty(), "{}", messages(&outcome));
}

fn messages(outcome: &FileOutcome) -> String {
    outcome
        .violations
        .iter()
        .map(|v| format!("{}:{} {}", v.location.line, v.location.column, v.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn under_indented_member_is_reported_and_fixed() {
    let source = "class A {\n   val x = 0\n}\n";
    insta::assert_snapshot!(messages(&run(source, FixMode::Check)), @"2:1 expected 4 but was 3");

    let fixed = run(source, FixMode::Fix);
    assert_eq!(
        fixed.fixed_text.as_deref(),
        Some("class A {\n    val x = 0\n}\n")
    );
}

#[test]
fn tab_indented_body_is_normalized() {
    let outcome = run("fun f() {\n\tval x = 0\n}\n", FixMode::Fix);
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(
        outcome.violations[0].message,
        "tabs are not allowed for indentation"
    );
    assert_eq!(
        outcome.fixed_text.as_deref(),
        Some("fun f() {\n    val x = 0\n}\n")
    );
}

#[test]
fn missing_final_newline() {
    let outcome = run("fun f() {\n}", FixMode::Fix);
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(
        outcome.violations[0].message,
        "no newline at end of file Main.kt"
    );
    assert_eq!(outcome.fixed_text.as_deref(), Some("fun f() {\n}\n"));
}

#[test]
fn trailing_blank_lines_collapse_to_one_newline() {
    let outcome = run("fun f() {\n}\n\n\n", FixMode::Fix);
    assert_eq!(outcome.fixed_text.as_deref(), Some("fun f() {\n}\n"));
}

#[test]
fn nested_blocks_are_clean() {
    let source = "\
fun f(x: Boolean) {
    if (x) {
        while (x) {
            g()
        }
    }
}
";
    let outcome = run(source, FixMode::Check);
    assert!(outcome.violations.is_empty(), "{}", messages(&outcome));
}

#[test]
fn kdoc_lines_sit_one_column_in() {
    let clean = "class A {\n    /**\n     * Doc.\n     */\n    fun f() {}\n}\n";
    assert!(run(clean, FixMode::Check).violations.is_empty());

    let shifted = "class A {\n    /**\n    * Doc.\n     */\n    fun f() {}\n}\n";
    insta::assert_snapshot!(messages(&run(shifted, FixMode::Check)), @"3:1 expected 5 but was 4");
}

#[test]
fn fixes_are_written_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Main.kt");
    std::fs::write(&path, "class A {\n  val x = 0\n}\n").unwrap();
    std::fs::write(dir.path().join("Ok.kt"), "class B\n").unwrap();

    let result = analyzer(dir.path(), FixMode::Fix).analyze().unwrap();
    assert_eq!(result.files_checked, 2);
    assert_eq!(result.files_fixed, 1);
    assert!(result.violations.iter().all(|v| v.fixed));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "class A {\n    val x = 0\n}\n"
    );
}

#[test]
fn unparsable_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Broken.kt"), "fun f( {\n").unwrap();
    std::fs::write(dir.path().join("Main.kt"), "class A {\n   val x = 0\n}\n").unwrap();

    let result = analyzer(dir.path(), FixMode::Check).analyze().unwrap();
    assert_eq!(result.files_checked, 1);
    assert_eq!(result.violations.len(), 1);
}

// ── One construct per checker ──

#[test]
fn assignment_continuation() {
    assert_clean("fun f() {\n    val x =\n        compute()\n}\n");

    let shallow = "fun f() {\n    val x =\n    compute()\n}\n";
    insta::assert_snapshot!(messages(&run(shallow, FixMode::Check)), @"3:1 expected 8 but was 4");
    assert_eq!(fix(shallow), "fun f() {\n    val x =\n        compute()\n}\n");
}

#[test]
fn braceless_if_else_and_loop_bodies() {
    let source = "\
fun f(c: Boolean) {
    if (c)
        a()
    else
        b()
    for (x in xs)
        g(x)
}
";
    assert_clean(source);

    let flat = "\
fun f(c: Boolean) {
    if (c)
    a()
    else
    b()
    while (c)
    g()
}
";
    insta::assert_snapshot!(messages(&run(flat, FixMode::Check)), @r"
    3:1 expected 8 but was 4
    5:1 expected 8 but was 4
    7:1 expected 8 but was 4
    ");
}

#[test]
fn wrapped_super_type_list() {
    assert_clean("class A :\n    B(),\n    C\n");
    assert_clean("class A\n    : B(),\n    C\n");

    let source = "class A :\n    B(),\n  C\n";
    insta::assert_snapshot!(messages(&run(source, FixMode::Check)), @"3:1 expected 4 but was 2");
}

#[test]
fn parameters_align_with_the_first_one() {
    assert_clean("fun f(a: Int,\n      b: Int) {\n}\n");

    let source = "fun f(a: Int,\n    b: Int) {\n}\n";
    insta::assert_snapshot!(messages(&run(source, FixMode::Check)), @"2:1 expected 6 but was 4");
    assert_eq!(fix(source), "fun f(a: Int,\n      b: Int) {\n}\n");
}

#[test]
fn operator_continuations_get_one_extra_unit() {
    assert_clean("fun f() {\n    val ok = a &&\n        b\n    val x = c\n        ?: d\n}\n");

    let source = "fun f() {\n    val ok = a &&\n    b\n}\n";
    insta::assert_snapshot!(messages(&run(source, FixMode::Check)), @"3:1 expected 8 but was 4");
    assert_eq!(fix(source), "fun f() {\n    val ok = a &&\n        b\n}\n");
}

#[test]
fn operator_continuation_without_extended_indent() {
    let config = IndentationConfig {
        extended_indent_after_operators: false,
        ..IndentationConfig::default()
    };
    let source = "fun f() {\n    val ok = a &&\n        b\n}\n";
    let outcome = run_with(config, source, FixMode::Check);
    insta::assert_snapshot!(messages(&outcome), @"3:1 expected 4 but was 8");
}

#[test]
fn method_chain_under_extended_indent_before_dot() {
    let source = "\
fun f() {
    list
        .map(::f)
        .filter(::g)
}
";
    let extended = IndentationConfig {
        extended_indent_before_dot: true,
        ..IndentationConfig::default()
    };
    let outcome = run_with(extended, source, FixMode::Check);
    assert!(outcome.violations.is_empty(), "{}", messages(&outcome));

    insta::assert_snapshot!(messages(&run(source, FixMode::Check)), @r"
    3:1 expected 4 but was 8
    4:1 expected 4 but was 8
    ");
}

#[test]
fn custom_accessor_sits_one_unit_below_property() {
    assert_clean("class A {\n    val x: Int\n        get() = 1\n}\n");

    let source = "class A {\n    val x: Int\n    get() = 1\n}\n";
    insta::assert_snapshot!(messages(&run(source, FixMode::Check)), @"3:1 expected 8 but was 4");
}

#[test]
fn when_branch_body_after_arrow() {
    let source = "\
fun f(x: Int) {
    when (x) {
        1 ->
            g()
        else -> h()
    }
}
";
    assert_clean(source);

    let shallow = source.replace("            g()", "        g()");
    insta::assert_snapshot!(messages(&run(&shallow, FixMode::Check)), @"4:1 expected 12 but was 8");
}

#[test]
fn trim_indent_literal_moves_with_its_line() {
    let source = "\
fun f() {
    val s =
      \"\"\"
        a
          b
      \"\"\".trimIndent()
}
";
    insta::assert_snapshot!(messages(&run(source, FixMode::Check)), @"3:1 expected 8 but was 6");

    let fixed = fix(source);
    assert_eq!(
        fixed,
        "\
fun f() {
    val s =
        \"\"\"
            a
              b
        \"\"\".trimIndent()
}
"
    );
    assert!(run(&fixed, FixMode::Fix).violations.is_empty());
}

#[test]
fn many_misindented_members_keep_their_lines() {
    let members: String = (0..500).map(|i| format!("   val x{i} = {i}\n")).collect();
    let source = format!("class A {{\n{members}}}\n");
    let outcome = run(&source, FixMode::Fix);

    assert_eq!(outcome.violations.len(), 500);
    for (i, v) in outcome.violations.iter().enumerate() {
        assert_eq!((v.location.line, v.location.column), (i + 2, 1));
        assert_eq!(v.message, "expected 4 but was 3");
    }
    let fixed = outcome.fixed_text.unwrap();
    assert!(fixed.lines().skip(1).take(500).all(|l| l.starts_with("    val")));
}

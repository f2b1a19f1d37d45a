// Integration tests for the rizz interpreter
//
// These tests verify the interpreter's behavior by running complete rizz programs
// and checking what they print. Tests cover:
// - Arithmetic, strings and operator precedence
// - Variable declaration, assignment and block scoping
// - Control flow (bet/delulu/cap, vibe_check, looksmaxxing, dip)
// - Error handling (sus/cringe/yeet)
// - Parse diagnostics and the run/check entry points

use rizz::errors::RuntimeError;
use rizz::interpreter::{SharedOutput, Walker};
use rizz::parser::parse_source;
use rizz::{check, run, RunError};

/// Runs `code` and returns the printed lines and the outcome
fn run_code(code: &str) -> (Vec<String>, Result<(), RunError>) {
    let output = SharedOutput::new();
    let result = run(code, false, Some(Box::new(output.clone())));
    (output.lines(), result)
}

/// Runs `code`, failing the test on any error, and returns the printed lines
fn run_ok(code: &str) -> Vec<String> {
    let (lines, result) = run_code(code);
    if let Err(err) = result {
        panic!("program failed: {}\nsource:\n{}", err, code);
    }
    lines
}

fn run_err(code: &str) -> String {
    match run_code(code).1 {
        Err(err) => err.to_string(),
        Ok(()) => panic!("expected an error from:\n{}", code),
    }
}

#[test]
fn test_precedence() {
    assert_eq!(run_ok("alpha 1+2*3;"), vec!["7"]);
    assert_eq!(run_ok("alpha (1+2)*3;"), vec!["9"]);
    assert_eq!(run_ok("alpha 10 - 4 - 3;"), vec!["3"]);
    assert_eq!(run_ok("alpha 8 / 4 / 2;"), vec!["1"]);
    assert_eq!(run_ok("alpha 1 + 2 < 4;"), vec!["true"]);
}

#[test]
fn test_numbers_print_like_script_numbers() {
    assert_eq!(run_ok("alpha 7 / 2;"), vec!["3.5"]);
    assert_eq!(run_ok("alpha .5 + .25;"), vec!["0.75"]);
    assert_eq!(run_ok("alpha 1 / 0;"), vec!["Infinity"]);
    assert_eq!(run_ok("alpha -1 / 0;"), vec!["-Infinity"]);
    assert_eq!(run_ok("alpha 0 / 0;"), vec!["NaN"]);
}

#[test]
fn test_string_concatenation() {
    assert_eq!(run_ok("alpha \"a\"+\"b\";"), vec!["ab"]);
    assert_eq!(run_ok("alpha 'single' + \" double\";"), vec!["single double"]);
}

#[test]
fn test_mixed_addition_is_an_error() {
    let (lines, result) = run_code("alpha 1+\"b\";");
    assert!(lines.is_empty());
    match result {
        Err(RunError::Runtime(err)) => assert!(err.is_internal()),
        other => panic!("expected runtime error, got {:?}", other),
    }
}

#[test]
fn test_equality_and_booleans() {
    assert_eq!(
        run_ok("alpha 1 fr 1; alpha 1 cappin 1; alpha \"x\" fr \"x\"; alpha 1 fr \"1\";"),
        vec!["true", "false", "true", "false"]
    );
    assert_eq!(run_ok("fanum_tax n; alpha n fr n; alpha n;"), vec!["true", "null"]);
    assert_eq!(run_ok("alpha (1 < 2) fr (3 < 4);"), vec!["true"]);
    assert_eq!(run_ok("alpha 2 <= 1;"), vec!["false"]);
}

#[test]
fn test_variables_and_assignment() {
    assert_eq!(run_ok("fanum_tax v be 1; alpha (v be 3); alpha v;"), vec!["3", "3"]);
    assert_eq!(run_ok("fanum_tax a be 0; fanum_tax b be 0; a be b be 5; alpha a + b;"), vec!["10"]);
}

#[test]
fn test_undeclared_assignment_fails() {
    assert_eq!(run_err("x be 1;"), "Variable x doesn't exist.");
}

#[test]
fn test_block_scope_is_dropped() {
    let (lines, result) = run_code("{ fanum_tax inner be 1; alpha inner; } alpha inner;");
    assert_eq!(lines, vec!["1"]);
    assert_eq!(result.unwrap_err().to_string(), "Variable inner doesn't exist.");
}

#[test]
fn test_redeclaration_and_shadowing() {
    assert_eq!(
        run_err("fanum_tax x be 1; fanum_tax x be 2;"),
        "Variable x already exists in the current scope"
    );
    assert_eq!(
        run_ok("fanum_tax x be 1; { fanum_tax x be 2; alpha x; } alpha x;"),
        vec!["2", "1"]
    );
}

#[test]
fn test_inner_block_assignment_reaches_outer_variable() {
    assert_eq!(run_ok("fanum_tax x be 1; { x be x + 1; } alpha x;"), vec!["2"]);
}

#[test]
fn test_if_chain() {
    let program = |n: i32| {
        format!(
            "fanum_tax n be {}; bet (n fr 1) alpha \"one\"; delulu (n fr 2) {{ alpha \"two\"; }} cap alpha \"many\";",
            n
        )
    };
    assert_eq!(run_ok(&program(1)), vec!["one"]);
    assert_eq!(run_ok(&program(2)), vec!["two"]);
    assert_eq!(run_ok(&program(3)), vec!["many"]);
}

#[test]
fn test_truthiness_in_conditions() {
    assert_eq!(
        run_ok("bet (0) alpha 1; bet (\"\") alpha 2; bet (\"0\") alpha 3; fanum_tax n; bet (n) alpha 4;"),
        vec!["3"]
    );
}

#[test]
fn test_ternary() {
    assert_eq!(run_ok("alpha 1 wrizz = \"yes\", lrizz = \"no\";"), vec!["yes"]);
    assert_eq!(run_ok("alpha 0 wrizz = \"yes\", lrizz = \"no\";"), vec!["no"]);
}

#[test]
fn test_while_loop() {
    assert_eq!(
        run_ok("fanum_tax i be 0; vibe_check (i < 3) { alpha i; i be i + 1; }"),
        vec!["0", "1", "2"]
    );
}

#[test]
fn test_loop_body_scope_is_fresh_each_iteration() {
    assert_eq!(
        run_ok("fanum_tax i be 0; vibe_check (i < 2) { fanum_tax t be i * 10; alpha t; i be i + 1; }"),
        vec!["0", "10"]
    );
}

#[test]
fn test_break_leaves_innermost_loop_only() {
    let code = r#"
fanum_tax i be 0;
vibe_check (i < 2) {
    fanum_tax j be 0;
    vibe_check (1) {
        bet (j fr 2) { dip; }
        alpha i * 10 + j;
        j be j + 1;
    }
    i be i + 1;
}
alpha "after";
"#;
    assert_eq!(run_ok(code), vec!["0", "1", "10", "11", "after"]);
}

#[test]
fn test_break_outside_loop() {
    assert_eq!(run_err("{ dip; }"), "Tried to break in non-loop context");
}

#[test]
fn test_switch_fallthrough() {
    let code = r#"
looksmaxxing (1) {
    aura 1:
    aura 2: alpha 2; dip;
    aura 3: alpha 3;
}
"#;
    assert_eq!(run_ok(code), vec!["2"]);

    let code = r#"
looksmaxxing (1) {
    aura 1: alpha 1;
    aura 2: alpha 2;
    what_the_sigma: alpha "default";
}
"#;
    assert_eq!(run_ok(code), vec!["1", "2", "default"]);
}

#[test]
fn test_switch_default_and_no_match() {
    let code = r#"
fanum_tax s be "b";
looksmaxxing s {
    what_the_sigma: alpha "default"; dip;
    aura "a": alpha "a"; dip;
}
looksmaxxing s {
    aura "x": alpha "x";
}
alpha "end";
"#;
    assert_eq!(run_ok(code), vec!["default", "end"]);
}

#[test]
fn test_break_in_switch_inside_loop_stays_in_switch() {
    let code = r#"
fanum_tax i be 0;
vibe_check (i < 2) {
    looksmaxxing i {
        aura 0: alpha "zero"; dip;
        what_the_sigma: alpha "other";
    }
    i be i + 1;
}
"#;
    assert_eq!(run_ok(code), vec!["zero", "other"]);
}

#[test]
fn test_try_catch_thrown_value() {
    let code = r#"
sus {
    alpha "before";
    yeet 1 + 2;
    alpha "unreachable";
} cringe (e) {
    alpha e;
}
alpha "after";
"#;
    assert_eq!(run_ok(code), vec!["before", "3", "after"]);
}

#[test]
fn test_catch_binding_is_a_string() {
    assert_eq!(run_ok("sus { yeet 4; } cringe (e) { alpha e + \"!\"; }"), vec!["4!"]);
}

#[test]
fn test_try_catches_runtime_errors() {
    assert_eq!(
        run_ok("sus { alpha missing; } cringe (err) { alpha err; }"),
        vec!["Variable missing doesn't exist."]
    );
    assert_eq!(
        run_ok("sus { alpha 1 - \"a\"; } cringe (err) { alpha err; }"),
        vec!["Internal error: Unsupported operands for -: number and string"]
    );
}

#[test]
fn test_try_scope_is_released() {
    let (lines, result) =
        run_code("sus { fanum_tax t be 1; yeet t; } cringe (e) { fanum_tax c be 2; } alpha t;");
    assert!(lines.is_empty());
    assert_eq!(result.unwrap_err().to_string(), "Variable t doesn't exist.");

    assert_eq!(run_ok("sus { } cringe (e) { } fanum_tax e be 1; alpha e;"), vec!["1"]);
}

#[test]
fn test_rethrow_from_catch() {
    let code = "sus { sus { yeet \"inner\"; } cringe (e) { yeet e + \" again\"; } } cringe (e) { alpha e; }";
    assert_eq!(run_ok(code), vec!["inner again"]);
}

#[test]
fn test_uncaught_throw() {
    match run_code("yeet \"boom\";").1 {
        Err(RunError::Runtime(RuntimeError::Thrown(msg))) => assert_eq!(msg, "boom"),
        other => panic!("expected thrown error, got {:?}", other),
    }
}

#[test]
fn test_side_effects_before_error_remain() {
    let (lines, result) = run_code("alpha 1; alpha 2; yeet 0; alpha 3;");
    assert_eq!(lines, vec!["1", "2"]);
    assert!(result.is_err());
}

#[test]
fn test_parse_errors_prevent_execution() {
    let (lines, result) = run_code("alpha 1;\nalpha 2\nalpha 3;");
    assert!(lines.is_empty());
    match result {
        Err(RunError::Parse(report)) => {
            assert!(report.contains("Expected ; after alpha statement"), "report was:\n{}", report);
            assert!(report.starts_with("error:"));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_lexical_errors_prevent_execution() {
    let (lines, result) = run_code("alpha 1; alpha \"open;");
    assert!(lines.is_empty());
    assert!(matches!(result, Err(RunError::Parse(_))));
}

#[test]
fn test_check_does_not_execute() {
    assert!(check("yeet 1;", false).is_ok());
    assert!(check("fanum_tax be 1;", false).is_err());
}

#[test]
fn test_empty_programs() {
    assert!(run_ok("").is_empty());
    assert!(run_ok("   // just a comment\n/* and a block */").is_empty());
}

#[test]
fn test_program_variables_do_not_outlive_a_run() {
    let first = parse_source("fanum_tax g be 41;", false);
    let second = parse_source("alpha g + 1;", false);
    let output = SharedOutput::new();
    let mut walker = Walker::with_output(Box::new(output.clone()));
    walker.run(&first.body).unwrap();
    // each run wraps the program in its own block, so the global does not survive
    assert!(walker.run(&second.body).is_err());
    assert!(output.lines().is_empty());
}

#[test]
fn test_closure_sink() {
    let collected = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink_lines = collected.clone();
    let sink = move |line: &str| -> Result<(), String> {
        sink_lines.lock().unwrap().push(line.to_string());
        Ok(())
    };
    run("alpha \"hi\";", false, Some(Box::new(sink))).unwrap();
    assert_eq!(*collected.lock().unwrap(), vec!["hi".to_string()]);
}

#[test]
fn test_break_in_try_leaves_enclosing_loop() {
    let code = r#"
fanum_tax i be 0;
vibe_check (i < 3) {
    i be i + 1;
    sus { dip; } cringe (e) { }
    alpha i;
}
alpha "after " + "loop";
"#;
    let (lines, result) = run_code(code);
    assert!(result.is_ok());
    assert_eq!(lines, vec!["after loop"]);
}

#[test]
fn test_break_in_nested_try_leaves_loop() {
    let code = r#"
fanum_tax i be 0;
vibe_check (1) {
    i be i + 1;
    sus {
        sus { bet (i fr 2) dip; } cringe (e) { }
        alpha i;
    } cringe (e) { }
}
alpha "done";
"#;
    assert_eq!(run_ok(code), vec!["1", "done"]);
}

#[test]
fn test_break_in_catch_handler_leaves_loop() {
    let code = r#"
fanum_tax i be 0;
vibe_check (i < 5) {
    i be i + 1;
    sus { bet (i fr 3) yeet "stop"; } cringe (e) { alpha e; dip; alpha "unreachable"; }
    alpha i;
}
alpha i;
"#;
    assert_eq!(run_ok(code), vec!["1", "2", "stop", "3"]);
}

#[test]
fn test_break_in_try_inside_switch_arm() {
    let code = r#"
looksmaxxing (1) {
    aura 1:
        sus { alpha "in try"; dip; } cringe (e) { }
        alpha "skipped";
    aura 2:
        alpha "fell through";
}
alpha "end";
"#;
    assert_eq!(run_ok(code), vec!["in try", "end"]);
}

#[test]
fn test_break_in_try_without_loop_only_ends_try() {
    assert_eq!(
        run_ok("sus { alpha 1; dip; alpha 2; } cringe (e) { } alpha 3;"),
        vec!["1", "3"]
    );
}

#[test]
fn test_empty_branch_at_end_of_input_is_a_parse_error() {
    for code in ["bet (1);", "vibe_check (1);"] {
        let (lines, result) = run_code(code);
        assert!(lines.is_empty());
        match result {
            Err(RunError::Parse(report)) => {
                assert!(report.contains("Expected statement before end of input"), "{}", report)
            }
            other => panic!("expected parse error for {:?}, got {:?}", code, other),
        }
    }
}

#[test]
fn test_large_and_tiny_numbers_use_exponent_form() {
    assert_eq!(
        run_ok("alpha 10000000000000000000000; alpha 1 / 10000000; alpha 1000000 * 1000000;"),
        vec!["1e+22", "1e-7", "1000000000000"]
    );
}

#[test]
fn test_strings_compare_by_content() {
    assert_eq!(
        run_ok("alpha \"a\" fr \"b\"; alpha \"a\" cappin \"b\"; alpha 'same' fr \"same\";"),
        vec!["false", "true", "true"]
    );
}

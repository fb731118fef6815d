//! Black-box tests for the pattern pipeline: text → checks → program.

use std::io::Write;

use ilregex_common::{Opcode, OpcodeFamily, Operand};
use ilregex_pattern::{
    CheckKind, CompileError, ParseErrorKind, Pattern, Program, Quantifier,
};

fn program(text: &str) -> Program {
    Pattern::parse(text).unwrap().compile().unwrap()
}

#[test]
fn single_optional_check() {
    let pattern = Pattern::parse("<op ldarg.0>?").unwrap();
    assert_eq!(pattern.len(), 1);
    let check = &pattern.checks()[0];
    assert_eq!(check.kind, CheckKind::Opcode(Opcode::Ldarg0.into()));
    assert_eq!(check.quantifier, Quantifier::new(0, 1, true).unwrap());
}

#[test]
fn comments_are_whitespace() {
    let a = Pattern::parse("/* x */ <op nop>").unwrap();
    let b = Pattern::parse("<op nop>").unwrap();
    assert_eq!(a, b);

    let c = Pattern::parse("// header\n<op nop> // trailing").unwrap();
    assert_eq!(c, b);
}

#[test]
fn named_group_with_one_child() {
    let pattern = Pattern::parse("(?'g' <op nop>)").unwrap();
    assert_eq!(pattern.len(), 3);
    assert_eq!(
        pattern.checks()[0].kind,
        CheckKind::GroupStart {
            capturing: true,
            name: Some("g".to_string())
        }
    );
    assert_eq!(pattern.checks()[1].kind, CheckKind::Opcode(Opcode::Nop.into()));
    assert_eq!(pattern.checks()[2].kind, CheckKind::GroupEnd);
}

#[test]
fn missing_argument_position() {
    let err = Pattern::parse("<op>").unwrap_err();
    assert_eq!((err.line, err.column), (1, 5));
    assert!(matches!(err.kind, ParseErrorKind::WrongArgCount { .. }));
}

#[test]
fn unknown_prefix_message() {
    let err = Pattern::parse("<bogus x>").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnknownPrefix("bogus".to_string()));
    assert!(err.to_string().contains("unknown check prefix"));
}

#[test]
fn multi_line_error_position() {
    let err = Pattern::parse("<op nop>\n<op nop> <op\n").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedCheck);
    assert_eq!((err.line, err.column), (2, 10));
}

#[test]
fn underscore_and_case_aliases() {
    let a = Pattern::parse("<op LDARG_0> <op %LDC_I4>").unwrap();
    let b = Pattern::parse("<op ldarg.0> <op %ldc.i4>").unwrap();
    assert_eq!(a, b);
}

#[test]
fn literal_operand_kinds() {
    let pattern =
        Pattern::parse("<op ldc.i4 -5> <op ldc.i8 5l> <op ldc.i4.s 5sb> <op ldc.r8 0.5d>")
            .unwrap();
    let operands: Vec<&Operand> = pattern
        .checks()
        .iter()
        .filter_map(|c| match &c.kind {
            CheckKind::OpcodeOperand(_, op) => Some(op),
            _ => None,
        })
        .collect();
    assert_eq!(
        operands,
        vec![
            &Operand::Int32(-5),
            &Operand::Int64(5),
            &Operand::Int8(5),
            &Operand::Float64(0.5),
        ]
    );
}

#[test]
fn compiled_program_shape() {
    let p = program("(?'g' <op nop> | <op ret>)* <cap ldstr 's'>");
    // Whole-match group plus 'g'.
    assert_eq!(p.group_count(), 2);
    assert_eq!(p.operand_count(), 1);
    assert_eq!(p.group_slot("g"), Some(1));
    assert_eq!(p.operand_slot("s"), Some(0));

    // Sentinel first, then the synthetic outer group.
    assert_eq!(p.check(0).kind, CheckKind::Nop);
    assert!(p.check(1).is_group_start());
    assert_eq!(p.check(1).capture, Some(0));

    // The user group's quantifier lives on its start after compile.
    let g_start = 2;
    assert!(p.check(g_start).is_group_start());
    assert_eq!(
        p.check(g_start).quantifier,
        Quantifier::new(0, ilregex_pattern::UNBOUNDED, true).unwrap()
    );
    assert_eq!(p.check(g_start).alternatives.len(), 1);
}

#[test]
fn family_checks_compile() {
    let p = program("<op %ldarg> <op any>");
    assert_eq!(
        p.check(2).kind,
        CheckKind::Opcode(OpcodeFamily::Ldarg.into())
    );
    assert_eq!(p.check(3).kind, CheckKind::Opcode(OpcodeFamily::Any.into()));
}

#[test]
fn dangling_quantifier_is_a_compile_error_for_programmatic_checks() {
    use ilregex_pattern::Check;
    let checks = vec![Check::new(CheckKind::Quantifier(
        Quantifier::new(0, 1, true).unwrap(),
    ))];
    assert_eq!(
        Pattern::new(checks).unwrap_err(),
        CompileError::DanglingQuantifier { index: 0 }
    );
}

#[test]
fn display_round_trip_behavior_preserved() {
    let text = "^ (?'g' <op %ldarg> .)+? (<op nop>|<op ret>) <mth call \"M\"> $";
    let pattern = Pattern::parse(text).unwrap();
    let reparsed = Pattern::parse(&pattern.to_string()).unwrap();
    assert_eq!(pattern, reparsed);

    let a = pattern.compile().unwrap();
    let b = reparsed.compile().unwrap();
    assert_eq!(a.group_count(), b.group_count());
    assert_eq!(a.operand_count(), b.operand_count());
    assert_eq!(a.checks().len(), b.checks().len());
}

#[test]
fn from_file_reads_pattern_text() {
    let mut file = tempfile::NamedTempFile::with_suffix(".ilregex").unwrap();
    writeln!(file, "// stored pattern").unwrap();
    writeln!(file, "<op ldarg.0> <op ret>").unwrap();

    let pattern = Pattern::from_file(file.path()).unwrap();
    assert_eq!(pattern.len(), 2);
}

#[test]
fn from_file_missing_path_is_an_io_error() {
    let err = Pattern::from_file("/nonexistent/p.ilregex").unwrap_err();
    assert!(matches!(
        err,
        ilregex_pattern::pattern::PatternFileError::Io(_)
    ));
}

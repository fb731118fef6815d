//! End-to-end matcher tests: pattern text in, match results out.

use ilregex_common::{
    Instruction, MemberRef, MethodInfo, Opcode, Operand, ParameterInfo,
};
use ilregex_matcher::{MatchOptions, MatchResult, OperandDictionary, Regex, UsageError};
use ilregex_pattern::Pattern;

// ============================================================
// Helper functions
// ============================================================

/// Instruction with no operand.
fn bare(op: Opcode) -> Instruction {
    Instruction::bare(op)
}

/// `ldstr` with a string operand.
fn ldstr(text: &str) -> Instruction {
    Instruction::new(Opcode::Ldstr, Operand::string(text))
}

/// `call` with a method-reference operand.
fn call(full_name: &str) -> Instruction {
    Instruction::new(
        Opcode::Call,
        Operand::Method(MemberRef::new(full_name, "Test.dll")),
    )
}

/// Compile pattern text with default options.
fn regex(pattern: &str) -> Regex {
    Regex::new(Pattern::parse(pattern).unwrap()).unwrap()
}

/// Compile pattern text with explicit options.
fn regex_with(pattern: &str, options: MatchOptions) -> Regex {
    Regex::with_options(Pattern::parse(pattern).unwrap(), options).unwrap()
}

fn find<'i>(pattern: &str, instructions: &'i [Instruction]) -> MatchResult<'i> {
    regex(pattern).find(instructions)
}

// ============================================================
// Spec scenarios
// ============================================================

#[test]
fn literal_opcode_sequence() {
    let body = [
        bare(Opcode::Ldarg0),
        bare(Opcode::LdcI45),
        bare(Opcode::Add),
        bare(Opcode::Ret),
    ];
    let m = find("<op ldarg.0> <op ldc.i4.5> <op add>", &body);
    assert!(m.success());
    assert_eq!(m.index(), 0);
    assert_eq!(m.length(), 3);
    assert_eq!(m.end(), 3);
    assert_eq!(m.operand_count(), 0);
}

#[test]
fn backreference_on_argument_operands() {
    let body = [
        bare(Opcode::Ldarg0),
        bare(Opcode::Ldarg1),
        bare(Opcode::Ldarg0),
        bare(Opcode::Ret),
    ];
    let m = find("<cap %ldarg 'p'> . <ceq %ldarg 'p'>", &body);
    assert!(m.success());
    assert_eq!(m.index(), 0);
    assert_eq!(m.length(), 3);
    assert_eq!(m.operand_named("p").as_parameter(), Ok(Some(0)));
}

#[test]
fn backreference_mismatch_fails_at_first_position() {
    // ldarg.0 then ldarg.1 differ, but the search window slides: the
    // match starting at index 1 pairs ldarg.1 with... nothing equal, so
    // the whole search fails.
    let body = [
        bare(Opcode::Ldarg0),
        bare(Opcode::Nop),
        bare(Opcode::Ldarg1),
        bare(Opcode::Ret),
    ];
    let m = find("<cap %ldarg 'p'> . <ceq %ldarg 'p'>", &body);
    assert!(!m.success());
}

#[test]
fn greedy_open_ended_quantifier_takes_all() {
    let body = [
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Ret),
    ];
    let m = find("<op nop>{2,} <op ret>", &body);
    assert!(m.success());
    assert_eq!(m.index(), 0);
    assert_eq!(m.length(), 4);
}

#[test]
fn lazy_open_ended_quantifier_still_reaches_the_tail() {
    let body = [
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Ret),
    ];
    let m = find("<op nop>{2,}? <op ret>", &body);
    assert!(m.success());
    assert_eq!(m.length(), 4);
}

#[test]
fn lazy_quantifier_iterates_only_the_minimum() {
    let body = [bare(Opcode::Nop), bare(Opcode::Nop), bare(Opcode::Nop)];
    // With no tail forcing expansion, greedy takes three, lazy takes two.
    assert_eq!(find("<op nop>{2,}", &body).length(), 3);
    assert_eq!(find("<op nop>{2,}?", &body).length(), 2);
}

#[test]
fn string_backreference_fails_on_different_strings() {
    let body = [ldstr("a"), ldstr("b"), bare(Opcode::Ret)];
    let m = find("(?'s'<cap ldstr>) <ceq ldstr '0'>", &body);
    assert!(!m.success());
}

#[test]
fn string_backreference_succeeds_on_equal_strings() {
    let body = [ldstr("a"), ldstr("a"), bare(Opcode::Ret)];
    let m = find("(?'s'<cap ldstr>) <ceq ldstr '0'>", &body);
    assert!(m.success());
    assert_eq!(m.length(), 2);
    assert_eq!(m.group_named("s").len(), 1);
    assert_eq!(m.operand(0).as_str(), Ok(Some("a")));
}

#[test]
fn method_name_check() {
    let body = [call("System.Void Foo::M()"), bare(Opcode::Ret)];
    let m = find("<mth call \"M\">", &body);
    assert!(m.success());
    assert_eq!(m.length(), 1);

    let miss = find("<mth call \"Other\">", &body);
    assert!(!miss.success());
}

// ============================================================
// Member-name checks
// ============================================================

#[test]
fn field_name_check() {
    let body = [
        Instruction::new(
            Opcode::Ldfld,
            Operand::Field(MemberRef::new("System.Int32 Counter::total", "Test.dll")),
        ),
        bare(Opcode::Ret),
    ];
    assert!(find("<fld ldfld \"total\">", &body).success());
    assert!(!find("<fld ldfld \"subtotal\">", &body).success());
}

#[test]
fn type_name_check_accepts_generics() {
    let body = [
        Instruction::new(
            Opcode::Isinst,
            Operand::Type(MemberRef::new(
                "System.Collections.Generic.List<T>",
                "Test.dll",
            )),
        ),
        bare(Opcode::Ret),
    ];
    assert!(find("<typ isinst \"List\">", &body).success());
    assert!(!find("<typ isinst \"Dictionary\">", &body).success());
}

#[test]
fn callsite_name_check() {
    let body = [
        Instruction::new(
            Opcode::Calli,
            Operand::CallSite(MemberRef::new("System.Void Sig(System.Int32)", "Test.dll")),
        ),
        bare(Opcode::Ret),
    ];
    assert!(find("<cls calli \"Sig\">", &body).success());
}

#[test]
fn member_check_requires_the_matching_operand_kind() {
    // A method check against a field operand fails even when the name
    // would match.
    let body = [
        Instruction::new(
            Opcode::Call,
            Operand::Field(MemberRef::new("System.Int32 Foo::M", "Test.dll")),
        ),
        bare(Opcode::Ret),
    ];
    assert!(!find("<mth call \"M\">", &body).success());
}

#[test]
fn verbatim_member_pattern() {
    let body = [call("System.Void Foo::Reset()"), bare(Opcode::Ret)];
    assert!(find("<mth call \"?^System\\\\.Void \">", &body).success());
    assert!(!find("<mth call \"?^System\\\\.Int32 \">", &body).success());
}

#[test]
fn string_literal_operand_check() {
    let body = [ldstr("hello"), bare(Opcode::Ret)];
    assert!(find("<op ldstr \"hello\">", &body).success());
    assert!(!find("<op ldstr \"world\">", &body).success());
}

// ============================================================
// Quantifiers and backtracking
// ============================================================

#[test]
fn optional_quantifier() {
    let body = [bare(Opcode::Ldarg0), bare(Opcode::Ret)];
    assert_eq!(find("<op ldarg.0>? <op ret>", &body).length(), 2);

    let body = [bare(Opcode::Ret)];
    assert_eq!(find("<op ldarg.0>? <op ret>", &body).length(), 1);
}

#[test]
fn bounded_quantifier_backtracks_to_fit_the_tail() {
    let body = [
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Ret),
    ];
    // Greedy wants three nops but must give one back for the tail.
    let m = find("<op nop>{1,3} <op nop> <op ret>", &body);
    assert!(m.success());
    assert_eq!(m.length(), 4);
}

#[test]
fn quantified_group_backtracks_whole_iterations() {
    let body = [bare(Opcode::Nop), bare(Opcode::Nop), bare(Opcode::Ret)];
    // Two-nop iterations: one iteration, then the single nop fails on
    // ret, so the group gives up its iteration entirely.
    let m = find("(?:<op nop> <op nop>)* <op nop> <op ret>", &body);
    assert!(m.success());
    assert_eq!(m.length(), 3);
}

#[test]
fn group_capture_reverts_when_an_iteration_is_popped() {
    let body = [bare(Opcode::Nop), bare(Opcode::Nop), bare(Opcode::Ret)];
    // Greedy matches two iterations, then pops one so the tail fits;
    // the capture must report the surviving iteration.
    let m = find("(?'g' <op nop>)* <op nop> <op ret>", &body);
    assert!(m.success());
    let g = m.group_named("g");
    assert!(g.success());
    assert_eq!((g.start(), g.end()), (0, 1));
}

#[test]
fn alternation_tries_left_to_right() {
    let body = [bare(Opcode::Nop)];
    let m = find("(?'g' . | <op nop>)", &body);
    assert!(m.success());
    // Both branches match; the left one wins.
    assert_eq!(m.group_named("g").len(), 1);

    let body = [bare(Opcode::Ret)];
    let m = find("(<op nop> | <op ret>)", &body);
    assert!(m.success());
}

#[test]
fn quantified_alternation_mixes_branches_per_iteration() {
    let body = [bare(Opcode::Ret), bare(Opcode::Nop), bare(Opcode::Add)];
    let m = find("(<op nop>|<op ret>){2} <op add>", &body);
    assert!(m.success());
    assert_eq!(m.length(), 3);
}

#[test]
fn alternation_with_unequal_branch_lengths_backtracks() {
    let body = [
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Ret),
    ];
    // First iteration takes two nops, second must settle for one.
    let m = find("(<op nop> <op nop>|<op nop>){2} <op ret>", &body);
    assert!(m.success());
    assert_eq!(m.length(), 4);
}

#[test]
fn empty_alternative_matches_nothing() {
    let body = [bare(Opcode::Ret)];
    let m = find("(<op nop>|)", &body);
    assert!(m.success());
    assert_eq!(m.length(), 0);
}

#[test]
fn quantified_anchor_terminates() {
    let body = [bare(Opcode::Nop)];
    let m = find("^* <op nop>", &body);
    assert!(m.success());
    assert_eq!(m.length(), 1);
}

#[test]
fn zero_width_group_under_star_terminates() {
    let body = [bare(Opcode::Nop)];
    let m = find("(?:<nop>)* <op nop>", &body);
    assert!(m.success());
}

// ============================================================
// Greedy/lazy laws and SwapGreedy
// ============================================================

#[test]
fn greedy_consumes_at_least_as_much_as_lazy() {
    let body = [
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Ret),
    ];
    let greedy = find("(?'a' <op nop>*) <op any>", &body);
    let lazy = find("(?'a' <op nop>*?) <op any>", &body);
    assert!(greedy.success() && lazy.success());
    assert!(greedy.group_named("a").len() >= lazy.group_named("a").len());
    assert_eq!(greedy.group_named("a").len(), 3);
    assert_eq!(lazy.group_named("a").len(), 0);
}

#[test]
fn swap_greedy_equals_inverted_quantifiers() {
    let body = [bare(Opcode::Nop), bare(Opcode::Nop), bare(Opcode::Nop)];
    let swapped = regex_with("<op nop>{2,}", MatchOptions::new().swap_greedy());
    let lazy = regex("<op nop>{2,}?");
    let a = swapped.find(&body);
    let b = lazy.find(&body);
    assert_eq!(a.success(), b.success());
    assert_eq!(a.index(), b.index());
    assert_eq!(a.length(), b.length());

    // And the swap applies to lazy quantifiers too, making them greedy.
    let swapped_lazy = regex_with("<op nop>{2,}?", MatchOptions::new().swap_greedy());
    assert_eq!(swapped_lazy.find(&body).length(), 3);
}

// ============================================================
// Anchors
// ============================================================

#[test]
fn start_anchor_pins_the_match_to_position_zero() {
    let body = [bare(Opcode::Ret), bare(Opcode::Nop)];
    assert!(!find("^ <op nop>", &body).success());
    assert!(find("^ <op ret>", &body).success());
}

#[test]
fn end_anchor_requires_full_length() {
    let body = [bare(Opcode::Nop), bare(Opcode::Ret)];
    assert!(find("<op ret> $", &body).success());
    assert!(!find("<op nop> $", &body).success());
}

#[test]
fn anchors_ignore_search_range_by_default() {
    let body = [bare(Opcode::Ret), bare(Opcode::Nop), bare(Opcode::Ret)];
    let re = regex("^ <op nop>");
    let m = re.find_with(&body, None, None, 1, body.len()).unwrap();
    assert!(!m.success());

    // $ points past the array, not at the range end.
    let re = regex("<op nop> $");
    let m = re.find_with(&body, None, None, 0, 2).unwrap();
    assert!(!m.success());
}

#[test]
fn search_boundaries_align_anchors_to_the_range() {
    let body = [bare(Opcode::Ret), bare(Opcode::Nop), bare(Opcode::Ret)];
    let opts = MatchOptions::new().search_boundaries();

    let re = regex_with("^ <op nop>", opts);
    let m = re.find_with(&body, None, None, 1, body.len()).unwrap();
    assert!(m.success());
    assert_eq!(m.index(), 1);

    let re = regex_with("<op nop> $", opts);
    let m = re.find_with(&body, None, None, 0, 2).unwrap();
    assert!(m.success());
    assert_eq!(m.end(), 2);
}

// ============================================================
// Operand semantics
// ============================================================

#[test]
fn family_literal_matches_short_form_constants() {
    let body = [bare(Opcode::LdcI47), bare(Opcode::Ret)];
    assert!(find("<op %ldc.i4 7>", &body).success());
    assert!(!find("<op %ldc.i4 8>", &body).success());
}

#[test]
fn family_capture_synthesizes_the_operand() {
    let body = [bare(Opcode::LdcI45), bare(Opcode::Ret)];
    let m = find("<cap %ldc.i4 'k'>", &body);
    assert!(m.success());
    assert_eq!(m.operand_named("k").as_i32(), Ok(Some(5)));
}

#[test]
fn short_form_resolution_against_method_parameters() {
    let method = MethodInfo::new(
        vec![ParameterInfo::named("this"), ParameterInfo::named("x")],
        vec![],
        vec![bare(Opcode::Ldarg1), bare(Opcode::Ret)],
    );
    let m = regex("<cap %ldarg 'p'>").find_in_method(&method);
    assert!(m.success());
    assert_eq!(m.operand_named("p").as_parameter(), Ok(Some(1)));

    // An out-of-range shortcut resolves to nothing, so the capture holds
    // no parameter value.
    let short_method = MethodInfo::new(
        vec![ParameterInfo::named("this")],
        vec![],
        vec![bare(Opcode::Ldarg3), bare(Opcode::Ret)],
    );
    let m = regex("<cap %ldarg 'p'> .").find_in_method(&short_method);
    assert!(m.success());
    assert!(m.operand_named("p").as_parameter().is_err());
}

#[test]
fn anonymous_captures_use_slot_indices() {
    let body = [ldstr("x"), bare(Opcode::Nop), ldstr("x")];
    assert!(find("<cap ldstr> . <ceq ldstr '0'>", &body).success());

    let body = [ldstr("x"), bare(Opcode::Nop), ldstr("y")];
    assert!(!find("<cap ldstr> . <ceq ldstr '0'>", &body).success());
}

#[test]
fn dictionary_seeds_unbound_names() {
    let body = [bare(Opcode::Ldarg1), bare(Opcode::Ret)];
    let re = regex("<ceq %ldarg 'x'>");

    let mut dict = OperandDictionary::new();
    dict.add("x", Operand::Parameter(1)).unwrap();
    let m = re
        .find_with(&body, None, Some(&dict), 0, body.len())
        .unwrap();
    assert!(m.success());

    let mut wrong = OperandDictionary::new();
    wrong.add("x", Operand::Parameter(0)).unwrap();
    let m = re
        .find_with(&body, None, Some(&wrong), 0, body.len())
        .unwrap();
    assert!(!m.success());

    // No capture, no dictionary entry: the check cannot pass.
    let m = re.find(&body);
    assert!(!m.success());
}

#[test]
fn dictionary_bulk_import_from_match() {
    let body = [bare(Opcode::Ldarg0), bare(Opcode::Ret)];
    let m = find("<cap %ldarg 'p'>", &body);
    assert!(m.success());

    let mut dict = OperandDictionary::new();
    dict.add_match(&m).unwrap();
    assert_eq!(dict.get("p"), Some(&Operand::Parameter(0)));
}

#[test]
fn typed_accessor_mismatch_is_a_cast_error() {
    let body = [ldstr("s")];
    let m = find("<cap ldstr 'v'>", &body);
    assert!(m.success());
    assert!(m.operand_named("v").as_i32().is_err());
    assert_eq!(m.operand_named("v").as_str(), Ok(Some("s")));
    // Absent captures are a null-equivalent, not an error.
    assert_eq!(m.operand_named("missing").as_i32(), Ok(None));
}

// ============================================================
// Results, next_match, iteration
// ============================================================

#[test]
fn whole_match_is_group_zero() {
    let body = [bare(Opcode::Nop), bare(Opcode::Ret)];
    let m = find("<op nop> <op ret>", &body);
    let whole = m.group(0);
    assert!(whole.success());
    assert_eq!((whole.start(), whole.end()), (m.index(), m.end()));
    assert_eq!(m.matched_instructions().len(), 2);
}

#[test]
fn group_lookups_never_fail() {
    let body = [bare(Opcode::Nop)];
    let m = find("<op nop>", &body);
    assert!(!m.group(42).success());
    assert!(!m.group_named("missing").success());
    assert!(!m.operand(7).success());
    assert_eq!(m.group_instructions(42).len(), 0);
}

#[test]
fn unmatched_optional_group_is_unsuccessful() {
    let body = [bare(Opcode::Ret)];
    let m = find("(?'g' <op nop>)? <op ret>", &body);
    assert!(m.success());
    assert!(!m.group_named("g").success());
}

#[test]
fn next_match_resumes_after_the_end() {
    let body = [
        bare(Opcode::Nop),
        bare(Opcode::Ret),
        bare(Opcode::Nop),
        bare(Opcode::Ret),
    ];
    let first = find("<op nop>", &body);
    assert_eq!(first.index(), 0);
    let second = first.next_match();
    assert!(second.success());
    assert_eq!(second.index(), 2);
    let third = second.next_match();
    assert!(!third.success());
    assert!(!third.next_match().success());
}

#[test]
fn next_match_until_narrows_the_search_bound() {
    let body = [
        bare(Opcode::Nop),
        bare(Opcode::Ret),
        bare(Opcode::Nop),
        bare(Opcode::Nop),
    ];
    let first = find("<op nop>", &body);
    assert_eq!((first.index(), first.end()), (0, 1));

    // Room for the nop at index 2 under a bound of 3.
    let bounded = first.next_match_until(3);
    assert!(bounded.success());
    assert_eq!((bounded.index(), bounded.end()), (2, 3));

    // A bound of 2 leaves only the ret at index 1 in range.
    assert!(!first.next_match_until(2).success());

    // A bound below the resume position fails without searching.
    assert!(!first.next_match_until(0).success());

    // Bounds beyond the original search range are clamped back to it.
    let clamped = first.next_match_until(99);
    let unbounded = first.next_match();
    assert_eq!(clamped.success(), unbounded.success());
    assert_eq!((clamped.index(), clamped.end()), (unbounded.index(), unbounded.end()));
}

#[test]
fn next_match_until_bound_carries_into_the_chain() {
    let body = [bare(Opcode::Nop), bare(Opcode::Nop), bare(Opcode::Nop)];
    let first = find("<op nop>", &body);
    let second = first.next_match_until(2);
    assert_eq!((second.index(), second.end()), (1, 2));
    // The narrowed bound sticks: the nop at index 2 stays out of reach.
    assert!(!second.next_match().success());
}

#[test]
fn next_match_advances_past_zero_length_matches() {
    let body = [bare(Opcode::Nop), bare(Opcode::Nop)];
    let first = find("<op ldarg.0>?", &body);
    assert!(first.success());
    assert_eq!((first.index(), first.length()), (0, 0));
    let second = first.next_match();
    assert!(second.success());
    assert_eq!(second.index(), 1);
}

#[test]
fn find_iter_collects_non_overlapping_matches() {
    let body = [
        bare(Opcode::Nop),
        bare(Opcode::Nop),
        bare(Opcode::Ret),
        bare(Opcode::Nop),
    ];
    let re = regex("<op nop>+");
    let spans: Vec<(usize, usize)> = re
        .find_iter(&body)
        .map(|m| (m.index(), m.end()))
        .collect();
    assert_eq!(spans, vec![(0, 2), (3, 4)]);
}

#[test]
fn matching_is_deterministic() {
    let body = [bare(Opcode::Nop), bare(Opcode::Nop), bare(Opcode::Ret)];
    let re = regex("(?'g' <op nop>+) <op ret>");
    let a = re.find(&body);
    let b = re.find(&body);
    assert_eq!(a.success(), b.success());
    assert_eq!((a.index(), a.end()), (b.index(), b.end()));
    assert_eq!(a.group_named("g"), b.group_named("g"));
}

#[test]
fn match_invariants_hold() {
    let body = [bare(Opcode::Nop), bare(Opcode::Ret)];
    for pattern in ["<op nop>", "<op nop>* <op ret>", "(<op nop>|)", "."] {
        let m = find(pattern, &body);
        assert!(m.end() >= m.index(), "pattern {pattern:?}");
        assert_eq!(m.length(), m.end() - m.index(), "pattern {pattern:?}");
        for g in m.groups() {
            if g.success() {
                assert!(g.start() <= g.end());
                assert!(g.end() <= body.len());
            }
        }
    }
}

// ============================================================
// Ranges and usage errors
// ============================================================

#[test]
fn search_confined_to_range() {
    let body = [bare(Opcode::Nop), bare(Opcode::Nop), bare(Opcode::Nop)];
    let re = regex("<op nop>+");
    let m = re.find_with(&body, None, None, 1, 2).unwrap();
    assert!(m.success());
    assert_eq!((m.index(), m.end()), (1, 2));
}

#[test]
fn range_errors() {
    let body = [bare(Opcode::Nop)];
    let re = regex("<op nop>");
    assert_eq!(
        re.find_with(&body, None, None, 5, 1).unwrap_err(),
        UsageError::StartOutOfRange { start: 5, len: 1 }
    );
    assert_eq!(
        re.find_with(&body, None, None, 0, 9).unwrap_err(),
        UsageError::EndOutOfRange { end: 9, len: 1 }
    );
    assert_eq!(
        re.find_with(&body, None, None, 1, 0).unwrap_err(),
        UsageError::InvertedRange { start: 1, end: 0 }
    );
}

#[test]
fn empty_pattern_matches_empty_input() {
    let m = find("", &[]);
    assert!(m.success());
    assert_eq!((m.index(), m.length()), (0, 0));
}

#[test]
fn match_can_end_at_the_array_end() {
    let body = [bare(Opcode::Ret)];
    let m = find("<op ret> <op nop>?", &body);
    assert!(m.success());
    assert_eq!(m.end(), 1);
}

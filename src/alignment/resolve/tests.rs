use super::interpolation::fill_unresolved;
use super::monotonic::enforce_increasing;
use super::{resolve_lines, LineEvidence, ResolveParams};
use crate::error::AlignmentError;
use crate::types::{LineStatus, LyricLine, Token};

const PARAMS: ResolveParams = ResolveParams {
    monotonic_epsilon_s: 0.001,
    default_line_spacing_s: 3.0,
};

fn make_line(index: usize, text: &str) -> LyricLine {
    LyricLine::new(index, text, vec![text.to_string()])
}

fn anchored(index: usize, text: &str, t: f64) -> LyricLine {
    let mut line = make_line(index, text);
    line.assigned_start_time = Some(t);
    line.status = LineStatus::Matched;
    line
}

fn times(lines: &[LyricLine]) -> Vec<f64> {
    lines
        .iter()
        .map(|l| l.assigned_start_time.expect("every line timed"))
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn gap_between_anchors_splits_at_midpoint_for_equal_lines() {
    let mut lines = vec![anchored(0, "A", 0.0), make_line(1, "B"), anchored(2, "C", 9.0)];
    let timed = fill_unresolved(&mut lines, 3.0);
    assert_eq!(timed, vec![1]);
    assert_eq!(lines[1].status, LineStatus::Interpolated);
    assert_close(lines[1].assigned_start_time.unwrap(), 4.5);
}

#[test]
fn gap_is_weighted_by_character_count() {
    // "long line" (9 chars) precedes the unresolved line, "x" (1 char) is it.
    let mut lines = vec![
        anchored(0, "long line", 10.0),
        make_line(1, "x"),
        anchored(2, "end", 20.0),
    ];
    fill_unresolved(&mut lines, 3.0);
    assert_close(lines[1].assigned_start_time.unwrap(), 10.0 + 10.0 * 9.0 / 10.0);
}

#[test]
fn run_of_unresolved_lines_is_spread_in_order() {
    let mut lines = vec![
        anchored(0, "aa", 0.0),
        make_line(1, "bb"),
        make_line(2, "cc"),
        make_line(3, "dd"),
        anchored(4, "ee", 8.0),
    ];
    fill_unresolved(&mut lines, 3.0);
    let t = times(&lines);
    assert_close(t[1], 2.0);
    assert_close(t[2], 4.0);
    assert_close(t[3], 6.0);
}

#[test]
fn trailing_lines_extrapolate_last_spacing() {
    let mut lines = vec![
        anchored(0, "a", 10.0),
        anchored(1, "b", 14.0),
        make_line(2, "c"),
        make_line(3, "d"),
    ];
    let timed = fill_unresolved(&mut lines, 3.0);
    assert_eq!(timed, vec![2, 3]);
    let t = times(&lines);
    assert_close(t[2], 18.0);
    assert_close(t[3], 22.0);
}

#[test]
fn leading_lines_step_back_and_clamp_at_zero() {
    let mut lines = vec![
        make_line(0, "a"),
        make_line(1, "b"),
        anchored(2, "c", 3.0),
        anchored(3, "d", 5.0),
    ];
    fill_unresolved(&mut lines, 3.0);
    let t = times(&lines);
    assert_close(t[1], 1.0);
    assert_close(t[0], 0.0);
}

#[test]
fn single_anchor_uses_default_spacing() {
    let mut lines = vec![make_line(0, "a"), anchored(1, "b", 10.0), make_line(2, "c")];
    fill_unresolved(&mut lines, 3.0);
    let t = times(&lines);
    assert_close(t[0], 7.0);
    assert_close(t[2], 13.0);
}

#[test]
fn no_anchor_leaves_lines_untouched() {
    let mut lines = vec![make_line(0, "a"), make_line(1, "b")];
    assert!(fill_unresolved(&mut lines, 3.0).is_empty());
    assert!(lines.iter().all(|l| l.status == LineStatus::Unresolved));
}

#[test]
fn monotonic_pass_raises_ties_and_inversions() {
    let mut lines = vec![
        anchored(0, "a", 5.0),
        anchored(1, "b", 5.0),
        anchored(2, "c", 4.0),
        anchored(3, "d", 9.0),
    ];
    let raised = enforce_increasing(&mut lines, 0.001);
    assert_eq!(raised, 2);
    let t = times(&lines);
    assert_close(t[1], 5.001);
    assert_close(t[2], 5.002);
    assert_close(t[3], 9.0);
}

fn evidence_tokens() -> Vec<Token> {
    vec![
        Token::new("la", 10.0, 10.4, 0.9),
        Token::new("la", 10.5, 11.0, 0.9),
        Token::new("bridge", 25.0, 26.0, 0.9),
    ]
}

#[test]
fn first_matched_unit_sets_line_start_and_last_sets_end() {
    let tokens = evidence_tokens();
    let mut lines = vec![
        LyricLine::new(0, "la la", vec!["la".into(), "la".into()]),
        LyricLine::new(2, "bridge", vec!["bridge".into()]),
    ];
    let evidence = LineEvidence {
        tokens: &tokens,
        recognized_owners: &[0, 1, 2],
        lyric_owners: &[0, 0, 1],
        lyric_matches: &[Some(0), Some(1), Some(2)],
    };
    let report = resolve_lines(&mut lines, &evidence, &PARAMS).unwrap();
    assert_eq!(report.matched_lines, 2);
    assert!(report.interpolated_lines.is_empty());
    assert_eq!(lines[0].assigned_start_time, Some(10.0));
    assert_eq!(lines[0].assigned_end_time, Some(11.0));
    assert_eq!(lines[1].assigned_start_time, Some(25.0));
    assert!(lines.iter().all(|l| l.status == LineStatus::Matched));
}

#[test]
fn skipped_first_unit_uses_next_matched_unit() {
    let tokens = evidence_tokens();
    let mut lines = vec![LyricLine::new(0, "oh la", vec!["oh".into(), "la".into()])];
    let evidence = LineEvidence {
        tokens: &tokens,
        recognized_owners: &[0, 1, 2],
        lyric_owners: &[0, 0],
        lyric_matches: &[None, Some(1)],
    };
    resolve_lines(&mut lines, &evidence, &PARAMS).unwrap();
    assert_eq!(lines[0].assigned_start_time, Some(10.5));
}

#[test]
fn unmatched_line_is_reported_as_interpolated() {
    let tokens = evidence_tokens();
    let mut lines = vec![
        LyricLine::new(0, "la", vec!["la".into()]),
        LyricLine::new(1, "zz", vec!["zz".into()]),
        LyricLine::new(3, "bridge", vec!["bridge".into()]),
    ];
    let evidence = LineEvidence {
        tokens: &tokens,
        recognized_owners: &[0, 1, 2],
        lyric_owners: &[0, 1, 2],
        lyric_matches: &[Some(0), None, Some(2)],
    };
    let report = resolve_lines(&mut lines, &evidence, &PARAMS).unwrap();
    assert_eq!(report.interpolated_lines, vec![1]);
    assert_eq!(lines[1].status, LineStatus::Interpolated);
    let t = times(&lines);
    assert!(t[0] < t[1] && t[1] < t[2]);
}

#[test]
fn no_match_at_all_is_degenerate() {
    let tokens = evidence_tokens();
    let mut lines = vec![LyricLine::new(0, "zz", vec!["zz".into()])];
    let evidence = LineEvidence {
        tokens: &tokens,
        recognized_owners: &[0, 1, 2],
        lyric_owners: &[0],
        lyric_matches: &[None],
    };
    let err = resolve_lines(&mut lines, &evidence, &PARAMS).unwrap_err();
    assert!(matches!(err, AlignmentError::AlignmentDegenerate { .. }));
}

#[test]
fn out_of_range_recognized_unit_is_invalid_input() {
    let tokens = evidence_tokens();
    let mut lines = vec![LyricLine::new(0, "la", vec!["la".into()])];
    let evidence = LineEvidence {
        tokens: &tokens,
        recognized_owners: &[0, 1, 2],
        lyric_owners: &[0],
        lyric_matches: &[Some(7)],
    };
    let err = resolve_lines(&mut lines, &evidence, &PARAMS).unwrap_err();
    assert!(matches!(err, AlignmentError::InvalidInput { .. }));
}

#[test]
fn lyric_unit_without_line_is_invalid_input() {
    let tokens = evidence_tokens();
    let mut lines = vec![LyricLine::new(0, "la", vec!["la".into()])];
    let evidence = LineEvidence {
        tokens: &tokens,
        recognized_owners: &[0, 1, 2],
        lyric_owners: &[4],
        lyric_matches: &[Some(0)],
    };
    let err = resolve_lines(&mut lines, &evidence, &PARAMS).unwrap_err();
    assert!(matches!(err, AlignmentError::InvalidInput { .. }));
}

#[test]
fn extrapolation_past_f64_range_is_invalid_input() {
    let tokens = vec![
        Token::new("a", 0.0, 0.5, 0.9),
        Token::new("b", 1e308, 1e308, 0.9),
    ];
    let mut lines = vec![
        make_line(0, "a"),
        make_line(1, "b"),
        make_line(2, "c"),
        make_line(3, "d"),
    ];
    let evidence = LineEvidence {
        tokens: &tokens,
        recognized_owners: &[0, 1],
        lyric_owners: &[0, 1, 2, 3],
        lyric_matches: &[Some(0), Some(1), None, None],
    };
    let err = resolve_lines(&mut lines, &evidence, &PARAMS).unwrap_err();
    assert!(matches!(err, AlignmentError::InvalidInput { .. }));
}

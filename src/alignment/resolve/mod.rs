use crate::error::AlignmentError;
use crate::types::{LineStatus, LyricLine, Token};

mod interpolation;
mod monotonic;
#[cfg(test)]
mod tests;

/// Token-level alignment result as seen by the line resolver.
#[derive(Debug, Clone, Copy)]
pub struct LineEvidence<'a> {
    pub tokens: &'a [Token],
    /// Token index owning each recognized unit.
    pub recognized_owners: &'a [usize],
    /// Line slot owning each lyric unit.
    pub lyric_owners: &'a [usize],
    /// Recognized unit matched to each lyric unit, if any.
    pub lyric_matches: &'a [Option<usize>],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveParams {
    pub monotonic_epsilon_s: f64,
    pub default_line_spacing_s: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub matched_lines: usize,
    /// Transcript indices of lines timed by interpolation or extrapolation.
    pub interpolated_lines: Vec<usize>,
    /// Lines whose time was raised to keep the sequence strictly increasing.
    pub raised_lines: usize,
}

/// Assigns a start time and status to every line.
///
/// Fails with `AlignmentDegenerate` when no line has a single matched unit:
/// there is nothing to interpolate from. Fails with `InvalidInput` when the
/// evidence points outside `lines` or the tokens, or when extrapolation runs
/// past the range of `f64`.
pub fn resolve_lines(
    lines: &mut [LyricLine],
    evidence: &LineEvidence<'_>,
    params: &ResolveParams,
) -> Result<ResolveReport, AlignmentError> {
    for line in lines.iter_mut() {
        line.assigned_start_time = None;
        line.assigned_end_time = None;
        line.status = LineStatus::Unresolved;
    }

    let mut matched_lines = 0usize;
    for (unit, matched) in evidence.lyric_matches.iter().enumerate() {
        let Some(recognized) = *matched else {
            continue;
        };
        let token = evidence
            .recognized_owners
            .get(recognized)
            .and_then(|&owner| evidence.tokens.get(owner))
            .ok_or_else(|| {
                AlignmentError::invalid_input(format!(
                    "lyric unit {unit} is matched to recognized unit {recognized}, which has no token"
                ))
            })?;
        let line = match evidence.lyric_owners.get(unit) {
            Some(&slot) => lines.get_mut(slot),
            None => None,
        };
        let Some(line) = line else {
            return Err(AlignmentError::invalid_input(format!(
                "lyric unit {unit} belongs to no line"
            )));
        };
        if line.status != LineStatus::Matched {
            line.status = LineStatus::Matched;
            line.assigned_start_time = Some(token.start_time);
            matched_lines += 1;
        }
        // Units arrive in order, so the last write is the last matched token.
        line.assigned_end_time = Some(token.end_time);
    }

    if matched_lines == 0 {
        return Err(AlignmentError::degenerate(format!(
            "none of {} lyric lines matched a recognized token",
            lines.len()
        )));
    }

    let interpolated_lines = interpolation::fill_unresolved(lines, params.default_line_spacing_s);
    if let Some(line) = lines
        .iter()
        .find(|l| !l.assigned_start_time.is_some_and(f64::is_finite))
    {
        return Err(AlignmentError::invalid_input(format!(
            "line {} extrapolates to a start time outside the representable range",
            line.index
        )));
    }
    if !interpolated_lines.is_empty() {
        tracing::warn!(
            interpolated = interpolated_lines.len(),
            matched = matched_lines,
            "resolver: partial match, some line times were interpolated"
        );
    }
    let raised_lines = monotonic::enforce_increasing(lines, params.monotonic_epsilon_s);

    Ok(ResolveReport {
        matched_lines,
        interpolated_lines,
        raised_lines,
    })
}

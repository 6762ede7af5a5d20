/// Human-readable notice for a truncated transcript.
///
/// The percentage always has exactly one decimal place and a `.` separator.
pub fn truncation_notice(submitted_tokens: usize, original_tokens: usize) -> String {
    let percent = if original_tokens == 0 {
        100.0
    } else {
        submitted_tokens as f64 / original_tokens as f64 * 100.0
    };

    format!(
        "The transcript was too long to summarize in full, so only the first {} of the original {} tokens were submitted ({:.1}%).",
        submitted_tokens, original_tokens, percent
    )
}

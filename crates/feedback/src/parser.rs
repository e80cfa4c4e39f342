use regex::Regex;

use crate::schema::Feedback;
use anyhow::Result;

/// Sentinel returned when a labeled section cannot be recovered.
pub const NO_FEEDBACK: &str = "No feedback available";

/// Sentinel entry returned when no suggestions can be recovered.
pub const NO_SUGGESTIONS: &str = "No specific suggestions available";

/// Best-effort single-line value for a labeled section (Tone, Clarity, Content).
/// Tries three patterns in order, first match wins; label matching is
/// case-insensitive and only the first occurrence in the text is used.
pub fn extract_section(text: &str, label: &str) -> String {
    // "Tone: Confident and clear" - label and value on the same line
    let with_colon = Regex::new(&format!(r"(?i){}:\s*([^\n]+)", label)).unwrap();
    if let Some(caps) = with_colon.captures(text) {
        return caps[1].trim().to_string();
    }

    // Label line followed by the value on the next line (list-style sections)
    let next_line = Regex::new(&format!(r"(?i){}[^\n]*\n([^\n]+)", label)).unwrap();
    if let Some(caps) = next_line.captures(text) {
        return caps[1].trim().to_string();
    }

    // Any run of text after the label
    let anywhere = Regex::new(&format!(r"(?i){}([^\n]+)", label)).unwrap();
    if let Some(caps) = anywhere.captures(text) {
        return caps[1].trim().to_string();
    }

    NO_FEEDBACK.to_string()
}

/// Extract suggestion strings from the full reply.
/// Tier 1 reads a labeled "Suggestions:" block; tier 2 falls back to scanning
/// the whole text for dash, bullet, or numbered list markers. Exact duplicates
/// are dropped, first-appearance order is kept.
pub fn extract_suggestions(text: &str) -> Vec<String> {
    let mut suggestions = Vec::new();

    // "Suggestions:" block extending to the next blank line or end of text
    let block_re = Regex::new(r"(?is)suggestions:(.*?)(?:\n\s*\n|\z)").unwrap();
    if let Some(caps) = block_re.captures(text) {
        let block = caps.get(1).map(|m| m.as_str()).unwrap_or("");

        // Split at the start of each bullet line, keeping multi-line segments
        let marker = Regex::new(r"(?m)^\s*[-•]").unwrap();
        let starts: Vec<usize> = marker.find_iter(block).map(|m| m.start()).collect();

        let mut segments: Vec<&str> = Vec::new();
        if starts.is_empty() {
            segments.push(block);
        } else {
            if starts[0] > 0 {
                segments.push(&block[..starts[0]]);
            }
            for (i, &start) in starts.iter().enumerate() {
                let end = starts.get(i + 1).copied().unwrap_or(block.len());
                segments.push(&block[start..end]);
            }
        }

        let bold = Regex::new(r"\*\*").unwrap();
        let leading_marker = Regex::new(r"^\s*[-•]\s*").unwrap();

        for segment in segments {
            if segment.trim().is_empty() {
                continue;
            }
            let cleaned = bold.replace_all(segment, "");
            let cleaned = leading_marker.replace(&cleaned, "");
            let cleaned = cleaned.trim().to_string();

            if !cleaned.is_empty() && !suggestions.contains(&cleaned) {
                suggestions.push(cleaned);
            }
        }
    }

    // No labeled block: scan the whole text, one marker style at a time
    if suggestions.is_empty() {
        let rules = [
            ("- ", r"\n\s*-|\n\n"),
            ("• ", r"\n\s*•|\n\n"),
            (r"\d+\. ", r"\n\s*\d+\.|\n\n"),
        ];

        for (marker, stop) in rules {
            let spans = collect_marked_spans(
                text,
                &Regex::new(marker).unwrap(),
                &Regex::new(stop).unwrap(),
            );
            if !spans.is_empty() {
                suggestions = spans;
                break;
            }
        }
    }

    if suggestions.is_empty() {
        suggestions.push(NO_SUGGESTIONS.to_string());
    }

    suggestions
}

/// Collect the spans following each marker occurrence. A span runs from the
/// end of its marker to the next stop match (following marker or blank line)
/// or the end of the text.
fn collect_marked_spans(text: &str, marker: &Regex, stop: &Regex) -> Vec<String> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(m) = marker.find_at(text, pos) {
        let start = m.end();
        let rest = &text[start..];
        let end = stop.find(rest).map(|s| s.start()).unwrap_or(rest.len());

        let span = rest[..end].trim().to_string();
        if !span.is_empty() && !spans.contains(&span) {
            spans.push(span);
        }

        pos = start + end;
    }

    spans
}

/// Parse a model reply into a `Feedback` record.
/// Unmatched fields degrade to sentinels; a literal `[` in any of the three
/// section values means the model echoed an unfilled template placeholder,
/// which is an error the caller must not persist. Known limitation: this
/// check also rejects legitimate feedback that happens to contain a bracket.
pub fn parse_feedback(text: &str) -> Result<Feedback> {
    let feedback = Feedback {
        tone: extract_section(text, "Tone"),
        clarity: extract_section(text, "Clarity"),
        content: extract_section(text, "Content"),
        suggestions: extract_suggestions(text),
    };

    if feedback.tone.contains('[')
        || feedback.clarity.contains('[')
        || feedback.content.contains('[')
    {
        anyhow::bail!("model reply contains unfilled template placeholders");
    }

    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
Tone: Confident and clear
Clarity: Well structured answer
Content: Relevant examples throughout
Suggestions:
- Slow down at the start
- Quantify your achievements
- End with a question

Good luck with the next round.";

    #[test]
    fn test_section_with_colon() {
        assert_eq!(
            extract_section(WELL_FORMED, "Tone"),
            "Confident and clear"
        );
        assert_eq!(
            extract_section(WELL_FORMED, "Clarity"),
            "Well structured answer"
        );
    }

    #[test]
    fn test_section_label_is_case_insensitive() {
        let text = "tone: steady delivery";
        assert_eq!(extract_section(text, "Tone"), "steady delivery");
    }

    #[test]
    fn test_section_value_on_next_line() {
        let text = "Tone\nConfident delivery overall";
        assert_eq!(extract_section(text, "Tone"), "Confident delivery overall");
    }

    #[test]
    fn test_section_missing_returns_sentinel() {
        assert_eq!(extract_section("nothing relevant here", "Tone"), NO_FEEDBACK);
    }

    #[test]
    fn test_section_uses_first_occurrence_only() {
        let text = "Tone: first value\nTone: second value";
        assert_eq!(extract_section(text, "Tone"), "first value");
    }

    #[test]
    fn test_suggestions_block_in_order_with_markers_stripped() {
        let suggestions = extract_suggestions(WELL_FORMED);
        assert_eq!(
            suggestions,
            vec![
                "Slow down at the start",
                "Quantify your achievements",
                "End with a question",
            ]
        );
    }

    #[test]
    fn test_suggestions_strip_bold_markers() {
        let text = "Suggestions:\n- **Practice** your opening\n- Keep **eye contact**";
        assert_eq!(
            extract_suggestions(text),
            vec!["Practice your opening", "Keep eye contact"]
        );
    }

    #[test]
    fn test_suggestions_exclude_duplicates() {
        let text = "Suggestions:\n- Breathe\n- Breathe\n- Smile";
        assert_eq!(extract_suggestions(text), vec!["Breathe", "Smile"]);
    }

    #[test]
    fn test_suggestions_bullet_fallback_without_label() {
        let text = "Things to work on:\n• Speak slower\n• Use concrete numbers";
        assert_eq!(
            extract_suggestions(text),
            vec!["Speak slower", "Use concrete numbers"]
        );
    }

    #[test]
    fn test_suggestions_numbered_fallback() {
        let text = "1. Open with a summary\n2. Close with impact";
        assert_eq!(
            extract_suggestions(text),
            vec!["Open with a summary", "Close with impact"]
        );
    }

    #[test]
    fn test_suggestions_sentinel_when_nothing_matches() {
        assert_eq!(
            extract_suggestions("free-form prose with no list markers"),
            vec![NO_SUGGESTIONS]
        );
    }

    #[test]
    fn test_parse_feedback_well_formed() {
        let feedback = parse_feedback(WELL_FORMED).unwrap();
        assert_eq!(feedback.tone, "Confident and clear");
        assert_eq!(feedback.clarity, "Well structured answer");
        assert_eq!(feedback.content, "Relevant examples throughout");
        assert_eq!(feedback.suggestions.len(), 3);
    }

    #[test]
    fn test_parse_feedback_degrades_to_sentinels() {
        let feedback = parse_feedback("unstructured prose").unwrap();
        assert_eq!(feedback.tone, NO_FEEDBACK);
        assert_eq!(feedback.clarity, NO_FEEDBACK);
        assert_eq!(feedback.content, NO_FEEDBACK);
        assert_eq!(feedback.suggestions, vec![NO_SUGGESTIONS]);
    }

    #[test]
    fn test_parse_feedback_rejects_placeholders() {
        let text = "Tone: [placeholder]\nClarity: fine\nContent: fine";
        assert!(parse_feedback(text).is_err());
    }

    #[test]
    fn test_parse_feedback_is_deterministic() {
        let a = parse_feedback(WELL_FORMED).unwrap();
        let b = parse_feedback(WELL_FORMED).unwrap();
        assert_eq!(a, b);
    }
}

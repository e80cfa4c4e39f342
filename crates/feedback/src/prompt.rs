pub fn build_feedback_prompt() -> String {
    r#"You are an expert interview coach analyzing a video response to an interview question.
Please watch the video and provide specific, actionable feedback in the following exact format:

Tone: (Your analysis of the candidate's tone, confidence, and professionalism)
Clarity: (Your analysis of the response's structure and clarity)
Content: (Your analysis of the response's relevance and quality)
Suggestions:
- (First specific suggestion)
- (Second specific suggestion)
- (Third specific suggestion)

Focus on providing concrete, constructive feedback that will help the candidate improve.
Be specific about what was good and what could be improved.
Use complete sentences and avoid placeholders or templates."#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_every_section_the_parser_expects() {
        let prompt = build_feedback_prompt();
        assert!(prompt.contains("Tone:"));
        assert!(prompt.contains("Clarity:"));
        assert!(prompt.contains("Content:"));
        assert!(prompt.contains("Suggestions:"));
    }
}

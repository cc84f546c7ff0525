/// Question label used when the request carries none.
pub const DEFAULT_QUESTION: &str = "Assessment";

/// Builds the instruction prompt for the feedback model.
pub fn build_prompt(question: Option<&str>, model_answer: &str, student_answer: &str) -> String {
    let question = question
        .filter(|q| !q.is_empty())
        .unwrap_or(DEFAULT_QUESTION);

    format!(
        "Evaluate a student's answer and provide brief constructive feedback.\n\
         \n\
         Question: {question}\n\
         Model Answer: {model_answer}\n\
         Student Answer: {student_answer}\n\
         \n\
         Provide feedback that:\n\
         1. Acknowledges what the student got right\n\
         2. Points out what's missing or incorrect\n\
         3. Suggests how to improve\n\
         \n\
         Keep feedback concise (2-3 sentences max)."
    )
}

use crate::record::ResultRecord;

/// Builds the decomposition prompt for a research question.
pub fn build_decompose_prompt(query: &str, structure_hint: Option<&str>) -> String {
    let mut prompt = format!(
        r#"Break the following open research question into 4-8 focused sub-questions suitable for web research. Output JSON array of objects with 'id' and 'task'.

Research question: {query}
"#
    );
    if let Some(hint) = structure_hint {
        prompt.push_str(&format!("\nDesired final structure: {hint}\n"));
    }
    prompt
}

/// Builds the single-word fact/opinion classification prompt.
pub fn build_classify_prompt(text: &str) -> String {
    format!(
        r#"Classify the following sentence as FACT or OPINION. Sentence: "{text}". Answer FACT or OPINION only."#
    )
}

/// Builds the per-task summary prompt from the task's top sources.
pub fn build_summary_prompt(question: &str, sources: &[ResultRecord]) -> String {
    let listing = sources
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {} - {}", i + 1, r.title, r.url))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Summarize the main findings for the sub-question: \"{question}\". \
         Use the following sources:\n{listing}\n\
         Provide 3 concise bullets and mention any contradictions or uncertainties."
    )
}

/// Builds the final synthesis prompt over all task summaries.
///
/// `summaries` pairs each sub-question with its (already truncated) summary.
pub fn build_synthesis_prompt(query: &str, summaries: &[(&str, &str)]) -> String {
    let sections = summaries
        .iter()
        .enumerate()
        .map(|(i, (question, summary))| format!("### {}. {}\n{}", i + 1, question, summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "## Task-level summaries\n\n{sections}\n\n\
         Using the above task-level summaries, produce a concise research brief for the research question: \"{query}\". \
         Include: short conclusion (2-3 sentences), contradictions/uncertainties list, and short recommendations if any. \
         Do not invent citations; reference only by cite:id."
    )
}

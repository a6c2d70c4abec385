//! Prompt templates for generative inference backends

/// Prompt builder for extractive question answering
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build a prompt that asks for a short answer copied from the context
    pub fn build_extractive_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You answer questions using ONLY the document text below.

RULES:
1. Answer with the shortest span of the document that answers the question
2. Copy the wording from the document; do not paraphrase
3. If the document does not contain the answer, respond with an empty line
4. Do not add explanations, citations, or external knowledge

DOCUMENT:
{context}

QUESTION: {question}

ANSWER:"#,
            context = context,
            question = question
        )
    }
}

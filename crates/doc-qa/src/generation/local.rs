//! Deterministic lexical answering used when remote inference is unavailable

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

use super::sanitize::truncate_at_word;
use crate::types::{Answer, QuestionType};

/// Words that carry no signal for sentence matching
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "am", "do", "does",
        "did", "has", "have", "had", "of", "in", "on", "at", "to", "for", "from", "by", "with",
        "about", "into", "and", "or", "but", "not", "no", "it", "its", "this", "that", "these",
        "those", "there", "their", "they", "them", "he", "she", "his", "her", "we", "you", "your",
        "i", "me", "my", "our", "can", "could", "would", "should", "will", "shall", "may",
        "might", "must", "which", "what", "how", "why", "when", "where", "who", "whom", "whose",
        "if", "then", "than", "so", "as", "any", "some", "all", "tell", "please", "document",
    ]
    .into_iter()
    .collect()
});

/// Lower-case alphanumeric word tokens
fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|w| w.trim_matches('\'').to_lowercase())
        .filter(|w| !w.is_empty())
}

/// Split on sentence terminators, dropping empty candidates
pub fn split_sentences(context: &str) -> Vec<&str> {
    context
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Distinct content words of a question, excluding its leading interrogative
pub fn extract_keywords(question: &str, question_type: QuestionType) -> BTreeSet<String> {
    let interrogative = question_type.interrogative();
    words(question)
        .filter(|w| !STOP_WORDS.contains(w.as_str()))
        .filter(|w| Some(w.as_str()) != interrogative)
        .collect()
}

/// Number of keywords appearing as whole words in the sentence
pub fn score_sentence(sentence: &str, keywords: &BTreeSet<String>) -> u32 {
    let sentence_words: HashSet<String> = words(sentence).collect();
    keywords
        .iter()
        .filter(|k| sentence_words.contains(k.as_str()))
        .count() as u32
}

/// Lexical-overlap answerer
#[derive(Debug, Clone)]
pub struct LocalAnswerer {
    max_sentence_chars: usize,
}

impl LocalAnswerer {
    pub fn new(max_sentence_chars: usize) -> Self {
        Self { max_sentence_chars }
    }

    /// Pick the sentence with the most keyword overlap and phrase it by question type
    ///
    /// Inputs are expected to be sanitized and non-empty.
    pub fn answer(&self, question: &str, context: &str) -> Answer {
        let question_type = QuestionType::classify(question);
        let keywords = extract_keywords(question, question_type);

        let mut best: Option<(u32, &str)> = None;
        for sentence in split_sentences(context) {
            let score = score_sentence(sentence, &keywords);
            // Strict comparison keeps the earliest sentence on ties
            if score > 0 && best.map_or(true, |(top, _)| score > top) {
                best = Some((score, sentence));
            }
        }

        match best {
            Some((score, sentence)) => {
                tracing::debug!(
                    "Local answer: {:?} question, {} keywords, best score {}",
                    question_type,
                    keywords.len(),
                    score
                );
                let sentence = truncate_at_word(sentence, self.max_sentence_chars);
                Answer::local(format!("{}{}", lead_in(question_type), sentence), score)
            }
            None => {
                tracing::debug!("Local answer: no sentence overlaps the question");
                Answer::local(no_answer(question_type), 0)
            }
        }
    }
}

impl Default for LocalAnswerer {
    fn default() -> Self {
        Self::new(300)
    }
}

fn lead_in(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::What => "According to the document: ",
        QuestionType::How => "The process described is: ",
        QuestionType::Why => "The explanation provided is: ",
        QuestionType::When | QuestionType::Where | QuestionType::Who => "Based on the document: ",
        QuestionType::Generic => "From the document: ",
    }
}

fn no_answer(question_type: QuestionType) -> String {
    let hint = match question_type {
        QuestionType::What => "Try naming the specific term or topic you want defined.",
        QuestionType::How => "Try asking about a specific step or procedure in the text.",
        QuestionType::Why => "The document may not state a reason for this.",
        QuestionType::When => "The document may not mention a date or time for this.",
        QuestionType::Where => "The document may not mention a location for this.",
        QuestionType::Who => "The document may not name a person for this.",
        QuestionType::Generic => "Try rephrasing the question using words from the document.",
    };
    format!("No direct answer was found in the document. {}", hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnswerSource;

    const SKY: &str = "The sky is blue. The grass is green.";

    #[test]
    fn test_picks_overlapping_sentence() {
        let answer = LocalAnswerer::default().answer("What color is the sky?", SKY);
        assert_eq!(answer.source, AnswerSource::Local);
        assert_eq!(answer.score, Some(1));
        assert_eq!(answer.text, "According to the document: The sky is blue");
        assert!(answer.text.contains("sky is blue"));
    }

    #[test]
    fn test_zero_overlap_uses_template() {
        let answer = LocalAnswerer::default().answer("Who invented the telephone?", SKY);
        assert_eq!(answer.score, Some(0));
        assert!(answer.text.starts_with("No direct answer was found"));
        assert!(answer.text.contains("person"));
    }

    #[test]
    fn test_no_sentences_uses_template() {
        let answer = LocalAnswerer::default().answer("Why?", "...!?");
        assert!(answer.text.starts_with("No direct answer was found"));
    }

    #[test]
    fn test_ties_go_to_earliest_sentence() {
        let context = "Cats chase mice. Dogs chase cats. Mice chase cheese.";
        let answer = LocalAnswerer::default().answer("chase", context);
        assert_eq!(answer.text, "From the document: Cats chase mice");
    }

    #[test]
    fn test_higher_score_wins() {
        let context = "Rust is fast. Rust has a borrow checker that enforces memory safety.";
        let answer = LocalAnswerer::default().answer("How does Rust enforce memory safety?", context);
        assert_eq!(answer.score, Some(3));
        assert!(answer.text.starts_with("The process described is: Rust has a borrow checker"));
    }

    #[test]
    fn test_whole_word_matching() {
        assert_eq!(split_sentences("One. Two!  Three? "), vec!["One", "Two", "Three"]);

        let keywords = extract_keywords("What is the cat doing?", QuestionType::What);
        assert!(keywords.contains("cat"));
        assert!(!keywords.contains("what"));
        assert_eq!(score_sentence("The category is wide", &keywords), 0);
        assert_eq!(score_sentence("The CAT sleeps", &keywords), 1);
    }

    #[test]
    fn test_duplicate_keywords_count_once() {
        let keywords = extract_keywords("sky sky SKY blue", QuestionType::Generic);
        assert_eq!(keywords.len(), 2);
        assert_eq!(score_sentence("The sky is blue", &keywords), 2);
    }

    #[test]
    fn test_long_sentence_is_capped() {
        let sentence = format!("The report {}", "covers many topics ".repeat(40));
        let answer = LocalAnswerer::new(50).answer("What does the report cover?", &sentence);
        let body = answer.text.trim_start_matches("According to the document: ");
        assert!(body.ends_with("..."));
        assert!(body.chars().count() <= 53);
    }

    #[test]
    fn test_deterministic() {
        let answerer = LocalAnswerer::default();
        let first = answerer.answer("What color is the grass?", SKY);
        let second = answerer.answer("What color is the grass?", SKY);
        assert_eq!(first, second);
    }
}

//! Answer types

use serde::{Deserialize, Serialize};

/// Which strategy produced an answer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Remote inference service
    Remote,
    /// Local lexical heuristic
    Local,
}

/// An answer to one question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Answer {
    /// Sanitized answer text
    pub text: String,
    /// Strategy that produced the text
    pub source: AnswerSource,
    /// Keyword overlap of the chosen sentence (local answers only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl Answer {
    /// Create a remote answer
    pub fn remote(text: String) -> Self {
        Self {
            text,
            source: AnswerSource::Remote,
            score: None,
        }
    }

    /// Create a local answer with its overlap score
    pub fn local(text: String, score: u32) -> Self {
        Self {
            text,
            source: AnswerSource::Local,
            score: Some(score),
        }
    }
}

/// Question category derived from the leading token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    What,
    How,
    Why,
    When,
    Where,
    Who,
    Generic,
}

impl QuestionType {
    /// Classify a question by its first word, case-insensitive
    pub fn classify(question: &str) -> Self {
        let leading = question
            .split_whitespace()
            .next()
            .map(|token| {
                token
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .unwrap_or_default();

        Self::from_token(&leading).unwrap_or(Self::Generic)
    }

    /// Map an interrogative word to its type
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "what" => Some(Self::What),
            "how" => Some(Self::How),
            "why" => Some(Self::Why),
            "when" => Some(Self::When),
            "where" => Some(Self::Where),
            "who" => Some(Self::Who),
            _ => None,
        }
    }

    /// The interrogative word itself, if any
    pub fn interrogative(&self) -> Option<&'static str> {
        match self {
            Self::What => Some("what"),
            Self::How => Some("how"),
            Self::Why => Some("why"),
            Self::When => Some("when"),
            Self::Where => Some("where"),
            Self::Who => Some("who"),
            Self::Generic => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_leading_token() {
        assert_eq!(QuestionType::classify("What color is the sky?"), QuestionType::What);
        assert_eq!(QuestionType::classify("HOW does it work"), QuestionType::How);
        assert_eq!(QuestionType::classify("  why?"), QuestionType::Why);
        assert_eq!(QuestionType::classify("Who wrote it"), QuestionType::Who);
        assert_eq!(QuestionType::classify("Explain the sky"), QuestionType::Generic);
        assert_eq!(QuestionType::classify("Somewhat what"), QuestionType::Generic);
        assert_eq!(QuestionType::classify(""), QuestionType::Generic);
    }

    #[test]
    fn test_local_answer_carries_score() {
        let answer = Answer::local("text".to_string(), 2);
        assert_eq!(answer.source, AnswerSource::Local);
        assert_eq!(answer.score, Some(2));

        let json = serde_json::to_value(Answer::remote("x".to_string())).unwrap();
        assert!(json.get("score").is_none());
        assert_eq!(json["source"], "remote");
    }
}

//! 文档分析结果
//!
//! 大模型返回的文本必须严格符合 [`DocumentAnalysis`] 结构：未知字段拒绝，
//! 语义规则由 [`DocumentAnalysis::validate`] 检查。这里不做任何 JSON 修复，
//! 只去掉首尾空白和一层 Markdown 代码块包裹。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/analysis.ts")]
pub struct DocumentAnalysis {
    pub title: String,
    pub summary: String,
    pub sentences: Vec<AnalyzedSentence>,
    #[serde(default)]
    pub vocabulary: Vec<VocabularyEntry>,
    #[serde(default)]
    pub questions: Vec<ComprehensionQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/analysis.ts")]
pub struct AnalyzedSentence {
    /// 从 1 开始的序号
    pub index: u32,
    pub text: String,
    pub translation: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/analysis.ts")]
pub struct VocabularyEntry {
    pub word: String,
    pub meaning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export, export_to = "../frontend/src/types/generated/analysis.ts")]
pub struct ComprehensionQuestion {
    pub question: String,
    pub choices: Vec<String>,
    /// choices 中正确答案的下标（从 0 开始）
    pub answer: usize,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// 拒绝原因，会在重试时回传给模型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRejection(pub String);

impl std::fmt::Display for AnalysisRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl DocumentAnalysis {
    pub fn validate(&self) -> Result<(), AnalysisRejection> {
        if self.title.trim().is_empty() {
            return Err(AnalysisRejection("`title` must not be empty".into()));
        }
        if self.summary.trim().is_empty() {
            return Err(AnalysisRejection("`summary` must not be empty".into()));
        }
        if self.sentences.is_empty() {
            return Err(AnalysisRejection(
                "`sentences` must contain at least one sentence".into(),
            ));
        }

        for (pos, sentence) in self.sentences.iter().enumerate() {
            let expected = pos as u32 + 1;
            if sentence.index != expected {
                return Err(AnalysisRejection(format!(
                    "`sentences[{pos}].index` is {}, expected {expected} (indexes must run 1..n in order)",
                    sentence.index
                )));
            }
            if sentence.text.trim().is_empty() {
                return Err(AnalysisRejection(format!(
                    "`sentences[{pos}].text` must not be empty"
                )));
            }
        }

        for (pos, entry) in self.vocabulary.iter().enumerate() {
            if entry.word.trim().is_empty() {
                return Err(AnalysisRejection(format!(
                    "`vocabulary[{pos}].word` must not be empty"
                )));
            }
        }

        for (pos, q) in self.questions.iter().enumerate() {
            if q.question.trim().is_empty() {
                return Err(AnalysisRejection(format!(
                    "`questions[{pos}].question` must not be empty"
                )));
            }
            if q.choices.len() < 2 {
                return Err(AnalysisRejection(format!(
                    "`questions[{pos}].choices` must have at least 2 entries"
                )));
            }
            if q.answer >= q.choices.len() {
                return Err(AnalysisRejection(format!(
                    "`questions[{pos}].answer` is {}, but only {} choices exist (zero-based index)",
                    q.answer,
                    q.choices.len()
                )));
            }
        }

        Ok(())
    }
}

/// 去掉首尾空白和一层 ``` 代码块包裹
pub fn extract_json_text(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // 跳过语言标记（如 ```json）
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// 严格解析并校验模型输出
pub fn parse_analysis(raw: &str) -> Result<DocumentAnalysis, AnalysisRejection> {
    let text = extract_json_text(raw);
    if text.is_empty() {
        return Err(AnalysisRejection("response was empty".into()));
    }
    let analysis: DocumentAnalysis = serde_json::from_str(text)
        .map_err(|e| AnalysisRejection(format!("response is not valid JSON for the schema: {e}")))?;
    analysis.validate()?;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "title": "Climate Notes",
        "summary": "A short passage about rising sea levels.",
        "sentences": [
            {"index": 1, "text": "Sea levels are rising.", "translation": "해수면이 상승하고 있다.", "notes": ["present progressive"]},
            {"index": 2, "text": "Coasts are at risk.", "translation": "해안이 위험하다."}
        ],
        "vocabulary": [{"word": "coast", "meaning": "해안"}],
        "questions": [
            {"question": "What is rising?", "choices": ["Sea levels", "Mountains"], "answer": 0, "explanation": "Sentence 1."}
        ]
    }"#;

    #[test]
    fn test_parse_valid_document() {
        let analysis = parse_analysis(VALID).unwrap();
        assert_eq!(analysis.sentences.len(), 2);
        assert_eq!(analysis.sentences[1].notes, Vec::<String>::new());
        assert_eq!(analysis.questions[0].answer, 0);
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let fenced = format!("  ```json\n{VALID}\n```  ");
        assert!(parse_analysis(&fenced).is_ok());
        let bare = format!("```\n{VALID}\n```");
        assert!(parse_analysis(&bare).is_ok());
    }

    #[test]
    fn test_no_repair_of_malformed_json() {
        // 末尾逗号和截断都不修复
        let trailing = VALID.trim_end().trim_end_matches('}').to_string() + ",}";
        assert!(parse_analysis(&trailing).is_err());
        assert!(parse_analysis(&VALID[..VALID.len() / 2]).is_err());
        assert!(parse_analysis("Here is the analysis: {}").is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let extra = VALID.replacen("\"title\"", "\"mood\": \"calm\", \"title\"", 1);
        let err = parse_analysis(&extra).unwrap_err();
        assert!(err.0.contains("mood"));
    }

    #[test]
    fn test_semantic_rules() {
        let mut analysis = parse_analysis(VALID).unwrap();

        analysis.sentences[1].index = 3;
        assert!(analysis.validate().unwrap_err().0.contains("sentences[1].index"));
        analysis.sentences[1].index = 2;

        analysis.questions[0].answer = 2;
        assert!(analysis.validate().unwrap_err().0.contains("answer"));
        analysis.questions[0].answer = 1;
        assert!(analysis.validate().is_ok());

        analysis.questions[0].choices.truncate(1);
        analysis.questions[0].answer = 0;
        assert!(analysis.validate().unwrap_err().0.contains("at least 2"));

        let mut empty = parse_analysis(VALID).unwrap();
        empty.sentences.clear();
        assert!(empty.validate().is_err());

        let mut untitled = parse_analysis(VALID).unwrap();
        untitled.title = "  ".into();
        assert!(untitled.validate().is_err());
    }

    #[test]
    fn test_empty_response() {
        assert_eq!(
            parse_analysis("   ").unwrap_err(),
            AnalysisRejection("response was empty".into())
        );
    }
}

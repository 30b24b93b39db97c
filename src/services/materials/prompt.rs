//! 文档分析提示词

pub(super) const SYSTEM_PROMPT: &str = r#"You are an English reading instructor preparing study material for Korean learners.
Analyze the document the user provides and reply with a single JSON object and nothing else.

The object must have exactly these fields:
{
  "title": string,                       // short title for the document
  "summary": string,                     // 2-4 sentence summary in Korean
  "sentences": [                         // every sentence of the document, in order
    {"index": 1, "text": string, "translation": string, "notes": [string]}
  ],
  "vocabulary": [{"word": string, "meaning": string}],
  "questions": [                         // comprehension questions
    {"question": string, "choices": [string], "answer": number, "explanation": string}
  ]
}

Rules:
- "index" starts at 1 and increases by one for each sentence.
- "translation", "meaning" and "explanation" are written in Korean.
- Each question has at least 2 choices; "answer" is the zero-based index of the correct choice.
- Do not add any other fields. Do not wrap the JSON in prose."#;

/// 按字符截断，避免在 UTF-8 字符中间切开
pub(super) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub(super) fn user_prompt(content: &str, rejection: Option<&str>) -> String {
    let mut prompt = format!("Document:\n\n{content}");
    if let Some(reason) = rejection {
        prompt.push_str(&format!(
            "\n\nPrevious response was rejected: {reason}\nReturn a corrected JSON object."
        ));
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("안녕하세요", 2), "안녕");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_user_prompt_appends_rejection() {
        assert!(!user_prompt("text", None).contains("rejected"));
        let retry = user_prompt("text", Some("`title` must not be empty"));
        assert!(retry.ends_with("Return a corrected JSON object."));
        assert!(retry.contains("Previous response was rejected: `title` must not be empty"));
    }
}

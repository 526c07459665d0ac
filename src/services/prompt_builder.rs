use crate::constants::quiz_prompt::QUIZ_GENERATION_PROMPT;

pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 3000;

/// Renders the generation prompt. Pure and deterministic.
#[derive(Clone, Debug)]
pub struct PromptBuilder {
    max_context_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTEXT_CHARS)
    }
}

impl PromptBuilder {
    pub fn new(max_context_chars: usize) -> Self {
        Self { max_context_chars }
    }

    pub fn build(&self, topic: &str, difficulty: &str, count: u32, context: &str) -> String {
        let count = count.to_string();
        let difficulty = difficulty.trim().to_uppercase();
        let context = truncate_chars(context, self.max_context_chars);

        render(QUIZ_GENERATION_PROMPT, |name| match name {
            "count" => Some(count.as_str()),
            "topic" => Some(topic.trim()),
            "difficulty" => Some(difficulty.as_str()),
            "context" => Some(context),
            _ => None,
        })
    }
}

/// Single pass over `template`; substituted values are never rescanned, so
/// braces inside the document text come through untouched.
fn render<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| {
            lookup(&after[..close]).map(|value| (value, close))
        }) {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Longest prefix of `text` with at most `max_chars` characters. Chunks
/// arrive most relevant first, so the prefix keeps the best material.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

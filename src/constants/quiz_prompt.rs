/// Instruction template for grounded multiple-choice generation.
///
/// Placeholders: `{count}`, `{topic}`, `{difficulty}`, `{context}`. The template must
/// stay byte-stable; identical inputs have to produce identical prompts.
pub const QUIZ_GENERATION_PROMPT: &str = r#"TASK: Generate {count} multiple-choice questions.
TOPIC: {topic}
DIFFICULTY: {difficulty}
SOURCE TEXT: "{context}"

Every question must be answerable from the SOURCE TEXT alone. Each question has exactly 4 options and exactly one of them is correct. The "correct_answer" value must repeat the text of the correct option exactly.

IMPERATIVE: YOUR ENTIRE RESPONSE MUST BE A SINGLE, VALID JSON ARRAY.
Your response must start with `[` and end with `]`.
Do not add any explanation, heading or markdown before or after the array.

JSON_FORMAT:
[
  {
    "question": "...", "options": ["...", "...", "...", "..."], "correct_answer": "...", "explanation": "..."
  }
]"#;

use crate::errors::{AppError, AppResult};

const DEFAULT_MAX_CHUNK_SIZE: usize = 1000;
const DEFAULT_OVERLAP: usize = 200;

/// Separators tried, in order, when looking for a natural segment end.
const BREAK_PREFERENCES: [&[char]; 3] = [&['\n', '\n'], &['\n'], &[' ']];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Upper bound on segment length, in characters.
    pub max_chunk_size: usize,
    /// Characters shared by consecutive segments.
    pub overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkerConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.max_chunk_size == 0 {
            return Err(AppError::ValidationError(
                "max_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.overlap >= self.max_chunk_size {
            return Err(AppError::ValidationError(format!(
                "overlap ({}) must be smaller than max_chunk_size ({})",
                self.overlap, self.max_chunk_size
            )));
        }
        Ok(())
    }
}

/// Splits extracted document text into overlapping segments.
///
/// Consecutive segments share exactly `overlap` characters, so dropping the
/// first `overlap` characters of every segment after the first and joining
/// the rest reproduces the input.
#[derive(Clone, Debug)]
pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        let max = self.config.max_chunk_size;
        let overlap = self.config.overlap;
        let mut segments = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + max).min(chars.len());
            if hard_end == chars.len() {
                segments.push(chars[start..].iter().collect());
                break;
            }

            // The segment must extend past the overlap or the next start
            // would not advance.
            let min_end = start + overlap + 1;
            let end = find_break(&chars, min_end, hard_end).unwrap_or(hard_end);

            segments.push(chars[start..end].iter().collect());
            start = end - overlap;
        }

        segments
    }
}

/// Latest position in `[min_end, hard_end]` that ends right after a
/// preferred separator.
fn find_break(chars: &[char], min_end: usize, hard_end: usize) -> Option<usize> {
    for separator in BREAK_PREFERENCES {
        let width = separator.len();
        let mut end = hard_end;
        while end >= min_end && end >= width {
            if &chars[end - width..end] == separator {
                return Some(end);
            }
            end -= 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(max_chunk_size: usize, overlap: usize) -> Chunker {
        Chunker::new(ChunkerConfig {
            max_chunk_size,
            overlap,
        })
        .expect("valid chunker config")
    }

    fn reassemble(segments: &[String], overlap: usize) -> String {
        let mut out = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if i == 0 {
                out.push_str(segment);
            } else {
                out.extend(segment.chars().skip(overlap));
            }
        }
        out
    }

    fn sample_text() -> String {
        let mut text = String::new();
        for i in 0..60 {
            text.push_str(&format!(
                "Paragraph {} discusses cellular respiration and the role of mitochondria.\n",
                i
            ));
            if i % 7 == 0 {
                text.push('\n');
            }
        }
        text
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(chunker(100, 20).split("").is_empty());
        assert!(chunker(100, 20).split("  \n\t ").is_empty());
    }

    #[test]
    fn short_input_is_a_single_segment() {
        let segments = chunker(100, 20).split("A short note.");
        assert_eq!(segments, vec!["A short note.".to_string()]);
    }

    #[test]
    fn segments_respect_max_size() {
        let text = sample_text();
        let segments = chunker(300, 50).split(&text);

        assert!(segments.len() > 1);
        assert!(segments.iter().all(|s| s.chars().count() <= 300));
    }

    #[test]
    fn segments_reassemble_to_original_text() {
        let text = sample_text();
        for (max, overlap) in [(300, 50), (1000, 200), (120, 100), (64, 0)] {
            let segments = chunker(max, overlap).split(&text);
            assert_eq!(reassemble(&segments, overlap), text, "max={max} overlap={overlap}");
        }
    }

    #[test]
    fn text_without_separators_is_hard_cut() {
        let text = "x".repeat(250);
        let segments = chunker(100, 10).split(&text);

        assert_eq!(segments[0].len(), 100);
        assert!(segments.iter().all(|s| s.len() <= 100));
        assert_eq!(reassemble(&segments, 10), text);
    }

    #[test]
    fn multibyte_text_is_split_on_char_boundaries() {
        let text = "Über Zellatmung: Mitochondrien erzeugen Energie. ".repeat(30);
        let segments = chunker(90, 15).split(&text);

        assert!(segments.iter().all(|s| s.chars().count() <= 90));
        assert_eq!(reassemble(&segments, 15), text);
    }

    #[test]
    fn segments_prefer_paragraph_breaks() {
        let text = format!("{}\n\n{}", "a".repeat(60), "b".repeat(60));
        let segments = chunker(100, 10).split(&text);

        assert!(segments[0].ends_with("\n\n"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(Chunker::new(ChunkerConfig {
            max_chunk_size: 100,
            overlap: 100
        })
        .is_err());
        assert!(Chunker::new(ChunkerConfig {
            max_chunk_size: 0,
            overlap: 0
        })
        .is_err());
    }
}

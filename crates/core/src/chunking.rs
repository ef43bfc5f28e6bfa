use crate::error::AnalysisError;

pub fn chunk_text(text: &str, chunk_chars: usize) -> Result<Vec<String>, AnalysisError> {
    if chunk_chars == 0 {
        return Err(AnalysisError::InvalidChunkSize);
    }
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let chars: Vec<char> = text.chars().collect();
    let chunks = chars
        .chunks(chunk_chars)
        .map(|window| window.iter().collect())
        .collect();
    Ok(chunks)
}

pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((boundary, _)) => &text[..boundary],
        None => text,
    }
}

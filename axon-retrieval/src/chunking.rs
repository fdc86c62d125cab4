//! Document splitting strategies.
//!
//! Each strategy yields ordered text fragments; the engine turns them into
//! [`Chunk`]s carrying the parent document id and position.
//!
//! [`Chunk`]: axon_core::models::Chunk

use axon_core::config::ChunkingStrategy;

/// Split a document's text according to the configured strategy.
///
/// Always returns at least one fragment for non-empty input; whitespace-only
/// fragments are dropped.
pub fn split(strategy: &ChunkingStrategy, text: &str) -> Vec<String> {
    let fragments = match strategy {
        ChunkingStrategy::FixedSize { max_chars, overlap } => {
            fixed_size_recursive(text, *max_chars, *overlap)
        }
        ChunkingStrategy::SentenceWindow { window } => sentence_window(text, *window),
        ChunkingStrategy::HeaderDelimited => header_delimited(text),
        ChunkingStrategy::Paragraph => paragraphs(text),
    };
    let fragments: Vec<String> = fragments
        .into_iter()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    if fragments.is_empty() && !text.trim().is_empty() {
        vec![text.trim().to_string()]
    } else {
        fragments
    }
}

/// Recursive split: paragraphs first, oversized paragraphs by sentence,
/// oversized sentences by word. Adjacent fragments share `overlap` trailing
/// characters for context continuity.
fn fixed_size_recursive(text: &str, max_chars: usize, overlap: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    for para in paragraphs(text) {
        if para.len() <= max_chars {
            pieces.push(para);
            continue;
        }
        for sentence in sentences(&para) {
            if sentence.len() <= max_chars {
                pieces.push(sentence);
            } else {
                pieces.extend(split_words(&sentence, max_chars));
            }
        }
    }

    // Pack pieces into chunks up to max_chars, carrying overlap between
    // adjacent chunks.
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    for piece in pieces {
        if current.is_empty() {
            current = piece;
        } else if current.len() + 1 + piece.len() <= max_chars {
            current.push(' ');
            current.push_str(&piece);
        } else {
            let tail = overlap_tail(&current, overlap);
            chunks.push(std::mem::take(&mut current));
            current = if tail.is_empty() {
                piece
            } else {
                format!("{tail} {piece}")
            };
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Each sentence becomes a chunk with `window` sentences of context on each
/// side. The center sentence determines the chunk position.
fn sentence_window(text: &str, window: usize) -> Vec<String> {
    let sents = sentences(text);
    sents
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let start = i.saturating_sub(window);
            let end = (i + window + 1).min(sents.len());
            sents[start..end].join(" ")
        })
        .collect()
}

/// Split on markdown-style header lines; each section keeps its header.
fn header_delimited(text: &str) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim_start().starts_with('#') && !current.trim().is_empty() {
            sections.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(line);
    }
    if !current.trim().is_empty() {
        sections.push(current);
    }
    sections
}

fn paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                out.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    out
}

fn split_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Last `overlap` characters of a chunk, snapped back to a word boundary.
fn overlap_tail(text: &str, overlap: usize) -> String {
    if overlap == 0 || text.len() <= overlap {
        return String::new();
    }
    let mut start = text.len() - overlap;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    // Snap forward to the next word boundary inside the tail.
    match text[start..].find(' ') {
        Some(offset) => text[start + offset..].trim().to_string(),
        None => String::new(),
    }
}

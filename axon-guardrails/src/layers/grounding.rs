//! Layer 2: grounding check. Flag-only: a poorly grounded answer is
//! surfaced to the caller, never silently blocked at this layer.
//!
//! Each factual sentence of the answer is embedded and compared against the
//! retrieved chunk texts; a sentence counts as grounded when its best cosine
//! similarity clears the configured threshold.

use axon_core::config::GuardrailConfig;
use axon_core::models::{ExecutionContext, GuardrailLayer, GuardrailVerdict, SpecialistOutput};
use axon_core::traits::IEmbeddingProvider;

pub fn check(
    output: &SpecialistOutput,
    ctx: &ExecutionContext,
    embedder: &dyn IEmbeddingProvider,
    config: &GuardrailConfig,
    retrieval_required: bool,
) -> GuardrailVerdict {
    if ctx.retrieved.is_empty() {
        if !retrieval_required {
            return GuardrailVerdict::pass(
                GuardrailLayer::GroundingCheck,
                "retrieval not required for this intent",
            );
        }
        if output.sources.is_empty() {
            return GuardrailVerdict::flag(
                GuardrailLayer::GroundingCheck,
                "no retrieved context and no self-reported sources",
            );
        }
        return GuardrailVerdict::pass(
            GuardrailLayer::GroundingCheck,
            "self-reported sources present without retrieved context",
        );
    }

    let factual: Vec<&str> = sentences(&output.answer)
        .into_iter()
        .filter(|s| is_factual(s))
        .collect();
    if factual.is_empty() {
        return GuardrailVerdict::pass(GuardrailLayer::GroundingCheck, "no factual claims");
    }

    let mut context_embeddings = Vec::with_capacity(ctx.retrieved.len());
    for text in ctx.retrieved_texts() {
        match embedder.embed(text) {
            Ok(embedding) => context_embeddings.push(embedding),
            Err(e) => {
                return GuardrailVerdict::flag(
                    GuardrailLayer::GroundingCheck,
                    format!("grounding check unavailable: {e}"),
                );
            }
        }
    }

    let mut grounded = 0usize;
    for sentence in &factual {
        let embedding = match embedder.embed(sentence) {
            Ok(embedding) => embedding,
            Err(e) => {
                return GuardrailVerdict::flag(
                    GuardrailLayer::GroundingCheck,
                    format!("grounding check unavailable: {e}"),
                );
            }
        };
        let best = context_embeddings
            .iter()
            .map(|c| cosine(&embedding, c))
            .fold(0.0f64, f64::max);
        if best >= config.grounding_similarity_threshold {
            grounded += 1;
        }
    }

    let ratio = grounded as f64 / factual.len() as f64;
    if ratio < config.min_grounded_ratio {
        GuardrailVerdict::flag(
            GuardrailLayer::GroundingCheck,
            format!(
                "{grounded} of {} factual sentences grounded in retrieved context",
                factual.len()
            ),
        )
        .with_score("grounded_ratio", ratio)
    } else {
        GuardrailVerdict::pass(GuardrailLayer::GroundingCheck, "answer grounded")
            .with_score("grounded_ratio", ratio)
    }
}

/// Split on sentence-ending punctuation, keeping non-empty trimmed pieces.
fn sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Questions and short fragments carry no checkable claim.
fn is_factual(sentence: &str) -> bool {
    !sentence.trim_end().ends_with('?') && sentence.split_whitespace().count() >= 4
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn questions_and_fragments_are_not_factual() {
        assert!(!is_factual("Is that what you meant?"));
        assert!(!is_factual("Thirty days."));
        assert!(is_factual("Refunds are issued within thirty days."));
    }

    #[test]
    fn sentence_split_keeps_order() {
        let split = sentences("First claim here. Second claim there! A question? ");
        assert_eq!(split.len(), 3);
        assert!(split[0].starts_with("First"));
        assert!(split[2].ends_with('?'));
    }
}

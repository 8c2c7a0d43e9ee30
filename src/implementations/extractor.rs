//! Pulls proof source out of free-form generator output.

use log::{ debug, warn };

use crate::models::common::ProofLanguage;

const FENCE: &str = "```";

/// Proof text recovered from a generator response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub proof: String,
    /// An opening fence had no closing fence; `proof` is the raw text
    pub malformed: bool,
}

/// Extract the first fenced block tagged with the target language.
///
/// Only the first opening marker and the first closing marker after it are
/// considered. Without an opening marker, or without a matching closing
/// marker, the raw text is returned unchanged.
pub fn extract_proof(raw: &str, language: ProofLanguage) -> Extraction {
    let Some((open_at, marker_len)) = find_opening_marker(raw, language) else {
        debug!("No {} fence found, using the raw response", language);
        return Extraction {
            proof: raw.to_string(),
            malformed: false,
        };
    };

    let body_start = skip_info_suffix(raw, open_at + marker_len);

    match raw[body_start..].find(FENCE) {
        Some(close_rel) => {
            let proof = raw[body_start..body_start + close_rel].trim().to_string();
            debug!("Extracted {} characters of {} source", proof.len(), language);
            Extraction { proof, malformed: false }
        }
        None => {
            warn!("Found an opening {} fence without a closing fence, using the raw response", language);
            Extraction {
                proof: raw.to_string(),
                malformed: true,
            }
        }
    }
}

/// Earliest ```` ```<tag> ```` for any of the language's tags; the longest tag wins a tie.
fn find_opening_marker(raw: &str, language: ProofLanguage) -> Option<(usize, usize)> {
    language
        .fence_tags()
        .iter()
        .filter_map(|tag| {
            let marker = format!("{}{}", FENCE, tag);
            raw.find(&marker).map(|at| (at, marker.len()))
        })
        .min_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
}

/// Skip the rest of the opening line, which belongs to the info string
/// (the `4` of ```` ```lean4 ```` matched as `lean`, or attributes such as `title="t"`).
///
/// A one-line block has no newline after the marker; there only a bare
/// alphanumeric tail is skipped.
fn skip_info_suffix(raw: &str, after_marker: usize) -> usize {
    let rest = &raw[after_marker..];
    if let Some(line_end) = rest.find('\n') {
        return after_marker + line_end;
    }
    let tail = rest.trim_end();
    if !tail.is_empty() && tail.chars().all(|c| c.is_ascii_alphanumeric()) {
        after_marker + rest.len()
    } else {
        after_marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAN: ProofLanguage = ProofLanguage::Lean4;

    #[test]
    fn test_extracts_fenced_block() {
        let raw = "Here is the proof:\n\n```lean\ntheorem t : 1 + 1 = 2 := by\n  rfl\n```\n\nDone.";
        let extraction = extract_proof(raw, LEAN);
        assert_eq!(extraction.proof, "theorem t : 1 + 1 = 2 := by\n  rfl");
        assert!(!extraction.malformed);
    }

    #[test]
    fn test_text_without_fences_is_unchanged() {
        let extraction = extract_proof("no fences here", LEAN);
        assert_eq!(extraction.proof, "no fences here");
        assert!(!extraction.malformed);
    }

    #[test]
    fn test_fenced_and_unfenced_bodies_agree() {
        let body = "theorem t : True := by\n  trivial";
        let fenced = format!("```lean\n{}\n```", body);
        assert_eq!(extract_proof(&fenced, LEAN).proof, extract_proof(body, LEAN).proof);
    }

    #[test]
    fn test_only_first_block_is_used() {
        let raw = "```lean\nfirst_block\n```\nsome words\n```lean\nsecond_block\n```";
        assert_eq!(extract_proof(raw, LEAN).proof, "first_block");
    }

    #[test]
    fn test_unclosed_fence_falls_back_to_raw_text() {
        let raw = "```lean\ntheorem t : True := by\n  trivial";
        let extraction = extract_proof(raw, LEAN);
        assert_eq!(extraction.proof, raw);
        assert!(extraction.malformed);
    }

    #[test]
    fn test_lean4_info_string_is_not_part_of_the_proof() {
        let raw = "```lean4\nexample : 2 = 2 := rfl\n```";
        assert_eq!(extract_proof(raw, LEAN).proof, "example : 2 = 2 := rfl");
    }

    #[test]
    fn test_info_string_attributes_are_not_part_of_the_proof() {
        let raw = "```lean title=\"t\"\nexample : True := trivial\n```";
        let extraction = extract_proof(raw, LEAN);
        assert_eq!(extraction.proof, "example : True := trivial");
        assert!(!extraction.malformed);

        let spaced = "```lean4   \nexample : 2 = 2 := rfl\n```";
        assert_eq!(extract_proof(spaced, LEAN).proof, "example : 2 = 2 := rfl");
    }

    #[test]
    fn test_fences_of_other_languages_are_ignored() {
        let raw = "```python\nprint('hi')\n```";
        let extraction = extract_proof(raw, LEAN);
        assert_eq!(extraction.proof, raw);
        assert!(!extraction.malformed);
    }

    #[test]
    fn test_closing_fence_is_searched_after_the_opening() {
        let raw = "``` stray\n```coq\nLemma l : True. Proof. exact I. Qed.\n```";
        let extraction = extract_proof(raw, ProofLanguage::Coq);
        assert_eq!(extraction.proof, "Lemma l : True. Proof. exact I. Qed.");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let raw = "text ```lean\nexample : True := trivial\n``` more";
        assert_eq!(extract_proof(raw, LEAN), extract_proof(raw, LEAN));
    }
}

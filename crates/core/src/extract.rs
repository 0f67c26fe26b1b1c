//! Heuristic brand/material extraction from listing titles.
//!
//! Product documents carry no structured brand or material fields, so the
//! aggregator recovers both from listing titles with a small category-aware
//! grammar. The rules are ordered; the first matching rule wins even when a
//! later pattern would also match.

/// Category whose titles follow the `<material> ... by <brand>` convention.
const JEWELRY_CATEGORY: &str = "Jewelry";

/// Brand and material recovered from a single listing title.
///
/// Either field may be empty when the title does not yield it; empty values
/// never enter a preference list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedAttributes {
    pub brand: String,
    pub material: String,
}

/// Extract brand and material from a listing title.
///
/// Total and deterministic: no input fails, an empty title yields empty
/// attributes, and titles matching no pattern degrade to
/// first-token-as-brand with no material.
#[must_use]
pub fn extract(title: &str, category: &str) -> ExtractedAttributes {
    if category == JEWELRY_CATEGORY || title.contains(" by ") {
        // "Gold Ring by Cartier" -> brand "Cartier", material "Gold".
        let brand = title
            .split_once(" by ")
            .map(|(_, rest)| first_token(rest))
            .unwrap_or_default();
        return ExtractedAttributes {
            brand,
            material: first_token(title),
        };
    }

    if let Some((_, rest)) = title.split_once(" in ") {
        // "Nike Jacket in Leather" -> brand "Nike", material "Leather".
        return ExtractedAttributes {
            brand: first_token(title),
            material: rest.trim().to_owned(),
        };
    }

    if let Some((_, rest)) = title.split_once(" with ") {
        // "Sony Speaker with Aluminum finish" -> material "Aluminum".
        let material = rest
            .strip_suffix(" finish")
            .or_else(|| rest.strip_suffix(" design"))
            .unwrap_or(rest)
            .trim()
            .to_owned();
        return ExtractedAttributes {
            brand: first_token(title),
            material,
        };
    }

    ExtractedAttributes {
        brand: first_token(title),
        material: String::new(),
    }
}

/// First whitespace-delimited token, or empty when there is none.
fn first_token(s: &str) -> String {
    s.split_whitespace().next().unwrap_or_default().to_owned()
}

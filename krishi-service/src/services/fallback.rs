//! Canned advice served when the language model cannot be reached.

pub const FUNGAL_DISEASE_ADVICE: &str = "Rust is a fungal disease. Use sulphur fungicides, ensure proper spacing, and apply every 10-14 days.";
pub const PEST_ADVICE: &str = "Use integrated pest management: Use neem oil spray, maintain field hygiene, implement crop rotation.";
pub const YIELD_ADVICE: &str = "Increase yield: Use quality seeds, follow proper spacing, apply recommended fertilizers, maintain irrigation, control weeds.";
pub const SOIL_ADVICE: &str = "Soil prep: Conduct soil testing, add organic manure, maintain pH 6.0-7.5, ensure good drainage.";
pub const IRRIGATION_ADVICE: &str = "Irrigation: Schedule at critical stages, avoid waterlogging, use drip irrigation, monitor soil moisture.";
pub const FERTILIZER_ADVICE: &str = "Fertilizer: Get soil tested, apply recommended NPK, split applications, use organic fertilizers.";
pub const GENERIC_PROMPT: &str =
    "Ask me about crop diseases, pests, irrigation, soil, fertilizers, or yield improvement.";

/// Keyword rules, checked top to bottom. The first rule with any keyword
/// present in the question wins.
const RULES: &[(&[&str], &str)] = &[
    (&["disease", "rust"], FUNGAL_DISEASE_ADVICE),
    (&["pest"], PEST_ADVICE),
    (&["yield"], YIELD_ADVICE),
    (&["soil"], SOIL_ADVICE),
    (&["water", "irrigation"], IRRIGATION_ADVICE),
    (&["fertilizer"], FERTILIZER_ADVICE),
];

/// Case-insensitive keyword lookup. Deterministic and infallible.
pub fn fallback_answer(question: &str) -> &'static str {
    let question = question.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
        .map(|(_, advice)| *advice)
        .unwrap_or(GENERIC_PROMPT)
}

//! Persona Prompts
//!
//! The two personas the orchestrator runs per turn, plus the small
//! utility prompts for keyword extraction and result commentary.

use crate::dataset::MovieRecord;

/// Persona for the conversational direct-answer step
pub const DIRECT_PERSONA: &str = "\
You are a movie-identification expert helping a user who only remembers \
fragments of a film. Respond conversationally, assess how reliable the \
user's clues are, and if the film is unlikely to appear in a classic-movie \
dataset, say why. Always include one concrete follow-up question that \
would narrow the search. Answer in the user's language.";

/// Persona for the structured intent-extraction step. The model is asked
/// for strict JSON; the parser degrades gracefully when it does not comply.
pub fn intent_persona(tools_description: &str) -> String {
    format!(
        "You are a movie-identification expert. Decide how to handle the user's \
         latest message and respond ONLY with JSON in this exact shape:\n\
         {{\n  \
           \"action\": \"search_movies\" or \"respond_text\",\n  \
           \"search_params\": {{\n    \
             \"keywords\": [\"keyword1\", \"keyword2\"],\n    \
             \"genre\": null,\n    \
             \"director\": null,\n    \
             \"actor\": null,\n    \
             \"min_rating\": null,\n    \
             \"limit\": 5\n  \
           }},\n  \
           \"response_text\": \"text to show the user\",\n  \
           \"next_question\": \"follow-up question\",\n  \
           \"reason_no_match\": null or \"why the film is likely missing\"\n\
         }}\n\n\
         Available tools:\n{}\n\n\
         No extra text outside the JSON.",
        tools_description
    )
}

/// Extract up to three comma-separated English keywords from free text
pub const KEYWORD_EXTRACTION_PROMPT: &str = "\
Extract up to three English keywords suitable for a movie search from the \
following text. Answer with the keywords only, comma-separated.";

/// Ask for commentary on what the dataset search returned
pub fn commentary_prompt(user_text: &str, movies: &[MovieRecord]) -> String {
    let summary = movies
        .iter()
        .take(3)
        .map(|m| format!("- {} ({}, rating {})", m.title, m.year, m.rating))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a movie expert. The user asked: \"{}\"\n\
         A dataset search suggested these films:\n{}\n\n\
         Comment briefly on whether these suggestions fit the request, what \
         other angles might be worth considering, and anything the user \
         should clarify.",
        user_text, summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_persona_embeds_tool_descriptions() {
        let persona = intent_persona("Tool: search_movies\nDescription: ...");
        assert!(persona.contains("search_movies"));
        assert!(persona.contains("\"action\""));
        assert!(persona.contains("reason_no_match"));
    }

    #[test]
    fn test_commentary_prompt_lists_top_three() {
        let movie = |title: &str| MovieRecord {
            title: title.to_string(),
            year: 1994,
            rating: 9.0,
            genres: vec![],
            director: String::new(),
            cast: vec![],
            synopsis: String::new(),
            votes: 0,
            poster: None,
            gross: None,
        };
        let movies = vec![movie("A"), movie("B"), movie("C"), movie("D")];

        let prompt = commentary_prompt("감옥 영화", &movies);
        assert!(prompt.contains("- A (1994"));
        assert!(prompt.contains("- C (1994"));
        assert!(!prompt.contains("- D"));
    }
}

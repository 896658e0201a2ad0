//! Bilingual Keyword Derivation
//!
//! Deterministic Korean-to-English term mapping used both to build
//! dataset search keywords and to augment web-search queries. The
//! dataset snapshot is English, so Korean clues have to be translated
//! before they can match anything.

/// Domain vocabulary: lowercase source term to English search terms
const TERM_TABLE: &[(&str, &[&str])] = &[
    ("감옥", &["prison", "jail", "shawshank"]),
    ("탈출", &["escape", "break", "breakout"]),
    ("탈옥", &["prison", "escape"]),
    ("액션", &["action"]),
    ("드라마", &["drama"]),
    ("코미디", &["comedy"]),
    ("로맨스", &["romance", "romantic"]),
    ("스릴러", &["thriller"]),
    ("공포", &["horror"]),
    ("sf", &["sci-fi", "science fiction"]),
    ("우주", &["space", "galaxy"]),
    ("전쟁", &["war", "battle"]),
    ("범죄", &["crime", "criminal"]),
    ("가족", &["family"]),
    ("모험", &["adventure"]),
    ("마피아", &["mafia", "godfather"]),
    ("좀비", &["zombie"]),
    ("슈퍼히어로", &["superhero", "batman", "superman"]),
    ("크리스토퍼 놀란", &["Christopher Nolan", "Nolan"]),
    ("톰 행크스", &["Tom Hanks", "Hanks"]),
    ("레오나르도 디카프리오", &["Leonardo DiCaprio", "DiCaprio"]),
    ("브래드 피트", &["Brad Pitt"]),
    ("모건 프리먼", &["Morgan Freeman"]),
    ("알 파치노", &["Al Pacino"]),
    ("로버트 드니로", &["Robert De Niro"]),
    ("조커", &["joker"]),
    ("배트맨", &["batman", "dark knight"]),
    ("반지의 제왕", &["lord of the rings", "fellowship"]),
    ("해리포터", &["harry potter", "potter"]),
    ("타이타닉", &["titanic"]),
    ("아바타", &["avatar"]),
];

/// English keywords from the deterministic term table. Empty when no
/// table entry matches; callers fall back to other derivations.
pub fn mapped_keywords(user_text: &str) -> Vec<String> {
    let lower = user_text.to_lowercase();
    let mut keywords = Vec::new();
    for (term, english) in TERM_TABLE {
        if lower.contains(term) {
            for word in *english {
                let word = word.to_string();
                if !keywords.contains(&word) {
                    keywords.push(word);
                }
            }
        }
    }
    keywords
}

/// True when the text mentions movies generically without any mappable
/// term ("영화" alone)
pub fn mentions_movies(user_text: &str) -> bool {
    user_text.to_lowercase().contains("영화")
}

/// Build a web-search query from the most recent user turns plus the
/// current input, augmented with the mapped domain terms.
pub fn synthesize_web_query(recent_user_turns: &[&str], current: &str) -> String {
    let mut context: Vec<&str> = recent_user_turns
        .iter()
        .rev()
        .take(3)
        .rev()
        .copied()
        .collect();
    context.push(current);
    let context_text = context.join(" ");

    let mut query = format!("movie film {}", current.trim());
    for term in mapped_keywords(&context_text) {
        if !query.to_lowercase().contains(&term.to_lowercase()) {
            query.push(' ');
            query.push_str(&term);
        }
    }
    query
}

use crate::error::{AppError, AppResult};

/// TMDB genre names and ids, covering both the movie and the TV lists
const GENRES: &[(&str, u32)] = &[
    ("Action", 28),
    ("Adventure", 12),
    ("Animation", 16),
    ("Comedy", 35),
    ("Crime", 80),
    ("Documentary", 99),
    ("Drama", 18),
    ("Family", 10751),
    ("Fantasy", 14),
    ("History", 36),
    ("Horror", 27),
    ("Music", 10402),
    ("Mystery", 9648),
    ("Romance", 10749),
    ("Science Fiction", 878),
    ("TV Movie", 10770),
    ("Thriller", 53),
    ("War", 10752),
    ("Western", 37),
    ("Action & Adventure", 10759),
    ("Kids", 10762),
    ("News", 10763),
    ("Reality", 10764),
    ("Sci-Fi & Fantasy", 10765),
    ("Soap", 10766),
    ("Talk", 10767),
    ("War & Politics", 10768),
];

/// Resolves a human-readable genre name to the provider's genre id.
///
/// Names match case-insensitively after trimming.
pub fn genre_id(name: &str) -> AppResult<u32> {
    let wanted = name.trim();
    GENRES
        .iter()
        .find(|(genre, _)| genre.eq_ignore_ascii_case(wanted))
        .map(|(_, id)| *id)
        .ok_or_else(|| AppError::InvalidGenre(name.to_string()))
}

//! Merging freshly fetched film details into a stored row.

use reelqueue_db::models::Film;

/// Fill the gaps of `existing` from `fetched`.
///
/// Stored values always win, except the title: a non-blank fetched title
/// replaces the stored one so placeholders get their real name. The id and
/// the movie/TV flag are never changed.
pub fn merge_film(existing: &Film, fetched: Film) -> Film {
    let title = if fetched.title.trim().is_empty() {
        existing.title.clone()
    } else {
        fetched.title
    };

    Film {
        id: existing.id,
        title,
        original_title: existing.original_title.clone().or(fetched.original_title),
        release_date: existing.release_date.clone().or(fetched.release_date),
        runtime_minutes: existing.runtime_minutes.or(fetched.runtime_minutes),
        genres: if existing.genres.is_empty() {
            fetched.genres
        } else {
            existing.genres.clone()
        },
        poster_path: existing
            .poster_path
            .clone()
            .filter(|p| !p.is_empty())
            .or(fetched.poster_path),
        is_tv: existing.is_tv,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetched() -> Film {
        Film {
            id: 1,
            title: "Jeanne Dielman".into(),
            original_title: Some("Jeanne Dielman, 23 quai du Commerce".into()),
            release_date: Some("1975-05-14".into()),
            runtime_minutes: Some(201),
            genres: vec!["Drama".into()],
            poster_path: Some("/jd.jpg".into()),
            is_tv: false,
        }
    }

    #[test]
    fn test_placeholder_takes_everything() {
        let merged = merge_film(&Film::placeholder(1, false), fetched());
        assert_eq!(merged, fetched());
    }

    #[test]
    fn test_existing_values_are_kept() {
        let mut existing = Film::placeholder(1, false);
        existing.title = "Stored".into();
        existing.runtime_minutes = Some(200);
        existing.genres = vec!["Art".into()];

        let merged = merge_film(&existing, fetched());
        assert_eq!(merged.title, "Jeanne Dielman");
        assert_eq!(merged.runtime_minutes, Some(200));
        assert_eq!(merged.genres, vec!["Art".to_string()]);
        assert_eq!(merged.poster_path.as_deref(), Some("/jd.jpg"));
    }

    #[test]
    fn test_blank_fetched_title_keeps_stored() {
        let mut blank = fetched();
        blank.title = "  ".into();
        let mut existing = Film::placeholder(1, false);
        existing.title = "Stored".into();

        assert_eq!(merge_film(&existing, blank).title, "Stored");
    }

    #[test]
    fn test_empty_poster_is_replaced_and_flag_kept() {
        let mut existing = Film::placeholder(1, true);
        existing.poster_path = Some(String::new());

        let merged = merge_film(&existing, fetched());
        assert_eq!(merged.poster_path.as_deref(), Some("/jd.jpg"));
        assert!(merged.is_tv);
    }
}

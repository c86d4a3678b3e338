//! Canonical book-name table
//!
//! Fixed 66-entry mapping between canonical book names and the 1-based book
//! ids MySword modules store, Old then New Testament in canonical order.

/// Canonical names indexed by `book_id - 1`.
pub const BOOK_NAMES: [&str; 66] = [
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Solomon",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Looks up the 1–66 book id for a canonical name, case-insensitively.
pub fn book_id(name: &str) -> Option<i64> {
    let name = name.trim();
    BOOK_NAMES
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(name))
        .map(|idx| idx as i64 + 1)
}

/// Canonical name for a 1–66 book id.
pub fn book_name(id: i64) -> Option<&'static str> {
    if (1..=66).contains(&id) {
        Some(BOOK_NAMES[id as usize - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bounds() {
        assert_eq!(book_id("Genesis"), Some(1));
        assert_eq!(book_id("Revelation"), Some(66));
        assert_eq!(book_name(1), Some("Genesis"));
        assert_eq!(book_name(66), Some("Revelation"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(book_id("psalms"), Some(19));
        assert_eq!(book_id("  JOHN "), Some(43));
    }

    #[test]
    fn unknown_names_and_ids_miss() {
        assert_eq!(book_id("Enoch"), None);
        assert_eq!(book_name(0), None);
        assert_eq!(book_name(67), None);
    }
}

//! Splitting person names into their BibTeX parts.
//!
//! BibTeX knows three ways to write a name:
//!
//! * “First von Last”, e.g. “Ludwig van Beethoven”
//! * “von Last, First”, e.g. “van Beethoven, Ludwig”
//! * “von Last, Jr, First”, e.g. “King, Jr, Martin Luther”
//!
//! Words are classified by their first character only: an ASCII uppercase
//! letter starts a capitalized word, an ASCII lowercase letter starts a von
//! particle, anything else is neither.

use std::collections::VecDeque;
use std::fmt;

/// The four parts of a person's name; each may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonName {
    pub forename: String,
    pub von: String,
    pub surname: String,
    pub suffix: String,
}

impl PersonName {
    pub fn is_empty(&self) -> bool {
        self.forename.is_empty()
            && self.von.is_empty()
            && self.surname.is_empty()
            && self.suffix.is_empty()
    }
}

/// Formats the name in “von Last, Jr, First” order, leaving out empty parts.
impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last: Vec<&str> = [self.von.as_str(), self.surname.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        write!(f, "{}", last.join(" "))?;
        if !self.suffix.is_empty() {
            write!(f, ", {}", self.suffix)?;
        }
        if !self.forename.is_empty() {
            write!(f, ", {}", self.forename)?;
        }
        Ok(())
    }
}

fn starts_upper(word: &str) -> bool {
    word.chars().next().map_or(false, |c| c.is_ascii_uppercase())
}

fn starts_lower(word: &str) -> bool {
    word.chars().next().map_or(false, |c| c.is_ascii_lowercase())
}

fn words(segment: &str) -> VecDeque<&str> {
    segment.split_whitespace().collect()
}

/// Takes the leading capitalized words off `words` as the forename.
/// At least one word is always left behind for the surname.
fn extract_forename(words: &mut VecDeque<&str>) -> String {
    let mut forename = Vec::new();
    while let Some(word) = words.pop_front() {
        if !starts_upper(word) {
            words.push_front(word);
            break;
        }
        forename.push(word);
    }
    if words.is_empty() {
        if let Some(last) = forename.pop() {
            words.push_back(last);
        }
    }
    forename.join(" ")
}

/// Returns `(von, surname)`. Every lowercase word pulls all capitalized
/// words before it into the von part; the words after the last lowercase
/// word form the surname. If there are none, the last von word becomes
/// the surname.
fn extract_von_and_surname(words: VecDeque<&str>) -> (String, String) {
    let mut von = Vec::new();
    let mut surname = Vec::new();
    for word in words {
        if starts_lower(word) {
            von.append(&mut surname);
            von.push(word);
        } else {
            surname.push(word);
        }
    }
    if surname.is_empty() {
        if let Some(last) = von.pop() {
            surname.push(last);
        }
    }
    (von.join(" "), surname.join(" "))
}

/// Splits a single name into forename, von part, surname and suffix.
///
/// ```rust
/// use bibtex_names::parse_person;
///
/// let name = parse_person("Charles Louis Xavier Joseph de la Vallee Poussin");
/// assert_eq!(name.forename, "Charles Louis Xavier Joseph");
/// assert_eq!(name.von, "de la");
/// assert_eq!(name.surname, "Vallee Poussin");
/// ```
pub fn parse_person(text: &str) -> PersonName {
    let segments: Vec<&str> = text.split(',').take(3).collect();
    match segments.as_slice() {
        [single] => {
            let mut words = words(single);
            let forename = extract_forename(&mut words);
            let (von, surname) = extract_von_and_surname(words);
            PersonName {
                forename,
                von,
                surname,
                suffix: String::new(),
            }
        }
        [last, first] => {
            let (von, surname) = extract_von_and_surname(words(last));
            PersonName {
                forename: first.trim().to_string(),
                von,
                surname,
                suffix: String::new(),
            }
        }
        [last, suffix, first, ..] => {
            let (von, surname) = extract_von_and_surname(words(last));
            PersonName {
                forename: first.trim().to_string(),
                von,
                surname,
                suffix: suffix.trim().to_string(),
            }
        }
        // `split` always yields at least one segment
        [] => PersonName::default(),
    }
}

/// Splits a list of names joined by “ and ” and parses each of them.
/// A blank list contains no names.
pub fn parse_persons(text: &str) -> Vec<PersonName> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    text.split(" and ").map(parse_person).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(forename: &str, von: &str, surname: &str, suffix: &str) -> PersonName {
        PersonName {
            forename: forename.to_string(),
            von: von.to_string(),
            surname: surname.to_string(),
            suffix: suffix.to_string(),
        }
    }

    #[test]
    fn test_first_last() {
        assert_eq!(parse_person(" AA  BB "), person("AA", "", "BB", ""));
    }

    #[test]
    fn test_first_von_last() {
        assert_eq!(
            parse_person(" AA  bb  CC  dd  EE "),
            person("AA", "bb CC dd", "EE", "")
        );
        assert_eq!(
            parse_person("Ludwig van Beethoven"),
            person("Ludwig", "van", "Beethoven", "")
        );
    }

    #[test]
    fn test_von_last_first() {
        assert_eq!(
            parse_person(" bb  CC  dd  EE , AA "),
            person("AA", "bb CC dd", "EE", "")
        );
    }

    #[test]
    fn test_von_last_jr_first() {
        assert_eq!(
            parse_person("  bb   CC  ,  XX  ,  AA "),
            person("AA", "bb", "CC", "XX")
        );
        assert_eq!(
            parse_person("King, Jr, Martin Luther, ignored"),
            person("Martin Luther", "", "King", "Jr")
        );
    }

    #[test]
    fn test_single_words() {
        assert_eq!(parse_person("Aristotle"), person("", "", "Aristotle", ""));
        assert_eq!(parse_person("bell"), person("", "", "bell", ""));
        assert_eq!(parse_person("de la"), person("", "de", "la", ""));
        assert!(parse_person("   ").is_empty());
    }

    #[test]
    fn test_neither_upper_nor_lower() {
        // digits and non-ASCII letters are not capitalized, so they stop the forename
        assert_eq!(parse_person("AA 3rd BB"), person("AA", "", "3rd BB", ""));
        assert_eq!(parse_person("Émile Zola"), person("", "", "Émile Zola", ""));
        assert_eq!(parse_person("AA {von} BB"), person("AA", "", "{von} BB", ""));
    }

    #[test]
    fn test_persons() {
        assert!(parse_persons("").is_empty());
        assert!(parse_persons(" \n\t ").is_empty());

        let persons = parse_persons("A B and C D");
        assert_eq!(persons, vec![person("A", "", "B", ""), person("C", "", "D", "")]);

        // the separator is case-sensitive and needs surrounding spaces
        assert_eq!(parse_persons("A B AND C D").len(), 1);
        assert_eq!(parse_persons("Anderson, Bob").len(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(person("AA", "bb", "CC", "XX").to_string(), "bb CC, XX, AA");
        assert_eq!(person("Ludwig", "van", "Beethoven", "").to_string(), "van Beethoven, Ludwig");
        assert_eq!(person("", "", "Aristotle", "").to_string(), "Aristotle");
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn no_panic(s in "\\PC*") {
            let name = parse_person(&s);
            if !s.trim().is_empty() && !s.contains(',') {
                prop_assert!(!name.surname.is_empty());
            }
            let _ = parse_persons(&s);
        }
    }
}

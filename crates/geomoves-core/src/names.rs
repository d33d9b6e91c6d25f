//! Display-name formatting.
//!
//! Labels on the map embed person names. The formatter is injected into the
//! extractor and the animation through the [`NameDisplay`] trait so that
//! callers can plug their own conventions.

use serde::{Deserialize, Serialize};

use crate::models::Person;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameFormat {
    /// `Surname, Given Suffix`
    #[default]
    SurnameGiven,
    /// `Given Surname Suffix`
    GivenSurname,
}

pub trait NameDisplay: Send + Sync {
    fn display(&self, person: &Person) -> String;
}

/// Formats names according to a [`NameFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNameDisplay {
    pub format: NameFormat,
}

impl StandardNameDisplay {
    pub fn new(format: NameFormat) -> Self {
        Self { format }
    }
}

impl NameDisplay for StandardNameDisplay {
    fn display(&self, person: &Person) -> String {
        let name = &person.name;
        let given = join_nonempty(&[&name.given, &name.suffix], " ");
        match self.format {
            NameFormat::SurnameGiven => join_nonempty(&[&name.surname, &given], ", "),
            NameFormat::GivenSurname => {
                join_nonempty(&[&name.given, &name.surname, &name.suffix], " ")
            }
        }
    }
}

fn join_nonempty(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Handle, Name};

    fn person(given: &str, surname: &str, suffix: &str) -> Person {
        Person {
            handle: Handle::new("h"),
            gramps_id: "I0001".to_string(),
            name: Name {
                given: given.to_string(),
                surname: surname.to_string(),
                suffix: suffix.to_string(),
            },
            event_refs: Vec::new(),
            families: Vec::new(),
        }
    }

    #[test]
    fn surname_first() {
        let names = StandardNameDisplay::default();
        assert_eq!(names.display(&person("Anna", "Berg", "")), "Berg, Anna");
        assert_eq!(names.display(&person("John", "Smith", "Jr.")), "Smith, John Jr.");
        assert_eq!(names.display(&person("", "Berg", "")), "Berg");
        assert_eq!(names.display(&person("Anna", "", "")), "Anna");
    }

    #[test]
    fn given_first() {
        let names = StandardNameDisplay::new(NameFormat::GivenSurname);
        assert_eq!(names.display(&person("Anna", "Berg", "")), "Anna Berg");
        assert_eq!(names.display(&person("John", "Smith", "Jr.")), "John Smith Jr.");
    }
}

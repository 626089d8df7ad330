use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Cleaned text cells of one spreadsheet data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-indexed sheet row this record came from
    pub row: usize,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub trips: String,
}

/// A roster entry after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    name: String,
    phone: Option<String>,
    email: Option<String>,
    trips: BTreeSet<String>,
}

impl Person {
    pub fn new(
        name: String,
        phone: Option<String>,
        email: Option<String>,
        trips: BTreeSet<String>,
    ) -> Self {
        Self {
            name,
            phone,
            email,
            trips,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn trips(&self) -> &BTreeSet<String> {
        &self.trips
    }

    pub fn is_enrolled(&self, trip: &str) -> bool {
        self.trips.contains(trip)
    }
}

/// Every distinct trip across the roster, in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TripRoster(BTreeSet<String>);

impl TripRoster {
    pub fn from_people(people: &[Person]) -> Self {
        Self(
            people
                .iter()
                .flat_map(|person| person.trips().iter().cloned())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, trip: &str) -> bool {
        self.0.contains(trip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// One line of the exported contact list.
///
/// Field names follow the contact-import header; absent values serialize as
/// empty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    #[serde(rename = "First Name")]
    pub display_name: String,
    #[serde(rename = "Mobile Phone")]
    pub phone: Option<String>,
    #[serde(rename = "E-mail Address")]
    pub email: Option<String>,
}

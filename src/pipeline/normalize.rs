use crate::config::Config;
use crate::error::Result;
use crate::types::{Person, RawRecord};
use once_cell::sync::Lazy;
use phonenumber::{country, Mode};
use regex::Regex;
use std::collections::BTreeSet;
use tracing::{debug, warn};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email pattern is valid")
});

/// Parse a phone number and render it in international format.
///
/// The number is first read as a `region` number; if that fails it is read
/// again with no region, which accepts numbers that already carry a `+`
/// country code. Returns `None` when neither attempt parses.
pub fn normalize_phone(raw: &str, region: country::Id) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = match phonenumber::parse(Some(region), raw) {
        Ok(number) => Ok(number),
        Err(_) => phonenumber::parse(None, raw),
    };

    match parsed {
        Ok(number) => Some(number.format().mode(Mode::International).to_string()),
        Err(e) => {
            debug!("Dropping unparsable phone '{}': {}", raw, e);
            None
        }
    }
}

const MAX_LOCAL_PART: usize = 64;
const MAX_ADDRESS: usize = 254;

/// Return the address unchanged when it is syntactically valid.
///
/// Internationalized domains are checked in their punycode form, so
/// `user@מייל.co.il` is accepted as written.
pub fn normalize_email(raw: &str) -> Option<String> {
    if is_valid_email(raw) {
        Some(raw.to_string())
    } else {
        if !raw.is_empty() {
            debug!("Dropping invalid email '{}'", raw);
        }
        None
    }
}

fn is_valid_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.rsplit_once('@') else {
        return false;
    };
    if local.len() > MAX_LOCAL_PART {
        return false;
    }
    let Ok(ascii_domain) = idna::domain_to_ascii(domain) else {
        return false;
    };
    let address = format!("{}@{}", local, ascii_domain);
    address.len() <= MAX_ADDRESS && EMAIL_RE.is_match(&address)
}

/// Split a trips cell on `delimiter` into a set of trimmed, non-empty names.
pub fn normalize_trips(raw: &str, delimiter: char) -> BTreeSet<String> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|trip| !trip.is_empty())
        .map(str::to_string)
        .collect()
}

/// Builds [`Person`]s from raw rows using one run's settings.
pub struct Normalizer {
    region: country::Id,
    delimiter: char,
}

impl Normalizer {
    pub fn new(region: country::Id, delimiter: char) -> Self {
        Self { region, delimiter }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.region_id()?, config.trip_delimiter))
    }

    /// Normalize one record. Returns `None` for rows without a name, which
    /// are typically blank trailing rows of the sheet.
    pub fn normalize(&self, record: &RawRecord) -> Option<Person> {
        if record.name.is_empty() {
            warn!(row = record.row, "Skipping row without a name");
            return None;
        }

        let trips = normalize_trips(&record.trips, self.delimiter);
        if trips.is_empty() {
            warn!(
                row = record.row,
                name = %record.name,
                "Person is not signed up for any trip"
            );
        }

        Some(Person::new(
            record.name.clone(),
            normalize_phone(&record.phone, self.region),
            normalize_email(&record.email),
            trips,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(s: &str) -> String {
        s.chars().filter(char::is_ascii_digit).collect()
    }

    fn record(name: &str, phone: &str, email: &str, trips: &str) -> RawRecord {
        RawRecord {
            row: 2,
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            trips: trips.to_string(),
        }
    }

    #[test]
    fn test_local_phone_uses_default_region() {
        let phone = normalize_phone("050-123-4567", country::Id::IL).unwrap();
        assert!(phone.starts_with("+972 "));
        assert_eq!(digits(&phone), "972501234567");
    }

    #[test]
    fn test_international_phone_keeps_its_country() {
        let phone = normalize_phone("+1 650 253 0000", country::Id::IL).unwrap();
        assert!(phone.starts_with("+1 "));
        assert_eq!(digits(&phone), "16502530000");
    }

    #[test]
    fn test_garbage_phone_is_absent() {
        assert_eq!(normalize_phone("not a phone", country::Id::IL), None);
        assert_eq!(normalize_phone("", country::Id::IL), None);
        assert_eq!(normalize_phone("   ", country::Id::IL), None);
    }

    #[test]
    fn test_valid_email_is_unchanged() {
        for email in ["dana@example.com", "Dana.Levi+trips@Mail.Example.co.il"] {
            assert_eq!(normalize_email(email).as_deref(), Some(email));
        }
    }

    #[test]
    fn test_invalid_email_is_absent() {
        for email in ["", "dana", "dana@", "@example.com", "dana@example", "da na@example.com", "dana..levi@example.com"] {
            assert_eq!(normalize_email(email), None, "{email}");
        }
    }

    #[test]
    fn test_internationalized_domain_is_kept_unchanged() {
        let email = "user@מייל.co.il";
        assert_eq!(normalize_email(email).as_deref(), Some(email));
    }

    #[test]
    fn test_overlong_local_part_is_absent() {
        let local = "a".repeat(64);
        assert!(normalize_email(&format!("{}@example.com", local)).is_some());
        assert_eq!(normalize_email(&format!("{}a@example.com", local)), None);
    }

    #[test]
    fn test_email_normalization_is_idempotent() {
        let once = normalize_email("dana@example.com").unwrap();
        assert_eq!(normalize_email(&once).unwrap(), once);
    }

    #[test]
    fn test_trips_are_trimmed_into_a_set() {
        let trips = normalize_trips("a, b ,c", ',');
        let expected: BTreeSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(trips, expected);
    }

    #[test]
    fn test_trips_collapse_duplicates_and_empty_tokens() {
        let trips = normalize_trips("Golan;; Golan ;Negev;", ';');
        assert_eq!(trips.len(), 2);
        assert!(trips.contains("Golan"));
        assert!(trips.contains("Negev"));
    }

    #[test]
    fn test_trips_split_only_on_configured_delimiter() {
        assert_eq!(normalize_trips("a, b", ';').len(), 1);
    }

    #[test]
    fn test_empty_trips_field_gives_empty_set() {
        assert!(normalize_trips("", ',').is_empty());
        assert!(normalize_trips(" , ,", ',').is_empty());
    }

    #[test]
    fn test_normalizer_builds_person() {
        let normalizer = Normalizer::new(country::Id::IL, ',');
        let person = normalizer
            .normalize(&record("Dana Levi", "0501234567", "bad-email", "Golan, Negev"))
            .unwrap();

        assert_eq!(person.name(), "Dana Levi");
        assert!(person.phone().unwrap().starts_with("+972"));
        assert_eq!(person.email(), None);
        assert_eq!(person.trips().len(), 2);
    }

    #[test]
    fn test_normalizer_skips_nameless_row() {
        let normalizer = Normalizer::new(country::Id::IL, ',');
        assert!(normalizer.normalize(&record("", "", "", "")).is_none());
    }

    #[test]
    fn test_normalizer_keeps_person_without_trips() {
        let normalizer = Normalizer::new(country::Id::IL, ',');
        let person = normalizer.normalize(&record("Dana", "", "", "")).unwrap();
        assert!(person.trips().is_empty());
    }
}

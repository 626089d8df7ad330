//! Defaults used when neither the config file, the environment nor the CLI
//! says otherwise.

// Region assumed for phone numbers written without a country code
pub const DEFAULT_REGION: &str = "IL";

// Prepended to every exported contact name
pub const DEFAULT_NAME_PREFIX: &str = "000 haifa-vaddis";

pub const DEFAULT_TRIP_DELIMITER: char = ',';

// 1-indexed spreadsheet columns. Column A holds the sign-up form timestamp
// and column C the age, neither of which is exported.
pub const DEFAULT_NAME_COLUMN: usize = 2;
pub const DEFAULT_PHONE_COLUMN: usize = 4;
pub const DEFAULT_EMAIL_COLUMN: usize = 5;
pub const DEFAULT_TRIPS_COLUMN: usize = 6;

pub const DEFAULT_INPUT_FILE: &str = "input.xlsx";
pub const DEFAULT_CONFIG_FILE: &str = "trip_contacts.toml";

/// Header row of the exported contact list, in column order
pub const OUTPUT_HEADERS: [&str; 3] = ["First Name", "Mobile Phone", "E-mail Address"];

// Environment overrides (a `.env` file is honoured too)
pub const ENV_REGION: &str = "TRIP_CONTACTS_REGION";
pub const ENV_PREFIX: &str = "TRIP_CONTACTS_PREFIX";
pub const ENV_DELIMITER: &str = "TRIP_CONTACTS_DELIMITER";
pub const ENV_LOG_DIR: &str = "TRIP_CONTACTS_LOG_DIR";

/// Output path used when none is given: the input path with `.csv` appended,
/// so `input.xlsx` becomes `input.xlsx.csv`.
pub fn default_output_path(input: &std::path::Path) -> std::path::PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".csv");
    name.into()
}

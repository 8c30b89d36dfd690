//! Static lookup tables that turn raw report dimension values into display labels.
//!
//! Each table is independent so it can be verified on its own. Values the
//! tables do not recognise pass through unchanged.

/// Viewer age buckets in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgeGroup {
    Age13To17,
    Age18To24,
    Age25To34,
    Age35To44,
    Age45To54,
    Age55To64,
    Age65Plus,
}

impl AgeGroup {
    /// Canonical order used by the age × gender table.
    pub const ORDER: [AgeGroup; 7] = [
        AgeGroup::Age13To17,
        AgeGroup::Age18To24,
        AgeGroup::Age25To34,
        AgeGroup::Age35To44,
        AgeGroup::Age45To54,
        AgeGroup::Age55To64,
        AgeGroup::Age65Plus,
    ];

    /// Parses the reporting API's `ageGroup` dimension value (`age18-24`, `age65-`).
    #[must_use]
    pub fn from_api(code: &str) -> Option<Self> {
        match code {
            "age13-17" => Some(AgeGroup::Age13To17),
            "age18-24" => Some(AgeGroup::Age18To24),
            "age25-34" => Some(AgeGroup::Age25To34),
            "age35-44" => Some(AgeGroup::Age35To44),
            "age45-54" => Some(AgeGroup::Age45To54),
            "age55-64" => Some(AgeGroup::Age55To64),
            "age65-" => Some(AgeGroup::Age65Plus),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Age13To17 => "13-17",
            AgeGroup::Age18To24 => "18-24",
            AgeGroup::Age25To34 => "25-34",
            AgeGroup::Age35To44 => "35-44",
            AgeGroup::Age45To54 => "45-54",
            AgeGroup::Age55To64 => "55-64",
            AgeGroup::Age65Plus => "65+",
        }
    }
}

/// Display label for a raw `ageGroup` value; unknown codes pass through.
#[must_use]
pub fn age_group_label(code: &str) -> &str {
    match AgeGroup::from_api(code) {
        Some(group) => group.label(),
        None => code,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    /// `user_specified` and anything else the API may add.
    Other,
}

impl Gender {
    #[must_use]
    pub fn from_api(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Other,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
    Tv,
}

impl DeviceType {
    #[must_use]
    pub fn from_api(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "DESKTOP" => Some(DeviceType::Desktop),
            "MOBILE" => Some(DeviceType::Mobile),
            "TABLET" => Some(DeviceType::Tablet),
            "TV" => Some(DeviceType::Tv),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DeviceType::Desktop => "Desktop",
            DeviceType::Mobile => "Mobile",
            DeviceType::Tablet => "Tablet",
            DeviceType::Tv => "TV",
        }
    }
}

/// Display label for a raw `deviceType` value; unknown values (e.g.
/// `GAME_CONSOLE`) pass through unchanged.
#[must_use]
pub fn device_label(raw: &str) -> &str {
    match DeviceType::from_api(raw) {
        Some(device) => device.label(),
        None => raw,
    }
}

/// ISO 3166-1 alpha-2 codes the dashboard names explicitly.
static COUNTRY_NAMES: &[(&str, &str)] = &[
    ("AE", "United Arab Emirates"),
    ("AR", "Argentina"),
    ("AT", "Austria"),
    ("AU", "Australia"),
    ("BD", "Bangladesh"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CL", "Chile"),
    ("CO", "Colombia"),
    ("CZ", "Czech Republic"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("EG", "Egypt"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("GR", "Greece"),
    ("HU", "Hungary"),
    ("ID", "Indonesia"),
    ("IE", "Ireland"),
    ("IL", "Israel"),
    ("IN", "India"),
    ("IQ", "Iraq"),
    ("IT", "Italy"),
    ("JO", "Jordan"),
    ("JP", "Japan"),
    ("KE", "Kenya"),
    ("KR", "South Korea"),
    ("LB", "Lebanon"),
    ("MX", "Mexico"),
    ("MY", "Malaysia"),
    ("NG", "Nigeria"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("NP", "Nepal"),
    ("NZ", "New Zealand"),
    ("PE", "Peru"),
    ("PH", "Philippines"),
    ("PK", "Pakistan"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RO", "Romania"),
    ("RU", "Russia"),
    ("SA", "Saudi Arabia"),
    ("SE", "Sweden"),
    ("SG", "Singapore"),
    ("TH", "Thailand"),
    ("TR", "Turkey"),
    ("UA", "Ukraine"),
    ("US", "United States"),
    ("VN", "Vietnam"),
    ("ZA", "South Africa"),
];

/// Display name for a country code; codes missing from the table pass through.
#[must_use]
pub fn country_name(code: &str) -> &str {
    match COUNTRY_NAMES.binary_search_by(|(c, _)| (*c).cmp(code)) {
        Ok(idx) => COUNTRY_NAMES[idx].1,
        Err(_) => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_table_is_sorted_for_binary_search() {
        assert!(COUNTRY_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn country_name_maps_known_codes() {
        assert_eq!(country_name("US"), "United States");
        assert_eq!(country_name("KR"), "South Korea");
        assert_eq!(country_name("AE"), "United Arab Emirates");
        assert_eq!(country_name("ZA"), "South Africa");
    }

    #[test]
    fn country_name_passes_unknown_codes_through() {
        assert_eq!(country_name("XK"), "XK");
        assert_eq!(country_name(""), "");
    }

    #[test]
    fn age_groups_parse_and_label() {
        assert_eq!(AgeGroup::from_api("age65-"), Some(AgeGroup::Age65Plus));
        assert_eq!(AgeGroup::Age65Plus.label(), "65+");
        assert_eq!(age_group_label("age18-24"), "18-24");
        assert_eq!(age_group_label("age99-"), "age99-");
    }

    #[test]
    fn age_order_is_ascending() {
        assert!(AgeGroup::ORDER.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(AgeGroup::ORDER[0].label(), "13-17");
    }

    #[test]
    fn gender_labels_collapse_unknown_values() {
        assert_eq!(Gender::from_api("male"), Gender::Male);
        assert_eq!(Gender::from_api("FEMALE"), Gender::Female);
        assert_eq!(Gender::from_api("f"), Gender::Female);
        assert_eq!(Gender::from_api("user_specified"), Gender::Other);
        assert_eq!(Gender::Other.label(), "Other");
    }

    #[test]
    fn device_labels() {
        assert_eq!(device_label("DESKTOP"), "Desktop");
        assert_eq!(device_label("MOBILE"), "Mobile");
        assert_eq!(device_label("TABLET"), "Tablet");
        assert_eq!(device_label("TV"), "TV");
        assert_eq!(device_label("GAME_CONSOLE"), "GAME_CONSOLE");
    }
}

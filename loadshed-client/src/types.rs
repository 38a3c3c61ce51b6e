use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// The API occasionally sends `null` for scalar fields; treat it as absent.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Provinces, numbered the way the municipality endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Province {
    EasternCape = 1,
    FreeState = 2,
    Gauteng = 3,
    KwaZuluNatal = 4,
    Limpopo = 5,
    Mpumalanga = 6,
    NorthWest = 7,
    NorthernCape = 8,
    WesternCape = 9,
}

impl Province {
    pub const ALL: [Province; 9] = [
        Province::EasternCape,
        Province::FreeState,
        Province::Gauteng,
        Province::KwaZuluNatal,
        Province::Limpopo,
        Province::Mpumalanga,
        Province::NorthWest,
        Province::NorthernCape,
        Province::WesternCape,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Province::EasternCape => "Eastern Cape",
            Province::FreeState => "Free State",
            Province::Gauteng => "Gauteng",
            Province::KwaZuluNatal => "KwaZulu-Natal",
            Province::Limpopo => "Limpopo",
            Province::Mpumalanga => "Mpumalanga",
            Province::NorthWest => "North West",
            Province::NorthernCape => "Northern Cape",
            Province::WesternCape => "Western Cape",
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the numeric id or the name in any case, ignoring spaces, `-` and `_`.
impl FromStr for Province {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Province::ALL
            .into_iter()
            .find(|p| {
                key == p.id().to_string()
                    || key
                        == p.name()
                            .chars()
                            .filter(|c| c.is_ascii_alphanumeric())
                            .map(|c| c.to_ascii_lowercase())
                            .collect::<String>()
            })
            .ok_or_else(|| format!("unknown province {s:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    #[serde(rename(deserialize = "Value"), default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename(deserialize = "Text"), default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename(deserialize = "Disabled"), default, deserialize_with = "null_as_default")]
    pub disabled: bool,
    #[serde(rename(deserialize = "Selected"), default, deserialize_with = "null_as_default")]
    pub selected: bool,
    #[serde(rename(deserialize = "Group"), default, deserialize_with = "null_as_default")]
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suburb {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(rename(deserialize = "text"), default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Number of schedule entries the site holds for this suburb.
    #[serde(rename(deserialize = "Tot"), default, deserialize_with = "null_as_default")]
    pub total: i64,
}

/// One page of suburbs within a municipality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SuburbResult {
    #[serde(rename(deserialize = "Results"), default, deserialize_with = "null_as_default")]
    pub results: Vec<Suburb>,
    /// Total matches across all pages.
    #[serde(rename(deserialize = "Total"), default, deserialize_with = "null_as_default")]
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSuburb {
    #[serde(rename(deserialize = "MunicipalityName"), default, deserialize_with = "null_as_default")]
    pub municipality_name: String,
    #[serde(rename(deserialize = "ProvinceName"), default, deserialize_with = "null_as_default")]
    pub province_name: String,
    #[serde(rename(deserialize = "Name"), default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename(deserialize = "Id"), alias = "ID", default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename(deserialize = "Total"), default, deserialize_with = "null_as_default")]
    pub total: i64,
}

/// Records that report how many schedule entries exist for them.
pub trait HasTotal {
    fn total(&self) -> i64;
}

impl HasTotal for Suburb {
    fn total(&self) -> i64 {
        self.total
    }
}

impl HasTotal for SearchSuburb {
    fn total(&self) -> i64 {
        self.total
    }
}

/// Drop records with a zero total.
pub trait OmitEmpty {
    fn omit_empty(self) -> Self;
}

impl<T: HasTotal> OmitEmpty for Vec<T> {
    fn omit_empty(self) -> Self {
        self.into_iter().filter(|item| item.total() > 0).collect()
    }
}

impl OmitEmpty for SuburbResult {
    fn omit_empty(self) -> Self {
        Self {
            results: self.results.omit_empty(),
            total: self.total,
        }
    }
}

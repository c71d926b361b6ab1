//! Application state - single source of truth

use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Backend-assigned city identifier.
///
/// The backend may hand out numbers or strings. Numeric text compares equal
/// to the number it spells, so `7`, `"7"` and `"007"` name the same city.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CityId {
    Number(i64),
    Text(String),
}

impl CityId {
    fn key(&self) -> Cow<'_, str> {
        match self {
            CityId::Number(n) => Cow::Owned(n.to_string()),
            CityId::Text(text) => match text.trim().parse::<i64>() {
                Ok(n) => Cow::Owned(n.to_string()),
                Err(_) => Cow::Borrowed(text.as_str()),
            },
        }
    }
}

impl PartialEq for CityId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for CityId {}

impl Hash for CityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CityId::Number(n) => write!(f, "{n}"),
            CityId::Text(text) => f.write_str(text),
        }
    }
}

impl FromStr for CityId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CityId::from(s))
    }
}

impl From<i64> for CityId {
    fn from(id: i64) -> Self {
        CityId::Number(id)
    }
}

impl From<&str> for CityId {
    fn from(id: &str) -> Self {
        match id.trim().parse::<i64>() {
            Ok(n) => CityId::Number(n),
            Err(_) => CityId::Text(id.to_string()),
        }
    }
}

impl From<String> for CityId {
    fn from(id: String) -> Self {
        CityId::from(id.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

/// A visited city as stored by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    #[serde(default)]
    pub city_name: String,
    #[serde(default)]
    pub country: String,
    /// Flag glyph
    #[serde(default)]
    pub emoji: String,
    /// ISO date of the visit
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub position: Position,
}

impl City {
    pub fn new(id: impl Into<CityId>, city_name: impl Into<String>) -> Self {
        NewCity {
            city_name: city_name.into(),
            ..Default::default()
        }
        .into_city(id)
    }
}

/// Request body for creating a city: everything but the id
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCity {
    pub city_name: String,
    pub country: String,
    pub emoji: String,
    pub date: String,
    pub notes: String,
    pub position: Position,
}

impl NewCity {
    pub fn into_city(self, id: impl Into<CityId>) -> City {
        City {
            id: id.into(),
            city_name: self.city_name,
            country: self.country,
            emoji: self.emoji,
            date: self.date,
            notes: self.notes,
            position: self.position,
        }
    }
}

/// Fields of the "new city" form, in tab order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum FormField {
    #[default]
    CityName,
    Country,
    Emoji,
    Date,
    Notes,
    Lat,
    Lng,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::CityName,
        FormField::Country,
        FormField::Emoji,
        FormField::Date,
        FormField::Notes,
        FormField::Lat,
        FormField::Lng,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::CityName => "City name",
            FormField::Country => "Country",
            FormField::Emoji => "Flag",
            FormField::Date => "Visited on",
            FormField::Notes => "Notes",
            FormField::Lat => "Latitude",
            FormField::Lng => "Longitude",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Draft of a city being entered in the form overlay
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CityForm {
    pub city_name: String,
    pub country: String,
    pub emoji: String,
    pub date: String,
    pub notes: String,
    pub lat: String,
    pub lng: String,
    pub focus: FormField,
    /// Validation message from the last submit attempt
    pub error: Option<String>,
}

impl CityForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::CityName => &self.city_name,
            FormField::Country => &self.country,
            FormField::Emoji => &self.emoji,
            FormField::Date => &self.date,
            FormField::Notes => &self.notes,
            FormField::Lat => &self.lat,
            FormField::Lng => &self.lng,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::CityName => &mut self.city_name,
            FormField::Country => &mut self.country,
            FormField::Emoji => &mut self.emoji,
            FormField::Date => &mut self.date,
            FormField::Notes => &mut self.notes,
            FormField::Lat => &mut self.lat,
            FormField::Lng => &mut self.lng,
        }
    }

    /// Validate the draft into a request body.
    pub fn to_new_city(&self) -> Result<NewCity, String> {
        let city_name = self.city_name.trim();
        if city_name.is_empty() {
            return Err("City name is required".into());
        }
        let lat = parse_coordinate(&self.lat, FormField::Lat, 90.0)?;
        let lng = parse_coordinate(&self.lng, FormField::Lng, 180.0)?;

        Ok(NewCity {
            city_name: city_name.to_string(),
            country: self.country.trim().to_string(),
            emoji: self.emoji.trim().to_string(),
            date: self.date.trim().to_string(),
            notes: self.notes.trim().to_string(),
            position: Position { lat, lng },
        })
    }
}

fn parse_coordinate(raw: &str, field: FormField, limit: f64) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a number", field.label()))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!(
            "{} must be between -{limit} and {limit}",
            field.label()
        ));
    }
    Ok(value)
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, Default, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Store data (visible in debug) ---
    /// Cities in server listing order; creates append
    #[debug(section = "Cities", label = "List", debug_fmt)]
    pub cities: Vec<City>,

    /// Most recently fetched or created city
    #[debug(section = "Cities", label = "Current", debug_fmt)]
    pub current_city: Option<City>,

    #[debug(section = "Request", label = "Loading")]
    pub is_loading: bool,

    /// Last failure message, empty after a success
    #[debug(section = "Request", label = "Error")]
    pub error: String,

    // --- UI (skipped) ---
    /// Highlighted row in the city list
    #[debug(skip)]
    pub selected: usize,

    /// Open "new city" form, if any
    #[debug(skip)]
    pub form: Option<CityForm>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_city_id(&self) -> Option<&CityId> {
        self.current_city.as_ref().map(|city| &city.id)
    }

    pub fn selected_city(&self) -> Option<&City> {
        self.cities.get(self.selected)
    }

    pub(crate) fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.cities.len().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_id_numeric_coercion() {
        assert_eq!(CityId::from(7), CityId::from("7"));
        assert_eq!(CityId::from("007"), CityId::Number(7));
        assert_eq!(CityId::Text("7".into()), CityId::Number(7));
        assert_ne!(CityId::from("abc"), CityId::from("abd"));
        assert_eq!(CityId::from("a1b2"), CityId::Text("a1b2".into()));
    }

    #[test]
    fn test_city_deserializes_partial_records() {
        let city: City = serde_json::from_str(r#"{"id":7,"cityName":"Lima"}"#).unwrap();
        assert_eq!(city.id, CityId::Number(7));
        assert_eq!(city.city_name, "Lima");
        assert_eq!(city.position, Position::default());

        let city: City = serde_json::from_str(
            r#"{"id":"e1f2","cityName":"Lisbon","country":"Portugal","emoji":"🇵🇹",
                "date":"2027-10-31T15:59:59.138Z","notes":"","position":{"lat":38.72,"lng":-9.14}}"#,
        )
        .unwrap();
        assert_eq!(city.id, CityId::Text("e1f2".into()));
        assert_eq!(city.position.lng, -9.14);
    }

    #[test]
    fn test_new_city_serializes_camel_case_without_id() {
        let body = serde_json::to_value(NewCity {
            city_name: "Lima".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body["cityName"], "Lima");
        assert!(body.get("id").is_none());
        assert!(body["position"].get("lng").is_some());
    }

    #[test]
    fn test_form_field_cycle() {
        assert_eq!(FormField::CityName.next(), FormField::Country);
        assert_eq!(FormField::Lng.next(), FormField::CityName);
        assert_eq!(FormField::CityName.prev(), FormField::Lng);
    }

    #[test]
    fn test_form_validation() {
        let mut form = CityForm::default();
        assert_eq!(form.to_new_city().unwrap_err(), "City name is required");

        form.city_name = "  Lima ".into();
        form.lat = "-12.05".into();
        form.lng = "abc".into();
        assert_eq!(form.to_new_city().unwrap_err(), "Longitude must be a number");

        form.lng = "-200".into();
        assert!(form.to_new_city().is_err());

        form.lng = "-77.04".into();
        let city = form.to_new_city().unwrap();
        assert_eq!(city.city_name, "Lima");
        assert_eq!(city.position, Position { lat: -12.05, lng: -77.04 });
    }
}

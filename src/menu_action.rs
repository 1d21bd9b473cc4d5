//! Action tokens round-tripped through postback buttons.
//!
//! The server keeps no session: every button carries the next menu step and
//! the selections made so far as `key=value&key=value` pairs, and the
//! platform echoes that string back verbatim when the button is tapped.

use std::collections::HashMap;
use url::form_urlencoded;

use crate::errors::ActionTokenError;

pub const FACILITY_TYPE_CLINIC: &str = "clinic";
pub const FACILITY_TYPE_PHARMACY: &str = "pharmacy";

const ACTION_MAIN_MENU: &str = "main_menu";
const ACTION_SELECT_CITY: &str = "select_city";
const ACTION_SELECT_DISTRICT: &str = "select_district";
const ACTION_SHOW_CLINICS: &str = "show_clinics";

/// A decoded menu step
///
/// `facility_type` is accepted and forwarded from step to step but never
/// used to filter facilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Root,
    SelectCity {
        facility_type: Option<String>,
        page: usize,
    },
    SelectDistrict {
        city: String,
        facility_type: Option<String>,
        page: usize,
    },
    ShowClinics {
        city: String,
        district: String,
        facility_type: Option<String>,
    },
}

impl MenuAction {
    /// Decode a postback payload.
    ///
    /// Repeated keys keep their first value. Blank values count as absent,
    /// so `city=&city=B` has no city.
    pub fn parse(data: &str) -> Result<Self, ActionTokenError> {
        let mut fields: HashMap<String, String> = HashMap::new();
        for (key, value) in form_urlencoded::parse(data.trim().as_bytes()) {
            fields
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        fields.retain(|_, value| !value.trim().is_empty());

        let action = fields
            .get("action")
            .ok_or(ActionTokenError::MissingAction)?;
        let facility_type = fields.get("type").cloned();
        let require = |action: &'static str, field: &'static str| {
            fields
                .get(field)
                .cloned()
                .ok_or(ActionTokenError::MissingField { action, field })
        };

        match action.as_str() {
            ACTION_MAIN_MENU => Ok(MenuAction::Root),
            ACTION_SELECT_CITY => Ok(MenuAction::SelectCity {
                facility_type,
                page: parse_page(fields.get("page"))?,
            }),
            ACTION_SELECT_DISTRICT => Ok(MenuAction::SelectDistrict {
                city: require(ACTION_SELECT_DISTRICT, "city")?,
                facility_type,
                page: parse_page(fields.get("page"))?,
            }),
            ACTION_SHOW_CLINICS => Ok(MenuAction::ShowClinics {
                city: require(ACTION_SHOW_CLINICS, "city")?,
                district: require(ACTION_SHOW_CLINICS, "district")?,
                facility_type,
            }),
            other => Err(ActionTokenError::UnknownAction(other.to_string())),
        }
    }

    /// Encode this step as a postback payload
    pub fn to_token(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        let (facility_type, page) = match self {
            MenuAction::Root => {
                serializer.append_pair("action", ACTION_MAIN_MENU);
                (None, 0)
            }
            MenuAction::SelectCity {
                facility_type,
                page,
            } => {
                serializer.append_pair("action", ACTION_SELECT_CITY);
                (facility_type.as_deref(), *page)
            }
            MenuAction::SelectDistrict {
                city,
                facility_type,
                page,
            } => {
                serializer
                    .append_pair("action", ACTION_SELECT_DISTRICT)
                    .append_pair("city", city);
                (facility_type.as_deref(), *page)
            }
            MenuAction::ShowClinics {
                city,
                district,
                facility_type,
            } => {
                serializer
                    .append_pair("action", ACTION_SHOW_CLINICS)
                    .append_pair("city", city)
                    .append_pair("district", district);
                (facility_type.as_deref(), 0)
            }
        };
        if let Some(facility_type) = facility_type {
            serializer.append_pair("type", facility_type);
        }
        if page > 0 {
            serializer.append_pair("page", &page.to_string());
        }
        serializer.finish()
    }

    /// Same step, moved to another page of choices
    pub fn with_page(&self, page: usize) -> Self {
        match self.clone() {
            MenuAction::SelectCity { facility_type, .. } => MenuAction::SelectCity {
                facility_type,
                page,
            },
            MenuAction::SelectDistrict {
                city,
                facility_type,
                ..
            } => MenuAction::SelectDistrict {
                city,
                facility_type,
                page,
            },
            other => other,
        }
    }
}

fn parse_page(value: Option<&String>) -> Result<usize, ActionTokenError> {
    match value {
        None => Ok(0),
        Some(v) => v
            .parse()
            .map_err(|_| ActionTokenError::InvalidPage(v.clone())),
    }
}

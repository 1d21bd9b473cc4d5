//! UI Builder module for creating quick replies, carousels and text answers

use lazy_static::lazy_static;
use url::Url;

use crate::catalog::FacilityRecord;
use crate::localization::Localization;
use crate::menu_action::{MenuAction, FACILITY_TYPE_CLINIC, FACILITY_TYPE_PHARMACY};
use crate::reply::{
    Choice, FacilityBubble, Reply, MAX_CAROUSEL_BUBBLES, MAX_CHOICE_LABEL_CHARS,
    MAX_QUICK_REPLY_ITEMS, MAX_TEXT_RESULTS,
};

lazy_static! {
    static ref MAP_SEARCH_BASE: Url = Url::parse("https://www.google.com/maps/search/")
        .expect("Map search base URL should be valid");
}

/// Choices shown per page once a list no longer fits in one quick reply
const CHOICES_PER_PAGE: usize = MAX_QUICK_REPLY_ITEMS - 1;

/// Map search link for `query`, percent-encoded into the `query` parameter
pub fn map_search_uri(query: &str) -> String {
    let mut url = MAP_SEARCH_BASE.clone();
    url.query_pairs_mut()
        .append_pair("api", "1")
        .append_pair("query", query);
    url.to_string()
}

/// Address when present, otherwise the facility name
fn map_query(record: &FacilityRecord) -> &str {
    record.address().or(record.name()).unwrap_or("")
}

/// Help text for messages the bot does not understand
pub fn help_text(texts: &Localization) -> Reply {
    Reply::text(
        [
            texts.t("help-greeting"),
            format!("{}\n{}", texts.t("help-usage"), texts.t("help-example")),
            texts.t("help-menu"),
        ]
        .join("\n\n"),
    )
}

/// Generic answer for postbacks that cannot be decoded
pub fn fallback_text(texts: &Localization) -> Reply {
    Reply::text(texts.t("fallback"))
}

/// Fixed two-option entry menu
pub fn root_menu(texts: &Localization) -> Reply {
    let choices = [
        ("root-menu-clinic", FACILITY_TYPE_CLINIC),
        ("root-menu-pharmacy", FACILITY_TYPE_PHARMACY),
    ]
    .into_iter()
    .map(|(label_key, facility_type)| Choice {
        label: truncate_label(&texts.t(label_key)),
        data: MenuAction::SelectCity {
            facility_type: Some(facility_type.to_string()),
            page: 0,
        }
        .to_token(),
    })
    .collect();

    Reply::Choices {
        text: texts.t("root-menu-prompt"),
        choices,
    }
}

/// Format one record as a multi-line text block
pub fn format_record_block(texts: &Localization, record: &FacilityRecord) -> String {
    let name = record.name().map(str::to_string).unwrap_or_else(|| texts.t("placeholder-name"));
    let address = record
        .address()
        .map(str::to_string)
        .unwrap_or_else(|| texts.t("placeholder-address"));
    let phone = record
        .phone()
        .map(str::to_string)
        .unwrap_or_else(|| texts.t("placeholder-phone"));
    let uri = map_search_uri(map_query(record));

    [
        texts.t_args("record-name", &[("name", name.as_str())]),
        texts.t_args("record-address", &[("address", address.as_str())]),
        texts.t_args("record-phone", &[("phone", phone.as_str())]),
        texts.t_args("record-map", &[("uri", uri.as_str())]),
    ]
    .join("\n")
}

/// Plain-text answer to a free-text region query
pub fn format_text_results(texts: &Localization, area: &str, records: &[&FacilityRecord]) -> Reply {
    if records.is_empty() {
        return format_query_not_found(texts, area);
    }

    let blocks: Vec<String> = records
        .iter()
        .take(MAX_TEXT_RESULTS)
        .map(|record| format_record_block(texts, record))
        .collect();

    let mut text = format!(
        "{}\n\n{}",
        texts.t_args("query-results-header", &[("area", area)]),
        blocks.join("\n\n")
    );

    if records.len() > MAX_TEXT_RESULTS {
        text.push_str("\n\n");
        text.push_str(&texts.t_args(
            "query-truncated",
            &[
                ("total", records.len().to_string().as_str()),
                ("shown", MAX_TEXT_RESULTS.to_string().as_str()),
            ],
        ));
    }

    Reply::text(text)
}

pub fn format_query_not_found(texts: &Localization, area: &str) -> Reply {
    Reply::text(format!(
        "{}\n{}",
        texts.t_args("query-not-found", &[("area", area)]),
        texts.t("query-not-found-hint")
    ))
}

pub fn format_menu_not_found(texts: &Localization, city: &str, district: &str) -> Reply {
    Reply::text(texts.t_args(
        "menu-not-found",
        &[("city", city), ("district", district)],
    ))
}

/// Quick-reply choice set, one button per non-blank value.
///
/// Lists longer than the platform's quick-reply limit are split into pages;
/// the last button of a full page re-emits `current` with the next page.
pub fn build_choice_set<F>(
    texts: &Localization,
    prompt: String,
    values: &[String],
    current: &MenuAction,
    page: usize,
    to_action: F,
) -> Reply
where
    F: Fn(&str) -> MenuAction,
{
    let values: Vec<&str> = values
        .iter()
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
        .collect();
    let (visible, next_page) = paginate(&values, page);

    let mut choices: Vec<Choice> = visible
        .iter()
        .map(|&value| Choice {
            label: truncate_label(value),
            data: to_action(value).to_token(),
        })
        .collect();

    if let Some(next) = next_page {
        choices.push(Choice {
            label: truncate_label(&texts.t("next-page")),
            data: current.with_page(next).to_token(),
        });
    }

    Reply::Choices {
        text: prompt,
        choices,
    }
}

fn paginate<'a>(values: &'a [&'a str], page: usize) -> (&'a [&'a str], Option<usize>) {
    if values.len() <= MAX_QUICK_REPLY_ITEMS {
        return (values, None);
    }

    let last_page = (values.len() - 1) / CHOICES_PER_PAGE;
    let page = page.min(last_page);
    let start = page * CHOICES_PER_PAGE;
    let end = (start + CHOICES_PER_PAGE).min(values.len());
    let next = (end < values.len()).then_some(page + 1);

    (&values[start..end], next)
}

/// Truncate a button label to the platform limit, counting characters
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_CHOICE_LABEL_CHARS {
        let mut truncated: String = label.chars().take(MAX_CHOICE_LABEL_CHARS - 1).collect();
        truncated.push('…');
        truncated
    } else {
        label.to_string()
    }
}

/// One carousel card for `record`
pub fn facility_bubble(texts: &Localization, record: &FacilityRecord) -> FacilityBubble {
    let address = record
        .address()
        .map(str::to_string)
        .unwrap_or_else(|| texts.t("placeholder-address"));
    let phone = record
        .phone()
        .map(str::to_string)
        .unwrap_or_else(|| texts.t("placeholder-phone"));

    FacilityBubble {
        title: record.name().map(str::to_string).unwrap_or_else(|| texts.t("placeholder-name")),
        address_line: texts.t_args("card-address", &[("address", address.as_str())]),
        phone_line: texts.t_args("card-phone", &[("phone", phone.as_str())]),
        map_button_label: texts.t("card-map-button"),
        map_button_uri: map_search_uri(map_query(record)),
    }
}

/// Carousel of at most [`MAX_CAROUSEL_BUBBLES`] cards
pub fn build_carousel(texts: &Localization, alt_text: String, records: &[&FacilityRecord]) -> Reply {
    Reply::Carousel {
        alt_text,
        bubbles: records
            .iter()
            .take(MAX_CAROUSEL_BUBBLES)
            .map(|record| facility_bubble(texts, record))
            .collect(),
    }
}

//! Menu Flow module driving the city → district → facility selection.
//!
//! The flow keeps no state between requests. Each step is rebuilt from the
//! decoded [`MenuAction`], and every button it emits carries the action
//! token for the following step.

use tracing::debug;

use crate::catalog::CatalogField;
use crate::menu_action::MenuAction;
use crate::reply::Reply;

use super::ui_builder::{build_carousel, build_choice_set, format_menu_not_found, root_menu};
use super::BotContext;

/// Produce the reply for a decoded menu step
pub fn handle_action(ctx: &BotContext, action: &MenuAction) -> Reply {
    match action {
        MenuAction::Root => root_menu(ctx.texts()),
        MenuAction::SelectCity {
            facility_type,
            page,
        } => city_selection(ctx, action, facility_type.as_deref(), *page),
        MenuAction::SelectDistrict {
            city,
            facility_type,
            page,
        } => district_selection(ctx, action, city, facility_type.as_deref(), *page),
        MenuAction::ShowClinics {
            city,
            district,
            facility_type: _,
        } => clinic_results(ctx, city, district),
    }
}

fn city_selection(
    ctx: &BotContext,
    current: &MenuAction,
    facility_type: Option<&str>,
    page: usize,
) -> Reply {
    let texts = ctx.texts();
    let cities = non_blank(ctx.catalog().distinct_values(CatalogField::City, None));
    debug!(cities = cities.len(), facility_type = ?facility_type, "Building city selection");

    if cities.is_empty() {
        return Reply::text(texts.t("no-cities"));
    }

    build_choice_set(
        texts,
        texts.t("select-city-prompt"),
        &cities,
        current,
        page,
        |city| MenuAction::SelectDistrict {
            city: city.to_string(),
            facility_type: facility_type.map(str::to_string),
            page: 0,
        },
    )
}

fn district_selection(
    ctx: &BotContext,
    current: &MenuAction,
    city: &str,
    facility_type: Option<&str>,
    page: usize,
) -> Reply {
    let texts = ctx.texts();
    let districts = non_blank(
        ctx.catalog()
            .distinct_values(CatalogField::District, Some((CatalogField::City, city))),
    );
    debug!(city = %city, districts = districts.len(), "Building district selection");

    if districts.is_empty() {
        return Reply::text(texts.t_args("no-districts", &[("city", city)]));
    }

    build_choice_set(
        texts,
        texts.t_args("select-district-prompt", &[("city", city)]),
        &districts,
        current,
        page,
        |district| MenuAction::ShowClinics {
            city: city.to_string(),
            district: district.to_string(),
            facility_type: facility_type.map(str::to_string),
        },
    )
}

fn clinic_results(ctx: &BotContext, city: &str, district: &str) -> Reply {
    let texts = ctx.texts();
    let records = ctx.catalog().in_district(city, district);
    debug!(city = %city, district = %district, records = records.len(), "Building clinic carousel");

    if records.is_empty() {
        return format_menu_not_found(texts, city, district);
    }

    build_carousel(
        texts,
        texts.t_args("carousel-alt", &[("city", city), ("district", district)]),
        &records,
    )
}

fn non_blank(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}

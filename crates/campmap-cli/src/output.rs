//! Plain-text and JSON rendering for CLI results.

use campmap_core::Campsite;
use campmap_geocode::{GeocodingError, LocationResult};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: String,
}

pub(crate) fn format_location(result: &LocationResult) -> String {
    format!(
        "{} {} [{}] ({:.4}, {:.4})",
        result.icon,
        result.display_name,
        result.feature_category,
        result.latitude,
        result.longitude
    )
}

pub(crate) fn format_campsite(site: &Campsite) -> String {
    let mut line = format!(
        "{} ({}, {} County) ({:.4}, {:.4})",
        site.name, site.facility_type, site.county, site.latitude, site.longitude
    );
    if let Some(url) = &site.website {
        line.push(' ');
        line.push_str(url);
    }
    line
}

pub(crate) fn print_locations(results: &[LocationResult], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }
    if results.is_empty() {
        println!("no matching locations");
    }
    for r in results {
        println!("{}", format_location(r));
    }
    Ok(())
}

pub(crate) fn print_reverse(result: Option<&LocationResult>, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    match result {
        Some(r) => println!("{}", format_location(r)),
        None => println!("no result"),
    }
    Ok(())
}

pub(crate) fn print_campsites(sites: &[&Campsite], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(sites)?);
        return Ok(());
    }
    println!("{} campsite(s)", sites.len());
    for site in sites {
        println!("{}", format_campsite(site));
    }
    Ok(())
}

pub(crate) fn print_error_json(err: &GeocodingError) -> anyhow::Result<()> {
    let body = ErrorBody {
        error: ErrorDetail {
            code: err.code().as_str(),
            message: err.message(),
        },
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

//! The four-day forecast strip and the area forecast discussion.

use crate::feeds::discussion::Discussion;
use crate::feeds::forecast::{Day, Forecast};
use crate::markup::{self, PHOTO_DIR};
use crate::page::{mounts, Page};

pub const DAYS: usize = 4;

const ICON_HEIGHT: u32 = 50;
const ICON_WIDTH: u32 = 50;
const PRECIP_WIDTH: u32 = 65;

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub idx: usize,
    pub day: String,
    pub shortcast: String,
    pub icon: String,
}

impl ForecastRow {
    fn new(idx: usize, day: &Day) -> Self {
        Self {
            idx,
            day: day.day.clone(),
            shortcast: day.shortcast.clone(),
            icon: day.icon.clone(),
        }
    }

    pub fn temperature_image(&self) -> String {
        format!("{PHOTO_DIR}today_temp_plus_{}.svg", self.idx)
    }

    pub fn precipitation_image(&self) -> String {
        format!("{PHOTO_DIR}today_precip_plus_{}.svg", self.idx)
    }

    fn markup(&self) -> String {
        let idx = self.idx;
        let icon = markup::icon_path(&self.icon);
        let temps = self.temperature_image();
        let precip = self.precipitation_image();
        let day = markup::text(&self.day);
        let shortcast = markup::text(&self.shortcast);
        let mut out = String::new();
        out.push_str(&format!(
            r#"<div class="d-flex align-items-center"><span><div class="subheader" id="day{idx}">{day}</div></span></div>"#
        ));
        out.push_str(&format!(
            r#"<div class="d-flex align-items-baseline"><span class="bg-gray forecastDiv mr-3" style="--icon-height: {ICON_HEIGHT}px;"><img id="fc_icon_{idx}" src="{}" alt="weather icon daytime" width="{ICON_WIDTH}" height="{ICON_HEIGHT}"></span>"#,
            html_escape::encode_double_quoted_attribute(&icon)
        ));
        out.push_str(&format!(
            r#"<span class="bg-gray forecastDiv mr-3" style="--icon-height: {ICON_HEIGHT}px;"><img src="{temps}" alt="weather icon today temperatures" width="{ICON_WIDTH}" height="{ICON_HEIGHT}"></span>"#
        ));
        out.push_str(&format!(
            r#"<span class="forecastDiv" style="--icon-height: {ICON_HEIGHT}px;"><img src="{precip}" alt="weather icon today precipitation chances" width="{PRECIP_WIDTH}" height="{ICON_HEIGHT}"></span></div>"#
        ));
        out.push_str(&format!(
            r#"<div class="text-muted" style="font-size: large" id="summaryday{idx}">{shortcast}</div>"#
        ));
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    pub rows: Vec<ForecastRow>,
}

impl ForecastView {
    /// Takes the first four days. A short or broken feed loses just the
    /// affected rows; the rest keep their position.
    pub fn build(doc: &Forecast) -> Self {
        if doc.days.len() < DAYS {
            tracing::warn!(
                "forecast has {} of {DAYS} days; rendering what is there",
                doc.days.len()
            );
        }
        let rows = doc
            .days
            .iter()
            .take(DAYS)
            .enumerate()
            .filter_map(|(idx, entry)| match entry {
                Ok(day) => Some(ForecastRow::new(idx, day)),
                Err(e) => {
                    tracing::warn!("skipping forecast day {idx}: {e}");
                    None
                }
            })
            .collect();
        Self { rows }
    }

    pub fn render(&self, page: &mut Page) {
        for row in &self.rows {
            page.append(mounts::FORECAST, &row.markup());
        }
    }
}

pub fn render_discussion(doc: &Discussion, page: &mut Page) {
    let sections = [
        (mounts::AFD_SHORT_TERM, &doc.short_term),
        (mounts::AFD_LONG_TERM, &doc.long_term),
        (mounts::AFD_LONG_TITLE, &doc.long_title),
        (mounts::AFD_SHORT_TITLE, &doc.short_title),
    ];
    for (mount, text) in sections {
        match text {
            Some(text) => page.append(mount, &markup::text(text)),
            None => tracing::warn!("discussion has nothing for {mount}"),
        }
    }
}

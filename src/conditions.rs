//! Current conditions: the observation table, the icon column and the moon
//! phase, plus the satellite thumbnail.

use crate::feeds::conditions::Conditions;
use crate::feeds::satellite::Satellite;
use crate::markup::{self, svg_icon};
use crate::page::{mounts, Page};
use crate::units::{beaufort, direction, numeric, pressure};

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub label: String,
    pub reading: numeric::Reading,
    pub units: String,
}

impl ObservationRow {
    pub fn display(&self) -> String {
        numeric::with_units(self.reading, &self.units)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionsView {
    pub summary: String,
    pub rows: Vec<ObservationRow>,
    pub cardinal: String,
    pub pressure: String,
    pub weather_icon: String,
    /// Degrees to turn the compass; `None` leaves it unrotated.
    pub compass_rotation: Option<f64>,
    pub beaufort_icon: String,
    pub moon_icon: String,
}

impl ConditionsView {
    pub fn build(doc: &Conditions) -> Self {
        let mut rows = Vec::new();
        for (key, observation) in doc.observations() {
            match observation {
                Ok(obs) => rows.push(ObservationRow {
                    label: obs.label.clone(),
                    reading: numeric::round(obs.value),
                    units: obs.units.clone(),
                }),
                Err(e) => tracing::warn!("skipping {key} row: {e}"),
            }
        }

        let cardinal = match doc.wind_cardinal.as_deref() {
            Some(c) if !c.trim().is_empty() => c.to_string(),
            _ => doc
                .wind_direction
                .value
                .map(|deg| format!("Out of the {}", direction::degree_to_compass(deg)))
                .unwrap_or_else(|| numeric::SENTINEL.to_string()),
        };

        Self {
            summary: doc
                .textdescription
                .clone()
                .unwrap_or_else(|| numeric::SENTINEL.to_string()),
            rows,
            cardinal,
            pressure: pressure::format(doc.pressure.value, &doc.pressure.units),
            weather_icon: icon_or_na(doc.weather_icon.as_deref()),
            compass_rotation: doc.wind_direction.value.map(direction::compass_rotation),
            beaufort_icon: beaufort::icon(doc.beaufort),
            moon_icon: icon_or_na(doc.moon_icon.as_deref()),
        }
    }

    pub fn render(&self, page: &mut Page) {
        let left = self.observation_table();
        let right = self.icon_column();
        page.append(
            mounts::CURRENT_CONDITIONS,
            &format!(
                r#"<table id="table0"><tr><td id="cc_col1">{left}</td><td>&nbsp;&nbsp;</td><td id="cc_col2">{right}</td></tr></table>"#
            ),
        );
        page.append(
            mounts::MOON_PHASE,
            &svg_icon(&self.moon_icon, "current_moon_phase", 30, 30),
        );
    }

    fn observation_table(&self) -> String {
        let mut table = String::from(r#"<table id="table1" style="font-size: large">"#);
        table.push_str(&row("Currently:", &self.summary));
        for obs in &self.rows {
            table.push_str(&row(&obs.label, &obs.display()));
        }
        table.push_str(&row("Wind", &self.cardinal));
        table.push_str(&row("Pressure", &self.pressure));
        table.push_str("</table>");
        table
    }

    fn icon_column(&self) -> String {
        let transform = match self.compass_rotation {
            Some(deg) => format!(r#" style="transform: rotate({deg}deg)""#),
            None => String::new(),
        };
        format!(
            concat!(
                r#"<table id="table2" align="right">"#,
                r#"<tr><td id="weather_icon_here">{}</td></tr>"#,
                r#"<tr><td id="wind_direction_icon_here"{}>{}</td></tr>"#,
                r#"<tr><td id="beaufort_icon">{}</td></tr>"#,
                "</table>"
            ),
            svg_icon(&self.weather_icon, "current_weather_icon", 70, 70),
            transform,
            svg_icon("compass.svg", "current_wind_direction", 70, 50),
            svg_icon(&self.beaufort_icon, "current_wind_speed", 70, 70),
        )
    }
}

fn row(label: &str, value: &str) -> String {
    format!(
        r#"<tr><td>{}</td><td class="paddedCells">{}</td></tr>"#,
        markup::text(label),
        markup::text(value)
    )
}

fn icon_or_na(icon: Option<&str>) -> String {
    match icon {
        Some(icon) if !icon.is_empty() => icon.to_string(),
        _ => beaufort::NOT_AVAILABLE.to_string(),
    }
}

/// The satellite feed is already markup; it goes in untouched.
pub fn render_satellite(doc: &Satellite, page: &mut Page) {
    page.append(mounts::SATELLITE, &doc.image_html);
}

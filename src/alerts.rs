//! Hazardous weather outlook, badges, and the alert, warning and watch
//! lists.

use crate::feeds::alerts::{Alerts, Bulletin, Watch};
use crate::feeds::Entry;
use crate::markup::{self, icon_image, svg_icon};
use crate::page::{mounts, Page};

pub const NO_SPOTTER: &str = "Spotter activation is not expected at this time.";
const WATCH_ICON: &str = "watch.svg";
const DEFAULT_WATCH_ICON: &str = "wi-thunderstorm.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    Normal,
    Elevated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Spotter,
    Alert,
    Watch,
}

impl Badge {
    pub fn mount(&self) -> &'static str {
        match self {
            Badge::Spotter => mounts::HWO_BADGE,
            Badge::Alert => mounts::ALERT_BADGE,
            Badge::Watch => mounts::WATCH_BADGE,
        }
    }

    pub fn class(&self, state: BadgeState) -> &'static str {
        match (self, state) {
            (_, BadgeState::Normal) => "badge bg-green",
            (Badge::Watch, BadgeState::Elevated) => "badge bg-orange",
            (_, BadgeState::Elevated) => "badge bg-yellow",
        }
    }

    /// Text shown on the badge when it is raised.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Badge::Spotter => None,
            Badge::Alert => Some("Alert"),
            Badge::Watch => Some("Watch"),
        }
    }
}

/// Where a watch shows up besides its own block in the watch list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Both alert-icon mounts, plus the event name in the summary line.
    Observed,
    /// Only the first alert-icon mount.
    Likely,
    None,
}

impl Placement {
    pub fn of(severity: &str, certainty: &str) -> Self {
        match (severity, certainty) {
            ("Severe", "Observed") => Placement::Observed,
            ("Severe", "Likely") => Placement::Likely,
            _ => Placement::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub icon: String,
    pub event_type: String,
    pub summary: String,
}

impl From<&Bulletin> for Card {
    fn from(b: &Bulletin) -> Self {
        Self {
            icon: b.alert_icon.clone(),
            event_type: b.event_type.clone(),
            summary: b.summary.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WatchBlock {
    pub card: Card,
    pub placement: Placement,
}

impl From<&Watch> for WatchBlock {
    fn from(w: &Watch) -> Self {
        let icon = match w.alert_icon.as_deref() {
            Some(icon) if !icon.is_empty() => icon.to_string(),
            _ => DEFAULT_WATCH_ICON.to_string(),
        };
        Self {
            card: Card {
                icon,
                event_type: w.event_type.clone(),
                summary: w.summary.clone(),
            },
            placement: Placement::of(&w.severity, &w.certainty),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertsView {
    /// Day-one outlook as `(label, content)`.
    pub outlook: Option<(String, String)>,
    pub spotter: BadgeState,
    /// Spotter statement text, shown while spotters are activated.
    pub spotter_statement: Option<String>,
    pub alert: BadgeState,
    pub watch: BadgeState,
    pub alerts: Vec<Card>,
    /// `None` unless the feed flags warnings; each card keeps its feed index.
    pub warnings: Option<Vec<(usize, Card)>>,
    pub watches: Vec<WatchBlock>,
}

impl AlertsView {
    pub fn build(doc: &Alerts) -> Self {
        let flags = doc.flags;
        let raised = |flag: bool| {
            if flag {
                BadgeState::Elevated
            } else {
                BadgeState::Normal
            }
        };

        let outlook = match &doc.hwo.dayone {
            Ok(pair) => Some(pair.clone()),
            Err(e) => {
                tracing::warn!("skipping day one outlook: {e}");
                None
            }
        };
        let spotter_statement = if flags.has_spotter {
            doc.hwo.spotter.as_ref().ok().map(|(_, text)| text.clone())
        } else {
            None
        };

        let alerts = if flags.has_alerts {
            valid(&doc.alert, "alert").map(|(_, b)| Card::from(b)).collect()
        } else {
            Vec::new()
        };
        let warnings = flags.has_warnings.then(|| {
            valid(&doc.warn, "warning")
                .map(|(i, b)| (i, Card::from(b)))
                .collect()
        });
        let watches = valid(&doc.watch, "watch").map(|(_, w)| WatchBlock::from(w)).collect();

        Self {
            outlook,
            spotter: raised(flags.has_spotter),
            spotter_statement,
            alert: raised(flags.has_alerts),
            watch: raised(flags.has_watches),
            alerts,
            warnings,
            watches,
        }
    }

    pub fn render(&self, page: &mut Page) {
        if let Some((label, content)) = &self.outlook {
            page.append(mounts::HWO_LABEL, &markup::text(label));
            page.append(mounts::HWO_CONTENT, &markup::text(content));
        }

        self.render_badge(page, Badge::Spotter, self.spotter);
        match (self.spotter, &self.spotter_statement) {
            (BadgeState::Normal, _) => page.append(mounts::HWO_SPOTTER, NO_SPOTTER),
            (BadgeState::Elevated, Some(text)) => {
                page.append(mounts::HWO_SPOTTER, &markup::text(text))
            }
            (BadgeState::Elevated, None) => {}
        }

        self.render_badge(page, Badge::Alert, self.alert);
        for (i, card) in self.alerts.iter().enumerate() {
            page.append(mounts::ALERT_ENTRIES, &alert_card(card, i));
        }

        self.render_badge(page, Badge::Watch, self.watch);

        if let Some(warnings) = &self.warnings {
            let cards: String = warnings.iter().map(|(i, card)| warning_card(card, *i)).collect();
            page.replace(
                mounts::WARNINGS_ROW,
                &format!(r#"<div class="col-sm-9" id="warnings_row_container">{cards}</div>"#),
            );
        }

        for watch in &self.watches {
            page.append(mounts::WATCH_ENTRIES, &watch_block(&watch.card));
            match watch.placement {
                Placement::Observed => {
                    let icon = icon_image(WATCH_ICON, "weather watch icon");
                    page.append(mounts::ALERT_ICONS, &icon);
                    page.append(mounts::WARNING_ALERTS, &icon);
                    page.append(
                        mounts::WARNING_ALERTS,
                        &format!("{}<br>", markup::text(&watch.card.event_type)),
                    );
                }
                Placement::Likely => {
                    page.append(mounts::ALERT_ICONS, &icon_image(WATCH_ICON, "weather watch icon"));
                }
                Placement::None => {}
            }
        }
    }

    fn render_badge(&self, page: &mut Page, badge: Badge, state: BadgeState) {
        page.set_class(badge.mount(), badge.class(state));
        if let (BadgeState::Elevated, Some(label)) = (state, badge.label()) {
            page.append(badge.mount(), label);
        }
    }
}

/// Valid entries with their position in the feed; bad ones are logged.
fn valid<'a, T>(
    entries: &'a [Entry<T>],
    kind: &'a str,
) -> impl Iterator<Item = (usize, &'a T)> + 'a {
    entries
        .iter()
        .enumerate()
        .filter_map(move |(i, entry)| match entry {
            Ok(item) => Some((i, item)),
            Err(e) => {
                tracing::warn!("skipping {kind} #{i}: {e}");
                None
            }
        })
}

fn alert_card(card: &Card, idx: usize) -> String {
    format!(
        r#"<div class="modal-body"><table><tr><td>{}</td><td><h4>{}:</h4></td></tr></table>{}</div>"#,
        svg_icon(&card.icon, &format!("alert{idx}"), 40, 40),
        markup::text(&card.event_type),
        markup::text(&card.summary),
    )
}

fn warning_card(card: &Card, idx: usize) -> String {
    format!(
        r#"<div class="alert alert-danger" role="alert"><table><tr><td>{}</td><td><h3>{}:</h3></td></tr></table>{}</div>"#,
        svg_icon(&card.icon, &format!("warning{idx}"), 40, 40),
        markup::text(&card.event_type),
        markup::text(&card.summary),
    )
}

fn watch_block(card: &Card) -> String {
    format!(
        r#"<div class="alert alert-warning" role="alert">{}<h3>{}</h3><br>{}</div>"#,
        icon_image(&card.icon, "watch icon"),
        markup::text(&card.event_type),
        markup::text(&card.summary),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn bulletin(event: &str) -> Value {
        json!({"event_type": event, "summary": format!("{event} in effect."), "alert_icon": "warning.svg"})
    }

    fn watch(event: &str, severity: &str, certainty: &str) -> Value {
        json!({
            "event_type": event,
            "summary": "Conditions are favorable.",
            "alert_icon": "wi-thunderstorm.svg",
            "severity": severity,
            "certainty": certainty,
        })
    }

    fn render(doc: Value) -> Page {
        let doc: Alerts = serde_json::from_value(doc).unwrap();
        let mut page = Page::new();
        AlertsView::build(&doc).render(&mut page);
        page
    }

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_quiet_day() {
        let page = render(json!({
            "hwo": {
                "dayone": ["Hazardous Weather Outlook", "No hazardous weather is expected."],
                "spotter": ["Spotter Information Statement", ""],
            },
            "flags": {"has_spotter": false, "has_alerts": false, "has_watches": false, "has_warnings": false},
            "alert": [],
            "warn": [],
            "watch": [],
        }));

        assert_eq!(page.html(mounts::HWO_LABEL), "Hazardous Weather Outlook");
        assert_eq!(page.html(mounts::HWO_CONTENT), "No hazardous weather is expected.");
        assert_eq!(page.class(mounts::HWO_BADGE), Some("badge bg-green"));
        assert_eq!(page.html(mounts::HWO_SPOTTER), NO_SPOTTER);
        assert_eq!(page.class(mounts::ALERT_BADGE), Some("badge bg-green"));
        assert_eq!(page.html(mounts::ALERT_BADGE), "");
        assert_eq!(page.class(mounts::WATCH_BADGE), Some("badge bg-green"));
        assert!(page.mount(mounts::WARNINGS_ROW).is_none());
        assert_eq!(page.html(mounts::WATCH_ENTRIES), "");
    }

    #[test]
    fn test_raised_badges() {
        let page = render(json!({
            "hwo": {
                "dayone": ["Outlook", "Storms possible."],
                "spotter": ["Spotter Information Statement", "Spotters may be needed tonight."],
            },
            "flags": {"has_spotter": true, "has_alerts": true, "has_watches": true},
            "alert": [bulletin("Special Weather Statement"), bulletin("Air Quality Alert")],
        }));

        assert_eq!(page.class(mounts::HWO_BADGE), Some("badge bg-yellow"));
        assert_eq!(page.html(mounts::HWO_SPOTTER), "Spotters may be needed tonight.");
        assert_eq!(page.class(mounts::ALERT_BADGE), Some("badge bg-yellow"));
        assert_eq!(page.html(mounts::ALERT_BADGE), "Alert");
        assert_eq!(page.class(mounts::WATCH_BADGE), Some("badge bg-orange"));
        assert_eq!(page.html(mounts::WATCH_BADGE), "Watch");

        let entries = page.html(mounts::ALERT_ENTRIES);
        assert_eq!(count(entries, r#"<div class="modal-body">"#), 2);
        let first = entries.find("Special Weather Statement:").unwrap();
        let second = entries.find("Air Quality Alert:").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_warnings_need_the_flag() {
        let page = render(json!({
            "hwo": {"dayone": ["Outlook", "Windy."]},
            "flags": {"has_warnings": false},
            "warn": [bulletin("High Wind Warning")],
        }));
        assert!(page.mount(mounts::WARNINGS_ROW).is_none());
        assert!(!page.html(mounts::WARNINGS_ROW).contains("warnings_row_container"));
    }

    #[test]
    fn test_warning_cards_get_distinct_ids() {
        let page = render(json!({
            "hwo": {"dayone": ["Outlook", "Snow."]},
            "flags": {"has_warnings": true},
            "warn": [
                bulletin("Blizzard Warning"),
                bulletin("Ice Storm Warning"),
                bulletin("Wind Chill Warning"),
            ],
        }));

        let row = page.mount(mounts::WARNINGS_ROW).unwrap();
        assert!(row.replaced);
        assert!(row.html.starts_with(r#"<div class="col-sm-9" id="warnings_row_container">"#));
        assert_eq!(count(&row.html, r#"<div class="alert alert-danger" role="alert">"#), 3);
        for id in ["warning0", "warning1", "warning2"] {
            assert_eq!(count(&row.html, &format!(r#"id="{id}""#)), 1);
        }
    }

    #[test]
    fn test_bad_warning_keeps_the_rest() {
        let page = render(json!({
            "hwo": {"dayone": ["Outlook", "Snow."]},
            "flags": {"has_warnings": true},
            "warn": [bulletin("Blizzard Warning"), {"summary": "broken"}, bulletin("Ice Storm Warning")],
        }));

        let row = page.html(mounts::WARNINGS_ROW);
        assert_eq!(count(row, "alert-danger"), 2);
        assert!(row.contains(r#"id="warning0""#));
        assert!(row.contains(r#"id="warning2""#));
        assert!(!row.contains("broken"));
    }

    #[test]
    fn test_watches_render_without_flag() {
        let page = render(json!({
            "hwo": {"dayone": ["Outlook", "Storms."]},
            "flags": {"has_watches": false},
            "watch": [watch("Severe Thunderstorm Watch", "Moderate", "Possible")],
        }));

        assert_eq!(page.class(mounts::WATCH_BADGE), Some("badge bg-green"));
        let entries = page.html(mounts::WATCH_ENTRIES);
        assert_eq!(count(entries, "alert-warning"), 1);
        assert!(entries.contains("<h3>Severe Thunderstorm Watch</h3><br>Conditions are favorable."));
    }

    #[test]
    fn test_watch_icon_placement() {
        let page = render(json!({
            "hwo": {"dayone": ["Outlook", "Storms."]},
            "flags": {"has_watches": true},
            "watch": [
                watch("Tornado Watch", "Severe", "Observed"),
                watch("Flood Watch", "Severe", "Likely"),
                watch("Freeze Watch", "Minor", "Observed"),
            ],
        }));

        let icons = page.html(mounts::ALERT_ICONS);
        let warning_alerts = page.html(mounts::WARNING_ALERTS);
        assert_eq!(count(icons, "watch.svg"), 2);
        assert_eq!(count(warning_alerts, "watch.svg"), 1);
        assert!(warning_alerts.ends_with("Tornado Watch<br>"));
        assert!(!warning_alerts.contains("Flood Watch"));
        assert!(!warning_alerts.contains("Freeze Watch"));
        assert_eq!(count(page.html(mounts::WATCH_ENTRIES), "alert-warning"), 3);
    }

    #[test]
    fn test_placement_rules() {
        assert_eq!(Placement::of("Severe", "Observed"), Placement::Observed);
        assert_eq!(Placement::of("Severe", "Likely"), Placement::Likely);
        assert_eq!(Placement::of("Severe", "Possible"), Placement::None);
        assert_eq!(Placement::of("Minor", "Observed"), Placement::None);
        assert_eq!(Placement::of("Minor", "Likely"), Placement::None);
    }

    #[test]
    fn test_missing_outlook_is_one_row() {
        let page = render(json!({
            "flags": {"has_alerts": true},
            "alert": [bulletin("Special Weather Statement")],
        }));

        assert!(page.mount(mounts::HWO_LABEL).is_none());
        assert_eq!(page.html(mounts::HWO_SPOTTER), NO_SPOTTER);
        assert_eq!(count(page.html(mounts::ALERT_ENTRIES), "modal-body"), 1);
    }

    #[test]
    fn test_watch_without_icon_falls_back() {
        let page = render(json!({
            "hwo": {"dayone": ["Outlook", "Storms."]},
            "watch": [{"event_type": "Flood Watch", "summary": "Rivers rising."}],
        }));
        assert!(page.html(mounts::WATCH_ENTRIES).contains("wi-thunderstorm.svg"));
    }
}

//! Runs the three pipelines side by side. Each section either renders in
//! full or stays empty; one failed feed never touches another section.

use chrono::{DateTime, Local};
use reqwest::Client;

use crate::alerts::AlertsView;
use crate::conditions::{self, ConditionsView};
use crate::feeds::alerts::Alerts;
use crate::feeds::conditions::Conditions;
use crate::feeds::discussion::Discussion;
use crate::feeds::forecast::Forecast;
use crate::feeds::satellite::Satellite;
use crate::feeds::{Fetched, FeedError};
use crate::forecast::{self, ForecastView};
use crate::page::Page;

/// Everything one page load pulled from the server.
#[derive(Debug)]
pub struct Feeds {
    pub conditions: Fetched<Conditions>,
    pub satellite: Fetched<Satellite>,
    pub alerts: Fetched<Alerts>,
    pub forecast: Fetched<Forecast>,
    pub discussion: Fetched<Discussion>,
    pub fetched_at: DateTime<Local>,
}

impl Feeds {
    pub async fn fetch(client: &Client, server: &str) -> Self {
        let (conditions, satellite, alerts, forecast, discussion) = tokio::join!(
            Conditions::from_server(client, server),
            Satellite::from_server(client, server),
            Alerts::from_server(client, server),
            Forecast::from_server(client, server),
            Discussion::from_server(client, server),
        );
        let fetched_at = Local::now();
        tracing::info!("fetched feeds from {server} at {}", fetched_at.format("%H:%M:%S"));
        Self {
            conditions,
            satellite,
            alerts,
            forecast,
            discussion,
            fetched_at,
        }
    }

    pub fn render(&self) -> Page {
        let mut page = Page::new();
        section(&mut page, "current conditions", &self.conditions, |doc, page| {
            ConditionsView::build(doc).render(page)
        });
        section(&mut page, "satellite", &self.satellite, conditions::render_satellite);
        section(&mut page, "alerts", &self.alerts, |doc, page| {
            AlertsView::build(doc).render(page)
        });
        section(&mut page, "forecast", &self.forecast, |doc, page| {
            ForecastView::build(doc).render(page)
        });
        section(&mut page, "forecast discussion", &self.discussion, forecast::render_discussion);
        page
    }
}

fn section<T>(page: &mut Page, name: &str, feed: &Fetched<T>, render: impl FnOnce(&T, &mut Page)) {
    match feed {
        Ok(doc) => {
            let mut part = Page::new();
            render(doc, &mut part);
            page.merge(part);
        }
        Err(e) => log_failure(name, e),
    }
}

fn log_failure(name: &str, e: &FeedError) {
    tracing::error!("{name}: {e}; leaving section empty");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::mounts;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn healthy_server() -> MockServer {
        let server = MockServer::start().await;
        serve(
            &server,
            "/satellite",
            ResponseTemplate::new(200).set_body_json(json!({"image_html": "<img src=\"goes.jpg\">"})),
        )
        .await;
        serve(
            &server,
            "/alerts",
            ResponseTemplate::new(200).set_body_json(json!({
                "hwo": {"dayone": ["Outlook", "Nothing expected."], "spotter": ["Spotter", ""]},
                "flags": {"has_spotter": false, "has_alerts": false, "has_watches": false, "has_warnings": false},
                "alert": [], "warn": [], "watch": [],
            })),
        )
        .await;
        serve(
            &server,
            "/forecast",
            ResponseTemplate::new(200).set_body_json(json!([
                {"day": "Mon", "shortcast": "Sunny", "icon": "wi-day-sunny.svg"},
                {"day": "Tue", "shortcast": "Sunny", "icon": "wi-day-sunny.svg"},
                {"day": "Wed", "shortcast": "Rain", "icon": "wi-rain.svg"},
                {"day": "Thu", "shortcast": "Rain", "icon": "wi-rain.svg"},
            ])),
        )
        .await;
        serve(
            &server,
            "/afd",
            ResponseTemplate::new(200).set_body_json(json!({
                "short_term": "Dry.", "long_term": "Wet.",
                "short_title": "SHORT TERM", "long_title": "LONG TERM",
            })),
        )
        .await;
        server
    }

    #[tokio::test]
    async fn test_failed_conditions_leave_others_rendering() {
        let server = healthy_server().await;
        serve(&server, "/current_conditions", ResponseTemplate::new(500)).await;

        let client = Client::new();
        let feeds = Feeds::fetch(&client, &server.uri()).await;
        assert!(matches!(feeds.conditions, Err(FeedError::Status(s)) if s.as_u16() == 500));

        let page = feeds.render();
        assert!(page.mount(mounts::CURRENT_CONDITIONS).is_none());
        assert!(page.mount(mounts::MOON_PHASE).is_none());
        assert_eq!(page.html(mounts::SATELLITE), "<img src=\"goes.jpg\">");
        assert_eq!(page.html(mounts::HWO_CONTENT), "Nothing expected.");
        assert!(page.html(mounts::FORECAST).contains(r#"id="summaryday3""#));
        assert_eq!(page.html(mounts::AFD_LONG_TERM), "Wet.");
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_decode_failure() {
        let server = healthy_server().await;
        serve(
            &server,
            "/current_conditions",
            ResponseTemplate::new(200).set_body_string("{\"temperature\": "),
        )
        .await;

        let client = Client::new();
        let feeds = Feeds::fetch(&client, &server.uri()).await;
        assert!(matches!(feeds.conditions, Err(FeedError::Decode(_))));
        assert!(feeds.alerts.is_ok());
        assert!(feeds.render().mount(mounts::CURRENT_CONDITIONS).is_none());
    }

    #[tokio::test]
    async fn test_only_200_counts() {
        let server = healthy_server().await;
        serve(
            &server,
            "/current_conditions",
            ResponseTemplate::new(201).set_body_json(json!({"textdescription": "Clear"})),
        )
        .await;

        let client = Client::new();
        let feeds = Feeds::fetch(&client, &server.uri()).await;
        assert!(matches!(feeds.conditions, Err(FeedError::Status(_))));
    }

    #[tokio::test]
    async fn test_full_page_into_default_shell() {
        let server = healthy_server().await;
        serve(
            &server,
            "/current_conditions",
            ResponseTemplate::new(200).set_body_json(json!({
                "textdescription": "Clear",
                "temperature": {"label": "Temperature", "value": 68.4, "units": "F"},
                "pressure": {"value": 30.1, "units": "inHg"},
                "wind_direction": {"value": 90},
                "beaufort": "2",
                "weather_icon": "wi-day-sunny.svg",
                "moon_icon": "wi-moon-new.svg",
            })),
        )
        .await;

        let client = Client::new();
        let html = Feeds::fetch(&client, &server.uri())
            .await
            .render()
            .apply(crate::page::DEFAULT_SHELL);

        assert!(html.contains(r#"<td class="paddedCells">68 F</td>"#));
        assert!(html.contains(r#"<td class="paddedCells">30.10 inHg</td>"#));
        assert!(html.contains("wi-wind-beaufort-2.svg"));
        assert!(html.contains(r#"<span class="badge bg-green" id="hwo_badge"></span>"#));
        assert!(html.contains(r#"<p id="hwo_spotter">Spotter activation is not expected at this time.</p>"#));
        assert!(html.contains(r#"<pre id="afd1">Dry.</pre>"#));
    }
}

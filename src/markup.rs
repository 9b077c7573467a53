//! Small builders for the markup fragments the renderers emit.

use html_escape::{encode_double_quoted_attribute, encode_text};

pub const ICON_DIR: &str = "static/icons/weather-icons-master/svg/";
pub const PHOTO_DIR: &str = "static/photos/";

/// Escapes feed text for use as element content.
pub fn text(s: &str) -> String {
    encode_text(s).into_owned()
}

/// An `<object>` embedding one of the weather SVG icons.
pub fn svg_icon(icon: &str, id: &str, width: u32, height: u32) -> String {
    format!(
        r#"<object id="{}" data="{}" width="{width}" height="{height}" type="image/svg+xml"></object>"#,
        encode_double_quoted_attribute(id),
        encode_double_quoted_attribute(&icon_path(icon)),
    )
}

/// A 40x40 `<img>` of one of the weather SVG icons.
pub fn icon_image(icon: &str, alt: &str) -> String {
    format!(
        r#"<img alt="{}" src="{}" width="40" height="40">"#,
        encode_double_quoted_attribute(alt),
        encode_double_quoted_attribute(&icon_path(icon)),
    )
}

pub fn icon_path(icon: &str) -> String {
    format!("{ICON_DIR}{icon}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_icon() {
        assert_eq!(
            svg_icon("compass.svg", "current_wind_direction", 70, 50),
            r#"<object id="current_wind_direction" data="static/icons/weather-icons-master/svg/compass.svg" width="70" height="50" type="image/svg+xml"></object>"#
        );
    }

    #[test]
    fn test_feed_text_is_escaped() {
        assert_eq!(text("Wind < 5 & calm"), "Wind &lt; 5 &amp; calm");
        assert!(icon_image("a\"b.svg", "x").contains(r#"src="static/icons/weather-icons-master/svg/a&quot;b.svg""#));
    }
}

//! The page the dashboard draws into: a fixed set of mount points, each
//! identified by an element id in the HTML shell.

use std::collections::BTreeMap;
use std::ops::Range;

pub const DEFAULT_SHELL: &str = include_str!("../assets/dashboard.html");

pub mod mounts {
    pub const CURRENT_CONDITIONS: &str = "currentConditions";
    pub const MOON_PHASE: &str = "moonphase";
    pub const SATELLITE: &str = "sat_image_thumb";

    pub const HWO_LABEL: &str = "hwo_dayonelabel";
    pub const HWO_CONTENT: &str = "hwo_dayonecontent";
    pub const HWO_BADGE: &str = "hwo_badge";
    pub const HWO_SPOTTER: &str = "hwo_spotter";
    pub const ALERT_BADGE: &str = "alert_badge";
    pub const ALERT_ENTRIES: &str = "alerts_entries";
    pub const WATCH_BADGE: &str = "watch_badge";
    pub const WATCH_ENTRIES: &str = "watch_entries";
    pub const WARNINGS_ROW: &str = "warnings_row";
    pub const ALERT_ICONS: &str = "alert_icon_placeholder";
    pub const WARNING_ALERTS: &str = "warning_alerts";

    pub const FORECAST: &str = "allforecast";
    pub const AFD_SHORT_TERM: &str = "afd1";
    pub const AFD_LONG_TERM: &str = "afd2";
    pub const AFD_SHORT_TITLE: &str = "short-term-forecast-header";
    pub const AFD_LONG_TITLE: &str = "long-term-forecast-header";
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Mount {
    pub class: Option<String>,
    pub html: String,
    /// The shell's own content is dropped rather than appended to.
    pub replaced: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Page {
    mounts: BTreeMap<String, Mount>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, id: &str, fragment: &str) {
        self.entry(id).html.push_str(fragment);
    }

    pub fn replace(&mut self, id: &str, fragment: &str) {
        let mount = self.entry(id);
        mount.html = fragment.to_string();
        mount.replaced = true;
    }

    pub fn set_class(&mut self, id: &str, class: &str) {
        self.entry(id).class = Some(class.to_string());
    }

    pub fn mount(&self, id: &str) -> Option<&Mount> {
        self.mounts.get(id)
    }

    /// Markup written to a mount, or "" if it was never touched.
    pub fn html(&self, id: &str) -> &str {
        self.mounts.get(id).map_or("", |m| m.html.as_str())
    }

    pub fn class(&self, id: &str) -> Option<&str> {
        self.mounts.get(id).and_then(|m| m.class.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.mounts.keys().map(String::as_str)
    }

    /// Folds another page's mutations into this one, in order.
    pub fn merge(&mut self, other: Page) {
        for (id, theirs) in other.mounts {
            let mine = self.entry(&id);
            if theirs.replaced {
                mine.html = theirs.html;
                mine.replaced = true;
            } else {
                mine.html.push_str(&theirs.html);
            }
            if theirs.class.is_some() {
                mine.class = theirs.class;
            }
        }
    }

    /// Writes every mount into the shell. Elements are found in the shell
    /// as given, so ids inside inserted fragments never capture a mount.
    /// Mounts the shell does not define are logged and left out.
    pub fn apply(&self, shell: &str) -> String {
        let mut located = Vec::new();
        for (id, mount) in &self.mounts {
            match locate(shell, id) {
                Some(element) => located.push((id, element, mount)),
                None => tracing::warn!("page shell has no element with id \"{id}\"; skipping"),
            }
        }

        let replaced: Vec<Range<usize>> = located
            .iter()
            .filter(|(_, _, mount)| mount.replaced)
            .map(|(_, element, _)| element.open_end + 1..element.close_start)
            .collect();

        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        for (id, element, mount) in &located {
            if replaced.iter().any(|r| r.contains(&element.open_start)) {
                tracing::warn!("\"{id}\" sits inside a replaced mount; skipping");
                continue;
            }
            if let Some(ref class) = mount.class {
                let open = &shell[element.open_start..=element.open_end];
                edits.push((element.open_start..element.open_end + 1, with_class(open, class)));
            }
            if mount.replaced {
                edits.push((element.open_end + 1..element.close_start, mount.html.clone()));
            } else {
                edits.push((element.close_start..element.close_start, mount.html.clone()));
            }
        }

        // Back to front, so earlier offsets stay valid.
        edits.sort_by(|a, b| (b.0.start, b.0.end).cmp(&(a.0.start, a.0.end)));
        let mut out = shell.to_string();
        for (range, text) in edits {
            out.replace_range(range, &text);
        }
        out
    }

    fn entry(&mut self, id: &str) -> &mut Mount {
        self.mounts.entry(id.to_string()).or_default()
    }
}

/// Byte offsets of one element in the shell: `open_start..=open_end` is the
/// opening tag, `close_start` is where the matching closing tag begins.
#[derive(Debug, PartialEq, Eq)]
struct Element {
    open_start: usize,
    open_end: usize,
    close_start: usize,
}

const VOID_TAGS: [&str; 8] = ["area", "br", "col", "embed", "hr", "img", "input", "meta"];

fn locate(html: &str, id: &str) -> Option<Element> {
    let needle = format!("id=\"{id}\"");
    let mut from = 0;
    while let Some(found) = html[from..].find(&needle) {
        let at = from + found;
        from = at + needle.len();

        if !html[..at].ends_with(|c: char| c.is_ascii_whitespace()) {
            continue;
        }
        let Some(open_start) = html[..at].rfind('<') else {
            continue;
        };
        if html[open_start..at].contains('>') {
            continue;
        }
        let open_end = at + html[at..].find('>')?;
        let tag: String = html[open_start + 1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if tag.is_empty() || VOID_TAGS.contains(&tag.as_str()) || html[..open_end].ends_with('/') {
            return None;
        }
        let close_start = closing_tag(html, &tag, open_end + 1)?;
        return Some(Element {
            open_start,
            open_end,
            close_start,
        });
    }
    None
}

/// Finds the `</tag>` closing the element whose content starts at `from`,
/// stepping over nested elements of the same name.
fn closing_tag(html: &str, tag: &str, from: usize) -> Option<usize> {
    let opener = format!("<{tag}");
    let closer = format!("</{tag}");
    let mut depth = 0usize;
    let mut pos = from;
    loop {
        let next_close = find_tag(html, pos, html.len(), &closer, |c| c == '>')?;
        let next_open = find_tag(html, pos, next_close, &opener, |c| c == '>' || c == '/');
        match next_open {
            Some(open) => {
                depth += 1;
                pos = open + opener.len();
            }
            None if depth == 0 => return Some(next_close),
            None => {
                depth -= 1;
                pos = next_close + closer.len();
            }
        }
    }
}

/// First `pattern` in `html[from..to]` that ends on a tag-name boundary, so
/// `</b` never matches `</body>`.
fn find_tag(
    html: &str,
    from: usize,
    to: usize,
    pattern: &str,
    ends_name: impl Fn(char) -> bool,
) -> Option<usize> {
    html[from..to]
        .match_indices(pattern)
        .map(|(i, _)| from + i)
        .find(|&i| {
            html[i + pattern.len()..]
                .starts_with(|c: char| c.is_ascii_whitespace() || ends_name(c))
        })
}

fn with_class(open: &str, class: &str) -> String {
    if let Some(start) = open.find(" class=\"") {
        let value_start = start + " class=\"".len();
        if let Some(len) = open[value_start..].find('"') {
            return format!("{}{class}{}", &open[..value_start], &open[value_start + len..]);
        }
    }
    let name_end = 1 + open[1..]
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(open.len() - 1);
    format!("{} class=\"{class}\"{}", &open[..name_end], &open[name_end..])
}

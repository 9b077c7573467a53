use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

use crate::feeds::DEFAULT_SERVER;

const ABOUT: &str = "Weather dashboard page builder";

const LONG_ABOUT: &str = "
Builds the weather dashboard page from the local weather feed server.

Current conditions, satellite imagery, alerts, the forecast and the area forecast discussion are
fetched at the same time. Each one fills its own part of the page; a feed that fails leaves only
its own section empty.

The page is written into an HTML shell that defines the mount points by element id. Without
--shell the built-in shell is used. With --preview nothing is written and the dashboard is shown
in the terminal instead (q quits, r fetches again).
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(
        short,
        long,
        env = "WX_DASHBOARD_SERVER",
        default_value = DEFAULT_SERVER,
        help = "Base URL of the weather feed server"
    )]
    pub server: String,

    #[arg(long, help = "HTML shell to render into (defaults to the built-in page)")]
    pub shell: Option<PathBuf>,

    #[arg(
        short,
        long,
        default_value = "dashboard.html",
        help = "Where to write the page, or - for stdout"
    )]
    pub output: PathBuf,

    #[arg(short, long, help = "Show the dashboard in the terminal instead of writing HTML")]
    pub preview: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["wx-dashboard"]).unwrap();
        assert_eq!(args.output, PathBuf::from("dashboard.html"));
        assert!(args.shell.is_none());
        assert!(!args.preview);
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "wx-dashboard",
            "--server",
            "http://localhost:5000",
            "--shell",
            "index.html",
            "-o",
            "-",
            "--preview",
        ])
        .unwrap();
        assert_eq!(args.server, "http://localhost:5000");
        assert_eq!(args.shell, Some(PathBuf::from("index.html")));
        assert_eq!(args.output, PathBuf::from("-"));
        assert!(args.preview);
    }
}

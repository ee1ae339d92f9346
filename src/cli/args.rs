use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "notefeed",
    version,
    about = "terminal note-feed viewer",
    long_about = "Notefeed is a terminal viewer for note feeds: it loads notes from a note service once at startup and appends placeholder cards as you scroll, until the configured cap is reached.\n\nExamples:\n  notefeed\n  notefeed -u http://127.0.0.1:8000/ -b 4 -k 666\n  notefeed --once --scrolls 3 -o feed.json\n\nTip: Use --config to persist viewer settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        short = 'n',
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'u',
        long = "u",
        visible_aliases = ["url", "endpoint"],
        value_name = "URL",
        help_heading = "Input",
        help = "Note service base URL (defaults to http://127.0.0.1:8000/)."
    )]
    pub endpoint: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.notefeed/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "nf",
        visible_alias = "no-fetch",
        help_heading = "Input",
        help = "Skip the startup note fetch and begin with an empty feed."
    )]
    pub no_fetch: bool,

    #[arg(
        short = 'b',
        long = "bs",
        visible_alias = "batch-size",
        value_name = "N",
        help_heading = "Feed",
        help = "Cards appended per scroll-triggered batch."
    )]
    pub batch_size: Option<usize>,

    #[arg(
        short = 'k',
        long = "cap",
        value_name = "N",
        help_heading = "Feed",
        help = "Suppress scroll-triggered batches once the counter passes this value (0 = no cap)."
    )]
    pub cap: Option<usize>,

    #[arg(
        short = 'e',
        long = "tol",
        visible_alias = "tolerance",
        value_name = "ROWS",
        help_heading = "Feed",
        help = "Bottom-edge tolerance in rows (0 or 1)."
    )]
    pub tolerance: Option<usize>,

    #[arg(
        short = 's',
        long = "ss",
        visible_alias = "scroll-step",
        value_name = "ROWS",
        help_heading = "Feed",
        help = "Rows scrolled per key press or wheel tick."
    )]
    pub scroll_step: Option<usize>,

    #[arg(
        long = "vh",
        visible_alias = "viewport-height",
        value_name = "ROWS",
        help_heading = "Feed",
        help = "Viewport height in rows for headless runs."
    )]
    pub viewport_height: Option<usize>,

    #[arg(
        long = "once",
        help_heading = "Mode",
        help = "Build the feed headlessly, print it, and exit."
    )]
    pub once: bool,

    #[arg(
        long = "sc",
        visible_alias = "scrolls",
        value_name = "N",
        help_heading = "Mode",
        help = "Scroll-to-bottom events to simulate in headless mode."
    )]
    pub scrolls: Option<usize>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds (no timeout unless set)."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'p',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'H',
        long = "hdr",
        visible_alias = "header",
        value_name = "HEADER",
        help_heading = "HTTP",
        help = "Add a header to all requests (format: 'Key: Value')."
    )]
    pub header: Option<String>,

    #[arg(
        short = 'F',
        long = "frd",
        visible_alias = "follow-redirects",
        help_heading = "HTTP",
        help = "Follow HTTP redirects."
    )]
    pub follow_redirects: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the final feed to a file."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'A',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output format (text or json)."
    )]
    pub output_format: Option<String>,
}

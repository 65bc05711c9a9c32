use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color as TableColor, Table};
use hearth::{
    ActionResult, Comment, FeedPost, NotificationKind, NotificationView, Post, PostDeletion, Profile, Resolution,
    Suggestion, ToggleState, User, UserSummary,
};
use serde::Serialize;

use crate::theme::{ICONS, THEME};
use crate::utils::{format_datetime, truncate};

const PREVIEW_WIDTH: usize = 48;

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// Data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// One row of a listing; `Vec<T>` of these renders as a table
pub trait TableRow {
    fn headers() -> &'static [&'static str];
    fn cells(&self, options: &GlobalOptions) -> Vec<Cell>;
    fn compact(&self) -> String;
}

fn themed_table(options: &GlobalOptions) -> Table {
    let mut table = Table::new();
    if options.no_color {
        table.load_preset(comfy_table::presets::ASCII_FULL);
    } else {
        table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
    }
    table
}

fn header_cells(headers: &[&str], options: &GlobalOptions) -> Vec<Cell> {
    headers
        .iter()
        .map(|h| {
            let cell = Cell::new(h).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(TableColor::Cyan) }
        })
        .collect()
}

fn key_value_table(rows: Vec<(&str, String)>, options: &GlobalOptions) -> Table {
    let mut table = themed_table(options);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    /// Display a session result. JSON output prints the `{ok, ...}` envelope itself;
    /// other formats print the data, or the error and fail.
    pub fn action<T>(&self, result: ActionResult<T>) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if matches!(self.options.output_format, OutputFormat::Json) {
            if !self.options.quiet {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            return match result {
                ActionResult::Ok { .. } => Ok(()),
                ActionResult::Err { error_kind, .. } => anyhow::bail!("{error_kind}"),
            };
        }

        match result {
            ActionResult::Ok { data, .. } => self.display(&data),
            ActionResult::Err {
                error_kind, message, ..
            } => {
                self.error(&format!("{error_kind}: {message}"));
                if error_kind.is_retryable() {
                    self.info("The store may be unavailable; retrying can help.");
                }
                anyhow::bail!("{error_kind}")
            }
        }
    }

    /// Display a success message with color and icon
    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.success)
            } else {
                format!("{} {}", ICONS.success.color(THEME.success), message.color(THEME.success))
            };
            println!("{output}");
        }
    }

    /// Display an error message with color and icon
    pub fn error(&self, message: &str) {
        let output = if self.options.no_color {
            format!("{} {message}", ICONS.error)
        } else {
            format!("{} {}", ICONS.error.color(THEME.error), message.color(THEME.error))
        };
        eprintln!("{output}");
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.warning)
            } else {
                format!("{} {}", ICONS.warning.color(THEME.warning), message.color(THEME.warning))
            };
            println!("{output}");
        }
    }

    /// Display verbose information (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.options.verbose && !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.arrow)
            } else {
                format!("{} {}", ICONS.arrow.color(THEME.muted), message.color(THEME.muted))
            };
            eprintln!("{output}");
        }
    }

    /// Display info message with color and icon
    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("{} {message}", ICONS.info)
            } else {
                format!("{} {}", ICONS.info.color(THEME.info), message.color(THEME.info))
            };
            println!("{output}");
        }
    }

    /// Display a heading (suppressed for JSON so the output stays parseable)
    pub fn heading(&self, text: &str) {
        if self.options.quiet || matches!(self.options.output_format, OutputFormat::Json) {
            return;
        }
        let output = if self.options.no_color {
            format!("\n{text}\n{}", "=".repeat(text.chars().count()))
        } else {
            format!("\n{}", text.color(THEME.primary).bold())
        };
        println!("{output}");
    }

    /// Display a bullet list item
    pub fn bullet(&self, text: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("  {} {text}", ICONS.bullet)
            } else {
                format!("  {} {text}", ICONS.bullet.color(THEME.muted))
            };
            println!("{output}");
        }
    }
}

impl<T> TableDisplay for Vec<T>
where
    T: TableRow,
{
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = themed_table(options);

        if self.is_empty() {
            table.add_row(vec![Cell::new("No items found")]);
            return table;
        }

        table.set_header(header_cells(T::headers(), options));
        for item in self {
            table.add_row(item.cells(options));
        }
        table
    }

    fn to_compact(&self) -> String {
        if self.is_empty() {
            return "Count: 0".to_string();
        }
        self.iter().map(TableRow::compact).collect::<Vec<_>>().join("\n")
    }
}

impl TableRow for FeedPost {
    fn headers() -> &'static [&'static str] {
        &["Post", "Author", "Content", "Likes", "Comments", "Created"]
    }

    fn cells(&self, options: &GlobalOptions) -> Vec<Cell> {
        let mut content = truncate(&self.content, PREVIEW_WIDTH);
        if self.image.is_some() {
            content = format!("{content} [image]").trim().to_string();
        }
        let likes = Cell::new(format!("{} {}", ICONS.heart, self.like_count));
        vec![
            Cell::new(&self.id),
            Cell::new(format!("@{}", self.author.handle)),
            Cell::new(content),
            if options.no_color || self.like_count == 0 {
                likes
            } else {
                likes.fg(TableColor::Red)
            },
            Cell::new(format!("{} {}", ICONS.comment, self.comment_count)),
            Cell::new(format_datetime(self.created_at)),
        ]
    }

    fn compact(&self) -> String {
        format!(
            "{} @{} likes={} comments={} {}",
            self.id,
            self.author.handle,
            self.like_count,
            self.comment_count,
            truncate(&self.content, PREVIEW_WIDTH)
        )
    }
}

fn describe_notification(view: &NotificationView) -> String {
    let actor = view.actor.display_name();
    match view.kind {
        NotificationKind::Like => format!("{actor} liked your post"),
        NotificationKind::Comment => match &view.comment {
            Some(comment) => format!("{actor} commented: {}", truncate(&comment.content, PREVIEW_WIDTH)),
            None => format!("{actor} commented on your post"),
        },
        NotificationKind::Follow => format!("{actor} started following you"),
    }
}

impl TableRow for NotificationView {
    fn headers() -> &'static [&'static str] {
        &["", "Id", "Kind", "Activity", "Post", "When"]
    }

    fn cells(&self, options: &GlobalOptions) -> Vec<Cell> {
        let marker = if self.read {
            Cell::new(" ")
        } else if options.no_color {
            Cell::new(ICONS.unread)
        } else {
            Cell::new(ICONS.unread).fg(TableColor::Red)
        };
        let icon = match self.kind {
            NotificationKind::Like => ICONS.heart,
            NotificationKind::Comment => ICONS.comment,
            NotificationKind::Follow => ICONS.follow,
        };
        vec![
            marker,
            Cell::new(&self.id),
            Cell::new(format!("{icon} {}", self.kind.as_str())),
            Cell::new(describe_notification(self)),
            Cell::new(
                self.post
                    .as_ref()
                    .map(|post| truncate(&post.content, PREVIEW_WIDTH / 2))
                    .unwrap_or_default(),
            ),
            Cell::new(format_datetime(self.created_at)),
        ]
    }

    fn compact(&self) -> String {
        let state = if self.read { "read" } else { "unread" };
        format!("{} {} {state} {}", self.id, self.kind.as_str(), describe_notification(self))
    }
}

impl TableRow for Suggestion {
    fn headers() -> &'static [&'static str] {
        &["Id", "Handle", "Name", "Followers"]
    }

    fn cells(&self, _options: &GlobalOptions) -> Vec<Cell> {
        vec![
            Cell::new(&self.user.id),
            Cell::new(format!("@{}", self.user.handle)),
            Cell::new(self.user.display_name()),
            Cell::new(self.follower_count),
        ]
    }

    fn compact(&self) -> String {
        format!("@{} followers={}", self.user.handle, self.follower_count)
    }
}

impl TableRow for UserSummary {
    fn headers() -> &'static [&'static str] {
        &["Id", "Handle", "Name"]
    }

    fn cells(&self, _options: &GlobalOptions) -> Vec<Cell> {
        vec![
            Cell::new(&self.id),
            Cell::new(format!("@{}", self.handle)),
            Cell::new(self.display_name()),
        ]
    }

    fn compact(&self) -> String {
        format!("{} @{}", self.id, self.handle)
    }
}

fn user_rows(user: &User) -> Vec<(&'static str, String)> {
    vec![
        ("Id", user.id.clone()),
        ("Handle", format!("@{}", user.handle)),
        ("Name", user.name.clone()),
        ("Email", optional(&user.email)),
        ("Bio", optional(&user.bio)),
        ("Location", optional(&user.location)),
        ("Website", optional(&user.website)),
        ("Joined", format_datetime(user.created_at)),
    ]
}

impl TableDisplay for User {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        key_value_table(user_rows(self), options)
    }

    fn to_compact(&self) -> String {
        format!("{} @{}", self.id, self.handle)
    }
}

impl TableDisplay for Resolution {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut rows = user_rows(&self.user);
        rows.push(("Created", if self.created { "yes" } else { "no (existing)" }.to_string()));
        key_value_table(rows, options)
    }

    fn to_compact(&self) -> String {
        format!("{} @{} created={}", self.user.id, self.user.handle, self.created)
    }
}

impl TableDisplay for Profile {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut rows = user_rows(&self.user);
        rows.push(("Posts", self.post_count.to_string()));
        rows.push(("Followers", self.follower_count.to_string()));
        rows.push(("Following", self.following_count.to_string()));
        key_value_table(rows, options)
    }

    fn to_compact(&self) -> String {
        format!(
            "@{} posts={} followers={} following={}",
            self.user.handle, self.post_count, self.follower_count, self.following_count
        )
    }
}

impl TableDisplay for Post {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        key_value_table(
            vec![
                ("Id", self.id.clone()),
                ("Author", self.author_id.clone()),
                ("Content", self.content.clone()),
                ("Image", optional(&self.image)),
                ("Created", format_datetime(self.created_at)),
            ],
            options,
        )
    }

    fn to_compact(&self) -> String {
        self.id.clone()
    }
}

impl TableDisplay for Comment {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        key_value_table(
            vec![
                ("Id", self.id.clone()),
                ("Post", self.post_id.clone()),
                ("Author", self.author_id.clone()),
                ("Content", self.content.clone()),
                ("Created", format_datetime(self.created_at)),
            ],
            options,
        )
    }

    fn to_compact(&self) -> String {
        self.id.clone()
    }
}

impl TableDisplay for PostDeletion {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        key_value_table(
            vec![
                ("Notifications removed", self.notifications.to_string()),
                ("Comments removed", self.comments.to_string()),
                ("Likes removed", self.likes.to_string()),
            ],
            options,
        )
    }

    fn to_compact(&self) -> String {
        format!(
            "notifications={} comments={} likes={}",
            self.notifications, self.comments, self.likes
        )
    }
}

impl TableDisplay for ToggleState {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        key_value_table(vec![("State", self.to_compact())], options)
    }

    fn to_compact(&self) -> String {
        if self.is_on() { "on" } else { "off" }.to_string()
    }
}

impl TableDisplay for u64 {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        key_value_table(vec![("Count", self.to_string())], options)
    }

    fn to_compact(&self) -> String {
        self.to_string()
    }
}

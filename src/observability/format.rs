//! Access line rendering.
//!
//! A line is eight columns joined by `" | "`:
//!
//! ```text
//! timestamp | request-id | status | elapsed | remote | swatch | method | uri
//! ```
//!
//! Timestamp and remote address are left-justified, elapsed is
//! right-justified. A value that does not fit its column is cut to its first
//! ten characters whatever the column width, so overlong values stay
//! recognisable in existing log tooling.

use std::sync::Arc;
use std::time::Duration;

use crate::observability::context::RequestContext;
use crate::observability::paint::{Paint, Painter, PlainPainter};

/// `DD/MM/YYYY - HH:MM:SS.fffffffff`
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y - %H:%M:%S%.9f";

pub const TIMESTAMP_WIDTH: usize = 32;
pub const ELAPSED_WIDTH: usize = 14;
pub const REMOTE_WIDTH: usize = 24;

/// Characters kept from a value that overflows its column.
const OVERFLOW_KEEP: usize = 10;

const SEPARATOR: &str = " | ";

/// Left-justify `value` in a column of `width` characters.
pub fn pad_right(value: &str, width: usize) -> String {
    if value.chars().count() >= width {
        return overflow(value);
    }
    format!("{value:<width$}")
}

/// Right-justify `value` in a column of `width` characters.
pub fn pad_left(value: &str, width: usize) -> String {
    if value.chars().count() >= width {
        return overflow(value);
    }
    format!("{value:>width$}")
}

fn overflow(value: &str) -> String {
    value.chars().take(OVERFLOW_KEEP).collect()
}

/// `" <code> "`, painted for the codes that have a category.
pub fn status_badge(status: u16, painter: &dyn Painter) -> String {
    let badge = format!(" {status} ");
    match Paint::for_status(status) {
        Some(paint) => painter.paint(&badge, paint),
        None => badge,
    }
}

/// Two-space swatch, painted for the methods that have a category.
pub fn method_swatch(method: &str, painter: &dyn Painter) -> String {
    match Paint::for_method(method) {
        Some(paint) => painter.paint("  ", paint),
        None => "  ".to_string(),
    }
}

/// Which optional columns a line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOptions {
    pub include_request_id: bool,
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            include_request_id: true,
        }
    }
}

/// Renders one access line per request.
#[derive(Clone)]
pub struct RequestLogFormatter {
    painter: Arc<dyn Painter>,
    options: LineOptions,
}

impl RequestLogFormatter {
    pub fn new(painter: Arc<dyn Painter>, options: LineOptions) -> Self {
        Self { painter, options }
    }

    /// Formatter without colors.
    pub fn plain(options: LineOptions) -> Self {
        Self::new(Arc::new(PlainPainter), options)
    }

    pub fn options(&self) -> LineOptions {
        self.options
    }

    /// Render the line, newline included.
    pub fn format(&self, ctx: &RequestContext, status: u16, elapsed: Duration) -> String {
        let timestamp = ctx.started_at.format(TIMESTAMP_FORMAT).to_string();
        let painter = self.painter.as_ref();

        let mut columns = Vec::with_capacity(8);
        columns.push(pad_right(&timestamp, TIMESTAMP_WIDTH));
        if self.options.include_request_id {
            columns.push(ctx.request_id.clone().unwrap_or_default());
        }
        columns.push(status_badge(status, painter));
        columns.push(pad_left(&format!("{elapsed:?}"), ELAPSED_WIDTH));
        columns.push(pad_right(&ctx.remote_address(), REMOTE_WIDTH));
        columns.push(method_swatch(&ctx.method, painter));
        columns.push(ctx.method.clone());
        columns.push(ctx.target.clone());

        let mut line = columns.join(SEPARATOR);
        line.push('\n');
        line
    }
}

impl std::fmt::Debug for RequestLogFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLogFormatter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::paint::AnsiPainter;
    use axum::http::Request;
    use chrono::NaiveDateTime;

    fn context(method: &str, uri: &str, peer: &str) -> RequestContext {
        let request = Request::builder().method(method).uri(uri).body(()).unwrap();
        RequestContext::capture(&request, Some(peer.parse().unwrap()))
    }

    #[test]
    fn pad_right_appends_spaces() {
        assert_eq!(pad_right("abc", 10), "abc       ");
        assert_eq!(pad_right("abc", 10).len(), 10);
    }

    #[test]
    fn pad_left_prepends_spaces() {
        assert_eq!(pad_left("abc", 10), "       abc");
    }

    #[test]
    fn overflow_keeps_first_ten_characters() {
        let long = "0123456789abcdefghijklmnopqrstuvwxyz";
        assert_eq!(pad_right(long, 24), "0123456789");
        assert_eq!(pad_left(long, 14), "0123456789");
        assert_eq!(pad_right(long, 3), "0123456789");
        assert_eq!(pad_left(long, 36), "0123456789");
    }

    #[test]
    fn exact_width_counts_as_overflow() {
        assert_eq!(pad_right("abcdefghijkl", 12), "abcdefghij");
        assert_eq!(pad_left("abcde", 5), "abcde");
    }

    #[test]
    fn padding_counts_characters() {
        assert_eq!(pad_left("9.42µs", 14), "        9.42µs");
        assert_eq!(pad_left("9.42µs", 14).chars().count(), 14);
    }

    #[test]
    fn uncategorised_status_and_method_stay_plain() {
        let painter = AnsiPainter;
        assert_eq!(status_badge(500, &painter), " 500 ");
        assert_eq!(method_swatch("PATCH", &painter), "  ");
    }

    #[test]
    fn categorised_status_is_painted() {
        let painter = AnsiPainter;
        let badge = status_badge(404, &painter);
        assert_ne!(badge, " 404 ");
        assert!(badge.contains(" 404 "));
    }

    #[test]
    fn line_has_eight_columns_in_order() {
        let mut ctx = context("GET", "/health", "10.0.0.5:443");
        ctx.started_at = NaiveDateTime::parse_from_str(
            "2024-03-07 09:05:01.000000042",
            "%Y-%m-%d %H:%M:%S%.f",
        )
        .unwrap()
        .and_local_timezone(chrono::Local)
        .unwrap();

        let formatter = RequestLogFormatter::plain(LineOptions::default());
        let line = formatter.format(&ctx, 200, Duration::from_nanos(9_420));

        assert!(line.ends_with('\n'));
        let columns: Vec<&str> = line.trim_end_matches('\n').split(" | ").collect();
        assert_eq!(columns.len(), 8);
        assert_eq!(columns[0], "07/03/2024 - 09:05:01.000000042 ");
        assert_eq!(columns[1], "");
        assert_eq!(columns[2], " 200 ");
        assert_eq!(columns[3], "        9.42µs");
        assert_eq!(columns[4], format!("{:<24}", "10.0.0.5:443"));
        assert_eq!(columns[5], "  ");
        assert_eq!(columns[6], "GET");
        assert_eq!(columns[7], "/health");
    }

    #[test]
    fn request_id_column_can_be_dropped() {
        let mut ctx = context("POST", "/items", "127.0.0.1:9000");
        ctx.request_id = Some("req-1".into());

        let with_id = RequestLogFormatter::plain(LineOptions::default())
            .format(&ctx, 201, Duration::from_millis(3));
        assert_eq!(with_id.split(" | ").nth(1), Some("req-1"));

        let without_id = RequestLogFormatter::plain(LineOptions {
            include_request_id: false,
        })
        .format(&ctx, 201, Duration::from_millis(3));
        let columns: Vec<&str> = without_id.trim_end().split(" | ").collect();
        assert_eq!(columns.len(), 7);
        assert_eq!(columns[1], " 201 ");
        assert!(!without_id.contains("req-1"));
    }

    #[test]
    fn colored_line_paints_status_and_method() {
        let ctx = context("GET", "/", "127.0.0.1:1");
        let formatter = RequestLogFormatter::new(Arc::new(AnsiPainter), LineOptions::default());
        let line = formatter.format(&ctx, 200, Duration::from_millis(1));

        assert!(line.contains(&AnsiPainter.paint(" 200 ", Paint::Ok)));
        assert!(line.contains(&AnsiPainter.paint("  ", Paint::Get)));
    }
}

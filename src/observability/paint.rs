//! Terminal colors for access lines.
//!
//! # Responsibilities
//! - Map a semantic category (status class, method) to a decorated string
//! - Keep ANSI escapes out of the formatter so it can be tested plainly
//!
//! # Design Decisions
//! - `Painter` is injected; `PlainPainter` is used for non-terminals and tests
//! - `ColorMode::Auto` resolves against stdout once, at construction

use std::io::IsTerminal;
use std::sync::Arc;

use nu_ansi_term::{Color, Style};

use crate::config::ColorMode;

/// Semantic category of a painted fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// 200 OK badge.
    Ok,
    /// 301 Moved Permanently badge.
    MovedPermanently,
    /// 304 Not Modified badge.
    NotModified,
    /// 404 Not Found badge.
    NotFound,
    /// GET method swatch.
    Get,
    /// POST method swatch.
    Post,
    /// DELETE method swatch.
    Delete,
    /// HEAD method swatch.
    Head,
}

impl Paint {
    /// Category for a status code, if it has one.
    pub fn for_status(status: u16) -> Option<Self> {
        match status {
            200 => Some(Paint::Ok),
            301 => Some(Paint::MovedPermanently),
            304 => Some(Paint::NotModified),
            404 => Some(Paint::NotFound),
            _ => None,
        }
    }

    /// Category for a request method, if it has one. Matching is exact.
    pub fn for_method(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(Paint::Get),
            "POST" => Some(Paint::Post),
            "DELETE" => Some(Paint::Delete),
            "HEAD" => Some(Paint::Head),
            _ => None,
        }
    }
}

/// Decorates text for a given category.
pub trait Painter: Send + Sync {
    fn paint(&self, text: &str, paint: Paint) -> String;
}

/// Leaves text untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainPainter;

impl Painter for PlainPainter {
    fn paint(&self, text: &str, _paint: Paint) -> String {
        text.to_string()
    }
}

/// ANSI escape sequences: highlighted status badges, background method swatches.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiPainter;

impl AnsiPainter {
    fn style(paint: Paint) -> Style {
        match paint {
            Paint::Ok => Color::White.on(Color::Green),
            Paint::MovedPermanently => Color::Black.on(Color::Yellow),
            Paint::NotModified => Color::White.on(Color::Magenta),
            Paint::NotFound => Color::White.on(Color::Red),
            Paint::Get => Style::new().on(Color::Blue),
            Paint::Post => Style::new().on(Color::Green),
            Paint::Delete => Style::new().on(Color::Red),
            Paint::Head => Style::new().on(Color::Yellow),
        }
    }
}

impl Painter for AnsiPainter {
    fn paint(&self, text: &str, paint: Paint) -> String {
        Self::style(paint).paint(text).to_string()
    }
}

/// Resolve a color mode into a painter.
pub fn painter_for(mode: ColorMode) -> Arc<dyn Painter> {
    let colored = match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::io::stdout().is_terminal(),
    };

    if colored {
        Arc::new(AnsiPainter)
    } else {
        Arc::new(PlainPainter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ansi_styles_match_categories() {
        let expected = [
            (Paint::Ok, Color::White.on(Color::Green)),
            (Paint::MovedPermanently, Color::Black.on(Color::Yellow)),
            (Paint::NotModified, Color::White.on(Color::Magenta)),
            (Paint::NotFound, Color::White.on(Color::Red)),
            (Paint::Get, Style::new().on(Color::Blue)),
            (Paint::Post, Style::new().on(Color::Green)),
            (Paint::Delete, Style::new().on(Color::Red)),
            (Paint::Head, Style::new().on(Color::Yellow)),
        ];
        for (paint, style) in expected {
            assert_eq!(AnsiPainter::style(paint), style, "{paint:?}");
        }
    }

    #[test]
    fn blue_background_for_get() {
        let swatch = AnsiPainter.paint("  ", Paint::Get);
        assert_eq!(swatch, "\x1b[44m  \x1b[0m");
    }

    #[test]
    fn status_categories() {
        assert_eq!(Paint::for_status(200), Some(Paint::Ok));
        assert_eq!(Paint::for_status(301), Some(Paint::MovedPermanently));
        assert_eq!(Paint::for_status(304), Some(Paint::NotModified));
        assert_eq!(Paint::for_status(404), Some(Paint::NotFound));
        assert_eq!(Paint::for_status(201), None);
        assert_eq!(Paint::for_status(500), None);
    }

    #[test]
    fn method_categories_are_case_sensitive() {
        assert_eq!(Paint::for_method("GET"), Some(Paint::Get));
        assert_eq!(Paint::for_method("HEAD"), Some(Paint::Head));
        assert_eq!(Paint::for_method("get"), None);
        assert_eq!(Paint::for_method("PATCH"), None);
    }

    #[test]
    fn ansi_painter_wraps_text_in_escapes() {
        let painted = AnsiPainter.paint(" 200 ", Paint::Ok);
        assert!(painted.starts_with("\u{1b}["));
        assert!(painted.contains(" 200 "));
        assert!(painted.ends_with("\u{1b}[0m"));
    }

    #[test]
    fn plain_painter_is_identity() {
        assert_eq!(PlainPainter.paint("  ", Paint::Delete), "  ");
    }

    #[test]
    fn forced_modes() {
        let never = painter_for(ColorMode::Never);
        assert_eq!(never.paint(" 404 ", Paint::NotFound), " 404 ");

        let always = painter_for(ColorMode::Always);
        assert_ne!(always.paint(" 404 ", Paint::NotFound), " 404 ");
    }
}

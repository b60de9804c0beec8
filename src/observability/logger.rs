//! Request logger: formatter plus output, shared by both adapters.

use std::sync::Arc;

use crate::config::{OutputMode, RequestLogConfig};
use crate::observability::context::RequestContext;
use crate::observability::format::{LineOptions, RequestLogFormatter};
use crate::observability::output::{LogSink, StdoutSink, TracingSink};
use crate::observability::paint::painter_for;

/// Emits exactly one access line per finished request.
#[derive(Clone)]
pub struct RequestLogger {
    formatter: RequestLogFormatter,
    sink: Arc<dyn LogSink>,
}

impl RequestLogger {
    pub fn new(formatter: RequestLogFormatter, sink: Arc<dyn LogSink>) -> Self {
        Self { formatter, sink }
    }

    /// Build from config. `default_request_id` applies when the config does
    /// not say whether the request id column is shown.
    pub fn from_config(config: &RequestLogConfig, default_request_id: bool) -> Self {
        let options = LineOptions {
            include_request_id: config.include_request_id.unwrap_or(default_request_id),
        };
        let sink: Arc<dyn LogSink> = match config.output {
            OutputMode::Stdout => Arc::new(StdoutSink::new()),
            OutputMode::Tracing => Arc::new(TracingSink),
        };

        Self::new(
            RequestLogFormatter::new(painter_for(config.color), options),
            sink,
        )
    }

    pub fn formatter(&self) -> &RequestLogFormatter {
        &self.formatter
    }

    /// Log a finished request with its final status.
    pub fn log(&self, ctx: &RequestContext, status: u16) {
        let line = self.formatter.format(ctx, status, ctx.elapsed());
        self.sink.write_line(&line);
    }
}

impl std::fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLogger")
            .field("formatter", &self.formatter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorMode;
    use crate::observability::output::MemorySink;
    use axum::http::Request;

    #[test]
    fn logs_one_line_per_call() {
        let sink = Arc::new(MemorySink::new());
        let logger = RequestLogger::new(
            RequestLogFormatter::plain(LineOptions::default()),
            sink.clone(),
        );

        let request = Request::builder().uri("/a").body(()).unwrap();
        let ctx = RequestContext::capture(&request, Some("127.0.0.1:1".parse().unwrap()));
        logger.log(&ctx, 304);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" |  304  | "));
        assert!(lines[0].ends_with(" | GET | /a\n"));
    }

    #[test]
    fn config_overrides_adapter_default() {
        let config = RequestLogConfig {
            color: ColorMode::Never,
            include_request_id: Some(false),
            ..RequestLogConfig::default()
        };
        let logger = RequestLogger::from_config(&config, true);
        assert!(!logger.formatter().options().include_request_id);

        let logger = RequestLogger::from_config(&RequestLogConfig::default(), true);
        assert!(logger.formatter().options().include_request_id);
    }
}

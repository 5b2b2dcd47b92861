use crate::config::LoggerConfigFormat;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;
use tracing_subscriber::{
  fmt::{self, format::FmtSpan, time::UtcTime},
  Layer,
};

pub type BoxedLoggerLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builds the formatting layer for the global subscriber.
///
/// `filter` uses the `EnvFilter` directive syntax, e.g. `info,graphql_plugin=debug`.
pub fn build_logger(
  format: &LoggerConfigFormat,
  filter: &str,
  print_performance_info: bool,
) -> Result<BoxedLoggerLayer, tracing_subscriber::filter::ParseError> {
  let timer = UtcTime::rfc_3339();
  let filter = EnvFilter::try_new(filter)?;
  let performance_spans = match print_performance_info {
    true => FmtSpan::CLOSE,
    false => FmtSpan::NONE,
  };

  Ok(match format {
    LoggerConfigFormat::Json => fmt::Layer::<Registry>::default()
      .json()
      .with_timer(timer)
      .with_span_events(performance_spans)
      .with_filter(filter)
      .boxed(),
    LoggerConfigFormat::Pretty => fmt::Layer::<Registry>::default()
      .pretty()
      .with_timer(timer)
      .with_span_events(performance_spans)
      .with_filter(filter)
      .boxed(),
    LoggerConfigFormat::Compact => fmt::Layer::<Registry>::default()
      .compact()
      .with_timer(timer)
      .with_span_events(performance_spans)
      .with_filter(filter)
      .boxed(),
  })
}

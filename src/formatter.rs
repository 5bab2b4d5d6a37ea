//! Log line formatter that stamps every event with the simulation tick it happened in.
//!
//! The tick comes from the `tick` field of the closest enclosing span, which [`TickLayer`] records when
//! the span is created. Events outside any tick span print a blank stamp.

use std::fmt;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second].[subsecond digits:3]");

/// `HH:MM:SS.mmm t=000123 LEVEL target: fields`
pub struct TickFormatter;

impl<S, N> FormatEvent<S, N> for TickFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(&self, ctx: &FmtContext<'_, S, N>, mut writer: Writer<'_>, event: &Event<'_>) -> fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let stamp = OffsetDateTime::now_utc().format(&TIMESTAMP_FORMAT).map_err(|_| fmt::Error)?;
        let tick = ctx
            .event_scope()
            .and_then(|mut scope| {
                scope.find_map(|span| {
                    let extensions = span.extensions();
                    extensions.get::<TickStamp>().map(|stamp| stamp.0)
                })
            })
            .map_or_else(|| "t=------".to_string(), |tick| format!("t={tick:06}"));
        if ansi {
            write!(writer, "\x1b[2m{stamp} {tick}\x1b[0m ")?;
        } else {
            write!(writer, "{stamp} {tick} ")?;
        }

        write_level(&mut writer, meta.level(), ansi)?;

        if ansi {
            write!(writer, " \x1b[2m{}:\x1b[0m ", meta.target())?;
        } else {
            write!(writer, " {}: ", meta.target())?;
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn write_level(writer: &mut Writer<'_>, level: &Level, ansi: bool) -> fmt::Result {
    let (color, text) = match *level {
        Level::TRACE => ("\x1b[35m", "TRACE"),
        Level::DEBUG => ("\x1b[34m", "DEBUG"),
        Level::INFO => ("\x1b[32m", " INFO"),
        Level::WARN => ("\x1b[33m", " WARN"),
        Level::ERROR => ("\x1b[31m", "ERROR"),
    };
    if ansi {
        write!(writer, "{color}{text}\x1b[0m")
    } else {
        writer.write_str(text)
    }
}

/// Span extension holding the tick a span was opened for.
struct TickStamp(u64);

#[derive(Default)]
struct TickVisitor(Option<u64>);

impl Visit for TickVisitor {
    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "tick" {
            self.0 = Some(value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "tick" {
            self.0 = u64::try_from(value).ok();
        }
    }

    fn record_debug(&mut self, _field: &Field, _value: &dyn fmt::Debug) {}
}

/// Stores the `tick` field of new spans so [`TickFormatter`] can stamp the events inside them.
pub struct TickLayer;

impl<S> Layer<S> for TickLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = TickVisitor::default();
        attrs.record(&mut visitor);
        if let (Some(tick), Some(span)) = (visitor.0, ctx.span(id)) {
            span.extensions_mut().insert(TickStamp(tick));
        }
    }
}

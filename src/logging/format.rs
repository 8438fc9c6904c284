use colored::Color;
use std::fmt;
use std::fmt::Write;
use std::fmt::{Debug, Display};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

/// Single-line event format:
///
/// `[12:00:01.123 INF] tally::routes@<trace_id>{span fields}: message key=value`
pub(super) struct Formatter {
    use_colors: bool,
}

impl Formatter {
    pub(super) fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let now = chrono::Local::now();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let mut trace_id = String::new();
        let mut span_fields = String::new();
        for span in ctx
            .event_scope()
            .into_iter()
            .flat_map(tracing_subscriber::registry::Scope::from_root)
        {
            let exts = span.extensions();
            let Some(fields) = exts.get::<FormattedFields<N>>() else {
                continue;
            };
            if fields.is_empty() {
                continue;
            }
            if let Some(id) = fields.strip_prefix("trace_id=") {
                write!(trace_id, "@{id}")?;
                continue;
            }
            span_fields.push(if span_fields.is_empty() { '{' } else { ' ' });
            span_fields.push_str(fields);
        }
        if !span_fields.is_empty() {
            span_fields.push('}');
        }
        let location = format!("{}{}{}:", meta.target(), trace_id, span_fields);
        if self.use_colors {
            write!(
                writer,
                "[{} {}] {} {}",
                ColoredText::bright_black(now.format("%X%.3f")),
                LevelLabel::new(meta.level(), true),
                ColoredText::bright_black(location),
                visitor
            )?;
        } else {
            write!(
                writer,
                "[{} {}] {} {}",
                now.format("%F %X%.3f"),
                LevelLabel::new(meta.level(), false),
                location,
                visitor
            )?;
        }
        writeln!(writer)
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: String,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            write!(self.fields, " {}={}", field.name(), value).ok();
        }
    }
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            write!(self.message, "{:?}", value).ok();
        } else {
            write!(self.fields, " {}={:?}", field.name(), value).ok();
        }
    }
}

impl Display for FieldVisitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        f.write_str(&self.fields)
    }
}

struct LevelLabel {
    label: &'static str,
    color: Option<Color>,
}

impl LevelLabel {
    fn new(level: &Level, use_colors: bool) -> Self {
        let (label, color) = match *level {
            Level::ERROR => ("ERR", Color::BrightRed),
            Level::WARN => ("WRN", Color::BrightYellow),
            Level::INFO => ("INF", Color::BrightBlue),
            Level::DEBUG => ("DBG", Color::BrightMagenta),
            Level::TRACE => ("TRC", Color::BrightWhite),
        };
        Self {
            label,
            color: use_colors.then_some(color),
        }
    }
}

impl Display for LevelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "\x1B[{}m{}\x1B[0m", color.to_fg_str(), self.label),
            None => f.write_str(self.label),
        }
    }
}

struct ColoredText<T> {
    content: T,
    color: Color,
}
impl<T> ColoredText<T> {
    fn bright_black(value: T) -> ColoredText<T> {
        ColoredText {
            content: value,
            color: Color::BrightBlack,
        }
    }
}
impl<T: Display> Display for ColoredText<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\x1B[{}m{}\x1B[0m",
            self.color.to_fg_str(),
            self.content
        )
    }
}

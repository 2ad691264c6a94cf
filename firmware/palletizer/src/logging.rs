/// Longest log line, including its level prefix. Longer lines are cut short.
pub const LOG_LINE_LEN: usize = 128;

/// Severity of a log line.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Level {
    Info,
    Error,
}

/// Write an error message, expanding its arguments.
///
/// The owner must provide `fn log_line(&mut self, level: Level, line: &str)`.
macro_rules! error {
    ($self:expr, $($arg:tt)*) => {{
        use core::fmt::Write;
        let mut out: heapless::String<{ $crate::logging::LOG_LINE_LEN }> = heapless::String::new();
        let _ = write!(out, "ERROR: {}", format_args!($($arg)*));
        $self.log_line($crate::logging::Level::Error, out.as_str());
    }};
}

/// Write an info message, expanding its arguments.
///
/// The owner must provide `fn log_line(&mut self, level: Level, line: &str)`.
macro_rules! info {
    ($self:expr, $($arg:tt)*) => {{
        use core::fmt::Write;
        let mut out: heapless::String<{ $crate::logging::LOG_LINE_LEN }> = heapless::String::new();
        let _ = write!(out, "INFO: {}", format_args!($($arg)*));
        $self.log_line($crate::logging::Level::Info, out.as_str());
    }};
}

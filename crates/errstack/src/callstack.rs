//! Bounded call-stack capture with lazy symbol resolution.
//!
//! [`CallStack::capture`] records up to `max_call_stack_frames` raw frame
//! addresses and nothing else. Resolving addresses to function, file and
//! line text is deferred until the stack is actually rendered, so errors
//! that are handled without being printed never pay the resolution cost.

use backtrace::{Backtrace, BacktraceFrame};

use crate::config::Config;

/// Rendered when frame resolution yields nothing usable.
pub const UNRESOLVED_CALL_STACK: &str = "<unresolved call stack>";

/// Frames introduced by the capture machinery itself, skipped in addition
/// to the caller-requested skip count.
const CAPTURE_FRAMES: usize = 3;

/// An immutable, bounded sequence of captured frame addresses.
///
/// Captured once at construction and never mutated; rendering resolves
/// a cloned copy so concurrent reads of the same error stay lock-free.
pub struct CallStack {
    frames: Vec<BacktraceFrame>,
}

/// The first resolvable frame of a [`CallStack`], in display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFrame {
    pub function: String,
    pub file: String,
    pub line: u32,
}

impl CallStack {
    /// Captures the current call stack, skipping `skip` frames above the
    /// immediate caller, bounded by the global frame limit.
    pub fn capture(skip: usize) -> Self {
        Self::capture_with(Config::global(), skip)
    }

    /// Captures the current call stack using an explicit configuration.
    pub fn capture_with(config: &Config, skip: usize) -> Self {
        let raw = Backtrace::new_unresolved();
        let frames = raw.frames();
        let start = (skip + CAPTURE_FRAMES).min(frames.len());
        let end = (start + config.max_call_stack_frames).min(frames.len());
        CallStack {
            frames: frames[start..end].to_vec(),
        }
    }

    /// The captured frames, outermost capture point first.
    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Resolves the first captured frame to function, file and line text.
    ///
    /// Returns `None` when no frame was captured or the symbol table has
    /// nothing for the address (stripped binaries).
    pub fn resolve_first(&self, config: &Config) -> Option<ResolvedFrame> {
        let first = self.frames.first()?;
        let mut resolved = Backtrace::from(vec![first.clone()]);
        resolved.resolve();
        let symbol = resolved.frames().first()?.symbols().first()?;
        let function = symbol.name()?.to_string();
        let file = symbol
            .filename()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = file
            .strip_prefix(&config.trim_file_path_prefix)
            .map(str::to_owned)
            .unwrap_or(file);
        Some(ResolvedFrame {
            function,
            file,
            line: symbol.lineno().unwrap_or(0),
        })
    }

    /// Renders the capture point as `function` followed by an indented
    /// `file:line`, or [`UNRESOLVED_CALL_STACK`] when resolution fails.
    pub fn format(&self, config: &Config) -> String {
        match self.resolve_first(config) {
            Some(frame) => format!("{}\n    {}:{}", frame.function, frame.file, frame.line),
            None => UNRESOLVED_CALL_STACK.to_string(),
        }
    }
}

impl std::fmt::Debug for CallStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallStack")
            .field("frames", &self.frames.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_is_bounded() {
        let config = Config::new();
        let stack = CallStack::capture_with(&config, 0);
        assert!(stack.len() <= config.max_call_stack_frames);
    }

    #[test]
    fn capture_respects_small_limit() {
        let config = Config {
            max_call_stack_frames: 2,
            ..Config::new()
        };
        let stack = CallStack::capture_with(&config, 0);
        assert!(stack.len() <= 2);
    }

    #[test]
    fn empty_stack_formats_placeholder() {
        let stack = CallStack { frames: Vec::new() };
        assert_eq!(stack.format(&Config::new()), UNRESOLVED_CALL_STACK);
    }

    #[test]
    fn format_never_panics() {
        let stack = CallStack::capture_with(&Config::new(), 0);
        let rendered = stack.format(&Config::new());
        assert!(!rendered.is_empty());
    }
}

//! HTTP Range request evaluation
//!
//! Single-range `bytes=` parsing per RFC 7233. Multi-range and non-byte
//! units are not supported and fall back to a full response, which is what
//! the dashboard's clients expect.

/// A fully resolved byte range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    /// Number of bytes the range covers. Never zero: both ends are inclusive
    /// and `start <= end` holds by construction.
    pub const fn byte_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Outcome of evaluating a `Range` header against an asset of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No Range header, or one we ignore; send the full asset
    Full,
    /// Satisfiable range; send 206 with this slice
    Partial(ByteRange),
    /// Range cannot be satisfied; send 416
    Unsatisfiable,
}

/// Evaluate a `Range` header value against an asset `len` bytes long.
///
/// Accepted forms are `bytes=start-end`, `bytes=start-` and the suffix form
/// `bytes=-n`. Malformed headers are ignored rather than rejected.
///
/// # Examples
/// ```
/// use airq_server::http::range::{evaluate_range, ByteRange, RangeOutcome};
///
/// assert_eq!(
///     evaluate_range(Some("bytes=0-99"), 1000),
///     RangeOutcome::Partial(ByteRange { start: 0, end: 99 })
/// );
/// assert_eq!(evaluate_range(None, 1000), RangeOutcome::Full);
/// ```
pub fn evaluate_range(header: Option<&str>, len: usize) -> RangeOutcome {
    let Some(header) = header else {
        return RangeOutcome::Full;
    };
    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeOutcome::Full;
    };
    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Full;
    }
    let Some((start_part, end_part)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (start_part, end_part) = (start_part.trim(), end_part.trim());

    // Suffix form: "-n" asks for the last n bytes
    if start_part.is_empty() {
        let Ok(suffix) = end_part.parse::<usize>() else {
            return RangeOutcome::Full;
        };
        if suffix == 0 || len == 0 {
            return RangeOutcome::Unsatisfiable;
        }
        return RangeOutcome::Partial(ByteRange {
            start: len.saturating_sub(suffix),
            end: len - 1,
        });
    }

    let Ok(start) = start_part.parse::<usize>() else {
        return RangeOutcome::Full;
    };
    if start >= len {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end_part.is_empty() {
        len - 1
    } else {
        match end_part.parse::<usize>() {
            // Ends past the asset are clamped, not rejected
            Ok(end) => end.min(len - 1),
            Err(_) => return RangeOutcome::Full,
        }
    };

    if start > end {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Partial(ByteRange { start, end })
}

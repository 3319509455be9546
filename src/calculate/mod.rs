//! Match scoring and statistics engine.
//!
//! Pure functions over league records:
//! - Nickname resolution of in-game names
//! - Red/blue side assignment per period
//! - Match score, possession and action zone resolution
//! - Per-player stat sheets and their aggregation
//! - Division standings
//!
//! Nothing here mutates its inputs or performs I/O.

pub mod filter;
pub mod nickname;
pub mod score;
pub mod sides;
pub mod standings;
pub mod statsheet;

pub use filter::*;
pub use nickname::*;
pub use score::*;
pub use sides::*;
pub use standings::*;
pub use statsheet::*;

/// Split a pair of metrics into shares of their total.
/// Both shares are 0.0 when the total is zero.
pub fn share(first: f64, second: f64) -> (f64, f64) {
    let total = first + second;
    if total == 0.0 {
        (0.0, 0.0)
    } else {
        (first / total, second / total)
    }
}

/// Calculate pass success ratio. Zero attempts yield 0.0.
pub fn pass_success(successful: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        successful as f64 / attempted as f64
    }
}

/// Format a ratio as a percentage with one decimal, e.g. `"62.5%"`.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Format a gametime in seconds as `"4m"`, `"35s"` or `"4m35s"`.
pub fn format_gametime(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let minutes = total / 60;
    let secs = total % 60;

    if minutes == 0 {
        format!("{}s", secs)
    } else if secs == 0 {
        format!("{}m", minutes)
    } else {
        format!("{}m{}s", minutes, secs)
    }
}

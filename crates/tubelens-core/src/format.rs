//! Display helpers for durations, counts, and watch time.

use std::sync::LazyLock;

use regex::Regex;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("valid duration regex")
});

/// Formats an ISO-8601 video duration as `h:mm:ss` or `m:ss`.
///
/// Days fold into hours (`P1DT2H` is `26:00:00`). Anything that does not
/// parse renders as `0:00`.
#[must_use]
pub fn format_duration(iso: &str) -> String {
    let Some(caps) = ISO_DURATION.captures(iso) else {
        return "0:00".to_string();
    };
    let part = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    let hours = part(1).saturating_mul(24).saturating_add(part(2));
    let minutes = part(3);
    let seconds = part(4);

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Compact count: `1.2M`, `3.4K`, or the plain number below a thousand.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_compact_number(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Watch time as whole hours (`1,234h`) from an hour upward, minutes below.
#[must_use]
pub fn format_watch_time(minutes: u64) -> String {
    if minutes >= 60 {
        format!("{}h", group_thousands(minutes / 60))
    } else {
        format!("{minutes}m")
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

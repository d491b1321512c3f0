//! Fixed-layout textual report.
//!
//! The column layout is a compatibility surface: labels in the left
//! column, horizontal and vertical values side by side, polarity as a
//! sign character, and each target rate annotated with the actual rate
//! the derived clock produces. Consumers parse this output, so the
//! layout is locked by a golden test below.

use std::fmt::Write;

use super::state::DetailedTiming;

/// Render the timing as the fixed-layout text report.
pub fn render(t: &DetailedTiming) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<14}{:>10}{:>12}", "parameter", "horizontal", "vertical");
    row(&mut out, "active", t.h_active(), t.v_active());
    row(&mut out, "front porch", t.h_front(), t.v_front());
    row(&mut out, "sync width", t.h_sync(), t.v_sync());
    row(&mut out, "back porch", t.h_back(), t.v_back());
    row(&mut out, "blanking", t.h_blank(), t.v_blank());
    row(&mut out, "total", t.h_total(), t.v_total());
    let _ = writeln!(
        out,
        "{:<14}{:>10}{:>12}",
        "polarity",
        t.h_polarity().sign_char(),
        t.v_polarity().sign_char()
    );
    out.push('\n');
    let _ = writeln!(
        out,
        "{:<14}{:>10} Hz    (actual {} Hz)",
        "v rate",
        fmt_millis(t.v_rate()),
        fmt_millis(t.actual_v_rate())
    );
    let _ = writeln!(
        out,
        "{:<14}{:>10} kHz   (actual {} kHz)",
        "h rate",
        fmt_millis(t.h_rate()),
        fmt_millis(t.actual_h_rate())
    );
    let _ = writeln!(out, "{:<14}{:>10} MHz", "p clock", fmt_clock(t.p_clock()));
    out
}

fn row(out: &mut String, label: &str, h: Option<i64>, v: Option<i64>) {
    let _ = writeln!(out, "{:<14}{:>10}{:>12}", label, fmt_count(h), fmt_count(v));
}

fn fmt_count(value: Option<i64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// A millihertz-style value as a three-decimal number.
fn fmt_millis(value: Option<i64>) -> String {
    match value {
        Some(v) => format!("{}.{:03}", v / 1000, v % 1000),
        None => "-".to_string(),
    }
}

/// A hundredths-of-a-MHz clock as a two-decimal number.
fn fmt_clock(value: Option<i64>) -> String {
    match value {
        Some(v) => format!("{}.{:02}", v / 100, v % 100),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DisplayClass, Polarity};

    #[test]
    fn golden_1080p60_layout() {
        let mut t = DetailedTiming::new(DisplayClass::Lcd);
        t.set_h_active(1920);
        t.set_v_active(1080);
        t.set_h_front(88);
        t.set_h_sync(44);
        t.set_h_back(148);
        t.set_v_front(4);
        t.set_v_sync(5);
        t.set_v_back(36);
        t.set_v_rate(60_000);
        t.set_h_polarity(Polarity::Positive);

        let expected = "\
parameter     horizontal    vertical
active              1920        1080
front porch           88           4
sync width            44           5
back porch           148          36
blanking             280          45
total               2200        1125
polarity               +           -

v rate            60.000 Hz    (actual 60.000 Hz)
h rate            67.500 kHz   (actual 67.500 kHz)
p clock           148.50 MHz
";
        assert_eq!(render(&t), expected);
    }

    #[test]
    fn unset_fields_render_as_dashes() {
        let t = DetailedTiming::new(DisplayClass::Crt);
        let report = render(&t);
        assert!(report.contains(&format!("{:<14}{:>10}{:>12}", "active", "-", "-")));
        assert!(report.contains(&format!("{:<14}{:>10} Hz    (actual - Hz)", "v rate", "-")));
        assert!(report.contains(&format!("{:<14}{:>10} MHz", "p clock", "-")));
    }
}

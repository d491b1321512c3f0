//! Serializable snapshot of a computed timing.
//!
//! `DetailedTiming` keeps unset fields as an internal sentinel; this DTO
//! exposes them as `Option` so JSON output renders them as `null`.

use serde::{Deserialize, Serialize};

use super::{DisplayClass, Polarity, TimingMode};
use crate::timing::DetailedTiming;

/// Flat, serializable view of a timing parameter set.
///
/// Units match the engine's fixed-point conventions: rates are in
/// thousandths (millihertz for the vertical rate, hertz for the
/// horizontal rate, which is thousandths of a kHz), the pixel clock is
/// in hundredths of a MHz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSummary {
    pub display_class: DisplayClass,
    pub mode: TimingMode,
    pub interlaced: bool,
    pub native: bool,
    pub stereo: bool,

    pub h_active: Option<i64>,
    pub h_front: Option<i64>,
    pub h_sync: Option<i64>,
    pub h_back: Option<i64>,
    pub h_blank: Option<i64>,
    pub h_total: Option<i64>,
    pub h_polarity: Polarity,

    pub v_active: Option<i64>,
    pub v_front: Option<i64>,
    pub v_sync: Option<i64>,
    pub v_back: Option<i64>,
    pub v_blank: Option<i64>,
    pub v_total: Option<i64>,
    pub v_polarity: Polarity,

    pub v_rate: Option<i64>,
    pub actual_v_rate: Option<i64>,
    pub h_rate: Option<i64>,
    pub actual_h_rate: Option<i64>,
    pub p_clock: Option<i64>,
}

impl From<&DetailedTiming> for TimingSummary {
    fn from(t: &DetailedTiming) -> Self {
        Self {
            display_class: t.display_class(),
            mode: t.mode(),
            interlaced: t.is_interlaced(),
            native: t.is_native(),
            stereo: t.is_stereo(),
            h_active: t.h_active(),
            h_front: t.h_front(),
            h_sync: t.h_sync(),
            h_back: t.h_back(),
            h_blank: t.h_blank(),
            h_total: t.h_total(),
            h_polarity: t.h_polarity(),
            v_active: t.v_active(),
            v_front: t.v_front(),
            v_sync: t.v_sync(),
            v_back: t.v_back(),
            v_blank: t.v_blank(),
            v_total: t.v_total(),
            v_polarity: t.v_polarity(),
            v_rate: t.v_rate(),
            actual_v_rate: t.actual_v_rate(),
            h_rate: t.h_rate(),
            actual_h_rate: t.actual_h_rate(),
            p_clock: t.p_clock(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_serialize_as_null() {
        let timing = DetailedTiming::new(DisplayClass::Crt);
        let summary = TimingSummary::from(&timing);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"h_active\":null"));
        assert!(json.contains("\"p_clock\":null"));
    }

    #[test]
    fn set_fields_serialize_as_numbers() {
        let mut timing = DetailedTiming::new(DisplayClass::Crt);
        timing.set_h_active(1920);
        let summary = TimingSummary::from(&timing);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"h_active\":1920"));
    }
}

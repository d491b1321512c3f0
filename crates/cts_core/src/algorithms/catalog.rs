//! Static catalogs of known-good standard modes.
//!
//! Catalog entries take precedence over the formula families: an exact
//! geometry match (plus a rate-band match where the entry carries one)
//! copies the stored porches and polarities verbatim. Digital entries
//! use +/- sync, the analog broadcast-derived entries use -/-.

use crate::models::Polarity;

/// Inclusive vertical-rate band in millihertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBand {
    pub min: i64,
    pub max: i64,
}

impl RateBand {
    pub const fn contains(&self, rate: i64) -> bool {
        self.min <= rate && rate <= self.max
    }
}

/// One curated mode: match key plus the stored porch/polarity set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub h_active: i64,
    pub v_active: i64,
    pub interlaced: bool,
    pub rate_band: Option<RateBand>,
    pub h_front: i64,
    pub h_sync: i64,
    pub h_back: i64,
    pub v_front: i64,
    pub v_sync: i64,
    pub v_back: i64,
    pub h_polarity: Polarity,
    pub v_polarity: Polarity,
}

const fn band(min: i64, max: i64) -> Option<RateBand> {
    Some(RateBand { min, max })
}

#[allow(clippy::too_many_arguments)]
const fn digital(
    h_active: i64,
    v_active: i64,
    interlaced: bool,
    rate_band: Option<RateBand>,
    h_front: i64,
    h_sync: i64,
    h_back: i64,
    v_front: i64,
    v_sync: i64,
    v_back: i64,
) -> CatalogEntry {
    CatalogEntry {
        h_active,
        v_active,
        interlaced,
        rate_band,
        h_front,
        h_sync,
        h_back,
        v_front,
        v_sync,
        v_back,
        h_polarity: Polarity::Positive,
        v_polarity: Polarity::Negative,
    }
}

#[allow(clippy::too_many_arguments)]
const fn analog(
    h_active: i64,
    v_active: i64,
    interlaced: bool,
    rate_band: Option<RateBand>,
    h_front: i64,
    h_sync: i64,
    h_back: i64,
    v_front: i64,
    v_sync: i64,
    v_back: i64,
) -> CatalogEntry {
    CatalogEntry {
        h_active,
        v_active,
        interlaced,
        rate_band,
        h_front,
        h_sync,
        h_back,
        v_front,
        v_sync,
        v_back,
        h_polarity: Polarity::Negative,
        v_polarity: Polarity::Negative,
    }
}

/// Standard LCD modes, banded by target vertical rate.
pub static LCD_STANDARD: &[CatalogEntry] = &[
    digital(3840, 2160, false, band(59_500, 60_500), 176, 88, 296, 8, 10, 72),
    digital(3840, 2160, false, band(29_500, 30_500), 176, 88, 296, 8, 10, 72),
    digital(1920, 1080, false, band(59_500, 60_500), 88, 44, 148, 4, 5, 36),
    digital(1920, 1080, false, band(47_500, 50_500), 528, 44, 148, 4, 5, 36),
    digital(1920, 1080, false, band(29_500, 30_500), 88, 44, 148, 4, 5, 36),
    digital(1920, 1080, false, band(24_500, 25_500), 528, 44, 148, 4, 5, 36),
    digital(1920, 1080, false, band(23_500, 24_500), 638, 44, 148, 4, 5, 36),
    digital(1920, 540, true, band(59_500, 60_500), 88, 44, 148, 2, 5, 15),
    digital(1920, 540, true, band(47_500, 50_500), 528, 44, 148, 2, 5, 15),
    analog(1440, 288, true, band(47_500, 50_500), 24, 126, 138, 2, 3, 19),
    analog(1440, 240, true, band(59_500, 60_500), 38, 124, 114, 4, 3, 15),
    digital(1366, 768, false, band(59_500, 60_500), 70, 143, 213, 3, 3, 24),
    digital(1360, 768, false, band(59_500, 60_500), 64, 112, 256, 3, 6, 18),
    digital(1280, 720, false, band(59_500, 60_500), 110, 40, 220, 5, 5, 20),
    digital(1280, 720, false, band(47_500, 50_500), 440, 40, 220, 5, 5, 20),
    analog(720, 576, false, band(47_500, 50_500), 12, 64, 68, 5, 5, 39),
    analog(720, 480, false, band(59_500, 60_500), 16, 62, 60, 9, 6, 30),
    analog(640, 480, false, band(59_500, 63_500), 16, 96, 48, 10, 2, 33),
];

/// Native panel modes, matched on geometry alone.
pub static LCD_NATIVE: &[CatalogEntry] = &[
    digital(3840, 2160, false, None, 176, 88, 296, 8, 10, 72),
    digital(1920, 1080, false, None, 88, 44, 148, 4, 5, 36),
    digital(1920, 540, true, None, 88, 44, 148, 2, 5, 15),
    analog(1440, 288, true, None, 24, 126, 138, 2, 3, 19),
    analog(1440, 240, true, None, 38, 124, 114, 4, 3, 15),
    digital(1366, 768, false, None, 70, 143, 213, 3, 3, 24),
    digital(1360, 768, false, None, 64, 112, 256, 3, 6, 18),
    digital(1280, 720, false, None, 110, 40, 220, 5, 5, 20),
    analog(720, 576, false, None, 12, 64, 68, 5, 5, 39),
    analog(720, 480, false, None, 16, 62, 60, 9, 6, 30),
    analog(640, 480, false, None, 16, 96, 48, 10, 2, 33),
];

// No curated entries for these families yet; their modes always fall
// through to the formula.
pub static LCD_REDUCED: &[CatalogEntry] = &[];
pub static CRT_STANDARD: &[CatalogEntry] = &[];
pub static OLD_STANDARD: &[CatalogEntry] = &[];

/// Find the first entry matching the geometry and, where the entry is
/// banded, the target vertical rate.
pub fn lookup(
    table: &'static [CatalogEntry],
    h_active: i64,
    v_active: i64,
    interlaced: bool,
    v_rate: i64,
) -> Option<&'static CatalogEntry> {
    table.iter().find(|e| {
        e.h_active == h_active
            && e.v_active == v_active
            && e.interlaced == interlaced
            && e.rate_band.map_or(true, |b| b.contains(v_rate))
    })
}

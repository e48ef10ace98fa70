//! Usage classification for parked vehicles.
//!
//! Two rules exist and they disagree on the same vehicle, so both are kept
//! under their own names:
//!
//! * [`KanaTableClassifier`] reads the classifier character on the plate. It
//!   is the rule for [`ParkingEvent`], which carries the plate.
//! * [`StayDurationClassifier`] guesses from how long the vehicle stayed and
//!   where it is registered. It is the rule for [`ParkingSnapshot`], the only
//!   record that carries a stay duration.

use crate::models::{ParkingEvent, ParkingSnapshot, UsageCategory};
use crate::utils::constants::{
    COMMERCIAL_MIN_STAY_MINUTES, DEFAULT_RENTAL_REGION, RENTAL_MAX_STAY_MINUTES,
};

pub trait UsageClassifier<R> {
    fn classify(&self, record: &R) -> UsageCategory;
}

/// Latin letters on US forces plates
const MILITARY_LATIN: [char; 6] = ['E', 'H', 'K', 'M', 'T', 'Y'];
const MILITARY_KANA: [char; 1] = ['よ'];
const RENTAL_KANA: [char; 2] = ['わ', 'れ'];
const COMMERCIAL_KANA: [char; 10] = ['あ', 'い', 'う', 'え', 'お', 'か', 'き', 'く', 'け', 'こ'];

/// Fixed kana membership tables.
///
/// Checked in order: military, rental, commercial. Anything else, including a
/// missing classifier, is private.
#[derive(Debug, Clone, Copy, Default)]
pub struct KanaTableClassifier;

impl KanaTableClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_kana(&self, kana: Option<char>) -> UsageCategory {
        let Some(kana) = kana else {
            return UsageCategory::Private;
        };

        if MILITARY_LATIN.contains(&kana.to_ascii_uppercase()) || MILITARY_KANA.contains(&kana) {
            UsageCategory::Other
        } else if RENTAL_KANA.contains(&kana) {
            UsageCategory::Rental
        } else if COMMERCIAL_KANA.contains(&kana) {
            UsageCategory::Commercial
        } else {
            UsageCategory::Private
        }
    }
}

impl UsageClassifier<ParkingEvent> for KanaTableClassifier {
    fn classify(&self, record: &ParkingEvent) -> UsageCategory {
        self.classify_kana(record.kana())
    }
}

/// Stay-duration heuristic: long stays are commercial, short stays registered
/// in the rental region are rentals, the rest private.
#[derive(Debug, Clone)]
pub struct StayDurationClassifier {
    rental_region: String,
}

impl StayDurationClassifier {
    pub fn new(rental_region: &str) -> Self {
        Self {
            rental_region: rental_region.to_string(),
        }
    }

    pub fn rental_region(&self) -> &str {
        &self.rental_region
    }

    pub fn classify_stay(&self, stay_minutes: u32, region: &str) -> UsageCategory {
        if stay_minutes > COMMERCIAL_MIN_STAY_MINUTES {
            UsageCategory::Commercial
        } else if region == self.rental_region && stay_minutes < RENTAL_MAX_STAY_MINUTES {
            UsageCategory::Rental
        } else {
            UsageCategory::Private
        }
    }
}

impl Default for StayDurationClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_RENTAL_REGION)
    }
}

impl UsageClassifier<ParkingSnapshot> for StayDurationClassifier {
    fn classify(&self, record: &ParkingSnapshot) -> UsageCategory {
        self.classify_stay(record.stay_duration, &record.plate_region)
    }
}

//! IELTS band conversion.
//!
//! Raw scores out of 40 are mapped to bands with the published conversion
//! tables for listening and academic reading.

use crate::model::TestType;

/// Number of questions the conversion tables are defined for.
pub const FULL_TEST_QUESTIONS: u32 = 40;

/// `(minimum raw score, band)` in descending order.
const LISTENING: &[(u32, f32)] = &[
    (39, 9.0),
    (37, 8.5),
    (35, 8.0),
    (32, 7.5),
    (30, 7.0),
    (26, 6.5),
    (23, 6.0),
    (18, 5.5),
    (16, 5.0),
    (13, 4.5),
    (11, 4.0),
    (8, 3.5),
    (6, 3.0),
    (4, 2.5),
    (2, 2.0),
    (1, 1.0),
    (0, 0.0),
];

const ACADEMIC_READING: &[(u32, f32)] = &[
    (39, 9.0),
    (37, 8.5),
    (35, 8.0),
    (33, 7.5),
    (30, 7.0),
    (27, 6.5),
    (23, 6.0),
    (19, 5.5),
    (15, 5.0),
    (13, 4.5),
    (10, 4.0),
    (8, 3.5),
    (6, 3.0),
    (4, 2.5),
    (2, 2.0),
    (1, 1.0),
    (0, 0.0),
];

/// Scale a raw score onto the 40-question range, rounding to the nearest
/// whole mark.
pub fn scale_to_full_test(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    if total == FULL_TEST_QUESTIONS {
        return score.min(FULL_TEST_QUESTIONS);
    }
    let scaled = (score as f64 * FULL_TEST_QUESTIONS as f64 / total as f64).round() as u32;
    scaled.min(FULL_TEST_QUESTIONS)
}

/// Band for a raw score, or `None` for a test with no questions.
pub fn band_score(test_type: TestType, score: u32, total: u32) -> Option<f32> {
    if total == 0 {
        return None;
    }
    let raw = scale_to_full_test(score, total);
    let table = match test_type {
        TestType::Listening => LISTENING,
        TestType::Reading => ACADEMIC_READING,
    };
    table
        .iter()
        .find(|(min, _)| raw >= *min)
        .map(|(_, band)| *band)
}

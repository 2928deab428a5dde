pub mod routes;

use serde::Deserialize;

// MODELS

#[derive(Debug, Deserialize)]
pub struct WeeklyQuery {
    pub weeks: Option<usize>,
}

// HELPER FUNCTIONS

// Chart window; half a year is as far back as the demo data goes
pub fn clamp_weeks(weeks: Option<usize>) -> usize {
    weeks.unwrap_or(6).clamp(1, 26)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_weeks() {
        assert_eq!(clamp_weeks(None), 6);
        assert_eq!(clamp_weeks(Some(12)), 12);
        assert_eq!(clamp_weeks(Some(0)), 1);
        assert_eq!(clamp_weeks(Some(500)), 26);
    }
}

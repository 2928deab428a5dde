use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::jobs::{JobApplication, JobStage};

// MODELS

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    /// Monday of the bucket's week
    pub week_of: NaiveDate,
    pub applications: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage: JobStage,
    pub count: u32,
}

// BUCKETING

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Application counts for the last `weeks` weeks, oldest bucket first,
/// ending with the week containing `today`. Applications outside the
/// window are ignored.
pub fn weekly_activity(jobs: &[JobApplication], weeks: usize, today: NaiveDate) -> Vec<WeekBucket> {
    let anchor = week_start(today);
    let mut buckets: Vec<WeekBucket> = (0..weeks)
        .rev()
        .map(|offset| WeekBucket {
            week_of: anchor - Duration::weeks(offset as i64),
            applications: 0,
        })
        .collect();

    for job in jobs {
        let week = week_start(job.applied_on);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.week_of == week) {
            bucket.applications += 1;
        }
    }

    buckets
}

/// How many applications sit in each pipeline stage
pub fn pipeline_funnel(jobs: &[JobApplication]) -> Vec<StageCount> {
    JobStage::ALL
        .iter()
        .map(|stage| StageCount {
            stage: *stage,
            count: jobs.iter().filter(|job| job.stage == *stage).count() as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn job_applied_on(date: NaiveDate, stage: JobStage) -> JobApplication {
        JobApplication {
            id: Uuid::new_v4(),
            company: "Nimbus Labs".to_string(),
            role_title: "Engineer".to_string(),
            stage,
            applied_on: date,
            location: None,
            salary_range: None,
            url: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_snaps_to_monday() {
        // 2026-08-19 is a Wednesday
        assert_eq!(week_start(date(2026, 8, 19)), date(2026, 8, 17));
        // Monday stays put
        assert_eq!(week_start(date(2026, 8, 17)), date(2026, 8, 17));
        // Sunday belongs to the week before
        assert_eq!(week_start(date(2026, 8, 23)), date(2026, 8, 17));
    }

    #[test]
    fn test_weekly_buckets_count_and_order() {
        let jobs = vec![
            job_applied_on(date(2026, 8, 18), JobStage::Applied),
            job_applied_on(date(2026, 8, 17), JobStage::Applied),
            job_applied_on(date(2026, 8, 11), JobStage::Offer),
            job_applied_on(date(2026, 8, 4), JobStage::Rejected),
        ];

        let buckets = weekly_activity(&jobs, 3, date(2026, 8, 19));
        assert_eq!(buckets.len(), 3);
        // oldest -> newest
        assert_eq!(buckets[0].week_of, date(2026, 8, 3));
        assert_eq!(buckets[1].week_of, date(2026, 8, 10));
        assert_eq!(buckets[2].week_of, date(2026, 8, 17));
        assert_eq!(buckets[0].applications, 1);
        assert_eq!(buckets[1].applications, 1);
        assert_eq!(buckets[2].applications, 2);
    }

    #[test]
    fn test_applications_outside_the_window_are_ignored() {
        let jobs = vec![job_applied_on(date(2026, 1, 5), JobStage::Applied)];
        let buckets = weekly_activity(&jobs, 2, date(2026, 8, 19));
        assert!(buckets.iter().all(|b| b.applications == 0));
    }

    #[test]
    fn test_pipeline_funnel_counts_every_stage() {
        let jobs = vec![
            job_applied_on(date(2026, 8, 18), JobStage::Applied),
            job_applied_on(date(2026, 8, 17), JobStage::Applied),
            job_applied_on(date(2026, 8, 11), JobStage::Offer),
        ];

        let funnel = pipeline_funnel(&jobs);
        assert_eq!(funnel.len(), JobStage::ALL.len());
        let applied = funnel.iter().find(|c| c.stage == JobStage::Applied).unwrap();
        assert_eq!(applied.count, 2);
        let wishlist = funnel.iter().find(|c| c.stage == JobStage::Wishlist).unwrap();
        assert_eq!(wishlist.count, 0);
    }
}

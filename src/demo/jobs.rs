use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

// MODELS

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStage {
    Wishlist,
    Applied,
    Interviewing,
    Offer,
    Rejected,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Wishlist => "wishlist",
            JobStage::Applied => "applied",
            JobStage::Interviewing => "interviewing",
            JobStage::Offer => "offer",
            JobStage::Rejected => "rejected",
        }
    }

    pub const ALL: [JobStage; 5] = [
        JobStage::Wishlist,
        JobStage::Applied,
        JobStage::Interviewing,
        JobStage::Offer,
        JobStage::Rejected,
    ];
}

/// Stage names as they appear in query strings and CSV exports
pub fn parse_stage(raw: &str) -> Option<JobStage> {
    match raw.trim().to_lowercase().as_str() {
        "wishlist" => Some(JobStage::Wishlist),
        "applied" => Some(JobStage::Applied),
        "interviewing" => Some(JobStage::Interviewing),
        "offer" => Some(JobStage::Offer),
        "rejected" => Some(JobStage::Rejected),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: Uuid,
    pub company: String,
    pub role_title: String,
    pub stage: JobStage,
    pub applied_on: NaiveDate,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewJob {
    pub company: String,
    pub role_title: String,
    pub stage: JobStage,
    pub applied_on: NaiveDate,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

/// None keeps the existing value, like COALESCE in an update statement
#[derive(Default)]
pub struct JobUpdate {
    pub company: Option<String>,
    pub role_title: Option<String>,
    pub stage: Option<JobStage>,
    pub applied_on: Option<NaiveDate>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

// STORE

/// In-memory pipeline backing the jobs page. Mock data only; nothing here
/// outlives the process.
pub struct JobStore {
    jobs: RwLock<Vec<JobApplication>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(Vec::new()),
        }
    }

    pub fn seeded() -> Self {
        let today = Utc::now().date_naive();
        let seed = |company: &str,
                    role_title: &str,
                    stage: JobStage,
                    days_ago: i64,
                    location: Option<&str>,
                    salary_range: Option<&str>| {
            JobApplication {
                id: Uuid::new_v4(),
                company: company.to_string(),
                role_title: role_title.to_string(),
                stage,
                applied_on: today - Duration::days(days_ago),
                location: location.map(str::to_string),
                salary_range: salary_range.map(str::to_string),
                url: None,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }
        };

        let jobs = vec![
            seed("Nimbus Labs", "Backend Engineer", JobStage::Interviewing, 2, Some("Remote"), Some("$140k-$165k")),
            seed("Brightpath", "Platform Engineer", JobStage::Applied, 4, Some("Berlin"), None),
            seed("Forge Analytics", "Data Engineer", JobStage::Applied, 9, Some("Remote"), Some("$120k-$150k")),
            seed("Luma Health", "Site Reliability Engineer", JobStage::Offer, 12, Some("Amsterdam"), Some("€85k-€100k")),
            seed("Parallel", "Backend Engineer", JobStage::Rejected, 16, None, None),
            seed("Northwind Data", "Staff Engineer", JobStage::Wishlist, 23, Some("London"), None),
            seed("Hatch", "DevOps Engineer", JobStage::Applied, 30, Some("Remote"), None),
            seed("Clearline", "Software Engineer", JobStage::Interviewing, 38, Some("Munich"), Some("€70k-€85k")),
        ];

        Self {
            jobs: RwLock::new(jobs),
        }
    }

    /// Single-pass filter over the pipeline: `q` is a case-insensitive
    /// substring over company and role title, `stage` an exact match.
    /// Newest application first.
    pub fn list(&self, q: Option<&str>, stage: Option<JobStage>) -> Vec<JobApplication> {
        let q = q.map(str::to_lowercase);
        let mut jobs: Vec<JobApplication> = self
            .jobs
            .read()
            .map(|jobs| {
                jobs.iter()
                    .filter(|job| {
                        let text_match = q
                            .as_deref()
                            .map(|q| {
                                job.company.to_lowercase().contains(q)
                                    || job.role_title.to_lowercase().contains(q)
                            })
                            .unwrap_or(true);
                        let stage_match = stage.map(|s| job.stage == s).unwrap_or(true);
                        text_match && stage_match
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        jobs.sort_by(|a, b| b.applied_on.cmp(&a.applied_on));
        jobs
    }

    pub fn all(&self) -> Vec<JobApplication> {
        self.jobs
            .read()
            .map(|jobs| jobs.clone())
            .unwrap_or_default()
    }

    pub fn create(&self, new: NewJob) -> JobApplication {
        let job = JobApplication {
            id: Uuid::new_v4(),
            company: new.company,
            role_title: new.role_title,
            stage: new.stage,
            applied_on: new.applied_on,
            location: new.location,
            salary_range: new.salary_range,
            url: new.url,
            notes: new.notes,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        if let Ok(mut jobs) = self.jobs.write() {
            jobs.push(job.clone());
        }
        job
    }

    pub fn update(&self, id: Uuid, patch: JobUpdate) -> Option<JobApplication> {
        let mut jobs = self.jobs.write().ok()?;
        let job = jobs.iter_mut().find(|job| job.id == id)?;
        if let Some(company) = patch.company {
            job.company = company;
        }
        if let Some(role_title) = patch.role_title {
            job.role_title = role_title;
        }
        if let Some(stage) = patch.stage {
            job.stage = stage;
        }
        if let Some(applied_on) = patch.applied_on {
            job.applied_on = applied_on;
        }
        if let Some(location) = patch.location {
            job.location = Some(location);
        }
        if let Some(salary_range) = patch.salary_range {
            job.salary_range = Some(salary_range);
        }
        if let Some(url) = patch.url {
            job.url = Some(url);
        }
        if let Some(notes) = patch.notes {
            job.notes = Some(notes);
        }
        job.updated_at = Utc::now();
        Some(job.clone())
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.jobs
            .write()
            .map(|mut jobs| {
                let before = jobs.len();
                jobs.retain(|job| job.id != id);
                jobs.len() < before
            })
            .unwrap_or(false)
    }

    pub fn append_imported(&self, rows: Vec<NewJob>) -> usize {
        let mut count = 0;
        for row in rows {
            self.create(row);
            count += 1;
        }
        count
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}

// CSV IMPORT

pub struct CsvImport {
    pub rows: Vec<NewJob>,
    pub errors: Vec<String>,
}

/// Parse a pipeline CSV export: header `company,role,stage,applied`, one
/// application per line, double quotes around fields that contain commas.
/// Bad rows are reported and skipped; good rows survive.
pub fn parse_jobs_csv(input: &str) -> CsvImport {
    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut saw_header = false;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_csv_line(line);

        if !saw_header {
            saw_header = true;
            let names: Vec<String> = fields.iter().map(|f| f.to_lowercase()).collect();
            if names.len() < 4
                || names[0] != "company"
                || names[1] != "role"
                || names[2] != "stage"
                || names[3] != "applied"
            {
                errors.push(format!(
                    "line {}: header must be company,role,stage,applied",
                    line_no
                ));
                return CsvImport { rows, errors };
            }
            continue;
        }

        if fields.len() < 4 {
            errors.push(format!("line {}: expected 4 fields, got {}", line_no, fields.len()));
            continue;
        }

        let company = fields[0].clone();
        let role_title = fields[1].clone();
        if company.is_empty() || role_title.is_empty() {
            errors.push(format!("line {}: company and role are required", line_no));
            continue;
        }

        let Some(stage) = parse_stage(&fields[2]) else {
            errors.push(format!("line {}: unknown stage '{}'", line_no, fields[2]));
            continue;
        };

        let applied_on = match NaiveDate::parse_from_str(&fields[3], "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                errors.push(format!(
                    "line {}: applied date '{}' is not YYYY-MM-DD",
                    line_no, fields[3]
                ));
                continue;
            }
        };

        rows.push(NewJob {
            company,
            role_title,
            stage,
            applied_on,
            location: None,
            salary_range: None,
            url: None,
            notes: None,
        });
    }

    if !saw_header {
        errors.push("empty import".to_string());
    }

    CsvImport { rows, errors }
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // escaped quote inside a quoted field
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field).trim().to_string());
            }
            _ => field.push(c),
        }
    }
    fields.push(field.trim().to_string());
    fields
}

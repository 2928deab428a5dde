use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

// MODELS

/// Research notes for one company: a summary plus talking points and
/// questions to ask, the way the prep page renders them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepDoc {
    pub id: Uuid,
    pub company: String,
    pub summary: String,
    pub talking_points: Vec<String>,
    pub questions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewPrepDoc {
    pub company: String,
    pub summary: String,
    pub talking_points: Vec<String>,
    pub questions: Vec<String>,
}

#[derive(Default)]
pub struct PrepDocUpdate {
    pub company: Option<String>,
    pub summary: Option<String>,
    pub talking_points: Option<Vec<String>>,
    pub questions: Option<Vec<String>>,
}

// STORE

pub struct PrepStore {
    docs: RwLock<Vec<PrepDoc>>,
}

impl PrepStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }

    pub fn seeded() -> Self {
        let store = Self::new();
        store.create(NewPrepDoc {
            company: "Nimbus Labs".to_string(),
            summary: "Series B infra startup, ~80 people, heavy on-call culture".to_string(),
            talking_points: vec![
                "Ran the flag-gated billing migration".to_string(),
                "Cut alert noise 80%".to_string(),
            ],
            questions: vec![
                "How is on-call staffed across time zones?".to_string(),
                "What does the promotion path look like for staff?".to_string(),
            ],
        });
        store.create(NewPrepDoc {
            company: "Luma Health".to_string(),
            summary: "Health-tech scale-up, strict compliance, Amsterdam hub".to_string(),
            talking_points: vec!["Experience with audited release processes".to_string()],
            questions: vec!["How are experiments reviewed before launch?".to_string()],
        });
        store.create(NewPrepDoc {
            company: "Forge Analytics".to_string(),
            summary: "Data tooling vendor, small platform team, remote-first".to_string(),
            talking_points: vec!["Built internal analytics pipelines".to_string()],
            questions: vec!["Who owns the ingestion SLAs?".to_string()],
        });
        store
    }

    /// `company` filters case-insensitively by substring
    pub fn list(&self, company: Option<&str>) -> Vec<PrepDoc> {
        let company = company.map(str::to_lowercase);
        let mut docs: Vec<PrepDoc> = self
            .docs
            .read()
            .map(|docs| {
                docs.iter()
                    .filter(|doc| {
                        company
                            .as_deref()
                            .map(|c| doc.company.to_lowercase().contains(c))
                            .unwrap_or(true)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        docs.sort_by(|a, b| a.company.cmp(&b.company));
        docs
    }

    pub fn create(&self, new: NewPrepDoc) -> PrepDoc {
        let doc = PrepDoc {
            id: Uuid::new_v4(),
            company: new.company,
            summary: new.summary,
            talking_points: new.talking_points,
            questions: new.questions,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        if let Ok(mut docs) = self.docs.write() {
            docs.push(doc.clone());
        }
        doc
    }

    pub fn update(&self, id: Uuid, patch: PrepDocUpdate) -> Option<PrepDoc> {
        let mut docs = self.docs.write().ok()?;
        let doc = docs.iter_mut().find(|doc| doc.id == id)?;
        if let Some(company) = patch.company {
            doc.company = company;
        }
        if let Some(summary) = patch.summary {
            doc.summary = summary;
        }
        if let Some(talking_points) = patch.talking_points {
            doc.talking_points = talking_points;
        }
        if let Some(questions) = patch.questions {
            doc.questions = questions;
        }
        doc.updated_at = Utc::now();
        Some(doc.clone())
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.docs
            .write()
            .map(|mut docs| {
                let before = docs.len();
                docs.retain(|doc| doc.id != id);
                docs.len() < before
            })
            .unwrap_or(false)
    }
}

impl Default for PrepStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_filter() {
        let store = PrepStore::seeded();
        assert_eq!(store.list(None).len(), 3);
        assert_eq!(store.list(Some("luma")).len(), 1);
        assert!(store.list(Some("acme")).is_empty());
    }

    #[test]
    fn test_listing_is_sorted_by_company() {
        let store = PrepStore::seeded();
        let docs = store.list(None);
        assert_eq!(docs[0].company, "Forge Analytics");
        assert_eq!(docs[2].company, "Nimbus Labs");
    }

    #[test]
    fn test_update_and_delete() {
        let store = PrepStore::seeded();
        let doc = store.list(Some("forge")).remove(0);

        let updated = store
            .update(
                doc.id,
                PrepDocUpdate {
                    summary: Some("Updated summary".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.summary, "Updated summary");
        assert_eq!(updated.company, doc.company);

        assert!(store.delete(doc.id));
        assert!(store.list(Some("forge")).is_empty());
    }
}

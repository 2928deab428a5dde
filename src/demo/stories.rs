use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use uuid::Uuid;

// MODELS

/// One STAR story: situation, task, action, result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarStory {
    pub id: Uuid,
    pub title: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewStory {
    pub title: String,
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
    pub tags: Vec<String>,
}

/// None keeps the existing value; tags replace wholesale when given
#[derive(Default)]
pub struct StoryUpdate {
    pub title: Option<String>,
    pub situation: Option<String>,
    pub task: Option<String>,
    pub action: Option<String>,
    pub result: Option<String>,
    pub tags: Option<Vec<String>>,
}

// STORE

pub struct StoryStore {
    stories: RwLock<Vec<StarStory>>,
}

impl StoryStore {
    pub fn new() -> Self {
        Self {
            stories: RwLock::new(Vec::new()),
        }
    }

    pub fn seeded() -> Self {
        let store = Self::new();
        store.create(NewStory {
            title: "Paged the wrong team at 3am".to_string(),
            situation: "An alert storm pointed at our service during a partner outage".to_string(),
            task: "Restore confidence in on-call routing".to_string(),
            action: "Traced the alert rules, fixed the ownership labels, wrote a runbook"
                .to_string(),
            result: "Pages dropped 80% the next quarter".to_string(),
            tags: vec!["incident".to_string(), "ownership".to_string()],
        });
        store.create(NewStory {
            title: "Migration without downtime".to_string(),
            situation: "Billing data had to move to a new schema mid-quarter".to_string(),
            task: "Migrate without pausing invoicing".to_string(),
            action: "Dual-wrote both schemas behind a flag and backfilled in batches".to_string(),
            result: "Zero missed invoices, flag removed after two weeks".to_string(),
            tags: vec!["migration".to_string(), "feature-flags".to_string()],
        });
        store.create(NewStory {
            title: "Convinced the team to delete a service".to_string(),
            situation: "A legacy notifier cost more to run than the product it served".to_string(),
            task: "Build the case for retiring it".to_string(),
            action: "Measured usage, interviewed the two remaining consumers, wrote the plan"
                .to_string(),
            result: "Service gone, $40k/year saved".to_string(),
            tags: vec!["influence".to_string()],
        });
        store.create(NewStory {
            title: "Interview panel revamp".to_string(),
            situation: "Our loop had a 60% no-show rate for take-homes".to_string(),
            task: "Redesign the technical screen".to_string(),
            action: "Replaced the take-home with a paired debugging session".to_string(),
            result: "No-shows fell to 10% and signal improved".to_string(),
            tags: vec!["hiring".to_string(), "process".to_string()],
        });
        store
    }

    /// `q` searches the title case-insensitively, `tag` is an exact match.
    /// Newest first.
    pub fn list(&self, q: Option<&str>, tag: Option<&str>) -> Vec<StarStory> {
        let q = q.map(str::to_lowercase);
        let mut stories: Vec<StarStory> = self
            .stories
            .read()
            .map(|stories| {
                stories
                    .iter()
                    .filter(|story| {
                        let text_match = q
                            .as_deref()
                            .map(|q| story.title.to_lowercase().contains(q))
                            .unwrap_or(true);
                        let tag_match = tag
                            .map(|t| story.tags.iter().any(|candidate| candidate == t))
                            .unwrap_or(true);
                        text_match && tag_match
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        stories
    }

    pub fn create(&self, new: NewStory) -> StarStory {
        let story = StarStory {
            id: Uuid::new_v4(),
            title: new.title,
            situation: new.situation,
            task: new.task,
            action: new.action,
            result: new.result,
            tags: new.tags,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        if let Ok(mut stories) = self.stories.write() {
            stories.push(story.clone());
        }
        story
    }

    pub fn update(&self, id: Uuid, patch: StoryUpdate) -> Option<StarStory> {
        let mut stories = self.stories.write().ok()?;
        let story = stories.iter_mut().find(|story| story.id == id)?;
        if let Some(title) = patch.title {
            story.title = title;
        }
        if let Some(situation) = patch.situation {
            story.situation = situation;
        }
        if let Some(task) = patch.task {
            story.task = task;
        }
        if let Some(action) = patch.action {
            story.action = action;
        }
        if let Some(result) = patch.result {
            story.result = result;
        }
        if let Some(tags) = patch.tags {
            story.tags = tags;
        }
        story.updated_at = Utc::now();
        Some(story.clone())
    }

    pub fn delete(&self, id: Uuid) -> bool {
        self.stories
            .write()
            .map(|mut stories| {
                let before = stories.len();
                stories.retain(|story| story.id != id);
                stories.len() < before
            })
            .unwrap_or(false)
    }
}

impl Default for StoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_bank_and_tag_filter() {
        let store = StoryStore::seeded();
        assert_eq!(store.list(None, None).len(), 4);

        let tagged = store.list(None, Some("feature-flags"));
        assert_eq!(tagged.len(), 1);
        assert!(tagged[0].title.contains("Migration"));
    }

    #[test]
    fn test_title_search() {
        let store = StoryStore::seeded();
        let hits = store.list(Some("interview"), None);
        assert_eq!(hits.len(), 1);
        assert!(store.list(Some("zzz"), None).is_empty());
    }

    #[test]
    fn test_update_replaces_tags_wholesale() {
        let store = StoryStore::seeded();
        let story = store.list(None, Some("incident")).remove(0);

        let updated = store
            .update(
                story.id,
                StoryUpdate {
                    tags: Some(vec!["postmortem".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.tags, vec!["postmortem".to_string()]);
        assert_eq!(updated.title, story.title);
    }

    #[test]
    fn test_delete() {
        let store = StoryStore::seeded();
        let story = store.list(None, None).remove(0);
        assert!(store.delete(story.id));
        assert_eq!(store.list(None, None).len(), 3);
    }
}

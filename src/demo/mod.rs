pub mod analytics;
pub mod jobs;
pub mod prep;
pub mod stories;

use jobs::JobStore;
use prep::PrepStore;
use stories::StoryStore;

/// Portfolio content behind the gated pages. Everything is mock data held
/// in memory and reseeded on every boot.
pub struct DemoData {
    pub jobs: JobStore,
    pub stories: StoryStore,
    pub prep: PrepStore,
}

impl DemoData {
    pub fn seeded() -> Self {
        Self {
            jobs: JobStore::seeded(),
            stories: StoryStore::seeded(),
            prep: PrepStore::seeded(),
        }
    }
}

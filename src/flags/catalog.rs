use serde::Serialize;

// Flag keys referenced across the service. Keep in sync with FLAG_CATALOG.
pub const SHOW_JOBS_PAGE: &str = "show-jobs-page";
pub const SHOW_STORIES_PAGE: &str = "show-stories-page";
pub const SHOW_PREP_PAGE: &str = "show-prep-page";
pub const SHOW_ANALYTICS_PAGE: &str = "show-analytics-page";
pub const SHOW_ADMIN_PAGE: &str = "show-admin-page";
pub const ENABLE_CSV_IMPORT: &str = "enable-csv-import";
pub const PREMIUM_ANALYTICS: &str = "premium-analytics";
pub const BUSINESS_DASHBOARD: &str = "business-dashboard";
pub const AI_INTERVIEW_COACH: &str = "ai-interview-coach";

// MODELS

/// Build-time description of a flag: what it is called, what it gates and
/// which value to fall back to when the snapshot has nothing for it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub default_value: bool,
}

/// Every flag the demo knows about. Readiness only counts keys listed here.
pub const FLAG_CATALOG: &[FlagDescriptor] = &[
    FlagDescriptor {
        key: SHOW_JOBS_PAGE,
        name: "Jobs page",
        description: "Shows the job application pipeline",
        category: "pages",
        default_value: true,
    },
    FlagDescriptor {
        key: SHOW_STORIES_PAGE,
        name: "Stories page",
        description: "Shows the STAR story bank",
        category: "pages",
        default_value: true,
    },
    FlagDescriptor {
        key: SHOW_PREP_PAGE,
        name: "Prep page",
        description: "Shows company prep documents",
        category: "pages",
        default_value: true,
    },
    FlagDescriptor {
        key: SHOW_ANALYTICS_PAGE,
        name: "Analytics page",
        description: "Shows the weekly activity dashboard",
        category: "pages",
        default_value: false,
    },
    FlagDescriptor {
        key: SHOW_ADMIN_PAGE,
        name: "Admin page",
        description: "Shows the flag catalog and AI config testing surface",
        category: "pages",
        default_value: false,
    },
    FlagDescriptor {
        key: ENABLE_CSV_IMPORT,
        name: "CSV import",
        description: "Allows importing job applications from a CSV export",
        category: "features",
        default_value: true,
    },
    FlagDescriptor {
        key: PREMIUM_ANALYTICS,
        name: "Premium analytics",
        description: "Targeting demo flag for premium job seekers",
        category: "experiments",
        default_value: false,
    },
    FlagDescriptor {
        key: BUSINESS_DASHBOARD,
        name: "Business dashboard",
        description: "Targeting demo flag for business accounts",
        category: "experiments",
        default_value: false,
    },
    FlagDescriptor {
        key: AI_INTERVIEW_COACH,
        name: "AI interview coach",
        description: "Enables the AI-config backed interview coach",
        category: "ai",
        default_value: false,
    },
];

// HELPER FUNCTIONS

/// Look up a flag's catalog entry by key
pub fn descriptor(key: &str) -> Option<&'static FlagDescriptor> {
    FLAG_CATALOG.iter().find(|d| d.key == key)
}

/// Documented default for a key; unknown keys fall back to off
pub fn default_for(key: &str) -> bool {
    descriptor(key).map(|d| d.default_value).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_keys_are_unique() {
        for (i, a) in FLAG_CATALOG.iter().enumerate() {
            for b in FLAG_CATALOG.iter().skip(i + 1) {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn test_default_lookup() {
        assert!(default_for(SHOW_JOBS_PAGE));
        assert!(!default_for(SHOW_ADMIN_PAGE));
        // Unknown keys are off by default
        assert!(!default_for("no-such-flag"));
    }

    #[test]
    fn test_descriptor_lookup() {
        assert!(descriptor(SHOW_ANALYTICS_PAGE).is_some());
        assert!(descriptor("no-such-flag").is_none());
    }
}

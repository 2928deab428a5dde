use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// MODELS

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    User,
    Admin,
    BetaTester,
    Business,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::BetaTester => "beta-tester",
            UserRole::Business => "business",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Premium,
    Enterprise,
    Business,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Premium => "premium",
            SubscriptionTier::Enterprise => "enterprise",
            SubscriptionTier::Business => "business",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    Small,
    Medium,
    Large,
    Enterprise,
}

impl CompanySize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Small => "small",
            CompanySize::Medium => "medium",
            CompanySize::Large => "large",
            CompanySize::Enterprise => "enterprise",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geolocation {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
}

/// The simulated end user the flag service targets. There is exactly one
/// current context per process; it is swapped wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub key: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub subscription_tier: SubscriptionTier,
    pub signup_date: DateTime<Utc>,
    pub beta_tester: bool,
    pub company_size: Option<CompanySize>,
    pub industry: Option<String>,
    pub geolocation: Option<Geolocation>,
}

impl UserContext {
    /// Attribute access by wire name, as the targeting rules see it.
    /// Unknown or unset attributes are None, never an error.
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "key" => Some(self.key.clone()),
            "email" => Some(self.email.clone()),
            "name" => Some(self.name.clone()),
            "role" => Some(self.role.as_str().to_string()),
            "subscriptionTier" => Some(self.subscription_tier.as_str().to_string()),
            "betaTester" => Some(self.beta_tester.to_string()),
            "companySize" => self.company_size.map(|c| c.as_str().to_string()),
            "industry" => self.industry.clone(),
            _ => None,
        }
    }

    /// Minimal shape check for records read back from storage
    pub fn is_well_formed(&self) -> bool {
        !self.key.trim().is_empty() && self.email.contains('@')
    }
}

// DEMO ROSTER

/// The three archetypes a fresh install picks from: a premium beta tester,
/// a premium subscriber and a free-tier job seeker.
pub fn demo_roster() -> Vec<UserContext> {
    vec![
        UserContext {
            key: "demo-riley".to_string(),
            email: "riley.chen@example.dev".to_string(),
            name: "Riley Chen".to_string(),
            role: UserRole::BetaTester,
            subscription_tier: SubscriptionTier::Premium,
            signup_date: Utc.with_ymd_and_hms(2023, 11, 2, 9, 30, 0).unwrap(),
            beta_tester: true,
            company_size: None,
            industry: Some("fintech".to_string()),
            geolocation: None,
        },
        UserContext {
            key: "demo-morgan".to_string(),
            email: "morgan.patel@example.dev".to_string(),
            name: "Morgan Patel".to_string(),
            role: UserRole::User,
            subscription_tier: SubscriptionTier::Premium,
            signup_date: Utc.with_ymd_and_hms(2024, 2, 18, 14, 0, 0).unwrap(),
            beta_tester: false,
            company_size: None,
            industry: Some("healthcare".to_string()),
            geolocation: None,
        },
        UserContext {
            key: "demo-sam".to_string(),
            email: "sam.okafor@example.dev".to_string(),
            name: "Sam Okafor".to_string(),
            role: UserRole::User,
            subscription_tier: SubscriptionTier::Free,
            signup_date: Utc.with_ymd_and_hms(2025, 1, 9, 11, 15, 0).unwrap(),
            beta_tester: false,
            company_size: None,
            industry: None,
            geolocation: None,
        },
    ]
}

/// Roster lookup for the switch-user action
pub fn roster_member(key: &str) -> Option<UserContext> {
    demo_roster().into_iter().find(|c| c.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_archetypes() {
        let roster = demo_roster();
        assert_eq!(roster.len(), 3);

        // beta tester on premium
        assert!(roster[0].beta_tester);
        assert_eq!(roster[0].subscription_tier, SubscriptionTier::Premium);
        // premium, not beta
        assert!(!roster[1].beta_tester);
        assert_eq!(roster[1].subscription_tier, SubscriptionTier::Premium);
        // free, not beta
        assert!(!roster[2].beta_tester);
        assert_eq!(roster[2].subscription_tier, SubscriptionTier::Free);

        // keys must be distinct so switch-user can address them
        assert_ne!(roster[0].key, roster[1].key);
        assert_ne!(roster[1].key, roster[2].key);
    }

    #[test]
    fn test_roster_lookup() {
        assert!(roster_member("demo-riley").is_some());
        assert!(roster_member("nobody").is_none());
    }

    #[test]
    fn test_attribute_access() {
        let ctx = &demo_roster()[0];
        assert_eq!(ctx.attribute("role").as_deref(), Some("beta-tester"));
        assert_eq!(ctx.attribute("subscriptionTier").as_deref(), Some("premium"));
        assert_eq!(ctx.attribute("betaTester").as_deref(), Some("true"));
        assert_eq!(ctx.attribute("industry").as_deref(), Some("fintech"));
        assert_eq!(ctx.attribute("companySize"), None);
        assert_eq!(ctx.attribute("shoeSize"), None);
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let ctx = &demo_roster()[2];
        let json = serde_json::to_value(ctx).unwrap();
        assert_eq!(json["subscriptionTier"], "free");
        assert_eq!(json["betaTester"], false);
        assert_eq!(json["role"], "user");
        assert!(json.get("subscription_tier").is_none());
    }

    #[test]
    fn test_deserialize_frontend_payload() {
        let raw = r#"{
            "key": "custom-1",
            "email": "custom@example.dev",
            "name": "Custom User",
            "role": "business",
            "subscriptionTier": "business",
            "signupDate": "2024-06-01T00:00:00Z",
            "betaTester": false,
            "companySize": "large",
            "industry": "logistics"
        }"#;
        let ctx: UserContext = serde_json::from_str(raw).unwrap();
        assert_eq!(ctx.role, UserRole::Business);
        assert_eq!(ctx.company_size, Some(CompanySize::Large));
        assert_eq!(ctx.geolocation, None);
        assert!(ctx.is_well_formed());
    }

    #[test]
    fn test_well_formed_rejects_blank_key() {
        let mut ctx = demo_roster()[0].clone();
        ctx.key = "   ".to_string();
        assert!(!ctx.is_well_formed());
    }
}

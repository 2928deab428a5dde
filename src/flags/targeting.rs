use serde::Serialize;

use super::catalog::{BUSINESS_DASHBOARD, PREMIUM_ANALYTICS};
use super::context::{SubscriptionTier, UserContext, UserRole};

// MODELS

/// The only comparison the demo rules need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleOperator {
    OneOf,
}

/// A single illustrative targeting rule: attribute, operator, match set and
/// the value served on a match. Display-only; real enforcement happens in
/// the hosted service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetingRule {
    pub attribute: String,
    pub operator: RuleOperator,
    pub values: Vec<String>,
    pub serve: bool,
}

impl TargetingRule {
    fn one_of(attribute: &str, values: &[&str], serve: bool) -> Self {
        Self {
            attribute: attribute.to_string(),
            operator: RuleOperator::OneOf,
            values: values.iter().map(|v| v.to_string()).collect(),
            serve,
        }
    }
}

/// The fixed rule set the targeting demo card walks through
pub fn demo_rules() -> Vec<TargetingRule> {
    vec![
        TargetingRule::one_of("subscriptionTier", &["premium", "enterprise"], true),
        TargetingRule::one_of("betaTester", &["true"], true),
        TargetingRule::one_of("role", &["beta-tester"], true),
    ]
}

// EVALUATION

/// True iff the context's attribute value is a member of the rule's set.
/// Unset attributes never match.
pub fn evaluate_rule(rule: &TargetingRule, ctx: &UserContext) -> bool {
    match rule.operator {
        RuleOperator::OneOf => ctx
            .attribute(&rule.attribute)
            .map(|value| rule.values.iter().any(|candidate| candidate == &value))
            .unwrap_or(false),
    }
}

/// Which of the two demo flags the card should feature for this context.
/// Total and deterministic: business-looking contexts get the business
/// dashboard flag, everyone else the premium analytics flag.
pub fn select_demo_flag_key(ctx: &UserContext) -> &'static str {
    if is_business_context(ctx) {
        BUSINESS_DASHBOARD
    } else {
        PREMIUM_ANALYTICS
    }
}

/// Business-ness comes from the role or the tier
pub fn is_business_context(ctx: &UserContext) -> bool {
    ctx.role == UserRole::Business || ctx.subscription_tier == SubscriptionTier::Business
}

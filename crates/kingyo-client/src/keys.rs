//! Cache-key catalogue.
//!
//! Every key starts with a resource tag followed by its parent ids. List keys
//! extend the scope key with page and filter parts (see [`crate::list`]), so
//! invalidating a scope by prefix reaches every page and filter combination.

use kingyo_cache::QueryKey;

pub const TEST_PLANS: &str = "testplans";
pub const TEST_PLAN: &str = "testplan";
pub const TEST_CASES: &str = "testcases";
pub const TEST_CASE: &str = "testcase";
pub const TEST_STEPS: &str = "teststeps";
pub const TEST_STEP_ATTACHMENTS: &str = "teststepattachments";
pub const TEST_RESULTS: &str = "testresults";
pub const TEST_RESULT: &str = "testresult";
pub const TEST_RESULT_STEPS: &str = "testresultsteps";
pub const TEST_RESULT_STEP_ATTACHMENTS: &str = "testresultstepattachments";
pub const USERS: &str = "users";
pub const CURRENT_USER: &str = "user";

/// Tags whose keys carry the plan id as their second part.
const PLAN_SCOPED: [&str; 8] = [
    TEST_CASES,
    TEST_CASE,
    TEST_STEPS,
    TEST_STEP_ATTACHMENTS,
    TEST_RESULTS,
    TEST_RESULT,
    TEST_RESULT_STEPS,
    TEST_RESULT_STEP_ATTACHMENTS,
];

#[must_use]
pub fn test_plans() -> QueryKey {
    QueryKey::new(TEST_PLANS)
}

#[must_use]
pub fn test_plan(id: u64) -> QueryKey {
    QueryKey::new(TEST_PLAN).with(id)
}

#[must_use]
pub fn test_cases(plan: u64) -> QueryKey {
    QueryKey::new(TEST_CASES).with(plan)
}

#[must_use]
pub fn test_case(plan: u64, id: u64) -> QueryKey {
    QueryKey::new(TEST_CASE).with(plan).with(id)
}

#[must_use]
pub fn test_steps(plan: u64, case: u64) -> QueryKey {
    QueryKey::new(TEST_STEPS).with(plan).with(case)
}

#[must_use]
pub fn test_step_attachments(plan: u64, case: u64) -> QueryKey {
    QueryKey::new(TEST_STEP_ATTACHMENTS).with(plan).with(case)
}

#[must_use]
pub fn test_results(plan: u64) -> QueryKey {
    QueryKey::new(TEST_RESULTS).with(plan)
}

/// Per-case history lives under the plan's results scope, so anything that
/// invalidates [`test_results`] reaches it too.
#[must_use]
pub fn test_result_history(plan: u64, case: u64) -> QueryKey {
    test_results(plan).with("case").with(case)
}

#[must_use]
pub fn test_result(plan: u64, case: u64, id: u64) -> QueryKey {
    QueryKey::new(TEST_RESULT).with(plan).with(case).with(id)
}

#[must_use]
pub fn test_result_steps(plan: u64, case: u64, result: u64) -> QueryKey {
    QueryKey::new(TEST_RESULT_STEPS).with(plan).with(case).with(result)
}

#[must_use]
pub fn test_result_step_attachments(plan: u64, case: u64, result: u64) -> QueryKey {
    QueryKey::new(TEST_RESULT_STEP_ATTACHMENTS)
        .with(plan)
        .with(case)
        .with(result)
}

#[must_use]
pub fn users() -> QueryKey {
    QueryKey::new(USERS)
}

#[must_use]
pub fn current_user() -> QueryKey {
    QueryKey::new(CURRENT_USER)
}

/// Prefixes covering everything cached below one plan.
#[must_use]
pub fn plan_scopes(plan: u64) -> Vec<QueryKey> {
    PLAN_SCOPED
        .iter()
        .map(|tag| QueryKey::new(tag).with(plan))
        .collect()
}

/// Prefixes covering everything cached below one test case.
#[must_use]
pub fn case_scopes(plan: u64, case: u64) -> Vec<QueryKey> {
    vec![
        test_steps(plan, case),
        test_step_attachments(plan, case),
        test_result_history(plan, case),
        QueryKey::new(TEST_RESULT).with(plan).with(case),
        QueryKey::new(TEST_RESULT_STEPS).with(plan).with(case),
        QueryKey::new(TEST_RESULT_STEP_ATTACHMENTS).with(plan).with(case),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn history_sits_under_the_results_scope() {
        assert!(test_result_history(3, 7).starts_with(&test_results(3)));
        assert!(!test_result_history(3, 7).starts_with(&test_results(4)));
        assert_eq!(test_result_history(3, 7).to_string(), r#"["testresults", 3, "case", 7]"#);
    }

    #[test]
    fn plan_scopes_reach_every_plan_resource() {
        let scopes = plan_scopes(3);
        assert_eq!(scopes.len(), PLAN_SCOPED.len());
        assert!(scopes.iter().any(|s| test_case(3, 7).starts_with(s)));
        assert!(scopes.iter().any(|s| test_result_steps(3, 7, 40).starts_with(s)));
        assert!(!scopes.iter().any(|s| test_case(4, 7).starts_with(s)));
        assert!(!scopes.iter().any(|s| test_plan(3).starts_with(s)));
    }

    #[test]
    fn case_scopes_leave_sibling_cases_alone() {
        let scopes = case_scopes(3, 7);
        assert!(scopes.iter().any(|s| test_steps(3, 7).starts_with(s)));
        assert!(scopes.iter().any(|s| test_result(3, 7, 40).starts_with(s)));
        assert!(!scopes.iter().any(|s| test_steps(3, 8).starts_with(s)));
        assert!(!scopes.iter().any(|s| test_cases(3).starts_with(s)));
    }
}

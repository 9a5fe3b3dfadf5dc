//! Builds the free-text retrieval query from a profile.

use crate::config::{default_income_buckets, IncomeBucket};
use crate::models::Profile;

pub const NOT_SPECIFIED: &str = "Not specified";

/// Lookup from the profile form's income choices to numeric ranges.
#[derive(Debug, Clone)]
pub struct IncomeBuckets {
    buckets: Vec<IncomeBucket>,
}

impl IncomeBuckets {
    pub fn new(buckets: Vec<IncomeBucket>) -> Self {
        Self { buckets }
    }

    /// Exact, case-sensitive match on the bucket label.
    pub fn normalize(&self, income: &str) -> &str {
        self.buckets
            .iter()
            .find(|b| b.label == income)
            .map(|b| b.value.as_str())
            .unwrap_or(NOT_SPECIFIED)
    }
}

impl Default for IncomeBuckets {
    fn default() -> Self {
        Self::new(default_income_buckets())
    }
}

pub fn build_query(profile: &Profile, buckets: &IncomeBuckets) -> String {
    format!(
        "User Profile:\n\
         Age: {}\n\
         Gender: {}\n\
         Occupation: {}\n\
         Income: {}\n\
         Location: {}\n\
         Caste: {}\n\
         Disability: {}\n\
         \n\
         Recommend relevant Indian government schemes.",
        profile.age,
        profile.gender,
        profile.occupation,
        buckets.normalize(&profile.income),
        profile.location,
        profile.caste_category,
        profile.disability,
    )
}

//! Top-level cohort expression document

use crate::{ConceptSet, CorelatedCriteria, Criteria, CriteriaGroup};
use serde::{Deserialize, Serialize};

/// How many qualifying events enter the cohort per person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitType {
    /// Earliest event only
    First,
    /// Latest event only
    Last,
    /// Every event
    All,
}

/// Limit applied to a stream of qualifying events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLimit {
    /// Which events survive the limit
    #[serde(rename = "Type")]
    pub limit_type: LimitType,
}

impl Default for ResultLimit {
    fn default() -> Self {
        Self {
            limit_type: LimitType::First,
        }
    }
}

/// Required continuous observation around the index event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObservationFilter {
    /// Days of observation required before the event
    #[serde(rename = "PriorDays", default)]
    pub prior_days: u32,
    /// Days of observation required after the event
    #[serde(rename = "PostDays", default)]
    pub post_days: u32,
}

/// The entry events defining cohort index dates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryCriteria {
    /// Criteria whose matching events are candidate index events
    #[serde(rename = "CriteriaList")]
    pub criteria_list: Vec<Criteria>,
    /// Observation-window requirement around the index event
    #[serde(rename = "ObservationWindow", default)]
    pub observation_window: ObservationFilter,
    /// Limit on candidate index events per person
    #[serde(rename = "PrimaryCriteriaLimit", default)]
    pub primary_limit: ResultLimit,
}

/// A named inclusion rule applied after the primary criteria
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclusionRule {
    /// Rule name, shown in attrition reporting
    #[serde(default)]
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// The rule's criteria group
    pub expression: CriteriaGroup,
}

/// A complete declarative cohort definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortExpression {
    /// Concept sets referenced by criteria through their ids
    #[serde(rename = "ConceptSets", default)]
    pub concept_sets: Vec<ConceptSet>,
    /// Entry-event definition
    #[serde(rename = "PrimaryCriteria")]
    pub primary_criteria: PrimaryCriteria,
    /// Additional constraints on entry events
    #[serde(rename = "AdditionalCriteria", default)]
    pub additional_criteria: Option<CriteriaGroup>,
    /// Inclusion rules applied to qualifying events
    #[serde(rename = "InclusionRules", default)]
    pub inclusion_rules: Vec<InclusionRule>,
}

impl CohortExpression {
    /// Look up a concept set by its id
    pub fn concept_set(&self, codeset_id: i32) -> Option<&ConceptSet> {
        self.concept_sets.iter().find(|set| set.id == codeset_id)
    }

    /// Ids of every concept set referenced by any criterion in the
    /// definition, in first-reference order, without duplicates
    pub fn referenced_codeset_ids(&self) -> Vec<i32> {
        let mut ids = Vec::new();
        let mut push = |id: Option<i32>| {
            if let Some(id) = id {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        };
        for criteria in &self.primary_criteria.criteria_list {
            push(criteria.codeset_id());
        }
        let mut groups: Vec<&CriteriaGroup> = Vec::new();
        groups.extend(self.additional_criteria.as_ref());
        groups.extend(self.inclusion_rules.iter().map(|rule| &rule.expression));
        while let Some(group) = groups.pop() {
            for CorelatedCriteria { criteria, .. } in &group.criteria_list {
                push(criteria.codeset_id());
            }
            groups.extend(&group.groups);
        }
        ids
    }
}

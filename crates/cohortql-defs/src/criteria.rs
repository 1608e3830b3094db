//! Criteria, criteria groups, and the range filters they carry

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Comparison operator shared by numeric and date ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeOp {
    /// Less than
    #[serde(rename = "lt")]
    LessThan,
    /// Less than or equal
    #[serde(rename = "lte")]
    LessOrEqual,
    /// Equal
    #[serde(rename = "eq")]
    Equal,
    /// Greater than
    #[serde(rename = "gt")]
    GreaterThan,
    /// Greater than or equal
    #[serde(rename = "gte")]
    GreaterOrEqual,
    /// Between value and extent, inclusive
    #[serde(rename = "bt")]
    Between,
    /// Outside value and extent
    #[serde(rename = "!bt")]
    NotBetween,
}

/// A numeric comparison filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    /// Comparison value
    #[serde(rename = "Value")]
    pub value: f64,
    /// Comparison operator
    #[serde(rename = "Op")]
    pub op: RangeOp,
    /// Upper bound for between-style operators
    #[serde(rename = "Extent", default)]
    pub extent: Option<f64>,
}

/// A date comparison filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// Comparison date
    #[serde(rename = "Value")]
    pub value: NaiveDate,
    /// Comparison operator
    #[serde(rename = "Op")]
    pub op: RangeOp,
    /// Upper bound for between-style operators
    #[serde(rename = "Extent", default)]
    pub extent: Option<NaiveDate>,
}

/// Operator for text filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextOp {
    /// Substring match
    #[serde(rename = "contains")]
    Contains,
    /// Prefix match
    #[serde(rename = "startsWith")]
    StartsWith,
    /// Suffix match
    #[serde(rename = "endsWith")]
    EndsWith,
    /// Exact match
    #[serde(rename = "eq")]
    Equal,
}

/// A text comparison filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFilter {
    /// Text to compare against
    #[serde(rename = "Text")]
    pub text: String,
    /// Comparison operator
    #[serde(rename = "Op")]
    pub op: TextOp,
}

/// Reference from a criterion to a concept set, by id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSetSelection {
    /// Id of the referenced concept set
    #[serde(rename = "CodesetId")]
    pub codeset_id: i32,
    /// Whether matching the set excludes the record
    #[serde(rename = "IsExclusion", default)]
    pub is_exclusion: bool,
}

/// A condition occurrence criterion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionOccurrence {
    /// Concept set constraining the condition concept
    #[serde(rename = "CodesetId", default)]
    pub codeset_id: Option<i32>,
    /// Restrict to the first occurrence per person
    #[serde(rename = "First", default)]
    pub first: Option<bool>,
    /// Filter on the condition start date
    #[serde(rename = "OccurrenceStartDate", default)]
    pub occurrence_start_date: Option<DateRange>,
    /// Filter on the condition end date
    #[serde(rename = "OccurrenceEndDate", default)]
    pub occurrence_end_date: Option<DateRange>,
    /// Filter on age at occurrence
    #[serde(rename = "Age", default)]
    pub age: Option<NumericRange>,
    /// Filter on the stop-reason text
    #[serde(rename = "StopReason", default)]
    pub stop_reason: Option<TextFilter>,
}

/// A condition era criterion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionEra {
    /// Concept set constraining the condition concept
    #[serde(rename = "CodesetId", default)]
    pub codeset_id: Option<i32>,
    /// Restrict to the first era per person
    #[serde(rename = "First", default)]
    pub first: Option<bool>,
    /// Filter on the era start date
    #[serde(rename = "EraStartDate", default)]
    pub era_start_date: Option<DateRange>,
    /// Filter on the era end date
    #[serde(rename = "EraEndDate", default)]
    pub era_end_date: Option<DateRange>,
    /// Filter on the era length in days
    #[serde(rename = "EraLength", default)]
    pub era_length: Option<NumericRange>,
    /// Filter on the number of occurrences in the era
    #[serde(rename = "OccurrenceCount", default)]
    pub occurrence_count: Option<NumericRange>,
}

/// A visit occurrence criterion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisitOccurrence {
    /// Concept set constraining the visit concept
    #[serde(rename = "CodesetId", default)]
    pub codeset_id: Option<i32>,
    /// Restrict to the first visit per person
    #[serde(rename = "First", default)]
    pub first: Option<bool>,
    /// Filter on the visit start date
    #[serde(rename = "OccurrenceStartDate", default)]
    pub occurrence_start_date: Option<DateRange>,
    /// Filter on the visit end date
    #[serde(rename = "OccurrenceEndDate", default)]
    pub occurrence_end_date: Option<DateRange>,
    /// Filter on the visit length in days
    #[serde(rename = "VisitLength", default)]
    pub visit_length: Option<NumericRange>,
}

/// A drug exposure criterion
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrugExposure {
    /// Concept set constraining the drug concept
    #[serde(rename = "CodesetId", default)]
    pub codeset_id: Option<i32>,
    /// Restrict to the first exposure per person
    #[serde(rename = "First", default)]
    pub first: Option<bool>,
    /// Filter on the exposure start date
    #[serde(rename = "OccurrenceStartDate", default)]
    pub occurrence_start_date: Option<DateRange>,
    /// Filter on the exposure end date
    #[serde(rename = "OccurrenceEndDate", default)]
    pub occurrence_end_date: Option<DateRange>,
    /// Filter on refill count
    #[serde(rename = "Refills", default)]
    pub refills: Option<NumericRange>,
    /// Filter on days supply
    #[serde(rename = "DaysSupply", default)]
    pub days_supply: Option<NumericRange>,
}

/// A single criterion over one clinical domain table.
///
/// The wire form tags each criterion with its domain, e.g.
/// `{"ConditionOccurrence": {...}}`, which the externally tagged enum
/// representation matches directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criteria {
    /// Condition occurrence criterion
    ConditionOccurrence(ConditionOccurrence),
    /// Condition era criterion
    ConditionEra(ConditionEra),
    /// Visit occurrence criterion
    VisitOccurrence(VisitOccurrence),
    /// Drug exposure criterion
    DrugExposure(DrugExposure),
}

impl Criteria {
    /// Concept set id referenced by the criterion, if any
    pub fn codeset_id(&self) -> Option<i32> {
        match self {
            Criteria::ConditionOccurrence(c) => c.codeset_id,
            Criteria::ConditionEra(c) => c.codeset_id,
            Criteria::VisitOccurrence(c) => c.codeset_id,
            Criteria::DrugExposure(c) => c.codeset_id,
        }
    }
}

/// How the members of a criteria group combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupType {
    /// Every member must hold
    #[serde(rename = "ALL")]
    All,
    /// At least one member must hold
    #[serde(rename = "ANY")]
    Any,
    /// At least `count` members must hold
    #[serde(rename = "AT_LEAST")]
    AtLeast,
    /// At most `count` members must hold
    #[serde(rename = "AT_MOST")]
    AtMost,
}

/// A criterion inside a group, with its occurrence constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorelatedCriteria {
    /// The criterion itself
    #[serde(rename = "Criteria")]
    pub criteria: Criteria,
    /// How many matching records are required, when constrained
    #[serde(rename = "Occurrence", default)]
    pub occurrence: Option<Occurrence>,
}

/// Occurrence-count constraint on a correlated criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// 0 = exactly, 1 = at most, 2 = at least
    #[serde(rename = "Type")]
    pub occurrence_type: i32,
    /// The count the type applies to
    #[serde(rename = "Count")]
    pub count: i32,
}

/// A boolean combination of criteria and nested groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaGroup {
    /// Combination mode
    #[serde(rename = "Type")]
    pub group_type: GroupType,
    /// Member count for at-least / at-most groups
    #[serde(rename = "Count", default)]
    pub count: Option<u32>,
    /// Direct member criteria
    #[serde(rename = "CriteriaList", default)]
    pub criteria_list: Vec<CorelatedCriteria>,
    /// Nested groups
    #[serde(rename = "Groups", default)]
    pub groups: Vec<CriteriaGroup>,
}

impl CriteriaGroup {
    /// A group requiring every member to hold
    pub fn all() -> Self {
        Self {
            group_type: GroupType::All,
            count: None,
            criteria_list: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// True when the group has no members at any depth
    pub fn is_empty(&self) -> bool {
        self.criteria_list.is_empty() && self.groups.iter().all(CriteriaGroup::is_empty)
    }
}

//! Clinical domain tables criteria read from

use crate::Criteria;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The CDM domain table a criterion is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainTable {
    /// condition_occurrence
    ConditionOccurrence,
    /// condition_era
    ConditionEra,
    /// visit_occurrence
    VisitOccurrence,
    /// drug_exposure
    DrugExposure,
}

impl DomainTable {
    /// Physical table name in the CDM schema
    pub fn table_name(&self) -> &'static str {
        match self {
            DomainTable::ConditionOccurrence => "condition_occurrence",
            DomainTable::ConditionEra => "condition_era",
            DomainTable::VisitOccurrence => "visit_occurrence",
            DomainTable::DrugExposure => "drug_exposure",
        }
    }

    /// Column holding the standard concept id in this table
    pub fn concept_id_column(&self) -> &'static str {
        match self {
            DomainTable::ConditionOccurrence => "condition_concept_id",
            DomainTable::ConditionEra => "condition_concept_id",
            DomainTable::VisitOccurrence => "visit_concept_id",
            DomainTable::DrugExposure => "drug_concept_id",
        }
    }
}

impl fmt::Display for DomainTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl From<&Criteria> for DomainTable {
    fn from(criteria: &Criteria) -> Self {
        match criteria {
            Criteria::ConditionOccurrence(_) => DomainTable::ConditionOccurrence,
            Criteria::ConditionEra(_) => DomainTable::ConditionEra,
            Criteria::VisitOccurrence(_) => DomainTable::VisitOccurrence,
            Criteria::DrugExposure(_) => DomainTable::DrugExposure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConditionEra;

    #[test]
    fn test_domain_table_for_criteria() {
        let criteria = Criteria::ConditionEra(ConditionEra::default());
        let table = DomainTable::from(&criteria);
        assert_eq!(table.table_name(), "condition_era");
        assert_eq!(table.concept_id_column(), "condition_concept_id");
    }
}

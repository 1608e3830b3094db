//! Codeset query compilation
//!
//! Turns the concept sets of a cohort definition into one query mapping
//! each set to its resolved concept ids: rows of
//! `(codeset_id, concept_id)`. Descendant inclusion goes through the
//! vocabulary's `concept_ancestor` closure table; exclusions are
//! subtracted with EXCEPT.

use crate::{BuildContext, QueryExpression};
use cohortql_defs::{ConceptSet, ConceptSetItem};

/// The compiled codeset query for one cohort definition.
///
/// Feed it to [`BuildContext::materialize`] when the backend needs
/// temp-table emulation, or embed its SQL directly otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodesetQuery {
    sql: String,
}

impl CodesetQuery {
    /// The query's SQL text
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl QueryExpression for CodesetQuery {
    fn to_sql(&self) -> String {
        self.sql.clone()
    }
}

fn id_list(items: &[&ConceptSetItem]) -> String {
    items
        .iter()
        .map(|item| item.concept.concept_id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the union of direct and descendant selections of one side
/// (included or excluded) of a concept set. Returns `None` when the
/// side is empty.
fn side_union(
    concept: &str,
    ancestor: &str,
    direct: &[&ConceptSetItem],
    with_descendants: &[&ConceptSetItem],
) -> Option<String> {
    let mut selects = Vec::new();
    // an item with descendants still includes the concept itself, which
    // concept_ancestor covers via its zero-level rows; the direct
    // select keeps sets correct on vocabularies without those rows
    if !direct.is_empty() || !with_descendants.is_empty() {
        let all: Vec<&ConceptSetItem> = direct
            .iter()
            .chain(with_descendants.iter())
            .copied()
            .collect();
        selects.push(format!(
            "SELECT concept_id FROM {concept} WHERE concept_id IN ({})",
            id_list(&all)
        ));
    }
    if !with_descendants.is_empty() {
        selects.push(format!(
            "SELECT descendant_concept_id AS concept_id FROM {ancestor} WHERE ancestor_concept_id IN ({})",
            id_list(with_descendants)
        ));
    }
    if selects.is_empty() {
        None
    } else {
        Some(selects.join("\nUNION\n"))
    }
}

fn concept_set_members(concept: &str, ancestor: &str, set: &ConceptSet) -> String {
    let partition = |excluded: bool, descendants: bool| -> Vec<&ConceptSetItem> {
        set.expression
            .items
            .iter()
            .filter(|item| item.is_excluded == excluded && item.include_descendants == descendants)
            .collect()
    };
    let included = side_union(concept, ancestor, &partition(false, false), &partition(false, true));
    let excluded = side_union(concept, ancestor, &partition(true, false), &partition(true, true));

    let Some(included) = included else {
        // a set with no including items resolves to no concepts
        return format!("SELECT concept_id FROM {concept} WHERE 1 = 0");
    };
    match excluded {
        Some(excluded) => format!(
            "SELECT concept_id FROM (\n{included}\n) included\nEXCEPT\nSELECT concept_id FROM (\n{excluded}\n) excluded"
        ),
        None => included,
    }
}

/// Compile concept sets into the codeset query.
///
/// Vocabulary tables are addressed by their fully qualified names from
/// the context, so the query runs unchanged wherever the connection
/// points. Source-code mapping (`includeMapped`) is not expanded here.
pub fn compile_codesets(ctx: &BuildContext, concept_sets: &[ConceptSet]) -> CodesetQuery {
    let concept = ctx.vocabulary_name("concept");
    let ancestor = ctx.vocabulary_name("concept_ancestor");

    if concept_sets
        .iter()
        .flat_map(|set| &set.expression.items)
        .any(|item| item.include_mapped)
    {
        log::debug!("codeset compilation ignores includeMapped items");
    }

    let branches: Vec<String> = concept_sets
        .iter()
        .map(|set| {
            format!(
                "SELECT {} AS codeset_id, concept_id FROM (\n{}\n) members",
                set.id,
                concept_set_members(&concept, &ancestor, set)
            )
        })
        .collect();

    let sql = if branches.is_empty() {
        format!("SELECT 0 AS codeset_id, concept_id FROM {concept} WHERE 1 = 0")
    } else {
        branches.join("\nUNION ALL\n")
    };
    CodesetQuery { sql }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuildOptions;
    use cohortql_backend::ScriptedBackend;
    use cohortql_defs::{Concept, ConceptSet, ConceptSetItem};
    use std::sync::Arc;

    fn ctx() -> BuildContext {
        BuildContext::new(Arc::new(ScriptedBackend::new()), BuildOptions::new())
            .with_vocabulary_schema("cat.voc")
    }

    fn diabetes_set() -> ConceptSet {
        ConceptSet::new(0, "diabetes").with_items(vec![
            ConceptSetItem::new(Concept::with_id(201826)).with_descendants(),
            ConceptSetItem::new(Concept::with_id(195771)).excluded(),
        ])
    }

    #[test]
    fn test_descendants_join_through_concept_ancestor() {
        let query = compile_codesets(&ctx(), &[diabetes_set()]);
        let sql = query.sql();
        assert!(sql.contains(r#""cat"."voc"."concept_ancestor""#));
        assert!(sql.contains("ancestor_concept_id IN (201826)"));
    }

    #[test]
    fn test_exclusions_are_subtracted() {
        let query = compile_codesets(&ctx(), &[diabetes_set()]);
        let sql = query.sql();
        assert!(sql.contains("EXCEPT"));
        assert!(sql.contains("concept_id IN (195771)"));
    }

    #[test]
    fn test_one_branch_per_set_with_its_id() {
        let sets = vec![
            diabetes_set(),
            ConceptSet::new(3, "metformin")
                .with_items(vec![ConceptSetItem::new(Concept::with_id(1503297))]),
        ];
        let query = compile_codesets(&ctx(), &sets);
        let sql = query.sql();
        assert!(sql.contains("SELECT 0 AS codeset_id"));
        assert!(sql.contains("SELECT 3 AS codeset_id"));
        assert_eq!(sql.matches("UNION ALL").count(), 1);
    }

    #[test]
    fn test_empty_set_yields_empty_members() {
        let query = compile_codesets(&ctx(), &[ConceptSet::new(7, "empty")]);
        assert!(query.sql().contains("WHERE 1 = 0"));
    }

    #[test]
    fn test_no_sets_compiles_to_empty_relation() {
        let query = compile_codesets(&ctx(), &[]);
        assert!(query.sql().contains("WHERE 1 = 0"));
    }
}

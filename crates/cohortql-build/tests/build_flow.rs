//! End-to-end flow over a scripted backend: compile the codesets of a
//! cohort definition, materialize them into the emulation schema, query
//! through the handle, release.

use cohortql_backend::{BackendCall, LookupBehavior, ScriptedBackend};
use cohortql_build::{BuildContext, BuildOptions, compile_codesets, resolve};
use cohortql_defs::parse_cohort_definition;
use pretty_assertions::assert_eq;
use std::sync::Arc;

const DEFINITION: &str = r#"{
  "ConceptSets": [
    {
      "id": 0,
      "name": "Type 2 diabetes",
      "expression": {
        "items": [
          { "concept": { "CONCEPT_ID": 201826 }, "includeDescendants": true }
        ]
      }
    }
  ],
  "PrimaryCriteria": {
    "CriteriaList": [
      { "ConditionOccurrence": { "CodesetId": 0 } }
    ]
  }
}"#;

#[test]
fn codesets_materialize_into_the_emulation_schema() -> anyhow::Result<()> {
    let backend = Arc::new(ScriptedBackend::new());
    let ctx = BuildContext::new(
        backend.clone(),
        BuildOptions::new().with_temp_emulation_schema("catalog.schema"),
    )
    .with_cdm_schema("catalog.cdm")
    .with_vocabulary_schema("catalog.voc");

    let definition = parse_cohort_definition(DEFINITION)?;
    let codesets = compile_codesets(&ctx, &definition.concept_sets);
    assert!(codesets.sql().contains(r#""catalog"."voc"."concept_ancestor""#));

    let resource = ctx.materialize(&codesets)?;
    assert!(resource.qualified_name().starts_with(r#""catalog"."schema"."codeset_"#));

    let creates = backend.raw_sql_calls();
    assert_eq!(creates.len(), 1);
    assert!(creates[0].contains("CREATE TABLE"));
    assert!(creates[0].contains(r#""catalog"."schema""#));
    assert!(creates[0].contains(codesets.sql()));

    let selects = backend.sql_calls();
    assert_eq!(selects.len(), 1);
    assert_eq!(selects[0], format!("SELECT * FROM {}", resource.qualified_name()));

    resource.cleanup()?;
    assert!(resource.is_released());
    let raw = backend.raw_sql_calls();
    assert_eq!(raw.last().unwrap(), &format!("DROP TABLE IF EXISTS {}", resource.qualified_name()));
    Ok(())
}

#[test]
fn table_prefix_override_names_the_target() -> anyhow::Result<()> {
    let backend = Arc::new(ScriptedBackend::new());
    let ctx = BuildContext::new(
        backend,
        BuildOptions::new()
            .with_temp_emulation_schema("scratch")
            .with_target_table_prefix("cohort_tmp"),
    );
    let definition = parse_cohort_definition(DEFINITION)?;
    let codesets = compile_codesets(&ctx, &definition.concept_sets);
    let resource = ctx.materialize(&codesets)?;
    assert!(resource.qualified_name().starts_with(r#""scratch"."cohort_tmp_"#));
    resource.cleanup()?;
    Ok(())
}

#[test]
fn resolution_chain_matches_backend_capabilities() {
    // database-scoped backend: one lookup, combined qualifier
    let by_database = ScriptedBackend::with_lookup(LookupBehavior::Database);
    let handle = resolve(&by_database, Some("cat.schema"), "concept").unwrap();
    assert_eq!(handle.descriptor(), "db:cat.schema.concept");
    assert_eq!(by_database.calls().len(), 1);

    // schema-scoped backend: failing database attempt, then schema
    let by_schema = ScriptedBackend::with_lookup(LookupBehavior::Schema);
    let handle = resolve(&by_schema, Some("public"), "concept").unwrap();
    assert_eq!(handle.descriptor(), "schema:public.concept");
    let calls = by_schema.calls();
    assert_eq!(
        calls[0],
        BackendCall::Table {
            name: "concept".into(),
            database: Some("public".into()),
            schema: None,
        }
    );
    assert_eq!(
        calls[1],
        BackendCall::Table {
            name: "concept".into(),
            database: None,
            schema: Some("public".into()),
        }
    );

    // lookup-less backend: two failing lookups, then the raw select
    let raw_only = ScriptedBackend::new();
    let handle = resolve(&raw_only, Some("cat.db"), "concept").unwrap();
    assert!(handle.descriptor().contains(r#""cat"."db"."concept""#));
    assert_eq!(raw_only.calls().len(), 3);
}

#[test]
fn concurrent_materializations_get_distinct_names() {
    let backend = Arc::new(ScriptedBackend::new());
    let ctx = Arc::new(BuildContext::new(
        backend,
        BuildOptions::new().with_temp_emulation_schema("scratch"),
    ));
    let definition = parse_cohort_definition(DEFINITION).unwrap();
    let codesets = Arc::new(compile_codesets(ctx.as_ref(), &definition.concept_sets));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let ctx = ctx.clone();
            let codesets = codesets.clone();
            std::thread::spawn(move || {
                let resource = ctx.materialize(codesets.as_ref()).unwrap();
                let name = resource.qualified_name().to_string();
                resource.cleanup().unwrap();
                name
            })
        })
        .collect();

    let mut names: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 8);
}

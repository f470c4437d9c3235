//! Report rendering: JSON and Markdown from one shared [`MappingReport`].
//!
//! Both renderers consume the same in-memory object — neither regenerates
//! anything on its own — and both degrade to empty tables rather than errors
//! when a source produced zero entities.

use std::fmt::Write as _;

use crate::error::Result;
use crate::models::MappingReport;

/// Serialize the mapping list verbatim.
pub fn to_json(report: &MappingReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(&report.mappings)?)
}

/// Render the Markdown report: Summary, Mapped Entities, then one Unmapped
/// Entities table per source, in that fixed order.
pub fn to_markdown(report: &MappingReport) -> String {
    let mut md = String::new();

    md.push_str("# Entity Mapping Report\n\n");
    let _ = writeln!(
        md,
        "_Generated on: {}_\n",
        chrono::Local::now().format("%Y-%m-%d")
    );

    md.push_str("## Summary\n\n");
    md.push_str("| Source | Entities |\n");
    md.push_str("|--------|----------|\n");
    for summary in &report.sources {
        let _ = writeln!(md, "| {} | {} |", summary.source, summary.total);
    }
    md.push('\n');

    let high = report.mappings.iter().filter(|m| m.confidence > 0.8).count();
    let medium = report
        .mappings
        .iter()
        .filter(|m| m.confidence > 0.5 && m.confidence <= 0.8)
        .count();
    let low = report.mappings.iter().filter(|m| m.confidence <= 0.5).count();
    let _ = writeln!(md, "- **Total mappings**: {}", report.mappings.len());
    let _ = writeln!(md, "- High confidence (> 0.80): {high}");
    let _ = writeln!(md, "- Medium confidence (> 0.50): {medium}");
    let _ = writeln!(md, "- Low confidence (≤ 0.50): {low}");
    md.push('\n');

    md.push_str("## Mapped Entities\n\n");
    md.push_str("| Source | Target | Confidence | Mapped Fields | Unmapped (source) | Unmapped (target) |\n");
    md.push_str("|--------|--------|------------|---------------|-------------------|-------------------|\n");
    for mapping in &report.mappings {
        let _ = writeln!(
            md,
            "| {} | {} | {:.2} | {} | {} | {} |",
            mapping.source_entity,
            mapping.target_entity,
            mapping.confidence,
            mapping.field_mappings.len(),
            mapping.unmapped_source_fields.len(),
            mapping.unmapped_target_fields.len(),
        );
    }
    md.push('\n');

    for summary in &report.sources {
        let _ = writeln!(md, "## Unmapped Entities ({})\n", summary.source);
        md.push_str("| Entity | Fields |\n");
        md.push_str("|--------|--------|\n");
        for unmapped in &summary.unmapped {
            let _ = writeln!(md, "| {} | {} |", unmapped.entity, unmapped.fields.join(", "));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use crate::models::{EntityMapping, NormalizedEntity, SourceTag};

    use super::*;

    fn entity(tag: SourceTag, name: &str, fields: &[&str]) -> NormalizedEntity {
        let mut e = NormalizedEntity::new(tag, name, PathBuf::from("test"));
        for f in fields {
            e.fields.insert(f.to_string(), "string".to_string());
        }
        e
    }

    fn sample_report() -> MappingReport {
        let sources = vec![
            entity(SourceTag::Rails, "Course", &["id", "title", "account_id"]),
            entity(SourceTag::Rails, "Enrollment", &["id", "user_id"]),
        ];
        let targets = vec![entity(SourceTag::Rust, "Course", &["id", "title", "description"])];
        let mappings = vec![EntityMapping {
            source_entity: "rails.Course".to_string(),
            target_entity: "rust.Course".to_string(),
            confidence: 4.0 / 6.0,
            field_mappings: BTreeMap::from([
                ("id".to_string(), "id".to_string()),
                ("title".to_string(), "title".to_string()),
            ]),
            unmapped_source_fields: vec!["account_id".to_string()],
            unmapped_target_fields: vec!["description".to_string()],
        }];
        MappingReport::build(SourceTag::Rails, &sources, SourceTag::Rust, &targets, mappings)
    }

    #[test]
    fn json_is_the_mapping_list_verbatim() {
        let report = sample_report();
        let json = to_json(&report).unwrap();
        let parsed: Vec<EntityMapping> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report.mappings);
    }

    #[test]
    fn json_is_idempotent_for_the_same_report() {
        let report = sample_report();
        assert_eq!(to_json(&report).unwrap(), to_json(&report).unwrap());
    }

    #[test]
    fn markdown_sections_appear_in_fixed_order() {
        let md = to_markdown(&sample_report());
        let summary = md.find("## Summary").unwrap();
        let mapped = md.find("## Mapped Entities").unwrap();
        let unmapped_rails = md.find("## Unmapped Entities (rails)").unwrap();
        let unmapped_rust = md.find("## Unmapped Entities (rust)").unwrap();
        assert!(summary < mapped && mapped < unmapped_rails && unmapped_rails < unmapped_rust);
    }

    #[test]
    fn markdown_rows_carry_confidence_to_two_decimals() {
        let md = to_markdown(&sample_report());
        assert!(md.contains("| rails.Course | rust.Course | 0.67 | 2 | 1 | 1 |"));
    }

    #[test]
    fn mapped_plus_unmapped_reconciles_with_totals() {
        let report = sample_report();
        let md = to_markdown(&report);
        // rails: 2 extracted = 1 mapped + 1 unmapped.
        assert!(md.contains("| rails | 2 |"));
        assert!(md.contains("| Enrollment | id, user_id |"));
        let rails = &report.sources[0];
        assert_eq!(report.mappings.len() + rails.unmapped.len(), rails.total);
    }

    #[test]
    fn empty_sources_degrade_to_empty_tables() {
        let report = MappingReport::build(SourceTag::Rails, &[], SourceTag::Rust, &[], vec![]);
        let md = to_markdown(&report);
        assert!(md.contains("| rails | 0 |"));
        assert!(md.contains("- **Total mappings**: 0"));
        assert!(md.contains("## Unmapped Entities (rails)"));
    }
}

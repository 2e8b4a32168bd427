use std::collections::HashMap;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use wcs_classify::{filter_externals, CompiledConfig, StatusCategorizer};
use wcs_types::{PropStatus, RawStatusRecord, ScmConfig, Status};

fn status_strategy() -> impl Strategy<Value = Status> {
    prop::sample::select(
        Status::ALL
            .iter()
            .copied()
            .filter(|s| *s != Status::External)
            .collect::<Vec<_>>(),
    )
}

fn props_strategy() -> impl Strategy<Value = PropStatus> {
    prop::sample::select(vec![
        PropStatus::None,
        PropStatus::Normal,
        PropStatus::Modified,
        PropStatus::Conflicted,
    ])
}

fn changelist_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec!["feat".to_string(), "fix".to_string()]))
}

fn records_strategy() -> impl Strategy<Value = Vec<RawStatusRecord>> {
    prop::collection::vec((status_strategy(), props_strategy(), changelist_strategy()), 0..64)
        .prop_map(|specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(i, (status, props, changelist))| {
                    let mut record = RawStatusRecord::new(format!("dir{}/f{i}.txt", i % 4), status)
                        .with_props(props);
                    if let Some(name) = changelist {
                        record = record.in_changelist(name);
                    }
                    record
                })
                .collect()
        })
}

fn is_materialized_locally(record: &RawStatusRecord) -> bool {
    let unchanged = record.status.is_unchanged()
        && record.props.is_unchanged()
        && record.changelist().is_none();
    !unchanged && !matches!(record.status, Status::Ignored | Status::Incomplete)
}

proptest! {
    #[test]
    fn every_shown_record_lands_in_exactly_one_group(records in records_strategy()) {
        let root = Path::new("/wc");
        let compiled = CompiledConfig::compile(root, &ScmConfig::default()).unwrap();
        let result = StatusCategorizer::new(root, &compiled).categorize(&records);

        let mut seen: HashMap<PathBuf, usize> = HashMap::new();
        for resource in result.local_resources() {
            *seen.entry(resource.resource_path.clone()).or_default() += 1;
        }

        for record in &records {
            let path = root.join(&record.path);
            let expected = usize::from(is_materialized_locally(record));
            prop_assert_eq!(seen.get(&path).copied().unwrap_or(0), expected, "{:?}", record);
        }
        prop_assert_eq!(result.local_len(), seen.len());
    }

    #[test]
    fn skip_rule_never_materializes_unchanged_records(
        statuses in prop::collection::vec(
            prop::sample::select(vec![Status::Normal, Status::None]),
            0..32,
        )
    ) {
        let records: Vec<_> = statuses
            .into_iter()
            .enumerate()
            .map(|(i, status)| RawStatusRecord::new(format!("f{i}"), status).with_props(PropStatus::Normal))
            .collect();
        let root = Path::new("/wc");
        let compiled = CompiledConfig::compile(root, &ScmConfig::default()).unwrap();
        let result = StatusCategorizer::new(root, &compiled).categorize(&records);
        prop_assert!(result.is_empty());
        prop_assert!(result.ignored.is_empty());
    }

    #[test]
    fn nothing_below_a_foreign_mount_survives(
        records in records_strategy(),
        mount in 0usize..4,
    ) {
        let mut all = vec![RawStatusRecord::new(format!("dir{mount}"), Status::Normal).external_from("other")];
        all.extend(records);
        let filtered = filter_externals(all, Some("project"));
        let prefix = format!("dir{mount}/");
        prop_assert!(filtered.records.iter().all(|r| !r.path.starts_with(&prefix)));
        prop_assert!(filtered.records.iter().all(|r| r.status != Status::External));
    }
}

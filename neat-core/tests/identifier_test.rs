//! End-to-end coverage of the identifier grammar and its contracts

use neat_core::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn parse_entity_scenarios() {
    let parsed = parse_entity("asset:MyAsset(capacity=100,type=storage)").unwrap();
    assert_eq!(parsed.prefix, "asset");
    assert_eq!(parsed.suffix, "MyAsset");
    assert_eq!(
        parsed.properties.get("capacity").map(String::as_str),
        Some("100")
    );
    assert_eq!(
        parsed.properties.get("type").map(String::as_str),
        Some("storage")
    );

    let parsed = parse_entity("MyAsset").unwrap();
    assert_eq!(parsed.prefix, "");
    assert_eq!(parsed.suffix, "MyAsset");
    assert!(parsed.properties.is_empty());

    assert_eq!(parse_entity("").unwrap(), ParsedEntity::default());
}

#[test]
fn long_with_unit_prints_canonically() {
    let value_type = ValueType::Long {
        unit: Some(UnitEntity::new("qudt", "meter").unwrap()),
    };
    assert_eq!(value_type.to_string(), "xsd:long(unit=qudt:meter)");
}

#[test]
fn entity_as_tuple() {
    let entity = Entity::new("test", "TestSuffix").unwrap();
    assert_eq!(
        entity.as_tuple(),
        ("test".to_string(), "TestSuffix".to_string())
    );
}

#[test]
fn pattern_rejection() {
    assert!(matches!(
        ConceptEntity::new("1abc", "valid"),
        Err(NeatError::PatternViolation { field: "prefix", .. })
    ));
    assert!(matches!(
        ConceptEntity::unprefixed(""),
        Err(NeatError::PatternViolation { field: "suffix", .. })
    ));
    assert!(matches!(
        ConceptEntity::unprefixed("has space"),
        Err(NeatError::PatternViolation { field: "suffix", .. })
    ));
    // an explicit empty prefix is not Undefined
    assert!(Entity::new("", "valid").is_err());
}

#[test]
fn concept_version_elision_pair() {
    let plain = ConceptEntity::unprefixed("TestSuffix").unwrap();
    let versioned = plain.clone().with_version("1.0").unwrap();
    assert_eq!(plain.to_string(), "TestSuffix");
    assert_eq!(versioned.to_string(), "TestSuffix(version=1.0)");

    let prefixed = ConceptEntity::new("test", "TestSuffix").unwrap();
    let prefixed_versioned = prefixed.clone().with_version("1.0").unwrap();
    assert_eq!(prefixed.to_string(), "test:TestSuffix");
    assert_eq!(prefixed_versioned.to_string(), "test:TestSuffix(version=1.0)");
}

#[test]
fn sentinels_are_distinct_values() {
    assert_eq!(Space::Undefined, Space::Undefined);
    assert!(Space::Undefined.is_undefined());

    let unknown = ConceptEntity::unknown();
    assert_eq!(unknown.to_string(), UNKNOWN_TOKEN);
    assert_ne!(unknown, ConceptEntity::unprefixed("TestSuffix").unwrap());

    // the absence sentinel and the unresolved sentinel never print alike
    let undefined_concept = ConceptEntity::unprefixed("TestSuffix").unwrap();
    assert!(undefined_concept.space().is_undefined());
    assert!(!undefined_concept.is_unknown());
}

#[test]
fn batch_validation_collects_all_problems() {
    let raw_rows = ["1bad:Thing", "power:Ok", "power:", "space here:Thing"];

    let mut report = IssueReport::new();
    let mut parsed = Vec::new();
    for row in raw_rows {
        match ConceptEntity::from_string(row, None) {
            Ok(concept) => parsed.push(concept),
            Err(err) => report.add_from_error(&err),
        }
    }

    assert_eq!(parsed.len(), 1);
    assert_eq!(report.summary.error_count, 3);
    assert!(report.has_errors());
}

#[test]
fn as_id_resolution_through_settings() {
    let settings = ResolutionSettings::from_yaml("default_space: power\ndefault_version: v1\n")
        .unwrap();

    let view = ViewEntity::from_string("GeneratingUnit", None).unwrap();
    let id = view
        .as_id(settings.default_space(), settings.default_version())
        .unwrap();
    assert_eq!(id.space, "power");
    assert_eq!(id.external_id, "GeneratingUnit");
    assert_eq!(id.version.as_deref(), Some("v1"));
}

proptest! {
    #[test]
    fn concept_round_trip(
        prefix in "[a-z][a-z0-9_-]{0,10}",
        suffix in "[A-Za-z0-9][A-Za-z0-9._-]{0,20}",
        version in proptest::option::of("[0-9][A-Za-z0-9.]{0,6}"),
    ) {
        let mut concept = ConceptEntity::new(prefix, suffix).unwrap();
        if let Some(version) = version {
            concept = concept.with_version(version).unwrap();
        }
        let reparsed = ConceptEntity::from_string(&concept.to_string(), None).unwrap();
        prop_assert_eq!(&concept, &reparsed);
    }

    #[test]
    fn view_round_trip(
        space in "[a-z][a-z0-9_-]{0,10}",
        external_id in "[A-Za-z0-9][A-Za-z0-9._-]{0,20}",
        version in proptest::option::of("[0-9][A-Za-z0-9.]{0,6}"),
    ) {
        let mut view = ViewEntity::new(space, external_id).unwrap();
        if let Some(version) = version {
            view = view.with_version(version).unwrap();
        }
        let reparsed = ViewEntity::from_string(&view.to_string(), None).unwrap();
        prop_assert_eq!(&view, &reparsed);
    }

    #[test]
    fn reparse_is_idempotent(
        prefix in "[a-z][a-z0-9]{0,8}",
        suffix in "[A-Za-z0-9][A-Za-z0-9._-]{0,20}",
        key in "[a-z][a-z0-9]{0,8}",
        value in "[A-Za-z0-9:.][A-Za-z0-9:._-]{0,12}",
    ) {
        let input = format!("{prefix}:{suffix}({key}={value})");
        let first = parse_entity(&input).unwrap();
        let second = parse_entity(&first.to_string()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn sorting_is_stable(
        raw in prop::collection::vec(
            ("[a-z][a-z0-9]{0,6}", "[A-Za-z0-9]{1,8}"),
            100,
        ),
    ) {
        let entities: Vec<ConceptEntity> = raw
            .into_iter()
            .map(|(prefix, suffix)| ConceptEntity::new(prefix, suffix).unwrap())
            .collect();

        let mut first = entities.clone();
        let mut second = entities;
        first.sort();
        second.sort();
        prop_assert_eq!(first, second);
    }
}

//! End-to-end tests for the finder compiler
//!
//! These tests compile whole expressions against a small schema and check
//! validation, structure, errors, bound parameters and completion.

use super::*;
use finder_schema::{Property, Schema, TypeRef};
use pretty_assertions::assert_eq;

pub(crate) fn fixture_schema() -> Schema {
    Schema::new()
        .with_entity(
            "Person",
            vec![
                Property::new("id", "Long").identifier(),
                Property::new("name", "String"),
                Property::new("nameCode", "String"),
                Property::new("lastName", "String"),
                Property::new("age", "Integer"),
                Property::new("active", "boolean"),
                Property::new("android", "boolean"),
                Property::new("distinctRegion", "String"),
                Property::new("topScore", "Integer"),
                Property::new("born", "LocalDate"),
                Property::new("location", "Point"),
                Property::new("address", "Address"),
                Property::new("tags", "Set<String>"),
            ],
        )
        .with_entity(
            "Address",
            vec![
                Property::new("street", "String"),
                Property::new("country", "Country"),
            ],
        )
        .with_entity("Country", vec![Property::new("code", "String")])
        .with_entity(
            "Order",
            vec![
                Property::new("number", "String"),
                Property::new("customer", "Customer"),
            ],
        )
        .with_entity(
            "Customer",
            vec![Property::new("city", "String"), Property::new("name", "String")],
        )
        .with_entity(
            "Shipment",
            vec![
                Property::new("name", "String"),
                Property::new("order", "Long"),
                Property::new("description", "String"),
            ],
        )
        .with_entity(
            "Pair",
            vec![Property::new("a", "String"), Property::new("b", "int")],
        )
        .with_entity(
            "Node",
            vec![Property::new("parent", "Node"), Property::new("label", "String")],
        )
}

fn compile_on(entity: &str, input: &str) -> Result<FinderExpression> {
    FinderExpression::compile(input, entity, &fixture_schema())
}

fn parse_success(input: &str) -> FinderExpression {
    compile_on("Person", input).unwrap_or_else(|e| panic!("Failed to compile {}: {}", input, e))
}

fn parse_valid(input: &str) -> FinderExpression {
    let expr = parse_success(input);
    assert!(
        expr.is_valid(),
        "Expected {} to be valid, canonical form was {}",
        input,
        expr.to_canonical_string()
    );
    expr
}

fn parse_failure(input: &str) -> ParseError {
    match compile_on("Person", input) {
        Ok(expr) => panic!("Expected compile failure for: {}, but got: {:?}", input, expr),
        Err(e) => e,
    }
}

fn suggestions(entity: &str, input: &str) -> Vec<String> {
    compile_on(entity, input)
        .unwrap_or_else(|e| panic!("Failed to compile {}: {}", input, e))
        .suggest_next()
        .to_vec()
}

fn has(list: &[String], candidate: &str) -> bool {
    list.iter().any(|s| s == candidate)
}

#[test]
fn test_round_trip() {
    for input in [
        "findByName",
        "findByNameAndAge",
        "findDistinctByLastNameAndAgeGreaterThanOrderByAgeDesc",
        "readTop10ByActiveIsTrueOrderByNameAscAgeDesc",
        "queryFirstByBornBefore",
        "countByNameStartingWithIgnoreCase",
        "findByNameOrLastNameAllIgnoringCase",
        "findByAgeBetweenAndNameIsNotNull",
        "findByLocationNear",
        "findByAddressCountryCode",
        "findLastNameByAgeIn",
        "findByOrderByAge",
    ] {
        let expr = parse_valid(input);
        assert_eq!(expr.to_canonical_string(), input);
        assert_eq!(expr.to_string(), input);
    }
}

#[test]
fn test_longest_match() {
    let expr = parse_valid("findByNameCodeEquals");
    let condition = expr.predicate().last_condition().unwrap();
    assert_eq!(condition.property().unwrap().property().name(), "nameCode");
    assert_eq!(condition.operator(), Operator::Equals);
}

#[test]
fn test_operator_precedence() {
    let expr = parse_valid("findByActiveIsNotNull");
    let condition = expr.predicate().last_condition().unwrap();
    assert_eq!(condition.operator(), Operator::IsNotNull);

    let expr = parse_valid("findByActiveIsNull");
    let condition = expr.predicate().last_condition().unwrap();
    assert_eq!(condition.operator(), Operator::IsNull);
}

#[test]
fn test_nested_property() {
    let expr = compile_on("Order", "findByCustomerCity").unwrap();
    assert!(expr.is_valid());
    let property = expr.predicate().last_condition().unwrap().property().unwrap();
    assert_eq!(property.path(), vec!["customer", "city"]);
    assert_eq!(property.property().name(), "city");
    assert!(property.property().is_textual());
}

#[test]
fn test_nested_leaf_decides_operators() {
    // `customer` itself is not text, but its `city` is
    let expr = compile_on("Order", "findByCustomerCityStartingWithIgnoreCase").unwrap();
    assert!(expr.is_valid());
}

#[test]
fn test_relation_depth_config() {
    let config = CompilerConfig {
        max_relation_depth: 0,
        ..CompilerConfig::default()
    };
    let expr =
        FinderExpression::compile_with_config("findByCustomerCity", "Order", &fixture_schema(), &config)
            .unwrap();
    assert!(!expr.is_valid());
    assert_eq!(expr.to_canonical_string(), "findByCustomer");
}

#[test]
fn test_cyclic_relations_terminate() {
    let expr = compile_on("Node", "findByParentParentParentLabel").unwrap();
    assert!(expr.is_valid());

    let deep = "findBy".to_string() + &"Parent".repeat(40) + "Label";
    let expr = compile_on("Node", &deep).unwrap();
    assert!(!expr.is_valid());
}

#[test]
fn test_keyword_inside_property_name() {
    let expr = parse_valid("findByAndroidAndActive");
    assert_eq!(expr.predicate().groups()[0].conditions().len(), 2);
}

#[test]
fn test_order_by_is_sort_clause() {
    let expr = parse_valid("findByNameOrderByAge");
    assert_eq!(expr.predicate().order_by().unwrap().terms().len(), 1);

    assert!(matches!(
        parse_failure("findByNameAndOrderByAge"),
        ParseError::IncompleteBeforeOrderBy { .. }
    ));
}

#[test]
fn test_order_property() {
    let expr = compile_on("Shipment", "findByNameAndOrder").unwrap();
    assert!(expr.is_valid());
    let condition = expr.predicate().last_condition().unwrap();
    assert_eq!(condition.property().unwrap().property().name(), "order");

    let expr = compile_on("Shipment", "findByNameAndOrderByName").unwrap();
    assert!(expr.predicate().order_by().is_none());
    assert!(!expr.is_valid());

    let expr = compile_on("Shipment", "findByOrderOrderByName").unwrap();
    assert!(expr.is_valid());
}

#[test]
fn test_limits() {
    let expr = parse_valid("findTopByName");
    assert_eq!(expr.max_results(), Some(1));

    let expr = parse_valid("findFirst25ByName");
    assert_eq!(expr.max_results(), Some(25));

    let expr = parse_valid("findByName");
    assert_eq!(expr.max_results(), None);

    assert_eq!(parse_failure("findTop0ByName"), ParseError::ZeroLimit);
    assert!(matches!(
        parse_failure("findTop4294967296ByName"),
        ParseError::InvalidLimit { .. }
    ));
}

#[test]
fn test_distinct() {
    assert!(parse_valid("findDistinctByName").is_distinct());
    assert!(!parse_valid("findByName").is_distinct());
}

#[test]
fn test_marker_false_alarm() {
    let expr = parse_valid("findDistinctRegionByName");
    assert!(!expr.is_distinct());
    assert_eq!(expr.subject().projection().unwrap().spelling(), "DistinctRegion");

    let expr = parse_valid("findTopScoreByName");
    assert_eq!(expr.max_results(), None);

    let expr = parse_valid("findDistinctTopScoreByName");
    assert!(expr.is_distinct());
    assert_eq!(expr.max_results(), None);
}

#[test]
fn test_count() {
    let expr = parse_valid("countByActiveIsTrue");
    assert!(expr.is_count());
    assert_eq!(expr.query_kind(), Some(QueryKind::Count));

    let expr = parse_success("countDistinctByName");
    assert!(!expr.is_valid());
}

#[test]
fn test_ignore_case_guard() {
    assert!(matches!(
        parse_failure("findByAgeIgnoreCase"),
        ParseError::IgnoreCaseNotSupported { .. }
    ));
    assert!(matches!(
        parse_failure("findByNameAndActiveIgnoringCase"),
        ParseError::IgnoreCaseNotSupported { .. }
    ));

    let expr = parse_valid("findByNameIgnoreCase");
    let condition = expr.predicate().last_condition().unwrap();
    assert_eq!(condition.case_folding(), CaseFolding::Always);

    // The whole-predicate marker only applies where it can
    let expr = parse_valid("findByNameAndAgeAllIgnoreCase");
    assert_eq!(expr.predicate().case_folding(), CaseFolding::WhenPossible);
}

#[test]
fn test_structural_errors() {
    assert!(matches!(parse_failure("findByOrName"), ParseError::DanglingOr { .. }));
    assert!(matches!(parse_failure("findByNameOrOrAge"), ParseError::DanglingOr { .. }));
    assert!(matches!(parse_failure("findByAndName"), ParseError::DanglingAnd { .. }));
    assert!(matches!(parse_failure("findBySalaryAndName"), ParseError::DanglingAnd { .. }));
    assert!(matches!(
        parse_failure("findByNameOrderByAgeOrderByName"),
        ParseError::MultipleOrderBy { count: 2 }
    ));
    assert!(matches!(
        parse_failure("findByNameOrderByAsc"),
        ParseError::DirectionWithoutProperty { .. }
    ));
    assert!(matches!(
        compile_on("Robot", "findByName"),
        Err(ParseError::UnknownEntity { ref entity }) if entity == "Robot"
    ));
}

#[test]
fn test_resolution_gaps_are_not_errors() {
    for input in [
        "",
        "f",
        "find",
        "findDist",
        "findBy",
        "findBySalary",
        "findByNameAnd",
        "findByNameOr",
        "findByNameOrderBy",
        "findByNameXyz",
        "findByAgeGreater",
    ] {
        let expr = parse_success(input);
        assert!(!expr.is_valid(), "{input} should not be valid");
    }
}

#[test]
fn test_round_trip_mismatch() {
    let expr = parse_success("findByNameXyz");
    assert!(expr.is_complete());
    assert_eq!(expr.to_canonical_string(), "findByName");
    assert!(!expr.is_valid());
}

#[test]
fn test_excluded_properties() {
    // identifiers and collections never resolve
    let expr = parse_success("findById");
    assert!(!expr.is_valid());
    let expr = parse_success("findByTags");
    assert!(!expr.is_valid());
}

#[test]
fn test_bound_parameters() {
    let expr = parse_valid("findByAgeBetweenAndNameOrAgeIn");
    let params: Vec<String> = expr
        .bound_parameter_list()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        params,
        vec![
            "Integer age1",
            "Integer age2",
            "String name",
            "List<Integer> age3"
        ]
    );

    let expr = parse_valid("findByNameIsNullAndActiveIsTrue");
    assert!(expr.bound_parameter_list().is_empty());

    let expr = compile_on("Order", "findByCustomerCityOrNumberNotIn").unwrap();
    let params = expr.bound_parameter_list();
    assert_eq!(params[0].name, "customerCity");
    assert_eq!(params[1].type_ref, TypeRef::list_of(TypeRef::new("String")));
    assert_eq!(params[1].name, "number");
}

#[test]
fn test_shape_check() {
    assert!(FinderExpression::is_valid_shape("findByWhateverAndSomethingElse"));
    assert!(!FinderExpression::is_valid_shape("findTop0ByName"));
    assert!(!FinderExpression::is_valid_shape("findByNameAnd"));
}

#[test]
fn test_free_compile_function() {
    let expr = compile("findByName", "Person", &fixture_schema()).unwrap();
    assert_eq!(expr.entity(), "Person");
    assert_eq!(expr.source(), "findByName");
}

#[test]
fn test_expression_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FinderExpression>();

    let expr = std::sync::Arc::new(parse_valid("findByName"));
    let handle = {
        let expr = std::sync::Arc::clone(&expr);
        std::thread::spawn(move || expr.is_valid())
    };
    assert!(handle.join().unwrap());
}

#[test]
fn test_serialize() {
    let expr = parse_valid("findTop3ByNameOrderByAgeDesc");
    let json = serde_json::to_value(&expr).unwrap();
    assert_eq!(json["source"], "findTop3ByNameOrderByAgeDesc");
    assert_eq!(json["subject"]["limit"]["cap"], 3);
}

// Completion

#[test]
fn test_suggest_query_kinds() {
    assert_eq!(suggestions("Pair", ""), vec!["find", "read", "query", "count"]);
    assert_eq!(suggestions("Pair", "xyz"), vec!["find", "read", "query", "count"]);
}

#[test]
fn test_suggest_after_property() {
    let list = suggestions("Pair", "findByA");
    assert_eq!(list[0], "findByA");
    for candidate in ["findByAOrderBy", "findByAAnd", "findByAOr", "findByAIgnoreCase"] {
        assert!(has(&list, candidate), "missing {candidate}");
    }
    for operator in lookup_operators(finder_schema::TypeCategory::Text) {
        for keyword in operator.keywords() {
            assert!(has(&list, &format!("findByA{keyword}")), "missing {keyword}");
        }
    }
    for kind in ["find", "read", "query", "count"] {
        assert!(!has(&list, kind));
    }
    // numeric operators do not apply to text
    assert!(!has(&list, "findByAGreaterThan"));
}

#[test]
fn test_suggest_numeric_property() {
    let list = suggestions("Pair", "findByB");
    assert!(has(&list, "findByBGreaterThan"));
    assert!(has(&list, "findByBBetween"));
    assert!(!has(&list, "findByBIgnoreCase"));
    assert!(!has(&list, "findByBLike"));
}

#[test]
fn test_suggest_subject() {
    let list = suggestions("Pair", "find");
    assert_eq!(
        list,
        vec![
            "findBy",
            "findA",
            "findB",
            "findDistinct",
            "findFirst",
            "findTop"
        ]
    );

    let list = suggestions("Pair", "count");
    assert_eq!(list, vec!["countBy", "countA", "countB"]);

    let list = suggestions("Pair", "findA");
    assert_eq!(list, vec!["findABy"]);
}

#[test]
fn test_suggest_after_markers() {
    let list = suggestions("Person", "findDistinct");
    assert!(has(&list, "findDistinctBy"));
    assert!(has(&list, "findDistinctTop"));
    assert!(has(&list, "findDistinctRegion"));
    assert!(!has(&list, "findDistinctDistinct"));

    let list = suggestions("Person", "findTop5");
    assert!(has(&list, "findTop5By"));
    assert!(!has(&list, "findTop5Top"));
    assert!(!has(&list, "findTop5Distinct"));
}

#[test]
fn test_suggest_unresolved_condition() {
    let list = suggestions("Pair", "findByAAnd");
    assert_eq!(list, vec!["findByAAndB"]);

    let list = suggestions("Pair", "findByAOr");
    assert_eq!(list, vec!["findByAOrA", "findByAOrB", "findByAOrderBy"]);

    let list = suggestions("Pair", "findBy");
    assert_eq!(list, vec!["findByA", "findByB"]);
}

#[test]
fn test_suggest_partial_operator() {
    let expr = parse_success("findByNameIsN");
    let list = expr.suggestions_for_input();
    assert!(list.contains(&"findByNameIsNull"));
    assert!(list.contains(&"findByNameIsNotNull"));
    assert!(list.contains(&"findByNameIsNot"));
    assert!(!list.contains(&"findByNameIsLike"));
    assert!(!list.contains(&"findByNameIs"));
}

#[test]
fn test_suggest_related_properties() {
    let list = suggestions("Person", "findByAddress");
    assert!(has(&list, "findByAddressStreet"));
    assert!(has(&list, "findByAddressCountry"));
    assert!(!has(&list, "findByAddressIgnoreCase"));

    let list = suggestions("Person", "findByAddressCountry");
    assert!(has(&list, "findByAddressCountryCode"));
}

#[test]
fn test_suggest_all_ignore_case() {
    let list = suggestions("Person", "findByNameAllIgnoreCase");
    assert_eq!(
        list,
        vec!["findByNameAllIgnoreCase", "findByNameAllIgnoreCaseOrderBy"]
    );
}

#[test]
fn test_suggest_all_ignore_case_after_join() {
    let list = suggestions("Person", "findByNameAndAllIgnoreCase");
    assert!(has(&list, "findByNameAndAge"));
    assert!(!has(&list, "findByNameAndAllIgnoreCase"));
    assert!(!has(&list, "findByNameAndAllIgnoreCaseOrderBy"));

    let list = suggestions("Person", "findByNameOrAllIgnoreCase");
    assert!(has(&list, "findByNameOrAge"));
    assert!(!has(&list, "findByNameOrAllIgnoreCase"));
    assert!(!has(&list, "findByNameOrAllIgnoreCaseOrderBy"));
}

#[test]
fn test_keyword_typed_as_property_start() {
    let expr = parse_success("findByAnd");
    assert!(!expr.is_valid());
    assert_eq!(expr.suggestions_for_input(), vec!["findByAndroid"]);

    let expr = parse_success("findByNameAndAnd");
    assert_eq!(expr.suggestions_for_input(), vec!["findByNameAndAndroid"]);

    let expr = compile_on("Shipment", "findByNameOrderByDesc").unwrap();
    assert!(!expr.is_valid());
    assert_eq!(
        expr.suggestions_for_input(),
        vec!["findByNameOrderByDescription"]
    );
    assert!(compile_on("Shipment", "findByNameOrderByDescription").unwrap().is_valid());
}

#[test]
fn test_suggest_longer_property() {
    let list = suggestions("Person", "findByName");
    assert!(has(&list, "findByNameCode"));

    let list = suggestions("Person", "findByAgeAndName");
    assert!(has(&list, "findByAgeAndNameCode"));

    let list = suggestions("Person", "findByNameCode");
    assert!(!has(&list, "findByNameCodeCode"));
}

#[test]
fn test_suggest_sort_clause() {
    let list = suggestions("Pair", "findByAOrderBy");
    assert_eq!(list, vec!["findByAOrderByA", "findByAOrderByB"]);

    let list = suggestions("Pair", "findByAOrderByB");
    assert_eq!(
        list,
        vec!["findByAOrderByB", "findByAOrderByBAsc", "findByAOrderByBDesc"]
    );

    let list = suggestions("Pair", "findByAOrderByBDesc");
    assert_eq!(list, vec!["findByAOrderByBDesc", "findByAOrderByBDescA"]);
}

#[test]
fn test_suggestions_extend_input() {
    let expr = parse_success("findByNam");
    assert_eq!(
        expr.suggestions_for_input(),
        vec!["findByName", "findByNameCode"]
    );
}

#[test]
fn test_every_suggestion_compiles() {
    for input in [
        "",
        "find",
        "findBy",
        "findByAnd",
        "findByName",
        "findByNameAndAnd",
        "findByNameAndAllIgnoreCase",
        "findByNameOrAllIgnoreCase",
        "findByAddress",
        "findByNameOrderBy",
    ] {
        for candidate in parse_success(input).suggest_next() {
            assert!(
                compile_on("Person", candidate).is_ok(),
                "suggestion {candidate} for {input} does not compile"
            );
        }
    }
}

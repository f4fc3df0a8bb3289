//! Behavioural tests for archetype catalog loading and response synthesis.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

use demo_catalog::{
    ArchetypeCatalog, CatalogError, PersonalityType, ResponseSet, ResponseSynthesizer, ScoreVector,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

const BROKEN_TOTAL_JSON: &str = r#"{
    "version": 1,
    "clients": [{
        "displayName": "Avery Stone",
        "baseIdentity": "avery.stone@example.com",
        "personalityType": "D",
        "scoreVector": {"D": 60, "I": 20, "S": 10, "C": 5}
    }],
    "staff": [{
        "displayName": "Jordan Vale",
        "baseIdentity": "jordan.vale@example.com",
        "personalityType": "I",
        "scoreVector": {"D": 20, "I": 48, "S": 20, "C": 12}
    }]
}"#;

const FUTURE_VERSION_JSON: &str = r#"{"version": 2, "clients": [], "staff": []}"#;

#[derive(Default, ScenarioState)]
struct World {
    json_input: Slot<String>,
    catalog_result: Slot<Result<ArchetypeCatalog, CatalogError>>,
    scores_before: Slot<Vec<ScoreVector>>,
    sheets: Slot<Vec<(PersonalityType, ResponseSet)>>,
}

impl World {
    fn catalog(&self) -> ArchetypeCatalog {
        self.catalog_result
            .get()
            .expect("catalog result should be set")
            .expect("catalog should be valid")
    }
}

#[fixture]
fn world() -> World {
    World::default()
}

#[given("the bundled catalog")]
fn the_bundled_catalog(world: &World) {
    let catalog = ArchetypeCatalog::bundled();
    world.catalog_result.set(catalog);
}

#[given("catalog JSON whose client scores do not sum to the fixed total")]
fn catalog_json_with_broken_total(world: &World) {
    world.json_input.set(BROKEN_TOTAL_JSON.to_owned());
}

#[given("catalog JSON declaring version 2")]
fn catalog_json_declaring_version_two(world: &World) {
    world.json_input.set(FUTURE_VERSION_JSON.to_owned());
}

#[when("the catalog is parsed")]
fn the_catalog_is_parsed(world: &World) {
    let json = world.json_input.get().expect("JSON input should be set");
    world.catalog_result.set(ArchetypeCatalog::from_json(&json));
}

#[when("responses are synthesized for every client twice")]
fn responses_are_synthesized_twice(world: &World) {
    let catalog = world.catalog();
    world.scores_before.set(
        catalog
            .clients()
            .iter()
            .map(|template| template.score_vector())
            .collect(),
    );
    let mut synthesizer = ResponseSynthesizer::seeded(11);
    let sheets = (0..2)
        .flat_map(|_| catalog.clients().iter())
        .map(|template| {
            let dominant = template.personality_type();
            (dominant, synthesizer.synthesize(dominant))
        })
        .collect::<Vec<_>>();
    world.sheets.set(sheets);
}

#[then("the catalog holds 25 clients and 25 staff")]
fn the_catalog_holds_expected_sizes(world: &World) {
    let catalog = world.catalog();
    assert_eq!(catalog.clients().len(), 25);
    assert_eq!(catalog.staff().len(), 25);
}

#[then("parsing fails with a score total error")]
fn parsing_fails_with_score_total_error(world: &World) {
    match world.catalog_result.get() {
        Some(Err(CatalogError::ScoreTotalMismatch { total: 95, .. })) => {}
        other => panic!("expected ScoreTotalMismatch, got: {other:?}"),
    }
}

#[then("parsing fails with an unsupported version error")]
fn parsing_fails_with_unsupported_version(world: &World) {
    match world.catalog_result.get() {
        Some(Err(CatalogError::UnsupportedVersion { actual: 2, .. })) => {}
        other => panic!("expected UnsupportedVersion, got: {other:?}"),
    }
}

#[then("every answer is the dominant type or its opposite")]
fn every_answer_is_dominant_or_opposite(world: &World) {
    let sheets = world.sheets.get().expect("sheets should be set");
    for (dominant, sheet) in sheets {
        let aligned = sheet.count_of(dominant) + sheet.count_of(dominant.opposite());
        assert_eq!(aligned, sheet.len());
    }
}

#[then("the catalog score vectors are unchanged")]
fn the_catalog_score_vectors_are_unchanged(world: &World) {
    let before = world.scores_before.get().expect("scores should be captured");
    let after: Vec<ScoreVector> = world
        .catalog()
        .clients()
        .iter()
        .map(|template| template.score_vector())
        .collect();
    assert_eq!(before, after);
}

#[scenario(path = "tests/features/archetype_catalog.feature", name = "Bundled catalog loads")]
fn bundled_catalog_loads(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/archetype_catalog.feature",
    name = "Catalog with a broken score vector is rejected"
)]
fn catalog_with_broken_scores_is_rejected(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/archetype_catalog.feature",
    name = "Catalog with an unknown version is rejected"
)]
fn catalog_with_unknown_version_is_rejected(world: World) {
    let _ = world;
}

#[scenario(
    path = "tests/features/archetype_catalog.feature",
    name = "Synthesized responses never change authoritative scores"
)]
fn synthesized_responses_keep_scores(world: World) {
    let _ = world;
}

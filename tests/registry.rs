use std::sync::Arc;

use clap::Parser as _;
use cucumber_glue::{
    cli,
    hook::Kind,
    location,
    step::{Context, Location},
    tag::{TagSet, Tags},
    world::{self, Builder, ModuleRef},
    AfterOrder, MatchError, Registry, RegistryError, TagOperation,
};
use futures::{future::LocalBoxFuture, FutureExt as _};
use regex::Regex;

#[derive(Debug, Default)]
struct World {
    origin: &'static str,
    greet: Option<&'static str>,
    cukes: u32,
    log: Vec<String>,
}

fn have_cukes(w: &mut World, ctx: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        w.cukes = ctx.args().next().and_then(|n| n.parse().ok()).unwrap_or(0);
        w.log.push(format!("have {}", w.cukes));
    }
    .boxed_local()
}

fn have_apples(w: &mut World, _: Context) -> LocalBoxFuture<'_, ()> {
    async move { w.log.push("apples".into()) }.boxed_local()
}

fn eat(w: &mut World, ctx: Context) -> LocalBoxFuture<'_, ()> {
    async move { w.log.push(format!("eat {}", ctx.to_args().join(","))) }
        .boxed_local()
}

fn before_one(w: &mut World) -> LocalBoxFuture<'_, ()> {
    async move { w.log.push("before 1".into()) }.boxed_local()
}

fn before_two(w: &mut World) -> LocalBoxFuture<'_, ()> {
    async move { w.log.push("before 2".into()) }.boxed_local()
}

fn after_one(w: &mut World) -> LocalBoxFuture<'_, ()> {
    async move { w.log.push("after 1".into()) }.boxed_local()
}

fn after_two(w: &mut World) -> LocalBoxFuture<'_, ()> {
    async move { w.log.push("after 2".into()) }.boxed_local()
}

fn after_step(w: &mut World) -> LocalBoxFuture<'_, ()> {
    async move { w.log.push("after step".into()) }.boxed_local()
}

fn greet_a(w: &mut World) {
    w.greet = Some("A");
}

fn greet_b(w: &mut World) {
    w.greet = Some("B");
}

fn re(s: &str) -> Regex {
    Regex::new(s).unwrap()
}

fn module(name: &'static str, f: fn(&mut World)) -> ModuleRef<World> {
    Arc::new(world::from_fn(name, f))
}

#[test]
fn matches_exactly_one_definition() {
    let mut registry = Registry::<World>::new();
    _ = registry
        .given(None, re(r"^I have (\d+) cukes$"), have_cukes)
        .unwrap()
        .given(None, re(r"^I have (\d+) apples$"), have_apples)
        .unwrap();

    let m = registry.match_step("I have 5 cukes").unwrap();
    assert_eq!(m.args(), ["5"]);
    assert_eq!(m.definition.regex().as_str(), r"^I have (\d+) cukes$");
}

#[test]
fn reports_ambiguity_with_every_definition() {
    let fruit = location!();
    let any = location!();
    let mut registry = Registry::<World>::new();
    _ = registry
        .when(Some(fruit), re("^I eat a fruit$"), eat)
        .unwrap()
        .when(Some(any), re("^I eat a (.*)$"), eat)
        .unwrap();

    let Err(MatchError::Ambiguous(err)) = registry.match_step("I eat a fruit") else {
        panic!("expected ambiguous match");
    };
    let listed = err.possible_matches.iter().map(|(_, l)| *l).collect::<Vec<_>>();
    assert_eq!(listed.len(), 2);
    assert!(listed.contains(&Some(fruit)));
    assert!(listed.contains(&Some(any)));
    assert!(err.to_string().contains(&fruit.to_string()));
}

#[test]
fn undefined_step_is_not_a_fault() {
    let registry = Registry::<World>::new();
    let err = registry.match_step("I do something nobody defined").unwrap_err();
    assert!(err.is_undefined());
}

#[test]
fn introducer_aliases_share_one_registration() {
    let mut registry = Registry::<World>::new();
    _ = registry
        .alias_introducer("Angenommen")
        .unwrap()
        .step_as("Angenommen ", None, re(r"^ich habe (\d+) Gurken$"), have_cukes)
        .unwrap()
        .then(None, re("^I eat a (.*)$"), eat)
        .unwrap()
        .step_as("*", None, re("^I have apples$"), have_apples)
        .unwrap();

    assert_eq!(registry.steps().len(), 3);
    assert_eq!(registry.match_step("ich habe 3 Gurken").unwrap().args(), ["3"]);

    let err = registry
        .step_as("Soit", None, re("^whatever$"), eat)
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnknownIntroducer { keyword } if keyword == "Soit"));
}

#[derive(Debug, clap::Parser)]
struct Cli {
    #[command(flatten)]
    glue: cli::Opts,
}

#[test]
fn cli_options_configure_registry() {
    let cli = Cli::try_parse_from([
        "runner",
        "--after-hooks",
        "reverse",
        "--introducer",
        "Soit",
        "--introducer",
        " ",
    ])
    .unwrap();

    let mut registry = Registry::<World>::new();
    _ = registry.with_cli(cli.glue.clone()).unwrap();

    assert_eq!(registry.after_order(), AfterOrder::Reverse);
    assert!(registry.keywords().resolve("Soit").is_some());
    assert!(registry.keywords().resolve("").is_none());
    _ = registry
        .step_as("Soit", None, re("^j'ai (\\d+) concombres$"), have_cukes)
        .unwrap();
    assert_eq!(registry.match_step("j'ai 2 concombres").unwrap().args(), ["2"]);

    registry.seal();
    let err = registry.with_cli(cli.glue).unwrap_err();
    assert!(matches!(err, RegistryError::RegistrationClosed { call } if call == "with_cli"));
}

#[test]
fn selects_hooks_by_tags_in_registration_order() {
    let mut registry = Registry::<World>::new();
    _ = registry
        .before(Tags::from(["smoke"]), Some(Location::new("hooks.rs", 1, 1)), before_one)
        .unwrap()
        .before(Tags::any(), Some(Location::new("hooks.rs", 2, 1)), before_two)
        .unwrap();

    let lines = |tags: &TagSet| {
        registry
            .hooks_for(Kind::Before, tags)
            .filter_map(|h| h.location().map(|l| l.line))
            .collect::<Vec<_>>()
    };
    assert_eq!(lines(&TagSet::from(["smoke", "fast"])), [1, 2]);
    assert_eq!(lines(&TagSet::from(["fast"])), [2]);
    assert_eq!(lines(&TagSet::new()), [2]);
}

#[test]
fn tag_expression_hooks_plug_in() {
    let expr: TagOperation = "@db and not @readonly".parse().unwrap();
    let mut registry = Registry::<World>::new();
    _ = registry.after(expr, None, after_one).unwrap();

    let tags = TagSet::from(["@db"]);
    assert_eq!(registry.hooks_for(Kind::After, &tags).count(), 1);
    let tags = TagSet::from(["@db", "@readonly"]);
    assert_eq!(registry.hooks_for(Kind::After, &tags).count(), 0);
}

#[test]
fn later_world_module_wins() {
    let mut registry = Registry::<World>::new();
    _ = registry
        .world([module("A", greet_a)], None)
        .unwrap()
        .world([module("B", greet_b)], None)
        .unwrap();

    assert_eq!(registry.build_world().unwrap().greet, Some("B"));
}

#[test]
fn second_world_builder_is_fatal() {
    let first = location!();
    let second = location!();
    let mut registry = Registry::<World>::new();
    _ = registry
        .world(
            [module("A", greet_a)],
            Some(Builder::new(|| World { origin: "builder", ..World::default() }).at(first)),
        )
        .unwrap()
        .world([module("B", greet_b)], None)
        .unwrap();

    let err = registry
        .world([module("A", greet_a)], Some(Builder::new(World::default).at(second)))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::DuplicateWorldFactory { existing, rejected }
            if existing == Some(first) && rejected == Some(second),
    ));
    assert!(err.to_string().contains(&first.to_string()));

    // Rejected call registers nothing.
    assert_eq!(registry.worlds().modules().count(), 2);
    let world = registry.build_world().unwrap();
    assert_eq!(world.origin, "builder");
    assert_eq!(world.greet, Some("B"));
}

#[test]
fn registration_is_closed_once_scenarios_start() {
    let mut registry = Registry::<World>::new();
    _ = registry.given(None, re("^a step$"), eat).unwrap();
    assert!(!registry.is_sealed());

    _ = registry.build_world().unwrap();
    assert!(registry.is_sealed());

    let err = registry.given(None, re("^another step$"), eat).unwrap_err();
    assert!(matches!(err, RegistryError::RegistrationClosed { ref call } if call == "Given"));
    assert!(matches!(
        registry.before(Tags::any(), None, before_one).unwrap_err(),
        RegistryError::RegistrationClosed { call } if call == "Before",
    ));
    assert!(matches!(
        registry.world_module(world::from_fn("A", greet_a)).unwrap_err(),
        RegistryError::RegistrationClosed { .. },
    ));
    assert_eq!(registry.steps().len(), 1);
}

#[test]
fn any_lookup_seals() {
    let registry = Registry::<World>::new();
    _ = registry.match_step("anything");
    assert!(registry.is_sealed());

    let registry = Registry::<World>::new();
    let tags = TagSet::new();
    _ = registry.hooks_for(Kind::AfterStep, &tags).count();
    assert!(registry.is_sealed());
}

fn setup() -> Registry<World> {
    let mut registry = Registry::<World>::new();
    _ = registry
        .given(None, re(r"^I have (\d+) cukes$"), have_cukes)
        .unwrap()
        .when(None, re("^I eat a (.*)$"), eat)
        .unwrap()
        .when(None, re("^I eat a fruit$"), eat)
        .unwrap()
        .before(Tags::any(), None, before_one)
        .unwrap()
        .before(Tags::from(["two"]), None, before_two)
        .unwrap()
        .after_step(Tags::any(), None, after_step)
        .unwrap()
        .after(Tags::any(), None, after_one)
        .unwrap()
        .after(Tags::any(), None, after_two)
        .unwrap();
    registry
}

#[tokio::test]
async fn scenario_runs_the_query_sequence() {
    let registry = setup();
    let mut scenario = registry.scenario(["two"]).unwrap();

    scenario.run_before().await;
    scenario.run_step("I have 3 cukes").await.unwrap();
    scenario.run_step("I eat a pear").await.unwrap();
    scenario.run_after().await;

    assert_eq!(
        scenario.into_world().log,
        [
            "before 1",
            "before 2",
            "have 3",
            "after step",
            "eat pear",
            "after step",
            "after 1",
            "after 2",
        ],
    );
}

#[tokio::test]
async fn failed_match_runs_nothing() {
    let registry = setup();
    let mut scenario = registry.scenario(TagSet::new()).unwrap();

    let err = scenario.run_step("I eat a fruit").await.unwrap_err();
    assert!(matches!(err, MatchError::Ambiguous(_)));

    assert!(scenario.world().log.is_empty());
}

#[tokio::test]
async fn failed_match_aborts_rest_of_scenario() {
    let registry = setup();
    let mut scenario = registry.scenario(TagSet::new()).unwrap();

    scenario.run_before().await;
    let err = scenario.run_step("I sing").await.unwrap_err();
    assert!(err.is_undefined());
    assert!(scenario.failure().is_some_and(MatchError::is_undefined));

    let err = scenario.run_step("I have 5 cukes").await.unwrap_err();
    assert_eq!(err.step_text(), "I sing");
    assert!(scenario.step("I eat a pear").is_err());
    scenario.run_after().await;

    assert_eq!(scenario.into_world().log, ["before 1", "after 1", "after 2"]);
}

#[tokio::test]
async fn after_hooks_can_run_in_reverse() {
    let mut registry = setup();
    _ = registry.after_hooks_order(AfterOrder::Reverse).unwrap();
    let mut scenario = registry.scenario(TagSet::new()).unwrap();

    let planned = scenario
        .after_hooks()
        .into_iter()
        .map(|h| h.kind())
        .collect::<Vec<_>>();
    assert_eq!(planned, [Kind::After, Kind::After]);

    scenario.run_after().await;
    assert_eq!(scenario.world().log, ["after 2", "after 1"]);

    // Registry lookups keep registration order regardless.
    let tags = TagSet::new();
    let mut world = World::default();
    for hook in registry.hooks_for(Kind::After, &tags) {
        (hook.func())(&mut world).await;
    }
    assert_eq!(world.log, ["after 1", "after 2"]);
}

#[tokio::test]
async fn every_scenario_gets_a_fresh_world() {
    let registry = setup();

    let mut first = registry.scenario(TagSet::new()).unwrap();
    first.run_step("I have 7 cukes").await.unwrap();
    assert_eq!(first.world().cukes, 7);

    let second = registry.scenario(TagSet::new()).unwrap();
    assert_eq!(second.world().cukes, 0);
    assert!(second.world().log.is_empty());
}

#[test]
fn failing_builder_aborts_only_that_scenario() {
    use std::sync::atomic::{AtomicBool, Ordering};

    static FAIL: AtomicBool = AtomicBool::new(true);

    let mut registry = Registry::<World>::new();
    _ = registry
        .world_builder(Builder::fallible(|| {
            if FAIL.swap(false, Ordering::SeqCst) {
                Err("flaky database")
            } else {
                Ok(World::default())
            }
        }))
        .unwrap();

    let err = registry.scenario(TagSet::new()).unwrap_err();
    assert_eq!(err.to_string(), "Failed to create World: flaky database");
    assert!(registry.scenario(TagSet::new()).is_ok());
}
